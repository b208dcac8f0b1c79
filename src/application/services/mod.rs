pub mod fetch_service;
pub mod lifecycle_service;
pub mod mutation_service;
pub mod notification_service;
pub mod share_service;
pub mod sync_service;

#[cfg(test)]
pub mod test_support;

pub use fetch_service::FetchService;
pub use lifecycle_service::LifecycleService;
pub use mutation_service::MutationService;
pub use notification_service::NotificationService;
pub use share_service::ShareService;
pub use sync_service::{RetryPolicy, SyncService};
