pub mod cache_store;
pub mod client_notifier;
pub mod mutation_store;
pub mod network_gateway;
pub mod notification_presenter;
pub mod sync_scheduler;
pub mod window_gateway;

pub use cache_store::CacheStore;
pub use client_notifier::ClientNotifier;
pub use mutation_store::MutationStore;
pub use network_gateway::{NetworkError, NetworkGateway};
pub use notification_presenter::NotificationPresenter;
pub use sync_scheduler::SyncScheduler;
pub use window_gateway::WindowGateway;
