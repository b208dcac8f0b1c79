pub mod sync_job;
pub mod tag_registry;

pub use sync_job::SyncJob;
pub use tag_registry::SyncTagRegistry;
