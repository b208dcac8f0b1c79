pub mod cached_response;
pub mod http;
pub mod notification;
pub mod queued_mutation;
pub mod share;
pub mod sync_report;

pub use cached_response::CachedResponse;
pub use http::{FetchRequest, FetchResponse, RequestMode};
pub use notification::{
    NotificationAction, NotificationData, NotificationPayload, NotificationResponse,
    RenderedNotification, MAX_ACTIONS,
};
pub use queued_mutation::{MutationDraft, QueuedMutation};
pub use share::{SharedFile, SharedPayload};
pub use sync_report::SyncReport;
