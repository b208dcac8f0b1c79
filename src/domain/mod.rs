pub mod entities;
pub mod routing;
pub mod value_objects;

pub use entities::{FetchRequest, FetchResponse, QueuedMutation, SyncReport};
pub use routing::{RequestClassifier, Strategy};
pub use value_objects::{CachePartition, ChatId, HttpMethod, MutationId};
