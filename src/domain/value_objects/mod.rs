pub mod ids;
pub mod method;
pub mod partition;

pub use ids::{CallId, ChatId, MutationId, WindowId};
pub use method::HttpMethod;
pub use partition::CachePartition;
