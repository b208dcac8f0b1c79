pub mod messages;

pub use messages::{ClientCommand, StatusMessage};
