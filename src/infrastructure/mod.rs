pub mod cache;
pub mod jobs;
pub mod network;
pub mod offline;
