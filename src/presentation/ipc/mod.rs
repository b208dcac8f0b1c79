pub mod client_bridge;

pub use client_bridge::BroadcastClientBridge;
