// wirelesstag-api: Async transport for the Wireless Sensor Tags cloud API

pub mod account;
pub mod client;
pub mod error;
pub mod models;
pub mod paths;
pub mod tags;
pub mod transport;

pub use client::{CallApi, DEFAULT_BASE_URL, WirelessTagClient};
pub use error::Error;
pub use models::TagManagerInfo;
pub use transport::TransportConfig;
