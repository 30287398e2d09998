//! Backend client modules.

pub mod api;

pub use api::{ApiClient, ClientConfig, ClientError, DescriptionRequest};
