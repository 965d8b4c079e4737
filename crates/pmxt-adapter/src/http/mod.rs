/*
[INPUT]:  HTTP client configuration and sidecar endpoints
[OUTPUT]: HTTP responses and unwrapped sidecar payloads
[POS]:    HTTP layer - sidecar communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;

pub use error::{PmxtError, Result};

pub use client::{ACCESS_TOKEN_HEADER, ClientConfig, DEFAULT_BASE_URL, DEFAULT_PORT, SidecarClient};
