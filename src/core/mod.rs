//! Core relay components
//!
//! This module contains the request translation and error-mapping logic that sits
//! between the chat client and the upstream model API.

mod relay;

pub use relay::{Relay, RelayError, FALLBACK_REPLY};
