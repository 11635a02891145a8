#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the timbre voice-clone server
//!
//! Wraps the `/clone` endpoint: encode a reference recording, post the
//! clone request, decode the synthesized audio from the response.

mod client;
pub mod error;
pub mod types;

pub use client::{CloneClient, encode_audio_file};
pub use error::{ClientError, Result};
pub use types::{CloneRequest, CloneResponse};
