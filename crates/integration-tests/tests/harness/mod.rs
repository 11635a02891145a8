//! Shared helpers for the integration suite
//!
//! Compiled into every test binary; not all binaries use all helpers.
#![allow(dead_code)]

pub mod audio;
pub mod config;
pub mod server;
pub mod stub;
