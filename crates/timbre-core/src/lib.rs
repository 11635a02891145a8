#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod input;
pub mod params;
pub mod take;

pub use input::{LineOutOfRange, text_or_file};
pub use params::{GenerationParams, SubtalkerParams};
pub use take::next_take_path;
