//! Internal utilities for the chat session core.

pub mod validation;

pub use validation::*;
