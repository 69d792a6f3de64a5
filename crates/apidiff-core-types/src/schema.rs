//! Canonical event names for structured logging
//!
//! The lifecycle macros tag every boundary event with one of these, and log
//! assertions match on them.

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
