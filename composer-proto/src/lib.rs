//! Shared wire definitions for composer typing notifications.

pub mod codec;
pub mod status;
pub mod typing;
