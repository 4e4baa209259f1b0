//! Composer — typing-status core for a chat message composer.

pub mod config;
pub mod policy;
pub mod state;
pub mod typing;
