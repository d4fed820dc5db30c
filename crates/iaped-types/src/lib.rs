//! Shared domain types for Iaped.
//!
//! This crate contains the core domain types used across the Iaped service:
//! chat sessions, messages, prompt entries, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod prompt;
pub mod session;
