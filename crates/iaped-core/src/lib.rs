//! Conversation orchestration logic and repository trait definitions for Iaped.
//!
//! This crate defines the "ports" (repository and gateway traits) that the
//! infrastructure layer implements. It depends only on `iaped-types` -- never
//! on `iaped-infra` or any database/HTTP crate.

pub mod chat;
pub mod llm;

#[cfg(test)]
pub(crate) mod testing;
