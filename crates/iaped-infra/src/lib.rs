//! Infrastructure layer for Iaped.
//!
//! Contains implementations of the ports defined in `iaped-core`: SQLite
//! storage for the conversation history and the HTTP gateway to the model
//! backend, plus configuration loading.

pub mod config;
pub mod llm;
pub mod sqlite;
