//! Chat session lifecycle and turn orchestration.

pub mod assembler;
pub mod orchestrator;
pub mod repository;
pub mod sessions;
pub mod summaries;
