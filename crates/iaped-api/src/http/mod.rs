//! REST API layer: router, error mapping, extractors, and handlers.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
