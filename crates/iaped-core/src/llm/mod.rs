//! Model backend abstraction.

pub mod gateway;
