//! Model backend gateway implementations.

pub mod openai;
