//! Backend adapters.

pub mod ollama;
