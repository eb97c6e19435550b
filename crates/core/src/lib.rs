//! Core library: stable reads, content classification, destination
//! resolution, collision naming and the per-event sorting engine.

pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod mover;
pub mod namer;
pub mod reader;
pub mod resolver;
pub mod scanner;
