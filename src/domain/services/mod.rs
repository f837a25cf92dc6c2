// src/domain/services/mod.rs
pub mod resolver;
pub mod timestamp;
