// src/domain/mod.rs
pub mod entities;
pub mod services;
