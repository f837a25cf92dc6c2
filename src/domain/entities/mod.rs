// src/domain/entities/mod.rs
pub mod notification;
