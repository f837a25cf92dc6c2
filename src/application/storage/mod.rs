// src/application/storage/mod.rs
pub mod notification_store;
