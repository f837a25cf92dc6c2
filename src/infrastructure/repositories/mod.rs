// src/infrastructure/repositories/mod.rs
pub mod sqlite_notification_repository;
