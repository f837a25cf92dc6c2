// src/infrastructure/web/mod.rs
pub mod notification_controller;
