// src/application/service/mod.rs
pub mod feed_service;
