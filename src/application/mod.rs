// src/application/mod.rs
pub mod service;
pub mod storage;
