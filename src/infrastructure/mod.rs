// src/infrastructure/mod.rs
pub mod repositories;
pub mod web;
