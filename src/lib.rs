// src/lib.rs
pub mod api;
pub mod banner;
pub mod config;
pub mod errors;
pub mod models;
pub mod refactor;
pub mod render;
pub mod runner;
pub mod tools;
pub mod workspace;
