// src/handlers/mod.rs

pub mod books;
pub mod health;
