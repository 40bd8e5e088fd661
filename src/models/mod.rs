// src/models/mod.rs

pub mod book;
