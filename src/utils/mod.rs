// src/utils/mod.rs

pub mod schema;
pub mod validated_json;
