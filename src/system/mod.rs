// src/system/mod.rs

pub mod autosave;
pub mod executor;
