// src/core/mod.rs

pub mod catalog;
pub mod command;
pub mod loader;
pub mod paths;
pub mod populator;
pub mod settings;
pub mod writer;
