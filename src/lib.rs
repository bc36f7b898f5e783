// src/lib.rs
//
// Configuration model and synthesis engine for `flet build` packaging jobs:
// a strongly-typed form state, a pyproject.toml loader/writer pair, and the
// command assembler that turns the state into a runnable invocation.

pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
