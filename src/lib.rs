//! Meadowhop library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive both games' resources and systems without needing a
//! window or GPU.

pub mod shared;
pub mod input;
pub mod platformer;
pub mod village;
pub mod ui;
pub mod save;
