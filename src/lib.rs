//! Resonance library crate: re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual game entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can drive the game without needing a window or GPU.

pub mod shared;
pub mod input;
pub mod player;
pub mod npcs;
pub mod minigame;
pub mod gate;
pub mod scenes;
pub mod effects;
pub mod audio;
pub mod ui;
pub mod data;
