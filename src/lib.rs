//! Walled-arena Snake.
//!
//! The simulation core (`direction`, `snake`, `collision`, `food`, `game`,
//! `scheduler`) is pure and pulse-driven. Key capture, rendering and timing
//! sit behind small adapters (`input`, `render`/`renderer`, `clock`) so the
//! core can be driven deterministically from tests.

pub mod clock;
pub mod collision;
pub mod config;
pub mod direction;
pub mod error;
pub mod food;
pub mod game;
pub mod input;
pub mod render;
pub mod renderer;
pub mod scheduler;
pub mod snake;
pub mod terminal_runtime;
