//! Simulation core for a small tile-based action game.
//!
//! `map` and `entities` hold the world data and per-entity update rules,
//! `compute` drives the frame pipeline and state transitions as pure
//! functions, and `game` wires those to the outside collaborators
//! (score store, audio).

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod game;
pub mod map;
pub mod store;
