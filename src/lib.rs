//! Butterfly Nebula Brawl: the simulation core of a shoot-and-dodge arcade
//! game with fifteen levels and a boss fight.
//!
//! `compute` advances a `GameState` one tick at a time; rendering, audio and
//! persistence are collaborators that only read the state or its events.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod flutterers;
pub mod levels;
pub mod storage;

pub use error::{Error, Result};
