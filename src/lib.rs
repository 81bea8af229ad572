//! Ironsight - Fuzzy-Logic FPS Bot Decision Core

pub mod core;
pub mod decision;
pub mod fuzzy;
pub mod goals;
pub mod weapons;
pub mod world;
