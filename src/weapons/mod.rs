//! Weapon ranking and switch timing

pub mod selector;

pub use selector::{SwitchDecision, SwitchReason, WeaponProfile, WeaponSelector};
