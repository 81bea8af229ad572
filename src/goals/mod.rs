//! Composite goals and their arbitration
//!
//! Resource goals (health, ammo, weapon upgrade) share one seek state
//! machine and one interrupt protocol; a per-agent arbiter recomputes
//! dynamic priorities each tick and mediates preemption between them.

pub mod arbiter;
pub mod get_ammo;
pub mod get_health;
pub mod get_weapon;
pub mod goal;
pub mod interrupt;
pub mod priority;
pub mod seek;

pub use arbiter::GoalArbiter;
pub use get_ammo::GetAmmoGoal;
pub use get_health::GetHealthGoal;
pub use get_weapon::GetWeaponGoal;
pub use goal::{AgentContext, Goal, GoalKind, GoalReason, GoalStatus};
pub use interrupt::{should_interrupt_for, InterruptPolicy};
pub use priority::GoalPriority;
pub use seek::{ItemSeek, SeekStep};
