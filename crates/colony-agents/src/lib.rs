//! Worker behaviors, roles, and the per-worker scheduler.
//!
//! This crate is the logic layer for workers. It reads a room through a
//! per-tick [`RoomCache`], asks the ledger's matching engine for transport
//! work, and issues effects through the simulation interface.
//!
//! # Modules
//!
//! - [`behavior`] -- The [`Behavior`] trait and the [`BehaviorRegistry`].
//! - [`behaviors`] -- The nine built-in behaviors.
//! - [`config`] -- Scheduler tunables ([`SchedulerConfig`]).
//! - [`context`] -- [`RoomCache`], [`TickContext`], and [`Worker`].
//! - [`outcome`] -- The shared action result interpretation ([`ActionOutcome`]).
//! - [`roles`] -- [`RoleConfig`], [`Admission`], and the [`RoleBook`].
//! - [`scheduler`] -- The [`WorkerScheduler`] state machine.

pub mod behavior;
pub mod behaviors;
pub mod config;
pub mod context;
pub mod outcome;
pub mod roles;
pub mod scheduler;

// Re-export primary types at crate root for convenience.
pub use behavior::{Behavior, BehaviorRegistry};
pub use config::SchedulerConfig;
pub use context::{RoomCache, TickContext, Worker};
pub use outcome::{ActionOutcome, execute, interpret};
pub use roles::{Admission, RoleBook, RoleConfig};
pub use scheduler::{RunOutcome, WorkerScheduler};
