//! # gardenhub-app
//!
//! Application layer — the control loop and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Sensor` — produce one reading per tick
//!   - `TelemetryPublisher` — deliver a serialised payload to a topic
//! - Drive the **control loop**: sample → decide → publish → advance
//! - Provide **in-process infrastructure** (bounded telemetry queue) that
//!   doesn't need IO
//!
//! ## Dependency rule
//! Depends on `gardenhub-domain` only (plus `tokio` for timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod control_loop;
pub mod ports;
pub mod telemetry_queue;
