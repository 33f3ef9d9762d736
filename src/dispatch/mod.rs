//! Dispatch module: turning discovered pages into one finished report
//!
//! - `DispatchQueue` runs audits with bounded concurrency
//! - `GateState` decides when the run may be finalized
//! - `Coordinator` owns the session and drives both

mod coordinator;
mod gate;
mod queue;

pub use coordinator::{run_sweep, Coordinator, SweepOptions};
pub use gate::{GateEvent, GateState};
pub use queue::DispatchQueue;
