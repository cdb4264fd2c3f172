//! Input schema
//!
//! This module defines the upstream telemetry record (fixed wire keys such as
//! `hr_bpm` and `tcore_c`) and the tagged event envelope used to replay or
//! stream samples, fixes and operator commands through a session.

mod adapter;
mod event;
mod sample;

pub use adapter::*;
pub use event::*;
pub use sample::*;
