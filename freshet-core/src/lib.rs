//! Board-agnostic core logic for the Freshet data logger
//!
//! This crate contains all logging logic that does not depend on
//! specific hardware implementations:
//!
//! - Capability traits (sensor, variable, clock, wake source, record sink)
//! - Variable array orchestration with sensor deduplication
//! - Clock/interval scheduling on the logging grid
//! - Sleep/wake state machine and interrupt-shared run flags
//! - The end-to-end logging cycle driver
//! - Deployment configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod array;
pub mod clock;
pub mod config;
pub mod logger;
pub mod state;
pub mod traits;
