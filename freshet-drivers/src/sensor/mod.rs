//! Sensor implementations

pub mod sim;

pub use sim::{SimSensor, SimVariable, MAX_SIM_CHANNELS};
