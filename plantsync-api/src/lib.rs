#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod message;
pub mod models;
pub mod rules;

pub use message::{ControlCommand, DeviceMessage, ErrorCode, ResponseStatus, ServerMessage};
pub use models::{CommandRecord, PumpState, SensorReport};
