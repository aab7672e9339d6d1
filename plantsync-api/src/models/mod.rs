mod pump;
mod sensor;

pub use pump::{CommandRecord, PumpState, COMMAND_HISTORY_LIMIT};
pub use sensor::{sensor_code, SensorReport, SensorValue};
