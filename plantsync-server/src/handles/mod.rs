mod advisory_handle;
mod pump_handle;
mod sensor_handle;

pub use advisory_handle::*;
pub use pump_handle::*;
pub use sensor_handle::*;
