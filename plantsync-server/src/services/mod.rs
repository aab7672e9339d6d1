mod advisory_service;
mod backend_service;
mod connection_service;
mod control_subscriber;
mod pump_service;
mod sensor_service;
mod transport;

pub use advisory_service::*;
pub use backend_service::*;
pub use connection_service::*;
pub use control_subscriber::*;
pub use pump_service::*;
pub use sensor_service::*;
pub use transport::*;
