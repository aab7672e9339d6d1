//! Static validation tables shared by the gateway and the mock tooling.

mod pump;
mod sensor;

pub use pump::{
    validate_action, validate_params, PumpAction, PumpRuleError, DEFAULT_FLOW_RATE,
    DURATION_RANGE, FLOW_RATE_RANGE,
};
pub use sensor::{
    is_valid_mac, sensor_rule, validate_device_info, validate_sensor_value, SensorRule,
    SensorRuleError, DEVICE_ID_MAX_LEN, SENSOR_RULES,
};
