use plantsync_api::rules::SensorRuleError;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("device info validation failed: {0}")]
    DeviceInfo(SensorRuleError),

    #[error("sensor data validation failed: {0}")]
    Value(SensorRuleError),
}
