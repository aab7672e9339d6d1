use core::fmt;

use crate::message::DeviceInfo;

/// Per-metric constraint. Both range bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorRule {
    pub metric: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

pub const SENSOR_RULES: &[SensorRule] = &[
    SensorRule {
        metric: "temperature",
        min: -50.0,
        max: 100.0,
        unit: "°C",
    },
    SensorRule {
        metric: "humidity",
        min: 0.0,
        max: 100.0,
        unit: "%",
    },
    SensorRule {
        metric: "battery_level",
        min: 0.0,
        max: 100.0,
        unit: "%",
    },
    SensorRule {
        metric: "signal_strength",
        min: -120.0,
        max: 0.0,
        unit: "dBm",
    },
];

pub const DEVICE_ID_MAX_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum SensorRuleError {
    UnknownMetric {
        metric: alloc::string::String,
    },
    OutOfRange {
        metric: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    MissingDeviceId,
    DeviceIdTooLong {
        len: usize,
    },
}

impl fmt::Display for SensorRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorRuleError::UnknownMetric { metric } => {
                write!(f, "unknown sensor type: {metric}")
            }
            SensorRuleError::OutOfRange {
                metric,
                value,
                min,
                max,
            } => write!(
                f,
                "{metric} value {value} outside of range [{min}, {max}]"
            ),
            SensorRuleError::MissingDeviceId => write!(f, "missing required field: device_id"),
            SensorRuleError::DeviceIdTooLong { len } => write!(
                f,
                "device_id length {len} exceeds limit {DEVICE_ID_MAX_LEN}"
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SensorRuleError {}

pub fn sensor_rule(metric: &str) -> Option<&'static SensorRule> {
    SENSOR_RULES.iter().find(|rule| rule.metric == metric)
}

/// Check one metric value against the table. NaN never passes the range
/// comparison.
pub fn validate_sensor_value(metric: &str, value: f64) -> Result<&'static SensorRule, SensorRuleError> {
    let rule = sensor_rule(metric).ok_or_else(|| SensorRuleError::UnknownMetric {
        metric: metric.into(),
    })?;

    if value >= rule.min && value <= rule.max {
        Ok(rule)
    } else {
        Err(SensorRuleError::OutOfRange {
            metric: rule.metric,
            value,
            min: rule.min,
            max: rule.max,
        })
    }
}

pub fn validate_device_info(info: &DeviceInfo) -> Result<&str, SensorRuleError> {
    let device_id = info
        .device_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(SensorRuleError::MissingDeviceId)?;

    if device_id.len() > DEVICE_ID_MAX_LEN {
        return Err(SensorRuleError::DeviceIdTooLong {
            len: device_id.len(),
        });
    }

    Ok(device_id)
}

/// Six colon-separated hex octets, e.g. `00:1A:2B:3C:4D:5E`.
pub fn is_valid_mac(mac: &str) -> bool {
    let mut octets = 0;
    for part in mac.split(':') {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
        octets += 1;
    }
    octets == 6
}
