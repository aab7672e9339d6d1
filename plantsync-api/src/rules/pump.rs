use core::fmt;

use crate::message::{ErrorCode, PumpParams};

/// Supported pump flow range in L/min, inclusive.
pub const FLOW_RATE_RANGE: (f64, f64) = (0.0, 100.0);
/// Supported scheduled run time in seconds, inclusive.
pub const DURATION_RANGE: (f64, f64) = (0.0, 3600.0);
/// Flow applied by `start` when the command carries none.
pub const DEFAULT_FLOW_RATE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpAction {
    Start,
    Stop,
    SetFlow,
}

impl PumpAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            PumpAction::Start => "start",
            PumpAction::Stop => "stop",
            PumpAction::SetFlow => "set_flow",
        }
    }
}

impl fmt::Display for PumpAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PumpRuleError {
    UnsupportedCommand {
        action: alloc::string::String,
    },
    ParamOutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl PumpRuleError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            PumpRuleError::UnsupportedCommand { .. } => ErrorCode::InvalidCommand,
            PumpRuleError::ParamOutOfRange { .. } => ErrorCode::InvalidParams,
        }
    }
}

impl fmt::Display for PumpRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PumpRuleError::UnsupportedCommand { action } => {
                write!(f, "unsupported command: {action}")
            }
            PumpRuleError::ParamOutOfRange {
                param,
                value,
                min,
                max,
            } => write!(f, "{param} value {value} outside of range [{min}, {max}]"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PumpRuleError {}

/// Resolve a wire action string against the supported command set.
pub fn validate_action(action: &str) -> Result<PumpAction, PumpRuleError> {
    match action {
        "start" => Ok(PumpAction::Start),
        "stop" => Ok(PumpAction::Stop),
        "set_flow" => Ok(PumpAction::SetFlow),
        other => Err(PumpRuleError::UnsupportedCommand {
            action: other.into(),
        }),
    }
}

/// Range-check the parameters a command actually uses: `flow_rate` for
/// `start` and `set_flow`, `duration` for `start` only.
pub fn validate_params(action: PumpAction, params: &PumpParams) -> Result<(), PumpRuleError> {
    if matches!(action, PumpAction::Start | PumpAction::SetFlow) {
        if let Some(flow_rate) = params.flow_rate {
            check_range("flow_rate", flow_rate, FLOW_RATE_RANGE)?;
        }
    }

    if action == PumpAction::Start {
        if let Some(duration) = params.duration {
            check_range("duration", duration, DURATION_RANGE)?;
        }
    }

    Ok(())
}

fn check_range(param: &'static str, value: f64, (min, max): (f64, f64)) -> Result<(), PumpRuleError> {
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(PumpRuleError::ParamOutOfRange {
            param,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_commands_resolve() {
        assert_eq!(validate_action("start"), Ok(PumpAction::Start));
        assert_eq!(validate_action("stop"), Ok(PumpAction::Stop));
        assert_eq!(validate_action("set_flow"), Ok(PumpAction::SetFlow));
        assert!(validate_action("reverse").is_err());
        assert!(validate_action("").is_err());
    }

    #[test]
    fn flow_rate_bounds_are_inclusive() {
        let params = PumpParams {
            flow_rate: Some(100.0),
            duration: None,
        };
        assert!(validate_params(PumpAction::SetFlow, &params).is_ok());

        let params = PumpParams {
            flow_rate: Some(100.5),
            duration: None,
        };
        assert!(validate_params(PumpAction::SetFlow, &params).is_err());
    }

    #[test]
    fn duration_is_checked_for_start_only() {
        let params = PumpParams {
            flow_rate: None,
            duration: Some(7200.0),
        };
        assert!(validate_params(PumpAction::Start, &params).is_err());
        // set_flow ignores duration entirely.
        assert!(validate_params(PumpAction::SetFlow, &params).is_ok());
    }

    #[test]
    fn missing_params_pass() {
        assert!(validate_params(PumpAction::Start, &PumpParams::default()).is_ok());
        assert!(validate_params(PumpAction::Stop, &PumpParams::default()).is_ok());
    }

    #[test]
    fn rule_errors_map_to_wire_codes() {
        assert_eq!(
            validate_action("reverse").unwrap_err().error_code(),
            ErrorCode::InvalidCommand
        );

        let params = PumpParams {
            flow_rate: Some(-1.0),
            duration: None,
        };
        assert_eq!(
            validate_params(PumpAction::Start, &params)
                .unwrap_err()
                .error_code(),
            ErrorCode::InvalidParams
        );
    }
}
