use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::message::PumpParams;

/// Newest-first command history kept per device.
pub const COMMAND_HISTORY_LIMIT: usize = 10;

/// In-memory pump state, keyed by device MAC address. Lost on restart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PumpState {
    pub is_running: bool,
    /// Current flow in L/min; zero while stopped.
    pub flow_rate: f64,
    /// Unix seconds of the last accepted `start`.
    pub start_time: Option<f64>,
    /// Scheduled run time in seconds; zero means run until stopped.
    pub duration: f64,
    pub remaining_time: f64,
    /// Accumulated seconds across completed runs.
    pub total_runtime: f64,
    pub command_history: Vec<CommandRecord>,
}

impl Default for PumpState {
    fn default() -> Self {
        Self {
            is_running: false,
            flow_rate: 0.0,
            start_time: None,
            duration: 0.0,
            remaining_time: 0.0,
            total_runtime: 0.0,
            command_history: Vec::new(),
        }
    }
}

impl PumpState {
    /// Prepend a record, keeping at most [`COMMAND_HISTORY_LIMIT`] entries.
    pub fn push_history(&mut self, record: CommandRecord) {
        self.command_history.insert(0, record);
        self.command_history.truncate(COMMAND_HISTORY_LIMIT);
    }

    /// Remaining run time derived from the start timestamp; `None` while
    /// stopped or when running without a scheduled duration.
    pub fn remaining_at(&self, now: f64) -> Option<f64> {
        if !self.is_running || self.duration <= 0.0 {
            return None;
        }
        let started = self.start_time?;
        Some((self.duration - (now - started)).max(0.0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandRecord {
    pub action: String,
    pub params: PumpParams,
    pub timestamp: f64,
}
