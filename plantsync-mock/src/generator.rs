use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use plantsync_api::models::{sensor_code, SensorReport, SensorValue};
use plantsync_api::rules::is_valid_mac;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use plantsync_server::errors::BackendError;
use plantsync_server::services::BackendClient;
use plantsync_server::unix_now;

/// Values kept per device and metric before the oldest is dropped.
pub const VALUE_HISTORY_LIMIT: usize = 1000;

/// Generation profile for one synthetic metric.
#[derive(Debug, Clone, Copy)]
pub struct SensorProfile {
    pub metric: &'static str,
    pub min: f64,
    pub max: f64,
    /// Decimal places kept after rounding.
    pub precision: u32,
    pub unit: &'static str,
    /// Largest per-step drift as a fraction of the range span.
    pub variation: f64,
}

pub const SENSOR_PROFILES: &[SensorProfile] = &[
    SensorProfile {
        metric: "temperature",
        min: 18.0,
        max: 35.0,
        precision: 2,
        unit: "°C",
        variation: 0.05,
    },
    SensorProfile {
        metric: "humidity",
        min: 30.0,
        max: 80.0,
        precision: 1,
        unit: "%",
        variation: 0.08,
    },
    SensorProfile {
        metric: "light",
        min: 0.0,
        max: 2000.0,
        precision: 0,
        unit: "lux",
        variation: 0.15,
    },
    SensorProfile {
        metric: "motion",
        min: 0.0,
        max: 1.0,
        precision: 0,
        unit: "",
        variation: 0.0,
    },
    SensorProfile {
        metric: "air_quality",
        min: 0.0,
        max: 500.0,
        precision: 0,
        unit: "ppm",
        variation: 0.1,
    },
    SensorProfile {
        metric: "co2",
        min: 300.0,
        max: 2000.0,
        precision: 0,
        unit: "ppm",
        variation: 0.1,
    },
];

pub fn sensor_profile(metric: &str) -> Option<&'static SensorProfile> {
    SENSOR_PROFILES.iter().find(|p| p.metric == metric)
}

/// Next sample for a profile. The first sample is uniform over the range;
/// later samples drift from the previous one by at most `variation × span`,
/// with Gaussian jitter, clamped back into range. Motion is a coin flip.
pub fn next_value<R: Rng + ?Sized>(
    profile: &SensorProfile,
    previous: Option<f64>,
    rng: &mut R,
) -> f64 {
    if profile.metric == "motion" {
        return if rng.random_bool(0.5) { 1.0 } else { 0.0 };
    }

    let value = match previous {
        Some(previous) => {
            let limit = (profile.max - profile.min) * profile.variation;
            let change = match Normal::new(0.0, limit / 2.0) {
                Ok(normal) => normal.sample(rng).clamp(-limit, limit),
                Err(_) => 0.0,
            };
            (previous + change).clamp(profile.min, profile.max)
        }
        None => rng.random_range(profile.min..=profile.max),
    };

    round_to(value, profile.precision)
}

fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

fn random_mac<R: Rng + ?Sized>(rng: &mut R) -> String {
    let octets: Vec<String> = (0..6)
        .map(|_| format!("{:02X}", rng.random_range(0..=255u32)))
        .collect();
    octets.join(":")
}

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("device {mac} already exists")]
    Duplicate { mac: String },

    #[error("unknown device {mac}")]
    Unknown { mac: String },

    #[error("invalid MAC address {mac}")]
    InvalidMac { mac: String },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

struct MockDevice {
    name: String,
    created_at: f64,
    last_active: Option<f64>,
    interval_secs: u64,
    task: Option<JoinHandle<()>>,
    history: HashMap<&'static str, VecDeque<f64>>,
}

/// Per-metric summary over a device's generated history.
#[derive(Debug, Clone, Serialize)]
pub struct SensorStats {
    pub count: usize,
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceStatus {
    pub mac_address: String,
    pub name: String,
    pub created_at: f64,
    pub last_active: Option<f64>,
    pub auto_generation: bool,
    pub interval_secs: u64,
    pub sensor_stats: BTreeMap<String, SensorStats>,
}

/// Registry of synthetic devices feeding the backend ingest path.
#[derive(Clone)]
pub struct MockFleet {
    devices: Arc<Mutex<HashMap<String, MockDevice>>>,
    backend: Arc<dyn BackendClient>,
}

impl MockFleet {
    pub fn new(backend: Arc<dyn BackendClient>) -> Self {
        Self {
            devices: Arc::new(Mutex::new(HashMap::new())),
            backend,
        }
    }

    /// Register a device, generating a MAC address when none is given.
    pub async fn create_device(
        &self,
        mac_address: Option<String>,
        name: Option<String>,
    ) -> Result<String, FleetError> {
        let mac_address = match mac_address {
            Some(mac) => {
                if !is_valid_mac(&mac) {
                    return Err(FleetError::InvalidMac { mac });
                }
                mac
            }
            None => random_mac(&mut rand::rng()),
        };

        let mut devices = self.devices.lock().await;
        if devices.contains_key(&mac_address) {
            return Err(FleetError::Duplicate { mac: mac_address });
        }

        let name = name.unwrap_or_else(|| {
            format!("mock-{}", &mac_address[mac_address.len() - 5..])
        });

        tracing::info!("created mock device {} ({})", name, mac_address);

        devices.insert(
            mac_address.clone(),
            MockDevice {
                name,
                created_at: unix_now(),
                last_active: None,
                interval_secs: 0,
                task: None,
                history: HashMap::new(),
            },
        );

        Ok(mac_address)
    }

    /// Drop a device and cancel its generation task.
    pub async fn remove_device(&self, mac_address: &str) -> bool {
        let mut devices = self.devices.lock().await;
        match devices.remove(mac_address) {
            Some(device) => {
                if let Some(task) = device.task {
                    task.abort();
                }
                tracing::info!("removed mock device {} ({})", device.name, mac_address);
                true
            }
            None => false,
        }
    }

    pub async fn list_devices(&self) -> Vec<String> {
        self.devices.lock().await.keys().cloned().collect()
    }

    pub async fn device_status(&self, mac_address: &str) -> Option<DeviceStatus> {
        let devices = self.devices.lock().await;
        let device = devices.get(mac_address)?;

        let sensor_stats = device
            .history
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(metric, values)| {
                let latest = *values.back().unwrap();
                let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let mean = values.iter().sum::<f64>() / values.len() as f64;

                (
                    metric.to_string(),
                    SensorStats {
                        count: values.len(),
                        latest,
                        min,
                        max,
                        mean,
                    },
                )
            })
            .collect();

        Some(DeviceStatus {
            mac_address: mac_address.to_string(),
            name: device.name.clone(),
            created_at: device.created_at,
            last_active: device.last_active,
            auto_generation: device.task.is_some(),
            interval_secs: device.interval_secs,
            sensor_stats,
        })
    }

    /// One full reading for every profile, appended to the device history.
    pub async fn generate_report(
        &self,
        mac_address: &str,
        timestamp: f64,
    ) -> Result<SensorReport, FleetError> {
        let mut devices = self.devices.lock().await;
        let device = devices.get_mut(mac_address).ok_or_else(|| FleetError::Unknown {
            mac: mac_address.to_string(),
        })?;

        let mut rng = rand::rng();
        let mut sensors = Vec::with_capacity(SENSOR_PROFILES.len());

        for profile in SENSOR_PROFILES {
            let history = device.history.entry(profile.metric).or_default();
            let value = next_value(profile, history.back().copied(), &mut rng);

            history.push_back(value);
            while history.len() > VALUE_HISTORY_LIMIT {
                history.pop_front();
            }

            sensors.push(SensorValue {
                sensor_code: sensor_code(profile.metric),
                value,
            });
        }

        device.last_active = Some(unix_now());

        Ok(SensorReport {
            mac_address: mac_address.to_string(),
            timestamp,
            sensors,
        })
    }

    /// Generate one reading and push it through the backend ingest path.
    pub async fn generate_and_send(&self, mac_address: &str) -> Result<(), FleetError> {
        let report = self.generate_report(mac_address, unix_now()).await?;
        let count = report.sensors.len();

        self.backend.ingest_sensor_report(&report).await?;
        tracing::debug!("sent {} reading(s) for {}", count, mac_address);

        Ok(())
    }

    /// Back-dated readings covering the given window, oldest first.
    pub async fn backfill(
        &self,
        mac_address: &str,
        hours: u32,
        interval_minutes: u32,
    ) -> Result<usize, FleetError> {
        let points = (u64::from(hours) * 60 / u64::from(interval_minutes.max(1))) as usize;
        let start = unix_now() - f64::from(hours) * 3600.0;

        tracing::info!(
            "backfilling {} reading(s) over {} hour(s) for {}",
            points,
            hours,
            mac_address
        );

        let mut sent = 0;
        for i in 0..points {
            let timestamp = start + (i as f64) * f64::from(interval_minutes) * 60.0;
            let report = self.generate_report(mac_address, timestamp).await?;

            match self.backend.ingest_sensor_report(&report).await {
                Ok(()) => sent += 1,
                Err(e) => tracing::warn!("backfill reading {} dropped: {}", i, e),
            }
        }

        Ok(sent)
    }

    /// Start a periodic generation task for the device, replacing any
    /// previous one.
    pub async fn start_auto_generation(&self, mac_address: &str, interval_secs: u64) -> bool {
        let mut devices = self.devices.lock().await;
        let Some(device) = devices.get_mut(mac_address) else {
            return false;
        };

        if let Some(task) = device.task.take() {
            task.abort();
        }
        device.interval_secs = interval_secs;

        let fleet = self.clone();
        let mac = mac_address.to_string();
        device.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = fleet.generate_and_send(&mac).await {
                    tracing::error!("auto-generation for {} failed: {}", mac, e);
                }
            }
        }));

        tracing::info!(
            "auto-generation for {} every {} second(s)",
            mac_address,
            interval_secs
        );
        true
    }

    pub async fn stop_auto_generation(&self, mac_address: &str) -> bool {
        let mut devices = self.devices.lock().await;
        let Some(device) = devices.get_mut(mac_address) else {
            return false;
        };

        match device.task.take() {
            Some(task) => {
                task.abort();
                tracing::info!("auto-generation for {} stopped", mac_address);
                true
            }
            None => false,
        }
    }
}
