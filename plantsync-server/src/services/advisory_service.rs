use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::configs::Advisory;
use crate::errors::AdvisoryError;
use crate::unix_now;

/// Chat-completion seam, so care analysis can be tested without a live
/// language-model endpoint.
#[async_trait]
pub trait AdvisoryBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

pub struct HttpAdvisoryBackend {
    http: reqwest::Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl HttpAdvisoryBackend {
    pub fn new(config: &Advisory) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl AdvisoryBackend for HttpAdvisoryBackend {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let mut request = self.http.post(&self.url).json(&json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
        }));

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let body: Value = request.send().await?.json().await?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AdvisoryError::BadResponse("no completion content".to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantInfo {
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub growth_stage: Option<String>,
}

/// Keyword decisions distilled from the model's free-text analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CareDecisions {
    pub watering_needed: bool,
    pub light_adjustment: bool,
    pub temperature_adjustment: bool,
    pub fertilization_needed: bool,
    pub health_alert: bool,
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareReport {
    pub success: bool,
    pub analysis: String,
    pub decisions: CareDecisions,
    pub timestamp: f64,
    pub sensor_data: BTreeMap<String, f64>,
}

pub struct AdvisoryService {
    backend: Arc<dyn AdvisoryBackend>,
}

impl AdvisoryService {
    pub fn new(config: &Advisory) -> Self {
        Self {
            backend: Arc::new(HttpAdvisoryBackend::new(config)),
        }
    }

    pub fn with_backend(backend: Arc<dyn AdvisoryBackend>) -> Self {
        Self { backend }
    }

    pub async fn process(
        &self,
        sensor_data: BTreeMap<String, f64>,
        plant_info: Option<PlantInfo>,
    ) -> Result<CareReport, AdvisoryError> {
        let prompt = build_prompt(&sensor_data, plant_info.as_ref());
        let analysis = self.backend.generate(&prompt).await?;
        let decisions = extract_decisions(&analysis);

        Ok(CareReport {
            success: true,
            analysis,
            decisions,
            timestamp: unix_now(),
            sensor_data,
        })
    }
}

fn metric_unit(metric: &str) -> &'static str {
    match metric {
        "temperature" => " °C",
        "humidity" | "soil_moisture" => " %",
        "light_intensity" => " lux",
        _ => "",
    }
}

pub fn build_prompt(
    sensor_data: &BTreeMap<String, f64>,
    plant_info: Option<&PlantInfo>,
) -> String {
    let mut summary = String::new();
    for (metric, value) in sensor_data {
        summary.push_str(&format!("- {metric}: {value}{}\n", metric_unit(metric)));
    }
    if summary.is_empty() {
        summary.push_str("no sensor data\n");
    }

    let mut context = String::new();
    if let Some(info) = plant_info {
        if let Some(species) = &info.species {
            context.push_str(&format!("- species: {species}\n"));
        }
        if let Some(stage) = &info.growth_stage {
            context.push_str(&format!("- growth stage: {stage}\n"));
        }
    }
    if context.is_empty() {
        context.push_str("unknown plant\n");
    }

    format!(
        "You are a plant care expert. Based on the sensor data below, provide \
         care decisions for this plant.\n\n\
         ## Current sensor data:\n{summary}\n\
         ## Plant information:\n{context}\n\
         Provide:\n\
         1. Environment assessment\n\
         2. Care decisions (watering, light, temperature, fertilization)\n\
         3. Automation suggestions\n\
         4. Health warnings\n\
         5. Data trend analysis\n"
    )
}

/// Scan the analysis text for actionable keywords.
pub fn extract_decisions(analysis: &str) -> CareDecisions {
    let lowered = analysis.to_lowercase();
    let mut decisions = CareDecisions::default();

    if ["water", "irrigat", "dry soil"].iter().any(|kw| lowered.contains(kw)) {
        decisions.watering_needed = true;
        decisions.actions.push("watering needed".to_string());
    }
    if ["light", "sunlight", "shade"].iter().any(|kw| lowered.contains(kw)) {
        decisions.light_adjustment = true;
        decisions.actions.push("adjust lighting".to_string());
    }
    if ["temperature", "too hot", "too cold"].iter().any(|kw| lowered.contains(kw)) {
        decisions.temperature_adjustment = true;
        decisions.actions.push("adjust temperature".to_string());
    }
    if ["fertiliz", "fertilis", "nutrient"].iter().any(|kw| lowered.contains(kw)) {
        decisions.fertilization_needed = true;
        decisions.actions.push("fertilization needed".to_string());
    }
    if ["alert", "warning", "danger"].iter().any(|kw| lowered.contains(kw)) {
        decisions.health_alert = true;
        decisions.actions.push("health alert".to_string());
    }

    decisions
}
