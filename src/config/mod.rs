use std::env;
use std::fmt;

use crate::workflows::scan_intake::DrainPolicy;

/// Top-level configuration for the intake processor.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub intake: IntakeSettings,
    pub location_codes: LocationCodeConfig,
    pub telemetry: TelemetryConfig,
}

impl IntakeConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let drain_policy = match env::var("INTAKE_DRAIN_POLICY") {
            Ok(value) => parse_drain_policy(&value)?,
            Err(_) => DrainPolicy::default(),
        };

        let prefix = env::var("INTAKE_LOCATION_PREFIX").unwrap_or_else(|_| "SLP".to_string());
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidLocationPrefix(prefix));
        }

        let digits = env::var("INTAKE_LOCATION_DIGITS")
            .unwrap_or_else(|_| "8".to_string())
            .parse::<u8>()
            .ok()
            .filter(|digits| (1..=20).contains(digits))
            .ok_or(ConfigError::InvalidLocationDigits)?;

        let log_level = env::var("INTAKE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            intake: IntakeSettings { drain_policy },
            location_codes: LocationCodeConfig { prefix, digits },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_drain_policy(value: &str) -> Result<DrainPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "manual" => Ok(DrainPolicy::Manual),
        "on_receive" | "on-receive" => Ok(DrainPolicy::OnReceive),
        other => Err(ConfigError::InvalidDrainPolicy(other.to_string())),
    }
}

/// Settings for how the intake task treats incoming scans.
#[derive(Debug, Clone)]
pub struct IntakeSettings {
    pub drain_policy: DrainPolicy,
}

/// Shape of shelf-location barcodes accepted by the location scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationCodeConfig {
    pub prefix: String,
    pub digits: u8,
}

impl Default for LocationCodeConfig {
    fn default() -> Self {
        Self {
            prefix: "SLP".to_string(),
            digits: 8,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidDrainPolicy(String),
    InvalidLocationPrefix(String),
    InvalidLocationDigits,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDrainPolicy(value) => write!(
                f,
                "INTAKE_DRAIN_POLICY must be 'manual' or 'on_receive', got '{}'",
                value
            ),
            ConfigError::InvalidLocationPrefix(value) => write!(
                f,
                "INTAKE_LOCATION_PREFIX must be non-empty ASCII alphanumeric, got '{}'",
                value
            ),
            ConfigError::InvalidLocationDigits => {
                write!(f, "INTAKE_LOCATION_DIGITS must be a number between 1 and 20")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
