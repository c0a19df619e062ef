use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::scan_intake::SessionError;
use std::fmt;

#[derive(Debug)]
pub enum IntakeError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Session(SessionError),
}

impl fmt::Display for IntakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeError::Config(err) => write!(f, "configuration error: {}", err),
            IntakeError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            IntakeError::Session(err) => write!(f, "scan session error: {}", err),
        }
    }
}

impl std::error::Error for IntakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IntakeError::Config(err) => Some(err),
            IntakeError::Telemetry(err) => Some(err),
            IntakeError::Session(err) => Some(err),
        }
    }
}

impl From<ConfigError> for IntakeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for IntakeError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<SessionError> for IntakeError {
    fn from(value: SessionError) -> Self {
        Self::Session(value)
    }
}
