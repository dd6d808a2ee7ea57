//! Danish motor register client.
//!
//! Enriches a recognized plate with the registry's vehicle, environment, and
//! equipment documents, aggregated into one report.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::RegistryError;
use crate::models::vehicle::{EnvironmentInfo, VehicleDetails, VehicleReport};

const DEFAULT_BASE_URL: &str = "https://v1.motorapi.dk";

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "MOTORAPI_KEY";

/// Client for the motor register API.
pub struct MotorRegistry {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl MotorRegistry {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.or_else(|| std::env::var(TOKEN_ENV_VAR).ok()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Look up a plate: vehicle details, environment info, and the
    /// pass-through equipment document, aggregated.
    pub fn lookup(&self, plate: &str) -> Result<VehicleReport, RegistryError> {
        let token = self
            .token
            .as_deref()
            .ok_or(RegistryError::MissingToken)?;

        debug!(plate, "registry lookup");
        let vehicle: VehicleDetails = self.get(&format!("/vehicles/{plate}"), token, plate)?;
        let environment: EnvironmentInfo =
            self.get(&format!("/vehicles/{plate}/environment"), token, plate)?;
        let equipment: serde_json::Value =
            self.get(&format!("/vehicles/{plate}/equipment"), token, plate)?;

        Ok(VehicleReport {
            registration: plate.to_string(),
            vehicle,
            environment,
            equipment,
        })
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        plate: &str,
    ) -> Result<T, RegistryError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("X-AUTH-TOKEN", token)
            .send()?;

        if let Some(rejected) = status_error(response.status(), plate) {
            return Err(rejected);
        }
        Ok(response.json()?)
    }
}

/// Map a registry response status to the error it stands for, if any.
fn status_error(status: StatusCode, plate: &str) -> Option<RegistryError> {
    match status {
        StatusCode::NOT_FOUND => Some(RegistryError::NotFound(plate.to_string())),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Some(RegistryError::Unauthorized),
        status if !status.is_success() => Some(RegistryError::Status(status.as_u16())),
        _ => None,
    }
}
