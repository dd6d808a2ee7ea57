//! Motor register response models.

use serde::{Deserialize, Serialize};

/// Aggregated registry report for one plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleReport {
    /// The plate the report was requested for.
    pub registration: String,

    /// Core vehicle document.
    pub vehicle: VehicleDetails,

    /// Emission and consumption document.
    pub environment: EnvironmentInfo,

    /// Equipment document, forwarded verbatim.
    pub equipment: serde_json::Value,
}

/// Core vehicle document from `/vehicles/{plate}`.
///
/// The registry omits fields freely, so everything beyond the registration
/// number is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleDetails {
    pub registration_number: String,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "use")]
    pub vehicle_use: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub model_year: Option<i32>,
    pub first_registration: Option<String>,
    pub fuel_type: Option<String>,
    pub engine_volume: Option<f64>,
    pub engine_power: Option<f64>,
    pub mot_info: Option<MotInfo>,
}

impl VehicleDetails {
    /// Model year, falling back to the first-registration year.
    pub fn year(&self) -> Option<String> {
        match self.model_year {
            Some(year) if year > 0 => Some(year.to_string()),
            // get() keeps a malformed date from slicing mid-character
            _ => self
                .first_registration
                .as_deref()
                .and_then(|d| d.get(..4))
                .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
                .map(str::to_string),
        }
    }
}

/// Latest roadworthiness inspection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MotInfo {
    pub date: Option<String>,
    pub result: Option<String>,
    pub mileage: Option<u32>,
}

/// Environment document from `/vehicles/{plate}/environment`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentInfo {
    /// CO2 emission in g/km.
    pub co2_emission: Option<f64>,
    /// Fuel usage in km/l.
    pub fuel_usage: Option<f64>,
    pub euro_norm: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_prefers_model_year() {
        let details = VehicleDetails {
            model_year: Some(2019),
            first_registration: Some("2020-03-01".to_string()),
            ..Default::default()
        };
        assert_eq!(details.year().as_deref(), Some("2019"));
    }

    #[test]
    fn test_year_falls_back_to_first_registration() {
        let details = VehicleDetails {
            model_year: Some(0),
            first_registration: Some("2020-03-01".to_string()),
            ..Default::default()
        };
        assert_eq!(details.year().as_deref(), Some("2020"));
    }

    #[test]
    fn test_year_ignores_malformed_first_registration() {
        let details = VehicleDetails {
            first_registration: Some("２０２０-03-01".to_string()),
            ..Default::default()
        };
        assert_eq!(details.year(), None);

        let details = VehicleDetails {
            first_registration: Some("n/a".to_string()),
            ..Default::default()
        };
        assert_eq!(details.year(), None);
    }

    #[test]
    fn test_sparse_registry_document_deserializes() {
        let details: VehicleDetails = serde_json::from_str(
            r#"{"registration_number":"HG30202","make":"VW","type":"Personbil"}"#,
        )
        .unwrap();
        assert_eq!(details.registration_number, "HG30202");
        assert_eq!(details.vehicle_type.as_deref(), Some("Personbil"));
        assert!(details.mot_info.is_none());
    }
}
