//! Transport mode selection and carbon estimators
//!
//! Emission factors are kg CO2 per kg of goods per 1000 km.

use tracing::{debug, warn};

use eco_common::config::CarbonMethod;

use crate::tables::MaterialTable;
use crate::types::TransportMode;
use crate::utils::round_to;

/// Distances below this go by truck
pub const TRUCK_MAX_KM: f64 = 1500.0;

/// Distances below this (and at least `TRUCK_MAX_KM`) go by ship
pub const SHIP_MAX_KM: f64 = 6000.0;

impl TransportMode {
    /// Canonical emission factor
    pub fn emission_factor(self) -> f64 {
        match self {
            Self::Truck => 0.12,
            Self::Ship => 0.02,
            Self::Air => 0.5,
        }
    }

    /// Mode implied by distance alone
    pub fn for_distance(distance_km: f64) -> Self {
        if distance_km < TRUCK_MAX_KM {
            Self::Truck
        } else if distance_km < SHIP_MAX_KM {
            Self::Ship
        } else {
            Self::Air
        }
    }
}

/// Pick the transport mode and its emission factor
///
/// A recognized override (`Truck`, `Ship`, `Air`, any case) replaces the
/// distance-based choice; anything else is ignored.
pub fn select_mode(distance_km: f64, override_mode: Option<&str>) -> (TransportMode, f64) {
    let mode = match override_mode.filter(|m| !m.trim().is_empty()) {
        Some(raw) => match TransportMode::parse(raw) {
            Some(mode) => {
                debug!("Transport override: {}", mode);
                mode
            }
            None => {
                warn!("Ignoring unrecognized transport override '{}'", raw);
                TransportMode::for_distance(distance_km)
            }
        },
        None => TransportMode::for_distance(distance_km),
    };
    (mode, mode.emission_factor())
}

/// `round(weight × factor × distance / 1000, 2)`
pub fn transport_carbon_kg(weight_kg: f64, emission_factor: f64, distance_km: f64) -> f64 {
    round_to(weight_kg * emission_factor * distance_km / 1000.0, 2)
}

/// `round(weight × material intensity, 2)`; unknown materials use the default intensity
pub fn material_carbon_kg(weight_kg: f64, material: &str, table: &MaterialTable) -> f64 {
    round_to(weight_kg * table.co2_intensity(material), 2)
}

/// Carbon estimate under the chosen method
pub fn estimate_carbon_kg(
    method: CarbonMethod,
    weight_kg: f64,
    emission_factor: f64,
    distance_km: f64,
    material: &str,
    table: &MaterialTable,
) -> f64 {
    match method {
        CarbonMethod::TransportDistance => {
            transport_carbon_kg(weight_kg, emission_factor, distance_km)
        }
        CarbonMethod::MaterialIntensity => material_carbon_kg(weight_kg, material, table),
    }
}
