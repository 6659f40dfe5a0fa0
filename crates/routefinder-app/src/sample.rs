//! Seed networks: the built-in demo and JSON network files.

use crate::PathfinderController;
use crate::forms::{CityForm, ConnectionForm};
use anyhow::{Context, Result};
use routefinder_core::{RouteError, TransportMode, format_distance};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSeed {
    pub from: String,
    pub to: String,
    pub distance: f64,
    #[serde(default)]
    pub mode: TransportMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSeed {
    pub cities: Vec<String>,
    #[serde(default)]
    pub connections: Vec<ConnectionSeed>,
}

impl NetworkSeed {
    /// Five Indian cities joined by bus and plane links.
    pub fn sample() -> Self {
        let connection = |from: &str, to: &str, distance: f64, mode| ConnectionSeed {
            from: from.to_string(),
            to: to.to_string(),
            distance,
            mode,
        };
        Self {
            cities: ["Delhi", "Mumbai", "Bangalore", "Kolkata", "Chennai"]
                .into_iter()
                .map(String::from)
                .collect(),
            connections: vec![
                connection("Delhi", "Mumbai", 1148.0, TransportMode::Plane),
                connection("Mumbai", "Bangalore", 842.0, TransportMode::Plane),
                connection("Bangalore", "Chennai", 290.0, TransportMode::Bus),
                connection("Chennai", "Kolkata", 1366.0, TransportMode::Plane),
                connection("Kolkata", "Delhi", 1305.0, TransportMode::Plane),
                connection("Delhi", "Bangalore", 1740.0, TransportMode::Plane),
            ],
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read network file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse network file {}", path.display()))
    }

    /// Feeds every city and connection through the controller's validated
    /// operations, stopping at the first rejection.
    pub fn apply(&self, controller: &PathfinderController) -> Result<(), RouteError> {
        for city in &self.cities {
            controller.add_city(&CityForm::new(city.as_str()))?;
        }
        for connection in &self.connections {
            controller.add_connection(&ConnectionForm {
                from: connection.from.clone(),
                to: connection.to.clone(),
                distance: format_distance(connection.distance),
                mode: connection.mode,
            })?;
        }
        tracing::info!(
            cities = self.cities.len(),
            connections = self.connections.len(),
            "Network seeded"
        );
        Ok(())
    }
}

pub fn seed_sample_network(controller: &PathfinderController) -> Result<(), RouteError> {
    NetworkSeed::sample().apply(controller)
}
