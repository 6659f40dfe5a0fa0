//! Raw input as the form widgets hand it over, and its validation.

use routefinder_core::{RouteError, TransportMode};
use routefinder_graph::parse_distance;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityForm {
    pub label: String,
}

impl CityForm {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionForm {
    pub from: String,
    pub to: String,
    /// Exactly as typed; parsed by [`ConnectionForm::validate`].
    pub distance: String,
    pub mode: TransportMode,
}

/// A connection request whose fields passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidConnection {
    pub from: String,
    pub to: String,
    pub distance: f64,
    pub mode: TransportMode,
}

impl ConnectionForm {
    pub fn validate(&self) -> Result<ValidConnection, RouteError> {
        let (from, to) = (self.from.trim(), self.to.trim());
        if from.is_empty() || to.is_empty() || self.distance.trim().is_empty() {
            return Err(RouteError::validation(
                "Please fill in all fields for the connection.",
            ));
        }
        Ok(ValidConnection {
            from: from.to_string(),
            to: to.to_string(),
            distance: parse_distance(&self.distance)?,
            mode: self.mode,
        })
    }
}

/// `FROM,TO,DISTANCE[,MODE]`, mode defaulting to bus.
impl FromStr for ConnectionForm {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let mode = match parts.len() {
            3 => TransportMode::default(),
            4 => parts[3].parse()?,
            _ => {
                return Err(RouteError::validation(format!(
                    "Expected FROM,TO,DISTANCE[,MODE], got {s:?}"
                )));
            }
        };
        Ok(Self {
            from: parts[0].to_string(),
            to: parts[1].to_string(),
            distance: parts[2].to_string(),
            mode,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveForm {
    pub start: String,
    pub end: String,
}

impl SolveForm {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}
