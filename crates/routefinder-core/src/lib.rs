use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod color;
pub mod error;

pub use color::{Color, ColorParseError, ColorProfile};
pub use error::RouteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub i64);

impl fmt::Display for CityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConnectionId(pub i64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a connection is travelled. Only affects default styling, never cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Bus,
    Plane,
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "bus"),
            Self::Plane => write!(f, "plane"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bus" => Ok(Self::Bus),
            "plane" | "flight" => Ok(Self::Plane),
            other => Err(RouteError::validation(format!(
                "Unknown transport type: {other:?} (expected bus or plane)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct City {
    pub id: CityId,
    pub label: String,
}

/// One traversed hop of a solved route, in travel order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PathEdge {
    pub from: CityId,
    pub to: CityId,
}

/// Result of a shortest-path query.
///
/// `distance == None` is the unreachable sentinel. An unreachable solution
/// always carries an empty path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Solution {
    pub path: Vec<String>,
    pub distance: Option<f64>,
}

impl Solution {
    pub fn reachable(path: Vec<String>, distance: f64) -> Self {
        Self {
            path,
            distance: Some(distance),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            path: Vec::new(),
            distance: None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }

    /// Consecutive label pairs along the path.
    pub fn hops(&self) -> impl Iterator<Item = (&str, &str)> {
        self.path
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// `Delhi → Bangalore → Chennai`
    pub fn route_display(&self) -> String {
        self.path.join(" → ")
    }

    /// `2030 units`, or `unreachable`.
    pub fn distance_display(&self) -> String {
        match self.distance {
            Some(d) => format!("{} units", format_distance(d)),
            None => "unreachable".to_string(),
        }
    }
}

/// Whole distances print without a fractional part.
pub fn format_distance(distance: f64) -> String {
    if distance.fract() == 0.0 && distance.abs() < 1e15 {
        format!("{distance:.0}")
    } else {
        format!("{distance}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_mode_parse() {
        assert_eq!("bus".parse::<TransportMode>().unwrap(), TransportMode::Bus);
        assert_eq!(" Plane ".parse::<TransportMode>().unwrap(), TransportMode::Plane);
        assert!(matches!(
            "train".parse::<TransportMode>(),
            Err(RouteError::Validation(_))
        ));
    }

    #[test]
    fn test_transport_mode_serde_is_lowercase() {
        let json = serde_json::to_string(&TransportMode::Plane).unwrap();
        assert_eq!(json, "\"plane\"");
        let mode: TransportMode = serde_json::from_str("\"bus\"").unwrap();
        assert_eq!(mode, TransportMode::Bus);
    }

    #[test]
    fn test_solution_display() {
        let solution = Solution::reachable(
            vec!["Delhi".into(), "Bangalore".into(), "Chennai".into()],
            2030.0,
        );
        assert_eq!(solution.route_display(), "Delhi → Bangalore → Chennai");
        assert_eq!(solution.distance_display(), "2030 units");
        assert_eq!(solution.hop_count(), 2);
        let hops: Vec<_> = solution.hops().collect();
        assert_eq!(hops, vec![("Delhi", "Bangalore"), ("Bangalore", "Chennai")]);
    }

    #[test]
    fn test_unreachable_solution() {
        let solution = Solution::unreachable();
        assert!(!solution.is_reachable());
        assert!(solution.path.is_empty());
        assert_eq!(solution.hops().count(), 0);
        assert_eq!(solution.hop_count(), 0);
        assert_eq!(solution.distance_display(), "unreachable");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(2030.0), "2030");
        assert_eq!(format_distance(12.5), "12.5");
    }
}
