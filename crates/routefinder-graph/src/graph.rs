use crate::style::StyleConfig;
use routefinder_core::{City, CityId, ColorProfile, ConnectionId, RouteError, TransportMode};
use routefinder_events::{Event, EventBus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mutable presentation state of a connection. Only the highlight path
/// writes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeVisual {
    pub color: ColorProfile,
    pub width: f32,
    /// Colour from before the first path highlight, restored on reset.
    pub saved_color: Option<ColorProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEdge {
    pub id: ConnectionId,
    pub from: CityId,
    pub to: CityId,
    pub distance: f64,
    pub mode: TransportMode,
    pub visual: EdgeVisual,
}

impl ConnectionEdge {
    pub fn connects(&self, a: CityId, b: CityId) -> bool {
        (self.from == a && self.to == b) || (self.from == b && self.to == a)
    }

    /// The endpoint across from `city`, if `city` is an endpoint at all.
    pub fn other_end(&self, city: CityId) -> Option<CityId> {
        if self.from == city {
            Some(self.to)
        } else if self.to == city {
            Some(self.from)
        } else {
            None
        }
    }
}

/// Owned copy of the node and edge sets, for renderers that pull.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub cities: Vec<City>,
    pub connections: Vec<ConnectionEdge>,
}

/// Parses a distance typed into a form field.
pub fn parse_distance(raw: &str) -> Result<f64, RouteError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RouteError::validation(
            "Please fill in all fields for the connection.",
        ));
    }
    let distance: f64 = raw
        .parse()
        .map_err(|_| RouteError::validation(format!("Distance must be a number, got {raw:?}")))?;
    validate_distance(distance)?;
    Ok(distance)
}

pub fn validate_distance(distance: f64) -> Result<(), RouteError> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(RouteError::validation(format!(
            "Distance must be a positive number, got {distance}"
        )));
    }
    Ok(())
}

/// Owns every city and connection of the session graph.
#[derive(Debug)]
pub struct GraphStore {
    cities: Vec<City>,
    connections: Vec<ConnectionEdge>,
    city_map: HashMap<CityId, usize>,
    label_map: HashMap<String, CityId>,
    connection_map: HashMap<ConnectionId, usize>,
    next_city_id: i64,
    next_connection_id: i64,
    style: StyleConfig,
    events: Option<EventBus>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new(StyleConfig::default())
    }
}

impl GraphStore {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            cities: Vec::new(),
            connections: Vec::new(),
            city_map: HashMap::new(),
            label_map: HashMap::new(),
            connection_map: HashMap::new(),
            next_city_id: 1,
            next_connection_id: 1,
            style,
            events: None,
        }
    }

    /// Publish graph changes on `bus` from now on.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.events {
            bus.publish(event);
        }
    }

    pub fn add_city(&mut self, label: &str) -> Result<CityId, RouteError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(RouteError::validation("City name must not be empty."));
        }
        if self.label_map.contains_key(label) {
            return Err(RouteError::validation(format!(
                "City {label:?} already exists."
            )));
        }

        let id = CityId(self.next_city_id);
        self.next_city_id += 1;
        self.city_map.insert(id, self.cities.len());
        self.label_map.insert(label.to_string(), id);
        self.cities.push(City {
            id,
            label: label.to_string(),
        });

        tracing::debug!(city = %id, label, "City added");
        self.publish(Event::CityAdded {
            id,
            label: label.to_string(),
        });
        Ok(id)
    }

    pub fn add_connection(
        &mut self,
        from_label: &str,
        to_label: &str,
        distance: f64,
        mode: TransportMode,
    ) -> Result<ConnectionId, RouteError> {
        let (from_label, to_label) = (from_label.trim(), to_label.trim());
        if from_label.is_empty() || to_label.is_empty() {
            return Err(RouteError::validation(
                "Please fill in all fields for the connection.",
            ));
        }
        validate_distance(distance)?;

        let (Some(from), Some(to)) = (
            self.find_city_by_label(from_label).map(|c| c.id),
            self.find_city_by_label(to_label).map(|c| c.id),
        ) else {
            return Err(RouteError::not_found(
                "One or both cities not found. Please check your input.",
            ));
        };
        if from == to {
            return Err(RouteError::validation(
                "A connection needs two different cities.",
            ));
        }

        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;
        let visual = EdgeVisual {
            color: self.style.profile_for(mode),
            width: self.style.default_width,
            saved_color: None,
        };
        self.connection_map.insert(id, self.connections.len());
        self.connections.push(ConnectionEdge {
            id,
            from,
            to,
            distance,
            mode,
            visual,
        });

        tracing::debug!(connection = %id, from_label, to_label, distance, %mode, "Connection added");
        self.publish(Event::ConnectionAdded {
            id,
            from,
            to,
            distance,
            mode,
            color: visual.color,
            width: visual.width,
        });
        Ok(id)
    }

    /// Put every connection back to its resting look. Idempotent.
    pub fn reset_all_edge_highlights(&mut self) {
        let default_width = self.style.default_width;
        let mut changed = Vec::new();
        for edge in &mut self.connections {
            let before = edge.visual;
            if let Some(saved) = edge.visual.saved_color.take() {
                edge.visual.color = saved;
            }
            edge.visual.width = default_width;
            if edge.visual != before {
                changed.push((edge.id, edge.visual));
            }
        }

        for (id, visual) in changed {
            self.publish(Event::ConnectionStyleChanged {
                id,
                color: visual.color,
                width: visual.width,
            });
        }
        self.publish(Event::HighlightsCleared);
    }

    pub fn mark_edge_on_path(&mut self, id: ConnectionId) -> Result<(), RouteError> {
        let &idx = self
            .connection_map
            .get(&id)
            .ok_or_else(|| RouteError::not_found(format!("Connection {id} not found.")))?;
        let path_color = self.style.path_highlight;
        let highlight_width = self.style.highlight_width;

        let visual = &mut self.connections[idx].visual;
        if visual.saved_color.is_none() {
            visual.saved_color = Some(visual.color);
        }
        visual.color = path_color;
        visual.width = highlight_width;
        let visual = *visual;

        self.publish(Event::ConnectionStyleChanged {
            id,
            color: visual.color,
            width: visual.width,
        });
        Ok(())
    }

    pub fn find_city_by_label(&self, label: &str) -> Option<&City> {
        self.label_map.get(label).and_then(|id| self.city(*id))
    }

    pub fn city(&self, id: CityId) -> Option<&City> {
        self.city_map.get(&id).map(|&idx| &self.cities[idx])
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&ConnectionEdge> {
        self.connection_map
            .get(&id)
            .map(|&idx| &self.connections[idx])
    }

    /// Cheapest connection between two cities in either orientation.
    /// Parallel connections of equal distance resolve to the lowest id.
    pub fn find_edge_between(&self, a: CityId, b: CityId) -> Option<&ConnectionEdge> {
        self.connections
            .iter()
            .filter(|edge| edge.connects(a, b))
            .min_by(|x, y| {
                x.distance
                    .total_cmp(&y.distance)
                    .then_with(|| x.id.cmp(&y.id))
            })
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn connections(&self) -> &[ConnectionEdge] {
        &self.connections
    }

    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            cities: self.cities.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Inserts a connection without endpoint checks, to model corrupted data.
    #[cfg(test)]
    pub(crate) fn insert_unchecked_connection(
        &mut self,
        from: CityId,
        to: CityId,
        distance: f64,
    ) -> ConnectionId {
        let id = ConnectionId(self.next_connection_id);
        self.next_connection_id += 1;
        self.connection_map.insert(id, self.connections.len());
        self.connections.push(ConnectionEdge {
            id,
            from,
            to,
            distance,
            mode: TransportMode::Bus,
            visual: EdgeVisual {
                color: self.style.bus,
                width: self.style.default_width,
                saved_color: None,
            },
        });
        id
    }
}
