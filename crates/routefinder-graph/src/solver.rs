//! Single-source shortest paths over the city graph.
//!
//! Connections are undirected. Between any pair of cities only the cheapest
//! parallel connection counts, which is the same connection
//! [`GraphStore::find_edge_between`] hands to the highlighter.

use crate::graph::GraphStore;
use routefinder_core::{CityId, ConnectionId, RouteError, Solution};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap, HashSet};

/// Effective link between two adjacent cities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hop {
    pub distance: f64,
    pub connection: ConnectionId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    distance: f64,
    city: CityId,
}

impl Eq for Frontier {}

// Min-heap on (distance, city id): equal distances settle the lowest id first.
impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.city.cmp(&self.city))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest route as ids, before labels are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub cities: Vec<CityId>,
    pub distance: f64,
}

pub struct PathSolver<'a> {
    store: &'a GraphStore,
    adjacency: BTreeMap<CityId, BTreeMap<CityId, Hop>>,
}

impl<'a> PathSolver<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        let mut adjacency: BTreeMap<CityId, BTreeMap<CityId, Hop>> = store
            .cities()
            .iter()
            .map(|city| (city.id, BTreeMap::new()))
            .collect();

        for edge in store.connections() {
            if !adjacency.contains_key(&edge.from) || !adjacency.contains_key(&edge.to) {
                tracing::warn!(
                    "Ignoring connection {} because endpoint {} or {} is not a known city",
                    edge.id,
                    edge.from,
                    edge.to
                );
                continue;
            }
            let hop = Hop {
                distance: edge.distance,
                connection: edge.id,
            };
            for (a, b) in [(edge.from, edge.to), (edge.to, edge.from)] {
                if let Some(neighbors) = adjacency.get_mut(&a) {
                    neighbors
                        .entry(b)
                        .and_modify(|current| {
                            if cheaper(&hop, current) {
                                *current = hop;
                            }
                        })
                        .or_insert(hop);
                }
            }
        }

        Self { store, adjacency }
    }

    /// Weight the solver uses between two adjacent cities.
    pub fn effective_hop(&self, a: CityId, b: CityId) -> Option<Hop> {
        self.adjacency.get(&a).and_then(|n| n.get(&b)).copied()
    }

    pub fn solve(&self, start_label: &str, end_label: &str) -> Result<Solution, RouteError> {
        let (start_label, end_label) = (start_label.trim(), end_label.trim());
        if start_label.is_empty() || end_label.is_empty() {
            return Err(RouteError::validation(
                "Please select both start and end cities.",
            ));
        }
        let (Some(start), Some(end)) = (
            self.store.find_city_by_label(start_label),
            self.store.find_city_by_label(end_label),
        ) else {
            return Err(RouteError::not_found(
                "Start or end city not found in the network.",
            ));
        };

        let Some(plan) = self.shortest_path(start.id, end.id) else {
            tracing::info!("No route between {} and {}", start_label, end_label);
            return Ok(Solution::unreachable());
        };

        let path = plan
            .cities
            .iter()
            .filter_map(|id| self.store.city(*id).map(|city| city.label.clone()))
            .collect();
        tracing::info!(
            distance = plan.distance,
            hops = plan.cities.len().saturating_sub(1),
            "Solved {} -> {}",
            start_label,
            end_label
        );
        Ok(Solution::reachable(path, plan.distance))
    }

    /// Cheapest route from `start` to `end`.
    ///
    /// The search always starts at the lower id, so both directions of a pair
    /// sum the same hops in the same order and report identical distances.
    pub fn shortest_path(&self, start: CityId, end: CityId) -> Option<RoutePlan> {
        if start <= end {
            return self.search(start, end);
        }
        let mut plan = self.search(end, start)?;
        plan.cities.reverse();
        Some(plan)
    }

    /// Dijkstra from `start`, stopping once `end` is settled.
    fn search(&self, start: CityId, end: CityId) -> Option<RoutePlan> {
        if !self.adjacency.contains_key(&start) || !self.adjacency.contains_key(&end) {
            return None;
        }

        let mut distances: HashMap<CityId, f64> = HashMap::new();
        let mut previous: HashMap<CityId, CityId> = HashMap::new();
        let mut settled: HashSet<CityId> = HashSet::new();
        let mut heap = BinaryHeap::new();

        distances.insert(start, 0.0);
        heap.push(Frontier {
            distance: 0.0,
            city: start,
        });

        while let Some(Frontier { distance, city }) = heap.pop() {
            if !settled.insert(city) {
                continue;
            }
            if city == end {
                break;
            }
            let Some(neighbors) = self.adjacency.get(&city) else {
                continue;
            };
            for (&next, hop) in neighbors {
                if settled.contains(&next) {
                    continue;
                }
                let alt = distance + hop.distance;
                // An overflowed `alt` is still a route; unvisited means no bound yet.
                if distances.get(&next).is_none_or(|&best| alt < best) {
                    distances.insert(next, alt);
                    previous.insert(next, city);
                    heap.push(Frontier {
                        distance: alt,
                        city: next,
                    });
                }
            }
        }
        tracing::debug!(settled = settled.len(), "Dijkstra finished");

        if !settled.contains(&end) {
            return None;
        }
        let distance = *distances.get(&end)?;

        let mut cities = vec![end];
        let mut current = end;
        while current != start {
            current = *previous.get(&current)?;
            cities.push(current);
            if cities.len() > self.adjacency.len() {
                tracing::warn!("Predecessor chain from {} loops; treating as unreachable", end);
                return None;
            }
        }
        cities.reverse();

        Some(RoutePlan { cities, distance })
    }
}

fn cheaper(candidate: &Hop, current: &Hop) -> bool {
    candidate
        .distance
        .total_cmp(&current.distance)
        .then_with(|| candidate.connection.cmp(&current.connection))
        == Ordering::Less
}

/// Shortest route between two labelled cities in the store's current graph.
pub fn solve(store: &GraphStore, start_label: &str, end_label: &str) -> Result<Solution, RouteError> {
    PathSolver::new(store).solve(start_label, end_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use routefinder_core::TransportMode;

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::default();
        for city in ["Delhi", "Mumbai", "Bangalore", "Kolkata", "Chennai"] {
            store.add_city(city).unwrap();
        }
        let connections = [
            ("Delhi", "Mumbai", 1148.0, TransportMode::Plane),
            ("Mumbai", "Bangalore", 842.0, TransportMode::Plane),
            ("Bangalore", "Chennai", 290.0, TransportMode::Bus),
            ("Chennai", "Kolkata", 1366.0, TransportMode::Plane),
            ("Kolkata", "Delhi", 1305.0, TransportMode::Plane),
            ("Delhi", "Bangalore", 1740.0, TransportMode::Plane),
        ];
        for (from, to, distance, mode) in connections {
            store.add_connection(from, to, distance, mode).unwrap();
        }
        store
    }

    #[test]
    fn test_sample_network_delhi_to_chennai() {
        let store = sample_store();
        let solution = solve(&store, "Delhi", "Chennai").unwrap();
        assert_eq!(solution.path, vec!["Delhi", "Bangalore", "Chennai"]);
        assert_eq!(solution.distance, Some(2030.0));
    }

    #[test]
    fn test_unknown_labels() {
        let store = sample_store();
        assert_eq!(
            solve(&store, "Delhi", "Pune"),
            Err(RouteError::not_found(
                "Start or end city not found in the network."
            ))
        );
        assert!(matches!(
            solve(&store, "", "Delhi"),
            Err(RouteError::Validation(_))
        ));
    }

    #[test]
    fn test_start_equals_end() {
        let store = sample_store();
        let solution = solve(&store, "Mumbai", "Mumbai").unwrap();
        assert_eq!(solution.path, vec!["Mumbai"]);
        assert_eq!(solution.distance, Some(0.0));
    }

    #[test]
    fn test_disconnected_components_are_unreachable() {
        let mut store = GraphStore::default();
        for city in ["A", "B", "C", "D"] {
            store.add_city(city).unwrap();
        }
        store.add_connection("A", "B", 1.0, TransportMode::Bus).unwrap();
        store.add_connection("C", "D", 1.0, TransportMode::Bus).unwrap();

        let solution = solve(&store, "A", "D").unwrap();
        assert!(!solution.is_reachable());
        assert!(solution.path.is_empty());
    }

    #[test]
    fn test_parallel_edges_use_minimum() {
        let mut store = GraphStore::default();
        store.add_city("A").unwrap();
        store.add_city("B").unwrap();
        store.add_connection("A", "B", 100.0, TransportMode::Plane).unwrap();
        let cheap = store.add_connection("A", "B", 50.0, TransportMode::Bus).unwrap();

        let solver = PathSolver::new(&store);
        let hop = solver.effective_hop(CityId(1), CityId(2)).unwrap();
        assert_eq!(hop.distance, 50.0);
        assert_eq!(hop.connection, cheap);
        assert_eq!(solver.effective_hop(CityId(2), CityId(1)), Some(hop));
        assert_eq!(solver.solve("A", "B").unwrap().distance, Some(50.0));
    }

    #[test]
    fn test_equal_routes_prefer_lower_ids() {
        let mut store = GraphStore::default();
        for city in ["A", "B", "C", "D"] {
            store.add_city(city).unwrap();
        }
        // A-C-D is added first, but B has the lower id and settles first.
        store.add_connection("A", "C", 1.0, TransportMode::Bus).unwrap();
        store.add_connection("C", "D", 1.0, TransportMode::Bus).unwrap();
        store.add_connection("A", "B", 1.0, TransportMode::Bus).unwrap();
        store.add_connection("B", "D", 1.0, TransportMode::Bus).unwrap();

        for _ in 0..5 {
            let solution = solve(&store, "A", "D").unwrap();
            assert_eq!(solution.path, vec!["A", "B", "D"]);
            assert_eq!(solution.distance, Some(2.0));
        }
    }

    #[test]
    fn test_dangling_endpoint_is_not_routable() {
        let mut store = GraphStore::default();
        let a = store.add_city("A").unwrap();
        let b = store.add_city("B").unwrap();
        let ghost = CityId(99);
        store.insert_unchecked_connection(a, ghost, 1.0);
        store.insert_unchecked_connection(ghost, b, 1.0);

        let solver = PathSolver::new(&store);
        assert!(solver.effective_hop(a, ghost).is_none());
        let solution = solver.solve("A", "B").unwrap();
        assert!(!solution.is_reachable());
    }

    #[test]
    fn test_long_detour_beats_expensive_direct_link() {
        let mut store = GraphStore::default();
        for city in ["A", "B", "C", "D", "E"] {
            store.add_city(city).unwrap();
        }
        store.add_connection("A", "E", 100.0, TransportMode::Plane).unwrap();
        for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "E")] {
            store.add_connection(from, to, 10.0, TransportMode::Bus).unwrap();
        }
        let solution = solve(&store, "E", "A").unwrap();
        assert_eq!(solution.path, vec!["E", "D", "C", "B", "A"]);
        assert_eq!(solution.distance, Some(40.0));
    }

    #[test]
    fn test_fractional_distances_match_in_both_directions() {
        let mut store = GraphStore::default();
        for city in ["A", "B", "C", "D"] {
            store.add_city(city).unwrap();
        }
        store.add_connection("A", "B", 0.1, TransportMode::Bus).unwrap();
        store.add_connection("B", "C", 0.2, TransportMode::Bus).unwrap();
        store.add_connection("C", "D", 0.3, TransportMode::Bus).unwrap();

        let there = solve(&store, "A", "D").unwrap();
        let back = solve(&store, "D", "A").unwrap();
        assert_eq!(there.distance, back.distance);
        assert_eq!(there.path, vec!["A", "B", "C", "D"]);
        assert_eq!(back.path, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn test_overflowing_total_is_still_reachable() {
        let mut store = GraphStore::default();
        for city in ["A", "B", "C"] {
            store.add_city(city).unwrap();
        }
        store.add_connection("A", "B", 1e308, TransportMode::Plane).unwrap();
        store.add_connection("B", "C", 1e308, TransportMode::Plane).unwrap();

        let solution = solve(&store, "A", "C").unwrap();
        assert!(solution.is_reachable());
        assert_eq!(solution.path, vec!["A", "B", "C"]);
        assert_eq!(solution.distance, Some(f64::INFINITY));
        assert_eq!(solve(&store, "C", "A").unwrap().path, vec!["C", "B", "A"]);
    }

    // ========================================================================
    // Property-Based Tests
    // ========================================================================

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        const LABELS: [&str; 7] = ["N0", "N1", "N2", "N3", "N4", "N5", "N6"];

        /// Up to 7 cities and random links. Weights are counted in tenths, so
        /// the store sees fractional distances while the brute force stays exact.
        fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u32)>)> {
            (2usize..=7).prop_flat_map(|n| {
                let links = proptest::collection::vec((0..n, 0..n, 1u32..=50), 0..=14);
                (Just(n), links)
            })
        }

        fn build(n: usize, links: &[(usize, usize, u32)]) -> GraphStore {
            let mut store = GraphStore::default();
            for label in &LABELS[..n] {
                store.add_city(label).unwrap();
            }
            for &(a, b, w) in links {
                if a != b {
                    store
                        .add_connection(LABELS[a], LABELS[b], tenths(w), TransportMode::Bus)
                        .unwrap();
                }
            }
            store
        }

        fn tenths(w: u32) -> f64 {
            f64::from(w) / 10.0
        }

        /// Exhaustive search over every simple path, in tenths.
        fn brute_force(n: usize, links: &[(usize, usize, u32)], start: usize, end: usize) -> Option<u64> {
            let mut weights = vec![vec![None::<u64>; n]; n];
            for &(a, b, w) in links {
                if a == b {
                    continue;
                }
                let w = w as u64;
                for (x, y) in [(a, b), (b, a)] {
                    weights[x][y] = Some(weights[x][y].map_or(w, |cur: u64| cur.min(w)));
                }
            }

            fn walk(
                weights: &[Vec<Option<u64>>],
                at: usize,
                end: usize,
                visited: &mut Vec<bool>,
                cost: u64,
                best: &mut Option<u64>,
            ) {
                if at == end {
                    *best = Some(best.map_or(cost, |b| b.min(cost)));
                    return;
                }
                for next in 0..weights.len() {
                    if let Some(w) = weights[at][next] {
                        if !visited[next] {
                            visited[next] = true;
                            walk(weights, next, end, visited, cost + w, best);
                            visited[next] = false;
                        }
                    }
                }
            }

            let mut visited = vec![false; n];
            visited[start] = true;
            let mut best = None;
            walk(&weights, start, end, &mut visited, 0, &mut best);
            best
        }

        proptest! {
            #[test]
            fn prop_distance_is_optimal(
                (n, links) in graph_strategy(),
                start_seed in 0usize..7,
                end_seed in 0usize..7,
            ) {
                let (start, end) = (start_seed % n, end_seed % n);
                let store = build(n, &links);
                let solution = solve(&store, LABELS[start], LABELS[end]).unwrap();
                let expected = brute_force(n, &links, start, end);

                prop_assert_eq!(solution.is_reachable(), expected.is_some());
                if let (Some(found), Some(exact)) = (solution.distance, expected) {
                    prop_assert!((found - exact as f64 / 10.0).abs() < 1e-9);
                }
                if solution.is_reachable() {
                    prop_assert_eq!(solution.path.first().map(String::as_str), Some(LABELS[start]));
                    prop_assert_eq!(solution.path.last().map(String::as_str), Some(LABELS[end]));
                } else {
                    prop_assert!(solution.path.is_empty());
                }
            }

            #[test]
            fn prop_path_weights_sum_to_distance(
                (n, links) in graph_strategy(),
                start_seed in 0usize..7,
                end_seed in 0usize..7,
            ) {
                let store = build(n, &links);
                let solution = solve(&store, LABELS[start_seed % n], LABELS[end_seed % n]).unwrap();
                if let Some(distance) = solution.distance {
                    let mut total = 0.0;
                    for (a, b) in solution.hops() {
                        let a = store.find_city_by_label(a).unwrap().id;
                        let b = store.find_city_by_label(b).unwrap().id;
                        total += store.find_edge_between(a, b).unwrap().distance;
                    }
                    prop_assert!((total - distance).abs() < 1e-9);
                }
            }

            #[test]
            fn prop_solve_is_deterministic(
                (n, links) in graph_strategy(),
                start_seed in 0usize..7,
                end_seed in 0usize..7,
            ) {
                let store = build(n, &links);
                let (start, end) = (LABELS[start_seed % n], LABELS[end_seed % n]);
                let first = solve(&store, start, end).unwrap();
                for _ in 0..3 {
                    prop_assert_eq!(&solve(&store, start, end).unwrap(), &first);
                }
            }

            #[test]
            fn prop_distance_is_symmetric(
                (n, links) in graph_strategy(),
                a_seed in 0usize..7,
                b_seed in 0usize..7,
            ) {
                let store = build(n, &links);
                let (a, b) = (LABELS[a_seed % n], LABELS[b_seed % n]);
                let there = solve(&store, a, b).unwrap();
                let back = solve(&store, b, a).unwrap();
                prop_assert_eq!(there.distance, back.distance);
                let mut mirrored = back.path.clone();
                mirrored.reverse();
                prop_assert_eq!(there.path, mirrored);
            }
        }
    }
}
