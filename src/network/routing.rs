//! Per-layer routing graphs.
//!
//! A [`RoutingGraph`] maps each neuron of a layer to the ordered list of
//! neurons it feeds in the *next* layer. Routes never skip layers or point
//! backwards, so the network is always strictly layered and acyclic.
//!
//! The order of destinations matters: inputs arrive at a destination in
//! (source index, route position) order, and backpropagation walks the same
//! routes in reverse to pair each connection with its weight.

use super::unit::Unit;
use crate::error::NetworkError;
use std::collections::BTreeMap;

/// Ordered adjacency from source neuron index to destination indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingGraph {
    routes: BTreeMap<usize, Vec<usize>>,
}

impl RoutingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Complete bipartite routing: every source feeds every destination.
    pub fn complete(sources: usize, destinations: usize) -> Self {
        let routes = (0..sources)
            .map(|s| (s, (0..destinations).collect()))
            .collect();
        Self { routes }
    }

    /// Neuron `i` feeds slot `i`. Used by the output layer.
    pub fn identity(size: usize) -> Self {
        let routes = (0..size).map(|i| (i, vec![i])).collect();
        Self { routes }
    }

    /// Overwrites the destinations of one source.
    pub fn set_route(&mut self, source: usize, destinations: Vec<usize>) {
        self.routes.insert(source, destinations);
    }

    /// Destinations of `source`, empty if it has no route.
    pub fn destinations(&self, source: usize) -> &[usize] {
        self.routes.get(&source).map_or(&[], Vec::as_slice)
    }

    /// Iterates `(source, destinations)` in ascending source order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.routes.iter().map(|(&s, d)| (s, d.as_slice()))
    }

    /// Number of sources with an explicit route entry.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// How many connections arrive at each of `destinations` neurons.
    pub fn fan_in(&self, destinations: usize) -> Vec<usize> {
        let mut counts = vec![0; destinations];
        for dests in self.routes.values() {
            for &d in dests {
                if let Some(c) = counts.get_mut(d) {
                    *c += 1;
                }
            }
        }
        counts
    }

    /// Checks that every destination exists in a next layer of
    /// `next_len` neurons. `layer` is only used for error reporting.
    pub fn validate(&self, layer: usize, next_len: usize) -> Result<(), NetworkError> {
        for (&source, dests) in &self.routes {
            if let Some(&bad) = dests.iter().find(|&&d| d >= next_len) {
                return Err(NetworkError::InvalidRoute {
                    layer,
                    neuron: source,
                    destination: bad,
                });
            }
        }
        Ok(())
    }
}

/// A layer of units plus its outbound routing.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub(crate) units: Vec<Unit>,
    pub(crate) routes: RoutingGraph,
    /// Whether `routes` is the generated complete routing. Cleared by any
    /// explicit route override so structural changes leave it alone.
    pub(crate) default_routing: bool,
}

impl Layer {
    pub(crate) fn with_units(size: usize) -> Self {
        Self {
            units: (0..size).map(|_| Unit::new()).collect(),
            routes: RoutingGraph::new(),
            default_routing: true,
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn routes(&self) -> &RoutingGraph {
        &self.routes
    }

    pub fn uses_default_routing(&self) -> bool {
        self.default_routing
    }

    /// Regenerates complete routing towards a next layer of `next_len`
    /// neurons, if this layer still uses default routing.
    pub(crate) fn refresh_default_routing(&mut self, next_len: usize) {
        if self.default_routing {
            self.routes = RoutingGraph::complete(self.units.len(), next_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_routing() {
        let g = RoutingGraph::complete(2, 3);
        assert_eq!(g.destinations(0), &[0, 1, 2]);
        assert_eq!(g.destinations(1), &[0, 1, 2]);
        assert_eq!(g.fan_in(3), vec![2, 2, 2]);
    }

    #[test]
    fn test_identity_routing() {
        let g = RoutingGraph::identity(3);
        assert_eq!(g.destinations(2), &[2]);
        assert_eq!(g.fan_in(3), vec![1, 1, 1]);
    }

    #[test]
    fn test_sparse_fan_in() {
        let mut g = RoutingGraph::complete(2, 3);
        g.set_route(0, vec![0, 1]);
        g.set_route(1, vec![1, 2]);
        assert_eq!(g.fan_in(3), vec![1, 2, 1]);
        assert_eq!(g.destinations(5), &[] as &[usize]);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut g = RoutingGraph::complete(2, 2);
        assert!(g.validate(0, 2).is_ok());
        g.set_route(1, vec![0, 4]);
        assert_eq!(
            g.validate(3, 2),
            Err(NetworkError::InvalidRoute {
                layer: 3,
                neuron: 1,
                destination: 4
            })
        );
    }

    #[test]
    fn test_custom_layer_keeps_routes() {
        let mut layer = Layer::with_units(2);
        layer.refresh_default_routing(3);
        assert_eq!(layer.routes().destinations(1), &[0, 1, 2]);

        layer.routes.set_route(0, vec![2]);
        layer.default_routing = false;
        layer.refresh_default_routing(5);
        assert_eq!(layer.routes().destinations(0), &[2]);
    }
}
