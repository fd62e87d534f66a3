//! Arena-backed flow network.
//!
//! Nodes are dense indices; edges live in one flat table. Every call to
//! [`FlowNetwork::add_edge`] pushes the original edge and its reverse
//! residual partner back to back, so original edges have even IDs,
//! partners odd IDs, and `reverse(reverse(e)) == e` always holds.
//!
//! # Reference
//! Edmonds & Karp (1972), "Theoretical Improvements in Algorithmic
//! Efficiency for Network Flow Problems"

use std::collections::{BTreeMap, VecDeque};

use tracing::trace;

/// Dense node index.
pub type NodeId = usize;

/// Index into the edge table.
pub type EdgeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    from: NodeId,
    to: NodeId,
    capacity: u64,
    residual: u64,
    reverse: EdgeId,
}

/// Outcome of a maximum-flow computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxFlow {
    /// Total flow from source to sink.
    pub value: u64,
    /// Flow per original `(from, to)` pair (parallel edges summed, zeros kept).
    pub flow_by_edge: BTreeMap<(NodeId, NodeId), u64>,
    /// Number of augmenting paths used.
    pub augmentations: usize,
}

impl MaxFlow {
    /// Flow on `(from, to)`, 0 when no such edge exists.
    pub fn flow(&self, from: NodeId, to: NodeId) -> u64 {
        self.flow_by_edge.get(&(from, to)).copied().unwrap_or(0)
    }
}

/// Directed capacity graph with residual bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    adjacency: Vec<Vec<EdgeId>>,
    edges: Vec<Edge>,
}

impl FlowNetwork {
    /// Creates a network with `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
            edges: Vec::new(),
        }
    }

    /// Appends a node and returns its ID.
    pub fn add_node(&mut self) -> NodeId {
        self.adjacency.push(Vec::new());
        self.adjacency.len() - 1
    }

    /// Number of nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of original (non-residual) edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len() / 2
    }

    /// Adds `from -> to` with `capacity`, plus its zero-capacity partner.
    ///
    /// Returns the ID of the original edge.
    ///
    /// # Panics
    /// If either endpoint is not a node of this network.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: u64) -> EdgeId {
        let n = self.node_count();
        assert!(
            from < n && to < n,
            "edge {from} -> {to} references a node outside 0..{n}"
        );

        let forward = self.edges.len();
        let backward = forward + 1;
        self.edges.push(Edge {
            from,
            to,
            capacity,
            residual: capacity,
            reverse: backward,
        });
        self.edges.push(Edge {
            from: to,
            to: from,
            capacity: 0,
            residual: 0,
            reverse: forward,
        });
        self.adjacency[from].push(forward);
        self.adjacency[to].push(backward);
        forward
    }

    /// The paired residual edge.
    #[inline]
    pub fn reverse(&self, edge: EdgeId) -> EdgeId {
        self.edges[edge].reverse
    }

    /// Endpoints of an edge.
    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        let e = &self.edges[edge];
        (e.from, e.to)
    }

    /// Original capacity (0 for residual partners).
    #[inline]
    pub fn capacity(&self, edge: EdgeId) -> u64 {
        self.edges[edge].capacity
    }

    /// Remaining residual capacity.
    #[inline]
    pub fn residual_capacity(&self, edge: EdgeId) -> u64 {
        self.edges[edge].residual
    }

    /// Flow currently routed over an original edge (0 for partners).
    #[inline]
    pub fn flow(&self, edge: EdgeId) -> u64 {
        let e = &self.edges[edge];
        e.capacity.saturating_sub(e.residual)
    }

    /// IDs of all original edges leaving `node`.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacency[node].iter().copied().filter(|e| e % 2 == 0)
    }

    /// Clears all routed flow.
    pub fn reset(&mut self) {
        for e in &mut self.edges {
            e.residual = e.capacity;
        }
    }

    /// Computes a maximum flow from `source` to `sink` (Edmonds-Karp).
    ///
    /// Any flow from a previous call is discarded first. Each round finds a
    /// shortest augmenting path by BFS over edges with positive residual
    /// capacity and pushes its bottleneck along it, so the number of rounds
    /// is O(VE).
    ///
    /// # Panics
    /// If `source == sink` or either is out of range.
    pub fn maximum_flow(&mut self, source: NodeId, sink: NodeId) -> MaxFlow {
        let n = self.node_count();
        assert!(
            source < n && sink < n,
            "source {source} / sink {sink} outside 0..{n}"
        );
        assert_ne!(source, sink, "source and sink must differ");

        self.reset();
        let mut value = 0u64;
        let mut augmentations = 0usize;

        while let Some(path) = self.shortest_augmenting_path(source, sink) {
            let bottleneck = path
                .iter()
                .map(|&e| self.edges[e].residual)
                .min()
                .unwrap_or(0);

            for &e in &path {
                self.edges[e].residual -= bottleneck;
                let rev = self.edges[e].reverse;
                self.edges[rev].residual += bottleneck;
            }

            value += bottleneck;
            augmentations += 1;
            trace!(augmentations, bottleneck, hops = path.len(), "augmented");
        }

        MaxFlow {
            value,
            flow_by_edge: self.flow_by_edge(),
            augmentations,
        }
    }

    /// Source side of the minimum cut left by the last max-flow run.
    ///
    /// `side[v]` is true iff `v` is reachable from `source` in the
    /// residual graph.
    pub fn min_cut(&self, source: NodeId) -> Vec<bool> {
        let mut side = vec![false; self.node_count()];
        side[source] = true;
        let mut queue = VecDeque::from([source]);

        while let Some(u) = queue.pop_front() {
            for &e in &self.adjacency[u] {
                let edge = &self.edges[e];
                if edge.residual > 0 && !side[edge.to] {
                    side[edge.to] = true;
                    queue.push_back(edge.to);
                }
            }
        }
        side
    }

    /// Total original capacity crossing from `side` to its complement.
    pub fn cut_capacity(&self, side: &[bool]) -> u64 {
        self.edges
            .iter()
            .step_by(2)
            .filter(|e| side[e.from] && !side[e.to])
            .map(|e| e.capacity)
            .sum()
    }

    fn shortest_augmenting_path(&self, source: NodeId, sink: NodeId) -> Option<Vec<EdgeId>> {
        let mut parent: Vec<Option<EdgeId>> = vec![None; self.node_count()];
        let mut visited = vec![false; self.node_count()];
        visited[source] = true;
        let mut queue = VecDeque::from([source]);

        'bfs: while let Some(u) = queue.pop_front() {
            for &e in &self.adjacency[u] {
                let edge = &self.edges[e];
                if edge.residual == 0 || visited[edge.to] {
                    continue;
                }
                visited[edge.to] = true;
                parent[edge.to] = Some(e);
                if edge.to == sink {
                    break 'bfs;
                }
                queue.push_back(edge.to);
            }
        }

        if !visited[sink] {
            return None;
        }

        let mut path = Vec::new();
        let mut node = sink;
        while let Some(e) = parent[node] {
            path.push(e);
            node = self.edges[e].from;
        }
        path.reverse();
        Some(path)
    }

    fn flow_by_edge(&self) -> BTreeMap<(NodeId, NodeId), u64> {
        let mut flows = BTreeMap::new();
        for (id, e) in self.edges.iter().enumerate().step_by(2) {
            *flows.entry((e.from, e.to)).or_insert(0) += self.flow(id);
        }
        flows
    }
}
