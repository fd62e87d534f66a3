//! Maximum flow over a capacitated directed graph.
//!
//! Only what the staffing network needs: integer capacities, a single
//! source and sink, and per-edge flow readout after the run.
//!
//! # Algorithm
//!
//! Edmonds-Karp: Ford-Fulkerson with BFS-chosen (shortest) augmenting
//! paths, giving an O(VE²) bound independent of capacities.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 26.2

mod network;

pub use network::{EdgeId, FlowNetwork, MaxFlow, NodeId};
