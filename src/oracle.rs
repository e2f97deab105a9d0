//! Capability interfaces at the seam between the codec and a diagram engine.
//!
//! The exporter only needs to *walk* an existing diagram, so it consumes a [`Diagram`].
//! The importer never builds nodes itself: it hands an [`Oracle`] to an engine, which
//! asks for the root and then for children until the whole diagram is discovered.
//! Any engine implementing these contracts can be substituted for [`Zdd`][crate::zdd::Zdd].

use std::hash::Hash;

use crate::error::Result;
use crate::types::{Branch, Edge};

/// Read-only view of a rooted, levelled diagram.
///
/// # Contract
///
/// - Every non-terminal node has a positive level.
/// - Children of a node are terminals or nodes at a strictly lower level.
/// - Node identity is stable for the lifetime of the handle.
pub trait Diagram {
    /// Identity of a non-terminal node.
    type Node: Copy + Eq + Hash;

    /// The root edge. May be a terminal for constant diagrams.
    fn root(&self) -> Edge<Self::Node>;

    /// Branching level of a non-terminal node.
    fn level(&self, node: Self::Node) -> u32;

    /// The 0- or 1-child of a non-terminal node.
    fn child(&self, node: Self::Node, branch: Branch) -> Edge<Self::Node>;
}

/// Answer of an [`Oracle`] about where an edge leads.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Step<S> {
    /// The ⟂ terminal.
    Bottom,
    /// The ⊤ terminal.
    Top,
    /// A node in the given state at the given (positive) level.
    Node(S, u32),
}

/// Top-down description of a diagram, consumed by a construction engine.
///
/// The engine calls [`root`][Oracle::root] once, then [`child`][Oracle::child] for both
/// branches of every state it discovers. Equal `(state, level)` pairs denote the same node.
pub trait Oracle {
    /// Opaque per-node state.
    type State: Clone + Eq + Hash;

    /// Where the diagram starts.
    fn root(&self) -> Step<Self::State>;

    /// Where `branch` of the node `(state, level)` leads.
    fn child(&self, state: &Self::State, level: u32, branch: Branch) -> Result<Step<Self::State>>;
}
