//! Small shared types: branch labels and terminal-aware edges.
use std::fmt;

/// Outgoing edge label of a decision node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Branch {
    /// The 0-labelled edge (variable absent).
    Lo,
    /// The 1-labelled edge (variable present).
    Hi,
}

impl Branch {
    /// Both branches, 0-edge first.
    pub const ALL: [Branch; 2] = [Branch::Lo, Branch::Hi];
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Lo => write!(f, "lo"),
            Branch::Hi => write!(f, "hi"),
        }
    }
}

/// Target of an edge: one of the two terminals, or a non-terminal node.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Edge<N> {
    /// The ⟂ terminal.
    Bottom,
    /// The ⊤ terminal.
    Top,
    /// A non-terminal node.
    Node(N),
}

impl<N> Edge<N> {
    /// The node behind a non-terminal edge.
    pub fn node(self) -> Option<N> {
        match self {
            Edge::Node(n) => Some(n),
            _ => None,
        }
    }
}
