//! Reference construction engine for zero-suppressed decision diagrams.
//!
//! The manager owns all nodes. Identical `(level, low, high)` triples are shared
//! (hash consing), so two isomorphic diagrams built in the same manager have the same
//! [`Ref`]. Levels grow from the terminals (level 0) towards the root.
//!
//! Diagrams enter the manager through [`Zdd::build`], which consumes any [`Oracle`].
//! Construction only shares nodes; the zero-suppression rule is applied on demand
//! by [`Zdd::reduce`].
//!
//! ```
//! use dd_converter::zdd::Zdd;
//!
//! let zdd = Zdd::new();
//! let x1 = zdd.mk_node(1, zdd.zero(), zdd.one());
//! let f = zdd.mk_node(2, x1, zdd.zero());
//! assert_eq!(zdd.size(f), 2);
//! assert_eq!(zdd.reduce(f), x1);
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use log::debug;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::oracle::{Diagram, Oracle, Step};
use crate::reference::Ref;
use crate::types::{Branch, Edge};

pub struct Zdd {
    /// Node storage. Index 0 = ZERO terminal, index 1 = ONE terminal.
    nodes: RefCell<Vec<Node>>,
    /// Unique table.
    unique: RefCell<HashMap<Node, Ref>>,
}

impl Zdd {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a manager with the specified initial node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(2));
        nodes.push(Node::default()); // ⊥
        nodes.push(Node::default()); // ⊤

        Self {
            nodes: RefCell::new(nodes),
            unique: RefCell::new(HashMap::with_capacity(capacity)),
        }
    }
}

impl Default for Zdd {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Zdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Zdd")
            .field("capacity", &self.nodes.borrow().capacity())
            .field("size", &self.num_nodes())
            .finish()
    }
}

impl Zdd {
    pub fn zero(&self) -> Ref {
        Ref::ZERO
    }
    pub fn one(&self) -> Ref {
        Ref::ONE
    }

    /// Number of non-terminal nodes allocated so far.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - 2
    }

    pub fn node(&self, f: Ref) -> Node {
        self.nodes.borrow()[f.index()]
    }
    pub fn level(&self, f: Ref) -> u32 {
        self.node(f).level
    }
    pub fn low(&self, f: Ref) -> Ref {
        self.node(f).low
    }
    pub fn high(&self, f: Ref) -> Ref {
        self.node(f).high
    }
    pub fn child(&self, f: Ref, branch: Branch) -> Ref {
        match branch {
            Branch::Lo => self.low(f),
            Branch::Hi => self.high(f),
        }
    }
}

impl Zdd {
    /// Returns the shared node `(level, low, high)`, creating it if needed.
    ///
    /// No reduction rule is applied.
    pub fn mk_node(&self, level: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(level, 0, "Level 0 is reserved for terminals");
        debug_assert!(low.is_terminal() || self.level(low) < level);
        debug_assert!(high.is_terminal() || self.level(high) < level);

        let node = Node { level, low, high };
        if let Some(&res) = self.unique.borrow().get(&node) {
            return res;
        }

        let mut nodes = self.nodes.borrow_mut();
        let res = Ref::new(nodes.len() as u32);
        nodes.push(node);
        self.unique.borrow_mut().insert(node, res);
        res
    }

    /// Like [`mk_node`][Zdd::mk_node], but applies zero-suppression:
    /// a node whose 1-branch is ⊥ is replaced by its 0-branch.
    pub fn mk_zdd_node(&self, level: u32, low: Ref, high: Ref) -> Ref {
        if high.is_zero() {
            return low;
        }
        self.mk_node(level, low, high)
    }
}

impl Zdd {
    /// Builds the diagram described by `oracle`.
    ///
    /// States are explored depth-first with an explicit stack and memoised on
    /// `(state, level)`, so the depth of the diagram is not limited by the call stack.
    /// Any error reported by the oracle aborts the construction.
    ///
    /// # Errors
    ///
    /// - Whatever the oracle reports from [`Oracle::child`].
    /// - [`Error::LevelOrder`] if a child is not strictly below its parent.
    pub fn build<O: Oracle>(&self, oracle: &O) -> Result<Ref> {
        let mut memo: HashMap<(O::State, u32), Ref> = HashMap::new();
        let root = oracle.root();

        let mut stack = Vec::new();
        if let Some(key) = node_key(&root) {
            stack.push(Frame::Enter(key));
        }

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(key) => {
                    if memo.contains_key(&key) {
                        continue;
                    }
                    let (state, level) = &key;
                    let level = *level;

                    let lo = oracle.child(state, level, Branch::Lo)?;
                    check_order(level, &lo)?;
                    let hi = oracle.child(state, level, Branch::Hi)?;
                    check_order(level, &hi)?;

                    // Children are finished before their parent; 0-child first.
                    let children = [node_key(&hi), node_key(&lo)];
                    stack.push(Frame::Exit(key, lo, hi));
                    for child in children.into_iter().flatten() {
                        if !memo.contains_key(&child) {
                            stack.push(Frame::Enter(child));
                        }
                    }
                }
                Frame::Exit(key, lo, hi) => {
                    let low = resolve(&memo, &lo);
                    let high = resolve(&memo, &hi);
                    let res = self.mk_node(key.1, low, high);
                    memo.insert(key, res);
                }
            }
        }

        let res = resolve(&memo, &root);
        debug!("build: {} states visited, root = {}", memo.len(), res);
        Ok(res)
    }

    /// Applies the zero-suppression rule to every node reachable from `f`.
    pub fn reduce(&self, f: Ref) -> Ref {
        let mut memo: HashMap<Ref, Ref> = HashMap::new();
        let reduced = |memo: &HashMap<Ref, Ref>, g: Ref| if g.is_terminal() { g } else { memo[&g] };

        // (node, children done)
        let mut stack = vec![(f, false)];
        while let Some((node, expanded)) = stack.pop() {
            if node.is_terminal() || (!expanded && memo.contains_key(&node)) {
                continue;
            }
            let Node { level, low, high } = self.node(node);
            if expanded {
                let res = self.mk_zdd_node(level, reduced(&memo, low), reduced(&memo, high));
                memo.insert(node, res);
            } else {
                stack.push((node, true));
                stack.push((high, false));
                stack.push((low, false));
            }
        }

        let res = reduced(&memo, f);
        debug!("reduce({}) = {}", f, res);
        res
    }

    /// Number of non-terminal nodes reachable from `f`.
    pub fn size(&self, f: Ref) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![f];
        while let Some(node) = stack.pop() {
            if node.is_terminal() || !visited.insert(node) {
                continue;
            }
            stack.push(self.low(node));
            stack.push(self.high(node));
        }
        visited.len()
    }
}

/// Pending work of [`Zdd::build`].
enum Frame<S> {
    /// Query the children of this node.
    Enter((S, u32)),
    /// Both children are built; create the node.
    Exit((S, u32), Step<S>, Step<S>),
}

/// Memo key of a non-terminal step. Level 0 is the ⊥ terminal in the oracle protocol.
fn node_key<S: Clone>(step: &Step<S>) -> Option<(S, u32)> {
    match step {
        Step::Node(state, level) if *level > 0 => Some((state.clone(), *level)),
        _ => None,
    }
}

fn resolve<S: Clone + Eq + Hash>(memo: &HashMap<(S, u32), Ref>, step: &Step<S>) -> Ref {
    match node_key(step) {
        Some(key) => memo[&key],
        None if matches!(step, Step::Top) => Ref::ONE,
        None => Ref::ZERO,
    }
}

fn check_order<S>(parent_level: u32, child: &Step<S>) -> Result<()> {
    match *child {
        Step::Node(_, child_level) if child_level >= parent_level => Err(Error::LevelOrder {
            parent_level,
            child_level,
        }),
        _ => Ok(()),
    }
}

impl Zdd {
    /// A [`Diagram`] handle rooted at `f`.
    pub fn diagram(&self, f: Ref) -> ZddDiagram<'_> {
        ZddDiagram { zdd: self, root: f }
    }
}

/// A diagram in a [`Zdd`] manager together with its root.
#[derive(Debug, Copy, Clone)]
pub struct ZddDiagram<'a> {
    zdd: &'a Zdd,
    root: Ref,
}

impl ZddDiagram<'_> {
    fn edge(f: Ref) -> Edge<Ref> {
        match f {
            Ref::ZERO => Edge::Bottom,
            Ref::ONE => Edge::Top,
            _ => Edge::Node(f),
        }
    }
}

impl Diagram for ZddDiagram<'_> {
    type Node = Ref;

    fn root(&self) -> Edge<Ref> {
        Self::edge(self.root)
    }

    fn level(&self, node: Ref) -> u32 {
        self.zdd.level(node)
    }

    fn child(&self, node: Ref, branch: Branch) -> Edge<Ref> {
        Self::edge(self.zdd.child(node, branch))
    }
}
