//! Diagram to text.
//!
//! Every node reachable from the root gets a dense id in `1..=N`, assigned in
//! ascending level order, and is written as one line:
//!
//! ```text
//! <id> <level> <lo> <hi>
//! ```
//!
//! where `lo`/`hi` are child ids or the terminal markers `B` (⊥) and `T` (⊤).
//! Lines appear in id order, so children always precede their parents and the root
//! comes last. A single `.` line terminates the output.
//!
//! ```
//! use dd_converter::zdd::Zdd;
//!
//! let zdd = Zdd::new();
//! let x1 = zdd.mk_node(1, zdd.zero(), zdd.one());
//! let f = zdd.mk_node(2, x1, zdd.zero());
//! assert_eq!(zdd.to_text(f), "1 1 B T\n2 2 1 B\n.\n");
//! ```

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{info, warn};

use crate::oracle::Diagram;
use crate::reference::Ref;
use crate::types::{Branch, Edge};
use crate::zdd::Zdd;

/// Slot in the identity table.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Label {
    Bottom,
    Top,
    /// Discovered, id not yet assigned.
    Pending,
    Id(u64),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Bottom => write!(f, "B"),
            Label::Top => write!(f, "T"),
            Label::Id(id) => write!(f, "{}", id),
            Label::Pending => unreachable!("node emitted before its id was assigned"),
        }
    }
}

/// Writes the text encoding of `diagram` to `out`.
///
/// The traversal is read-only; calling this twice on the same diagram produces
/// byte-identical output. A constant diagram produces only the terminator line.
pub fn write_diagram<D, W>(diagram: &D, out: &mut W) -> io::Result<()>
where
    D: Diagram,
    W: Write,
{
    let root = match diagram.root() {
        Edge::Node(node) => node,
        Edge::Bottom => return writeln!(out, "."),
        Edge::Top => {
            warn!("The ⊤ diagram has no node lines, it will read back as ⊥");
            return writeln!(out, ".");
        }
    };

    let mut labels: HashMap<Edge<D::Node>, Label> = HashMap::new();
    labels.insert(Edge::Bottom, Label::Bottom);
    labels.insert(Edge::Top, Label::Top);
    labels.insert(Edge::Node(root), Label::Pending);

    // Discover all reachable nodes, grouped by level in discovery order.
    let mut levels: BTreeMap<u32, Vec<D::Node>> = BTreeMap::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        levels.entry(diagram.level(node)).or_default().push(node);
        for branch in Branch::ALL {
            let child = diagram.child(node, branch);
            if let Entry::Vacant(e) = labels.entry(child) {
                e.insert(Label::Pending);
                stack.extend(child.node());
            }
        }
    }

    let mut next_id = 0;
    for nodes in levels.values() {
        for &node in nodes {
            next_id += 1;
            labels.insert(Edge::Node(node), Label::Id(next_id));
        }
    }

    for (&level, nodes) in levels.iter() {
        for &node in nodes {
            let id = labels[&Edge::Node(node)];
            let lo = labels[&diagram.child(node, Branch::Lo)];
            let hi = labels[&diagram.child(node, Branch::Hi)];
            writeln!(out, "{} {} {} {}", id, level, lo, hi)?;
        }
    }
    writeln!(out, ".")?;

    info!("Exported {} nodes over {} levels", next_id, levels.len());
    Ok(())
}

/// Text encoding of `diagram` as a `String`.
pub fn diagram_to_string<D: Diagram>(diagram: &D) -> String {
    let mut buffer = Vec::new();
    write_diagram(diagram, &mut buffer).expect("writing to a Vec cannot fail");
    String::from_utf8(buffer).expect("the text encoding is ASCII")
}

impl Zdd {
    /// Writes the diagram rooted at `f` in the text format.
    pub fn write_text<W: Write>(&self, f: Ref, out: &mut W) -> io::Result<()> {
        write_diagram(&self.diagram(f), out)
    }

    /// Converts the diagram rooted at `f` to the text format.
    pub fn to_text(&self, f: Ref) -> String {
        diagram_to_string(&self.diagram(f))
    }

    /// Saves the diagram rooted at `f` to a file in the text format.
    pub fn save_text<P: AsRef<Path>>(&self, f: Ref, path: P) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_text(f, &mut out)?;
        out.flush()
    }
}
