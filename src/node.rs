use crate::reference::Ref;

/// Decision node: branching level and the two children.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub level: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            level: 0,
            low: Ref::ZERO,
            high: Ref::ZERO,
        }
    }
}
