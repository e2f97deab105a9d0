use std::fmt::{Display, Formatter};

/// Handle to a node owned by a [`Zdd`][crate::zdd::Zdd] manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Ref(u32);

impl Ref {
    /// The ⟂ terminal (empty family).
    pub const ZERO: Ref = Ref(0);
    /// The ⊤ terminal (family containing only the empty set).
    pub const ONE: Ref = Ref(1);

    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the index of the referenced node in the manager's storage.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_zero(self) -> bool {
        self.0 == Self::ZERO.0
    }
    pub const fn is_one(self) -> bool {
        self.0 == Self::ONE.0
    }
    pub const fn is_terminal(self) -> bool {
        self.is_zero() || self.is_one()
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Ref::ZERO => write!(f, "⊥"),
            Ref::ONE => write!(f, "⊤"),
            _ => write!(f, "@{}", self.0),
        }
    }
}
