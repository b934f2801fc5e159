use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// A reference to a BDD node, potentially negated (complement edge).
///
/// The least significant bit stores the negation flag, the remaining bits
/// store the node index. Node `0` is the terminal node, so [`Ref::ONE`] is the
/// positive reference to it and [`Ref::ZERO`] is its complement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    /// Constant true.
    pub const ONE: Self = Self(0);
    /// Constant false.
    pub const ZERO: Self = Self(1);

    pub const fn new(index: u32, negated: bool) -> Self {
        assert!(index < (1 << 31), "Node index is too large");
        Self((index << 1) | (negated as u32))
    }

    pub const fn positive(index: u32) -> Self {
        Self::new(index, false)
    }

    /// Index of the referenced node in the manager storage.
    pub const fn index(self) -> u32 {
        self.0 >> 1
    }

    pub const fn is_negated(self) -> bool {
        (self.0 & 1) != 0
    }

    /// The non-negated reference to the same node.
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }

    pub const fn is_terminal(self) -> bool {
        self.index() == 0
    }

    /// Return the internal representation of the reference.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Ref::ONE => write!(f, "@1"),
            Ref::ZERO => write!(f, "@0"),
            _ => write!(f, "{}@{}", if self.is_negated() { "~" } else { "" }, self.index()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminals() {
        assert_eq!(-Ref::ONE, Ref::ZERO);
        assert_eq!(-Ref::ZERO, Ref::ONE);
        assert!(Ref::ONE.is_terminal());
        assert!(Ref::ZERO.is_terminal());
        assert!(!Ref::ONE.is_negated());
        assert!(Ref::ZERO.is_negated());
    }

    #[test]
    fn test_negation() {
        let pos = Ref::positive(42);
        let neg = -pos;
        assert_eq!(pos.index(), 42);
        assert_eq!(neg.index(), 42);
        assert!(neg.is_negated());
        assert_eq!(neg.regular(), pos);
        assert_eq!(-(-pos), pos);
        assert!(!pos.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(Ref::ONE.to_string(), "@1");
        assert_eq!(Ref::ZERO.to_string(), "@0");
        assert_eq!(Ref::positive(7).to_string(), "@7");
        assert_eq!((-Ref::positive(7)).to_string(), "~@7");
    }
}
