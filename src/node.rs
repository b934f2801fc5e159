use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// Decision node: `if variable then high else low`.
///
/// The terminal node has `variable == 0`. The `high` edge of a stored node is
/// never negated, which keeps complement-edge BDDs canonical.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub const TERMINAL: Node = Node {
        variable: 0,
        low: Ref::ONE,
        high: Ref::ONE,
    };

    pub fn is_terminal(&self) -> bool {
        self.variable == 0
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::TERMINAL
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.raw() as u64, self.high.raw() as u64)
    }
}
