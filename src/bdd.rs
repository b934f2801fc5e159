//! The BDD manager.
//!
//! All Boolean functions are owned by a [`Bdd`] manager and referenced through
//! lightweight [`Ref`] handles. Nodes are hash-consed in a unique table, so for
//! the fixed variable order (variable index = level) every function has exactly
//! one representation. Negation is a complement edge and costs nothing.
//!
//! Operations take `&self`: the unique table and the computed table live behind
//! `RefCell`s, which makes the manager usable from many places at once within a
//! single thread.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::{Lit, Var};
use crate::utils::{pairing2, pairing3, MyHash};

/// Sizing knobs of the manager.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BddConfig {
    /// Initial number of unique-table buckets is `2^storage_bits`.
    pub storage_bits: usize,
    /// The computed table has `2^cache_bits` slots.
    pub cache_bits: usize,
}

impl Default for BddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 16,
            cache_bits: 16,
        }
    }
}

impl BddConfig {
    /// Largest table width, in bits.
    pub const MAX_BITS: usize = 31;

    /// Reject table widths the manager cannot allocate.
    pub fn validate(&self) -> Result<()> {
        if self.storage_bits > Self::MAX_BITS {
            return Err(Error::InvalidBddConfig {
                field: "storage",
                bits: self.storage_bits,
            });
        }
        if self.cache_bits > Self::MAX_BITS {
            return Err(Error::InvalidBddConfig {
                field: "cache",
                bits: self.cache_bits,
            });
        }
        Ok(())
    }

    pub fn with_storage_bits(mut self, bits: usize) -> Self {
        self.storage_bits = bits;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        self.cache_bits = bits;
        self
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum OpKey {
    Ite(Ref, Ref, Ref),
    Exists(Ref, Ref),
    RelProduct(Ref, Ref, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match *self {
            OpKey::Ite(f, g, h) => pairing2(0, pairing3(f.raw() as u64, g.raw() as u64, h.raw() as u64)),
            OpKey::Exists(f, c) => pairing2(1, pairing2(f.raw() as u64, c.raw() as u64)),
            OpKey::RelProduct(f, g, c) => pairing2(2, pairing3(f.raw() as u64, g.raw() as u64, c.raw() as u64)),
        }
    }
}

pub struct Bdd {
    storage: RefCell<Table<Node>>,
    cache: RefCell<Cache<OpKey, Ref>>,
    num_vars: Cell<u32>,
}

impl Bdd {
    pub fn new(config: BddConfig) -> Self {
        debug!("Bdd::new(config = {:?})", config);
        Self {
            storage: RefCell::new(Table::new(config.storage_bits, Node::TERMINAL)),
            cache: RefCell::new(Cache::new(config.cache_bits)),
            num_vars: Cell::new(0),
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(BddConfig::default())
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("nodes", &storage.size())
            .field("buckets", &storage.num_buckets())
            .field("num_vars", &self.num_vars.get())
            .finish()
    }
}

impl Bdd {
    pub fn zero(&self) -> Ref {
        Ref::ZERO
    }
    pub fn one(&self) -> Ref {
        Ref::ONE
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.is_terminal()
    }

    /// Number of nodes in the unique table, terminal included.
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().size()
    }

    /// Highest variable index seen so far.
    pub fn num_vars(&self) -> u32 {
        self.num_vars.get()
    }

    /// `(hits, misses)` of the computed table.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    fn node(&self, node: Ref) -> Node {
        *self.storage.borrow().value(node.index() as usize)
    }

    /// Top variable index of `node`, or `0` for terminals.
    pub fn variable(&self, node: Ref) -> u32 {
        self.node(node).variable
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.node(node).low;
        if node.is_negated() {
            -low
        } else {
            low
        }
    }

    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.node(node).high;
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        if low == high {
            return low;
        }

        // Keep the high edge regular
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        debug_assert!(low.is_terminal() || self.variable(low) > v, "Variable order violated");
        debug_assert!(high.is_terminal() || self.variable(high) > v, "Variable order violated");

        if v > self.num_vars.get() {
            self.num_vars.set(v);
        }

        let i = self.storage.borrow_mut().put(Node { variable: v, low, high });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: Var) -> Ref {
        self.mk_node(v.id(), Ref::ZERO, Ref::ONE)
    }

    pub fn mk_literal(&self, lit: Lit) -> Ref {
        let x = self.mk_var(lit.var());
        if lit.is_negative() {
            -x
        } else {
            x
        }
    }

    /// Allocate a fresh variable below every variable seen so far.
    pub fn allocate_variable(&self) -> Var {
        let v = Var::new(self.num_vars.get() + 1);
        self.num_vars.set(v.id());
        v
    }

    /// Conjunction of the given literals.
    ///
    /// Contradictory literals (`x` and `~x`) give the constant false.
    pub fn mk_cube<L>(&self, literals: impl IntoIterator<Item = L>) -> Ref
    where
        L: Into<Lit>,
    {
        let mut literals: Vec<Lit> = literals.into_iter().map(Into::into).collect();
        literals.sort();
        literals.dedup();
        if literals.windows(2).any(|w| w[0].var() == w[1].var()) {
            return Ref::ZERO;
        }

        let mut current = Ref::ONE;
        for lit in literals.into_iter().rev() {
            current = if lit.is_negative() {
                self.mk_node(lit.var().id(), current, Ref::ZERO)
            } else {
                self.mk_node(lit.var().id(), Ref::ZERO, current)
            };
        }
        current
    }

    /// Positive cube over `vars`, the canonical form of a quantification set.
    pub fn mk_var_cube(&self, vars: impl IntoIterator<Item = Var>) -> Ref {
        self.mk_cube(vars.into_iter().map(Var::pos))
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        if self.is_terminal(node) || v < self.variable(node) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // ite(1,G,H) => G
        // ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,G,~F) => ite(F,G,1)
        let g = if g == f {
            Ref::ONE
        } else if g == -f {
            Ref::ZERO
        } else {
            g
        };
        let h = if h == f {
            Ref::ZERO
        } else if h == -f {
            Ref::ONE
        } else {
            h
        };

        // ite(F,G,G) => G
        // ite(F,1,0) => F
        // ite(F,0,1) => ~F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // ite(~F,G,H) => ite(F,H,G)
        let (f, g, h) = if f.is_negated() { (-f, h, g) } else { (f, g, h) };

        // ite(F,~G,H) => ~ite(F,G,~H)
        let (g, h, negate) = if g.is_negated() { (-g, -h, true) } else { (g, h, false) };

        let key = OpKey::Ite(f, g, h);
        let cached = self.cache.borrow().get(&key).copied();
        let res = match cached {
            Some(res) => res,
            None => {
                let m = [f, g, h]
                    .into_iter()
                    .filter(|x| !x.is_terminal())
                    .map(|x| self.variable(x))
                    .min()
                    .expect("f is not terminal");

                let (f0, f1) = self.top_cofactors(f, m);
                let (g0, g1) = self.top_cofactors(g, m);
                let (h0, h1) = self.top_cofactors(h, m);

                let e = self.apply_ite(f0, g0, h0);
                let t = self.apply_ite(f1, g1, h1);

                let res = self.mk_node(m, e, t);
                debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
                self.cache.borrow_mut().insert(key, res);
                res
            }
        };

        if negate {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, Ref::ZERO)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, Ref::ONE, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, Ref::ONE)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = Ref::ONE;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = Ref::ZERO;
        for node in nodes {
            res = self.apply_or(res, node);
            if self.is_one(res) {
                break;
            }
        }
        res
    }

    /// Semantic equivalence: `f ↔ g` is the constant true.
    pub fn is_equivalent(&self, f: Ref, g: Ref) -> bool {
        self.is_one(self.apply_eq(f, g))
    }

    /// Check whether `f → g` is valid.
    pub fn is_implies(&self, f: Ref, g: Ref) -> bool {
        self.is_zero(self.apply_and(f, -g))
    }

    /// Restrict `f` under a (partial) assignment of variables.
    ///
    /// When `values` covers the whole support of `f`, the result is a terminal.
    pub fn restrict(&self, f: Ref, values: &HashMap<Var, bool>) -> Ref {
        let mut cache = HashMap::new();
        self.restrict_(f, values, &mut cache)
    }

    fn restrict_(&self, f: Ref, values: &HashMap<Var, bool>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) || values.is_empty() {
            return f;
        }
        if f.is_negated() {
            return -self.restrict_(-f, values, cache);
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f);
        let res = match values.get(&Var::new(v)) {
            Some(true) => self.restrict_(self.high_node(f), values, cache),
            Some(false) => self.restrict_(self.low_node(f), values, cache),
            None => {
                let low = self.restrict_(self.low_node(f), values, cache);
                let high = self.restrict_(self.high_node(f), values, cache);
                self.mk_node(v, low, high)
            }
        };
        cache.insert(f, res);
        res
    }

    /// Existential quantification: `∃vars. f`.
    pub fn exists(&self, f: Ref, vars: impl IntoIterator<Item = Var>) -> Ref {
        let cube = self.mk_var_cube(vars);
        self.exists_cube(f, cube)
    }

    /// Universal quantification: `∀vars. f`.
    pub fn forall(&self, f: Ref, vars: impl IntoIterator<Item = Var>) -> Ref {
        -self.exists(-f, vars)
    }

    /// Drop the leading variables of a positive cube that are above `v`.
    fn skip_cube(&self, mut cube: Ref, v: u32) -> Ref {
        while !self.is_one(cube) && self.variable(cube) < v {
            cube = self.high_node(cube);
        }
        cube
    }

    fn exists_cube(&self, f: Ref, cube: Ref) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        let v = self.variable(f);
        let cube = self.skip_cube(cube, v);
        if self.is_one(cube) {
            return f;
        }

        let key = OpKey::Exists(f, cube);
        if let Some(res) = self.cache.borrow().get(&key).copied() {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, v);
        let res = if self.variable(cube) == v {
            let rest = self.high_node(cube);
            let r0 = self.exists_cube(f0, rest);
            if self.is_one(r0) {
                r0
            } else {
                let r1 = self.exists_cube(f1, rest);
                self.apply_or(r0, r1)
            }
        } else {
            let low = self.exists_cube(f0, cube);
            let high = self.exists_cube(f1, cube);
            self.mk_node(v, low, high)
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Relational product: `∃vars. f ∧ g`, without building `f ∧ g` first.
    pub fn rel_product(&self, f: Ref, g: Ref, vars: impl IntoIterator<Item = Var>) -> Ref {
        let cube = self.mk_var_cube(vars);
        debug!("rel_product(f = {}, g = {}, cube = {})", f, g, cube);
        self.rel_product_cube(f, g, cube)
    }

    fn rel_product_cube(&self, f: Ref, g: Ref, cube: Ref) -> Ref {
        if self.is_zero(f) || self.is_zero(g) || f == -g {
            return Ref::ZERO;
        }
        if self.is_one(f) {
            return self.exists_cube(g, cube);
        }
        if self.is_one(g) || f == g {
            return self.exists_cube(f, cube);
        }

        let (f, g) = if f.raw() <= g.raw() { (f, g) } else { (g, f) };
        let m = self.variable(f).min(self.variable(g));
        let cube = self.skip_cube(cube, m);
        if self.is_one(cube) {
            return self.apply_and(f, g);
        }

        let key = OpKey::RelProduct(f, g, cube);
        if let Some(res) = self.cache.borrow().get(&key).copied() {
            return res;
        }

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let res = if self.variable(cube) == m {
            let rest = self.high_node(cube);
            let r0 = self.rel_product_cube(f0, g0, rest);
            if self.is_one(r0) {
                r0
            } else {
                let r1 = self.rel_product_cube(f1, g1, rest);
                self.apply_or(r0, r1)
            }
        } else {
            let low = self.rel_product_cube(f0, g0, cube);
            let high = self.rel_product_cube(f1, g1, cube);
            self.mk_node(m, low, high)
        };

        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Simultaneous variable renaming.
    ///
    /// Variables missing from `perm` stay in place. The mapping may reorder
    /// variables arbitrarily: the result is rebuilt through ITE.
    pub fn rename_vars(&self, f: Ref, perm: &HashMap<Var, Var>) -> Ref {
        debug!("rename_vars(f = {}, perm = {:?})", f, perm);
        let mut cache = HashMap::new();
        self.rename_vars_(f, perm, &mut cache)
    }

    fn rename_vars_(&self, f: Ref, perm: &HashMap<Var, Var>, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if f.is_negated() {
            return -self.rename_vars_(-f, perm, cache);
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = Var::new(self.variable(f));
        let low = self.rename_vars_(self.low_node(f), perm, cache);
        let high = self.rename_vars_(self.high_node(f), perm, cache);
        let target = perm.get(&v).copied().unwrap_or(v);
        let res = self.apply_ite(self.mk_var(target), high, low);

        cache.insert(f, res);
        res
    }

    /// Indices of all nodes reachable from `nodes`, terminal included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        let mut stack: Vec<Ref> = nodes.into_iter().collect();

        while let Some(node) = stack.pop() {
            if visited.insert(node.index()) && !self.is_terminal(node) {
                stack.push(self.low_node(node));
                stack.push(self.high_node(node));
            }
        }

        visited
    }

    /// Number of nodes of `f`, terminal included.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// Variables `f` depends on.
    pub fn support(&self, f: Ref) -> BTreeSet<Var> {
        self.descendants([f])
            .into_iter()
            .filter(|&i| i != 0)
            .map(|i| Var::new(self.variable(Ref::positive(i))))
            .collect()
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        format!(
            "{}:(x{}, {}, {})",
            node,
            self.variable(node),
            self.to_bracket_string(self.high_node(node)),
            self.to_bracket_string(self.low_node(node))
        )
    }
}
