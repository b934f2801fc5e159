//! Symbolic sets and relations, and how to build them from enumerations.
//!
//! A [`NodeSet`] is a BDD over one variable family; a [`Relation`] is a BDD
//! over the row and column families. Both are built by folding one cube per
//! element (or pair) under disjunction, so an empty enumeration is simply the
//! constant false.

use log::debug;
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::domain::{decode, Encoding, Family};
use crate::error::{Error, Result};
use crate::reference::Ref;

/// A set of `(row, column)` pairs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Relation(Ref);

impl Relation {
    pub fn new(f: Ref) -> Self {
        Self(f)
    }

    /// The characteristic function.
    pub fn get(self) -> Ref {
        self.0
    }

    pub fn union(self, bdd: &Bdd, other: Relation) -> Relation {
        Relation(bdd.apply_or(self.0, other.0))
    }

    pub fn is_equivalent(self, bdd: &Bdd, other: Relation) -> bool {
        bdd.is_equivalent(self.0, other.0)
    }

    /// Number of pairs, counted over the row and column variables.
    pub fn count(self, bdd: &Bdd, encoding: &Encoding) -> BigUint {
        bdd.sat_count(self.0, encoding.pair_vars().len())
    }

    /// All pairs of the relation, in ascending order.
    pub fn pairs(self, bdd: &Bdd, encoding: &Encoding) -> Vec<(u32, u32)> {
        let bits = encoding.domain().bits() as usize;
        let mut pairs: Vec<(u32, u32)> = bdd
            .sat_assignments(self.0, &encoding.pair_vars())
            .map(|values| (decode(&values[..bits]), decode(&values[bits..])))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

/// A set of elements placed on one variable family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeSet {
    family: Family,
    f: Ref,
}

impl NodeSet {
    pub(crate) fn new(family: Family, f: Ref) -> Self {
        Self { family, f }
    }

    pub fn family(self) -> Family {
        self.family
    }

    /// The characteristic function.
    pub fn get(self) -> Ref {
        self.f
    }

    /// Fail unless the set is labelled with `family` and depends on its
    /// variables only.
    pub fn expect_family(self, bdd: &Bdd, encoding: &Encoding, family: Family) -> Result<Self> {
        if self.family != family {
            return Err(Error::FamilyMismatch {
                expected: family,
                found: self.family,
            });
        }
        let vars = encoding.family(family);
        match bdd.support(self.f).into_iter().find(|&v| !vars.contains(v)) {
            Some(var) => Err(Error::ForeignVariable { var, family }),
            None => Ok(self),
        }
    }

    /// All elements of the set, in ascending order.
    pub fn elements(self, bdd: &Bdd, encoding: &Encoding) -> Vec<u32> {
        let vars = encoding.family(self.family).vars();
        let mut elements: Vec<u32> = bdd.sat_assignments(self.f, vars).map(|values| decode(&values)).collect();
        elements.sort_unstable();
        elements
    }

    pub fn count(self, bdd: &Bdd, encoding: &Encoding) -> BigUint {
        bdd.sat_count(self.f, encoding.family(self.family).len())
    }
}

/// Builds sets and relations over an [`Encoding`].
pub struct Builder<'a> {
    bdd: &'a Bdd,
    encoding: &'a Encoding,
}

impl<'a> Builder<'a> {
    pub fn new(bdd: &'a Bdd, encoding: &'a Encoding) -> Self {
        Self { bdd, encoding }
    }

    /// Cube fixing `family` to the encoding of `element`.
    pub fn element_cube(&self, family: Family, element: u32) -> Result<Ref> {
        let bits = self.encoding.domain().encode(element)?;
        Ok(self.bdd.mk_cube(self.encoding.family(family).literals(&bits)))
    }

    /// Cube fixing the row family to `u` and the column family to `v`.
    pub fn pair_cube(&self, u: u32, v: u32) -> Result<Ref> {
        let row = self.element_cube(Family::Row, u)?;
        let column = self.element_cube(Family::Column, v)?;
        Ok(self.bdd.apply_and(row, column))
    }

    /// The relation holding exactly on `pairs`.
    pub fn relation(&self, pairs: impl IntoIterator<Item = (u32, u32)>) -> Result<Relation> {
        let mut f = self.bdd.zero();
        let mut n = 0usize;
        for (u, v) in pairs {
            f = self.bdd.apply_or(f, self.pair_cube(u, v)?);
            n += 1;
        }
        debug!("relation: {} pairs -> {} nodes", n, self.bdd.size(f));
        Ok(Relation(f))
    }

    /// The set holding exactly `elements`, placed on `family`.
    pub fn set(&self, family: Family, elements: impl IntoIterator<Item = u32>) -> Result<NodeSet> {
        let mut f = self.bdd.zero();
        for x in elements {
            f = self.bdd.apply_or(f, self.element_cube(family, x)?);
        }
        debug!("set over {}: {} nodes", family, self.bdd.size(f));
        Ok(NodeSet::new(family, f))
    }

    /// Every element of the domain, placed on `family`.
    pub fn universe(&self, family: Family) -> Result<NodeSet> {
        if self.encoding.domain().is_full() {
            return Ok(NodeSet::new(family, self.bdd.one()));
        }
        self.set(family, self.encoding.domain().elements())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::domain::Domain;

    fn setup(size: u32) -> (Bdd, Encoding) {
        (Bdd::default(), Encoding::new(Domain::new(size).unwrap()))
    }

    #[test]
    fn test_empty_inputs_are_false() {
        let (bdd, enc) = setup(8);
        let builder = Builder::new(&bdd, &enc);

        assert!(bdd.is_zero(builder.relation([]).unwrap().get()));
        assert!(bdd.is_zero(builder.set(Family::Row, []).unwrap().get()));
    }

    #[test]
    fn test_relation_holds_exactly_on_pairs() {
        let (bdd, enc) = setup(8);
        let builder = Builder::new(&bdd, &enc);

        let pairs = vec![(0, 1), (1, 2), (7, 0), (3, 3)];
        let r = builder.relation(pairs.clone()).unwrap();

        let mut expected = pairs;
        expected.sort();
        assert_eq!(r.pairs(&bdd, &enc), expected);
        assert_eq!(r.count(&bdd, &enc), BigUint::from(4u32));
    }

    #[test]
    fn test_order_independent() {
        let (bdd, enc) = setup(16);
        let builder = Builder::new(&bdd, &enc);

        let a = builder.relation([(1, 5), (9, 2), (15, 0)]).unwrap();
        let b = builder.relation([(15, 0), (1, 5), (9, 2), (1, 5)]).unwrap();
        assert!(a.is_equivalent(&bdd, b));
    }

    #[test]
    fn test_set_members() {
        let (bdd, enc) = setup(32);
        let builder = Builder::new(&bdd, &enc);

        let s = builder.set(Family::Column, [3, 5, 7]).unwrap();
        assert_eq!(s.family(), Family::Column);
        assert_eq!(s.elements(&bdd, &enc), vec![3, 5, 7]);
        assert_eq!(s.count(&bdd, &enc), BigUint::from(3u32));
        assert!(bdd.support(s.get()).iter().all(|&v| enc.column().contains(v)));
    }

    #[test]
    fn test_rejects_out_of_domain() {
        let (bdd, enc) = setup(20);
        let builder = Builder::new(&bdd, &enc);

        assert_eq!(
            builder.relation([(1, 2), (3, 25)]),
            Err(Error::InvalidDomainValue { value: 25, bound: 20 })
        );
        assert!(builder.set(Family::Row, [20]).is_err());
    }

    #[test]
    fn test_universe() {
        let (bdd, enc) = setup(32);
        let builder = Builder::new(&bdd, &enc);
        assert!(bdd.is_one(builder.universe(Family::Row).unwrap().get()));

        let (bdd, enc) = setup(5);
        let builder = Builder::new(&bdd, &enc);
        let u = builder.universe(Family::Row).unwrap();
        assert_eq!(u.elements(&bdd, &enc), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_expect_family() {
        let (bdd, enc) = setup(4);
        let builder = Builder::new(&bdd, &enc);

        let s = builder.set(Family::Row, [1]).unwrap();
        assert!(s.expect_family(&bdd, &enc, Family::Row).is_ok());
        assert_eq!(
            s.expect_family(&bdd, &enc, Family::Column),
            Err(Error::FamilyMismatch {
                expected: Family::Column,
                found: Family::Row
            })
        );
    }

    #[test]
    fn test_expect_family_checks_support() {
        let (bdd, enc) = setup(4);
        let stray = enc.column().vars()[1];

        // Labelled as a row set, but built over a column variable.
        let mislabelled = NodeSet::new(Family::Row, bdd.mk_var(stray));
        assert_eq!(
            mislabelled.expect_family(&bdd, &enc, Family::Row),
            Err(Error::ForeignVariable {
                var: stray,
                family: Family::Row
            })
        );

        let constant = NodeSet::new(Family::Row, bdd.one());
        assert!(constant.expect_family(&bdd, &enc, Family::Row).is_ok());
    }
}
