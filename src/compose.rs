//! Relational composition.
//!
//! ```text
//! (A ∘ B)(u, w) = ∃v. A(u, v) ∧ B(v, w)
//! ```
//!
//! The intermediate `v` lives on the auxiliary family: `A`'s columns and
//! `B`'s rows are renamed onto it, and the relational product eliminates it.

use log::debug;

use crate::bdd::Bdd;
use crate::domain::{Encoding, Family};
use crate::error::{Error, Result};
use crate::relation::Relation;

pub struct Composer<'a> {
    bdd: &'a Bdd,
    encoding: &'a Encoding,
}

impl<'a> Composer<'a> {
    pub fn new(bdd: &'a Bdd, encoding: &'a Encoding) -> Self {
        Self { bdd, encoding }
    }

    /// Compose `a` with `b`: the result relates `u` to `w` iff some `v` has
    /// `a(u, v)` and `b(v, w)`.
    pub fn compose(&self, a: Relation, b: Relation) -> Result<Relation> {
        self.check_fresh(a)?;
        self.check_fresh(b)?;

        let a_aux = self
            .bdd
            .rename_vars(a.get(), &self.encoding.rename_map(Family::Column, Family::Aux));
        let b_aux = self
            .bdd
            .rename_vars(b.get(), &self.encoding.rename_map(Family::Row, Family::Aux));

        let aux = self.encoding.aux().vars().iter().copied();
        let res = self.bdd.rel_product(a_aux, b_aux, aux);
        debug!("compose({}, {}) -> {} of size {}", a.get(), b.get(), res, self.bdd.size(res));
        Ok(Relation::new(res))
    }

    /// The auxiliary family must not be free in an operand.
    fn check_fresh(&self, r: Relation) -> Result<()> {
        let aux = self.encoding.aux();
        match self.bdd.support(r.get()).into_iter().find(|&v| aux.contains(v)) {
            Some(var) => Err(Error::VariableCollision { var }),
            None => Ok(()),
        }
    }
}
