//! Point checks on symbolic sets and relations.
//!
//! A membership query restricts the function under the full assignment of the
//! encoded element(s). The result must be a constant; anything else means the
//! function depends on variables outside its families.

use std::fmt;

use log::{debug, warn};

use crate::bdd::Bdd;
use crate::domain::{Encoding, Family};
use crate::error::{Error, Result};
use crate::reference::Ref;
use crate::relation::{NodeSet, Relation};

fn constant(bdd: &Bdd, f: Ref) -> Result<bool> {
    if bdd.is_one(f) {
        Ok(true)
    } else if bdd.is_zero(f) {
        Ok(false)
    } else {
        Err(Error::NonConstantRestriction)
    }
}

/// Whether `relation` holds on `(u, v)`.
pub fn check_pair(bdd: &Bdd, encoding: &Encoding, relation: Relation, u: u32, v: u32) -> Result<bool> {
    let values = encoding.assignment(&[(Family::Row, u), (Family::Column, v)])?;
    constant(bdd, bdd.restrict(relation.get(), &values))
}

/// Whether `x` belongs to `set`.
pub fn check_member(bdd: &Bdd, encoding: &Encoding, set: NodeSet, x: u32) -> Result<bool> {
    let values = encoding.assignment(&[(set.family(), x)])?;
    constant(bdd, bdd.restrict(set.get(), &values))
}

/// One expected-versus-actual observation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Check {
    pub label: String,
    pub expected: bool,
    pub actual: bool,
}

impl Check {
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.label, self.actual as u8)?;
        if !self.passed() {
            write!(f, " (expected {})", self.expected as u8)?;
        }
        Ok(())
    }
}

/// Collects checks against one manager and encoding.
pub struct Harness<'a> {
    bdd: &'a Bdd,
    encoding: &'a Encoding,
    checks: Vec<Check>,
}

impl<'a> Harness<'a> {
    pub fn new(bdd: &'a Bdd, encoding: &'a Encoding) -> Self {
        Self {
            bdd,
            encoding,
            checks: Vec::new(),
        }
    }

    /// Record `name(u, v)` against `expected`.
    pub fn pair(&mut self, name: &str, relation: Relation, u: u32, v: u32, expected: bool) -> Result<&Check> {
        let actual = check_pair(self.bdd, self.encoding, relation, u, v)?;
        Ok(self.push(format!("{}({},{})", name, u, v), expected, actual))
    }

    /// Record `name(x)` against `expected`.
    pub fn member(&mut self, name: &str, set: NodeSet, x: u32, expected: bool) -> Result<&Check> {
        let actual = check_member(self.bdd, self.encoding, set, x)?;
        Ok(self.push(format!("{}({})", name, x), expected, actual))
    }

    fn push(&mut self, label: String, expected: bool, actual: bool) -> &Check {
        let check = Check { label, expected, actual };
        if check.passed() {
            debug!("check {}", check);
        } else {
            warn!("check {}", check);
        }
        self.checks.push(check);
        &self.checks[self.checks.len() - 1]
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.failures().next().is_none()
    }
}
