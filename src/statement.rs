//! Evaluation of `∀s. source(s) → ∃t. target(t) ∧ closure(s, t)`.

use std::fmt;

use log::info;

use crate::bdd::Bdd;
use crate::domain::{Encoding, Family};
use crate::error::Result;
use crate::reference::Ref;
use crate::relation::{Builder, NodeSet, Relation};

/// Classification of a statement over the elements of the row family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Verdict {
    /// True for every element.
    Tautology,
    /// False for every element.
    Contradiction,
    /// True for some elements only.
    Satisfiable,
}

impl Verdict {
    pub fn classify(bdd: &Bdd, f: Ref) -> Self {
        Self::classify_within(bdd, f, bdd.one())
    }

    /// Classify `f` over the assignments satisfying `care` only.
    pub fn classify_within(bdd: &Bdd, f: Ref, care: Ref) -> Self {
        if bdd.is_implies(care, f) {
            Verdict::Tautology
        } else if bdd.is_zero(bdd.apply_and(care, f)) {
            Verdict::Contradiction
        } else {
            Verdict::Satisfiable
        }
    }

    pub fn is_tautology(self) -> bool {
        self == Verdict::Tautology
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Tautology => write!(f, "tautology"),
            Verdict::Contradiction => write!(f, "contradiction"),
            Verdict::Satisfiable => write!(f, "satisfiable"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Evaluation {
    verdict: Verdict,
    source: NodeSet,
    witness: NodeSet,
    statement: Ref,
}

impl Evaluation {
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Row elements having some target in the closure.
    pub fn witness(&self) -> NodeSet {
        self.witness
    }

    /// `¬source ∨ witness`, over the row family.
    pub fn statement(&self) -> Ref {
        self.statement
    }

    /// Source elements without any reachable target.
    pub fn counterexamples(&self, bdd: &Bdd, encoding: &Encoding) -> Vec<u32> {
        let f = bdd.apply_and(self.source.get(), bdd.apply_not(self.witness.get()));
        NodeSet::new(Family::Row, f).elements(bdd, encoding)
    }
}

/// Decide whether every element of `source` reaches some element of `target`
/// through `closure`.
///
/// `source` must be placed on the row family and `target` on the column family.
/// Bit patterns that encode no element are left out of the verdict.
pub fn evaluate_implication(
    bdd: &Bdd,
    encoding: &Encoding,
    source: NodeSet,
    target: NodeSet,
    closure: Relation,
) -> Result<Evaluation> {
    let source = source.expect_family(bdd, encoding, Family::Row)?;
    let target = target.expect_family(bdd, encoding, Family::Column)?;
    let universe = Builder::new(bdd, encoding).universe(Family::Row)?;

    let column = encoding.column().vars().iter().copied();
    let witness = NodeSet::new(Family::Row, bdd.rel_product(target.get(), closure.get(), column));
    let statement = bdd.apply_or(bdd.apply_not(source.get()), witness.get());
    let verdict = Verdict::classify_within(bdd, statement, universe.get());
    info!("Statement is a {}", verdict);

    Ok(Evaluation {
        verdict,
        source,
        witness,
        statement,
    })
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::domain::Domain;
    use crate::error::Error;

    fn setup(size: u32) -> (Bdd, Encoding) {
        (Bdd::default(), Encoding::new(Domain::new(size).unwrap()))
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Tautology.to_string(), "tautology");
        assert_eq!(Verdict::Contradiction.to_string(), "contradiction");
        assert_eq!(Verdict::Satisfiable.to_string(), "satisfiable");
    }

    #[test]
    fn test_tautology() {
        let (bdd, enc) = setup(4);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([(1, 2), (3, 0)]).unwrap();
        let source = builder.set(Family::Row, [1, 3]).unwrap();
        let target = builder.set(Family::Column, [0, 2]).unwrap();

        let eval = evaluate_implication(&bdd, &enc, source, target, closure).unwrap();
        assert_eq!(eval.verdict(), Verdict::Tautology);
        assert!(eval.counterexamples(&bdd, &enc).is_empty());
        assert_eq!(eval.witness().elements(&bdd, &enc), vec![1, 3]);
    }

    #[test]
    fn test_satisfiable_with_counterexample() {
        let (bdd, enc) = setup(4);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([(1, 2), (3, 1)]).unwrap();
        let source = builder.set(Family::Row, [1, 3]).unwrap();
        let target = builder.set(Family::Column, [0, 2]).unwrap();

        let eval = evaluate_implication(&bdd, &enc, source, target, closure).unwrap();
        assert_eq!(eval.verdict(), Verdict::Satisfiable);
        assert_eq!(eval.counterexamples(&bdd, &enc), vec![3]);
    }

    #[test]
    fn test_contradiction() {
        // Every element is a source and nothing is reachable.
        let (bdd, enc) = setup(4);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([]).unwrap();
        let source = builder.universe(Family::Row).unwrap();
        let target = builder.set(Family::Column, [0]).unwrap();

        let eval = evaluate_implication(&bdd, &enc, source, target, closure).unwrap();
        assert_eq!(eval.verdict(), Verdict::Contradiction);
        assert_eq!(eval.counterexamples(&bdd, &enc), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_contradiction_in_partial_domain() {
        // 20 elements on 5 bits: patterns 20..32 encode nothing.
        let (bdd, enc) = setup(20);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([(1, 3)]).unwrap();
        let source = builder.universe(Family::Row).unwrap();
        let target = builder.set(Family::Column, [0, 2]).unwrap();

        let eval = evaluate_implication(&bdd, &enc, source, target, closure).unwrap();
        assert_eq!(eval.verdict(), Verdict::Contradiction);
        assert_eq!(eval.counterexamples(&bdd, &enc).len(), 20);
        assert!(!bdd.is_zero(eval.statement()));
    }

    #[test]
    fn test_classify_within() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(crate::types::Var::new(1));
        let y = bdd.mk_var(crate::types::Var::new(2));

        assert_eq!(Verdict::classify(&bdd, x), Verdict::Satisfiable);
        assert_eq!(Verdict::classify_within(&bdd, x, x), Verdict::Tautology);
        assert_eq!(Verdict::classify_within(&bdd, x, -x), Verdict::Contradiction);
        assert_eq!(Verdict::classify_within(&bdd, x, y), Verdict::Satisfiable);
    }

    #[test]
    fn test_empty_source_is_vacuous() {
        let (bdd, enc) = setup(8);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([]).unwrap();
        let source = builder.set(Family::Row, []).unwrap();
        let target = builder.set(Family::Column, [0]).unwrap();

        let eval = evaluate_implication(&bdd, &enc, source, target, closure).unwrap();
        assert!(eval.verdict().is_tautology());
    }

    #[test]
    fn test_rejects_wrong_families() {
        let (bdd, enc) = setup(4);
        let builder = Builder::new(&bdd, &enc);

        let closure = builder.relation([(0, 0)]).unwrap();
        let rows = builder.set(Family::Row, [0]).unwrap();
        let columns = builder.set(Family::Column, [0]).unwrap();

        assert_eq!(
            evaluate_implication(&bdd, &enc, columns, columns, closure),
            Err(Error::FamilyMismatch {
                expected: Family::Row,
                found: Family::Column
            })
        );
        assert_eq!(
            evaluate_implication(&bdd, &enc, rows, rows, closure),
            Err(Error::FamilyMismatch {
                expected: Family::Column,
                found: Family::Row
            })
        );
    }
}
