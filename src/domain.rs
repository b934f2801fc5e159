//! Bit-vector encoding of the finite element domain.
//!
//! An element of `[0, N)` is encoded as `bits = max(1, ceil(log2 N))` Boolean
//! values, most significant bit first. Three variable families share that
//! width: [`Family::Row`] holds the source of a pair, [`Family::Column`] its
//! target, and [`Family::Aux`] is scratch space for relational composition.
//!
//! Families are interleaved in the variable order (`row_0, col_0, aux_0,
//! row_1, ...`), which keeps arithmetic relations such as `j = i + k mod N`
//! small.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use crate::error::{Error, Result};
use crate::types::{Lit, Var};

/// Largest supported bit width.
pub const MAX_BITS: u32 = 16;

/// Encode `element` as `bits` booleans, most significant first.
///
/// Values that do not fit are rejected rather than truncated.
/// Widths beyond 32 bits pad with leading `false`.
pub fn encode(element: u32, bits: u32) -> Result<Vec<bool>> {
    if bits < u32::BITS && element >= 1 << bits {
        return Err(Error::InvalidDomainValue {
            value: element,
            bound: 1u64 << bits,
        });
    }
    Ok((0..bits)
        .rev()
        .map(|k| element.checked_shr(k).is_some_and(|x| x & 1 == 1))
        .collect())
}

/// Inverse of [`encode`].
pub fn decode(bits: &[bool]) -> u32 {
    bits.iter().fold(0, |acc, &b| (acc << 1) | b as u32)
}

/// Pair each variable of `family` with the bit at the same position.
pub fn decode_assignment(bits: &[bool], family: &VarFamily) -> HashMap<Var, bool> {
    assert_eq!(bits.len(), family.len(), "Bit width does not match the family");
    family.vars().iter().copied().zip(bits.iter().copied()).collect()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Family {
    /// Source position of a pair.
    Row,
    /// Target position of a pair.
    Column,
    /// Intermediate position, only alive inside composition.
    Aux,
}

impl Family {
    pub const ALL: [Family; 3] = [Family::Row, Family::Column, Family::Aux];

    fn offset(self) -> u32 {
        match self {
            Family::Row => 0,
            Family::Column => 1,
            Family::Aux => 2,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Row => write!(f, "row"),
            Family::Column => write!(f, "column"),
            Family::Aux => write!(f, "aux"),
        }
    }
}

/// The domain `[0, size)`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Domain {
    size: u32,
    bits: u32,
}

impl Domain {
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 || size > (1 << MAX_BITS) {
            return Err(Error::InvalidDomainSize { size });
        }
        let bits = (u32::BITS - (size - 1).leading_zeros()).max(1);
        Ok(Self { size, bits })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Whether every bit pattern encodes an element.
    pub fn is_full(&self) -> bool {
        self.size as u64 == 1u64 << self.bits
    }

    pub fn contains(&self, element: u32) -> bool {
        element < self.size
    }

    pub fn elements(&self) -> Range<u32> {
        0..self.size
    }

    pub fn check(&self, element: u32) -> Result<u32> {
        if self.contains(element) {
            Ok(element)
        } else {
            Err(Error::InvalidDomainValue {
                value: element,
                bound: self.size as u64,
            })
        }
    }

    pub fn encode(&self, element: u32) -> Result<Vec<bool>> {
        encode(self.check(element)?, self.bits)
    }
}

/// Ordered BDD variables of one family, one per bit, most significant first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VarFamily {
    family: Family,
    vars: Vec<Var>,
}

impl VarFamily {
    pub fn family(&self) -> Family {
        self.family
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn contains(&self, var: Var) -> bool {
        self.vars.contains(&var)
    }

    /// Literals fixing this family to the given bits.
    pub fn literals(&self, bits: &[bool]) -> Vec<Lit> {
        assert_eq!(bits.len(), self.len(), "Bit width does not match the family");
        self.vars.iter().zip(bits).map(|(&v, &b)| Lit::with_value(v, b)).collect()
    }
}

/// Domain plus the three variable families laid out over it.
#[derive(Debug, Clone)]
pub struct Encoding {
    domain: Domain,
    row: VarFamily,
    column: VarFamily,
    aux: VarFamily,
}

impl Encoding {
    pub fn new(domain: Domain) -> Self {
        let family = |family: Family| VarFamily {
            family,
            vars: (0..domain.bits())
                .map(|k| Var::new(3 * k + family.offset() + 1))
                .collect(),
        };
        Self {
            domain,
            row: family(Family::Row),
            column: family(Family::Column),
            aux: family(Family::Aux),
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn family(&self, family: Family) -> &VarFamily {
        match family {
            Family::Row => &self.row,
            Family::Column => &self.column,
            Family::Aux => &self.aux,
        }
    }

    pub fn row(&self) -> &VarFamily {
        &self.row
    }

    pub fn column(&self) -> &VarFamily {
        &self.column
    }

    pub fn aux(&self) -> &VarFamily {
        &self.aux
    }

    /// Family holding `var`, if any.
    pub fn family_of(&self, var: Var) -> Option<Family> {
        Family::ALL.into_iter().find(|&f| self.family(f).contains(var))
    }

    /// Row variables followed by column variables.
    pub fn pair_vars(&self) -> Vec<Var> {
        self.row.vars.iter().chain(&self.column.vars).copied().collect()
    }

    /// Full assignment placing each element on its family.
    pub fn assignment(&self, placements: &[(Family, u32)]) -> Result<HashMap<Var, bool>> {
        let mut values = HashMap::new();
        for &(family, element) in placements {
            let bits = self.domain.encode(element)?;
            values.extend(decode_assignment(&bits, self.family(family)));
        }
        Ok(values)
    }

    /// Mapping `from[k] -> to[k]` for every bit `k`.
    pub fn rename_map(&self, from: Family, to: Family) -> HashMap<Var, Var> {
        let from = self.family(from).vars.iter().copied();
        let to = self.family(to).vars.iter().copied();
        from.zip(to).collect()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_encode_msb_first() {
        assert_eq!(encode(27, 5).unwrap(), vec![true, true, false, true, true]);
        assert_eq!(encode(3, 5).unwrap(), vec![false, false, false, true, true]);
        assert_eq!(encode(0, 1).unwrap(), vec![false]);
    }

    #[test]
    fn test_encode_rejects_overflow() {
        assert_eq!(encode(32, 5), Err(Error::InvalidDomainValue { value: 32, bound: 32 }));
        assert!(encode(31, 5).is_ok());
    }

    #[test]
    fn test_encode_wide() {
        let bits = encode(5, 33).unwrap();
        assert_eq!(bits.len(), 33);
        assert!(bits[..30].iter().all(|&b| !b));
        assert_eq!(decode(&bits), 5);

        let bits = encode(u32::MAX, 32).unwrap();
        assert!(bits.iter().all(|&b| b));
        assert_eq!(encode(7, 70).unwrap().len(), 70);
    }

    #[test]
    fn test_encode_decode_bijection() {
        for x in 0..64 {
            assert_eq!(decode(&encode(x, 6).unwrap()), x);
        }
    }

    #[test]
    fn test_domain_bits() {
        assert_eq!(Domain::new(1).unwrap().bits(), 1);
        assert_eq!(Domain::new(2).unwrap().bits(), 1);
        assert_eq!(Domain::new(8).unwrap().bits(), 3);
        assert_eq!(Domain::new(9).unwrap().bits(), 4);
        assert_eq!(Domain::new(32).unwrap().bits(), 5);
        assert!(Domain::new(32).unwrap().is_full());
        assert!(!Domain::new(20).unwrap().is_full());
        assert_eq!(Domain::new(0), Err(Error::InvalidDomainSize { size: 0 }));
    }

    #[test]
    fn test_domain_rejects_out_of_range() {
        let domain = Domain::new(20).unwrap();
        assert!(domain.encode(19).is_ok());
        assert_eq!(domain.encode(20), Err(Error::InvalidDomainValue { value: 20, bound: 20 }));
    }

    #[test]
    fn test_families_are_disjoint_and_interleaved() {
        let enc = Encoding::new(Domain::new(32).unwrap());
        let row: Vec<u32> = enc.row().vars().iter().map(|v| v.id()).collect();
        let col: Vec<u32> = enc.column().vars().iter().map(|v| v.id()).collect();
        let aux: Vec<u32> = enc.aux().vars().iter().map(|v| v.id()).collect();
        assert_eq!(row, vec![1, 4, 7, 10, 13]);
        assert_eq!(col, vec![2, 5, 8, 11, 14]);
        assert_eq!(aux, vec![3, 6, 9, 12, 15]);

        assert_eq!(enc.family_of(Var::new(7)), Some(Family::Row));
        assert_eq!(enc.family_of(Var::new(14)), Some(Family::Column));
        assert_eq!(enc.family_of(Var::new(16)), None);
    }

    #[test]
    fn test_decode_assignment() {
        let enc = Encoding::new(Domain::new(8).unwrap());
        let values = decode_assignment(&encode(5, 3).unwrap(), enc.column());
        assert_eq!(values[&Var::new(2)], true);
        assert_eq!(values[&Var::new(5)], false);
        assert_eq!(values[&Var::new(8)], true);

        let both = enc.assignment(&[(Family::Row, 1), (Family::Column, 6)]).unwrap();
        assert_eq!(both.len(), 6);
        assert!(enc.assignment(&[(Family::Row, 8)]).is_err());
    }

    #[test]
    fn test_rename_map() {
        let enc = Encoding::new(Domain::new(4).unwrap());
        let map = enc.rename_map(Family::Column, Family::Aux);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&Var::new(2)], Var::new(3));
        assert_eq!(map[&Var::new(5)], Var::new(6));
    }
}
