// Copyright 2022-2023 VMware, Inc.
// SPDX-License-Identifier: BSD-2-Clause

//! Contextual labels: which features of a data item mismatch the test item.
//!
//! Position `i` of a label corresponds to the `i`-th considered feature and is
//! set when that feature mismatches. The textual form prints position 0
//! leftmost, so a label reads like a binary number whose most significant bit
//! is feature 0. Labels with at most 64 positions are packed into a single
//! word in that same order, which makes the word's integer order coincide
//! with the label order; wider labels fall back to a heap-allocated bit box.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};

use bitvec::prelude::*;

use crate::{ContextError, LabelMask};

const WORD_BITS: usize = u64::BITS as usize;

#[derive(Clone, PartialEq, Eq, Hash)]
enum Bits {
    /// Position `i` is bit `card - 1 - i`; bits at or above `card` are zero.
    Word(u64),
    /// Position `i` is index `i`.
    Wide(BitBox<u64, Lsb0>),
}

/// A fixed-cardinality set of mismatching feature positions.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Label {
    card: usize,
    bits: Bits,
}

fn low_mask(card: usize) -> u64 {
    if card >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << card) - 1
    }
}

impl Label {
    /// The label of an item matching the test item everywhere.
    pub fn all_match(card: usize) -> Label {
        let bits = if card <= WORD_BITS {
            Bits::Word(0)
        } else {
            Bits::Wide(bitvec![u64, Lsb0; 0; card].into_boxed_bitslice())
        };
        Label { card, bits }
    }

    /// The label of an item mismatching the test item everywhere.
    pub fn all_mismatch(card: usize) -> Label {
        let bits = if card <= WORD_BITS {
            Bits::Word(low_mask(card))
        } else {
            Bits::Wide(bitvec![u64, Lsb0; 1; card].into_boxed_bitslice())
        };
        Label { card, bits }
    }

    /// A label from a bit pattern read most-significant-bit-first: position
    /// `i` is set when bit `card - 1 - i` of `bits` is set.
    pub fn from_bits(card: usize, bits: u64) -> Result<Label, ContextError> {
        if bits & !low_mask(card) != 0 {
            return Err(ContextError::BitsOutOfRange {
                bits,
                cardinality: card,
            });
        }
        let positions = (0..card.min(WORD_BITS))
            .filter(|b| bits >> b & 1 == 1)
            .map(|b| card - 1 - b);
        Self::from_mismatches(card, positions)
    }

    /// A label with exactly the given positions mismatching.
    pub fn from_mismatches(
        card: usize,
        positions: impl IntoIterator<Item = usize>,
    ) -> Result<Label, ContextError> {
        let mut label = Self::all_match(card);
        for i in positions {
            if i >= card {
                return Err(ContextError::InvalidMask {
                    start: i,
                    len: 1,
                    cardinality: card,
                });
            }
            label.set_mismatch(i);
        }
        Ok(label)
    }

    /// Number of positions.
    pub fn cardinality(&self) -> usize {
        self.card
    }

    fn is_mismatch(&self, i: usize) -> bool {
        match &self.bits {
            Bits::Word(w) => w >> (self.card - 1 - i) & 1 == 1,
            Bits::Wide(b) => b[i],
        }
    }

    pub(crate) fn set_mismatch(&mut self, i: usize) {
        match &mut self.bits {
            Bits::Word(w) => *w |= 1u64 << (self.card - 1 - i),
            Bits::Wide(b) => b.set(i, true),
        }
    }

    /// Whether position `i` matches.
    pub fn matches(&self, i: usize) -> Result<bool, ContextError> {
        if i >= self.card {
            return Err(ContextError::PositionOutOfRange {
                position: i,
                cardinality: self.card,
            });
        }
        Ok(!self.is_mismatch(i))
    }

    /// Number of mismatching positions.
    pub fn num_mismatches(&self) -> usize {
        match &self.bits {
            Bits::Word(w) => w.count_ones() as usize,
            Bits::Wide(b) => b.count_ones(),
        }
    }

    /// Number of matching positions.
    pub fn num_matches(&self) -> usize {
        self.card - self.num_mismatches()
    }

    /// Per-position mismatch flags, position 0 first.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.card).map(|i| self.is_mismatch(i))
    }

    /// The mismatching positions in increasing order.
    pub fn mismatches(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.card).filter(|&i| self.is_mismatch(i))
    }

    fn check_same(&self, other: &Label) -> Result<(), ContextError> {
        if self.card != other.card {
            return Err(ContextError::CardinalityMismatch {
                expected: self.card,
                found: other.card,
            });
        }
        Ok(())
    }

    /// The label of the context shared by both: a position matches only if
    /// it matches in both.
    pub fn intersect(&self, other: &Label) -> Result<Label, ContextError> {
        self.check_same(other)?;
        let bits = match (&self.bits, &other.bits) {
            (Bits::Word(a), Bits::Word(b)) => Bits::Word(a | b),
            (Bits::Wide(a), Bits::Wide(b)) => {
                let mut out = a.clone();
                for i in b.iter_ones() {
                    out.set(i, true);
                }
                Bits::Wide(out)
            }
            _ => unreachable!("equal cardinalities share a representation"),
        };
        Ok(Label {
            card: self.card,
            bits,
        })
    }

    /// A position matches if it matches in either.
    pub fn union(&self, other: &Label) -> Result<Label, ContextError> {
        self.check_same(other)?;
        let bits = match (&self.bits, &other.bits) {
            (Bits::Word(a), Bits::Word(b)) => Bits::Word(a & b),
            (Bits::Wide(a), Bits::Wide(b)) => {
                let mut out = a.clone();
                for i in a.iter_ones().filter(|&i| !b[i]) {
                    out.set(i, false);
                }
                Bits::Wide(out)
            }
            _ => unreachable!("equal cardinalities share a representation"),
        };
        Ok(Label {
            card: self.card,
            bits,
        })
    }

    /// Whether every mismatch of `ancestor` is also a mismatch here. A label is
    /// its own descendant; labels of different cardinality are unrelated.
    pub fn is_descendant_of(&self, ancestor: &Label) -> bool {
        match (&self.bits, &ancestor.bits) {
            _ if self.card != ancestor.card => false,
            (Bits::Word(a), Bits::Word(b)) => a & b == *b,
            (Bits::Wide(a), Bits::Wide(b)) => b.iter_ones().all(|i| a[i]),
            _ => false,
        }
    }

    /// Every label obtained by turning a non-empty subset of this label's
    /// matching positions into mismatches.
    pub fn descendants(&self) -> Descendants {
        let gaps: Vec<usize> = (0..self.card).filter(|&i| !self.is_mismatch(i)).collect();
        let counter = if gaps.is_empty() {
            None
        } else {
            let mut c = bitvec![0; gaps.len()];
            c.set(0, true);
            Some(c)
        };
        Descendants {
            base: self.clone(),
            gaps,
            counter,
        }
    }

    /// The positions covered by `mask`, as a label of cardinality `mask.len()`.
    pub fn mask(&self, mask: &LabelMask) -> Result<Label, ContextError> {
        if mask.end() > self.card {
            return Err(ContextError::InvalidMask {
                start: mask.start(),
                len: mask.len(),
                cardinality: self.card,
            });
        }
        let positions = (0..mask.len()).filter(|&j| self.is_mismatch(mask.start() + j));
        Self::from_mismatches(mask.len(), positions)
    }

    /// Reassemble a label of cardinality `card` from masked parts. The masks
    /// must cover every position exactly once.
    pub fn from_parts(card: usize, parts: &[(LabelMask, Label)]) -> Result<Label, ContextError> {
        let mut covered = bitvec![0; card];
        let mut label = Self::all_match(card);
        for (mask, part) in parts {
            if mask.end() > card {
                return Err(ContextError::InvalidMask {
                    start: mask.start(),
                    len: mask.len(),
                    cardinality: card,
                });
            }
            if part.card != mask.len() {
                return Err(ContextError::CardinalityMismatch {
                    expected: mask.len(),
                    found: part.card,
                });
            }
            for j in 0..mask.len() {
                let i = mask.start() + j;
                if covered[i] {
                    return Err(ContextError::IncompleteParts(card));
                }
                covered.set(i, true);
                if part.is_mismatch(j) {
                    label.set_mismatch(i);
                }
            }
        }
        if !covered.all() {
            return Err(ContextError::IncompleteParts(card));
        }
        Ok(label)
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.card.cmp(&other.card).then_with(|| match (&self.bits, &other.bits) {
            (Bits::Word(a), Bits::Word(b)) => a.cmp(b),
            _ => self.iter().cmp(other.iter()),
        })
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for m in self.iter() {
            write!(f, "{}", if m { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl Debug for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Label({self})")
    }
}

/// Iterator returned by [`Label::descendants`].
///
/// Walks a binary counter over the matching positions of the base label, so
/// each descendant is produced exactly once.
#[derive(Clone, Debug)]
pub struct Descendants {
    base: Label,
    gaps: Vec<usize>,
    counter: Option<BitVec>,
}

impl Iterator for Descendants {
    type Item = Label;

    fn next(&mut self) -> Option<Label> {
        let counter = self.counter.as_mut()?;
        let mut label = self.base.clone();
        for k in counter.iter_ones() {
            label.set_mismatch(self.gaps[k]);
        }
        match counter.first_zero() {
            Some(z) => {
                counter[..z].fill(false);
                counter.set(z, true);
            }
            None => self.counter = None,
        }
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashmap::HashSet;

    fn label(card: usize, bits: u64) -> Label {
        Label::from_bits(card, bits).unwrap()
    }

    #[test]
    fn bits_and_display() {
        let l = label(5, 0b10010);
        insta::assert_display_snapshot!(l, @"10010");
        assert_eq!(l.matches(0), Ok(false));
        assert_eq!(l.matches(1), Ok(true));
        assert_eq!(l.matches(3), Ok(false));
        assert_eq!(
            l.matches(5),
            Err(ContextError::PositionOutOfRange {
                position: 5,
                cardinality: 5
            })
        );
        assert_eq!(l.num_mismatches(), 2);
        assert_eq!(l.num_matches(), 3);
        assert_eq!(l.mismatches().collect::<Vec<_>>(), vec![0, 3]);
        assert_eq!(
            Label::from_mismatches(5, [0, 3]).unwrap(),
            l,
            "positions and bits agree"
        );
        assert!(Label::from_bits(3, 0b1000).is_err());
        assert_eq!(Label::all_mismatch(64).num_mismatches(), 64);
        assert_eq!(Label::all_match(4).to_string(), "0000");
    }

    #[test]
    fn intersect_and_union() {
        let a = label(4, 0b1100);
        let b = label(4, 0b0110);
        assert_eq!(a.intersect(&b).unwrap(), label(4, 0b1110));
        assert_eq!(a.union(&b).unwrap(), label(4, 0b0100));
        assert_eq!(
            a.intersect(&label(3, 0)),
            Err(ContextError::CardinalityMismatch {
                expected: 4,
                found: 3
            })
        );
        assert!(a.union(&label(5, 0)).is_err());
    }

    #[test]
    fn descendant_relation() {
        let a = label(4, 0b1100);
        assert!(label(4, 0b1110).is_descendant_of(&a));
        assert!(a.is_descendant_of(&a));
        assert!(!label(4, 0b0110).is_descendant_of(&a));
        assert!(!label(3, 0b110).is_descendant_of(&a));
        assert!(a.is_descendant_of(&Label::all_match(4)));
    }

    #[test]
    fn descendants_are_distinct_and_complete() {
        let base = label(5, 0b01001);
        let all: HashSet<Label> = base.descendants().collect();
        assert_eq!(all.len(), (1 << 3) - 1);
        assert!(all.iter().all(|d| d.is_descendant_of(&base) && *d != base));
        assert!(all.contains(&Label::all_mismatch(5)));
        assert_eq!(Label::all_mismatch(3).descendants().count(), 0);
    }

    #[test]
    fn ordering() {
        let mut labels = vec![label(3, 0b101), label(3, 0b001), label(3, 0b110), label(3, 0b100)];
        labels.sort();
        assert_eq!(
            labels.iter().map(|l| l.to_string()).collect::<Vec<_>>(),
            vec!["001", "100", "101", "110"]
        );
    }

    #[test]
    fn wide_labels() {
        let card = 100;
        let a = Label::from_mismatches(card, [0, 50, 99]).unwrap();
        let b = Label::from_mismatches(card, [1, 50]).unwrap();
        assert_eq!(a.num_mismatches(), 3);
        assert_eq!(a.matches(1), Ok(true));
        assert_eq!(a.matches(99), Ok(false));
        assert!(a.matches(100).is_err());
        let i = a.intersect(&b).unwrap();
        assert_eq!(i.mismatches().collect::<Vec<_>>(), vec![0, 1, 50, 99]);
        assert!(i.is_descendant_of(&a));
        assert!(i.is_descendant_of(&b));
        let u = a.union(&b).unwrap();
        assert_eq!(u.mismatches().collect::<Vec<_>>(), vec![50]);
        assert!(b < a, "position 0 dominates the order");
        assert_eq!(Label::all_mismatch(card).num_matches(), 0);
        assert_eq!(Label::from_bits(card, 1).unwrap().mismatches().collect::<Vec<_>>(), vec![99]);
    }

    #[test]
    fn mask_and_reassemble() {
        let l = label(7, 0b1011001);
        let m1 = LabelMask::new(0, 3).unwrap();
        let m2 = LabelMask::new(3, 4).unwrap();
        let p1 = l.mask(&m1).unwrap();
        let p2 = l.mask(&m2).unwrap();
        assert_eq!(p1.to_string(), "101");
        assert_eq!(p2.to_string(), "1001");
        assert_eq!(Label::from_parts(7, &[(m2, p2.clone()), (m1, p1.clone())]).unwrap(), l);
        assert_eq!(
            Label::from_parts(7, &[(m1, p1.clone())]),
            Err(ContextError::IncompleteParts(7))
        );
        assert_eq!(
            Label::from_parts(7, &[(m1, p1.clone()), (m1, p1), (m2, p2)]),
            Err(ContextError::IncompleteParts(7))
        );
        assert!(l.mask(&LabelMask::new(5, 3).unwrap()).is_err());
    }
}
