//! Two-locus haplotypes
//!
//! Locus A carries the alleles `A`/`a` and locus B the alleles `B`/`b`, the
//! upper-case letter being the dominant allele. Values attached to the four
//! haplotypes are stored in a [`HaplotypeMap`] indexed by [`Haplotype`], in
//! the fixed order AB, aB, Ab, ab.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// The four haplotypes of two biallelic loci
#[allow(non_camel_case_types)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Haplotype {
    AB,
    aB,
    Ab,
    ab,
}

impl Haplotype {
    /// All haplotypes in storage order
    pub const ALL: [Haplotype; 4] = [Haplotype::AB, Haplotype::aB, Haplotype::Ab, Haplotype::ab];

    /// Builds the haplotype carrying the given alleles
    ///
    /// # Arguments:
    /// * `dominant_a` true if locus A carries `A`
    /// * `dominant_b` true if locus B carries `B`
    pub fn from_alleles(dominant_a: bool, dominant_b: bool) -> Self {
        match (dominant_a, dominant_b) {
            (true,  true)  => Self::AB,
            (false, true)  => Self::aB,
            (true,  false) => Self::Ab,
            (false, false) => Self::ab,
        }
    }

    /// Position of the haplotype in storage order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Checks if locus A carries the dominant allele
    pub fn dominant_a(self) -> bool {
        matches!(self, Self::AB | Self::Ab)
    }

    /// Checks if locus B carries the dominant allele
    pub fn dominant_b(self) -> bool {
        matches!(self, Self::AB | Self::aB)
    }

    /// Replaces the allele at locus A
    pub fn with_a(self, dominant_a: bool) -> Self {
        Self::from_alleles(dominant_a, self.dominant_b())
    }

    /// Replaces the allele at locus B
    pub fn with_b(self, dominant_b: bool) -> Self {
        Self::from_alleles(self.dominant_a(), dominant_b)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AB => "AB",
            Self::aB => "aB",
            Self::Ab => "Ab",
            Self::ab => "ab",
        }
    }
}

/// Fixed-cardinality map from [`Haplotype`] to a value
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct HaplotypeMap<T>([T; 4]);

impl<T> HaplotypeMap<T> {
    /// Creates a map from values in storage order (AB, aB, Ab, ab)
    pub fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    /// Iterates over `(haplotype, value)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Haplotype, &T)> {
        Haplotype::ALL.iter().copied().zip(self.0.iter())
    }

    /// Values in storage order
    pub fn values(&self) -> &[T; 4] {
        &self.0
    }
}

impl<T: Copy> HaplotypeMap<T> {
    /// Creates a map with the same value for every haplotype
    pub fn splat(value: T) -> Self {
        Self([value; 4])
    }

    /// Applies `f` to every entry
    pub fn map<U>(&self, mut f: impl FnMut(Haplotype, T) -> U) -> HaplotypeMap<U> {
        HaplotypeMap([
            f(Haplotype::AB, self.0[0]),
            f(Haplotype::aB, self.0[1]),
            f(Haplotype::Ab, self.0[2]),
            f(Haplotype::ab, self.0[3]),
        ])
    }
}

impl<T> Index<Haplotype> for HaplotypeMap<T> {
    type Output = T;

    fn index(&self, haplotype: Haplotype) -> &Self::Output {
        &self.0[haplotype.index()]
    }
}

impl<T> IndexMut<Haplotype> for HaplotypeMap<T> {
    fn index_mut(&mut self, haplotype: Haplotype) -> &mut Self::Output {
        &mut self.0[haplotype.index()]
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alleles_round_trip() {
        for h in Haplotype::ALL {
            assert_eq!(Haplotype::from_alleles(h.dominant_a(), h.dominant_b()), h);
        }
        assert_eq!(Haplotype::AB.with_a(false), Haplotype::aB);
        assert_eq!(Haplotype::aB.with_b(false), Haplotype::ab);
        assert_eq!(Haplotype::ab.with_a(true), Haplotype::Ab);
    }

    #[test]
    fn storage_order_is_ab_ab_ab_ab() {
        let labels: Vec<&str> = Haplotype::ALL.iter().map(|h| h.label()).collect();
        assert_eq!(labels, ["AB", "aB", "Ab", "ab"]);
        for (i, h) in Haplotype::ALL.iter().enumerate() {
            assert_eq!(h.index(), i);
        }
    }

    #[test]
    fn map_indexing() {
        let mut counts = HaplotypeMap::new([1u64, 2, 3, 4]);
        assert_eq!(counts[Haplotype::Ab], 3);
        counts[Haplotype::aB] += 10;
        assert_eq!(counts.values(), &[1, 12, 3, 4]);

        let doubled = counts.map(|_, c| c * 2);
        assert_eq!(doubled[Haplotype::ab], 8);
        assert_eq!(HaplotypeMap::splat(0u64).iter().count(), 4);
    }
}
