//! Slot-assignment chromosome for timetabling.
//!
//! # Encoding
//!
//! One gene per section, in section enumeration order (courses in plan
//! order, sections in index order). Each gene is an index into the
//! validated time-slot catalog, so a chromosome always covers every
//! section and never references a slot outside the catalog.

use rand::Rng;

/// Slot-assignment chromosome.
///
/// Lower fitness = fewer conflicts (minimization convention).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableChromosome {
    /// Catalog index per section.
    pub genes: Vec<usize>,
    /// Conflict count, once evaluated.
    pub fitness: Option<usize>,
}

impl TimetableChromosome {
    /// Creates an unevaluated chromosome from explicit genes.
    pub fn from_genes(genes: Vec<usize>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Draws every gene independently and uniformly from `0..slot_count`.
    ///
    /// `slot_count` must be non-zero.
    pub fn random<R: Rng>(section_count: usize, slot_count: usize, rng: &mut R) -> Self {
        let genes = (0..section_count)
            .map(|_| rng.random_range(0..slot_count))
            .collect();
        Self::from_genes(genes)
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Whether the chromosome fits a problem of the given shape.
    pub fn is_valid(&self, section_count: usize, slot_count: usize) -> bool {
        self.genes.len() == section_count && self.genes.iter().all(|&g| g < slot_count)
    }
}

// ======================== Crossover ========================

/// Uniform crossover.
///
/// Each gene is taken from `p1` with probability `bias`, else from `p2`.
/// Produces a single unevaluated child. `bias` must lie in `[0, 1]`.
pub fn uniform_crossover<R: Rng>(
    p1: &TimetableChromosome,
    p2: &TimetableChromosome,
    bias: f64,
    rng: &mut R,
) -> TimetableChromosome {
    let genes = p1
        .genes
        .iter()
        .zip(&p2.genes)
        .map(|(&a, &b)| if rng.random_bool(bias) { a } else { b })
        .collect();
    TimetableChromosome::from_genes(genes)
}

// ======================== Mutation ========================

/// Reassignment mutation.
///
/// Each gene independently, with probability `rate`, is replaced by a
/// freshly drawn slot (which may equal the old one). Clears any cached
/// fitness.
pub fn reassign_mutation<R: Rng>(
    chromosome: &mut TimetableChromosome,
    slot_count: usize,
    rate: f64,
    rng: &mut R,
) {
    for gene in chromosome.genes.iter_mut() {
        if rng.random_bool(rate) {
            *gene = rng.random_range(0..slot_count);
        }
    }
    chromosome.fitness = None;
}
