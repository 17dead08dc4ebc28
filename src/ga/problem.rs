//! Timetabling GA problem definition.
//!
//! Bridges the section plan and slot catalog to the GA runner: builds
//! chromosomes, evaluates conflicts, and decodes the winner back into a
//! scheduled [`SectionPlan`].
//!
//! # Fitness
//! Walk sections in enumeration order and, for each enrolled student,
//! compare the section's slot with the slots already recorded for that
//! student. A student's new slot adds one conflict if it overlaps *any*
//! earlier slot (the comparison stops at the first overlap), then the slot
//! is recorded regardless. Three mutually overlapping slots for one
//! student therefore count 2, not 3.

use std::collections::HashMap;

use rand::Rng;

use super::chromosome::{TimetableChromosome, reassign_mutation, uniform_crossover};
use crate::error::{Result, TimetableError};
use crate::models::{SectionKey, SectionPlan, TimeSlot};

/// Counts student conflicts over `(students, slot)` assignments.
///
/// Assignments are consumed in order; see the module docs for the
/// counting rule. Pure: the per-student scratch map is local to the call.
pub fn count_conflicts<'a, I>(assignments: I) -> usize
where
    I: IntoIterator<Item = (&'a [String], &'a TimeSlot)>,
{
    let mut conflicts = 0;
    walk_conflicts(assignments, |_| conflicts += 1);
    conflicts
}

/// Same counting rule as [`count_conflicts`], tallied per student.
///
/// Only students with at least one conflict appear in the map, and the
/// values sum to [`count_conflicts`] over the same assignments.
pub fn conflicts_by_student<'a, I>(assignments: I) -> HashMap<&'a str, usize>
where
    I: IntoIterator<Item = (&'a [String], &'a TimeSlot)>,
{
    let mut tally: HashMap<&'a str, usize> = HashMap::new();
    walk_conflicts(assignments, |student| *tally.entry(student).or_insert(0) += 1);
    tally
}

fn walk_conflicts<'a, I, F>(assignments: I, mut on_conflict: F)
where
    I: IntoIterator<Item = (&'a [String], &'a TimeSlot)>,
    F: FnMut(&'a str),
{
    let mut booked: HashMap<&'a str, Vec<&'a TimeSlot>> = HashMap::new();

    for (students, slot) in assignments {
        for student in students {
            let slots = booked.entry(student.as_str()).or_default();
            if slots.iter().any(|earlier| earlier.overlaps(slot)) {
                on_conflict(student.as_str());
            }
            slots.push(slot);
        }
    }
}

/// GA problem for timetabling.
///
/// Borrows the plan and catalog; both are read-only for the whole run,
/// which makes the problem safe to share across evaluation workers.
#[derive(Debug)]
pub struct TimetableProblem<'a> {
    plan: &'a SectionPlan,
    slots: &'a [TimeSlot],
    keys: Vec<SectionKey>,
    rosters: Vec<&'a [String]>,
}

impl<'a> TimetableProblem<'a> {
    /// Creates a problem over a plan and a validated catalog.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidConfiguration`] if `slots` is empty.
    /// - [`TimetableError::SchedulingFailure`] if the plan has no sections.
    pub fn new(plan: &'a SectionPlan, slots: &'a [TimeSlot]) -> Result<Self> {
        if slots.is_empty() {
            return Err(TimetableError::config("time slot catalog is empty"));
        }
        if plan.is_empty() {
            return Err(TimetableError::failure("no sections to schedule"));
        }

        let keys = plan.section_keys();
        let rosters = plan.sections().map(|s| s.students.as_slice()).collect();
        Ok(Self {
            plan,
            slots,
            keys,
            rosters,
        })
    }

    /// Section keys in gene order.
    pub fn section_keys(&self) -> &[SectionKey] {
        &self.keys
    }

    /// Number of genes per chromosome.
    pub fn section_count(&self) -> usize {
        self.keys.len()
    }

    /// Size of the slot catalog.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Slot a chromosome assigns to a section.
    pub fn slot_for(
        &self,
        chromosome: &TimetableChromosome,
        key: &SectionKey,
    ) -> Option<&'a TimeSlot> {
        let pos = self.keys.iter().position(|k| k == key)?;
        chromosome.genes.get(pos).and_then(|&g| self.slots.get(g))
    }

    /// Creates a uniformly random chromosome.
    pub fn create_individual<R: Rng>(&self, rng: &mut R) -> TimetableChromosome {
        TimetableChromosome::random(self.section_count(), self.slot_count(), rng)
    }

    /// Conflict count of a chromosome. Zero means conflict-free.
    ///
    /// # Errors
    /// [`TimetableError::SchedulingFailure`] if the chromosome's length or
    /// any gene does not fit this problem.
    pub fn evaluate(&self, chromosome: &TimetableChromosome) -> Result<usize> {
        self.check_shape(chromosome)?;
        Ok(self.conflicts(chromosome))
    }

    /// Conflict count of a chromosome built by this problem's operators.
    pub(crate) fn conflicts(&self, chromosome: &TimetableChromosome) -> usize {
        count_conflicts(
            self.rosters
                .iter()
                .zip(&chromosome.genes)
                .map(|(&students, &gene)| (students, &self.slots[gene])),
        )
    }

    fn check_shape(&self, chromosome: &TimetableChromosome) -> Result<()> {
        if chromosome.is_valid(self.section_count(), self.slot_count()) {
            Ok(())
        } else {
            Err(TimetableError::failure(
                "chromosome does not match the section plan",
            ))
        }
    }

    /// Produces one child by uniform crossover.
    pub fn crossover<R: Rng>(
        &self,
        parent1: &TimetableChromosome,
        parent2: &TimetableChromosome,
        bias: f64,
        rng: &mut R,
    ) -> TimetableChromosome {
        uniform_crossover(parent1, parent2, bias, rng)
    }

    /// Applies per-gene reassignment mutation.
    pub fn mutate<R: Rng>(&self, individual: &mut TimetableChromosome, rate: f64, rng: &mut R) {
        reassign_mutation(individual, self.slot_count(), rate, rng);
    }

    /// Decodes a chromosome into a new, fully scheduled plan.
    ///
    /// The borrowed input plan is left untouched.
    pub fn decode(&self, chromosome: &TimetableChromosome) -> Result<SectionPlan> {
        self.check_shape(chromosome)?;

        let mut plan = self.plan.clone();
        for (key, &gene) in self.keys.iter().zip(&chromosome.genes) {
            let section = plan
                .section_mut(key)
                .ok_or_else(|| TimetableError::failure(format!("unknown section {key}")))?;
            section.schedule = Some(self.slots[gene]);
        }
        Ok(plan)
    }
}
