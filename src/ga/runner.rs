//! Generational GA loop for timetabling.
//!
//! # Algorithm
//!
//! 1. Build `population_size` random chromosomes.
//! 2. Per generation: evaluate every chromosome, update the best-ever
//!    (strictly lower fitness replaces it, so the first found wins ties),
//!    stop on fitness 0.
//! 3. Truncation selection: stable-sort by fitness, keep the top half.
//! 4. Refill the population: two parents drawn uniformly with replacement,
//!    one child by uniform crossover, then per-gene mutation.
//!
//! The generation budget bounds step 2. Evaluation is the only parallel
//! section; it never touches the RNG, so results are identical with or
//! without rayon for a given seed.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and Machine Learning"

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::cancellation::CancellationToken;
use super::chromosome::TimetableChromosome;
use super::config::GaConfig;
use super::problem::TimetableProblem;
use crate::error::{Result, TimetableError};
use crate::models::{SectionPlan, TimeSlot};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A conflict-free chromosome was found.
    PerfectSchedule,
    /// The generation budget ran out.
    GenerationLimit,
    /// The cancellation token fired between generations.
    Cancelled,
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best chromosome ever evaluated.
    pub best: TimetableChromosome,
    /// Its conflict count.
    pub best_fitness: usize,
    /// Number of generations evaluated.
    pub generations: usize,
    /// Stop reason.
    pub termination: Termination,
    /// Best-ever fitness after each evaluated generation.
    pub history: Vec<usize>,
}

/// Snapshot handed to observers after a generation is evaluated.
#[derive(Debug)]
pub struct GenerationReport<'p> {
    /// 0-based generation index.
    pub generation: usize,
    /// The evaluated population (every `fitness` is set).
    pub population: &'p [TimetableChromosome],
    /// Best-ever fitness including this generation.
    pub best_fitness: usize,
}

/// Runs the timetabling GA.
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA to completion.
    ///
    /// # Errors
    /// - [`TimetableError::InvalidConfiguration`] from [`GaConfig::validate`].
    /// - [`TimetableError::SchedulingFailure`] if no generation was evaluated
    ///   (zero budget, or cancelled before the first generation).
    pub fn run<R: Rng>(
        problem: &TimetableProblem<'_>,
        config: &GaConfig,
        cancel: &CancellationToken,
        rng: &mut R,
    ) -> Result<GaResult> {
        Self::run_observed(problem, config, cancel, rng, |_| {})
    }

    /// Runs the GA, calling `observer` after each evaluated generation.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            sections = problem.section_count(),
            slots = problem.slot_count(),
            population = config.population_size,
            max_generations = config.max_generations,
        )
    )]
    pub fn run_observed<R, F>(
        problem: &TimetableProblem<'_>,
        config: &GaConfig,
        cancel: &CancellationToken,
        rng: &mut R,
        mut observer: F,
    ) -> Result<GaResult>
    where
        R: Rng,
        F: FnMut(&GenerationReport<'_>),
    {
        config.validate()?;

        let mut population: Vec<TimetableChromosome> = (0..config.population_size)
            .map(|_| problem.create_individual(rng))
            .collect();

        let mut best: Option<TimetableChromosome> = None;
        let mut best_fitness = usize::MAX;
        let mut history = Vec::new();
        let mut termination = Termination::GenerationLimit;

        for generation in 0..config.max_generations {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }

            evaluate_population(problem, &mut population, config.parallel);

            let mut generation_best = usize::MAX;
            for chromosome in &population {
                let fitness = chromosome.fitness.unwrap_or(usize::MAX);
                generation_best = generation_best.min(fitness);
                if fitness < best_fitness {
                    best_fitness = fitness;
                    best = Some(chromosome.clone());
                }
            }
            history.push(best_fitness);

            debug!(generation, generation_best, best_fitness, "generation evaluated");
            observer(&GenerationReport {
                generation,
                population: &population,
                best_fitness,
            });

            if best_fitness == 0 {
                termination = Termination::PerfectSchedule;
                break;
            }

            let parents = select_parents(&population, config.parent_count());
            population = breed(problem, config, &parents, rng);
        }

        let Some(best) = best else {
            warn!(?termination, "no generation evaluated");
            return Err(TimetableError::failure("no schedule produced"));
        };

        let generations = history.len();
        match termination {
            Termination::PerfectSchedule => {
                info!(generations, "conflict-free schedule found");
            }
            Termination::GenerationLimit => {
                warn!(
                    generations,
                    best_fitness, "generation budget exhausted with conflicts remaining"
                );
            }
            Termination::Cancelled => {
                warn!(generations, best_fitness, "search cancelled");
            }
        }

        Ok(GaResult {
            best,
            best_fitness,
            generations,
            termination,
            history,
        })
    }
}

fn evaluate_population(
    problem: &TimetableProblem<'_>,
    population: &mut [TimetableChromosome],
    parallel: bool,
) {
    if parallel {
        population.par_iter_mut().for_each(|chromosome| {
            let fitness = problem.conflicts(chromosome);
            chromosome.fitness = Some(fitness);
        });
    } else {
        for chromosome in population.iter_mut() {
            let fitness = problem.conflicts(chromosome);
            chromosome.fitness = Some(fitness);
        }
    }
}

/// Truncation selection: the `count` fittest, ties kept in population order.
fn select_parents(population: &[TimetableChromosome], count: usize) -> Vec<&TimetableChromosome> {
    let mut ranked: Vec<&TimetableChromosome> = population.iter().collect();
    ranked.sort_by_key(|c| c.fitness.unwrap_or(usize::MAX));
    ranked.truncate(count);
    ranked
}

fn breed<R: Rng>(
    problem: &TimetableProblem<'_>,
    config: &GaConfig,
    parents: &[&TimetableChromosome],
    rng: &mut R,
) -> Vec<TimetableChromosome> {
    let mut next = Vec::with_capacity(config.population_size);
    while next.len() < config.population_size {
        let p1 = parents[rng.random_range(0..parents.len())];
        let p2 = parents[rng.random_range(0..parents.len())];
        let mut child = problem.crossover(p1, p2, config.crossover_bias, rng);
        problem.mutate(&mut child, config.mutation_rate, rng);
        next.push(child);
    }
    next
}

/// Searches for a conflict-minimizing slot assignment.
///
/// Validates `config`, runs the GA and returns a new plan with every
/// section scheduled. `plan` itself is not modified.
pub fn search<R: Rng>(
    plan: &SectionPlan,
    slots: &[TimeSlot],
    config: &GaConfig,
    rng: &mut R,
) -> Result<SectionPlan> {
    config.validate()?;
    let problem = TimetableProblem::new(plan, slots)?;
    let result = GaRunner::run(&problem, config, &CancellationToken::new(), rng)?;
    problem.decode(&result.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, StudentChoices};
    use crate::partition::partition_sections;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn weekday_slots() -> Vec<TimeSlot> {
        [
            ("MON", "09:00", "10:30"),
            ("TUE", "10:30", "12:00"),
            ("WED", "13:00", "14:30"),
            ("THR", "09:00", "10:30"),
            ("FRI", "10:30", "12:00"),
            ("SAT", "13:00", "14:30"),
        ]
        .into_iter()
        .map(|(d, s, e)| TimeSlot::parse(d, s, e).unwrap())
        .collect()
    }

    fn sample_plan() -> SectionPlan {
        let choices = StudentChoices::new()
            .with_student("234", ["Math", "Physics"])
            .with_student("235", ["Math", "Chemistry"])
            .with_student("236", ["Physics", "Chemistry"])
            .with_student("237", ["Math", "Chemistry"])
            .with_student("238", ["Math", "Physics"])
            .with_student("239", ["Math"]);
        partition_sections(&choices, 2).unwrap()
    }

    /// Three sections sharing one student but a single slot: conflicts are
    /// unavoidable, so the run always uses its whole budget.
    fn infeasible_plan() -> SectionPlan {
        let mut plan = SectionPlan::new();
        for course in ["A", "B", "C"] {
            plan.push_course(course, vec![Section::new(course, 0, vec!["s".into()])]);
        }
        plan
    }

    #[test]
    fn test_finds_conflict_free_schedule() {
        let plan = sample_plan();
        let slots = weekday_slots();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let config = GaConfig::default();
        let mut rng = SmallRng::seed_from_u64(42);

        let result = GaRunner::run(&problem, &config, &CancellationToken::new(), &mut rng).unwrap();
        assert_eq!(result.best_fitness, 0);
        assert_eq!(result.termination, Termination::PerfectSchedule);
        assert_eq!(problem.evaluate(&result.best).unwrap(), 0);
        assert!(result.generations <= config.max_generations);
    }

    #[test]
    fn test_budget_exhausted_still_returns_best() {
        let plan = infeasible_plan();
        let slots = vec![weekday_slots()[0]];
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let config = GaConfig::default().with_max_generations(5);
        let mut rng = SmallRng::seed_from_u64(3);

        let result = GaRunner::run(&problem, &config, &CancellationToken::new(), &mut rng).unwrap();
        assert_eq!(result.termination, Termination::GenerationLimit);
        assert_eq!(result.generations, 5);
        assert_eq!(result.best_fitness, 2);
        assert_eq!(result.history, vec![2; 5]);
    }

    #[test]
    fn test_zero_generations_fails() {
        let plan = sample_plan();
        let slots = weekday_slots();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let config = GaConfig::default().with_max_generations(0);
        let mut rng = SmallRng::seed_from_u64(42);

        let err =
            GaRunner::run(&problem, &config, &CancellationToken::new(), &mut rng).unwrap_err();
        assert_eq!(err, TimetableError::SchedulingFailure("no schedule produced".into()));
    }

    #[test]
    fn test_cancelled_before_start_fails() {
        let plan = sample_plan();
        let slots = weekday_slots();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut rng = SmallRng::seed_from_u64(42);

        let result = GaRunner::run(&problem, &GaConfig::default(), &cancel, &mut rng);
        assert!(matches!(result, Err(TimetableError::SchedulingFailure(_))));
    }

    #[test]
    fn test_cancel_between_generations_keeps_best() {
        let plan = infeasible_plan();
        let slots = vec![weekday_slots()[0]];
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let cancel = CancellationToken::new();
        let mut rng = SmallRng::seed_from_u64(42);

        let config = GaConfig::default();
        let result = GaRunner::run_observed(&problem, &config, &cancel, &mut rng, |report| {
            if report.generation == 2 {
                cancel.cancel();
            }
        })
        .unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.generations, 3);
    }

    #[test]
    fn test_invalid_population_rejected() {
        let plan = sample_plan();
        let slots = weekday_slots();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let config = GaConfig::default().with_population_size(7);
        let mut rng = SmallRng::seed_from_u64(42);

        assert!(matches!(
            GaRunner::run(&problem, &config, &CancellationToken::new(), &mut rng),
            Err(TimetableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_observer_sees_evaluated_populations() {
        let plan = infeasible_plan();
        let slots = weekday_slots();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let config = GaConfig::default().with_max_generations(4).with_population_size(6);
        let mut rng = SmallRng::seed_from_u64(11);

        let mut seen = 0;
        let mut last_best = usize::MAX;
        GaRunner::run_observed(&problem, &config, &CancellationToken::new(), &mut rng, |report| {
            assert_eq!(report.generation, seen);
            assert_eq!(report.population.len(), 6);
            assert!(report.population.iter().all(|c| c.fitness.is_some()));
            assert!(report.best_fitness <= last_best);
            last_best = report.best_fitness;
            seen += 1;
        })
        .unwrap();
        assert!(seen >= 1);
    }

    #[test]
    fn test_selection_is_stable_truncation() {
        let mk = |genes: Vec<usize>, fitness| TimetableChromosome {
            genes,
            fitness: Some(fitness),
        };
        let population = vec![mk(vec![0], 3), mk(vec![1], 1), mk(vec![2], 1), mk(vec![3], 0)];
        let parents = select_parents(&population, 2);
        assert_eq!(parents[0].genes, vec![3]);
        assert_eq!(parents[1].genes, vec![1]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let plan = infeasible_plan();
        let slots = weekday_slots()[..2].to_vec();
        let problem = TimetableProblem::new(&plan, &slots).unwrap();
        let base = GaConfig::default().with_max_generations(10);

        let seq = GaRunner::run(
            &problem,
            &base,
            &CancellationToken::new(),
            &mut SmallRng::seed_from_u64(5),
        )
        .unwrap();
        let par = GaRunner::run(
            &problem,
            &base.clone().with_parallel(true),
            &CancellationToken::new(),
            &mut SmallRng::seed_from_u64(5),
        )
        .unwrap();
        assert_eq!(seq.best, par.best);
        assert_eq!(seq.history, par.history);
    }

    #[test]
    fn test_search_returns_new_plan() {
        let plan = sample_plan();
        let slots = weekday_slots();
        let mut rng = SmallRng::seed_from_u64(42);

        let scheduled = search(&plan, &slots, &GaConfig::default(), &mut rng).unwrap();
        assert!(scheduled.is_fully_scheduled());
        assert!(!plan.is_fully_scheduled());
    }
}
