//! End-to-end timetable generation.
//!
//! # Pipeline
//!
//! 1. Validate GA parameters, section capacity and the slot catalog.
//! 2. Partition student choices into sections.
//! 3. Run the GA over (sections × slots).
//! 4. Decode the best chromosome into a new, fully scheduled plan.
//!
//! Every validation error surfaces before step 2 does any work.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::kpi::TimetableKpi;
use crate::error::{Result, TimetableError};
use crate::ga::{CancellationToken, GaConfig, GaRunner, Termination, TimetableProblem};
use crate::models::{SectionPlan, StudentChoices, TimeSlotRecord};
use crate::partition::{DEFAULT_MAX_ENROLL, partition_sections};
use crate::validation::validate_catalog;

/// Input container for timetable generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableRequest {
    /// Student → requested courses.
    pub choices: StudentChoices,
    /// Raw slot catalog.
    pub time_slots: Vec<TimeSlotRecord>,
    /// Section capacity.
    #[serde(default = "default_max_enroll")]
    pub max_enroll: usize,
}

fn default_max_enroll() -> usize {
    DEFAULT_MAX_ENROLL
}

impl TimetableRequest {
    /// Creates a request with the default section capacity.
    pub fn new(choices: StudentChoices, time_slots: Vec<TimeSlotRecord>) -> Self {
        Self {
            choices,
            time_slots,
            max_enroll: DEFAULT_MAX_ENROLL,
        }
    }

    /// Sets the section capacity.
    pub fn with_max_enroll(mut self, max_enroll: usize) -> Self {
        self.max_enroll = max_enroll;
        self
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone)]
pub struct TimetableOutcome {
    /// Scheduled sections.
    pub plan: SectionPlan,
    /// Conflicts left in `plan` (0 when conflict-free).
    pub conflicts: usize,
    /// Generations evaluated.
    pub generations: usize,
    /// Why the search stopped.
    pub termination: Termination,
    /// Quality metrics of `plan`.
    pub kpi: TimetableKpi,
}

/// Timetable generator.
///
/// # Example
///
/// ```
/// use u_timetable::models::{StudentChoices, TimeSlotRecord};
/// use u_timetable::ga::GaConfig;
/// use u_timetable::scheduler::{Timetabler, TimetableRequest};
///
/// let choices = StudentChoices::new()
///     .with_student("1", ["Math", "Art"])
///     .with_student("2", ["Math"]);
/// let slots = vec![
///     TimeSlotRecord::new("MON", "09:00", "10:30"),
///     TimeSlotRecord::new("TUE", "09:00", "10:30"),
/// ];
/// let request = TimetableRequest::new(choices, slots);
///
/// let outcome = Timetabler::new(GaConfig::default().with_seed(7))
///     .generate(&request)
///     .unwrap();
/// assert!(outcome.plan.is_fully_scheduled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Timetabler {
    config: GaConfig,
    cancellation: CancellationToken,
}

impl Timetabler {
    /// Creates a generator with the given GA parameters.
    pub fn new(config: GaConfig) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Attaches a cancellation token checked between generations.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// GA parameters in use.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Generates a timetable, seeding the RNG from `config.seed` (or the OS).
    pub fn generate(&self, request: &TimetableRequest) -> Result<TimetableOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        self.generate_with_rng(request, &mut rng)
    }

    /// Generates a timetable using a caller-supplied random source.
    #[instrument(
        level = "debug",
        skip_all,
        fields(
            students = request.choices.len(),
            slots = request.time_slots.len(),
            max_enroll = request.max_enroll
        )
    )]
    pub fn generate_with_rng<R: Rng>(
        &self,
        request: &TimetableRequest,
        rng: &mut R,
    ) -> Result<TimetableOutcome> {
        self.config.validate()?;
        if request.max_enroll == 0 {
            return Err(TimetableError::config("max_enroll must be at least 1"));
        }
        let slots = validate_catalog(&request.time_slots)?;

        let plan = partition_sections(&request.choices, request.max_enroll)?;
        if plan.is_empty() {
            return Err(TimetableError::failure("no sections to schedule"));
        }

        let problem = TimetableProblem::new(&plan, &slots)?;
        let result = GaRunner::run(&problem, &self.config, &self.cancellation, rng)?;
        let scheduled = problem.decode(&result.best)?;
        let kpi = TimetableKpi::calculate(&scheduled);

        info!(
            sections = kpi.section_count,
            conflicts = result.best_fitness,
            generations = result.generations,
            "timetable generated"
        );

        Ok(TimetableOutcome {
            plan: scheduled,
            conflicts: result.best_fitness,
            generations: result.generations,
            termination: result.termination,
            kpi,
        })
    }
}
