//! Trigger matching and execution.
//!
//! One call to [`TriggerEngine::dispatch`] processes one occurrence from
//! start to finish:
//!
//! ```text
//! Received -> Matching -> ConditionCheck -> Executing -> Done
//!                               |
//!                               +-> Failed (a condition was false)
//! ```
//!
//! Triggers are visited in scenario order. Each runs at most once per
//! occurrence, however many of its events match.

use tracing::{debug, trace, warn};

use crate::core::{EngineConfig, RandomSource, ScriptRng};
use crate::domain::DomainServices;
use crate::error::EvalError;
use crate::eval::{Context, Evaluator, Value};
use crate::graph::{NodeId, VariantRegistry};
use crate::scenario::{Scenario, Trigger, TriggerId};

use super::event::{Occurrence, OccurrenceKind};

/// Phase of a trigger within one dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchPhase {
    /// Occurrence received, context built.
    Received,
    /// Looking for matching events.
    Matching,
    /// Evaluating conditions in order.
    ConditionCheck,
    /// Running actions in order.
    Executing,
    /// All actions attempted.
    Done,
    /// A condition evaluated to false.
    Failed,
}

/// How a matched trigger ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriggerStatus {
    /// Conditions held and every action was attempted.
    Done,
    /// A condition was false; no action ran.
    Failed,
    /// A condition could not be evaluated; no action ran.
    Errored(EvalError),
}

/// An action that could not complete.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionFailure {
    /// The action node.
    pub node: NodeId,
    /// Why it failed.
    pub error: EvalError,
}

/// Result of running one matched trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerOutcome {
    /// The trigger.
    pub trigger: TriggerId,
    /// Terminal status.
    pub status: TriggerStatus,
    /// Conditions evaluated (including the one that stopped the check).
    pub conditions_checked: usize,
    /// Actions that completed.
    pub actions_executed: usize,
    /// Actions that failed, in execution order.
    pub action_failures: Vec<ActionFailure>,
}

impl TriggerOutcome {
    fn new(trigger: TriggerId) -> Self {
        Self {
            trigger,
            status: TriggerStatus::Done,
            conditions_checked: 0,
            actions_executed: 0,
            action_failures: Vec::new(),
        }
    }

    /// The terminal phase this outcome corresponds to.
    #[must_use]
    pub fn phase(&self) -> DispatchPhase {
        match self.status {
            TriggerStatus::Done => DispatchPhase::Done,
            TriggerStatus::Failed | TriggerStatus::Errored(_) => DispatchPhase::Failed,
        }
    }
}

/// Everything one dispatch did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    /// Kind of the occurrence dispatched.
    pub kind: OccurrenceKind,
    /// Whether the occurrence was dropped because no scenario was loaded.
    pub dropped: bool,
    /// One outcome per matched trigger, in scenario order.
    pub outcomes: Vec<TriggerOutcome>,
}

impl DispatchReport {
    fn new(kind: OccurrenceKind) -> Self {
        Self {
            kind,
            dropped: false,
            outcomes: Vec::new(),
        }
    }

    /// Outcome for a trigger, if it matched.
    #[must_use]
    pub fn outcome(&self, trigger: TriggerId) -> Option<&TriggerOutcome> {
        self.outcomes.iter().find(|o| o.trigger == trigger)
    }

    /// Triggers whose actions ran.
    pub fn fired(&self) -> impl Iterator<Item = TriggerId> + '_ {
        self.outcomes
            .iter()
            .filter(|o| o.status == TriggerStatus::Done)
            .map(|o| o.trigger)
    }

    /// Total number of actions that completed.
    #[must_use]
    pub fn actions_executed(&self) -> usize {
        self.outcomes.iter().map(|o| o.actions_executed).sum()
    }
}

/// Matches occurrences against a scenario's triggers and runs them.
pub struct TriggerEngine {
    registry: VariantRegistry,
    config: EngineConfig,
    rng: Box<dyn RandomSource>,
}

impl TriggerEngine {
    /// Create an engine with the built-in variants.
    ///
    /// The random source is seeded from `config.seed`, or from entropy
    /// when no seed is configured.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_registry(VariantRegistry::with_builtins(), config)
    }

    /// Create an engine with a custom variant registry.
    ///
    /// A configuration that fails [`EngineConfig::validate`] is logged and
    /// its depth limit raised to 1.
    #[must_use]
    pub fn with_registry(registry: VariantRegistry, mut config: EngineConfig) -> Self {
        if let Err(error) = config.validate() {
            warn!(%error, "invalid engine config, clamping max_depth");
            config.max_depth = config.max_depth.max(1);
        }
        let rng = match config.seed {
            Some(seed) => ScriptRng::new(seed),
            None => ScriptRng::from_entropy(),
        };
        Self {
            registry,
            config,
            rng: Box::new(rng),
        }
    }

    /// Replace the random source (builder pattern).
    #[must_use]
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// The variant registry.
    #[must_use]
    pub fn registry(&self) -> &VariantRegistry {
        &self.registry
    }

    /// The variant registry, for registering host variants.
    pub fn registry_mut(&mut self) -> &mut VariantRegistry {
        &mut self.registry
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one occurrence.
    ///
    /// With no scenario loaded the occurrence is dropped. Errors never
    /// escape: they are logged and recorded in the report, and only the
    /// affected trigger or action is skipped.
    pub fn dispatch(
        &mut self,
        scenario: Option<&Scenario>,
        services: &mut dyn DomainServices,
        occurrence: &Occurrence,
    ) -> DispatchReport {
        let kind = occurrence.kind();
        let mut report = DispatchReport::new(kind);
        let Some(scenario) = scenario else {
            debug!(occurrence = %kind, "no scenario loaded, dropping occurrence");
            report.dropped = true;
            return report;
        };

        trace!(occurrence = %kind, phase = ?DispatchPhase::Received);
        let context = Context::from_occurrence(occurrence);
        let log_conditions = self.config.log_condition_results;
        let mut evaluator = Evaluator::new(
            &self.registry,
            scenario,
            &context,
            services,
            self.rng.as_mut(),
        )
        .with_max_depth(self.config.max_depth);

        for trigger in scenario.triggers() {
            if !trigger.is_enabled() {
                continue;
            }
            trace!(trigger = %trigger.id(), phase = ?DispatchPhase::Matching);
            if !matches(&mut evaluator, &self.registry, trigger, &context) {
                continue;
            }
            debug!(trigger = %trigger.id(), name = trigger.name(), occurrence = %kind, "trigger matched");
            report
                .outcomes
                .push(run(&mut evaluator, trigger, log_conditions));
        }
        report
    }

    /// Evaluate a single node outside of a dispatch, e.g. for an editor
    /// preview.
    ///
    /// # Errors
    /// Returns the `EvalError` raised by the node.
    pub fn evaluate(
        &mut self,
        scenario: &Scenario,
        services: &mut dyn DomainServices,
        context: &Context,
        node: NodeId,
    ) -> Result<Value, EvalError> {
        Evaluator::new(&self.registry, scenario, context, services, self.rng.as_mut())
            .with_max_depth(self.config.max_depth)
            .evaluate(node)
    }
}

impl std::fmt::Debug for TriggerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerEngine")
            .field("variants", &self.registry.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Whether any of the trigger's events listens for this occurrence.
fn matches(
    evaluator: &mut Evaluator<'_>,
    registry: &VariantRegistry,
    trigger: &Trigger,
    context: &Context,
) -> bool {
    let scenario = evaluator.scenario();
    trigger.events().any(|id| {
        let Some(node) = scenario.nodes().get(id) else {
            return false;
        };
        let Some(def) = registry.get(node.variant().as_str()) else {
            return false;
        };
        if def.occurrence != Some(context.kind()) {
            return false;
        }

        let Some(region) = context.region() else {
            return true;
        };
        if def.param_spec("region").is_none() {
            return true;
        }
        match evaluator.arg_region(node, "region") {
            Ok(listened) => listened == region,
            Err(error) => {
                warn!(trigger = %trigger.id(), event = %id, %error, "event region could not be evaluated");
                false
            }
        }
    })
}

fn run(evaluator: &mut Evaluator<'_>, trigger: &Trigger, log_conditions: bool) -> TriggerOutcome {
    let mut outcome = TriggerOutcome::new(trigger.id());

    trace!(trigger = %trigger.id(), phase = ?DispatchPhase::ConditionCheck);
    for condition in trigger.conditions() {
        outcome.conditions_checked += 1;
        match evaluator.evaluate_bool(condition) {
            Ok(true) => {
                if log_conditions {
                    debug!(trigger = %trigger.id(), %condition, "condition held");
                }
            }
            Ok(false) => {
                if log_conditions {
                    debug!(trigger = %trigger.id(), %condition, "condition false");
                }
                trace!(trigger = %trigger.id(), phase = ?DispatchPhase::Failed);
                outcome.status = TriggerStatus::Failed;
                return outcome;
            }
            Err(error) => {
                warn!(trigger = %trigger.id(), %condition, %error, "condition could not be evaluated");
                outcome.status = TriggerStatus::Errored(error);
                return outcome;
            }
        }
    }

    trace!(trigger = %trigger.id(), phase = ?DispatchPhase::Executing);
    for action in trigger.actions() {
        match evaluator.evaluate(action) {
            Ok(_) => outcome.actions_executed += 1,
            Err(error) => {
                warn!(trigger = %trigger.id(), %action, %error, "action failed");
                outcome.action_failures.push(ActionFailure { node: action, error });
            }
        }
    }

    trace!(trigger = %trigger.id(), phase = ?DispatchPhase::Done);
    outcome
}
