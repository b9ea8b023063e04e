//! Grounding: turning action schemas into concrete actions over the problem's
//! objects, testing them against states and applying their effects.

use std::collections::HashSet;

use itertools::Itertools;

use super::action::{ActionSchema, Bindings, GroundAction};
use super::domain::Domain;
use super::literal::Literal;
use super::state::State;
use crate::config::PlannerConfig;
use crate::error::Error;
use crate::sink::Sink;

/// Every tuple of objects the schema's parameters may be bound to, in parameter order.
///
/// With `:typing`, parameter `i` only takes objects of its declared type; without
/// it, every object is a candidate. In `fast` mode an object is never used for two
/// parameters of the same action.
pub fn parameter_combinations(domain: &Domain, schema: &ActionSchema, fast: bool) -> Result<Vec<Vec<String>>, Error> {
    if schema.parameters.is_empty() {
        return Ok(vec![Vec::new()]);
    }
    let candidates: Vec<Vec<String>> = if domain.requires_typing() {
        let mut candidates = Vec::with_capacity(schema.parameters.len());
        for parameter in &schema.parameters {
            let kind = parameter.kind.as_ref().ok_or_else(|| Error::UntypedParameter {
                action: schema.name.clone(),
                parameter: parameter.name.clone(),
            })?;
            match domain.values.of_type(kind) {
                Some(objects) if !objects.is_empty() => candidates.push(objects.to_vec()),
                _ => return Err(Error::UnknownType { action: schema.name.clone(), kind: kind.clone() }),
            }
        }
        candidates
    } else {
        let all = domain.values.all();
        if all.is_empty() {
            return Err(Error::NoValues);
        }
        if fast {
            return Ok(all.into_iter().permutations(schema.parameters.len()).collect());
        }
        vec![all; schema.parameters.len()]
    };

    let mut seen = HashSet::new();
    Ok(candidates
        .into_iter()
        .multi_cartesian_product()
        .filter(|combo| !fast || combo.iter().all_unique())
        .filter(|combo| seen.insert(combo.clone()))
        .collect())
}

/// True when every positive literal of `precondition` holds in `state` and no negative one does.
pub fn is_precondition_satisfied(state: &State, precondition: &[Literal]) -> bool {
    let and_count = precondition.iter().filter(|l| l.is_positive()).count();
    let mut matched = 0;
    for literal in precondition {
        if state.holds_atom(literal) {
            if literal.is_positive() {
                matched += 1;
            } else {
                // A negative literal that exists in the state vetoes the action.
                return false;
            }
        }
    }
    matched == and_count
}

/// The state after `action`: positive effects added, negative effects removed. `state` is left untouched.
pub fn apply_action(action: &GroundAction, state: &State) -> State {
    let mut result = state.clone();
    for effect in &action.effect {
        if effect.is_positive() {
            if !result.contains(effect) {
                result = result.with(effect.clone());
            }
        } else {
            let atom = effect.atom();
            if result.contains(&atom) {
                result = result.without(&atom);
            }
        }
    }
    result
}

/// True when every positive goal literal is in `state` and no negative goal literal's atom is.
pub fn is_goal(state: &State, goal: &State) -> bool {
    goal.literals().all(|literal| {
        if literal.is_positive() {
            state.contains(literal)
        } else {
            !state.contains(&literal.atom())
        }
    })
}

/// A domain prepared for grounding: parameter combinations are enumerated once per
/// schema, and the configuration and diagnostics sink are carried to every caller.
pub struct Grounder<'a> {
    domain: &'a Domain,
    config: &'a PlannerConfig,
    sink: &'a dyn Sink,
    combinations: Vec<Vec<Vec<String>>>,
}

impl<'a> Grounder<'a> {
    pub fn new(domain: &'a Domain, config: &'a PlannerConfig, sink: &'a dyn Sink) -> Result<Grounder<'a>, Error> {
        match Self::prepare(domain, config) {
            Ok(combinations) => Ok(Grounder { domain, config, sink, combinations }),
            Err(e) => {
                sink.error(&e.to_string());
                Err(e)
            }
        }
    }

    fn prepare(domain: &Domain, config: &PlannerConfig) -> Result<Vec<Vec<Vec<String>>>, Error> {
        config.validate().map_err(|e| Error::InvalidConfig(e.to_string()))?;
        if domain.requires_typing() && !domain.values.untyped().is_empty() {
            return Err(Error::UntypedObjects(domain.values.untyped().to_vec()));
        }
        if domain.values.is_empty() && domain.actions.iter().any(|a| !a.parameters.is_empty()) {
            return Err(Error::NoValues);
        }
        domain.actions.iter().map(|schema| parameter_combinations(domain, schema, config.fast)).collect()
    }

    pub fn domain(&self) -> &Domain {
        self.domain
    }

    pub fn config(&self) -> &PlannerConfig {
        self.config
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink
    }

    /// Emits a progress line when the configuration is verbose.
    pub(crate) fn progress<F: FnOnce() -> String>(&self, message: F) {
        if self.config.verbose {
            self.sink.progress(&message());
        }
    }

    pub fn combinations(&self, schema: usize) -> &[Vec<String>] {
        &self.combinations[schema]
    }

    /// Every ground action whose precondition holds in `state`, in schema then
    /// combination order. The first grounding of a given name and values wins.
    pub fn applicable_actions(&self, state: &State) -> Vec<GroundAction> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        for (schema, combinations) in self.domain.actions.iter().zip(&self.combinations) {
            for values in combinations {
                if let Some(action) = self.ground(schema, values, state) {
                    if seen.insert(action.key()) {
                        result.push(action);
                    }
                }
            }
        }
        result
    }

    fn ground(&self, schema: &ActionSchema, values: &[String], state: &State) -> Option<GroundAction> {
        let bindings = match Bindings::new(&schema.name, &schema.parameters, values) {
            Ok(bindings) => bindings,
            Err(e) => {
                self.sink.error(&e.to_string());
                return None;
            }
        };
        let precondition: Vec<Literal> =
            schema.precondition.iter().map(|l| l.substitute(&bindings, |_| ())).collect();
        if !is_precondition_satisfied(state, &precondition) {
            return None;
        }
        let effect = schema
            .effect
            .iter()
            .map(|l| {
                l.substitute(&bindings, |parameter| {
                    self.sink.error(&format!("Value not found for parameter {} of action {}.", parameter, schema.name))
                })
            })
            .collect();
        Some(GroundAction::new(&schema.name, bindings, precondition, effect))
    }

    /// Applicability over a literal set that may hold negative literals, as planning
    /// graph levels do. Actions are gathered once over the positive literals and once
    /// over the positives left after cancelling each against its negation, then merged.
    pub fn applicable_actions_plus(&self, state: &State) -> Vec<GroundAction> {
        let mut result = self.applicable_actions(&state.positives());
        let mut seen: HashSet<_> = result.iter().map(|a| a.key()).collect();
        for action in self.applicable_actions(&state.reconciled()) {
            if seen.insert(action.key()) {
                result.push(action);
            }
        }
        result
    }

    /// Applicable actions paired with the states they lead to.
    pub fn child_states(&self, state: &State) -> Vec<(GroundAction, State)> {
        self.applicable_actions(state)
            .into_iter()
            .map(|action| {
                let child = apply_action(&action, state);
                (action, child)
            })
            .collect()
    }
}
