//! Mutual exclusion analysis for one planning graph layer.
//!
//! Every relation is stored on both ends and tagged with the rule that found it.
//! Item relations are computed first because literal support is judged from them.

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;

use super::graph::{Item, Layer, LiteralNode};
use crate::strips::{GroundAction, Literal};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutexReason {
    /// One action's effect negates an effect of the other.
    InconsistentEffect,
    /// One action's effect negates a precondition of the other.
    Interference,
    /// The literals are negations of each other.
    Negation,
    /// Every way of producing one literal is exclusive with every way of producing the other.
    InconsistentSupport,
    /// The actions' preconditions are exclusive one level down.
    CompetingNeeds,
}

impl fmt::Display for MutexReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MutexReason::InconsistentEffect => write!(f, "inconsistentEffect"),
            MutexReason::Interference => write!(f, "interference"),
            MutexReason::Negation => write!(f, "negation"),
            MutexReason::InconsistentSupport => write!(f, "inconsistentSupport"),
            MutexReason::CompetingNeeds => write!(f, "competingNeeds"),
        }
    }
}

/// An exclusion against the item or literal at index `with` of the same layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Mutex {
    pub with: usize,
    pub reason: MutexReason,
}

fn push_unique(list: &mut Vec<Mutex>, mutex: Mutex) {
    if !list.contains(&mutex) {
        list.push(mutex);
    }
}

fn link_items(items: &mut [Item], a: usize, b: usize, reason: MutexReason) {
    if a == b {
        return;
    }
    push_unique(&mut items[a].mutex, Mutex { with: b, reason });
    push_unique(&mut items[b].mutex, Mutex { with: a, reason });
}

fn link_literals(literals: &mut [LiteralNode], a: usize, b: usize, reason: MutexReason) {
    if a == b {
        return;
    }
    push_unique(&mut literals[a].mutex, Mutex { with: b, reason });
    push_unique(&mut literals[b].mutex, Mutex { with: a, reason });
}

/// Items of the layer indexed by the effect literals they produce.
fn producers(items: &[Item]) -> HashMap<Literal, Vec<usize>> {
    let mut index: HashMap<Literal, Vec<usize>> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        for effect in &item.action.effect {
            index.entry(effect.clone()).or_default().push(i);
        }
    }
    index
}

/// Pairs `(i, j)` where `i` is a real action and `j` produces the negation of
/// one of the literals `side` picks from `i`.
fn opposed(
    items: &[Item],
    producers: &HashMap<Literal, Vec<usize>>,
    side: fn(&GroundAction) -> &[Literal],
) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, item) in items.iter().enumerate().filter(|(_, item)| !item.action.is_noop()) {
        for literal in side(&item.action) {
            if let Some(partners) = producers.get(&literal.negated()) {
                pairs.extend(partners.iter().filter(|&&j| j != i).map(|&j| (i, j)));
            }
        }
    }
    pairs
}

/// Annotates `layer` with every mutex relation. `previous` is the layer whose
/// literals are this layer's preconditions; it is `None` for the first layer.
pub fn mark(layer: &mut Layer, previous: Option<&Layer>, competing_needs: bool) {
    if let Some(previous) = previous {
        carry_forward(layer, previous);
        if competing_needs {
            mark_competing_needs(layer, previous);
        }
    }
    let producers = producers(&layer.items);
    mark_inconsistent_effects(layer, &producers);
    mark_interference(layer, &producers);
    mark_negation(layer);
    mark_inconsistent_support(layer);
}

/// No-ops persisting two exclusive literals are exclusive for the same reason.
/// The no-op at index `i` persists literal `i` of the previous layer.
fn carry_forward(layer: &mut Layer, previous: &Layer) {
    debug_assert_eq!(layer.noop_count(), previous.literals.len());
    for (i, node) in previous.literals.iter().enumerate() {
        for mutex in &node.mutex {
            link_items(&mut layer.items, i, mutex.with, mutex.reason);
        }
    }
}

fn mark_competing_needs(layer: &mut Layer, previous: &Layer) {
    let needs: Vec<Vec<usize>> = layer
        .items
        .iter()
        .map(|item| item.action.precondition.iter().filter_map(|p| previous.literal(p)).collect())
        .collect();
    let mut pairs = Vec::new();
    for ((i, a), (j, b)) in needs.iter().enumerate().tuple_combinations() {
        let competing = a.iter().any(|&x| b.iter().any(|&y| previous.literals[x].is_mutex_with(y)));
        if competing {
            pairs.push((i, j));
        }
    }
    for (i, j) in pairs {
        link_items(&mut layer.items, i, j, MutexReason::CompetingNeeds);
    }
}

fn mark_inconsistent_effects(layer: &mut Layer, producers: &HashMap<Literal, Vec<usize>>) {
    for (i, j) in opposed(&layer.items, producers, |action| action.effect.as_slice()) {
        link_items(&mut layer.items, i, j, MutexReason::InconsistentEffect);
    }
}

fn mark_interference(layer: &mut Layer, producers: &HashMap<Literal, Vec<usize>>) {
    for (i, j) in opposed(&layer.items, producers, |action| action.precondition.as_slice()) {
        link_items(&mut layer.items, i, j, MutexReason::Interference);
    }
}

fn mark_negation(layer: &mut Layer) {
    let pairs: Vec<(usize, usize)> = (0..layer.literals.len())
        .filter_map(|a| layer.literal(&layer.literals[a].literal.negated()).map(|b| (a, b)))
        .collect();
    for (a, b) in pairs {
        link_literals(&mut layer.literals, a, b, MutexReason::Negation);
    }
}

fn mark_inconsistent_support(layer: &mut Layer) {
    let items = &layer.items;
    let mut pairs = Vec::new();
    for ((a, first), (b, second)) in layer.literals.iter().enumerate().tuple_combinations() {
        // A shared producer can give both literals at once.
        let apart = first
            .producers
            .iter()
            .all(|&x| second.producers.iter().all(|&y| x != y && items[x].is_mutex_with(y)));
        if apart {
            pairs.push((a, b));
        }
    }
    for (a, b) in pairs {
        link_literals(&mut layer.literals, a, b, MutexReason::InconsistentSupport);
    }
}

#[cfg(test)]
mod tests {
    use enumset::EnumSet;

    use super::{Mutex, MutexReason};
    use crate::config::PlannerConfig;
    use crate::graphplan::graph::{Layer, PlanningGraph};
    use crate::sink::MemorySink;
    use crate::strips::{ActionSchema, Domain, Grounder, Literal, State, Values};

    fn hot() -> Literal {
        Literal::positive("hot", &["pot"])
    }

    fn action(name: &str, precondition: Vec<Literal>, effect: Vec<Literal>) -> ActionSchema {
        ActionSchema::new(name, vec![], precondition, effect)
    }

    fn kitchen(extra: Vec<ActionSchema>) -> Domain {
        let mut actions = vec![action("heat", vec![], vec![hot()]), action("cool", vec![], vec![hot().negated()])];
        actions.extend(extra);
        Domain::new("kitchen", EnumSet::empty(), actions).with_values(Values::new().with(None, &["pot"]))
    }

    fn init() -> State {
        vec![Literal::positive("ready", &["pot"])].into_iter().collect()
    }

    fn item(layer: &Layer, name: &str) -> usize {
        layer.items.iter().position(|i| i.action.to_string() == name).unwrap()
    }

    fn assert_symmetric(layer: &Layer) {
        for (i, item) in layer.items.iter().enumerate() {
            for mutex in &item.mutex {
                assert!(layer.items[mutex.with].is_mutex_with(i), "{} -> {}", item.action, mutex.with);
            }
        }
        for (i, node) in layer.literals.iter().enumerate() {
            for mutex in &node.mutex {
                assert!(layer.literals[mutex.with].is_mutex_with(i));
            }
        }
    }

    #[test]
    fn test_inconsistent_effects_on_first_layer() {
        let domain = kitchen(vec![]);
        let config = PlannerConfig::default();
        let sink = MemorySink::new();
        let grounder = Grounder::new(&domain, &config, &sink).unwrap();
        let graph = PlanningGraph::new(&grounder, &init());
        let layer = &graph.layers()[0];
        let (heat, cool) = (item(layer, "heat"), item(layer, "cool"));
        assert_eq!(layer.items[heat].mutex, vec![Mutex { with: cool, reason: MutexReason::InconsistentEffect }]);
        assert_eq!(layer.items[cool].mutex, vec![Mutex { with: heat, reason: MutexReason::InconsistentEffect }]);
        assert!(layer.items[item(layer, "noop (ready pot)")].mutex.is_empty());

        let (h, not_h) = (layer.literal(&hot()).unwrap(), layer.literal(&hot().negated()).unwrap());
        assert_eq!(layer.literals[h].mutex, vec![
            Mutex { with: not_h, reason: MutexReason::Negation },
            Mutex { with: not_h, reason: MutexReason::InconsistentSupport },
        ]);
        let ready = layer.literal(&Literal::positive("ready", &["pot"])).unwrap();
        assert!(layer.literals[ready].mutex.is_empty());
        assert_symmetric(layer);
    }

    #[test]
    fn test_interference() {
        let serve = action(
            "serve",
            vec![Literal::positive("ready", &["pot"])],
            vec![Literal::positive("served", &["pot"]), Literal::negative("ready", &["pot"])],
        );
        let spill = action("spill", vec![], vec![Literal::negative("ready", &["pot"])]);
        let domain = kitchen(vec![serve, spill]);
        let config = PlannerConfig::default();
        let sink = MemorySink::new();
        let grounder = Grounder::new(&domain, &config, &sink).unwrap();
        let graph = PlanningGraph::new(&grounder, &init());
        let layer = &graph.layers()[0];
        let (serve, spill, noop) = (item(layer, "serve"), item(layer, "spill"), item(layer, "noop (ready pot)"));
        // Deleting its own precondition does not make serve exclusive with itself.
        assert_eq!(layer.items[serve].mutex, vec![
            Mutex { with: noop, reason: MutexReason::InconsistentEffect },
            Mutex { with: spill, reason: MutexReason::Interference },
        ]);
        assert!(layer.items[spill].is_mutex_with(noop));
        assert_symmetric(layer);
    }

    #[test]
    fn test_literal_mutexes_carry_onto_noops() {
        let domain = kitchen(vec![]);
        let config = PlannerConfig::default();
        let sink = MemorySink::new();
        let grounder = Grounder::new(&domain, &config, &sink).unwrap();
        let mut graph = PlanningGraph::new(&grounder, &init());
        graph.grow();
        let layer = &graph.layers()[1];
        let keep_hot = item(layer, "noop (hot pot)");
        let keep_cold = item(layer, "noop (not (hot pot))");
        assert!(layer.items[keep_hot].mutex.contains(&Mutex { with: keep_cold, reason: MutexReason::Negation }));
        assert!(layer.items[keep_hot].mutex.contains(&Mutex { with: keep_cold, reason: MutexReason::InconsistentSupport }));
        for layer in graph.layers() {
            assert_symmetric(layer);
        }
    }

    #[test]
    fn test_competing_needs_is_opt_in() {
        let taste = action("taste", vec![hot()], vec![Literal::positive("tasted", &["pot"])]);
        let chill = action("chill", vec![hot().negated()], vec![Literal::positive("chilled", &["pot"])]);
        let domain = kitchen(vec![taste, chill]);
        let sink = MemorySink::new();

        let config = PlannerConfig::default();
        let grounder = Grounder::new(&domain, &config, &sink).unwrap();
        let mut graph = PlanningGraph::new(&grounder, &init());
        graph.grow();
        let layer = &graph.layers()[1];
        assert!(!layer.items[item(layer, "taste")].is_mutex_with(item(layer, "chill")));

        let mut config = PlannerConfig::default();
        config.graph.competing_needs = true;
        let grounder = Grounder::new(&domain, &config, &sink).unwrap();
        let mut graph = PlanningGraph::new(&grounder, &init());
        graph.grow();
        let layer = &graph.layers()[1];
        let (taste, chill) = (item(layer, "taste"), item(layer, "chill"));
        assert!(layer.items[taste].mutex.contains(&Mutex { with: chill, reason: MutexReason::CompetingNeeds }));
        assert!(layer.items[chill].mutex.contains(&Mutex { with: taste, reason: MutexReason::CompetingNeeds }));
        assert_symmetric(layer);
    }
}
