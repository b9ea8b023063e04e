use std::collections::HashMap;

use super::mutex::{self, Mutex};
use crate::strips::{GroundAction, Grounder, Literal, State};

/// An action or no-op placed in a layer.
#[derive(Clone, Debug)]
pub struct Item {
    pub action: GroundAction,
    pub mutex: Vec<Mutex>,
}

impl Item {
    fn new(action: GroundAction) -> Item {
        Item { action, mutex: Vec::new() }
    }

    pub fn is_mutex_with(&self, other: usize) -> bool {
        self.mutex.iter().any(|m| m.with == other)
    }
}

/// A literal produced by a layer, with the indices of the items producing it.
#[derive(Clone, Debug)]
pub struct LiteralNode {
    pub literal: Literal,
    pub producers: Vec<usize>,
    pub mutex: Vec<Mutex>,
}

impl LiteralNode {
    pub fn is_mutex_with(&self, other: usize) -> bool {
        self.mutex.iter().any(|m| m.with == other)
    }
}

/// Action layer A(k) together with the literal level P(k+1) it produces.
///
/// Items start with one no-op per literal of P(k), in the order of that level,
/// followed by the actions applicable over P(k).
#[derive(Clone, Debug, Default)]
pub struct Layer {
    pub items: Vec<Item>,
    pub literals: Vec<LiteralNode>,
    noops: usize,
    index: HashMap<Literal, usize>,
}

impl Layer {
    fn new<I>(persisted: I, actions: Vec<GroundAction>, skip_negative_literals: bool) -> Layer
    where
        I: IntoIterator<Item = Literal>,
    {
        let mut items: Vec<Item> = persisted.into_iter().map(|l| Item::new(GroundAction::noop(l))).collect();
        let noops = items.len();
        items.extend(actions.into_iter().map(Item::new));

        let mut literals: Vec<LiteralNode> = Vec::new();
        let mut index: HashMap<Literal, usize> = HashMap::new();
        for (i, item) in items.iter().enumerate() {
            for effect in &item.action.effect {
                if skip_negative_literals && effect.is_negative() {
                    continue;
                }
                let node = *index.entry(effect.clone()).or_insert_with(|| {
                    literals.push(LiteralNode { literal: effect.clone(), producers: Vec::new(), mutex: Vec::new() });
                    literals.len() - 1
                });
                if !literals[node].producers.contains(&i) {
                    literals[node].producers.push(i);
                }
            }
        }
        Layer { items, literals, noops, index }
    }

    /// Index of `literal` in this layer's literal level.
    pub fn literal(&self, literal: &Literal) -> Option<usize> {
        self.index.get(literal).copied()
    }

    pub fn noop_count(&self) -> usize {
        self.noops
    }

    pub fn action_count(&self) -> usize {
        self.items.len() - self.noops
    }

    /// The real actions, without no-ops.
    pub fn actions(&self) -> impl Iterator<Item = &GroundAction> {
        self.items[self.noops..].iter().map(|i| &i.action)
    }

    /// The produced literal level as a state, which may hold both a literal and its negation.
    pub fn level(&self) -> State {
        self.literals.iter().map(|n| n.literal.clone()).collect()
    }
}

/// A planning graph over one initial state. Layers are only ever appended, and
/// a layer's mutexes are final once it is appended.
pub struct PlanningGraph<'a> {
    grounder: &'a Grounder<'a>,
    init: State,
    layers: Vec<Layer>,
    leveled_at: Option<usize>,
}

impl<'a> PlanningGraph<'a> {
    /// A graph holding only the first layer: one no-op per initial literal plus
    /// every action applicable in the initial state.
    pub fn new(grounder: &'a Grounder<'a>, init: &State) -> PlanningGraph<'a> {
        let config = &grounder.config().graph;
        let mut first = Layer::new(
            init.literals().cloned(),
            grounder.applicable_actions_plus(init),
            config.skip_negative_literals,
        );
        mutex::mark(&mut first, None, config.competing_needs);
        grounder.progress(|| {
            format!("P0: {}, A0: {}, P1: {}", first.noop_count(), first.action_count(), first.literals.len())
        });
        PlanningGraph { grounder, init: init.clone(), layers: vec![first], leveled_at: None }
    }

    /// Builds layers until the graph levels off, keeping at least `min_layers`
    /// and at most `max_layers` from the graph configuration. A layer that adds
    /// nothing new is only kept when the minimum asks for it.
    pub fn build(grounder: &'a Grounder<'a>, init: &State) -> PlanningGraph<'a> {
        let config = &grounder.config().graph;
        let mut graph = PlanningGraph::new(grounder, init);
        while config.max_layers.map_or(true, |max| graph.len() < max) {
            let next = graph.next_layer();
            if graph.levels_off_with(&next) {
                graph.leveled_at.get_or_insert(graph.len() - 1);
                if graph.len() >= config.min_layers {
                    break;
                }
            }
            graph.push(next);
        }
        graph
    }

    /// Appends one more layer, whether or not it adds anything new.
    pub fn grow(&mut self) {
        let next = self.next_layer();
        if self.levels_off_with(&next) {
            self.leveled_at.get_or_insert(self.len() - 1);
        }
        self.push(next);
    }

    fn push(&mut self, layer: Layer) {
        let k = self.layers.len();
        self.grounder.progress(|| {
            format!("Processing layer {}. P{}: {}, A{}: {}", k, k, layer.noop_count(), k, layer.action_count())
        });
        self.layers.push(layer);
    }

    fn top(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    fn next_layer(&self) -> Layer {
        let config = &self.grounder.config().graph;
        let previous = self.top();
        let actions = self.grounder.applicable_actions_plus(&previous.level());
        let mut layer = Layer::new(
            previous.literals.iter().map(|n| n.literal.clone()),
            actions,
            config.skip_negative_literals,
        );
        mutex::mark(&mut layer, Some(previous), config.competing_needs);
        layer
    }

    /// True when `next` brings no new literal and no new action compared to the top layer.
    fn levels_off_with(&self, next: &Layer) -> bool {
        let top = self.top();
        next.noop_count() == top.noop_count() && next.action_count() == top.action_count()
    }

    pub fn grounder(&self) -> &'a Grounder<'a> {
        self.grounder
    }

    pub fn init(&self) -> &State {
        &self.init
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The last layer that still brought something new, once a later one has been seen to add nothing.
    pub fn leveled_at(&self) -> Option<usize> {
        self.leveled_at
    }
}
