use std::fmt;

use super::domain::Values;
use super::state::State;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub name: String,
    pub kind: Option<String>,
}

impl Object {
    pub fn new(name: &str) -> Object {
        Object { name: name.to_owned(), kind: None }
    }

    pub fn typed(name: &str, kind: &str) -> Object {
        Object { name: name.to_owned(), kind: Some(kind.to_owned()) }
    }
}

/// Objects plus the initial and goal states (states 0 and 1).
#[derive(Clone, Debug)]
pub struct Problem {
    pub name: String,
    pub objects: Vec<Object>,
    pub init: State,
    pub goal: State,
}

impl Problem {
    pub fn new(name: &str, objects: Vec<Object>, init: State, goal: State) -> Problem {
        Problem { name: name.to_owned(), objects, init, goal }
    }

    /// Grounding values for a domain: the declared objects by type, then every
    /// constant of the initial or goal state that was never declared, untyped.
    pub fn values(&self) -> Values {
        let mut values = Values::new();
        for object in &self.objects {
            values.insert(object.kind.as_deref(), &object.name);
        }
        for literal in self.init.literals().chain(self.goal.literals()) {
            for constant in &literal.parameters {
                if !self.objects.iter().any(|o| &o.name == constant) {
                    values.insert(None, constant);
                }
            }
        }
        values
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let objects = self.objects.iter().map(|o| match &o.kind {
            Some(kind) => format!("{} - {}", o.name, kind),
            None => o.name.clone(),
        }).collect::<Vec<_>>().join(" ");
        write!(f, "(define (problem {})\n (:objects {})\n (:init {})\n (:goal (and {}))\n)", self.name, objects, self.init, self.goal)
    }
}
