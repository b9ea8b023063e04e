use std::fmt;

use super::literal::Literal;
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub name: String,
    pub kind: Option<String>,
}

impl Parameter {
    pub fn new(name: &str) -> Parameter {
        Parameter { name: name.to_owned(), kind: None }
    }

    pub fn typed(name: &str, kind: &str) -> Parameter {
        Parameter { name: name.to_owned(), kind: Some(kind.to_owned()) }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} - {}", self.name, kind),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An action as declared by the domain. Never mutated once built; grounding
/// derives new [`GroundAction`]s from it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSchema {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub precondition: Vec<Literal>,
    pub effect: Vec<Literal>,
}

impl ActionSchema {
    pub fn new(name: &str, parameters: Vec<Parameter>, precondition: Vec<Literal>, effect: Vec<Literal>) -> ActionSchema {
        ActionSchema { name: name.to_owned(), parameters, precondition, effect }
    }
}

impl fmt::Display for ActionSchema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parameters = self.parameters.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ");
        let precondition = self.precondition.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(" ");
        let effect = self.effect.iter().map(|l| l.to_string()).collect::<Vec<_>>().join(" ");
        write!(f, "(:action {} :parameters ({}) :precondition (and {}) :effect (and {}))",
            self.name, parameters, precondition, effect)
    }
}

/// Ordered parameter name to object mapping. Always covers every parameter of the schema it was built for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bindings(Vec<(String, String)>);

impl Bindings {
    pub fn new(action: &str, parameters: &[Parameter], values: &[String]) -> Result<Bindings, Error> {
        if parameters.len() != values.len() {
            return Err(Error::BindingArity {
                action: action.to_owned(),
                expected: parameters.len(),
                given: values.len(),
            });
        }
        Ok(Bindings(parameters.iter().map(|p| p.name.clone()).zip(values.iter().cloned()).collect()))
    }

    pub fn get(&self, parameter: &str) -> Option<&str> {
        self.0.iter().find(|(name, _)| name == parameter).map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A schema with every parameter bound to an object, or a synthetic no-op
/// carrying one literal across a planning graph layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroundAction {
    pub name: String,
    pub bindings: Bindings,
    pub precondition: Vec<Literal>,
    pub effect: Vec<Literal>,
    noop: bool,
}

pub const NOOP: &str = "noop";

impl GroundAction {
    pub fn new(name: &str, bindings: Bindings, precondition: Vec<Literal>, effect: Vec<Literal>) -> GroundAction {
        GroundAction { name: name.to_owned(), bindings, precondition, effect, noop: false }
    }

    /// Persists `literal` unchanged: its only precondition and only effect are the literal itself.
    pub fn noop(literal: Literal) -> GroundAction {
        GroundAction {
            name: NOOP.to_owned(),
            bindings: Bindings::default(),
            precondition: vec![literal.clone()],
            effect: vec![literal],
            noop: true,
        }
    }

    #[inline]
    pub fn is_noop(&self) -> bool {
        self.noop
    }

    /// The literal a no-op persists.
    pub fn persisted(&self) -> Option<&Literal> {
        if self.noop {
            self.effect.first()
        } else {
            None
        }
    }

    /// Identity used to drop duplicate groundings: action name and bound values.
    pub fn key(&self) -> (String, Vec<String>) {
        match self.persisted() {
            Some(literal) => (NOOP.to_owned(), vec![literal.to_string()]),
            None => (self.name.clone(), self.bindings.values().map(str::to_owned).collect()),
        }
    }
}

impl fmt::Display for GroundAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(literal) = self.persisted() {
            return write!(f, "{} {}", NOOP, literal);
        }
        write!(f, "{}", self.name)?;
        for value in self.bindings.values() {
            write!(f, " {}", value)?;
        }
        Ok(())
    }
}
