use std::collections::BTreeMap;
use std::fmt;

use enumset::{EnumSet, EnumSetType};

use super::action::ActionSchema;

#[derive(EnumSetType, Debug)]
pub enum Requirement {
    Strips,
    Typing,
    NegativePreconditions,
    Equality,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Requirement::Strips => write!(f, ":strips"),
            Requirement::Typing => write!(f, ":typing"),
            Requirement::NegativePreconditions => write!(f, ":negative-preconditions"),
            Requirement::Equality => write!(f, ":equality"),
        }
    }
}

/// Objects available for grounding, grouped by declared type. Objects without a
/// declared type are kept apart so typed domains can reject them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Values {
    typed: BTreeMap<String, Vec<String>>,
    untyped: Vec<String>,
}

impl Values {
    pub fn new() -> Values {
        Values::default()
    }

    pub fn insert(&mut self, kind: Option<&str>, object: &str) {
        let bucket = match kind {
            Some(kind) => self.typed.entry(kind.to_owned()).or_default(),
            None => &mut self.untyped,
        };
        if !bucket.iter().any(|o| o == object) {
            bucket.push(object.to_owned());
        }
    }

    pub fn with(mut self, kind: Option<&str>, objects: &[&str]) -> Values {
        for object in objects {
            self.insert(kind, object);
        }
        self
    }

    pub fn of_type(&self, kind: &str) -> Option<&[String]> {
        self.typed.get(kind).map(|v| v.as_slice())
    }

    pub fn untyped(&self) -> &[String] {
        &self.untyped
    }

    /// Every object once, typed buckets first (by type name), then untyped ones.
    pub fn all(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for object in self.typed.values().flatten().chain(self.untyped.iter()) {
            if !result.contains(object) {
                result.push(object.clone());
            }
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.typed.values().all(|v| v.is_empty()) && self.untyped.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct Domain {
    pub name: String,
    pub requirements: EnumSet<Requirement>,
    pub actions: Vec<ActionSchema>,
    pub values: Values,
}

impl Domain {
    pub fn new(name: &str, requirements: EnumSet<Requirement>, actions: Vec<ActionSchema>) -> Domain {
        Domain { name: name.to_owned(), requirements, actions, values: Values::new() }
    }

    /// Installs the objects of a problem. Done once, before grounding.
    pub fn with_values(mut self, values: Values) -> Domain {
        self.values = values;
        self
    }

    pub fn requires_typing(&self) -> bool {
        self.requirements.contains(Requirement::Typing)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let requirements = self.requirements.iter().map(|r| r.to_string()).collect::<Vec<_>>().join(" ");
        writeln!(f, "(define (domain {})", self.name)?;
        writeln!(f, " (:requirements {})", requirements)?;
        for action in &self.actions {
            writeln!(f, " {}", action)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use enumset::enum_set;

    use super::{Domain, Requirement, Values};

    #[test]
    fn test_values() {
        let values = Values::new()
            .with(Some("block"), &["b", "a", "b"])
            .with(Some("surface"), &["table"])
            .with(None, &["a", "x"]);
        assert_eq!(values.of_type("block"), Some(&["b".to_owned(), "a".to_owned()][..]));
        assert_eq!(values.of_type("hand"), None);
        assert_eq!(values.untyped(), &["a".to_owned(), "x".to_owned()][..]);
        assert_eq!(values.all(), vec!["b", "a", "table", "x"]);
        assert!(!values.is_empty());
        assert!(Values::new().is_empty());
    }

    #[test]
    fn test_requirements() {
        let typed = Domain::new("blocks", enum_set!(Requirement::Strips | Requirement::Typing), vec![]);
        assert!(typed.requires_typing());
        let untyped = Domain::new("blocks", enum_set!(Requirement::Strips), vec![]);
        assert!(!untyped.requires_typing());
        assert_eq!(untyped.to_string(), "(define (domain blocks)\n (:requirements :strips)\n)");
    }
}
