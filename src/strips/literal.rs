use std::fmt;

use super::action::Bindings;

/// Truth value a literal asserts. Parsers decide it up front, nothing downstream defaults it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn flipped(self) -> Polarity {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "and"),
            Polarity::Negative => write!(f, "not"),
        }
    }
}

/// A predicate applied to an ordered list of arguments. Arguments are variable
/// names inside action schemas and object names everywhere else.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    pub name: String,
    pub parameters: Vec<String>,
    pub polarity: Polarity,
}

impl Literal {
    pub fn new<S: AsRef<str>>(name: &str, parameters: &[S], polarity: Polarity) -> Literal {
        Literal {
            name: name.to_owned(),
            parameters: parameters.iter().map(|p| p.as_ref().to_owned()).collect(),
            polarity,
        }
    }

    pub fn positive<S: AsRef<str>>(name: &str, parameters: &[S]) -> Literal {
        Literal::new(name, parameters, Polarity::Positive)
    }

    pub fn negative<S: AsRef<str>>(name: &str, parameters: &[S]) -> Literal {
        Literal::new(name, parameters, Polarity::Negative)
    }

    #[inline]
    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.polarity == Polarity::Negative
    }

    /// Same predicate and arguments with the opposite polarity.
    pub fn negated(&self) -> Literal {
        Literal {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            polarity: self.polarity.flipped(),
        }
    }

    /// The positive form of this literal.
    pub fn atom(&self) -> Literal {
        Literal {
            name: self.name.clone(),
            parameters: self.parameters.clone(),
            polarity: Polarity::Positive,
        }
    }

    /// True when both literals name the same predicate over the same arguments, whatever their polarity.
    pub fn same_atom(&self, other: &Literal) -> bool {
        self.name == other.name && self.parameters == other.parameters
    }

    /// Replaces every argument bound in `bindings` by its value. Arguments without a
    /// binding are kept as they are and handed to `on_gap`.
    pub fn substitute<F: FnMut(&str)>(&self, bindings: &Bindings, mut on_gap: F) -> Literal {
        let parameters = self
            .parameters
            .iter()
            .map(|p| match bindings.get(p) {
                Some(value) => value.to_owned(),
                None => {
                    on_gap(p);
                    p.clone()
                }
            })
            .collect();
        Literal { name: self.name.clone(), parameters, polarity: self.polarity }
    }

    /// `(name p1 p2 ...)`, ignoring polarity.
    pub fn atom_string(&self) -> String {
        let mut s = String::with_capacity(self.name.len() + 2);
        s.push('(');
        s.push_str(&self.name);
        for p in &self.parameters {
            s.push(' ');
            s.push_str(p);
        }
        s.push(')');
        s
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.polarity {
            Polarity::Positive => write!(f, "{}", self.atom_string()),
            Polarity::Negative => write!(f, "(not {})", self.atom_string()),
        }
    }
}
