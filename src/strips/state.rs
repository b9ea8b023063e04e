use std::collections::BTreeSet;
use std::fmt;

use super::literal::Literal;

/// A set of literals. Equality and hashing are structural and ignore the order
/// literals were added in, which is what search uses to detect repeated states.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct State {
    literals: BTreeSet<Literal>,
}

impl State {
    pub fn new() -> State {
        State { literals: BTreeSet::new() }
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn literals(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    #[inline]
    pub fn contains(&self, literal: &Literal) -> bool {
        self.literals.contains(literal)
    }

    /// True if the state holds the literal's predicate over the same arguments, with either polarity.
    pub fn holds_atom(&self, literal: &Literal) -> bool {
        self.literals.contains(literal) || self.literals.contains(&literal.negated())
    }

    /// Returns a copy of this state that also holds `literal`.
    pub fn with(&self, literal: Literal) -> State {
        let mut literals = self.literals.clone();
        literals.insert(literal);
        State { literals }
    }

    /// Returns a copy of this state without `literal`.
    pub fn without(&self, literal: &Literal) -> State {
        let mut literals = self.literals.clone();
        literals.remove(literal);
        State { literals }
    }

    /// The positive literals only.
    pub fn positives(&self) -> State {
        self.literals.iter().filter(|l| l.is_positive()).cloned().collect()
    }

    /// The positive literals that are not cancelled by a negative literal over the same atom.
    pub fn reconciled(&self) -> State {
        self.literals
            .iter()
            .filter(|l| l.is_positive() && !self.literals.contains(&l.negated()))
            .cloned()
            .collect()
    }

    /// Literals rendered as `(name p1 ...)`, sorted and joined by spaces.
    pub fn canonical(&self) -> String {
        let mut rendered: Vec<String> = self.literals.iter().map(|l| l.to_string()).collect();
        rendered.sort();
        rendered.join(" ")
    }
}

impl FromIterator<Literal> for State {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        State { literals: iter.into_iter().collect() }
    }
}

impl Extend<Literal> for State {
    fn extend<I: IntoIterator<Item = Literal>>(&mut self, iter: I) {
        self.literals.extend(iter)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
