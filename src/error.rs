use thiserror::Error;

/// Problems found while grounding a domain or starting a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(":typing is specified, but no type found in action \"{action}\" for parameter \"{parameter}\"")]
    UntypedParameter { action: String, parameter: String },

    #[error("No values declared for type \"{kind}\" used by action \"{action}\"")]
    UnknownType { action: String, kind: String },

    #[error(":typing is specified in domain, but objects {0:?} do not declare a type")]
    UntypedObjects(Vec<String>),

    #[error("No parameter values found in domain values")]
    NoValues,

    #[error("Action \"{action}\" takes {expected} parameters, got {given} values")]
    BindingArity { action: String, expected: usize, given: usize },

    #[error("A* search was selected but no heuristic function was supplied")]
    MissingHeuristic,

    #[error("{0}")]
    InvalidConfig(String),
}
