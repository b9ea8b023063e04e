//! Planner configuration.
//!
//! Every search and graph entry point reads its options from one
//! [`PlannerConfig`] value, which can be built in code or loaded from TOML:
//!
//! ```
//! use strips_planner::config::{PlannerConfig, Strategy};
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     fast = false
//!     max_solutions = 3
//!     strategy = "breadth_first"
//!
//!     [graph]
//!     min_layers = 2
//!     skip_negative_literals = true
//! "#).unwrap();
//!
//! assert_eq!(config.strategy, Strategy::BreadthFirst);
//! assert_eq!(config.graph.min_layers, 2);
//! assert_eq!(config.graph.max_layers, None);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// State-space search strategy. A* additionally needs a heuristic function at call time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    DepthFirst,
    BreadthFirst,
    AStar,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::DepthFirst => write!(f, "depth-first-search"),
            Strategy::BreadthFirst => write!(f, "breadth-first-search"),
            Strategy::AStar => write!(f, "A*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct GraphConfig {
    /// Layers to build even after the graph has levelled off.
    pub min_layers: usize,
    /// Hard cap on layers. `None` builds until the graph levels off.
    pub max_layers: Option<usize>,
    /// Drop negative effect literals when forming the next literal level.
    pub skip_negative_literals: bool,
    /// Also mark actions whose preconditions are mutex one level down.
    pub competing_needs: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig { min_layers: 1, max_layers: None, skip_negative_literals: false, competing_needs: false }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Ground parameters with permutations without repetition instead of the full product.
    /// Faster, but misses plans that bind one object to two parameters.
    pub fast: bool,
    /// Emit progress lines through the diagnostics sink.
    pub verbose: bool,
    /// Solutions returned by depth-first and breadth-first search.
    pub max_solutions: usize,
    pub strategy: Strategy,
    pub graph: GraphConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            fast: true,
            verbose: false,
            max_solutions: 1,
            strategy: Strategy::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl PlannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_solutions == 0 {
            return Err(ConfigError::Invalid("max_solutions must be at least 1".to_owned()));
        }
        if let Some(max) = self.graph.max_layers {
            if max < self.graph.min_layers {
                return Err(ConfigError::Invalid(format!(
                    "graph.max_layers ({}) is below graph.min_layers ({})",
                    max, self.graph.min_layers
                )));
            }
        }
        Ok(())
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_max_solutions(mut self, max_solutions: usize) -> Self {
        self.max_solutions = max_solutions;
        self
    }

    pub fn with_fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_layers(mut self, min_layers: usize, max_layers: Option<usize>) -> Self {
        self.graph.min_layers = min_layers;
        self.graph.max_layers = max_layers;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{ConfigError, PlannerConfig, Strategy};

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::from_toml_str("").unwrap();
        assert_eq!(config, PlannerConfig::default());
        assert!(config.fast);
        assert!(!config.verbose);
        assert_eq!(config.max_solutions, 1);
        assert_eq!(config.strategy, Strategy::DepthFirst);
        assert_eq!(config.graph.min_layers, 1);
        assert!(!config.graph.competing_needs);
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(PlannerConfig::from_toml_str("max_solutions = 0"), Err(ConfigError::Invalid(_))));
        assert!(matches!(
            PlannerConfig::from_toml_str("[graph]\nmin_layers = 4\nmax_layers = 2"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(PlannerConfig::from_toml_str("strategy = \"sideways\""), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_load_file() {
        use tempfile::Builder;
        let mut file = Builder::new().suffix(".toml").tempfile().expect("Unable to create temporary file");
        writeln!(file.as_file_mut(), "verbose = true\nstrategy = \"a_star\"\n[graph]\nmax_layers = 6")
            .expect("Unable to write to tempfile");
        let config = PlannerConfig::load(file.path()).unwrap();
        assert!(config.verbose);
        assert_eq!(config.strategy, Strategy::AStar);
        assert_eq!(config.graph.max_layers, Some(6));
        assert!(matches!(PlannerConfig::load("/nonexistent/planner.toml"), Err(ConfigError::Io(_))));
    }
}
