//! MCTS configuration parameters.

use std::time::Duration;

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Maximum number of rollouts per search.
    pub num_rollouts: u32,

    /// Optional wall-clock bound, checked between rollouts.
    /// Whichever of the two budgets runs out first ends the search.
    pub time_budget: Option<Duration>,

    /// Exploration constant `c` in the UCB score.
    pub c_puct: f32,

    /// Concentration of the Dirichlet noise mixed into every expansion's priors.
    /// Non-positive disables noise.
    pub dirichlet_alpha: f32,

    /// Share of each prior taken from the noise. 0 disables noise.
    pub dirichlet_epsilon: f32,

    /// Weight `w` of the game heuristic in leaf values:
    /// `w * heuristic + (1 - w) * network_value`. 0 disables the heuristic.
    pub heuristic_weight: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_rollouts: 400,
            time_budget: None,
            c_puct: 4.0,
            dirichlet_alpha: 1.0,
            dirichlet_epsilon: 0.25,
            heuristic_weight: 0.0,
        }
    }
}

impl MctsConfig {
    /// Create config for self-play training (with exploration noise).
    pub fn for_training() -> Self {
        Self::default()
    }

    /// Create config for evaluation matches (no noise).
    pub fn for_evaluation() -> Self {
        Self {
            dirichlet_alpha: 0.0,
            dirichlet_epsilon: 0.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_rollouts: 50,
            ..Self::for_evaluation()
        }
    }

    /// Builder pattern: set number of rollouts.
    pub fn with_rollouts(mut self, n: u32) -> Self {
        self.num_rollouts = n;
        self
    }

    /// Builder pattern: bound each search by wall-clock time.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set Dirichlet noise parameters.
    pub fn with_noise(mut self, alpha: f32, epsilon: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_epsilon = epsilon;
        self
    }

    /// Builder pattern: set heuristic blend weight.
    pub fn with_heuristic_weight(mut self, weight: f32) -> Self {
        self.heuristic_weight = weight;
        self
    }

    pub fn noise_enabled(&self) -> bool {
        self.dirichlet_epsilon > 0.0 && self.dirichlet_alpha > 0.0
    }

    /// Check parameter ranges, describing the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_rollouts == 0 {
            return Err("num_rollouts must be at least 1".into());
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(format!("c_puct must be finite and >= 0, got {}", self.c_puct));
        }
        if !(0.0..=1.0).contains(&self.dirichlet_epsilon) {
            return Err(format!(
                "dirichlet_epsilon must be in [0, 1], got {}",
                self.dirichlet_epsilon
            ));
        }
        if !self.dirichlet_alpha.is_finite() {
            return Err(format!(
                "dirichlet_alpha must be finite, got {}",
                self.dirichlet_alpha
            ));
        }
        if !(0.0..=1.0).contains(&self.heuristic_weight) {
            return Err(format!(
                "heuristic_weight must be in [0, 1], got {}",
                self.heuristic_weight
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.num_rollouts, 400);
        assert!((config.c_puct - 4.0).abs() < 1e-6);
        assert!((config.dirichlet_alpha - 1.0).abs() < 1e-6);
        assert!((config.dirichlet_epsilon - 0.25).abs() < 1e-6);
        assert!(config.noise_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_rollouts(100)
            .with_time_budget(Duration::from_millis(50))
            .with_heuristic_weight(0.5);

        assert_eq!(config.num_rollouts, 100);
        assert_eq!(config.time_budget, Some(Duration::from_millis(50)));
        assert!((config.heuristic_weight - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_evaluation_config() {
        let config = MctsConfig::for_evaluation();
        assert!(!config.noise_enabled());
        assert_eq!(MctsConfig::for_testing().num_rollouts, 50);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        assert!(MctsConfig::default().with_rollouts(0).validate().is_err());
        assert!(MctsConfig::default().with_c_puct(f32::NAN).validate().is_err());
        assert!(MctsConfig::default().with_noise(1.0, 1.5).validate().is_err());
        assert!(MctsConfig::default()
            .with_heuristic_weight(-0.1)
            .validate()
            .is_err());
        // Zero alpha just disables noise
        assert!(MctsConfig::default().with_noise(0.0, 0.25).validate().is_ok());
    }
}
