//! Mock backend configuration.

use std::time::Duration;

/// Artificial response latency per endpoint, so the editor can be exercised
/// against realistic loading states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Delay before `GET /automations` answers.
    pub automations_delay: Duration,
    /// Delay before `POST /validate` answers.
    pub validate_delay: Duration,
    /// Delay before `POST /simulate` answers.
    pub simulate_delay: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            automations_delay: Duration::from_millis(300),
            validate_delay: Duration::ZERO,
            simulate_delay: Duration::from_millis(600),
        }
    }
}

impl BackendConfig {
    /// No latency at all; what tests want.
    pub fn instant() -> Self {
        Self {
            automations_delay: Duration::ZERO,
            validate_delay: Duration::ZERO,
            simulate_delay: Duration::ZERO,
        }
    }
}
