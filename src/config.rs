//! Configuration for bookmark editing sessions.

/// How fresh bookmark ids are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdStrategy {
    /// Random v4 UUIDs (default)
    #[default]
    Uuid,
    /// Monotonic counter: `bm-1`, `bm-2`, ...
    Sequential,
}

/// Bookmark session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Id generation strategy for new nodes.
    pub id_strategy: IdStrategy,

    /// Maximum number of history snapshots kept (0 = unlimited).
    ///
    /// When the limit is hit the oldest snapshot is evicted.
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            history_limit: 0,
        }
    }

    /// Set the id generation strategy.
    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Cap the undo history.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
        assert_eq!(config.history_limit, 0);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .with_id_strategy(IdStrategy::Sequential)
            .with_history_limit(50);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.history_limit, 50);
    }
}
