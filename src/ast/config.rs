/// Tuning knobs for an [`Evaluator`](super::Evaluator).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Parsed expressions kept in the LRU cache. `0` disables caching.
    pub cache_capacity: usize,
    /// Longest accepted expression, in bytes.
    pub max_length: usize,
    /// Deepest accepted bracket or operator nesting.
    pub max_depth: usize,
}

impl EvaluatorConfig {
    pub const DEFAULT_CACHE_CAPACITY: usize = 100;
    pub const DEFAULT_MAX_LENGTH: usize = 1024;
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
            max_length: Self::DEFAULT_MAX_LENGTH,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }
}
