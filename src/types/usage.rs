//! Token usage accounting.

use serde::{Deserialize, Serialize};

/// Token usage for one generation call.
///
/// All counters are unsigned and default to zero when the backend does not
/// report them. `total_tokens` equals `input_tokens + output_tokens` unless
/// the backend reported an explicit total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of backend requests accounted for (1 per completed call).
    pub requests: u32,
    /// Tokens consumed by the prompt.
    pub input_tokens: u32,
    /// Tokens produced by the model.
    pub output_tokens: u32,
    /// Total tokens, computed when the backend omits it.
    pub total_tokens: u32,
    /// Prompt tokens served from the backend's cache.
    pub cached_input_tokens: u32,
    /// Output tokens spent on reasoning.
    pub reasoning_output_tokens: u32,
}

impl Usage {
    /// Build usage for one request, computing the total from the parts.
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            requests: 1,
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
            cached_input_tokens: 0,
            reasoning_output_tokens: 0,
        }
    }

    /// Override the computed total with a backend-reported one.
    pub fn with_total_tokens(mut self, total_tokens: u32) -> Self {
        self.total_tokens = total_tokens;
        self
    }

    /// Set the cached prompt token count.
    pub fn with_cached_input_tokens(mut self, cached_input_tokens: u32) -> Self {
        self.cached_input_tokens = cached_input_tokens;
        self
    }

    /// Set the reasoning output token count.
    pub fn with_reasoning_output_tokens(mut self, reasoning_output_tokens: u32) -> Self {
        self.reasoning_output_tokens = reasoning_output_tokens;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_computed_from_parts() {
        let usage = Usage::new(10, 5);
        assert_eq!(usage.requests, 1);
        assert_eq!(usage.total_tokens, 15);
        assert_eq!(usage.cached_input_tokens, 0);
        assert_eq!(usage.reasoning_output_tokens, 0);
    }

    #[test]
    fn explicit_total_wins() {
        let usage = Usage::new(10, 5).with_total_tokens(42);
        assert_eq!(usage.total_tokens, 42);
    }

    #[test]
    fn unreported_usage_defaults_to_zero() {
        let usage = Usage::default();
        assert_eq!(usage.input_tokens, 0);
        assert_eq!(usage.output_tokens, 0);
        assert_eq!(usage.total_tokens, 0);
    }
}
