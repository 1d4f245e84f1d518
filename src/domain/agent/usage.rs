//! Token usage accounting across a turn.

use serde::{Deserialize, Serialize};

/// Token totals for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageCounter {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl UsageCounter {
    /// Creates a counter; `total_tokens` is always the sum of the other two.
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }
}

/// Accumulates usage over every engine round trip of a turn.
///
/// Rounds that report no usage add nothing. If no round reported usage the
/// snapshot is `None`: unknown, not zero.
#[derive(Debug, Clone, Default)]
pub struct UsageAccountant {
    input_tokens: u32,
    output_tokens: u32,
    reported: bool,
}

impl UsageAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the usage reported by one engine call.
    pub fn record(&mut self, input_tokens: u32, output_tokens: u32) {
        self.input_tokens = self.input_tokens.saturating_add(input_tokens);
        self.output_tokens = self.output_tokens.saturating_add(output_tokens);
        self.reported = true;
    }

    /// Returns true if at least one round reported usage.
    pub fn has_usage(&self) -> bool {
        self.reported
    }

    pub fn snapshot(&self) -> Option<UsageCounter> {
        self.reported
            .then(|| UsageCounter::new(self.input_tokens, self.output_tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn no_reports_means_unknown_usage() {
        let accountant = UsageAccountant::new();
        assert!(!accountant.has_usage());
        assert_eq!(accountant.snapshot(), None);
    }

    #[test]
    fn zero_usage_report_is_still_reported() {
        let mut accountant = UsageAccountant::new();
        accountant.record(0, 0);
        assert_eq!(accountant.snapshot(), Some(UsageCounter::new(0, 0)));
    }

    #[test]
    fn accumulates_across_rounds() {
        let mut accountant = UsageAccountant::new();
        accountant.record(120, 30);
        accountant.record(200, 45);

        let usage = accountant.snapshot().unwrap();
        assert_eq!(usage.input_tokens, 320);
        assert_eq!(usage.output_tokens, 75);
        assert_eq!(usage.total_tokens, 395);
    }

    proptest! {
        #[test]
        fn total_is_sum_of_parts(rounds in prop::collection::vec((0u32..100_000, 0u32..100_000), 1..20)) {
            let mut accountant = UsageAccountant::new();
            for (input, output) in &rounds {
                accountant.record(*input, *output);
            }
            let usage = accountant.snapshot().unwrap();
            prop_assert_eq!(usage.total_tokens, usage.input_tokens + usage.output_tokens);
        }
    }
}
