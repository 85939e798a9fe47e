//! Token accounting across completion calls.

use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Running input/output token totals. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
}

impl TokenUsage {
    pub fn new(input: u64, output: u64) -> Self {
        Self { input, output }
    }

    pub fn total(&self) -> u64 {
        self.input + self.output
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.input += rhs.input;
        self.output += rhs.output;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates() {
        let mut usage = TokenUsage::default();
        usage += TokenUsage::new(120, 30);
        usage += TokenUsage::new(80, 10);
        assert_eq!(usage, TokenUsage::new(200, 40));
        assert_eq!(usage.total(), 240);
    }
}
