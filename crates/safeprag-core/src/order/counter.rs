use serde::{Deserialize, Serialize};

/// Sequential service-order numbers, starting at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderCounter {
    last: u64,
}

impl OrderCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume after `last` numbers have been issued.
    pub fn starting_after(last: u64) -> Self {
        OrderCounter { last }
    }

    /// Issue the next number.
    pub fn next(&mut self) -> u64 {
        self.last = self.last.saturating_add(1);
        self.last
    }

    /// The last number issued, 0 when none was.
    pub fn current(&self) -> u64 {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_are_sequential() {
        let mut counter = OrderCounter::new();
        assert_eq!(counter.current(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_reset_and_resume() {
        let mut counter = OrderCounter::starting_after(41);
        assert_eq!(counter.next(), 42);
        counter.reset();
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_serializes_as_number() {
        let counter = OrderCounter::starting_after(7);
        assert_eq!(serde_json::to_string(&counter).unwrap(), "7");
        let back: OrderCounter = serde_json::from_str("7").unwrap();
        assert_eq!(back, counter);
    }
}
