//! Stagger delays for sibling reveals

use std::time::Duration;

/// Configuration for a group of staggered siblings
///
/// Sibling `i` of a group starts `i * delay` after the group's first member.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaggerConfig {
    /// Delay between each sibling's start
    pub delay: Duration,
}

impl StaggerConfig {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// No stagger, every sibling starts together
    pub fn none() -> Self {
        Self::default()
    }

    /// Calculate delay for a specific sibling index
    pub fn delay_for_index(&self, index: usize) -> Duration {
        self.delay.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_stagger_delay_forward() {
        let config = StaggerConfig::from_millis(100);

        assert_eq!(config.delay_for_index(0), Duration::ZERO);
        assert_eq!(config.delay_for_index(1), ms(100));
        assert_eq!(config.delay_for_index(3), ms(300));
    }

    #[test]
    fn test_huge_index_saturates() {
        let config = StaggerConfig::from_millis(100);
        assert_eq!(config.delay_for_index(usize::MAX), Duration::from_millis(100) * u32::MAX);
    }

    #[test]
    fn test_no_stagger() {
        let config = StaggerConfig::none();
        assert_eq!(config.delay_for_index(7), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_forward_gap_is_exact(step_ms in 0u64..2_000, i in 0usize..64, j in 0usize..64) {
            let (i, j) = (i.min(j), i.max(j));
            let config = StaggerConfig::from_millis(step_ms);
            let a = config.delay_for_index(i);
            let b = config.delay_for_index(j);
            prop_assert!(a <= b);
            prop_assert_eq!(b - a, ms(step_ms) * (j - i) as u32);
        }
    }
}
