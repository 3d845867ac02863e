//! Scheduler configuration.

use std::time::Duration;

/// Default minimum time left in a slice before the work loop yields.
pub const DEFAULT_YIELD_THRESHOLD: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// PropertyPolicy
// ---------------------------------------------------------------------------

/// How property names are checked before they reach the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyPolicy {
    /// Every name is forwarded verbatim; the host decides what it understands.
    #[default]
    Passthrough,
    /// Names must be identifier-like: non-empty, ASCII alphanumerics plus
    /// `_`, `-` and `:`, not starting with a digit.
    Strict,
}

impl PropertyPolicy {
    /// Whether `name` is acceptable under this policy.
    pub fn accepts(self, name: &str) -> bool {
        match self {
            Self::Passthrough => true,
            Self::Strict => {
                let mut chars = name.chars();
                match chars.next() {
                    Some(first) if !first.is_ascii_digit() && is_name_char(first) => {
                        chars.all(is_name_char)
                    }
                    _ => false,
                }
            }
        }
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':')
}

// ---------------------------------------------------------------------------
// SchedulerConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Yield once the deadline reports less than this much time remaining.
    pub yield_threshold: Duration,
    /// Hard cap on units of work per slice, independent of the deadline.
    pub max_units_per_tick: Option<usize>,
    /// Property-name checking applied during materialization.
    pub property_policy: PropertyPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            yield_threshold: DEFAULT_YIELD_THRESHOLD,
            max_units_per_tick: None,
            property_policy: PropertyPolicy::Passthrough,
        }
    }
}

impl SchedulerConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the yield threshold (builder).
    pub fn with_yield_threshold(mut self, threshold: Duration) -> Self {
        self.yield_threshold = threshold;
        self
    }

    /// Cap the number of units performed per slice (builder). Zero is treated as one.
    pub fn with_max_units_per_tick(mut self, max: usize) -> Self {
        self.max_units_per_tick = Some(max.max(1));
        self
    }

    /// Set the property policy (builder).
    pub fn with_property_policy(mut self, policy: PropertyPolicy) -> Self {
        self.property_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = SchedulerConfig::new();
        assert_eq!(config.yield_threshold, Duration::from_millis(1));
        assert!(config.max_units_per_tick.is_none());
        assert_eq!(config.property_policy, PropertyPolicy::Passthrough);
    }

    #[test]
    fn config_builder() {
        let config = SchedulerConfig::new()
            .with_yield_threshold(Duration::from_micros(250))
            .with_max_units_per_tick(8)
            .with_property_policy(PropertyPolicy::Strict);
        assert_eq!(config.yield_threshold, Duration::from_micros(250));
        assert_eq!(config.max_units_per_tick, Some(8));
        assert_eq!(config.property_policy, PropertyPolicy::Strict);
    }

    #[test]
    fn zero_unit_cap_clamps_to_one() {
        let config = SchedulerConfig::new().with_max_units_per_tick(0);
        assert_eq!(config.max_units_per_tick, Some(1));
    }

    #[test]
    fn passthrough_accepts_anything() {
        assert!(PropertyPolicy::Passthrough.accepts(""));
        assert!(PropertyPolicy::Passthrough.accepts("has space"));
    }

    #[test]
    fn strict_accepts_identifier_like_names() {
        let strict = PropertyPolicy::Strict;
        assert!(strict.accepts("id"));
        assert!(strict.accepts("className"));
        assert!(strict.accepts("data-role"));
        assert!(strict.accepts("xlink:href"));
        assert!(strict.accepts("_private"));
    }

    #[test]
    fn strict_rejects_malformed_names() {
        let strict = PropertyPolicy::Strict;
        assert!(!strict.accepts(""));
        assert!(!strict.accepts("1st"));
        assert!(!strict.accepts("has space"));
        assert!(!strict.accepts("on<click>"));
    }
}
