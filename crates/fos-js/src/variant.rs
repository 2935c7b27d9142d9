//! Engine variants
//!
//! Which browser profile a window emulates. The variant selects host-object
//! availability and the timer clamping policy.

use std::fmt;
use std::str::FromStr;

/// Emulated browser family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineVariant {
    #[default]
    Chrome,
    Edge,
    Firefox,
    FirefoxEsr,
    InternetExplorer,
}

impl EngineVariant {
    pub const ALL: [EngineVariant; 5] = [
        EngineVariant::Chrome,
        EngineVariant::Edge,
        EngineVariant::Firefox,
        EngineVariant::FirefoxEsr,
        EngineVariant::InternetExplorer,
    ];

    /// Short identifier, also accepted by `FromStr`
    pub fn as_str(self) -> &'static str {
        match self {
            EngineVariant::Chrome => "chrome",
            EngineVariant::Edge => "edge",
            EngineVariant::Firefox => "ff",
            EngineVariant::FirefoxEsr => "ff-esr",
            EngineVariant::InternetExplorer => "ie",
        }
    }

    /// Default timer policy of this browser family
    pub fn timer_policy(self) -> TimerPolicy {
        match self {
            EngineVariant::Chrome | EngineVariant::Edge => TimerPolicy::new(1),
            EngineVariant::Firefox | EngineVariant::FirefoxEsr => TimerPolicy::new(4),
            EngineVariant::InternetExplorer => TimerPolicy::new(10),
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for EngineVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized variant name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engine variant: {0:?}")]
pub struct UnknownVariant(pub String);

impl FromStr for EngineVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineVariant::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Set of engine variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantSet(u8);

impl VariantSet {
    pub const NONE: VariantSet = VariantSet(0);
    pub const ALL: VariantSet = VariantSet(0b1_1111);

    pub fn only(variants: &[EngineVariant]) -> Self {
        VariantSet(variants.iter().fold(0, |acc, v| acc | v.bit()))
    }

    /// Every variant except the listed ones
    pub fn all_except(variants: &[EngineVariant]) -> Self {
        VariantSet(Self::ALL.0 & !Self::only(variants).0)
    }

    pub fn contains(self, variant: EngineVariant) -> bool {
        self.0 & variant.bit() != 0
    }
}

/// Timer clamping policy
///
/// Every timer delay is raised to at least `min_delay_ms`, so a zero-delay
/// interval yields to the event loop instead of spinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerPolicy {
    pub min_delay_ms: u64,
}

impl TimerPolicy {
    pub const fn new(min_delay_ms: u64) -> Self {
        Self { min_delay_ms }
    }

    /// Delay actually used for a requested delay
    pub fn effective_delay(&self, requested_ms: u64) -> u64 {
        requested_ms.max(self.min_delay_ms)
    }
}

impl Default for TimerPolicy {
    fn default() -> Self {
        EngineVariant::default().timer_policy()
    }
}
