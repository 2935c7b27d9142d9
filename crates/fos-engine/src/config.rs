//! Engine Configuration

use fos_js::{EngineVariant, TimerPolicy, DEFAULT_MAX_PASSES};

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Browser profile every window emulates
    pub variant: EngineVariant,

    /// Overrides the variant's minimum timer delay
    pub min_timer_delay_ms: Option<u64>,

    /// Allow `window.open` popups
    pub allow_popups: bool,

    /// Drain passes a single advance may run per window
    pub max_passes_per_advance: usize,

    /// Location of windows opened without one
    pub initial_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: EngineVariant::default(),
            min_timer_delay_ms: None,
            allow_popups: true,
            max_passes_per_advance: DEFAULT_MAX_PASSES,
            initial_url: "about:blank".to_string(),
        }
    }
}

impl Config {
    pub fn with_variant(mut self, variant: EngineVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_min_timer_delay(mut self, ms: u64) -> Self {
        self.min_timer_delay_ms = Some(ms);
        self
    }

    pub fn with_popups(mut self, allow: bool) -> Self {
        self.allow_popups = allow;
        self
    }

    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes_per_advance = passes;
        self
    }

    pub fn with_initial_url(mut self, url: impl Into<String>) -> Self {
        self.initial_url = url.into();
        self
    }

    /// Timer policy windows are created with
    pub fn timer_policy(&self) -> TimerPolicy {
        self.min_timer_delay_ms
            .map_or_else(|| self.variant.timer_policy(), TimerPolicy::new)
    }
}
