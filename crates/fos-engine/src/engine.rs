//! Engine - Main entry point
//!
//! Owns every open window. Windows share nothing but the read-only host
//! object registry; a popup only remembers its opener's [`WindowId`].

use std::fmt;
use std::sync::Arc;

use fos_dom::{DomError, StaticNodeList};
use fos_html::HtmlParser;
use fos_js::{HostObjectRegistry, RunReport, Window, WindowSettings};
use url::Url;

use crate::Config;
use crate::arena::{GenArena, GenIndex};

/// Handle to an open window; stale once the window is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(GenIndex);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}v{}", self.0.index, self.0.generation)
    }
}

struct WindowSlot {
    window: Window,
    opener: Option<WindowId>,
}

/// The fOS browser engine
pub struct Engine {
    config: Config,
    registry: Arc<HostObjectRegistry>,
    parser: HtmlParser,
    windows: GenArena<WindowSlot>,
    /// Open windows in creation order
    order: Vec<WindowId>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("windows", &self.order)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create a new engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(HostObjectRegistry::standard()))
    }

    /// Create an engine whose windows use a custom host object table
    pub fn with_registry(config: Config, registry: Arc<HostObjectRegistry>) -> Self {
        tracing::info!(
            variant = %config.variant,
            "fOS Engine {} initialized",
            crate::VERSION
        );
        Self {
            config,
            registry,
            parser: HtmlParser::new(),
            windows: GenArena::new(),
            order: Vec::new(),
        }
    }

    /// Get engine configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse `html` into a new top-level window at `url`
    pub fn open_window(&mut self, html: &str, url: &str) -> EngineResult<WindowId> {
        let location = Url::parse(url)?;
        self.open_at(html, location, None)
    }

    /// Empty window at the configured initial URL
    pub fn open_blank(&mut self) -> EngineResult<WindowId> {
        let location = Url::parse(&self.config.initial_url)?;
        self.open_at("", location, None)
    }

    /// `window.open` from `opener`; `relative_url` resolves against the
    /// opener's location
    pub fn open_popup(
        &mut self,
        opener: WindowId,
        html: &str,
        relative_url: &str,
    ) -> EngineResult<WindowId> {
        if !self.config.allow_popups {
            tracing::warn!(%opener, url = relative_url, "popup blocked");
            return Err(EngineError::PopupBlocked { opener });
        }
        let base = self
            .window(opener)
            .ok_or(EngineError::UnknownWindow(opener))?
            .location();
        let location = base.join(relative_url)?;
        self.open_at(html, location, Some(opener))
    }

    fn open_at(
        &mut self,
        html: &str,
        location: Url,
        opener: Option<WindowId>,
    ) -> EngineResult<WindowId> {
        let document = self.parser.parse_with_url(html, location.as_str())?;
        let settings = WindowSettings::default()
            .with_name(format!("window-{}", self.order.len()))
            .with_variant(self.config.variant)
            .with_timer_policy(self.config.timer_policy())
            .with_registry(Arc::clone(&self.registry));
        let window = Window::new(document, location, settings);

        let id = WindowId(self.windows.insert(WindowSlot { window, opener }));
        self.order.push(id);
        tracing::debug!(%id, opener = ?opener, "window opened");
        Ok(id)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.get(id.0).map(|slot| &slot.window)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.get_mut(id.0).map(|slot| &mut slot.window)
    }

    /// Opener link of a popup; the opener itself may since have closed
    pub fn opener_of(&self, id: WindowId) -> Option<WindowId> {
        self.windows.get(id.0).and_then(|slot| slot.opener)
    }

    /// Open windows in creation order
    pub fn window_ids(&self) -> &[WindowId] {
        &self.order
    }

    pub fn window_count(&self) -> usize {
        self.order.len()
    }

    /// Close a window: its timers are cancelled before its document goes
    pub fn close(&mut self, id: WindowId) -> EngineResult<()> {
        let mut slot = self
            .windows
            .remove(id.0)
            .ok_or(EngineError::UnknownWindow(id))?;
        self.order.retain(|&w| w != id);
        slot.window.close();
        tracing::debug!(%id, "window removed");
        Ok(())
    }

    /// `querySelectorAll` on a window's document
    pub fn query_selector_all(&self, id: WindowId, selector: &str) -> EngineResult<StaticNodeList> {
        let window = self.window(id).ok_or(EngineError::UnknownWindow(id))?;
        Ok(window.query_selector_all(selector)?)
    }

    /// Advance every window's clock by `ms`, in creation order
    pub fn advance_by(&mut self, ms: u64) -> RunReport {
        let max_passes = self.config.max_passes_per_advance;
        self.drive(|window| window.advance_by_with_limit(ms, max_passes))
    }

    /// Drain every window until idle or out of passes
    pub fn run_until_idle(&mut self) -> RunReport {
        let max_passes = self.config.max_passes_per_advance;
        self.drive(|window| window.run_until_idle_with_limit(max_passes))
    }

    fn drive(&mut self, mut step: impl FnMut(&mut Window) -> RunReport) -> RunReport {
        let mut total = RunReport {
            idle: true,
            ..RunReport::default()
        };
        for &id in &self.order {
            let Some(slot) = self.windows.get_mut(id.0) else {
                continue;
            };
            let report = step(&mut slot.window);
            total.passes += report.passes;
            total.fired += report.fired;
            total.failed += report.failed;
            total.idle &= report.idle;
        }
        total
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),

    #[error("popup blocked (opener {opener})")]
    PopupBlocked { opener: WindowId },

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("parse error: {0}")]
    Parse(#[from] fos_html::ParseError),

    #[error(transparent)]
    Dom(#[from] DomError),
}

pub type EngineResult<T> = Result<T, EngineError>;
