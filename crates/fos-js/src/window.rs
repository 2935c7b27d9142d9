//! Window global
//!
//! A window owns its document, its timer scheduler and its console. Script
//! stand-ins are closures that receive `&mut Window` when their timer fires.

use std::fmt;
use std::sync::Arc;

use fos_dom::{
    Document, DomResult, LiveNodeList, NamedNodeMapView, NodeId, StaticNodeList,
};
use url::Url;

use crate::console::Console;
use crate::event_loop::{self, RunReport, SchedulerHost, DEFAULT_MAX_PASSES};
use crate::host::{FeatureResult, HostObjectRegistry};
use crate::timers::{CallbackError, TaskScheduler, TimerId};
use crate::variant::{EngineVariant, TimerPolicy};

/// A callback failure delivered to the window's error channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub timer: TimerId,
    /// Virtual time of the failing call
    pub at: u64,
    pub message: String,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer {} at {}ms: {}", self.timer, self.at, self.message)
    }
}

/// Window construction options
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub name: String,
    pub variant: EngineVariant,
    /// Overrides the variant's timer clamping
    pub timer_policy: Option<TimerPolicy>,
    pub registry: Arc<HostObjectRegistry>,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            variant: EngineVariant::default(),
            timer_policy: None,
            registry: Arc::new(HostObjectRegistry::standard()),
        }
    }
}

impl WindowSettings {
    pub fn with_variant(mut self, variant: EngineVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_timer_policy(mut self, policy: TimerPolicy) -> Self {
        self.timer_policy = Some(policy);
        self
    }

    pub fn with_registry(mut self, registry: Arc<HostObjectRegistry>) -> Self {
        self.registry = registry;
        self
    }
}

/// Browser window
pub struct Window {
    // Declared first so pending callbacks are released before the document
    scheduler: TaskScheduler<Window>,
    document: Document,
    name: String,
    location: Url,
    variant: EngineVariant,
    registry: Arc<HostObjectRegistry>,
    console: Console,
    errors: Vec<ScriptError>,
    closed: bool,
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("location", &self.location.as_str())
            .field("variant", &self.variant)
            .field("pending_timers", &self.scheduler.pending_count())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub fn new(document: Document, location: Url, settings: WindowSettings) -> Self {
        let policy = settings
            .timer_policy
            .unwrap_or_else(|| settings.variant.timer_policy());
        tracing::debug!(
            name = %settings.name,
            location = %location,
            variant = %settings.variant,
            min_delay_ms = policy.min_delay_ms,
            "window created"
        );
        Self {
            scheduler: TaskScheduler::new(policy),
            document,
            name: settings.name,
            location,
            variant: settings.variant,
            registry: settings.registry,
            console: Console::new(),
            errors: Vec::new(),
            closed: false,
        }
    }

    /// Window over the document's own URL
    pub fn from_document(
        document: Document,
        settings: WindowSettings,
    ) -> Result<Self, url::ParseError> {
        let location = Url::parse(document.url())?;
        Ok(Self::new(document, location, settings))
    }

    /// `about:blank` window with an empty html/head/body skeleton
    pub fn blank(settings: WindowSettings) -> Result<Self, url::ParseError> {
        Self::from_document(Document::default(), settings)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    pub fn registry(&self) -> &Arc<HostObjectRegistry> {
        &self.registry
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    // === DOM ===

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn child_nodes(&self, node: NodeId) -> LiveNodeList {
        self.document.child_nodes(node)
    }

    pub fn attributes(&self, element: NodeId) -> NamedNodeMapView {
        self.document.attributes(element)
    }

    pub fn query_selector_all(&self, selector: &str) -> DomResult<StaticNodeList> {
        self.document.query_selector_all(selector)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.get_element_by_id(id)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.document.create_element(tag)
    }

    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        self.document.create_text_node(text)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.document.append_child(parent, child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.document.remove_child(parent, child)
    }

    // === Console and errors ===

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    /// Callback failures reported so far
    pub fn errors(&self) -> &[ScriptError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<ScriptError> {
        std::mem::take(&mut self.errors)
    }

    // === Timers ===

    /// setTimeout
    pub fn set_timeout<F>(&mut self, callback: F, delay_ms: u64) -> TimerId
    where
        F: FnMut(&mut Window) -> Result<(), CallbackError> + 'static,
    {
        self.scheduler.schedule_timeout(Box::new(callback), delay_ms)
    }

    /// setInterval
    pub fn set_interval<F>(&mut self, callback: F, delay_ms: u64) -> TimerId
    where
        F: FnMut(&mut Window) -> Result<(), CallbackError> + 'static,
    {
        self.scheduler.schedule_interval(Box::new(callback), delay_ms)
    }

    /// clearTimeout; also clears intervals, as in browsers
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// clearInterval; also clears timeouts, as in browsers
    pub fn clear_interval(&mut self, id: TimerId) -> bool {
        self.scheduler.cancel(id)
    }

    /// Id of the timer whose callback is running
    pub fn current_timer(&self) -> Option<TimerId> {
        self.scheduler.current_timer()
    }

    pub fn scheduler(&self) -> &TaskScheduler<Window> {
        &self.scheduler
    }

    /// Virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn advance_by(&mut self, ms: u64) -> RunReport {
        self.advance_by_with_limit(ms, DEFAULT_MAX_PASSES)
    }

    pub fn advance_by_with_limit(&mut self, ms: u64, max_passes: usize) -> RunReport {
        event_loop::advance_by(self, ms, max_passes)
    }

    pub fn run_until_idle(&mut self) -> RunReport {
        self.run_until_idle_with_limit(DEFAULT_MAX_PASSES)
    }

    pub fn run_until_idle_with_limit(&mut self, max_passes: usize) -> RunReport {
        event_loop::run_until_idle(self, max_passes)
    }

    /// One drain pass at the current time
    pub fn run_due(&mut self) -> RunReport {
        event_loop::run_due(self)
    }

    // === Host objects ===

    pub fn resolve_host_feature(&self, name: &str) -> FeatureResult<'_> {
        self.registry.resolve(name, self.variant)
    }

    /// `typeof window[name]`
    pub fn type_of(&self, name: &str) -> &'static str {
        self.registry.type_of(name, self.variant)
    }

    /// `Reflect.has(window[name], member)`
    pub fn reflect_has(&self, name: &str, member: &str) -> bool {
        self.registry.has_member(name, member, self.variant)
    }

    /// `window[name][member]` for constant tables
    pub fn host_constant(&self, name: &str, member: &str) -> Option<f64> {
        self.registry.constant(name, member, self.variant)
    }

    // === Teardown ===

    /// Cancel every timer and stop accepting new ones
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.scheduler.close();
        self.closed = true;
        tracing::debug!(name = %self.name, location = %self.location, "window closed");
    }
}

impl SchedulerHost for Window {
    fn scheduler(&self) -> &TaskScheduler<Self> {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut TaskScheduler<Self> {
        &mut self.scheduler
    }

    fn report_callback_failure(&mut self, timer: TimerId, error: CallbackError) {
        let at = self.scheduler.now();
        tracing::warn!(%timer, at, %error, "timer callback failed");
        self.errors.push(ScriptError {
            timer,
            at,
            message: error.to_string(),
        });
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.close();
    }
}
