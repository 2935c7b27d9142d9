//! fOS JavaScript host
//!
//! Window globals for script stand-ins: a [`Window`] owning its document,
//! a deterministic timer scheduler driven by a virtual clock, the console,
//! and a per-variant table of host objects.
//!
//! Features:
//! - Timers (setTimeout, setInterval, clearTimeout, clearInterval)
//! - Console API (log, info, warn, error, debug)
//! - Host object detection (`typeof`, `Reflect.has`) per engine variant
//! - DOM access through the window's document

mod console;
mod host;
mod variant;
mod window;

pub mod event_loop;
pub mod timers;

pub use console::{Console, ConsoleLevel, ConsoleMessage};
pub use event_loop::{RunReport, SchedulerHost, DEFAULT_MAX_PASSES};
pub use host::{
    FeatureKind, FeatureResult, FeatureShape, HostFeatureDescriptor, HostObjectRegistry,
    RegistryBuilder,
};
pub use timers::{CallbackError, TaskScheduler, TimerCallback, TimerEntry, TimerId, TimerState};
pub use variant::{EngineVariant, TimerPolicy, UnknownVariant, VariantSet};
pub use window::{ScriptError, Window, WindowSettings};
