//! fOS Engine
//!
//! Headless browser core: windows with their documents and deterministic
//! timers, opened from HTML and driven by a virtual clock.
//!
//! # Example
//! ```rust
//! use fos_engine::{Config, Engine};
//!
//! let mut engine = Engine::new(Config::default());
//! let id = engine.open_window("<p id='p'>hi</p>", "https://example.com/").unwrap();
//! let window = engine.window_mut(id).unwrap();
//! window.set_timeout(|w| {
//!     w.console_mut().log("fired");
//!     Ok(())
//! }, 10);
//! engine.advance_by(10);
//! assert_eq!(engine.window(id).unwrap().console().output(), "fired");
//! ```

mod config;
mod engine;
pub mod arena;

pub use arena::{GenArena, GenIndex};
pub use config::Config;
pub use engine::{Engine, EngineError, EngineResult, WindowId};

// Re-export sub-crates for advanced usage
pub use fos_dom as dom;
pub use fos_html as html;
pub use fos_js as js;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
