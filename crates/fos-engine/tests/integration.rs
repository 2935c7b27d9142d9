//! Integration tests - windows, popups and the shared clock
//!
//! Tests the complete workflow: HTML → Document → Window → timers

use fos_engine::dom::LiveNodeList;
use fos_engine::js::{CallbackError, EngineVariant};
use fos_engine::{Config, Engine, EngineError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// FULL PIPELINE TESTS
// ============================================================================

#[test]
fn test_html_to_window_child_nodes() -> anyhow::Result<()> {
    init_tracing();
    let mut engine = Engine::default();
    let id = engine.open_window(
        "<html> \n <body> \n <script>var x = 1;</script>\n</body></html>",
        "http://localhost/",
    )?;
    let window = engine.window(id).ok_or(EngineError::UnknownWindow(id))?;
    let doc = window.document();
    let store = doc.store();

    let root = doc.document_element().ok_or_else(|| anyhow::anyhow!("no root"))?;
    let nodes = window.child_nodes(root);
    assert_eq!(nodes.length(store), 2);
    let head = nodes.item(store, 0).ok_or_else(|| anyhow::anyhow!("no head"))?;
    let body = nodes.item(store, 1).ok_or_else(|| anyhow::anyhow!("no body"))?;
    assert_eq!(store.node_name(head).as_deref(), Some("HEAD"));
    assert_eq!(store.node_name(body).as_deref(), Some("BODY"));
    assert_eq!(store.previous_sibling(head), None);
    assert_eq!(store.next_sibling(body), None);
    Ok(())
}

#[test]
fn test_engine_clock_drives_dom_mutation() -> anyhow::Result<()> {
    let mut engine = Engine::new(Config::default().with_min_timer_delay(0));
    let id = engine.open_window("<ul id='list'></ul>", "http://localhost/")?;

    let window = engine.window_mut(id).ok_or(EngineError::UnknownWindow(id))?;
    let list = window.get_element_by_id("list").ok_or_else(|| anyhow::anyhow!("list"))?;
    let live = LiveNodeList::children(list);
    window.set_interval(
        move |w| {
            let item = w.create_element("li");
            w.append_child(list, item)?;
            let count = LiveNodeList::children(list).length(w.document().store());
            if count == 4 {
                let id = w.current_timer().ok_or_else(|| CallbackError::thrown("no timer"))?;
                w.clear_interval(id);
            }
            Ok(())
        },
        25,
    );

    let report = engine.advance_by(50);
    assert_eq!(report.fired, 2);
    let window = engine.window(id).ok_or(EngineError::UnknownWindow(id))?;
    assert_eq!(live.length(window.document().store()), 2);

    let report = engine.run_until_idle();
    assert!(report.idle);
    let window = engine.window(id).ok_or(EngineError::UnknownWindow(id))?;
    assert_eq!(live.length(window.document().store()), 4);
    assert_eq!(window.now(), 100);
    Ok(())
}

// ============================================================================
// POPUPS
// ============================================================================

#[test]
fn test_popup_has_independent_document_and_timers() -> anyhow::Result<()> {
    let mut engine = Engine::default();
    let main = engine.open_window("<p id='x'>main</p>", "https://example.com/a/")?;
    let popup = engine.open_popup(main, "<p id='x'>popup</p>", "popup.html")?;

    for id in [main, popup] {
        let window = engine.window_mut(id).ok_or(EngineError::UnknownWindow(id))?;
        window.set_interval(
            |w| {
                w.console_mut().log("t");
                Ok(())
            },
            10,
        );
    }

    engine.advance_by(30);
    assert_eq!(engine.window(main).map(|w| w.console().output()).as_deref(), Some("ttt"));
    assert_eq!(engine.window(popup).map(|w| w.console().output()).as_deref(), Some("ttt"));

    // Popup DOM changes stay in the popup
    let window = engine.window_mut(popup).ok_or(EngineError::UnknownWindow(popup))?;
    let p = window.get_element_by_id("x").ok_or_else(|| anyhow::anyhow!("x"))?;
    let body = window.document().body().ok_or_else(|| anyhow::anyhow!("body"))?;
    window.remove_child(body, p)?;
    assert_eq!(engine.query_selector_all(popup, "#x")?.length(), 0);
    assert_eq!(engine.query_selector_all(main, "#x")?.length(), 1);

    // Closing the popup cancels its timers; the opener keeps running
    engine.close(popup)?;
    assert!(engine.window(popup).is_none());
    let report = engine.advance_by(20);
    assert_eq!(report.fired, 2);
    assert_eq!(engine.window(main).map(|w| w.console().output()).as_deref(), Some("ttttt"));
    assert_eq!(engine.window_ids(), &[main]);
    Ok(())
}

#[test]
fn test_popup_outlives_closed_opener() -> anyhow::Result<()> {
    let mut engine = Engine::default();
    let main = engine.open_window("", "https://example.com/")?;
    let popup = engine.open_popup(main, "", "/child")?;

    engine.close(main)?;
    assert_eq!(engine.opener_of(popup), Some(main));
    assert!(engine.window(main).is_none());
    assert!(matches!(
        engine.open_popup(main, "", "x"),
        Err(EngineError::UnknownWindow(_))
    ));
    Ok(())
}

#[test]
fn test_popups_blocked_by_config() -> anyhow::Result<()> {
    let mut engine = Engine::new(Config::default().with_popups(false));
    let main = engine.open_blank()?;
    let err = engine.open_popup(main, "", "about:blank").unwrap_err();
    assert!(matches!(err, EngineError::PopupBlocked { .. }));
    assert_eq!(engine.window_count(), 1);
    Ok(())
}

#[test]
fn test_stale_window_id_after_reuse() -> anyhow::Result<()> {
    let mut engine = Engine::default();
    let first = engine.open_blank()?;
    engine.close(first)?;
    let second = engine.open_blank()?;

    assert_ne!(first, second);
    assert!(engine.window(first).is_none());
    assert!(engine.window(second).is_some());
    assert!(matches!(engine.close(first), Err(EngineError::UnknownWindow(_))));
    Ok(())
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_variant_reaches_windows() -> anyhow::Result<()> {
    let mut engine = Engine::new(Config::default().with_variant(EngineVariant::InternetExplorer));
    let id = engine.open_blank()?;
    let window = engine.window_mut(id).ok_or(EngineError::UnknownWindow(id))?;

    assert_eq!(window.type_of("applicationCache"), "object");
    assert_eq!(window.type_of("FontFace"), "undefined");

    window.set_timeout(
        |w| {
            w.console_mut().log("late");
            Ok(())
        },
        0,
    );
    engine.advance_by(9);
    assert_eq!(engine.window(id).map(|w| w.console().output()).as_deref(), Some(""));
    engine.advance_by(1);
    assert_eq!(engine.window(id).map(|w| w.console().output()).as_deref(), Some("late"));
    Ok(())
}

#[test]
fn test_pass_cap_bounds_runaway_interval() -> anyhow::Result<()> {
    let mut engine = Engine::new(Config::default().with_max_passes(8));
    let id = engine.open_blank()?;
    let window = engine.window_mut(id).ok_or(EngineError::UnknownWindow(id))?;
    window.set_interval(|_| Ok(()), 0);

    let report = engine.run_until_idle();
    assert_eq!(report.passes, 8);
    assert!(!report.idle);
    Ok(())
}
