//! Example: Basic usage of fOS Engine

use fos_engine::{Config, Engine};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create engine
    let mut engine = Engine::new(Config::default());
    println!("fOS Engine v{} initialized", fos_engine::VERSION);

    let id = engine.open_window(
        "<html><body><ul id='list'></ul></body></html>",
        "https://example.com/",
    )?;
    let popup = engine.open_popup(id, "<p>popup</p>", "popup.html")?;

    if let Some(window) = engine.window_mut(id) {
        let list = window
            .get_element_by_id("list")
            .ok_or_else(|| anyhow::anyhow!("missing #list"))?;
        let mut ticks = 0;
        window.set_interval(
            move |w| {
                ticks += 1;
                let item = w.create_element("li");
                w.append_child(list, item)?;
                w.console_mut().log(format!("tick {ticks}"));
                if ticks == 3 {
                    if let Some(id) = w.current_timer() {
                        w.clear_interval(id);
                    }
                }
                Ok(())
            },
            0,
        );
    }

    let report = engine.run_until_idle();
    println!(
        "{} passes, {} callbacks, idle: {}",
        report.passes, report.fired, report.idle
    );

    if let Some(window) = engine.window(id) {
        let items = window.query_selector_all("li")?;
        println!("{} list items at {}ms", items.length(), window.now());
    }
    if let Some(window) = engine.window(popup) {
        println!("popup location: {}", window.location());
    }

    engine.close(popup)?;
    Ok(())
}
