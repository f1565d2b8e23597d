//! Wabi Folio entry point
//!
//! On the web, mounts the motion and navigation layer onto the page. Natively,
//! runs a headless walk-through of both against a simulated page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;

    use wabi_folio::platform::web::PageContext;

    thread_local! {
        static PAGE: RefCell<Option<PageContext>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let level = if cfg!(debug_assertions) {
            log::Level::Debug
        } else {
            log::Level::Info
        };
        if let Err(err) = console_log::init_with_level(level) {
            web_sys::console::error_1(&format!("Logger init failed: {}", err).into());
        }

        log::info!("Wabi Folio starting...");

        match PageContext::mount() {
            Ok(page) => {
                PAGE.with(|slot| {
                    // Replacing an earlier mount drops it, detaching its listeners
                    slot.borrow_mut().replace(page);
                });
                log::info!("Wabi Folio running!");
            }
            Err(err) => log::error!("Motion layer not mounted: {}", err),
        }
    }

    pub fn unmount() {
        if let Some(page) = PAGE.with(|slot| slot.borrow_mut().take()) {
            page.unmount();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

/// Detach every listener and stop all animation (page teardown, hot reload)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount() {
    wasm_page::unmount();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Wabi Folio (native) starting...");
    log::info!("Native mode has no DOM - run with `trunk serve` for the web version");

    println!("\nPointer motion:");
    demo_pointer_motion();

    println!("\nSection navigation:");
    demo_navigation();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_pointer_motion() {
    use wabi_folio::PointerMotionEngine;

    let mut engine = PointerMotionEngine::default();
    engine.set_viewport(1000.0, 1000.0);
    engine.on_pointer_move(0.0, 0.0);
    engine.on_pointer_move(800.0, 600.0);

    let dt = 1.0 / 60.0;
    let mut frames = 0;
    while engine.step(dt) {
        frames += 1;
        if frames % 30 == 0 {
            let s = engine.smoothed();
            println!("  frame {:4}: smoothed ({:7.2}, {:7.2})", frames, s.x, s.y);
        }
    }
    println!("  settled after {} frames", frames);

    match serde_json::to_string_pretty(&engine.frame()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Frame did not serialize: {}", err),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_navigation() {
    use wabi_folio::nav::{NavOutcome, PageLayout, ScrollNavigator, StaticPage, site_sections};

    let mut page = StaticPage::new(900.0)
        .with_section("home", 0.0, 900.0)
        .with_section("profile", 900.0, 1200.0)
        .with_section("projects", 2100.0, 1600.0)
        .with_section("contact", 3700.0, 900.0);
    let mut nav = ScrollNavigator::new(site_sections());
    nav.subscribe(|event| println!("  event: {:?}", event));

    page.set_scroll(500.0);
    nav.on_scroll(&page);
    nav.flush();

    let mut now = 0.0;
    let outcome = nav.navigate_to("projects", now, &page);
    println!("  navigate_to(projects): {:?}", outcome);
    if let NavOutcome::Started { .. } = outcome {
        let mut frames = 0;
        while let Some(offset) = nav.tick(now) {
            page.set_scroll(offset);
            nav.on_scroll(&page);
            nav.flush();
            if frames % 10 == 0 {
                println!("  t={:6.1}ms offset={:7.1}", now, offset);
            }
            frames += 1;
            now += 1000.0 / 60.0;
        }
        println!("  arrived at {:.1}", page.scroll_offset());
    }

    let outcome = nav.navigate_to("projects", now, &page);
    println!("  navigate_to(projects) again: {:?}", outcome);
    nav.flush();
}
