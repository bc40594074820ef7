//! scc-action-engine -- action-remapping engine for Steam-Controller-class
//! input devices.
//!
//! Entry point: initializes logging, loads a profile, and runs a short
//! demo dispatch loop against a `TestMapper` so the engine can be exercised
//! without a real controller or OSD stack attached.

mod action;
mod config;
mod constants;
mod error;
mod logging;
mod mapper;
mod param_checker;
mod parameter;
mod parser;
mod scheduler;

use mapper::{Mapper, TestMapper};

const DEMO_PROFILE: &str = r#"
A = "button(KEY_A)"
B = "tap(button(KEY_B), 0.2)"
LB = "hold(button(KEY_Q), button(KEY_W), 0.3)"
"#;

fn main() {
    env_logger::init();
    log::info!("scc-action-engine v{}", env!("CARGO_PKG_VERSION"));

    let (profile, errors) = match config::load_profile(DEMO_PROFILE) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("could not load demo profile: {e}");
            return;
        }
    };
    for (input_id, err) in &errors {
        log::warn!("profile entry '{input_id}' rejected: {err}");
    }
    log::info!("loaded {} binding(s)", profile.bindings.len());

    let mut mapper = TestMapper::new();
    if let Some(a_button) = profile.get("A") {
        log::debug!("dispatching press/release for 'A' -> {}", a_button.to_text());
        a_button.button_press(&mut mapper);
        a_button.button_release(&mut mapper);
    }
    mapper.advance_ticks(500);
    log::info!("demo run complete; key log = {:?}", mapper.key_log);
}
