//! Browser bindings
//!
//! The page owns the canvas, input listeners and the rAF loop; it drives a
//! `WebGame` and renders from the JSON snapshot each frame.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::Clock;
use crate::settings::Settings;
use crate::sim::{GameSession, ShiftDirection};

/// Browser wall clock
struct DateClock;

impl Clock for DateClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Already initialized on hot reload
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Hex Popper loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WebGame {
    /// New game with default settings; `seed` of 0 picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> WebGame {
        let seed = if seed == 0 {
            js_sys::Date::now() as u64
        } else {
            seed
        };
        WebGame {
            session: GameSession::new(Settings::default(), seed),
        }
    }

    /// New game with settings given as JSON
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(settings_json: &str, seed: u64) -> Result<WebGame, JsError> {
        let settings = Settings::from_json(settings_json)?;
        Ok(WebGame {
            session: GameSession::new(settings, seed),
        })
    }

    #[wasm_bindgen(js_name = updateAim)]
    pub fn update_aim(&mut self, angle: f32) {
        self.session.update_aim(angle);
    }

    #[wasm_bindgen(js_name = releaseAim)]
    pub fn release_aim(&mut self) {
        self.session.release_aim();
    }

    /// Returns false when the shot was refused
    #[wasm_bindgen(js_name = attemptFire)]
    pub fn attempt_fire(&mut self, angle: f32) -> bool {
        match self.session.attempt_fire(angle) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Fire rejected: {}", e);
                false
            }
        }
    }

    #[wasm_bindgen(js_name = swapLoaded)]
    pub fn swap_loaded(&mut self) -> bool {
        self.session.swap_loaded()
    }

    /// `+1` moves rows toward the ceiling, `-1` away from it
    #[wasm_bindgen(js_name = startShift)]
    pub fn start_shift(&mut self, sign: i32) -> bool {
        ShiftDirection::from_sign(sign)
            .is_some_and(|direction| self.session.start_shift(direction).is_ok())
    }

    pub fn restart(&mut self, seed: u64) {
        self.session.restart(seed);
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) {
        self.session.toggle_pause();
    }

    #[wasm_bindgen(js_name = setLaunchPosition)]
    pub fn set_launch_position(&mut self, x: f32, y: f32) {
        self.session.set_launch_position(Vec2::new(x, y));
    }

    /// Advance one animation frame at the current wall time
    pub fn frame(&mut self) {
        self.session.frame(&DateClock);
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }

    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.snapshot())?)
    }

    #[wasm_bindgen(js_name = drainEventsJson)]
    pub fn drain_events_json(&mut self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.session.drain_events())?)
    }
}
