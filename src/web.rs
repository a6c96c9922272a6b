//! Browser bindings
//!
//! The host page owns the canvas, audio and event listeners. It forwards
//! input to a [`WebGame`], calls `frame` from `requestAnimationFrame`, plays
//! the returned cue names and draws `snapshot()`.

use wasm_bindgen::prelude::*;

use crate::best::BestLevel;
use crate::driver::Driver;
use crate::platform;
use crate::sim::{Session, TickInput};

#[wasm_bindgen(start)]
pub fn wasm_main() {
    platform::init_logging();
    log::info!("Recoil Island (web) ready");
}

#[wasm_bindgen]
pub struct WebGame {
    driver: Driver,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32) -> WebGame {
        let best = BestLevel::load();
        log::info!("Starting session with seed {}", seed);
        let session = Session::new(seed as u64, best.level);
        WebGame {
            driver: Driver::new(session, best),
        }
    }

    /// Pointer moved to a world-space point
    pub fn aim(&mut self, x: f32, y: f32) {
        self.driver.queue(&TickInput {
            aim: Some(glam::Vec2::new(x, y)),
            ..Default::default()
        });
    }

    pub fn press_fire(&mut self) {
        self.driver.queue(&TickInput {
            begin_fire: true,
            ..Default::default()
        });
    }

    pub fn release_fire(&mut self) {
        self.driver.queue(&TickInput {
            end_fire: true,
            ..Default::default()
        });
    }

    pub fn toggle_pause(&mut self) {
        self.driver.queue(&TickInput {
            pause: true,
            ..Default::default()
        });
    }

    pub fn confirm(&mut self) {
        self.driver.queue(&TickInput {
            confirm: true,
            ..Default::default()
        });
    }

    pub fn go_home(&mut self) {
        self.driver.queue(&TickInput {
            home: true,
            ..Default::default()
        });
    }

    /// Tab hidden or window blurred
    pub fn hidden(&mut self) {
        self.driver.queue(&TickInput {
            hidden: true,
            ..Default::default()
        });
    }

    /// Advance to `now_ms` (e.g. `performance.now()`); returns the cue names
    /// to play this frame
    pub fn frame(&mut self, now_ms: f64) -> Result<Vec<String>, JsValue> {
        let outcome = self.driver.frame(now_ms / 1000.0);
        if outcome.best_changed {
            self.driver.best.save();
        }
        if let Some(message) = outcome.load_failed {
            return Err(JsValue::from_str(&message));
        }
        Ok(outcome.cues.iter().map(|c| c.as_str().to_string()).collect())
    }

    /// Current frame as JSON
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.driver.session.snapshot())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn best(&self) -> u32 {
        self.driver.best.level
    }
}
