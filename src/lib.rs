//! Quiz Quest core crate.
//!
//! The overworld (`world`) moves the player around a fixed field and pauses on
//! contact with an enemy so the JS side can show its question overlay. The
//! scene backdrop (`background`) is picked from the player's free-text answer,
//! through the external match service when a credential is configured and by
//! keyword scoring otherwise. Rendering stays on the JS side; `game` exposes
//! the state it needs.

use wasm_bindgen::prelude::*;

pub mod background;
pub mod config;
mod frame_loop;
mod game;
mod logging;
pub mod world;

pub use frame_loop::FrameLoop;
pub use game::{
    active_trigger, background_manifest, choose_background, current_background_filename,
    current_background_id, dismiss_overlay, obstacle_layout, player_x, player_y,
    set_background_callback, set_trigger_callback, start_game, stop_game,
};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init(log::LevelFilter::Info);
}
