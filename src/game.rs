// Browser glue: owns the running world, wires keyboard listeners and the
// frame loop, and exposes the state the JS renderer reads each frame.
use std::cell::{Cell, RefCell};

use js_sys::Function;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, window};

use crate::background::{BackgroundRecord, ChatCompletionsService, Resolver, catalog};
use crate::config::GameConfig;
use crate::frame_loop::FrameLoop;
use crate::world::{KeySet, World, overworld};

struct GameState {
    config: GameConfig,
    world: World,
    keys: KeySet,
    background: &'static BackgroundRecord,
}

/// JS hooks; kept apart from the game so they survive restarts and may be
/// registered before `start_game`.
#[derive(Default)]
struct Callbacks {
    on_trigger: Option<Function>,
    on_background: Option<Function>,
}

/// A registered DOM listener; unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

thread_local! {
    static GAME: RefCell<Option<GameState>> = const { RefCell::new(None) };
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    static LISTENERS: RefCell<Vec<Listener>> = const { RefCell::new(Vec::new()) };
    static CALLBACKS: RefCell<Callbacks> = RefCell::new(Callbacks::default());
    // Bumped per background request; only the latest may land. Outlives
    // `GAME` so a request from before a restart can never match a newer one.
    static RESOLVE_SEQ: Cell<u32> = const { Cell::new(0) };
}

fn next_request_seq() -> u32 {
    RESOLVE_SEQ.with(|seq| {
        let next = seq.get().wrapping_add(1);
        seq.set(next);
        next
    })
}

fn with_game<R>(f: impl FnOnce(&mut GameState) -> R) -> Option<R> {
    GAME.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn notify(callback: &Function, args: &[JsValue]) {
    let result = match args {
        [a] => callback.call1(&JsValue::NULL, a),
        [a, b] => callback.call2(&JsValue::NULL, a, b),
        _ => callback.call0(&JsValue::NULL),
    };
    if let Err(err) = result {
        log::warn!("game: JS callback threw {:?}", err);
    }
}

/// Start (or restart) the overworld. `config_json` is an optional
/// `GameConfig` JSON object; missing fields take their defaults.
#[wasm_bindgen]
pub fn start_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = GameConfig::from_json(config_json.as_deref().unwrap_or(""))
        .map_err(|e| JsValue::from_str(&format!("invalid game config: {}", e)))?;
    let motion = config.motion();
    if !motion.is_valid() {
        return Err(JsValue::from_str("invalid game config: bad viewport or movement values"));
    }
    log::set_max_level(config.log_level());

    stop_game();
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;

    let state = GameState {
        world: World::new(motion, overworld()),
        keys: KeySet::new(),
        background: catalog().default_record(),
        config,
    };
    GAME.with(|cell| cell.replace(Some(state)));

    let target: EventTarget = win.clone().into();
    let listeners = vec![
        Listener::attach(target.clone(), "keydown", |evt: Event| {
            if let Some(key) = evt.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                if with_game(|st| st.keys.press(&key)).unwrap_or(false) {
                    // Arrow keys would otherwise scroll the page.
                    evt.prevent_default();
                }
            }
        })?,
        Listener::attach(target.clone(), "keyup", |evt: Event| {
            if let Some(key) = evt.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
                with_game(|st| st.keys.release(&key));
            }
        })?,
        Listener::attach(target, "blur", |_evt: Event| {
            with_game(|st| st.keys.clear());
        })?,
    ];
    LISTENERS.with(|cell| cell.replace(listeners));

    let frames = FrameLoop::start(on_frame)?;
    FRAME_LOOP.with(|cell| cell.replace(Some(frames)));
    log::info!("game: started");
    Ok(())
}

fn on_frame(_ts: f64) {
    let fired = with_game(|st| {
        let trigger = st.world.tick(&st.keys)?;
        log::info!("game: {} triggered an overlay", trigger.obstacle_id);
        Some(trigger)
    })
    .flatten();
    // Callbacks run with no state borrowed so they may call back into us.
    if let Some(trigger) = fired {
        if let Some(cb) = CALLBACKS.with(|c| c.borrow().on_trigger.clone()) {
            notify(&cb, &[JsValue::from_str(trigger.obstacle_id)]);
        }
    }
}

/// Stop the frame loop and detach listeners. Safe to call repeatedly.
#[wasm_bindgen]
pub fn stop_game() {
    if let Some(frames) = FRAME_LOOP.with(|cell| cell.borrow_mut().take()) {
        frames.stop();
    }
    LISTENERS.with(|cell| cell.borrow_mut().clear());
}

/// Close the active overlay (no-op without one). Returns whether a trigger
/// was cleared.
#[wasm_bindgen]
pub fn dismiss_overlay() -> bool {
    with_game(|st| st.world.dismiss()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_trigger_callback(callback: Option<Function>) {
    CALLBACKS.with(|c| c.borrow_mut().on_trigger = callback);
}

#[wasm_bindgen]
pub fn set_background_callback(callback: Option<Function>) {
    CALLBACKS.with(|c| c.borrow_mut().on_background = callback);
}

/// Resolve the player's free-text answer to a catalog background without
/// blocking the frame loop.
/// The background callback fires once with `(id, filename)` unless a newer
/// request has been started meanwhile.
#[wasm_bindgen]
pub fn choose_background(answer: String) {
    let request = with_game(|st| {
        st.config
            .credential()
            .map(|key| ChatCompletionsService::new(&st.config.endpoint, key, &st.config.model))
    });
    let Some(service) = request else {
        log::warn!("game: choose_background called before start_game");
        return;
    };

    let seq = next_request_seq();
    wasm_bindgen_futures::spawn_local(async move {
        let record = Resolver::new(catalog(), service).resolve(&answer).await;
        deliver_background(seq, record);
    });
}

fn deliver_background(seq: u32, record: &'static BackgroundRecord) {
    let latest = RESOLVE_SEQ.with(Cell::get);
    let landed = with_game(|st| {
        if latest != seq {
            log::debug!("game: dropping stale background {} (request {})", record.id, seq);
            return false;
        }
        st.background = record;
        true
    })
    .unwrap_or(false);
    if !landed {
        return;
    }
    if let Some(cb) = CALLBACKS.with(|c| c.borrow().on_background.clone()) {
        notify(
            &cb,
            &[
                JsValue::from_str(record.id),
                JsValue::from_str(&record.filename),
            ],
        );
    }
}

#[wasm_bindgen]
pub fn player_x() -> f64 {
    with_game(|st| st.world.player().x).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn player_y() -> f64 {
    with_game(|st| st.world.player().y).unwrap_or(0.0)
}

/// Id of the obstacle whose overlay is open, if any.
#[wasm_bindgen]
pub fn active_trigger() -> Option<String> {
    with_game(|st| st.world.active_trigger().map(|o| o.id.to_string())).flatten()
}

#[wasm_bindgen]
pub fn current_background_id() -> String {
    with_game(|st| st.background.id)
        .unwrap_or(catalog().default_record().id)
        .to_string()
}

#[wasm_bindgen]
pub fn current_background_filename() -> String {
    with_game(|st| st.background.filename.clone())
        .unwrap_or_else(|| catalog().default_record().filename.clone())
}

/// Catalog as JSON for the renderer's asset preloading.
#[wasm_bindgen]
pub fn background_manifest() -> String {
    catalog().manifest_json()
}

/// Obstacle layout as JSON (`id`, `x`, `y`, `label`, `color`, `size`).
#[wasm_bindgen]
pub fn obstacle_layout() -> String {
    let entries: Vec<serde_json::Value> = with_game(|st| {
        let size = st.world.config().footprint;
        st.world
            .obstacles()
            .iter()
            .map(|o| {
                serde_json::json!({
                    "id": o.id, "x": o.x, "y": o.y,
                    "label": o.label, "color": o.color, "size": size
                })
            })
            .collect()
    })
    .unwrap_or_default();
    serde_json::Value::from(entries).to_string()
}
