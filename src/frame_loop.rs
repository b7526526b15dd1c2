// Cancellable requestAnimationFrame chain.
//
// Each frame re-requests the next one until `stop()` is called (or the loop is
// dropped). Stopping cancels the pending frame request, so no tick runs after
// `stop()` returns, and it may be called any number of times, including from
// inside the frame callback itself.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

pub struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
    in_frame: Rc<Cell<bool>>,
}

impl FrameLoop {
    /// Schedule `on_frame(timestamp_ms)` on every animation frame.
    pub fn start(mut on_frame: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let win = window().ok_or_else(|| JsValue::from_str("no window"))?;

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));
        let in_frame = Rc::new(Cell::new(false));

        let (f, p, r, busy) = (
            callback.clone(),
            pending.clone(),
            running.clone(),
            in_frame.clone(),
        );
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            p.set(None);
            if !r.get() {
                return;
            }
            busy.set(true);
            on_frame(ts);
            busy.set(false);

            if !r.get() {
                // Stopped during this frame: the closure cannot be dropped while
                // it is still executing, so release it on the next microtask.
                let stale = f.borrow_mut().take();
                wasm_bindgen_futures::spawn_local(async move { drop(stale) });
                return;
            }
            if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
                p.set(w.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
            }
        }) as Box<dyn FnMut(f64)>));

        let first = schedule_first(
            &*callback,
            |cb| win.request_animation_frame(cb.as_ref().unchecked_ref()),
            || JsValue::from_str("frame callback missing"),
        )?;
        pending.set(Some(first));

        Ok(Self {
            callback,
            pending,
            running,
            in_frame,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    /// Stop scheduling frames. Idempotent.
    pub fn stop(&self) {
        if !self.running.replace(false) {
            return;
        }
        if let Some(id) = self.pending.take() {
            if let Some(w) = window() {
                let _ = w.cancel_animation_frame(id);
            }
        }
        // Inside a frame the callback releases itself once it returns.
        if !self.in_frame.get() {
            self.callback.borrow_mut().take();
        }
        log::debug!("frame loop stopped");
    }
}

/// Issue the first frame request for the closure in `slot`. On failure the
/// closure is released, since it holds a clone of `slot` and would otherwise
/// keep itself alive.
fn schedule_first<T, E>(
    slot: &RefCell<Option<T>>,
    request: impl FnOnce(&T) -> Result<i32, E>,
    missing: impl FnOnce() -> E,
) -> Result<i32, E> {
    let first = match slot.borrow().as_ref() {
        Some(cb) => request(cb),
        None => Err(missing()),
    };
    if first.is_err() {
        slot.borrow_mut().take();
    }
    first
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
