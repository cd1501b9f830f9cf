#![forbid(unsafe_code)]

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use guidepost_runtime::EngineConfig;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::dom::WebDocument;
use crate::host::TourHost;
use crate::local_storage::LocalStorage;

struct Shared {
    host: RefCell<TourHost<WebDocument>>,
    origin: Instant,
    timer: RefCell<Option<Timeout>>,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Push the current view to the registered callback.
    fn notify(&self) {
        let Some(callback) = self.on_change.borrow().clone() else {
            return;
        };
        let json = self.host.borrow().view_json();
        match json {
            Ok(json) => {
                if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    tracing::warn!(error = ?err, "tour change callback threw");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize tour view"),
        }
    }
}

/// Re-arm the single browser timeout for the host's next deadline.
fn schedule(shared: &Rc<Shared>) {
    let deadline = shared.host.borrow().next_deadline();
    drop(shared.timer.borrow_mut().take());
    let Some(deadline) = deadline else {
        return;
    };
    let delay = deadline.saturating_sub(shared.now());
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    let weak = Rc::downgrade(shared);
    let timeout = Timeout::new(millis, move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        // The timer has fired; dropping it here would free the running closure.
        if let Some(fired) = shared.timer.borrow_mut().take() {
            let _ = fired.forget();
        }
        let now = shared.now();
        let changed = shared.host.borrow_mut().tick(now);
        schedule(&shared);
        if changed {
            shared.notify();
        }
    });
    *shared.timer.borrow_mut() = Some(timeout);
}

/// Browser binding for the guided tour.
///
/// All state changes are pushed to the callback registered with
/// [`on_change`](Self::on_change) as a JSON view; [`overlay`](Self::overlay)
/// returns the same JSON on demand.
#[wasm_bindgen]
pub struct GuidedTourWeb {
    shared: Rc<Shared>,
    resize: Option<EventListener>,
}

#[wasm_bindgen]
impl GuidedTourWeb {
    /// `config` is an optional JSON object overriding engine defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<GuidedTourWeb, JsValue> {
        let config = match config.as_deref() {
            Some(json) => EngineConfig::from_json(json)
                .map_err(|err| JsValue::from_str(&format!("invalid tour config: {err}")))?,
            None => EngineConfig::default(),
        };
        let document = WebDocument::new()?;
        let window = document.window().clone();
        let storage = LocalStorage::new();
        let host = TourHost::new(document, storage, config, Duration::ZERO);
        let shared = Rc::new(Shared {
            host: RefCell::new(host),
            origin: Instant::now(),
            timer: RefCell::new(None),
            on_change: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let resize = EventListener::new(&window, "resize", move |_event| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let now = shared.now();
            shared.host.borrow_mut().notify_resize(now);
            schedule(&shared);
        });

        schedule(&shared);
        tracing::debug!("guided tour host created");
        Ok(Self {
            shared,
            resize: Some(resize),
        })
    }

    /// Register (or clear) the view callback. It receives the JSON view.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Option<js_sys::Function>) {
        *self.shared.on_change.borrow_mut() = callback;
    }

    /// Start a preset: `complete`, `chat`, `workspace` or `welcome`.
    pub fn start(&self, preset: &str) -> Result<(), JsValue> {
        self.update(|host, now| host.start(preset, now))
            .map(|_| ())
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn next(&self) {
        self.update(|host, now| {
            host.next(now);
        });
    }

    pub fn previous(&self) {
        self.update(|host, now| {
            host.previous(now);
        });
    }

    pub fn skip(&self) {
        self.update(|host, _| {
            host.skip();
        });
    }

    #[wasm_bindgen(js_name = resetCompletion)]
    pub fn reset_completion(&self) {
        self.update(|host, _| host.reset_completion());
    }

    #[wasm_bindgen(js_name = hasCompletedTour)]
    pub fn has_completed_tour(&self) -> bool {
        self.shared.host.borrow().has_completed_tour()
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&self) {
        self.update(|host, _| host.toggle_menu());
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&self) {
        self.update(|host, _| host.close_menu());
    }

    #[wasm_bindgen(js_name = dismissHint)]
    pub fn dismiss_hint(&self) {
        self.update(|host, _| host.dismiss_hint());
    }

    /// Current view as JSON.
    pub fn overlay(&self) -> Result<String, JsValue> {
        self.shared
            .host
            .borrow()
            .view_json()
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    /// Drop the resize listener, pending timer and callback.
    pub fn destroy(&mut self) {
        self.resize = None;
        drop(self.shared.timer.borrow_mut().take());
        *self.shared.on_change.borrow_mut() = None;
    }
}

impl GuidedTourWeb {
    /// Run `f` on the host, then reschedule timers and push the new view.
    fn update<R>(&self, f: impl FnOnce(&mut TourHost<WebDocument>, Duration) -> R) -> R {
        let now = self.shared.now();
        let result = f(&mut self.shared.host.borrow_mut(), now);
        schedule(&self.shared);
        self.shared.notify();
        result
    }
}

/// Route `tracing` output to the browser console.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(filter: Option<String>) -> bool {
    crate::console::init(filter.as_deref().unwrap_or("info"))
}
