use std::cell::RefCell;
use std::rc::Rc;

use charts::{RadarComposer, RadarConfig};
use foundation::time::Time;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::chart_canvas::RadarCanvas;
use crate::config::parse_config;
use crate::fetch::fetch_city_dataset;

#[derive(Debug)]
struct RadarState {
    composer: RadarComposer,
    canvas: RadarCanvas,
}

impl RadarState {
    fn sync_controls(&self) -> Result<(), JsValue> {
        self.canvas.set_heading(&self.composer.config().heading);
        self.canvas
            .set_cities(&self.composer.city_names(), self.composer.selected_city())?;
        self.canvas
            .set_controls_visible(self.composer.controls_visible())
    }

    fn draw(&mut self, now: Time) -> Result<(), JsValue> {
        let progress = self.composer.frame(now);
        let message = self.composer.message();
        self.canvas.draw(
            self.composer.view(),
            message.as_deref(),
            self.composer.options(),
            progress,
        )
    }
}

/// City comparison radar chart bound to a canvas, a `<select>` and a heading.
#[wasm_bindgen]
pub struct RadarView {
    state: Rc<RefCell<RadarState>>,
}

#[wasm_bindgen]
impl RadarView {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        select_id: &str,
        title_id: &str,
        config_json: Option<String>,
    ) -> Result<RadarView, JsValue> {
        let config: RadarConfig = parse_config(config_json.as_deref())
            .map_err(|e| JsValue::from_str(&format!("invalid radar config: {e}")))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas = RadarCanvas::new(document, canvas_id, select_id, title_id)?;
        canvas.set_controls_visible(false)?;

        let state = RadarState {
            composer: RadarComposer::new(config),
            canvas,
        };
        Ok(RadarView {
            state: Rc::new(RefCell::new(state)),
        })
    }

    /// Starts the one-shot dataset fetch. `url` overrides the configured one.
    pub fn load(&self, url: Option<String>) {
        let url = url.unwrap_or_else(|| self.state.borrow().composer.config().data_url.clone());
        let state = Rc::clone(&self.state);
        spawn_local(async move {
            let result = fetch_city_dataset(&url).await;
            let mut s = state.borrow_mut();
            s.composer.on_dataset_loaded(result);
            if let Err(err) = s.sync_controls() {
                log::error!("radar controls error: {err:?}");
            }
        });
    }

    /// Changes the selected city; returns whether the selection changed.
    pub fn select_city(&self, name: &str) -> bool {
        self.state.borrow_mut().composer.select_city(name)
    }

    pub fn selected_city(&self) -> String {
        self.state.borrow().composer.selected_city().to_string()
    }

    /// Draws the chart at `now_ms`. A failed draw is logged, never thrown.
    pub fn frame(&self, now_ms: f64) {
        if let Err(err) = self.state.borrow_mut().draw(Time::from_millis(now_ms)) {
            log::warn!("radar frame failed: {err:?}");
        }
    }

    /// "loading", "ready", "empty" or "failed".
    pub fn state(&self) -> String {
        self.state.borrow().composer.dataset().label().to_string()
    }

    /// Rows dropped or flagged while validating the dataset.
    pub fn issues(&self) -> Vec<String> {
        self.state
            .borrow()
            .composer
            .issues()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Placeholder text shown instead of the chart, if any.
    pub fn message(&self) -> Option<String> {
        self.state.borrow().composer.message()
    }
}
