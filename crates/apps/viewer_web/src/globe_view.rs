use std::cell::RefCell;
use std::rc::Rc;

use foundation::time::Time;
use scene::{GlobeConfig, GlobeScene};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;

use crate::camera::Camera;
use crate::config::parse_config;
use crate::fetch::{fetch_bytes, fetch_locations};
use crate::labels::LabelLayer;
use crate::texture::TextureImage;
use crate::wgpu::{
    GlobeFrame, GlobeTexture, MarkerInstance, WgpuContext, init_wgpu_from_canvas_id, render_globe,
    resize_wgpu, set_globe_texture,
};

#[derive(Debug)]
struct GlobeState {
    scene: GlobeScene,
    camera: Camera,
    labels: LabelLayer,
    gpu: Option<WgpuContext>,
}

impl GlobeState {
    fn marker_instances(&self) -> Vec<MarkerInstance> {
        self.scene
            .marker_views()
            .iter()
            .map(|m| MarkerInstance {
                center: m.world_position.as_f32_array(),
                radius: (m.radius * m.scale) as f32,
                color: m.color.as_array(),
                emissive: m.emitted.as_array(),
            })
            .collect()
    }

    fn render(&mut self) -> Result<(), JsValue> {
        let markers = self.marker_instances();
        let config = self.scene.config();
        let b = config.background;
        let frame = GlobeFrame {
            view_proj: self.camera.view_proj(),
            rotation_y: self.scene.rotation_y(),
            globe_radius: config.radius,
            globe_emissive: [1.0, 1.0, 1.0, config.borders_emissive_intensity],
            background: [b.r as f64, b.g as f64, b.b as f64, b.a as f64],
            markers: &markers,
        };
        if let Some(gpu) = self.gpu.as_mut() {
            render_globe(gpu, &frame)?;
        }
        self.labels
            .update(&self.camera, &self.scene.marker_views(), config.radius)
    }
}

/// The rotating globe with one clickable pin per location.
#[wasm_bindgen]
pub struct GlobeView {
    state: Rc<RefCell<GlobeState>>,
    canvas: HtmlCanvasElement,
}

#[wasm_bindgen]
impl GlobeView {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        label_layer_id: &str,
        config_json: Option<String>,
    ) -> Result<GlobeView, JsValue> {
        let config: GlobeConfig = parse_config(config_json.as_deref())
            .map_err(|e| JsValue::from_str(&format!("invalid globe config: {e}")))?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("document missing"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas missing"))?
            .dyn_into::<HtmlCanvasElement>()?;
        let labels = LabelLayer::new(document, label_layer_id)?;
        labels.set_status(Some(config.loading_text.as_str()))?;
        let camera = Camera::looking_at_origin(
            config.camera_distance,
            canvas.width() as f64,
            canvas.height() as f64,
        );

        let texture_urls = [
            (GlobeTexture::Earth, config.texture_url.clone()),
            (GlobeTexture::Borders, config.borders_texture_url.clone()),
        ];
        let segments = (config.sphere_segments, config.marker_segments);

        let state = Rc::new(RefCell::new(GlobeState {
            scene: GlobeScene::new(config),
            camera,
            labels,
            gpu: None,
        }));

        let canvas_id = canvas_id.to_string();
        let gpu_state = Rc::clone(&state);
        spawn_local(async move {
            if let Err(err) = init_gpu(gpu_state, &canvas_id, segments, texture_urls).await {
                log::error!("wgpu init error: {err:?}");
            }
        });

        Ok(GlobeView { state, canvas })
    }

    /// Starts the one-shot locations fetch. `url` overrides the configured one.
    pub fn load(&self, url: Option<String>) {
        let url =
            url.unwrap_or_else(|| self.state.borrow().scene.config().locations_url.clone());
        let state = Rc::clone(&self.state);
        spawn_local(async move {
            let result = fetch_locations(&url).await;
            let mut s = state.borrow_mut();
            s.scene.on_locations_loaded(result);
            let s = &mut *s;
            let shown = s
                .labels
                .set_status(s.scene.message())
                .and_then(|()| s.labels.build(&s.scene.marker_views()));
            if let Err(err) = shown {
                log::error!("label layer error: {err:?}");
            }
        });
    }

    /// Advances rotation to `now_ms` (a `requestAnimationFrame` timestamp) and draws.
    ///
    /// Never throws: a failed frame is logged and the next one tries again.
    pub fn frame(&self, now_ms: f64) {
        let mut s = self.state.borrow_mut();
        s.scene.tick(Time::from_millis(now_ms));
        if let Err(err) = s.render() {
            log::warn!("globe frame failed: {err:?}");
        }
    }

    /// Hover test at canvas pixel `(x, y)`. Returns whether a pin is under the pointer.
    ///
    /// The canvas tooltip shows the pin name, or the coordinates under the pointer.
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<bool, JsValue> {
        let mut s = self.state.borrow_mut();
        let (hit, tooltip) = match s.camera.screen_ray(x, y) {
            Some(ray) => (s.scene.pointer_move(ray).is_some(), s.scene.tooltip(ray)),
            None => {
                s.scene.pointer_leave();
                (false, None)
            }
        };
        match tooltip {
            Some(text) => self.canvas.set_attribute("title", &text)?,
            None => self.canvas.remove_attribute("title")?,
        }
        self.canvas
            .style()
            .set_property("cursor", if hit { "pointer" } else { "default" })?;
        Ok(hit)
    }

    pub fn pointer_leave(&self) -> Result<(), JsValue> {
        self.state.borrow_mut().scene.pointer_leave();
        self.canvas.remove_attribute("title")?;
        self.canvas.style().set_property("cursor", "default")
    }

    /// Opens the branch page of the pin at `(x, y)` in a new tab and returns its URL.
    pub fn pointer_click(&self, x: f64, y: f64) -> Result<Option<String>, JsValue> {
        let url = {
            let s = self.state.borrow();
            s.camera
                .screen_ray(x, y)
                .and_then(|ray| s.scene.pointer_click(ray).map(str::to_string))
        };
        if let Some(url) = &url {
            let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
            window.open_with_url_and_target_and_features(url, "_blank", "noopener,noreferrer")?;
        }
        Ok(url)
    }

    pub fn resize(&self, width: f64, height: f64) {
        let mut s = self.state.borrow_mut();
        s.camera.resize(width, height);
        if let Some(gpu) = s.gpu.as_mut() {
            resize_wgpu(gpu, width as u32, height as u32);
        }
    }

    /// "loading", "ready", "empty" or "failed".
    pub fn state(&self) -> String {
        self.state.borrow().scene.load_state().label().to_string()
    }

    pub fn marker_count(&self) -> u32 {
        self.state.borrow().scene.markers().len() as u32
    }
}

async fn init_gpu(
    state: Rc<RefCell<GlobeState>>,
    canvas_id: &str,
    (globe_segments, marker_segments): (u32, u32),
    textures: [(GlobeTexture, String); 2],
) -> Result<(), JsValue> {
    let ctx = init_wgpu_from_canvas_id(canvas_id, globe_segments, marker_segments).await?;
    state.borrow_mut().gpu = Some(ctx);

    for (which, url) in textures {
        let image = match fetch_bytes(&url).await {
            Ok(bytes) => TextureImage::decode(&bytes).map_err(|e| e.to_string()),
            Err(err) => Err(err.to_string()),
        };
        match image {
            Ok(image) => {
                if let Some(gpu) = state.borrow_mut().gpu.as_mut() {
                    set_globe_texture(gpu, which, &image);
                }
                log::debug!("loaded {which:?} texture {}x{}", image.width, image.height);
            }
            Err(err) => log::warn!("{which:?} texture from {url} unavailable: {err}"),
        }
    }
    Ok(())
}
