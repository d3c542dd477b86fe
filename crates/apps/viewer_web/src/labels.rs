use foundation::math::Vec2;
use scene::MarkerView;
use scene::entity::EntityId;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAnchorElement, HtmlElement};

use crate::camera::Camera;

const ANCHOR_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("text-decoration", "none"),
    ("color", "white"),
    ("font-weight", "bold"),
    ("font-size", "0.8rem"),
    ("background", "rgba(0,0,0,0.6)"),
    ("padding", "4px 6px"),
    ("border-radius", "4px"),
    ("pointer-events", "auto"),
    ("white-space", "nowrap"),
    ("transform", "translate(-50%, -120%)"),
];

const STATUS_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("inset", "0"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("background", "#000"),
    ("color", "white"),
];

/// Where a pin's label goes this frame; `None` hides it.
pub fn label_position(
    camera: &Camera,
    marker: &MarkerView<'_>,
    globe_radius: f64,
) -> Option<Vec2> {
    if camera.is_occluded(marker.world_position, globe_radius) {
        return None;
    }
    let px = camera.project_to_screen(marker.world_position)?;
    let on_screen = (0.0..=camera.width).contains(&px.x) && (0.0..=camera.height).contains(&px.y);
    on_screen.then_some(px)
}

/// Clickable name tags overlaid on the globe canvas, one per pin.
#[derive(Debug)]
pub struct LabelLayer {
    document: Document,
    layer: Element,
    status: HtmlElement,
    anchors: Vec<(EntityId, HtmlAnchorElement)>,
}

impl LabelLayer {
    pub fn new(document: Document, layer_id: &str) -> Result<Self, JsValue> {
        let layer = document
            .get_element_by_id(layer_id)
            .ok_or_else(|| JsValue::from_str(&format!("label layer #{layer_id} missing")))?;
        let status = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        let style = status.style();
        for (name, value) in STATUS_STYLE {
            style.set_property(name, value)?;
        }
        style.set_property("display", "none")?;
        layer.append_child(&status)?;
        Ok(Self {
            document,
            layer,
            status,
            anchors: Vec::new(),
        })
    }

    /// Shows `text` over the whole globe, or hides the overlay on `None`.
    pub fn set_status(&self, text: Option<&str>) -> Result<(), JsValue> {
        let style = self.status.style();
        match text {
            Some(text) => {
                self.status.set_text_content(Some(text));
                style.set_property("display", "flex")
            }
            None => style.set_property("display", "none"),
        }
    }

    /// Creates one anchor per marker. Runs once, after the locations load.
    pub fn build(&mut self, markers: &[MarkerView<'_>]) -> Result<(), JsValue> {
        self.clear();
        for marker in markers {
            let anchor = self
                .document
                .create_element("a")?
                .dyn_into::<HtmlAnchorElement>()?;
            anchor.set_href(marker.url);
            anchor.set_target("_blank");
            anchor.set_rel("noopener noreferrer");
            anchor.set_text_content(Some(marker.name));
            let style = anchor.style();
            for (name, value) in ANCHOR_STYLE {
                style.set_property(name, value)?;
            }
            self.layer.append_child(&anchor)?;
            self.anchors.push((marker.entity, anchor));
        }
        log::debug!("created {} location labels", self.anchors.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        for (_, anchor) in self.anchors.drain(..) {
            anchor.remove();
        }
    }

    /// Moves each label over its pin, hiding labels behind the globe.
    pub fn update(
        &self,
        camera: &Camera,
        markers: &[MarkerView<'_>],
        globe_radius: f64,
    ) -> Result<(), JsValue> {
        for (entity, anchor) in &self.anchors {
            let position = markers
                .iter()
                .find(|m| m.entity == *entity)
                .and_then(|m| label_position(camera, m, globe_radius));
            let style = anchor.style();
            match position {
                Some(px) => {
                    style.set_property("display", "block")?;
                    style.set_property("left", &format!("{:.1}px", px.x))?;
                    style.set_property("top", &format!("{:.1}px", px.y))?;
                }
                None => style.set_property("display", "none")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::label_position;
    use crate::camera::Camera;
    use foundation::color::Rgba;
    use foundation::math::{Vec2, Vec3};
    use scene::MarkerView;
    use scene::entity::EntityId;

    fn marker(entity: EntityId, at: Vec3) -> MarkerView<'static> {
        MarkerView {
            entity,
            name: "HQ",
            url: "https://example.com",
            world_position: at,
            radius: 0.02,
            scale: 1.0,
            color: Rgba::RED,
            emissive: Rgba::BLACK,
            emitted: Rgba::BLACK,
            hovered: false,
        }
    }

    fn entity() -> EntityId {
        let mut world = scene::World::new();
        world.spawn()
    }

    #[test]
    fn front_pin_is_labelled_at_its_projection() {
        let cam = Camera::looking_at_origin(2.0, 800.0, 600.0);
        let m = marker(entity(), Vec3::new(0.0, 0.0, 1.02));
        assert_eq!(label_position(&cam, &m, 1.0), Some(Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn hidden_pin_has_no_label() {
        let cam = Camera::looking_at_origin(2.0, 800.0, 600.0);
        let m = marker(entity(), Vec3::new(0.0, 0.0, -1.02));
        assert_eq!(label_position(&cam, &m, 1.0), None);
    }
}
