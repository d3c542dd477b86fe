use charts::{ChartSeries, LegendPosition, RadarLayout, RadarOptions, RadarView as ChartView};
use foundation::color::Rgba;
use foundation::math::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlOptionElement,
    HtmlSelectElement,
};

const PADDING_PX: f64 = 12.0;
const LEGEND_BOX_PX: f64 = 12.0;
const LEGEND_GAP_PX: f64 = 6.0;
const LEGEND_SPACING_PX: f64 = 16.0;
/// Rough glyph advance as a fraction of the font size, for layout only.
const GLYPH_ASPECT: f64 = 0.6;
/// Room left around the plot for category labels.
const POINT_LABEL_MARGIN_PX: f64 = 28.0;

/// Screen placement of the title, legend entries and plot.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub title_at: Option<Vec2>,
    /// Top-left of each legend swatch, in series order.
    pub legend: Vec<Vec2>,
    pub center: Vec2,
    pub radius: f64,
}

fn text_width(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * GLYPH_ASPECT
}

fn legend_item_width(label: &str, font_px: f64) -> f64 {
    LEGEND_BOX_PX + LEGEND_GAP_PX + text_width(label, font_px)
}

/// Lays out title, legend and plot inside a `width` x `height` canvas.
pub fn plan_frame(
    width: f64,
    height: f64,
    options: &RadarOptions,
    legend_labels: &[&str],
) -> ChartFrame {
    let mut top = PADDING_PX;
    let mut bottom = height - PADDING_PX;
    let mut left = PADDING_PX;
    let mut right = width - PADDING_PX;

    let title_at = options.title.display.then(|| {
        let at = Vec2::new(width / 2.0, top + options.title.font_px / 2.0);
        top += options.title.font_px + PADDING_PX;
        at
    });

    let mut legend = Vec::new();
    if options.legend.display && !legend_labels.is_empty() {
        let font = options.legend.font_px;
        let row_h = LEGEND_BOX_PX.max(font);
        match options.legend.position {
            LegendPosition::Top | LegendPosition::Bottom => {
                let total: f64 = legend_labels
                    .iter()
                    .map(|l| legend_item_width(l, font))
                    .sum::<f64>()
                    + LEGEND_SPACING_PX * (legend_labels.len() - 1) as f64;
                let y = if options.legend.position == LegendPosition::Top {
                    let y = top;
                    top += row_h + PADDING_PX;
                    y
                } else {
                    bottom -= row_h;
                    let y = bottom;
                    bottom -= PADDING_PX;
                    y
                };
                let mut x = (width - total) / 2.0;
                for label in legend_labels {
                    legend.push(Vec2::new(x, y));
                    x += legend_item_width(label, font) + LEGEND_SPACING_PX;
                }
            }
            LegendPosition::Left | LegendPosition::Right => {
                let column_w = legend_labels
                    .iter()
                    .map(|l| legend_item_width(l, font))
                    .fold(0.0, f64::max);
                let x = if options.legend.position == LegendPosition::Left {
                    let x = left;
                    left += column_w + PADDING_PX;
                    x
                } else {
                    right -= column_w;
                    let x = right;
                    right -= PADDING_PX;
                    x
                };
                let mut y = top;
                for _ in legend_labels {
                    legend.push(Vec2::new(x, y));
                    y += row_h + LEGEND_GAP_PX;
                }
            }
        }
    }

    let center = Vec2::new((left + right) / 2.0, (top + bottom) / 2.0);
    let radius = (((right - left).min(bottom - top)) / 2.0 - POINT_LABEL_MARGIN_PX).max(0.0);
    ChartFrame {
        title_at,
        legend,
        center,
        radius,
    }
}

/// Canvas 2D radar plus the dropdown and heading it is paired with.
#[derive(Debug)]
pub struct RadarCanvas {
    document: Document,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    select: HtmlSelectElement,
    heading: Element,
    /// The dropdown's container, or the dropdown itself when it has none.
    selector: Element,
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("#{id} missing")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{id} has the wrong element type")))
}

impl RadarCanvas {
    pub fn new(
        document: Document,
        canvas_id: &str,
        select_id: &str,
        heading_id: &str,
    ) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = element(&document, canvas_id)?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let select: HtmlSelectElement = element(&document, select_id)?;
        let heading = element(&document, heading_id)?;
        let selector = select
            .parent_element()
            .unwrap_or_else(|| select.clone().into());
        Ok(Self {
            document,
            canvas,
            ctx,
            select,
            heading,
            selector,
        })
    }

    /// Shows or hides the heading and the dropdown.
    pub fn set_controls_visible(&self, visible: bool) -> Result<(), JsValue> {
        for el in [&self.heading, &self.selector] {
            if visible {
                el.remove_attribute("hidden")?;
            } else {
                el.set_attribute("hidden", "")?;
            }
        }
        Ok(())
    }

    pub fn set_heading(&self, text: &str) {
        self.heading.set_text_content(Some(text));
    }

    /// Replaces the dropdown options and selects `selected`.
    pub fn set_cities(&self, names: &[&str], selected: &str) -> Result<(), JsValue> {
        self.select.set_inner_html("");
        for name in names {
            let option = self
                .document
                .create_element("option")?
                .dyn_into::<HtmlOptionElement>()?;
            option.set_value(name);
            option.set_text(name);
            self.select.append_child(&option)?;
        }
        self.select.set_value(selected);
        Ok(())
    }

    pub fn draw(
        &self,
        view: &ChartView,
        message: Option<&str>,
        options: &RadarOptions,
        progress: f64,
    ) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        self.ctx.clear_rect(0.0, 0.0, width, height);

        if let Some(text) = message {
            self.ctx.set_fill_style_str(&options.scale.point_label_color.to_css());
            self.ctx.set_font(&format!("{}px sans-serif", options.title.font_px));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            return self.ctx.fill_text(text, width / 2.0, height / 2.0);
        }

        let ChartView::Chart { title, series } = view else {
            return Ok(());
        };
        let legend_labels: Vec<&str> = series.series.iter().map(|s| s.label.as_str()).collect();
        let frame = plan_frame(width, height, options, &legend_labels);
        let layout = RadarLayout::new(series, frame.center, frame.radius, options.scale.max_ticks);

        if let Some(at) = frame.title_at {
            self.ctx.set_fill_style_str(&options.title.color.to_css());
            self.ctx.set_font(&format!("bold {}px sans-serif", options.title.font_px));
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.ctx.fill_text(title, at.x, at.y)?;
        }
        self.draw_legend(series, &frame, options)?;
        self.draw_grid(&layout, options)?;
        self.draw_series(series, &layout, progress);
        Ok(())
    }

    fn draw_legend(
        &self,
        series: &ChartSeries,
        frame: &ChartFrame,
        options: &RadarOptions,
    ) -> Result<(), JsValue> {
        let font = options.legend.font_px;
        self.ctx.set_font(&format!("{font}px sans-serif"));
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("middle");
        for (s, at) in series.series.iter().zip(&frame.legend) {
            self.ctx.set_fill_style_str(&s.style.background.to_css());
            self.ctx.fill_rect(at.x, at.y, LEGEND_BOX_PX, LEGEND_BOX_PX);
            self.ctx.set_stroke_style_str(&s.style.border.to_css());
            self.ctx.set_line_width(s.style.border_width);
            self.ctx.stroke_rect(at.x, at.y, LEGEND_BOX_PX, LEGEND_BOX_PX);
            self.ctx.set_fill_style_str(&options.legend.label_color.to_css());
            self.ctx.fill_text(
                &s.label,
                at.x + LEGEND_BOX_PX + LEGEND_GAP_PX,
                at.y + LEGEND_BOX_PX / 2.0,
            )?;
        }
        Ok(())
    }

    fn draw_grid(&self, layout: &RadarLayout, options: &RadarOptions) -> Result<(), JsValue> {
        let scale = &options.scale;

        self.ctx.set_line_width(1.0);
        self.ctx.set_stroke_style_str(&scale.grid_color.to_css());
        for tick in &layout.ticks {
            self.trace(&layout.ring(*tick));
            self.ctx.stroke();
        }

        self.ctx.set_stroke_style_str(&scale.angle_line_color.to_css());
        for spoke in &layout.spokes {
            self.ctx.begin_path();
            self.ctx.move_to(layout.center.x, layout.center.y);
            self.ctx.line_to(spoke.end.x, spoke.end.y);
            self.ctx.stroke();
        }

        self.ctx.set_fill_style_str(&scale.point_label_color.to_css());
        self.ctx.set_font(&format!("{}px sans-serif", scale.point_label_font_px));
        self.ctx.set_text_baseline("middle");
        for spoke in &layout.spokes {
            let align = match spoke.label_anchor.x - layout.center.x {
                dx if dx > 1.0 => "left",
                dx if dx < -1.0 => "right",
                _ => "center",
            };
            self.ctx.set_text_align(align);
            self.ctx
                .fill_text(&spoke.label, spoke.label_anchor.x, spoke.label_anchor.y)?;
        }

        self.ctx.set_font("10px sans-serif");
        self.ctx.set_text_align("center");
        for tick in &layout.ticks {
            let at = layout.tick_anchor(*tick);
            if scale.tick_backdrop != Rgba::TRANSPARENT {
                self.ctx.set_fill_style_str(&scale.tick_backdrop.to_css());
                self.ctx.fill_rect(at.x - 12.0, at.y - 7.0, 24.0, 14.0);
            }
            self.ctx.set_fill_style_str(&scale.tick_color.to_css());
            self.ctx.fill_text(&format_tick(*tick), at.x, at.y)?;
        }
        Ok(())
    }

    fn draw_series(&self, series: &ChartSeries, layout: &RadarLayout, progress: f64) {
        for s in &series.series {
            self.trace(&layout.polygon(&s.data, progress));
            self.ctx.set_fill_style_str(&s.style.background.to_css());
            self.ctx.fill();
            self.ctx.set_stroke_style_str(&s.style.border.to_css());
            self.ctx.set_line_width(s.style.border_width);
            self.ctx.stroke();
        }
    }

    fn trace(&self, points: &[Vec2]) {
        self.ctx.begin_path();
        let mut iter = points.iter();
        if let Some(first) = iter.next() {
            self.ctx.move_to(first.x, first.y);
            for p in iter {
                self.ctx.line_to(p.x, p.y);
            }
            self.ctx.close_path();
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
