//! Browser glue: DOM overlays, canvas sizing and pointer coordinates

use glam::DVec2;
use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

use super::client_to_canvas;

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Set the text of the element with the given id, if it exists
pub fn set_text(id: &str, text: &str) {
    if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
        el.set_text_content(Some(text));
    }
}

/// Toggle the `hidden` class on the element with the given id
pub fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
        let classes = el.class_list();
        let result = if hidden {
            classes.add_1("hidden")
        } else {
            classes.remove_1("hidden")
        };
        if result.is_err() {
            log::warn!("Could not toggle visibility of #{id}");
        }
    }
}

/// Canvas size in CSS pixels and the device pixel ratio
#[derive(Debug, Clone, Copy)]
pub struct CanvasSize {
    pub css_width: f64,
    pub css_height: f64,
    pub dpr: f64,
}

impl CanvasSize {
    /// Backing-store size in physical pixels
    pub fn physical(&self) -> (u32, u32) {
        (
            (self.css_width * self.dpr).round().max(1.0) as u32,
            (self.css_height * self.dpr).round().max(1.0) as u32,
        )
    }
}

/// Match the canvas backing store to its container
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> CanvasSize {
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    let (css_width, css_height) = match canvas.parent_element() {
        Some(parent) => (parent.client_width() as f64, parent.client_height() as f64),
        None => (canvas.client_width() as f64, canvas.client_height() as f64),
    };

    let size = CanvasSize {
        css_width,
        css_height,
        dpr,
    };
    let (w, h) = size.physical();
    canvas.set_width(w);
    canvas.set_height(h);
    size
}

/// Mouse position relative to the canvas
pub fn mouse_point(event: &MouseEvent, canvas: &HtmlCanvasElement) -> DVec2 {
    let rect = canvas.get_bounding_client_rect();
    client_to_canvas(
        event.client_x() as f64,
        event.client_y() as f64,
        rect.left(),
        rect.top(),
    )
}

/// First active touch relative to the canvas (None on touchend)
pub fn touch_point(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Option<DVec2> {
    let touch = event.touches().get(0)?;
    let rect = canvas.get_bounding_client_rect();
    Some(client_to_canvas(
        touch.client_x() as f64,
        touch.client_y() as f64,
        rect.left(),
        rect.top(),
    ))
}

/// Contents of `<script id="game-config" type="application/json">`, if present
pub fn embedded_config() -> Option<String> {
    document()?
        .get_element_by_id("game-config")?
        .text_content()
}
