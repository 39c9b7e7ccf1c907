//! Paints projected scene labels onto the 2D overlay canvas.

use crate::constants::LABEL_FONT_FAMILY;
use crate::layout::{label_alpha, label_font_px};
use cellnet_core::{project_label, Session, LABEL_COLOR};
use web_sys as web;

pub struct LabelPainter {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    fill: String,
    cleared: bool,
}

impl LabelPainter {
    pub fn new(canvas: web::HtmlCanvasElement, ctx: web::CanvasRenderingContext2d) -> Self {
        let [r, g, b] = LABEL_COLOR.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        Self {
            canvas,
            ctx,
            fill: format!("rgb({r}, {g}, {b})"),
            cleared: false,
        }
    }

    pub fn canvas(&self) -> &web::HtmlCanvasElement {
        &self.canvas
    }

    fn clear(&self) {
        _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    /// Draw every visible label for the current camera. `scene_transform` is
    /// this frame's choreographed transform.
    pub fn paint(&mut self, session: &Session, scene_transform: glam::Mat4) {
        if !session.config().show_labels {
            if !self.cleared {
                self.clear();
                self.cleared = true;
            }
            return;
        }
        self.cleared = false;
        self.clear();

        let width = self.canvas.width() as f32;
        let height = self.canvas.height() as f32;
        let camera = session.camera();
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.ctx.set_fill_style_str(&self.fill);

        for label in &session.scene().text_labels {
            let Some(s) = project_label(label, scene_transform, camera, width, height) else {
                continue;
            };
            let Some(px) = label_font_px(s.font_px) else {
                continue;
            };
            self.ctx.set_global_alpha(label_alpha(s.opacity));
            self.ctx.set_font(&format!("{px:.0}px {LABEL_FONT_FAMILY}"));
            _ = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, s.x as f64, s.y as f64);
            _ = self.ctx.rotate(s.rotation as f64);
            _ = self.ctx.fill_text(s.text, 0.0, 0.0);
        }
        self.ctx.set_global_alpha(1.0);
    }
}
