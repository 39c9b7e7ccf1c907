use crate::constants::LABEL_CANVAS_ID;
use crate::layout;
use cellnet_core::{is_mobile_user_agent, HostCapabilities, SessionConfig};
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{id}"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("#{id} is not a canvas: {e:?}"))
}

/// Match the canvas backing store to its CSS box times the clamped DPR.
/// Returns the new pixel size.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (u32, u32) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let (w, h) = layout::backing_size(rect.width(), rect.height(), dpr);
    if canvas.width() != w {
        canvas.set_width(w);
    }
    if canvas.height() != h {
        canvas.set_height(h);
    }
    (w, h)
}

/// 2D canvas stacked over the WebGPU canvas for label text. Reuses an existing
/// `#label-canvas` or creates one.
pub fn label_canvas(
    document: &web::Document,
) -> Option<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)> {
    let canvas = match canvas_by_id(document, LABEL_CANVAS_ID) {
        Ok(c) => c,
        Err(_) => {
            let el = document.create_element("canvas").ok()?;
            el.set_id(LABEL_CANVAS_ID);
            _ = el.set_attribute(
                "style",
                "position:fixed;inset:0;width:100%;height:100%;pointer-events:none;",
            );
            document.body()?.append_child(&el).ok()?;
            el.dyn_into::<web::HtmlCanvasElement>().ok()?
        }
    };
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<web::CanvasRenderingContext2d>()
        .ok()?;
    Some((canvas, ctx))
}

pub fn host_capabilities(window: &web::Window) -> HostCapabilities {
    let nav = window.navigator();
    let cores = nav.hardware_concurrency();
    let ua = nav.user_agent().unwrap_or_default();
    HostCapabilities {
        hardware_concurrency: (cores.is_finite() && cores >= 1.0).then_some(cores as u32),
        is_mobile_like: is_mobile_user_agent(&ua),
    }
}

pub fn query_config(window: &web::Window) -> SessionConfig {
    let search = window.location().search().unwrap_or_default();
    SessionConfig::from_query(&search)
}
