#![cfg(target_arch = "wasm32")]
use cellnet_core::{session_rng, Session};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod events;
mod frame;
mod labels;
mod layout;
mod overlay;

use constants::CANVAS_ID;

// Keep both canvases' backing stores in step with their CSS size.
fn wire_canvas_resize(canvases: Vec<web::HtmlCanvasElement>) {
    for c in &canvases {
        dom::sync_canvas_backing_size(c);
    }
    let resize_closure = Closure::wrap(Box::new(move || {
        for c in &canvases {
            dom::sync_canvas_backing_size(c);
        }
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("cellnet-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, CANVAS_ID)?;

    // Avoid grabbing a 2D context on this canvas so WebGPU can acquire it
    let labels = dom::label_canvas(&document).map(|(c, ctx)| labels::LabelPainter::new(c, ctx));
    let mut canvases = vec![canvas.clone()];
    if let Some(p) = &labels {
        canvases.push(p.canvas().clone());
    } else {
        log::warn!("[init] no 2D label canvas; labels disabled");
    }
    wire_canvas_resize(canvases);

    let caps = dom::host_capabilities(&window);
    let config = dom::query_config(&window);
    let mut rng = session_rng(config.seed);
    let session = Session::new(caps, config, &mut rng, (canvas.width(), canvas.height()))?;

    let gpu = frame::init_gpu(&canvas, &session).await;
    overlay::update_hint(&document, &session);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        session,
        gpu,
        canvas,
        labels,
        document,
        last_instant: Instant::now(),
        since_hint: 0.0,
    }));
    events::wire_keydown(frame_ctx.clone());
    frame::start_loop(frame_ctx);
    Ok(())
}
