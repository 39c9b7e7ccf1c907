use crate::constants::HINT_REFRESH_SECS;
use crate::labels::LabelPainter;
use crate::overlay;
use cellnet_core::{session_rng, KeyAction, Session};
use cellnet_gpu::GpuState;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub session: Session,
    pub gpu: Option<GpuState<'static>>,
    pub canvas: web::HtmlCanvasElement,
    pub labels: Option<LabelPainter>,
    pub document: web::Document,
    pub last_instant: Instant,
    pub since_hint: f32,
}

impl FrameContext {
    /// Run one animation frame. Returns `false` once the session has aborted
    /// and the loop should stop.
    pub fn frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;

        let (w, h) = (self.canvas.width(), self.canvas.height());
        self.session.set_viewport(w, h);

        let scene_transform = match self.session.frame(dt) {
            Ok(out) => {
                if let Some(g) = &mut self.gpu {
                    g.resize_if_needed(w, h);
                    match g.render(&out) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            g.reconfigure()
                        }
                        Err(e) => log::error!("render error: {:?}", e),
                    }
                }
                out.scene_transform
            }
            Err(e) => {
                log::error!("[frame] animation stopped: {e}");
                return false;
            }
        };

        if let Some(p) = &mut self.labels {
            p.paint(&self.session, scene_transform);
        }

        self.since_hint += dt.as_secs_f32();
        if self.since_hint >= HINT_REFRESH_SECS {
            self.since_hint = 0.0;
            if !overlay::is_hidden(&self.document) {
                overlay::update_hint(&self.document, &self.session);
            }
        }
        true
    }

    pub fn handle_key(&mut self, action: KeyAction) {
        match action {
            KeyAction::TogglePause => {
                let paused = self.session.toggle_pause();
                log::info!("[keys] paused={paused}");
            }
            KeyAction::ToggleLabels => {
                let on = self.session.toggle_labels();
                log::info!("[keys] labels={on}");
            }
            KeyAction::ToggleHint => overlay::toggle(&self.document),
            KeyAction::Reseed => {
                let tier = self.session.tier();
                let mut rng = session_rng(None);
                match self.session.regenerate(tier, &mut rng) {
                    Ok(()) => {
                        if let Some(g) = &mut self.gpu {
                            g.upload_scene(&self.session);
                        }
                    }
                    Err(e) => log::error!("[keys] regenerate failed: {e}"),
                }
            }
            KeyAction::Quit => overlay::hide(&self.document),
        }
        overlay::update_hint(&self.document, &self.session);
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    session: &Session,
) -> Option<GpuState<'static>> {
    let instance = wgpu::Instance::default();
    let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
        Ok(s) => s,
        Err(e) => {
            log::error!("WebGPU surface error: {:?}", e);
            return None;
        }
    };
    match GpuState::new(&instance, surface, canvas.width(), canvas.height(), session).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// requestAnimationFrame loop. Stops rescheduling once a frame reports that
/// the session aborted.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let keep_going = frame_ctx.borrow_mut().frame();
        if !keep_going {
            return;
        }
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
