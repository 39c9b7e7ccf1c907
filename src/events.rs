use crate::frame::FrameContext;
use cellnet_core::{action_for_key, KeyAction};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn wire_keydown(frame_ctx: Rc<RefCell<FrameContext>>) {
    let Some(window) = web::window() else {
        return;
    };
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
            return;
        }
        let Some(action) = action_for_key(&ev.key()) else {
            return;
        };
        if action == KeyAction::TogglePause {
            // keep Space from scrolling the page
            ev.prevent_default();
        }
        match frame_ctx.try_borrow_mut() {
            Ok(mut ctx) => ctx.handle_key(action),
            Err(_) => log::warn!("[keys] frame busy, dropped {:?}", action),
        }
    }) as Box<dyn FnMut(_)>);
    _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
    closure.forget();
}
