mod cli;

use std::time::Instant;
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopWindowTarget};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use cellnet_core::{
    action_for_key, session_rng, HostCapabilities, KeyAction, Session, SessionConfig,
    CONTROLS_HELP,
};
use cellnet_gpu::GpuState;

struct App<'w> {
    window: &'w Window,
    gpu: GpuState<'w>,
    session: Session,
    last_frame: Instant,
}

fn host_capabilities() -> HostCapabilities {
    HostCapabilities {
        hardware_concurrency: std::thread::available_parallelism()
            .ok()
            .map(|n| n.get() as u32),
        is_mobile_like: false,
    }
}

/// Winit's logical key as the string the shared shortcut table expects.
fn key_name(key: &Key) -> Option<&str> {
    match key {
        Key::Character(c) => Some(c.as_str()),
        Key::Named(NamedKey::Space) => Some(" "),
        Key::Named(NamedKey::Escape) => Some("Escape"),
        _ => None,
    }
}

impl<'w> App<'w> {
    fn new(window: &'w Window, config: SessionConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let mut rng = session_rng(config.seed);
        let session = Session::new(
            host_capabilities(),
            config,
            &mut rng,
            (size.width, size.height),
        )?;

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let gpu = pollster::block_on(GpuState::new(
            &instance,
            surface,
            size.width,
            size.height,
            &session,
        ))?;
        Ok(Self {
            window,
            gpu,
            session,
            last_frame: Instant::now(),
        })
    }

    fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.session.set_viewport(size.width, size.height);
        self.gpu.resize_if_needed(size.width, size.height);
    }

    fn handle_key(&mut self, action: KeyAction, elwt: &EventLoopWindowTarget<()>) {
        match action {
            KeyAction::TogglePause => {
                let paused = self.session.toggle_pause();
                log::info!("[native] paused={paused}");
            }
            KeyAction::ToggleLabels => {
                let on = self.session.toggle_labels();
                log::info!("[native] labels={on} (not drawn by the native renderer)");
            }
            KeyAction::ToggleHint => {
                log::info!(
                    "[native] tier={} fps={:.1} | {}",
                    self.session.tier(),
                    self.session.fps(),
                    CONTROLS_HELP
                );
            }
            KeyAction::Reseed => {
                let tier = self.session.tier();
                let mut rng = session_rng(None);
                match self.session.regenerate(tier, &mut rng) {
                    Ok(()) => self.gpu.upload_scene(&self.session),
                    Err(e) => log::error!("[native] regenerate failed: {e}"),
                }
            }
            KeyAction::Quit => elwt.exit(),
        }
    }

    fn frame(&mut self, elwt: &EventLoopWindowTarget<()>) {
        let now = Instant::now();
        let dt = now - self.last_frame;
        self.last_frame = now;

        let out = match self.session.frame(dt) {
            Ok(out) => out,
            Err(e) => {
                log::error!("[native] animation stopped: {e}");
                elwt.exit();
                return;
            }
        };
        match self.gpu.render(&out) {
            Ok(()) => self.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.gpu.reconfigure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[native] out of GPU memory");
                elwt.exit();
            }
            Err(e) => log::warn!("[native] frame skipped: {e:?}"),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = cli::parse().into_config();
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("cellnet")
        .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)?;

    let mut app = App::new(&window, config)?;
    log::info!("[native] {CONTROLS_HELP}");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => app.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if let Some(action) = key_name(&logical_key).and_then(action_for_key) {
                app.handle_key(action, elwt);
            }
        }
        Event::AboutToWait => app.frame(elwt),
        _ => {}
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_map_to_shortcuts() {
        assert_eq!(
            key_name(&Key::Named(NamedKey::Space)).and_then(action_for_key),
            Some(KeyAction::TogglePause)
        );
        assert_eq!(
            key_name(&Key::Named(NamedKey::Escape)).and_then(action_for_key),
            Some(KeyAction::Quit)
        );
        assert_eq!(
            key_name(&Key::Character("r".into())).and_then(action_for_key),
            Some(KeyAction::Reseed)
        );
        assert_eq!(key_name(&Key::Named(NamedKey::Enter)), None);
    }

    #[test]
    fn host_reports_no_mobile() {
        assert!(!host_capabilities().is_mobile_like);
    }
}
