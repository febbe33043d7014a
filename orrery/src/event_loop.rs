use std::time::Instant;

use eframe::egui::{self, Response, Vec2};
use winit::dpi::PhysicalSize;

use crate::{coordinator::Engine, session::ViewHost};

const DRAG_RADIANS_PER_POINT: f64 = 0.005;
const SCROLL_ZOOM_RATE: f64 = 0.002;

/// Pointer and resize input, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    Drag { dx: f64, dy: f64 },
    Scroll { dy: f64 },
    Resized(PhysicalSize<u32>),
}

/// Translate this frame's egui input over the simulation view into engine events.
/// Resizes come first so the camera is up to date before any pick.
pub fn collect_input(
    ui: &egui::Ui,
    response: &Response,
    last_size: &mut PhysicalSize<u32>,
) -> Vec<InputEvent> {
    let mut events = Vec::new();

    let rect = response.rect;
    let size = PhysicalSize::new(rect.width().round() as u32, rect.height().round() as u32);
    if size != *last_size {
        *last_size = size;
        events.push(InputEvent::Resized(size));
    }

    if let Some(pos) = response.hover_pos() {
        events.push(InputEvent::PointerMoved {
            x: pos.x as f64,
            y: pos.y as f64,
        });
    }
    if response.clicked()
        && let Some(pos) = response.interact_pointer_pos()
    {
        events.push(InputEvent::Click {
            x: pos.x as f64,
            y: pos.y as f64,
        });
    }
    if response.dragged() {
        let delta = response.drag_delta();
        if delta != Vec2::ZERO {
            events.push(InputEvent::Drag {
                dx: delta.x as f64,
                dy: delta.y as f64,
            });
        }
    }
    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll != 0.0 {
            events.push(InputEvent::Scroll { dy: scroll as f64 });
        }
    }
    events
}

pub fn dispatch(engine: &mut Engine, event: InputEvent, now: Instant) {
    match event {
        InputEvent::PointerMoved { x, y } => {
            engine.on_pointer_move((x, y));
        }
        InputEvent::Click { x, y } => {
            let outcome = engine.on_click((x, y), now);
            log::debug!("click at ({x:.0}, {y:.0}): {outcome:?}");
        }
        InputEvent::Drag { dx, dy } => {
            engine.on_drag(-dx * DRAG_RADIANS_PER_POINT, dy * DRAG_RADIANS_PER_POINT)
        }
        // Scrolling up moves the camera in.
        InputEvent::Scroll { dy } => engine.on_scroll((-dy * SCROLL_ZOOM_RATE).exp()),
        InputEvent::Resized(size) => engine.on_resize(size),
    }
}

/// `ViewHost` backed by an egui context. Frames are egui repaints; listeners
/// are the input forwarding done in the app's update.
pub struct EguiHost {
    ctx: egui::Context,
    listening: bool,
    frame_pending: bool,
}

impl EguiHost {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            listening: false,
            frame_pending: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Consume the pending frame request, if any.
    pub fn take_frame(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }
}

impl ViewHost for EguiHost {
    fn load_assets(&mut self) -> impl Future<Output = anyhow::Result<()>> {
        let ctx = self.ctx.clone();
        async move {
            ctx.set_fonts(egui::FontDefinitions::default());
            Ok::<_, anyhow::Error>(())
        }
    }

    fn viewport(&self) -> PhysicalSize<u32> {
        let rect = self.ctx.screen_rect();
        PhysicalSize::new(rect.width().round() as u32, rect.height().round() as u32)
    }

    fn attach_listeners(&mut self) {
        log::debug!("forwarding pointer input");
        self.listening = true;
    }

    fn detach_listeners(&mut self) {
        log::debug!("no longer forwarding pointer input");
        self.listening = false;
    }

    fn schedule_frame(&mut self) {
        self.frame_pending = true;
        self.ctx.request_repaint();
    }

    fn cancel_frame(&mut self) {
        self.frame_pending = false;
    }

    fn release(&mut self) {
        self.listening = false;
        self.frame_pending = false;
        self.ctx.forget_all_images();
    }
}
