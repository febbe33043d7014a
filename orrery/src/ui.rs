use std::{cell::RefCell, rc::Rc, time::Instant};

use cgmath::{InnerSpace, Point3};
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke};
use futures::executor::block_on;
use winit::dpi::PhysicalSize;

use crate::{
    camera::Camera,
    constants::{HALO_SCALE, LABEL_GLYPH, SPHERE_OPACITY},
    coordinator::Selection,
    event_loop::{self, EguiHost},
    objects::BodyId,
    parameters::{BodyParams, EngineConfig},
    render::{BodyFrame, RenderSink},
    session::Session,
};

mod info;

const INFO_PANEL_WIDTH: f32 = 240.0;
// Painter halos are flat discs.
const HALO_FILL: f32 = 0.3;
const MIN_LABEL_SIZE: f32 = 10.0;
const SELECTION_WINDOW_OFFSET: f32 = 24.0;

/// `0xRRGGBB` plus an opacity in `[0, 1]`.
pub fn color32(rgb: u32, opacity: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        ((rgb >> 16) & 0xff) as u8,
        ((rgb >> 8) & 0xff) as u8,
        (rgb & 0xff) as u8,
        (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

struct Placed {
    name: String,
    color: u32,
    radius: f64,
    position: Point3<f64>,
    label_position: Point3<f64>,
    opacity: f32,
    halo_opacity: f32,
    hovered: bool,
}

/// Draws bodies as discs with halos and screen-space labels.
pub struct PainterSink {
    painter: egui::Painter,
    placed: Vec<Placed>,
}

impl PainterSink {
    pub fn new(painter: egui::Painter) -> Self {
        Self {
            painter,
            placed: Vec::new(),
        }
    }

    fn to_pos(&self, screen: (f64, f64)) -> Pos2 {
        self.painter.clip_rect().min + egui::vec2(screen.0 as f32, screen.1 as f32)
    }
}

impl RenderSink for PainterSink {
    fn place_body(&mut self, body: &BodyFrame<'_>) {
        if !body.visible {
            return;
        }
        self.placed.push(Placed {
            name: body.name.to_owned(),
            color: body.color,
            radius: body.radius,
            position: body.position,
            label_position: body.label_position,
            opacity: body.opacity,
            halo_opacity: body.halo_opacity,
            hovered: body.hovered,
        });
    }

    fn draw_frame(&mut self, camera: &Camera) {
        let mut placed = std::mem::take(&mut self.placed);
        placed.sort_by(|a, b| {
            let da = (a.position - camera.eye).magnitude2();
            let db = (b.position - camera.eye).magnitude2();
            db.total_cmp(&da)
        });

        for body in placed {
            if !camera.in_front(body.position) {
                continue;
            }
            let center = self.to_pos(camera.world_to_screen(body.position));
            let scale = camera.pixels_per_unit(body.position);
            let radius = (body.radius * scale) as f32;
            // Dimmed bodies fade their halo and label along with the sphere.
            let fade = body.opacity / SPHERE_OPACITY;

            self.painter.circle_filled(
                center,
                radius * HALO_SCALE as f32,
                color32(body.color, body.halo_opacity * fade * HALO_FILL),
            );
            if body.hovered {
                self.painter.circle_stroke(
                    center,
                    radius * HALO_SCALE as f32,
                    Stroke::new(1.0, color32(body.color, body.halo_opacity * fade)),
                );
            }
            self.painter
                .circle_filled(center, radius, color32(body.color, body.opacity));

            if camera.in_front(body.label_position) {
                let size = (body.radius * LABEL_GLYPH * camera.pixels_per_unit(body.label_position))
                    as f32;
                self.painter.text(
                    self.to_pos(camera.world_to_screen(body.label_position)),
                    Align2::CENTER_CENTER,
                    &body.name,
                    FontId::proportional(size.max(MIN_LABEL_SIZE)),
                    color32(0xffffff, fade),
                );
            }
        }
    }

    // Painter text is already laid out facing the viewer.
    fn face_label(&mut self, _id: BodyId, _yaw: f64) {}
}

pub struct OrreryApp {
    session: Session<EguiHost>,
    selection: Rc<RefCell<Option<Selection>>>,
    info_panel: info::InfoPanel,
    last_size: PhysicalSize<u32>,
    view_origin: Pos2,
    tick: u32,
}

impl OrreryApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        bodies: &[BodyParams],
        config: EngineConfig,
    ) -> anyhow::Result<Self> {
        let selection: Rc<RefCell<Option<Selection>>> = Rc::default();
        let published = selection.clone();
        let sink = Box::new(move |s: Option<&Selection>| *published.borrow_mut() = s.cloned());

        let host = EguiHost::new(cc.egui_ctx.clone());
        let session = block_on(Session::start(Some(host), bodies, config, sink))?;

        Ok(Self {
            session,
            selection,
            info_panel: info::InfoPanel::new(),
            last_size: PhysicalSize::new(0, 0),
            view_origin: Pos2::ZERO,
            tick: 0,
        })
    }

    fn show_selection(&self, ctx: &egui::Context) {
        let selection = self.selection.borrow();
        let Some(selection) = selection.as_ref() else {
            return;
        };
        let pos = self.view_origin
            + egui::vec2(
                selection.screen_x as f32 + SELECTION_WINDOW_OFFSET,
                selection.screen_y as f32 - SELECTION_WINDOW_OFFSET,
            );

        egui::Window::new(selection.name.as_str())
            .id(egui::Id::new("selection"))
            .fixed_pos(pos)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| match &selection.project {
                Some(project) => {
                    ui.heading(project.name.as_str());
                    ui.label(project.description.as_str());
                    if let Some(github) = &project.github {
                        ui.hyperlink_to("Source", github);
                    }
                    if let Some(link) = &project.link {
                        ui.hyperlink_to("Open", link);
                    }
                }
                None => {
                    ui.label("Nothing more to see here.");
                }
            });
    }
}

impl eframe::App for OrreryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);
        let now = Instant::now();

        egui::SidePanel::right("info")
            .exact_width(INFO_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.label("Orrery");
                if let Some(engine) = self.session.engine() {
                    self.info_panel.render(ui, engine, self.tick);
                }
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE.fill(Color32::BLACK))
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
                self.view_origin = response.rect.min;

                let events = event_loop::collect_input(ui, &response, &mut self.last_size);
                let listening = self.session.host().is_some_and(EguiHost::is_listening);
                if let Some(engine) = self.session.engine_mut() {
                    engine.set_placement(
                        (response.rect.min.x as f64, response.rect.min.y as f64),
                        (0.0, 0.0),
                    );
                    if listening {
                        for event in events {
                            event_loop::dispatch(engine, event, now);
                        }
                    }
                }

                if self.session.host_mut().is_some_and(EguiHost::take_frame) {
                    let mut sink = PainterSink::new(painter);
                    self.session.frame(now, &mut sink);
                }
            });

        self.show_selection(ctx);
    }
}

fn create_app(
    cc: &eframe::CreationContext<'_>,
    bodies: &[BodyParams],
    config: EngineConfig,
) -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
    match OrreryApp::new(cc, bodies, config) {
        Ok(app) => Ok(Box::new(app)),
        Err(err) => {
            log::error!("failed to start the simulation: {err:#}");
            Err(err.into())
        }
    }
}

/// Open a window and run the simulation until it is closed.
pub fn run_app(bodies: Vec<BodyParams>, config: EngineConfig) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Orrery"),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };
    eframe::run_native(
        "Orrery",
        options,
        Box::new(move |cc: &eframe::CreationContext<'_>| {
            create_app(cc, &bodies, config)
        }),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_unpack_with_opacity() {
        assert_eq!(
            color32(0xffff00, 1.0),
            Color32::from_rgba_unmultiplied(255, 255, 0, 255)
        );
        assert_eq!(color32(0x102030, 2.0).a(), 255);
        assert_eq!(color32(0x102030, -1.0).a(), 0);
    }
}
