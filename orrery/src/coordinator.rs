use std::time::Instant;

use anyhow::Context;
use cgmath::Point3;
use winit::dpi::PhysicalSize;

use crate::{
    camera::Camera,
    constants::{HALO_HOVER_BOOST, HALO_OPACITY},
    objects::{BodyId, Objects},
    parameters::{BodyParams, EngineConfig, Project, validate},
    picking::{self, Viewport},
    render::{BodyFrame, RenderSink},
    sim::{GravityLaw, ObjectInfo, Simulation},
    transition::{Arrival, TransitionMachine, ViewState},
};

/// Snapshot published when a body is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub body: BodyId,
    pub name: String,
    /// Pixel coordinates of the body as seen from the zoomed-in camera.
    pub screen_x: f64,
    pub screen_y: f64,
    pub project: Option<Project>,
}

/// Receives every selection change. `None` means nothing is selected.
pub trait SelectionSink {
    fn publish(&mut self, selection: Option<&Selection>);
}

impl<F: FnMut(Option<&Selection>)> SelectionSink for F {
    fn publish(&mut self, selection: Option<&Selection>) {
        self(selection)
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// A transition is running; the click was dropped.
    Ignored,
    /// Nothing to do: a miss while idle, or a hit while zoomed in.
    Nothing,
    Selected(BodyId),
    Reset,
}

/// Owns the simulation, the camera and the selection, and routes input between them.
pub struct Engine {
    sim: Simulation,
    objects: Objects,
    camera: Camera,
    viewport: Viewport,
    machine: TransitionMachine,
    selection: Option<Selection>,
    sink: Box<dyn SelectionSink>,
    config: EngineConfig,
    readout: String,
}

impl Engine {
    pub fn new(
        bodies: &[BodyParams],
        config: EngineConfig,
        size: PhysicalSize<u32>,
        sink: Box<dyn SelectionSink>,
    ) -> anyhow::Result<Self> {
        validate(bodies).context("invalid initial conditions")?;
        let law = GravityLaw {
            g: config.g,
            softening: config.softening,
        };
        let sim = Simulation::planar(bodies.iter().map(ObjectInfo::from).collect(), law, config.delta);
        let camera = Camera::new(size, &config);
        let readout = camera.readout();
        Ok(Self {
            sim,
            objects: Objects::new(bodies),
            camera,
            viewport: Viewport::new(size),
            machine: TransitionMachine::new(&config),
            selection: None,
            sink,
            config,
            readout,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn objects(&self) -> &Objects {
        &self.objects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn state(&self) -> &ViewState {
        self.machine.state()
    }

    pub fn is_transitioning(&self) -> bool {
        self.machine.is_transitioning()
    }

    pub fn is_paused(&self) -> bool {
        self.sim.is_paused()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn hovered_name(&self) -> Option<&str> {
        let id = self.objects.hovered()?;
        self.objects.get(id).map(|b| b.name.as_str())
    }

    /// Camera position as refreshed by the last tick.
    pub fn camera_readout(&self) -> &str {
        &self.readout
    }

    pub fn position_of(&self, id: BodyId) -> Option<Point3<f64>> {
        self.sim.objects.get(id.0).map(|o| o.pos)
    }

    /// Where the view sits on the page, for pointer conversion.
    pub fn set_placement(&mut self, origin: (f64, f64), scroll: (f64, f64)) {
        self.viewport.origin = origin;
        self.viewport.scroll = scroll;
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.camera.resize(size);
        if size.width != 0 && size.height != 0 {
            self.viewport.size = size;
        }
    }

    /// Hover pass. Returns the highlighted body.
    pub fn on_pointer_move(&mut self, client: (f64, f64)) -> Option<BodyId> {
        let hovered = picking::hover(
            &self.camera,
            &self.viewport,
            client,
            &mut self.objects,
            &self.sim.objects,
        );
        log::trace!("hover {hovered:?}");
        hovered
    }

    pub fn on_click(&mut self, client: (f64, f64), now: Instant) -> ClickOutcome {
        if self.machine.is_transitioning() {
            return ClickOutcome::Ignored;
        }
        let hit = picking::pick(
            &self.camera,
            &self.viewport,
            client,
            &self.objects,
            &self.sim.objects,
        );
        let zoomed = matches!(self.machine.state(), ViewState::Paused { .. });
        match hit {
            Some(hit) if !zoomed => self.zoom_to(hit.body, now),
            None if zoomed => self.reset(now),
            _ => ClickOutcome::Nothing,
        }
    }

    fn zoom_to(&mut self, id: BodyId, now: Instant) -> ClickOutcome {
        let Some(pos) = self.position_of(id) else {
            return ClickOutcome::Nothing;
        };
        let Some(end) = self.machine.begin_zoom(id, pos, &self.camera, now) else {
            return ClickOutcome::Nothing;
        };
        self.sim.set_paused(true);
        self.objects.isolate(id, self.config.obscure);

        // Project from where the camera will end up, so the overlay can open right away.
        let (screen_x, screen_y) = self.camera.with_pose(end.eye, end.target).world_to_screen(pos);
        let Some(body) = self.objects.get(id) else {
            return ClickOutcome::Nothing;
        };
        let selection = Selection {
            body: id,
            name: body.name.clone(),
            screen_x,
            screen_y,
            project: body.project.clone(),
        };
        log::info!(
            "selected {} at ({screen_x:.1}, {screen_y:.1})",
            selection.name
        );
        self.sink.publish(Some(&selection));
        self.selection = Some(selection);
        ClickOutcome::Selected(id)
    }

    fn reset(&mut self, now: Instant) -> ClickOutcome {
        if !self.machine.begin_reset(&self.camera, now) {
            return ClickOutcome::Nothing;
        }
        self.objects.restore();
        self.selection = None;
        log::info!("selection cleared");
        self.sink.publish(None);
        ClickOutcome::Reset
    }

    /// Free-orbit drag, in radians. Ignored while transitioning.
    pub fn on_drag(&mut self, yaw: f64, pitch: f64) {
        if !self.machine.is_transitioning() {
            self.camera.orbit(yaw, pitch);
        }
    }

    /// Dolly by `factor`. Ignored while transitioning.
    pub fn on_scroll(&mut self, factor: f64) {
        if !self.machine.is_transitioning() {
            self.camera.dolly(factor);
        }
    }

    /// One animation frame: camera transition, then physics, then rendering.
    pub fn tick(&mut self, now: Instant, renderer: &mut dyn RenderSink) {
        let transitioning = self.machine.is_transitioning();
        if transitioning && self.machine.advance(&mut self.camera, now) == Some(Arrival::Reset) {
            self.sim.set_paused(false);
        }
        if !transitioning {
            self.sim.step();
        }
        self.readout = self.camera.readout();

        for id in self.objects.ids() {
            let (Some(body), Some(info)) = (self.objects.get(id), self.sim.objects.get(id.0)) else {
                continue;
            };
            let halo_opacity = if body.hovered {
                HALO_OPACITY * HALO_HOVER_BOOST
            } else {
                HALO_OPACITY
            };
            renderer.place_body(&BodyFrame {
                id,
                name: &body.name,
                color: body.color,
                radius: body.radius,
                position: Point3::new(info.pos.x, 0.0, info.pos.z),
                label_position: info.pos + body.label_offset(),
                visible: body.visible,
                opacity: body.opacity,
                halo_opacity,
                hovered: body.hovered,
            });
        }

        renderer.draw_frame(&self.camera);

        for id in self.objects.ids() {
            let (Some(body), Some(info)) = (self.objects.get(id), self.sim.objects.get(id.0)) else {
                continue;
            };
            renderer.face_label(id, self.camera.facing_yaw(info.pos + body.label_offset()));
        }
    }
}
