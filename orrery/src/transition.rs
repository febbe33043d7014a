use std::time::{Duration, Instant};

use cgmath::{InnerSpace, Point3, Vector3};

use crate::{camera::Camera, objects::BodyId, parameters::EngineConfig};

/// Camera position and look-target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
}

impl Pose {
    pub fn of(camera: &Camera) -> Self {
        Self {
            eye: camera.eye,
            target: camera.target,
        }
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.set_pose(self.eye, self.target);
    }
}

/// Symmetric quadratic ease-in-out on `[0, 1]`.
pub fn ease_in_out(p: f64) -> f64 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        -1.0 + (4.0 - 2.0 * p) * p
    }
}

pub fn lerp(start: Point3<f64>, end: Point3<f64>, alpha: f64) -> Point3<f64> {
    start + (end - start) * alpha
}

/// A timed interpolation between two poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub start: Pose,
    pub end: Pose,
    pub started: Instant,
    pub duration: Duration,
}

impl Transition {
    /// Linear progress, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn pose_at(&self, now: Instant) -> Pose {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.end;
        }
        let alpha = ease_in_out(progress);
        Pose {
            eye: lerp(self.start.eye, self.end.eye, alpha),
            target: lerp(self.start.target, self.end.target, alpha),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// Toward a selected body.
    Zoom,
    /// Back to the pose from before the zoom.
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Free orbit, physics running.
    Idle,
    Transitioning {
        transition: Transition,
        heading: Heading,
        subject: Option<BodyId>,
    },
    /// Zoomed in on `subject`, physics stopped.
    Paused { subject: BodyId },
}

/// What a finished transition settled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    Zoomed(BodyId),
    Reset,
}

pub struct TransitionMachine {
    state: ViewState,
    duration: Duration,
    zoom_offset: Vector3<f64>,
    zoom_scale: f64,
    // Pose to return to on reset.
    home: Option<Pose>,
}

impl TransitionMachine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            state: ViewState::Idle,
            duration: config.transition_duration,
            zoom_offset: config.zoom_offset,
            zoom_scale: config.zoom_scale,
            home: None,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, ViewState::Transitioning { .. })
    }

    /// Physics is stopped from the start of a zoom until a reset settles.
    pub fn is_paused(&self) -> bool {
        !matches!(self.state, ViewState::Idle)
    }

    pub fn transition(&self) -> Option<&Transition> {
        match &self.state {
            ViewState::Transitioning { transition, .. } => Some(transition),
            _ => None,
        }
    }

    /// End pose for a zoom onto a body at `body`.
    ///
    /// The look-target sits at a fixed offset from the body; the eye sits at the
    /// same distance from the body, perpendicular to the offset and world up.
    pub fn zoom_pose(&self, body: Point3<f64>) -> Pose {
        let offset = self.zoom_offset * self.zoom_scale;
        let perpendicular = offset.normalize().cross(Vector3::unit_y()).normalize();
        Pose {
            eye: body + perpendicular * offset.magnitude(),
            target: body + offset,
        }
    }

    /// Pose the camera is at, or would be at if a running transition were applied at `now`.
    pub fn current_pose(&self, camera: &Camera, now: Instant) -> Pose {
        match self.transition() {
            Some(transition) => transition.pose_at(now),
            None => Pose::of(camera),
        }
    }

    fn start(
        &mut self,
        end: Pose,
        heading: Heading,
        subject: Option<BodyId>,
        camera: &Camera,
        now: Instant,
    ) {
        let start = self.current_pose(camera, now);
        log::debug!("{heading:?} transition from {start:?} to {end:?}");
        self.state = ViewState::Transitioning {
            transition: Transition {
                start,
                end,
                started: now,
                duration: self.duration,
            },
            heading,
            subject,
        };
    }

    /// Start zooming onto `subject`. Only possible from `Idle`; returns the end pose.
    pub fn begin_zoom(
        &mut self,
        subject: BodyId,
        body: Point3<f64>,
        camera: &Camera,
        now: Instant,
    ) -> Option<Pose> {
        if self.state != ViewState::Idle {
            return None;
        }
        let end = self.zoom_pose(body);
        self.home = Some(self.current_pose(camera, now));
        self.start(end, Heading::Zoom, Some(subject), camera, now);
        Some(end)
    }

    /// Start returning to the pre-zoom pose. Only possible from `Paused`.
    pub fn begin_reset(&mut self, camera: &Camera, now: Instant) -> bool {
        let ViewState::Paused { subject } = self.state else {
            return false;
        };
        let Some(home) = self.home.take() else {
            return false;
        };
        self.start(home, Heading::Reset, Some(subject), camera, now);
        true
    }

    /// Move the camera along the running transition. Reports the state it settles into.
    pub fn advance(&mut self, camera: &mut Camera, now: Instant) -> Option<Arrival> {
        let ViewState::Transitioning {
            transition,
            heading,
            subject,
        } = &self.state
        else {
            return None;
        };
        transition.pose_at(now).apply(camera);
        if transition.progress(now) < 1.0 {
            return None;
        }

        let (next, arrival) = match (heading, subject) {
            (Heading::Zoom, Some(subject)) => (
                ViewState::Paused { subject: *subject },
                Arrival::Zoomed(*subject),
            ),
            _ => (ViewState::Idle, Arrival::Reset),
        };
        log::debug!("transition settled: {arrival:?}");
        self.state = next;
        Some(arrival)
    }
}
