use std::collections::HashSet;
use std::time::Duration;

use anyhow::bail;
use cgmath::{Point3, Vector3};

use crate::constants::{
    DELTA, DIM_OPACITY, FOVY_DEG, G, INITIAL_EYE, INITIAL_TARGET, SOFTENING,
    TRANSITION_DURATION_MS, ZFAR, ZNEAR, ZOOM_OFFSET, ZOOM_SCALE,
};

/// Descriptive content attached to a body. Only the selection sink reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub github: Option<String>,
    pub link: Option<String>,
}

/// Initial conditions for a single body.
#[derive(Debug, Clone)]
pub struct BodyParams {
    pub name: String,
    pub mass: f64,
    pub radius: f64,
    pub pos: Point3<f64>,
    pub vel: Vector3<f64>,
    /// `0xRRGGBB`
    pub color: u32,
    pub project: Option<Project>,
}

impl BodyParams {
    pub fn new(
        name: impl Into<String>,
        mass: f64,
        radius: f64,
        pos: Point3<f64>,
        vel: Vector3<f64>,
        color: u32,
    ) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            pos,
            vel,
            color,
            project: None,
        }
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.project = Some(project);
        self
    }
}

/// Reject initial conditions the integrator and the registry cannot work with.
pub fn validate(bodies: &[BodyParams]) -> anyhow::Result<()> {
    if bodies.is_empty() {
        bail!("no bodies to simulate");
    }
    let mut names = HashSet::new();
    for body in bodies {
        if !(body.mass > 0.0 && body.mass.is_finite()) {
            bail!("body {:?} has non-positive mass {}", body.name, body.mass);
        }
        if !(body.radius > 0.0 && body.radius.is_finite()) {
            bail!("body {:?} has non-positive radius {}", body.name, body.radius);
        }
        let finite = [body.pos.x, body.pos.y, body.pos.z, body.vel.x, body.vel.y, body.vel.z]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            bail!("body {:?} has a non-finite position or velocity", body.name);
        }
        if !names.insert(body.name.as_str()) {
            bail!("body name {:?} is used twice", body.name);
        }
    }
    Ok(())
}

/// How bodies other than the selected one are treated while zoomed in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ObscurePolicy {
    /// Hidden bodies are neither drawn nor hit-testable.
    #[default]
    Hide,
    /// Bodies stay visible and pickable, with their opacity multiplied by the factor.
    Dim(f32),
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub g: f64,
    pub delta: f64,
    pub softening: f64,
    pub transition_duration: Duration,
    pub zoom_offset: Vector3<f64>,
    pub zoom_scale: f64,
    pub obscure: ObscurePolicy,
    pub initial_eye: Point3<f64>,
    pub initial_target: Point3<f64>,
    pub fovy_deg: f64,
    pub znear: f64,
    pub zfar: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            g: G,
            delta: DELTA,
            softening: SOFTENING,
            transition_duration: Duration::from_millis(TRANSITION_DURATION_MS),
            zoom_offset: ZOOM_OFFSET.into(),
            zoom_scale: ZOOM_SCALE,
            obscure: ObscurePolicy::Hide,
            initial_eye: INITIAL_EYE.into(),
            initial_target: INITIAL_TARGET.into(),
            fovy_deg: FOVY_DEG,
            znear: ZNEAR,
            zfar: ZFAR,
        }
    }
}

impl EngineConfig {
    pub fn dimmed() -> Self {
        Self {
            obscure: ObscurePolicy::Dim(DIM_OPACITY),
            ..Self::default()
        }
    }
}
