use cgmath::{InnerSpace, Point3, Vector3, Zero};

use crate::{
    constants::{G, PARALLEL_CUTOFF, SOFTENING},
    parameters::BodyParams,
};

mod direct;

/// Physical state of one body. Motion is confined to the X/Z plane.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    pub pos: Point3<f64>,
    pub vel: Vector3<f64>,
    pub mass: f64,
}

impl From<&BodyParams> for ObjectInfo {
    fn from(value: &BodyParams) -> Self {
        Self {
            pos: Point3::new(value.pos.x, 0.0, value.pos.z),
            vel: value.vel,
            mass: value.mass,
        }
    }
}

/// Softened inverse-square attraction, measured over the X/Z projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityLaw {
    pub g: f64,
    pub softening: f64,
}

impl Default for GravityLaw {
    fn default() -> Self {
        Self {
            g: G,
            softening: SOFTENING,
        }
    }
}

impl ObjectInfo {
    /// Add the force `other` exerts on `self` to `out`.
    #[inline]
    pub fn get_force_towards(&self, other: &ObjectInfo, law: &GravityLaw, out: &mut Vector3<f64>) {
        let rel = Vector3::new(other.pos.x - self.pos.x, 0.0, other.pos.z - self.pos.z);
        let planar = rel.magnitude();
        // Coincident bodies pull in no direction.
        if planar == 0.0 {
            return;
        }
        let distance = planar + law.softening;
        let magnitude = law.g * self.mass * other.mass / (distance * distance);
        *out += rel / planar * magnitude;
    }
}

pub trait SimulationImpl {
    fn iter(&mut self, objects: &[ObjectInfo], out_buffer: &mut [Vector3<f64>]);

    fn iter_single_threaded(&mut self, objects: &[ObjectInfo], out_buffer: &mut [Vector3<f64>]);
}

/// Direct pairwise summation.
#[derive(Debug, Clone, Default)]
pub struct PlanarDirectSim {
    pub law: GravityLaw,
}

impl PlanarDirectSim {
    pub fn new(law: GravityLaw) -> Self {
        Self { law }
    }
}

impl SimulationImpl for PlanarDirectSim {
    fn iter(&mut self, objects: &[ObjectInfo], out_buffer: &mut [Vector3<f64>]) {
        direct::iter(objects, out_buffer, &self.law);
    }

    fn iter_single_threaded(&mut self, objects: &[ObjectInfo], out_buffer: &mut [Vector3<f64>]) {
        direct::iter_single_threaded(objects, out_buffer, &self.law);
    }
}

/// The bodies, a step counter and the pause flag.
pub struct Simulation<R = PlanarDirectSim> {
    pub objects: Vec<ObjectInfo>,
    out_buffer: Vec<Vector3<f64>>,
    simulation: R,
    delta: f64,
    ticks: u64,
    paused: bool,
}

impl Simulation<PlanarDirectSim> {
    pub fn planar(objects: Vec<ObjectInfo>, law: GravityLaw, delta: f64) -> Self {
        Self::new(objects, PlanarDirectSim::new(law), delta)
    }
}

impl<R: SimulationImpl> Simulation<R> {
    pub fn new(objects: Vec<ObjectInfo>, simulation: R, delta: f64) -> Self {
        let out_buffer = vec![Vector3::<f64>::zero(); objects.len()];
        Self {
            objects,
            out_buffer,
            simulation,
            delta,
            ticks: 0,
            paused: false,
        }
    }

    /// Advance by one fixed step, regardless of the pause flag.
    pub fn exec_iter(&mut self) {
        if self.objects.len() >= PARALLEL_CUTOFF {
            self.simulation.iter(&self.objects, &mut self.out_buffer);
        } else {
            self.simulation
                .iter_single_threaded(&self.objects, &mut self.out_buffer);
        }
        direct::integrate(&mut self.objects, &mut self.out_buffer, self.delta);
        self.ticks += 1;
    }

    /// Advance by one step unless paused. Returns whether a step was taken.
    pub fn step(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.exec_iter();
        true
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Simulated time since the start.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.delta
    }
}
