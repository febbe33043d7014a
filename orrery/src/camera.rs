use std::f64::consts::PI;

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Rad, SquareMatrix, Vector3, Vector4};
use winit::dpi::PhysicalSize;

use crate::{
    constants::{ORBIT_MAX_DISTANCE, ORBIT_MIN_DISTANCE, ORBIT_PITCH_MARGIN},
    parameters::EngineConfig,
    picking::Ray,
};

/// A perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub aspect: f64,
    pub fovy: Deg<f64>,
    pub znear: f64,
    pub zfar: f64,
    size: PhysicalSize<u32>,
}

impl Camera {
    pub fn new(size: PhysicalSize<u32>, config: &EngineConfig) -> Self {
        let mut camera = Self {
            eye: config.initial_eye,
            target: config.initial_target,
            up: Vector3::unit_y(),
            aspect: 1.0,
            fovy: Deg(config.fovy_deg),
            znear: config.znear,
            zfar: config.zfar,
            size: PhysicalSize::new(1, 1),
        };
        camera.resize(size);
        camera
    }

    /// Pixel size of the render target.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        // A minimized window reports zero; keep the last usable size.
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.size = size;
        self.aspect = size.width as f64 / size.height as f64;
    }

    pub fn set_pose(&mut self, eye: Point3<f64>, target: Point3<f64>) {
        self.eye = eye;
        self.target = target;
    }

    /// A copy of this camera placed at another pose.
    pub fn with_pose(&self, eye: Point3<f64>, target: Point3<f64>) -> Self {
        let mut camera = self.clone();
        camera.set_pose(eye, target);
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        cgmath::perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to normalized device coordinates.
    pub fn project(&self, point: Point3<f64>) -> Point3<f64> {
        let clip = self.build_view_projection_matrix() * point.to_homogeneous();
        Point3::from_homogeneous(clip)
    }

    /// Normalized device coordinates to pixels, origin at the top left.
    pub fn ndc_to_screen(&self, ndc: Point3<f64>) -> (f64, f64) {
        (
            (ndc.x + 1.0) * 0.5 * self.size.width as f64,
            (-ndc.y + 1.0) * 0.5 * self.size.height as f64,
        )
    }

    pub fn world_to_screen(&self, point: Point3<f64>) -> (f64, f64) {
        self.ndc_to_screen(self.project(point))
    }

    /// Whether a world point lies in front of the camera.
    pub fn in_front(&self, point: Point3<f64>) -> bool {
        (point - self.eye).dot(self.target - self.eye) > 0.0
    }

    /// Ray from the eye through a point given in normalized device coordinates.
    pub fn ray_through(&self, ndc_x: f64, ndc_y: f64) -> Option<Ray> {
        let inverse = self.build_view_projection_matrix().invert()?;
        let far = inverse * Vector4::new(ndc_x, ndc_y, 0.5, 1.0);
        if far.w == 0.0 {
            return None;
        }
        let point = Point3::from_homogeneous(far);
        Ray::new(self.eye, point - self.eye)
    }

    /// Rotate the eye around the target. `yaw` turns about world up, `pitch` tilts toward it.
    pub fn orbit(&mut self, yaw: f64, pitch: f64) {
        let offset = self.eye - self.target;
        let radius = offset.magnitude();
        if radius == 0.0 {
            return;
        }
        let theta = offset.x.atan2(offset.z) + yaw;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() - pitch)
            .clamp(ORBIT_PITCH_MARGIN, PI - ORBIT_PITCH_MARGIN);
        self.eye = self.target
            + Vector3::new(
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
                radius * phi.sin() * theta.cos(),
            );
    }

    /// Scale the distance to the target by `factor`, within the dolly limits.
    pub fn dolly(&mut self, factor: f64) {
        let offset = self.eye - self.target;
        let radius = offset.magnitude();
        if radius == 0.0 || !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_radius = (radius * factor).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
        self.eye = self.target + offset * (new_radius / radius);
    }

    /// Screen pixels covered by one world unit at `at`, zero behind the camera.
    pub fn pixels_per_unit(&self, at: Point3<f64>) -> f64 {
        let forward = (self.target - self.eye).normalize();
        let depth = (at - self.eye).dot(forward);
        if depth <= 0.0 {
            return 0.0;
        }
        let focal = self.size.height as f64 * 0.5 / (Rad::from(self.fovy).0 * 0.5).tan();
        focal / depth
    }

    /// Yaw that turns a billboard at `at` toward the camera, about world up.
    pub fn facing_yaw(&self, at: Point3<f64>) -> f64 {
        (self.eye.x - at.x).atan2(self.eye.z - at.z)
    }

    pub fn readout(&self) -> String {
        format!(
            "Camera Position:\n  X: {:.2}\n  Y: {:.2}\n  Z: {:.2}",
            self.eye.x, self.eye.y, self.eye.z
        )
    }

    pub fn distance_to_target(&self) -> f64 {
        (self.eye - self.target).magnitude()
    }
}
