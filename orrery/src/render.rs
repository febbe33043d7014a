use cgmath::Point3;

use crate::{camera::Camera, objects::BodyId};

/// Per-body state handed to the renderer each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame<'a> {
    pub id: BodyId,
    pub name: &'a str,
    /// `0xRRGGBB`
    pub color: u32,
    pub radius: f64,
    pub position: Point3<f64>,
    pub label_position: Point3<f64>,
    pub visible: bool,
    pub opacity: f32,
    pub halo_opacity: f32,
    pub hovered: bool,
}

/// Rendering collaborator. Within one tick the engine places every body,
/// draws the frame, then turns every label toward the camera.
pub trait RenderSink {
    fn place_body(&mut self, body: &BodyFrame<'_>);

    fn draw_frame(&mut self, camera: &Camera);

    /// `yaw` rotates the label about world up so that it faces the camera.
    fn face_label(&mut self, id: BodyId, yaw: f64);
}

impl RenderSink for () {
    fn place_body(&mut self, _body: &BodyFrame<'_>) {}

    fn draw_frame(&mut self, _camera: &Camera) {}

    fn face_label(&mut self, _id: BodyId, _yaw: f64) {}
}
