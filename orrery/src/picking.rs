use cgmath::{InnerSpace, Point3, Vector3};
use winit::dpi::PhysicalSize;

use crate::{
    camera::Camera,
    objects::{BodyId, Bounds, NodeId, NodePart, Objects},
    sim::ObjectInfo,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    /// Unit length.
    pub dir: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, dir: Vector3<f64>) -> Option<Self> {
        let len = dir.magnitude();
        if len == 0.0 || !len.is_finite() {
            return None;
        }
        Some(Self {
            origin,
            dir: dir / len,
        })
    }

    /// Distance along the ray to the first crossing of a sphere surface.
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Point3<f64>, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.magnitude2() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let root = disc.sqrt();
        let near = -b - root;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + root;
        (far >= 0.0).then_some(far)
    }

    /// Distance along the ray to an upright box turned about the y axis so its
    /// local +z faces the ray origin. Same inside rule as `intersect_sphere`.
    pub fn intersect_billboard(
        &self,
        center: Point3<f64>,
        half_extents: Vector3<f64>,
    ) -> Option<f64> {
        let rel = self.origin - center;
        let (sin, cos) = rel.x.atan2(rel.z).sin_cos();
        let to_local =
            |v: Vector3<f64>| Vector3::new(v.x * cos - v.z * sin, v.y, v.x * sin + v.z * cos);
        let origin = to_local(rel);
        let dir = to_local(self.dir);

        let mut near = f64::NEG_INFINITY;
        let mut far = f64::INFINITY;
        for axis in 0..3 {
            let (o, d, h) = (origin[axis], dir[axis], half_extents[axis]);
            if d.abs() < f64::EPSILON {
                if o.abs() > h {
                    return None;
                }
                continue;
            }
            let (t0, t1) = ((-h - o) / d, (h - o) / d);
            near = near.max(t0.min(t1));
            far = far.min(t0.max(t1));
        }
        if near > far || far < 0.0 {
            return None;
        }
        Some(if near >= 0.0 { near } else { far })
    }

    pub fn intersect(&self, bounds: &Bounds) -> Option<f64> {
        match *bounds {
            Bounds::Sphere { center, radius } => self.intersect_sphere(center, radius),
            Bounds::Billboard {
                center,
                half_extents,
            } => self.intersect_billboard(center, half_extents),
        }
    }
}

/// Where the view sits on the page: its offset, the page scroll, and its pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub origin: (f64, f64),
    pub scroll: (f64, f64),
    pub size: PhysicalSize<u32>,
}

impl Viewport {
    pub fn new(size: PhysicalSize<u32>) -> Self {
        Self {
            origin: (0.0, 0.0),
            scroll: (0.0, 0.0),
            size,
        }
    }

    /// Pointer position in client coordinates to normalized device coordinates.
    pub fn to_ndc(&self, client: (f64, f64)) -> Option<(f64, f64)> {
        if self.size.width == 0 || self.size.height == 0 {
            return None;
        }
        let x = client.0 - self.origin.0 + self.scroll.0;
        let y = client.1 - self.origin.1 + self.scroll.1;
        Some((
            x / self.size.width as f64 * 2.0 - 1.0,
            -(y / self.size.height as f64) * 2.0 + 1.0,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub part: NodePart,
    pub body: BodyId,
    pub distance: f64,
}

/// Nearest visible node crossed by `ray`.
pub fn hit_test(ray: &Ray, objects: &Objects, positions: &[ObjectInfo]) -> Option<(NodeId, f64)> {
    let mut nearest: Option<(NodeId, f64)> = None;
    for (body, info) in objects.objects().iter().zip(positions) {
        if !body.visible {
            continue;
        }
        for (node, part) in body.nodes() {
            let Some(distance) = ray.intersect(&body.bounds(part, info.pos)) else {
                continue;
            };
            if nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((node, distance));
            }
        }
    }
    nearest
}

/// Resolve a pointer position to the body under it, if any.
pub fn pick(
    camera: &Camera,
    viewport: &Viewport,
    client: (f64, f64),
    objects: &Objects,
    positions: &[ObjectInfo],
) -> Option<Hit> {
    let (x, y) = viewport.to_ndc(client)?;
    let ray = camera.ray_through(x, y)?;
    let (node, distance) = hit_test(&ray, objects, positions)?;
    let body = objects.resolve(node)?;
    let part = objects.part_of(node)?;
    Some(Hit {
        node,
        part,
        body,
        distance,
    })
}

/// Refresh the hover highlight from a pointer position. Every other body is cleared.
pub fn hover(
    camera: &Camera,
    viewport: &Viewport,
    client: (f64, f64),
    objects: &mut Objects,
    positions: &[ObjectInfo],
) -> Option<BodyId> {
    let hovered = pick(camera, viewport, client, objects, positions).map(|hit| hit.body);
    objects.set_hovered(hovered);
    hovered
}

#[cfg(test)]
mod tests {
    use cgmath::Zero;

    use super::*;
    use crate::parameters::{BodyParams, EngineConfig, ObscurePolicy};

    fn scene() -> (Camera, Viewport, Objects, Vec<ObjectInfo>) {
        let size = PhysicalSize::new(800, 600);
        let mut camera = Camera::new(size, &EngineConfig::default());
        camera.set_pose(Point3::new(0.0, 40.0, 0.01), Point3::new(0.0, 0.0, 0.0));
        let params = vec![
            BodyParams::new("a", 10.0, 1.0, (0.0, 0.0, 0.0).into(), Vector3::zero(), 0xff0000),
            BodyParams::new("b", 1.0, 1.0, (10.0, 0.0, 0.0).into(), Vector3::zero(), 0x00ff00),
        ];
        let positions = params.iter().map(ObjectInfo::from).collect();
        (camera, Viewport::new(size), Objects::new(&params), positions)
    }

    fn screen_of(camera: &Camera, p: Point3<f64>) -> (f64, f64) {
        camera.world_to_screen(p)
    }

    #[test]
    fn sphere_intersection_distances() {
        let ray = Ray::new(Point3::new(0.0, 0.0, -10.0), Vector3::unit_z()).unwrap();
        assert_eq!(ray.intersect_sphere(Point3::new(0.0, 0.0, 0.0), 1.0), Some(9.0));
        assert_eq!(ray.intersect_sphere(Point3::new(0.0, 5.0, 0.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(Point3::new(0.0, 0.0, -20.0), 1.0), None);
        let inside = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_z()).unwrap();
        assert_eq!(inside.intersect_sphere(Point3::new(0.0, 0.0, 0.0), 2.0), Some(2.0));
        assert!(Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::zero()).is_none());
    }

    #[test]
    fn billboard_faces_the_ray_origin() {
        let half = Vector3::new(2.0, 0.5, 0.1);
        let front = Ray::new(Point3::new(0.0, 0.0, 10.0), -Vector3::unit_z()).unwrap();
        let t = front.intersect_billboard(Point3::new(0.0, 0.0, 0.0), half).unwrap();
        assert!((t - 9.9).abs() < 1e-9);
        // Seen from the side the box still turns its full width to the viewer.
        let side = Ray::new(Point3::new(10.0, 0.0, 0.0), Vector3::new(-10.0, 0.0, 1.5)).unwrap();
        assert!(side.intersect_billboard(Point3::new(0.0, 0.0, 0.0), half).is_some());
        let above = Ray::new(Point3::new(0.0, 1.0, 10.0), -Vector3::unit_z()).unwrap();
        assert_eq!(above.intersect_billboard(Point3::new(0.0, 0.0, 0.0), half), None);
        let inside = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::unit_x()).unwrap();
        assert_eq!(inside.intersect_billboard(Point3::new(0.0, 0.0, 0.0), half), Some(2.0));
    }

    #[test]
    fn long_labels_stay_one_glyph_tall() {
        let name = "A considerably longer project title here";
        let params = vec![BodyParams::new(
            name,
            1.0,
            1.0,
            (15.0, 0.0, 0.0).into(),
            Vector3::zero(),
            0xffffff,
        )];
        let objects = Objects::new(&params);
        let positions: Vec<_> = params.iter().map(ObjectInfo::from).collect();
        let label = |y: f64| {
            let ray = Ray::new(Point3::new(18.0, y, 30.0), -Vector3::unit_z()).unwrap();
            hit_test(&ray, &objects, &positions).and_then(|(node, _)| objects.part_of(node))
        };

        // Level with the label, three units along its width.
        assert_eq!(label(2.0), Some(NodePart::Label));
        // Three glyph heights above it is empty space, however wide the name.
        assert_eq!(label(3.5), None);
    }

    #[test]
    fn ndc_accounts_for_offset_and_scroll() {
        let mut viewport = Viewport::new(PhysicalSize::new(200, 100));
        viewport.origin = (50.0, 20.0);
        viewport.scroll = (0.0, 10.0);
        assert_eq!(viewport.to_ndc((150.0, 60.0)), Some((0.0, 0.0)));
        assert_eq!(viewport.to_ndc((50.0, 10.0)), Some((-1.0, 1.0)));
        let empty = Viewport::new(PhysicalSize::new(0, 100));
        assert_eq!(empty.to_ndc((1.0, 1.0)), None);
    }

    #[test]
    fn picks_the_body_under_the_pointer() {
        let (camera, viewport, objects, positions) = scene();
        let pointer = screen_of(&camera, positions[1].pos);
        let hit = pick(&camera, &viewport, pointer, &objects, &positions).unwrap();
        assert_eq!(hit.body, BodyId(1));
    }

    #[test]
    fn halo_hits_resolve_to_the_owning_body() {
        let (camera, viewport, objects, positions) = scene();
        // Outside the sphere, inside the halo.
        let pointer = screen_of(&camera, Point3::new(11.5, 0.0, 0.0));
        let hit = pick(&camera, &viewport, pointer, &objects, &positions).unwrap();
        assert_eq!(hit.body, BodyId(1));
        assert_eq!(hit.part, NodePart::Halo);
    }

    #[test]
    fn empty_space_picks_nothing_and_clears_hover() {
        let (camera, viewport, mut objects, positions) = scene();
        let on_body = screen_of(&camera, positions[0].pos);
        assert_eq!(
            hover(&camera, &viewport, on_body, &mut objects, &positions),
            Some(BodyId(0))
        );
        let empty = screen_of(&camera, Point3::new(-12.0, 0.0, 8.0));
        assert_eq!(hover(&camera, &viewport, empty, &mut objects, &positions), None);
        assert!(objects.objects().iter().all(|b| !b.hovered));
    }

    #[test]
    fn hidden_bodies_are_not_pickable() {
        let (camera, viewport, mut objects, positions) = scene();
        objects.isolate(BodyId(0), ObscurePolicy::Hide);
        let pointer = screen_of(&camera, positions[1].pos);
        assert!(pick(&camera, &viewport, pointer, &objects, &positions).is_none());
        objects.restore();
        objects.isolate(BodyId(0), ObscurePolicy::Dim(0.1));
        assert!(pick(&camera, &viewport, pointer, &objects, &positions).is_some());
    }
}
