use std::collections::HashMap;

use cgmath::{Point3, Vector3};

use crate::{
    constants::{HALO_SCALE, LABEL_DEPTH, LABEL_GLYPH, LABEL_LIFT, SPHERE_OPACITY},
    parameters::{BodyParams, ObscurePolicy, Project},
};

/// Hit volume of one visual node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Sphere {
        center: Point3<f64>,
        radius: f64,
    },
    /// Upright box turned about the world up axis to face the viewer.
    Billboard {
        center: Point3<f64>,
        half_extents: Vector3<f64>,
    },
}

/// Position of a body in the registry. Stable for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub usize);

/// Identity of one hit-testable visual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// The visual parts each body owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodePart {
    Sphere,
    Halo,
    Label,
}

impl NodePart {
    pub const ALL: [NodePart; 3] = [NodePart::Sphere, NodePart::Halo, NodePart::Label];
}

#[derive(Debug, Clone)]
pub struct BodyVisual {
    pub name: String,
    pub color: u32,
    pub radius: f64,
    pub project: Option<Project>,
    pub visible: bool,
    pub opacity: f32,
    pub hovered: bool,
    pub selected: bool,
    nodes: [NodeId; 3],
}

impl BodyVisual {
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, NodePart)> + '_ {
        self.nodes.iter().copied().zip(NodePart::ALL)
    }

    /// Offset from the body center to its label.
    pub fn label_offset(&self) -> Vector3<f64> {
        Vector3::new(0.0, self.radius * LABEL_LIFT, 0.0)
    }

    /// Hit volume of one part when the body sits at `pos`.
    pub fn bounds(&self, part: NodePart, pos: Point3<f64>) -> Bounds {
        match part {
            NodePart::Sphere => Bounds::Sphere {
                center: pos,
                radius: self.radius,
            },
            NodePart::Halo => Bounds::Sphere {
                center: pos,
                radius: self.radius * HALO_SCALE,
            },
            NodePart::Label => {
                let glyph = self.radius * LABEL_GLYPH;
                // Roughly half a glyph of advance per character, centered on the body.
                let half_width = self.name.chars().count() as f64 * glyph * 0.5;
                Bounds::Billboard {
                    center: pos + self.label_offset(),
                    half_extents: Vector3::new(
                        half_width.max(glyph * 0.5),
                        glyph * 0.5,
                        glyph * LABEL_DEPTH,
                    ),
                }
            }
        }
    }
}

/// Visual and selection state of every body, plus the node-to-body map.
pub struct Objects {
    infos: Vec<BodyVisual>,
    owners: HashMap<NodeId, (BodyId, NodePart)>,
    // Visibility and opacity from before the current zoom.
    saved: Option<Vec<(bool, f32)>>,
}

impl Objects {
    pub fn new(init: &[BodyParams]) -> Self {
        let mut infos = Vec::with_capacity(init.len());
        let mut owners = HashMap::with_capacity(init.len() * NodePart::ALL.len());
        let mut next = 0u32;
        for (idx, params) in init.iter().enumerate() {
            let mut nodes = [NodeId(0); 3];
            for (slot, part) in nodes.iter_mut().zip(NodePart::ALL) {
                *slot = NodeId(next);
                owners.insert(NodeId(next), (BodyId(idx), part));
                next += 1;
            }
            infos.push(BodyVisual {
                name: params.name.clone(),
                color: params.color,
                radius: params.radius,
                project: params.project.clone(),
                visible: true,
                opacity: SPHERE_OPACITY,
                hovered: false,
                selected: false,
                nodes,
            });
        }

        Self {
            infos,
            owners,
            saved: None,
        }
    }

    pub fn objects(&self) -> &[BodyVisual] {
        &self.infos
    }

    pub fn get(&self, id: BodyId) -> Option<&BodyVisual> {
        self.infos.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = BodyId> + use<> {
        (0..self.infos.len()).map(BodyId)
    }

    /// Body owning a visual node. Unknown nodes resolve to nothing.
    pub fn resolve(&self, node: NodeId) -> Option<BodyId> {
        self.owners.get(&node).map(|(id, _)| *id)
    }

    pub fn part_of(&self, node: NodeId) -> Option<NodePart> {
        self.owners.get(&node).map(|(_, part)| *part)
    }

    /// Highlight at most one body, clearing every other.
    pub fn set_hovered(&mut self, id: Option<BodyId>) {
        for (idx, info) in self.infos.iter_mut().enumerate() {
            info.hovered = Some(BodyId(idx)) == id;
        }
    }

    pub fn hovered(&self) -> Option<BodyId> {
        self.infos.iter().position(|b| b.hovered).map(BodyId)
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.infos.iter().position(|b| b.selected).map(BodyId)
    }

    /// Isolate `subject`: mark it selected and hide or dim the rest.
    pub fn isolate(&mut self, subject: BodyId, policy: ObscurePolicy) {
        if self.saved.is_none() {
            self.saved = Some(self.infos.iter().map(|b| (b.visible, b.opacity)).collect());
        }
        for (idx, info) in self.infos.iter_mut().enumerate() {
            info.selected = idx == subject.0;
            if info.selected {
                continue;
            }
            match policy {
                ObscurePolicy::Hide => info.visible = false,
                ObscurePolicy::Dim(factor) => info.opacity *= factor,
            }
        }
    }

    /// Undo [`Objects::isolate`], restoring the pre-zoom visuals.
    pub fn restore(&mut self) {
        if let Some(saved) = self.saved.take() {
            for (info, (visible, opacity)) in self.infos.iter_mut().zip(saved) {
                info.visible = visible;
                info.opacity = opacity;
            }
        }
        for info in &mut self.infos {
            info.selected = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> Vec<BodyParams> {
        ["Sun", "Topic Explorer", "Me"]
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                BodyParams::new(
                    name,
                    1.0 + i as f64,
                    1.0,
                    (i as f64 * 10.0, 0.0, 0.0).into(),
                    (0.0, 0.0, 0.0).into(),
                    0xffffff,
                )
            })
            .collect()
    }

    #[test]
    fn every_node_resolves_to_its_owner() {
        let objects = Objects::new(&params());
        for id in objects.ids() {
            let body = objects.get(id).unwrap();
            for (node, part) in body.nodes() {
                assert_eq!(objects.resolve(node), Some(id));
                assert_eq!(objects.part_of(node), Some(part));
            }
        }
        assert_eq!(objects.resolve(NodeId(9000)), None);
    }

    #[test]
    fn hover_is_exclusive() {
        let mut objects = Objects::new(&params());
        objects.set_hovered(Some(BodyId(1)));
        objects.set_hovered(Some(BodyId(2)));
        assert_eq!(objects.hovered(), Some(BodyId(2)));
        assert_eq!(objects.objects().iter().filter(|b| b.hovered).count(), 1);
        objects.set_hovered(None);
        assert_eq!(objects.hovered(), None);
    }

    #[test]
    fn isolate_then_restore_round_trips_visuals() {
        for policy in [ObscurePolicy::Hide, ObscurePolicy::Dim(0.1)] {
            let mut objects = Objects::new(&params());
            let before: Vec<_> = objects
                .objects()
                .iter()
                .map(|b| (b.visible, b.opacity))
                .collect();
            objects.isolate(BodyId(1), policy);
            assert_eq!(objects.selected(), Some(BodyId(1)));
            assert!(objects.get(BodyId(1)).unwrap().visible);
            match policy {
                ObscurePolicy::Hide => assert!(!objects.get(BodyId(0)).unwrap().visible),
                ObscurePolicy::Dim(_) => {
                    assert!(objects.get(BodyId(0)).unwrap().opacity < SPHERE_OPACITY)
                }
            }
            objects.restore();
            let after: Vec<_> = objects
                .objects()
                .iter()
                .map(|b| (b.visible, b.opacity))
                .collect();
            assert_eq!(before, after);
            assert_eq!(objects.selected(), None);
        }
    }

    #[test]
    fn label_bounds_sit_above_the_body() {
        let objects = Objects::new(&params());
        let body = objects.get(BodyId(1)).unwrap();
        let origin = Point3::new(0.0, 0.0, 0.0);
        let Bounds::Billboard {
            center,
            half_extents,
        } = body.bounds(NodePart::Label, origin)
        else {
            panic!("labels are billboards");
        };
        assert_eq!(center, Point3::new(0.0, 2.0, 0.0));
        // Fourteen characters at glyph size 0.5.
        assert_eq!(half_extents.x, 3.5);
        assert_eq!(half_extents.y, 0.25);
        assert!(half_extents.z < half_extents.y);
        assert_eq!(
            body.bounds(NodePart::Halo, origin),
            Bounds::Sphere {
                center: origin,
                radius: 2.0
            }
        );
    }
}
