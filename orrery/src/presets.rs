use std::f64::consts::PI;

use cgmath::{Point3, Vector3, Zero};
use rand::Rng;

use crate::{
    constants::G,
    parameters::{BodyParams, Project},
};

pub const SUN_MASS: f64 = 100.0;

pub fn default_projects() -> Vec<Project> {
    vec![
        Project {
            name: "About".to_owned(),
            description: "The sun in the middle. Click a planet to read about it.".to_owned(),
            github: None,
            link: None,
        },
        Project {
            name: "Topic Explorer".to_owned(),
            description: "A tree-based UI for exploring nested topics. A single prompt \
                          recursively generates subtopics for any search query, and every \
                          branch inherits its parent entry as context."
                .to_owned(),
            github: Some("https://github.com/JohnPeng47/TopicExplorer".to_owned()),
            link: Some("https://cowboy.rocks/TopicExplorer".to_owned()),
        },
    ]
}

/// A sun carrying `projects[0]` with one planet per remaining project on a
/// circular orbit. Planet `i` sits at angle `i/5 * 2pi` and distance `15 + 3i`.
pub fn sun_with_projects(projects: &[Project], rng: &mut impl Rng) -> Vec<BodyParams> {
    let mut sun = BodyParams::new(
        "Sun",
        SUN_MASS,
        3.0,
        Point3::new(0.0, 0.0, 0.0),
        Vector3::zero(),
        0xffff00,
    );
    if let Some(project) = projects.first() {
        sun = sun.with_project(project.clone());
    }

    let mut bodies = vec![sun];
    for (i, project) in projects.iter().enumerate().skip(1) {
        let angle = i as f64 / 5.0 * PI * 2.0;
        let distance = 15.0 + i as f64 * 3.0;
        let speed = (G * SUN_MASS / distance).sqrt();
        bodies.push(
            BodyParams::new(
                project.name.clone(),
                rng.random_range(1.0..3.0),
                1.0,
                Point3::new(angle.cos() * distance, 0.0, angle.sin() * distance),
                Vector3::new(-angle.sin() * speed, 0.0, angle.cos() * speed),
                0xffffff,
            )
            .with_project(project.clone()),
        );
    }
    bodies
}

/// Sun at rest and one planet at distance 15 with circular orbital speed.
pub fn two_body() -> Vec<BodyParams> {
    vec![
        BodyParams::new(
            "Sun",
            SUN_MASS,
            3.0,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::zero(),
            0xffff00,
        ),
        BodyParams::new(
            "Planet",
            1.0,
            1.0,
            Point3::new(15.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, (G * SUN_MASS / 15.0).sqrt()),
            0xffffff,
        ),
    ]
}
