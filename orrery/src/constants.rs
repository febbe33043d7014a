// PHYSICAL
/// Gravitational constant. Tuned for the look of the orbits, not calibrated.
pub const G: f64 = 2.0;
/// Simulated time per integration step.
pub const DELTA: f64 = 0.01;
/// Added to every planar separation to avoid division by zero when bodies overlap.
pub const SOFTENING: f64 = 0.1;

// CAMERA
/// Camera position when the view opens.
pub const INITIAL_EYE: [f64; 3] = [-2.46, 10.63, 25.03];
/// Camera look-target when the view opens.
pub const INITIAL_TARGET: [f64; 3] = [0.0, 0.0, 0.0];
/// Vertical field of view, in degrees.
pub const FOVY_DEG: f64 = 60.0;
pub const ZNEAR: f64 = 0.1;
pub const ZFAR: f64 = 1000.0;
/// Free-orbit pitch is kept this far (radians) away from the poles.
pub const ORBIT_PITCH_MARGIN: f64 = 0.05;
/// Free-orbit dolly limits, as distance from the look-target.
pub const ORBIT_MIN_DISTANCE: f64 = 2.0;
pub const ORBIT_MAX_DISTANCE: f64 = 500.0;

// TRANSITIONS
/// Length of every camera transition, in milliseconds.
pub const TRANSITION_DURATION_MS: u64 = 1000;
/// Direction from a selected body to the zoomed look-target, before scaling.
pub const ZOOM_OFFSET: [f64; 3] = [6.11, -1.33, 7.89];
pub const ZOOM_SCALE: f64 = 4.0;
/// Opacity multiplier applied to non-selected bodies under the dim policy.
pub const DIM_OPACITY: f32 = 0.1;

// VISUALS
/// Opacity of a body sphere.
pub const SPHERE_OPACITY: f32 = 0.7;
/// Halo radius relative to the body radius.
pub const HALO_SCALE: f64 = 2.0;
pub const HALO_OPACITY: f32 = 0.5;
/// Halo opacity multiplier while the body is hovered.
pub const HALO_HOVER_BOOST: f32 = 1.5;
/// Label height above the body center, relative to the body radius.
pub const LABEL_LIFT: f64 = 2.0;
/// Label glyph size relative to the body radius.
pub const LABEL_GLYPH: f64 = 0.5;
/// Label hit-box half thickness relative to the glyph size.
pub const LABEL_DEPTH: f64 = 0.1;

// SIMULATION
/// Use the parallel force pass once there are at least this many bodies.
pub const PARALLEL_CUTOFF: usize = 256;
