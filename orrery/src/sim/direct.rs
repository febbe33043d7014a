use cgmath::Vector3;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use crate::sim::{GravityLaw, ObjectInfo};

/// Advance every body by one step from the forces in `forces`.
///
/// All velocities are updated before any position moves, and the force
/// buffer is cleared for the next step.
pub fn integrate(objects: &mut [ObjectInfo], forces: &mut [Vector3<f64>], delta: f64) {
    debug_assert_eq!(objects.len(), forces.len());
    for (obj, force) in objects.iter_mut().zip(forces.iter_mut()) {
        // Integrate the acceleration by multiplying it with the time step
        // and add it to the velocity
        obj.vel += *force / obj.mass * delta;
        // We keep the force buffer for the next iteration, but we need to reset it.
        force.x = 0.0;
        force.y = 0.0;
        force.z = 0.0;
    }
    for obj in objects.iter_mut() {
        obj.pos += obj.vel * delta;
        obj.pos.y = 0.0;
    }
}

pub fn iter(objects: &[ObjectInfo], out_buffer: &mut [Vector3<f64>], law: &GravityLaw) {
    objects
        .par_iter()
        .zip(out_buffer.par_iter_mut())
        .enumerate()
        .for_each(|(i, (obj, out))| {
            for (other_idx, other) in objects.iter().enumerate() {
                if other_idx == i {
                    continue;
                }
                obj.get_force_towards(other, law, out);
            }
        });
}

pub fn iter_single_threaded(
    objects: &[ObjectInfo],
    out_buffer: &mut [Vector3<f64>],
    law: &GravityLaw,
) {
    for (i, (obj, out)) in objects.iter().zip(out_buffer.iter_mut()).enumerate() {
        for (other_idx, other) in objects.iter().enumerate() {
            if other_idx == i {
                continue;
            }
            obj.get_force_towards(other, law, out);
        }
    }
}
