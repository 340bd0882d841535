//! Grab clamp: keep a held entity within reach of the viewer

use glam::Vec3;

/// Maximum distance between the viewer and a grabbed entity
pub const GRAB_RADIUS: f32 = 0.5;

/// Clamp `entity` onto the sphere of `radius` around `viewer`.
///
/// Returns the new position if the entity was outside the sphere, `None` if
/// it was already within reach.
pub fn clamp_to_radius(viewer: Vec3, entity: Vec3, radius: f32) -> Option<Vec3> {
    let offset = entity - viewer;
    let length = offset.length();
    if length <= radius {
        return None;
    }
    Some(viewer + offset * (radius / length))
}
