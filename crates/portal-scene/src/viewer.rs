//! Viewer camera, lighting, and keyboard movement

use bevy::prelude::*;

use crate::components::Viewer;

/// Viewer movement settings
#[derive(Debug, Clone, Resource)]
pub struct ViewerSettings {
    pub start: Vec3,
    pub look_at: Vec3,
    /// Units per second
    pub speed: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            start: Vec3::new(0.0, 1.6, 1.5),
            look_at: Vec3::new(0.0, 1.0, 0.0),
            speed: 1.5,
        }
    }
}

pub(crate) fn setup_viewer(mut commands: Commands, settings: Res<ViewerSettings>) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            near: 0.01,
            far: 500.0,
            ..default()
        }),
        Transform::from_translation(settings.start).looking_at(settings.look_at, Vec3::Y),
        Viewer,
    ));

    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.9, 0.95, 1.0),
        brightness: 300.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 5000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(2.0, 4.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// WASD moves on the ground plane, Q/E moves down/up
pub(crate) fn move_viewer(
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<ViewerSettings>,
    time: Res<Time>,
    mut viewer: Query<&mut Transform, With<Viewer>>,
) {
    let Ok(mut transform) = viewer.single_mut() else {
        return;
    };

    let forward = transform.forward().with_y(0.0).normalize_or_zero();
    let right = transform.right().with_y(0.0).normalize_or_zero();

    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction += forward;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction -= forward;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction += right;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction -= right;
    }
    if keyboard.pressed(KeyCode::KeyE) {
        direction += Vec3::Y;
    }
    if keyboard.pressed(KeyCode::KeyQ) {
        direction -= Vec3::Y;
    }

    transform.translation += direction.normalize_or_zero() * settings.speed * time.delta_secs();
}
