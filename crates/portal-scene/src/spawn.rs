//! Spawn portal entities described by a [`SceneManifest`]

use bevy::prelude::*;
use portal_core::{PortalShape, PortalSpec, SceneManifest};
use tracing::info;

use crate::components::PortalConfig;
use crate::host::to_bevy;

/// Manifest the startup spawner reads
#[derive(Resource, Debug, Clone, Default)]
pub struct PortalManifest(pub SceneManifest);

pub(crate) fn spawn_portals(
    mut commands: Commands,
    manifest: Res<PortalManifest>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for spec in &manifest.0.portals {
        let transform = Transform::from_translation(Vec3::from_array(spec.position));
        let mut entity = commands.spawn((
            Name::new(spec.name.clone()),
            transform,
            PortalConfig(spec.interaction.clone()),
        ));

        match &spec.model {
            Some(path) => {
                info!("Spawning portal {} from {}", spec.name, path);
                entity.insert(SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()))));
            }
            None => {
                info!("Spawning portal {} as {:?}", spec.name, spec.shape);
                entity.insert((
                    Mesh3d(meshes.add(primitive(spec))),
                    MeshMaterial3d(materials.add(StandardMaterial {
                        base_color: to_bevy(spec.color),
                        ..default()
                    })),
                ));
            }
        }
    }
}

fn primitive(spec: &PortalSpec) -> Mesh {
    match spec.shape {
        PortalShape::Cube => Cuboid::from_length(spec.size).into(),
        PortalShape::Sphere => Sphere::new(spec.size / 2.0).into(),
    }
}
