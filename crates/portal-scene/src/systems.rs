use bevy::prelude::*;
use bevy::scene::{SceneInstance, SceneSpawner};
use portal_core::Signal;
use tracing::{debug, info};

use crate::components::{Grabbed, Hovered, ModelLoaded, NodeMaterials, Portal, PortalConfig};
use crate::host::PortalHost;
use crate::picking::observe_portal;

/// Turn every pending [`PortalConfig`] into an attached [`Portal`]
pub(crate) fn attach_portals(
    pending: Query<(Entity, &PortalConfig, &Transform), Without<Portal>>,
    mut host: PortalHost,
) {
    for (entity, config, transform) in pending.iter() {
        let behavior = host.attach(entity, config.0.clone(), transform.translation);
        info!(?entity, url = %behavior.config().target, "Portal attached");

        let mut commands = host.commands.entity(entity);
        commands.insert(Portal { behavior }).remove::<PortalConfig>();
        observe_portal(&mut commands);
    }
}

/// Re-snapshot colors once a portal's glTF scene has spawned its meshes
pub(crate) fn detect_model_ready(
    scenes: Query<(Entity, &SceneInstance), (With<Portal>, Without<ModelLoaded>)>,
    spawner: Res<SceneSpawner>,
    mut host: PortalHost,
) {
    for (entity, instance) in scenes.iter() {
        if !spawner.instance_is_ready(**instance) {
            continue;
        }
        debug!(?entity, "Portal model ready");
        host.commands.entity(entity).insert(ModelLoaded);
        host.dispatch(entity, &Signal::ModelReady);
    }
}

/// Enter or the right gamepad trigger activates whatever the pointer is over
pub(crate) fn controller_trigger(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    hovered: Query<(Entity, Has<Hovered>), With<Portal>>,
    mut host: PortalHost,
) {
    let pressed = keyboard.just_pressed(KeyCode::Enter)
        || gamepads
            .iter()
            .any(|gamepad| gamepad.just_pressed(GamepadButton::RightTrigger2));
    if !pressed {
        return;
    }

    for (entity, intersects) in hovered.iter() {
        host.dispatch(entity, &Signal::TriggerDown { intersects });
    }
}

pub(crate) fn poll_document_events(mut host: PortalHost) {
    host.drain_document_events();
}

pub(crate) fn clamp_grabbed_portals(grabbed: Query<Entity, (With<Portal>, With<Grabbed>)>, mut host: PortalHost) {
    for entity in grabbed.iter() {
        host.tick(entity);
    }
}

/// Forget private material clones of nodes that lost their mesh material
pub(crate) fn prune_node_materials(
    mut removed: RemovedComponents<MeshMaterial3d<StandardMaterial>>,
    meshes: Query<(), With<MeshMaterial3d<StandardMaterial>>>,
    mut node_materials: ResMut<NodeMaterials>,
) {
    for entity in removed.read() {
        if meshes.contains(entity) {
            continue;
        }
        if node_materials.0.remove(&entity).is_some() {
            debug!(?entity, "Dropped private material");
        }
    }
}
