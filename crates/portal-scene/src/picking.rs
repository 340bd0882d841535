//! Pointer observers attached to every portal entity
//!
//! Pointer events bubble up from glTF child meshes, so observers on the
//! portal root see hits on any of its nodes.

use bevy::ecs::system::EntityCommands;
use bevy::prelude::*;
use bevy_picking::events::{Click, Drag, DragEnd, DragStart, Out, Over, Pointer, Press, Release};
use bevy_picking::pointer::PointerButton;
use portal_core::{Propagation, Signal};
use tracing::debug;

use crate::components::{Grabbable, Grabbed, Hovered, Viewer};
use crate::host::PortalHost;

/// World units moved per pixel of drag
const DRAG_SENSITIVITY: f32 = 0.002;

pub fn observe_portal(entity: &mut EntityCommands) {
    entity
        .observe(on_pointer_over)
        .observe(on_pointer_out)
        .observe(on_click)
        .observe(on_press)
        .observe(on_release)
        .observe(on_drag_start)
        .observe(on_drag)
        .observe(on_drag_end);
}

fn on_pointer_over(over: On<Pointer<Over>>, mut host: PortalHost) {
    let entity = over.entity;
    debug!(?entity, "Intersection detected");
    host.commands.entity(entity).insert(Hovered);
    host.dispatch(entity, &Signal::PointerEnter);
}

fn on_pointer_out(out: On<Pointer<Out>>, mut host: PortalHost) {
    let entity = out.entity;
    debug!(?entity, "Intersection cleared");
    host.commands.entity(entity).remove::<Hovered>();
    host.dispatch(entity, &Signal::PointerLeave);
}

fn on_click(mut click: On<Pointer<Click>>, mut host: PortalHost) {
    if click.button != PointerButton::Primary {
        return;
    }
    if forward(&mut host, click.entity, "click") {
        click.propagate(false);
    }
}

fn on_press(mut press: On<Pointer<Press>>, mut host: PortalHost) {
    if press.button != PointerButton::Primary {
        return;
    }
    if forward(&mut host, press.entity, "mousedown") {
        press.propagate(false);
    }
}

fn on_release(mut release: On<Pointer<Release>>, mut host: PortalHost) {
    if release.button != PointerButton::Primary {
        return;
    }
    if forward(&mut host, release.entity, "mouseup") {
        release.propagate(false);
    }
}

/// Send a named pointer event to the portal. True when the behavior consumed it.
fn forward(host: &mut PortalHost, entity: Entity, name: &str) -> bool {
    host.dispatch(entity, &Signal::Event(name.to_string())) == Some(Propagation::Stop)
}

fn on_drag_start(
    drag: On<Pointer<DragStart>>,
    grabbable: Query<(), With<Grabbable>>,
    mut commands: Commands,
) {
    if drag.button != PointerButton::Primary || grabbable.get(drag.entity).is_err() {
        return;
    }
    debug!(entity = ?drag.entity, "Grabbed");
    commands.entity(drag.entity).insert(Grabbed);
}

fn on_drag(
    drag: On<Pointer<Drag>>,
    mut portals: Query<&mut Transform, With<Grabbed>>,
    viewer: Query<&GlobalTransform, With<Viewer>>,
) {
    let Ok(mut transform) = portals.get_mut(drag.entity) else {
        return;
    };
    let Ok(camera) = viewer.single() else {
        return;
    };
    let delta = drag.delta * DRAG_SENSITIVITY;
    transform.translation += camera.right() * delta.x - camera.up() * delta.y;
}

fn on_drag_end(drag: On<Pointer<DragEnd>>, mut commands: Commands, grabbed: Query<(), With<Grabbed>>) {
    if grabbed.get(drag.entity).is_ok() {
        debug!(entity = ?drag.entity, "Released");
        commands.entity(drag.entity).remove::<Grabbed>();
    }
}
