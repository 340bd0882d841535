//! Bevy side of the scene host
//!
//! [`PortalHost`] gathers everything a behavior can touch into one system
//! parameter. Each dispatch fills a [`SceneFrame`] for the portal entity, runs
//! the behavior against it, then writes colors, position, and requests back.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use portal_core::{
    Capability, DocumentEvent, InteractionBehavior, InteractionConfig, NodeId, Propagation, Rgba,
    SceneFrame, SceneRequest, Signal,
};
use tracing::{debug, warn};

use crate::components::{Grabbable, Grabbed, NodeMaterials, Portal, PortalDocument, PortalSettings, Viewer};
use crate::session::ImmersiveSession;

#[derive(SystemParam)]
pub struct PortalHost<'w, 's> {
    pub(crate) commands: Commands<'w, 's>,
    portals: Query<'w, 's, (Entity, &'static mut Portal, &'static mut Transform, Has<Grabbed>)>,
    children: Query<'w, 's, &'static Children>,
    mesh_materials: Query<'w, 's, &'static MeshMaterial3d<StandardMaterial>>,
    materials: ResMut<'w, Assets<StandardMaterial>>,
    node_materials: ResMut<'w, NodeMaterials>,
    viewer: Query<'w, 's, &'static GlobalTransform, With<Viewer>>,
    pub(crate) session: ResMut<'w, ImmersiveSession>,
    document: ResMut<'w, PortalDocument>,
    settings: Res<'w, PortalSettings>,
}

impl PortalHost<'_, '_> {
    /// Attach a behavior to `entity` using the entity's current visuals
    pub fn attach(&mut self, entity: Entity, config: InteractionConfig, position: Vec3) -> InteractionBehavior {
        let mut frame = SceneFrame::new();
        self.collect_nodes(entity, &mut frame);
        frame.immersive = self.session.mode();
        frame.viewer = self.viewer_position();
        frame.position = position;

        let behavior = InteractionBehavior::attach(entity.to_bits(), config, &mut frame, &mut *self.document.0);
        self.apply_requests(entity, &frame.requests);
        behavior
    }

    /// Deliver a signal to one portal. Returns `None` if `entity` is not a portal.
    pub fn dispatch(&mut self, entity: Entity, signal: &Signal) -> Option<Propagation> {
        let mut frame = SceneFrame::new();
        let nodes = self.collect_nodes(entity, &mut frame);
        frame.immersive = self.session.mode();
        frame.viewer = self.viewer_position();

        let flow = {
            let Ok((_, mut portal, mut transform, grabbed)) = self.portals.get_mut(entity) else {
                return None;
            };
            frame.grabbed = grabbed;
            frame.position = transform.translation;
            let flow = portal.behavior.dispatch(signal, &mut frame, &mut *self.document.0);
            if frame.moved {
                transform.translation = frame.position;
            }
            flow
        };

        self.apply_colors(&frame, &nodes);
        self.apply_requests(entity, &frame.requests);
        debug!(?entity, ?signal, ?flow, "Signal dispatched");
        Some(flow)
    }

    /// Run the grab clamp for one portal without touching its visuals
    pub fn tick(&mut self, entity: Entity) {
        let viewer = self.viewer_position();
        let Ok((_, portal, mut transform, grabbed)) = self.portals.get_mut(entity) else {
            return;
        };
        let mut frame = SceneFrame {
            grabbed,
            viewer,
            position: transform.translation,
            ..default()
        };
        if portal.behavior.clamp_grab(&mut frame) {
            transform.translation = frame.position;
        }
    }

    pub fn portal_entities(&self) -> Vec<Entity> {
        self.portals.iter().map(|(entity, ..)| entity).collect()
    }

    /// Portal whose behavior carries the given id
    pub fn find_owner(&self, owner: u64) -> Option<Entity> {
        self.portals
            .iter()
            .find(|(_, portal, ..)| portal.behavior.id() == owner)
            .map(|(entity, ..)| entity)
    }

    /// Route events raised by the document (overlay close buttons)
    pub fn drain_document_events(&mut self) {
        while let Some(event) = self.document.0.poll_event() {
            match event {
                DocumentEvent::OverlayClosed { owner } => match self.find_owner(owner) {
                    Some(entity) => {
                        self.dispatch(entity, &Signal::OverlayClosed);
                    }
                    None => warn!(owner, "Overlay closed for an unknown portal"),
                },
            }
        }
    }

    fn viewer_position(&self) -> Option<Vec3> {
        self.viewer.single().ok().map(|t| t.translation())
    }

    /// Push every mesh node under `root` (root included) into the frame.
    /// Returns the node entities in the same order as `frame.nodes`.
    fn collect_nodes(&self, root: Entity, frame: &mut SceneFrame) -> Vec<Entity> {
        let mut entities = Vec::new();
        for node in std::iter::once(root).chain(self.children.iter_descendants(root)) {
            let Ok(shared) = self.mesh_materials.get(node) else {
                continue;
            };
            let handle = self.node_materials.0.get(&node).unwrap_or(&shared.0);
            let color = self.materials.get(handle).map(|m| to_rgba(m.base_color));
            frame.nodes.push((NodeId(node.to_bits()), color));
            entities.push(node);
        }
        entities
    }

    fn apply_colors(&mut self, frame: &SceneFrame, nodes: &[Entity]) {
        for dirty in &frame.dirty {
            let Some(index) = frame.nodes.iter().position(|(id, _)| id == dirty) else {
                continue;
            };
            let Some(color) = frame.nodes[index].1 else {
                continue;
            };
            let node = nodes[index];

            let handle = match self.node_materials.0.get(&node) {
                Some(handle) => handle.clone(),
                None => {
                    let Ok(shared) = self.mesh_materials.get(node) else {
                        continue;
                    };
                    let Some(material) = self.materials.get(&shared.0).cloned() else {
                        continue;
                    };
                    let handle = self.materials.add(material);
                    self.commands.entity(node).insert(MeshMaterial3d(handle.clone()));
                    self.node_materials.0.insert(node, handle.clone());
                    handle
                }
            };

            if let Some(material) = self.materials.get_mut(&handle) {
                material.base_color = to_bevy(color);
            }
        }
    }

    fn apply_requests(&mut self, entity: Entity, requests: &[SceneRequest]) {
        for request in requests {
            match request {
                SceneRequest::ExitImmersive => self.session.request_exit(),
                SceneRequest::EnterImmersive(kind) => self.session.request_enter(*kind),
                SceneRequest::FocusScene => {
                    if let Err(e) = self.document.0.focus(&self.settings.canvas_id) {
                        warn!("Failed to focus scene: {}", e);
                    }
                }
                SceneRequest::AddCapability(Capability::Grabbable) => {
                    self.commands.entity(entity).insert(Grabbable);
                }
            }
        }
    }
}

pub fn to_rgba(color: Color) -> Rgba {
    let c = color.to_srgba();
    Rgba::rgba(c.red, c.green, c.blue, c.alpha)
}

pub fn to_bevy(color: Rgba) -> Color {
    Color::srgba(color.r, color.g, color.b, color.a)
}
