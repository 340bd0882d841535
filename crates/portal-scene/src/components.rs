//! Components and resources shared by the portal systems

use bevy::prelude::*;
use portal_core::{InteractionBehavior, InteractionConfig, MemoryDocument, DocumentHost};
use std::collections::HashMap;

/// Interaction settings for an entity that has not been attached yet.
///
/// The attach system replaces this with a [`Portal`] on the next update.
#[derive(Component, Debug, Clone)]
pub struct PortalConfig(pub InteractionConfig);

/// An attached portal
#[derive(Component, Debug)]
pub struct Portal {
    pub behavior: InteractionBehavior,
}

/// Marker for the camera the grab clamp measures against
#[derive(Component)]
pub struct Viewer;

/// The entity may be picked up by dragging
#[derive(Component)]
pub struct Grabbable;

/// The entity is currently held
#[derive(Component)]
pub struct Grabbed;

/// The pointer ray currently hits the entity
#[derive(Component)]
pub struct Hovered;

/// The portal's glTF scene finished spawning
#[derive(Component)]
pub struct ModelLoaded;

/// Document the portals mount overlays into and navigate
#[derive(Resource)]
pub struct PortalDocument(pub Box<dyn DocumentHost + Send + Sync>);

impl Default for PortalDocument {
    fn default() -> Self {
        Self(Box::new(MemoryDocument::new()))
    }
}

/// Host-level settings
#[derive(Resource, Debug, Clone)]
pub struct PortalSettings {
    /// Element id that receives focus when the scene regains input
    pub canvas_id: String,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            canvas_id: "portal-canvas".to_string(),
        }
    }
}

/// Per-node material clones so tinting one node never tints another that
/// shared its material
#[derive(Resource, Default)]
pub struct NodeMaterials(pub HashMap<Entity, Handle<StandardMaterial>>);
