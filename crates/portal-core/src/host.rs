//! Capability interfaces the behavior drives
//!
//! The scene graph and the browser document are owned by the host engine.
//! The behavior only sees them through these traits, so an engine binding,
//! a browser binding, and in-memory doubles are interchangeable.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::Rgba;
use crate::error::HostError;
use crate::overlay::OverlayMarkup;

/// Stable identifier of a visual node inside the host scene graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Kind of immersive presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImmersiveKind {
    Vr,
    Ar,
}

impl fmt::Display for ImmersiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImmersiveKind::Vr => write!(f, "VR"),
            ImmersiveKind::Ar => write!(f, "AR"),
        }
    }
}

/// Capability tags the behavior can request on its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The host grab system may pick the entity up
    Grabbable,
}

/// Scene graph side of the host
pub trait SceneHost {
    /// Visual (mesh-bearing) nodes under the entity's rendered object
    fn visual_nodes(&self) -> Vec<NodeId>;

    /// Current color of a node, `None` if the node carries no color
    fn node_color(&self, node: NodeId) -> Option<Rgba>;

    fn set_node_color(&mut self, node: NodeId, color: Rgba);

    /// Active immersive session, read fresh on every call
    fn immersive_mode(&self) -> Option<ImmersiveKind>;

    /// Ask the host to leave the session. Completion is signalled later.
    fn request_exit_immersive(&mut self);

    fn request_enter_immersive(&mut self, kind: ImmersiveKind);

    /// Return input focus to the scene
    fn focus_scene(&mut self);

    fn add_capability(&mut self, capability: Capability);

    /// Whether the host grab system currently holds the entity
    fn is_grabbed(&self) -> bool;

    /// Viewer (camera) position, `None` if there is no viewer
    fn viewer_position(&self) -> Option<Vec3>;

    fn entity_position(&self) -> Vec3;

    fn set_entity_position(&mut self, position: Vec3);
}

/// Notifications raised by the document itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// The close control of an overlay was activated
    OverlayClosed { owner: u64 },
}

/// Browser document side of the host
pub trait DocumentHost {
    /// Whether an element with this id exists
    fn contains(&self, id: &str) -> bool;

    /// Append a `<style>` element with the given id
    fn insert_style(&mut self, id: &str, css: &str) -> Result<(), HostError>;

    /// Remove every element carrying this id, returning how many were removed
    fn remove_all(&mut self, id: &str) -> Result<usize, HostError>;

    /// Append the overlay subtree to the document body
    fn mount_overlay(&mut self, overlay: &OverlayMarkup) -> Result<(), HostError>;

    fn focus(&mut self, id: &str) -> Result<(), HostError>;

    /// Replace the current document location
    fn navigate(&mut self, url: &str) -> Result<(), HostError>;

    /// Next pending document event, if any
    fn poll_event(&mut self) -> Option<DocumentEvent>;
}
