//! Buffered scene view
//!
//! An engine binding fills a [`SceneFrame`] with the state of one entity,
//! lets the behavior run against it, and then applies what was written back:
//! changed node colors, a moved entity, and host requests.

use glam::Vec3;

use crate::color::Rgba;
use crate::host::{Capability, ImmersiveKind, NodeId, SceneHost};

/// Host call recorded by a [`SceneFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRequest {
    ExitImmersive,
    EnterImmersive(ImmersiveKind),
    FocusScene,
    AddCapability(Capability),
}

#[derive(Debug, Clone, Default)]
pub struct SceneFrame {
    /// Visual nodes with their current colors
    pub nodes: Vec<(NodeId, Option<Rgba>)>,
    pub immersive: Option<ImmersiveKind>,
    pub grabbed: bool,
    pub viewer: Option<Vec3>,
    pub position: Vec3,
    /// Nodes whose color was written, in write order
    pub dirty: Vec<NodeId>,
    pub moved: bool,
    pub requests: Vec<SceneRequest>,
}

impl SceneFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, node: NodeId, color: Option<Rgba>) -> Self {
        self.nodes.push((node, color));
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_viewer(mut self, viewer: Vec3) -> Self {
        self.viewer = Some(viewer);
        self
    }

    /// Current color of a node known to this frame
    pub fn color(&self, node: NodeId) -> Option<Rgba> {
        self.nodes
            .iter()
            .find(|(id, _)| *id == node)
            .and_then(|(_, color)| *color)
    }

    /// Whether anything must be written back to the engine
    pub fn has_output(&self) -> bool {
        !self.dirty.is_empty() || self.moved || !self.requests.is_empty()
    }

    /// Forget outputs, keeping the current state for the next dispatch
    pub fn clear_output(&mut self) {
        self.dirty.clear();
        self.moved = false;
        self.requests.clear();
    }
}

impl SceneHost for SceneFrame {
    fn visual_nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|(id, _)| *id).collect()
    }

    fn node_color(&self, node: NodeId) -> Option<Rgba> {
        self.color(node)
    }

    fn set_node_color(&mut self, node: NodeId, color: Rgba) {
        if let Some(entry) = self.nodes.iter_mut().find(|(id, _)| *id == node) {
            entry.1 = Some(color);
            if !self.dirty.contains(&node) {
                self.dirty.push(node);
            }
        }
    }

    fn immersive_mode(&self) -> Option<ImmersiveKind> {
        self.immersive
    }

    fn request_exit_immersive(&mut self) {
        self.requests.push(SceneRequest::ExitImmersive);
    }

    fn request_enter_immersive(&mut self, kind: ImmersiveKind) {
        self.requests.push(SceneRequest::EnterImmersive(kind));
    }

    fn focus_scene(&mut self) {
        self.requests.push(SceneRequest::FocusScene);
    }

    fn add_capability(&mut self, capability: Capability) {
        self.requests.push(SceneRequest::AddCapability(capability));
    }

    fn is_grabbed(&self) -> bool {
        self.grabbed
    }

    fn viewer_position(&self) -> Option<Vec3> {
        self.viewer
    }

    fn entity_position(&self) -> Vec3 {
        self.position
    }

    fn set_entity_position(&mut self, position: Vec3) {
        self.position = position;
        self.moved = true;
    }
}
