//! Portal Scene - Bevy binding for portal interaction behavior
//!
//! Entities spawned with a [`PortalConfig`] are attached on the next update.
//! From then on pointer picking, the controller trigger, immersive session
//! changes, and overlay close events are routed to their behavior through
//! [`PortalHost`].

pub mod components;
pub mod host;
pub mod picking;
pub mod session;
pub mod spawn;
mod systems;
pub mod viewer;

use bevy::prelude::*;

pub use components::{
    Grabbable, Grabbed, Hovered, ModelLoaded, NodeMaterials, Portal, PortalConfig, PortalDocument,
    PortalSettings, Viewer,
};
pub use host::PortalHost;
pub use session::{ImmersiveSession, SessionRequest, SessionTransition};
pub use spawn::PortalManifest;
pub use viewer::ViewerSettings;

/// Plugin that attaches and drives portal behaviors.
///
/// Expects picking plugins to be added by the application.
pub struct PortalScenePlugin;

impl Plugin for PortalScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PortalDocument>()
            .init_resource::<PortalSettings>()
            .init_resource::<PortalManifest>()
            .init_resource::<NodeMaterials>()
            .init_resource::<ImmersiveSession>()
            .init_resource::<ViewerSettings>()
            .add_systems(Startup, (viewer::setup_viewer, spawn::spawn_portals))
            .add_systems(
                Update,
                (
                    systems::attach_portals,
                    systems::detect_model_ready,
                    session::session_keys,
                    systems::controller_trigger,
                    session::advance_session,
                    systems::poll_document_events,
                    viewer::move_viewer,
                    systems::clamp_grabbed_portals,
                    systems::prune_node_materials,
                )
                    .chain(),
            );
    }
}
