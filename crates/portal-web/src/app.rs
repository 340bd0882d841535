//! Bevy application setup

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use portal_core::SceneManifest;
use portal_scene::{PortalDocument, PortalManifest, PortalScenePlugin, PortalSettings};

/// Manifest bundled with the browser build
const EMBEDDED_SCENE: &str = include_str!("../assets/scene.toml");

pub fn embedded_manifest() -> Result<SceneManifest> {
    SceneManifest::from_str_toml(EMBEDDED_SCENE).context("Failed to parse embedded scene manifest")
}

/// Build the app for a manifest and a document host
pub fn build(manifest: SceneManifest, document: PortalDocument) -> App {
    let mut app = App::new();
    app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.15)))
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Portals".to_string(),
                        canvas: Some(manifest.canvas.clone()),
                        fit_canvas_to_parent: true,
                        prevent_default_event_handling: false,
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: "".to_string(),
                    meta_check: bevy::asset::AssetMetaCheck::Never,
                    ..default()
                }),
        )
        // MeshPickingPlugin is separate from the defaults and does the 3D raycasts
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .insert_resource(PortalSettings {
            canvas_id: manifest.canvas_id().to_string(),
        })
        .insert_resource(document)
        .insert_resource(PortalManifest(manifest))
        .add_plugins(PortalScenePlugin);
    app
}

/// Run in the browser with the embedded manifest
pub fn run() {
    let manifest = match embedded_manifest() {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!("{:#}", e);
            SceneManifest::default()
        }
    };
    tracing::info!(portals = manifest.portals.len(), "Starting portal scene");
    build(manifest, browser_document()).run();
}

#[cfg(target_arch = "wasm32")]
fn browser_document() -> PortalDocument {
    PortalDocument(Box::new(crate::document::BrowserDocument::new()))
}

#[cfg(not(target_arch = "wasm32"))]
fn browser_document() -> PortalDocument {
    PortalDocument::default()
}
