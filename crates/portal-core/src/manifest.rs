//! Scene manifest: which portals to spawn and how they behave

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::color::Rgba;
use crate::config::InteractionConfig;
use crate::error::ManifestError;

/// Primitive used for a portal's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalShape {
    #[default]
    Cube,
    Sphere,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalSpec {
    pub name: String,
    #[serde(default)]
    pub shape: PortalShape,
    /// Edge length (cube) or diameter (sphere)
    #[serde(default = "default_size")]
    pub size: f32,
    #[serde(default)]
    pub position: [f32; 3],
    /// Base color of the body
    #[serde(default)]
    pub color: Rgba,
    /// Optional glTF scene to use instead of the primitive
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub interaction: InteractionConfig,
}

fn default_size() -> f32 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Selector of the canvas element that hosts the scene
    #[serde(default = "default_canvas")]
    pub canvas: String,
    #[serde(default, rename = "portal")]
    pub portals: Vec<PortalSpec>,
}

fn default_canvas() -> String {
    "#portal-canvas".to_string()
}

impl Default for SceneManifest {
    fn default() -> Self {
        Self {
            canvas: default_canvas(),
            portals: Vec::new(),
        }
    }
}

impl SceneManifest {
    pub fn from_str_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_str_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let manifest = match ext.as_str() {
            "toml" => Self::from_str_toml(&content)?,
            "json" => Self::from_str_json(&content)?,
            _ => return Err(ManifestError::UnsupportedExtension(ext)),
        };
        info!(path = %path.display(), portals = manifest.portals.len(), "Loaded scene manifest");
        Ok(manifest)
    }

    /// Element id of the canvas, without the leading `#`
    pub fn canvas_id(&self) -> &str {
        self.canvas.trim_start_matches('#')
    }
}
