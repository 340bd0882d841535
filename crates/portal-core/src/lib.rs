//! Portal Core - host-agnostic interaction behavior for 3D scene entities
//!
//! An entity carrying an [`InteractionBehavior`] is highlighted while the
//! pointer hovers it, navigates or opens an overlay frame when activated, and
//! can optionally be grabbed and kept within reach of the viewer.
//!
//! - Capability traits for the scene graph and the browser document
//! - Original-color bookkeeping for hover tinting
//! - Overlay markup and the one-shot session exit subscription
//! - Scene manifest loading

pub mod behavior;
pub mod color;
pub mod color_table;
pub mod config;
pub mod error;
pub mod frame;
pub mod grab;
pub mod host;
pub mod manifest;
pub mod memory;
pub mod overlay;

pub use behavior::{InteractionBehavior, Propagation, Signal};
pub use color::Rgba;
pub use color_table::OriginalColorTable;
pub use config::{ImmersiveAction, InteractionConfig, ReenterPolicy};
pub use error::{ColorError, ConfigError, HostError, ManifestError};
pub use frame::{SceneFrame, SceneRequest};
pub use host::{Capability, DocumentEvent, DocumentHost, ImmersiveKind, NodeId, SceneHost};
pub use manifest::{PortalShape, PortalSpec, SceneManifest};
pub use memory::MemoryDocument;
pub use overlay::{OneShot, OverlayMarkup, OverlayPhase, OVERLAY_ID, STYLE_ID};
