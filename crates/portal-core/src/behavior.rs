//! Hover highlight, action dispatch, overlay flow, and grab clamp for one entity

use tracing::{debug, info, warn};

use crate::color_table::OriginalColorTable;
use crate::config::{ImmersiveAction, InteractionConfig, ReenterPolicy};
use crate::grab::{clamp_to_radius, GRAB_RADIUS};
use crate::host::{Capability, DocumentHost, ImmersiveKind, SceneHost};
use crate::overlay::{style_css, OneShot, OverlayMarkup, OverlayPhase, OVERLAY_ID, STYLE_ID};

/// A stimulus delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    PointerEnter,
    PointerLeave,
    /// A named UI event (`click`, `mousedown`, ...)
    Event(String),
    /// Controller trigger pressed; `intersects` is true when the controller
    /// ray currently hits this entity
    TriggerDown { intersects: bool },
    /// The entity's model finished loading
    ModelReady,
    /// The host confirmed the immersive session ended
    ImmersiveExited,
    /// The overlay's close control was activated
    OverlayClosed,
    /// One simulation step
    Tick,
}

/// Whether a stimulus should keep reaching other handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

#[derive(Debug, Clone)]
pub struct InteractionBehavior {
    id: u64,
    config: InteractionConfig,
    original_colors: OriginalColorTable,
    phase: OverlayPhase,
    exit_listener: OneShot<OverlayMarkup>,
    /// Session that was active when the overlay was requested
    opened_from: Option<ImmersiveKind>,
    /// Nodes currently carry the hover tint
    hovered: bool,
}

impl InteractionBehavior {
    /// Attach to an entity: snapshot colors, request capabilities, and make
    /// sure the overlay style block exists when overlays are used.
    pub fn attach(
        id: u64,
        config: InteractionConfig,
        scene: &mut dyn SceneHost,
        document: &mut dyn DocumentHost,
    ) -> Self {
        let mut behavior = Self {
            id,
            config,
            original_colors: OriginalColorTable::new(),
            phase: OverlayPhase::Closed,
            exit_listener: OneShot::new(),
            opened_from: None,
            hovered: false,
        };

        behavior.snapshot_colors(scene);

        if behavior.config.grabbable {
            scene.add_capability(Capability::Grabbable);
        }

        if behavior.config.open_in_iframe {
            mount_styles(document);
        }

        debug!(
            id,
            url = %behavior.config.target,
            event = %behavior.config.event,
            "Interaction behavior attached"
        );
        behavior
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    pub fn original_colors(&self) -> &OriginalColorTable {
        &self.original_colors
    }

    /// Whether an overlay is waiting for the session exit confirmation
    pub fn is_awaiting_exit(&self) -> bool {
        self.exit_listener.is_armed()
    }

    /// Route a host stimulus to the matching handler
    pub fn dispatch(
        &mut self,
        signal: &Signal,
        scene: &mut dyn SceneHost,
        document: &mut dyn DocumentHost,
    ) -> Propagation {
        match signal {
            Signal::PointerEnter => self.hover_enter(scene),
            Signal::PointerLeave => self.hover_leave(scene),
            Signal::Event(name) if *name == self.config.event => {
                return self.trigger_action(scene, document);
            }
            Signal::Event(_) => {}
            Signal::TriggerDown { intersects: true } => {
                return self.trigger_action(scene, document);
            }
            Signal::TriggerDown { intersects: false } => {}
            Signal::ModelReady => self.snapshot_colors(scene),
            Signal::ImmersiveExited => self.on_immersive_exited(document),
            Signal::OverlayClosed => self.close_overlay(scene, document),
            Signal::Tick => {
                self.clamp_grab(scene);
            }
        }
        Propagation::Continue
    }

    /// Record the current color of every colored visual node, overwriting
    /// earlier records.
    ///
    /// While hovered, nodes already on record hold the tint, so only new
    /// nodes are recorded; they are tinted to match the rest.
    pub fn snapshot_colors(&mut self, scene: &mut dyn SceneHost) {
        let hover = self.config.hover_color;
        for node in scene.visual_nodes() {
            let Some(color) = scene.node_color(node) else {
                continue;
            };
            if !self.hovered {
                self.original_colors.store(node, Some(color));
            } else if self.original_colors.record_if_absent(node, Some(color)) {
                scene.set_node_color(node, hover);
            }
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn hover_enter(&mut self, scene: &mut dyn SceneHost) {
        let hover = self.config.hover_color;
        self.hovered = true;
        for node in scene.visual_nodes() {
            let current = scene.node_color(node);
            self.original_colors.record_if_absent(node, current);
            if current.is_some() {
                scene.set_node_color(node, hover);
            }
        }
    }

    pub fn hover_leave(&mut self, scene: &mut dyn SceneHost) {
        self.hovered = false;
        for node in scene.visual_nodes() {
            if let Some(original) = self.original_colors.original(node) {
                scene.set_node_color(node, original);
            }
        }
    }

    /// Run the configured action: overlay or navigation
    pub fn trigger_action(
        &mut self,
        scene: &mut dyn SceneHost,
        document: &mut dyn DocumentHost,
    ) -> Propagation {
        if let Some(kind) = scene.immersive_mode() {
            if self.config.immersive_action == ImmersiveAction::Suppress {
                debug!(id = self.id, mode = %kind, "Action suppressed during immersive session");
                return Propagation::Stop;
            }
        }

        debug!(id = self.id, "Action triggered");
        if self.config.open_in_iframe {
            self.open_overlay(scene, document);
        } else {
            self.navigate(document);
        }
        Propagation::Stop
    }

    /// Replace the document location with the target. Returns false when no
    /// target is configured.
    pub fn navigate(&self, document: &mut dyn DocumentHost) -> bool {
        if self.config.target.is_empty() {
            warn!(id = self.id, "No target URL specified for navigation");
            return false;
        }
        info!(url = %self.config.target, "Navigating");
        if let Err(e) = document.navigate(&self.config.target) {
            warn!(url = %self.config.target, "Navigation failed: {}", e);
            return false;
        }
        true
    }

    /// Open the overlay, leaving the immersive session first if one is active
    pub fn open_overlay(&mut self, scene: &mut dyn SceneHost, document: &mut dyn DocumentHost) {
        let markup = OverlayMarkup::new(self.id, self.config.target.clone());
        match scene.immersive_mode() {
            Some(kind) => {
                info!(mode = %kind, "Exiting immersive session to open overlay");
                self.opened_from = Some(kind);
                if self.exit_listener.arm(markup) {
                    debug!(id = self.id, "Replaced pending overlay request");
                }
                self.phase = OverlayPhase::AwaitingExit;
                scene.request_exit_immersive();
            }
            None => {
                info!("Opening overlay");
                self.opened_from = None;
                self.mount(&markup, document);
            }
        }
    }

    fn on_immersive_exited(&mut self, document: &mut dyn DocumentHost) {
        if let Some(markup) = self.exit_listener.fire() {
            debug!(id = self.id, "Immersive session exited, mounting overlay");
            self.mount(&markup, document);
        }
    }

    fn mount(&mut self, markup: &OverlayMarkup, document: &mut dyn DocumentHost) {
        clear_overlays(document);
        if let Err(e) = document.mount_overlay(markup) {
            warn!("Failed to mount overlay: {}", e);
            self.phase = OverlayPhase::Closed;
            return;
        }
        if let Err(e) = document.focus(OVERLAY_ID) {
            warn!("Failed to focus overlay: {}", e);
        }
        self.phase = OverlayPhase::Open;
    }

    /// Remove the overlay, re-enter the immersive session per policy, and
    /// hand focus back to the scene
    pub fn close_overlay(&mut self, scene: &mut dyn SceneHost, document: &mut dyn DocumentHost) {
        if self.phase != OverlayPhase::Open {
            debug!(id = self.id, phase = ?self.phase, "Close ignored, overlay not open");
            return;
        }
        clear_overlays(document);
        self.phase = OverlayPhase::Closed;

        let reenter = match (self.config.reenter, self.opened_from) {
            (_, Some(kind)) => Some(kind),
            (ReenterPolicy::Always, None) => Some(ImmersiveKind::Vr),
            (ReenterPolicy::Previous, None) => None,
        };
        if let Some(kind) = reenter {
            info!(mode = %kind, "Returning to immersive session");
            scene.request_enter_immersive(kind);
        }
        self.opened_from = None;
        scene.focus_scene();
    }

    /// Keep a grabbed entity within [`GRAB_RADIUS`] of the viewer. Returns
    /// true if the entity was moved.
    pub fn clamp_grab(&self, scene: &mut dyn SceneHost) -> bool {
        if !self.config.grabbable || !scene.is_grabbed() {
            return false;
        }
        let Some(viewer) = scene.viewer_position() else {
            return false;
        };
        match clamp_to_radius(viewer, scene.entity_position(), GRAB_RADIUS) {
            Some(clamped) => {
                scene.set_entity_position(clamped);
                true
            }
            None => false,
        }
    }
}

/// Insert the overlay style block unless it is already present
pub fn mount_styles(document: &mut dyn DocumentHost) {
    if document.contains(STYLE_ID) {
        return;
    }
    if let Err(e) = document.insert_style(STYLE_ID, &style_css()) {
        warn!("Failed to insert overlay styles: {}", e);
    }
}

fn clear_overlays(document: &mut dyn DocumentHost) {
    match document.remove_all(OVERLAY_ID) {
        Ok(0) => {}
        Ok(n) => debug!(removed = n, "Removed stale overlay"),
        Err(e) => warn!("Failed to remove overlay: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::frame::{SceneFrame, SceneRequest};
    use crate::host::NodeId;
    use crate::memory::MemoryDocument;
    use glam::Vec3;

    const RED: Rgba = Rgba::rgb(1.0, 0.0, 0.0);
    const BLUE: Rgba = Rgba::rgb(0.0, 0.0, 1.0);

    fn scene() -> SceneFrame {
        SceneFrame::new()
            .with_node(NodeId(1), Some(RED))
            .with_node(NodeId(2), Some(BLUE))
            .with_node(NodeId(3), None)
    }

    fn attach(attr: &str, scene: &mut SceneFrame, doc: &mut MemoryDocument) -> InteractionBehavior {
        let config = InteractionConfig::from_attribute(attr).unwrap();
        InteractionBehavior::attach(1, config, scene, doc)
    }

    #[test]
    fn test_hover_round_trip() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("hoverColor: white", &mut scene, &mut doc);

        for _ in 0..3 {
            behavior.dispatch(&Signal::PointerEnter, &mut scene, &mut doc);
            assert_eq!(scene.color(NodeId(1)), Some(Rgba::WHITE));
            assert_eq!(scene.color(NodeId(2)), Some(Rgba::WHITE));
            assert_eq!(scene.color(NodeId(3)), None);

            behavior.dispatch(&Signal::PointerLeave, &mut scene, &mut doc);
            assert_eq!(scene.color(NodeId(1)), Some(RED));
            assert_eq!(scene.color(NodeId(2)), Some(BLUE));
            assert_eq!(scene.color(NodeId(3)), None);
        }
    }

    #[test]
    fn test_double_enter_keeps_original() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("", &mut scene, &mut doc);

        behavior.hover_enter(&mut scene);
        behavior.hover_enter(&mut scene);
        assert_eq!(behavior.original_colors().original(NodeId(1)), Some(RED));
        assert!(behavior.original_colors().contains(NodeId(3)));

        behavior.hover_leave(&mut scene);
        assert_eq!(scene.color(NodeId(1)), Some(RED));
    }

    #[test]
    fn test_late_nodes_recorded_on_first_hover() {
        let mut scene = SceneFrame::new();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("", &mut scene, &mut doc);
        assert!(behavior.original_colors().is_empty());

        // Model arrives after attach
        scene.nodes.push((NodeId(5), Some(BLUE)));
        behavior.dispatch(&Signal::ModelReady, &mut scene, &mut doc);
        assert_eq!(behavior.original_colors().original(NodeId(5)), Some(BLUE));

        scene.nodes.push((NodeId(6), Some(RED)));
        behavior.hover_enter(&mut scene);
        behavior.hover_leave(&mut scene);
        assert_eq!(scene.color(NodeId(5)), Some(BLUE));
        assert_eq!(scene.color(NodeId(6)), Some(RED));
    }

    #[test]
    fn test_model_ready_while_hovered_keeps_originals() {
        let mut scene = SceneFrame::new().with_node(NodeId(1), Some(RED));
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("", &mut scene, &mut doc);

        behavior.dispatch(&Signal::PointerEnter, &mut scene, &mut doc);
        assert!(behavior.is_hovered());

        // a mesh that arrives with the model while the pointer rests on it
        scene.nodes.push((NodeId(2), Some(BLUE)));
        behavior.dispatch(&Signal::ModelReady, &mut scene, &mut doc);
        assert_eq!(behavior.original_colors().original(NodeId(1)), Some(RED));
        assert_eq!(behavior.original_colors().original(NodeId(2)), Some(BLUE));
        assert_eq!(scene.color(NodeId(2)), Some(Rgba::YELLOW));

        behavior.dispatch(&Signal::PointerLeave, &mut scene, &mut doc);
        assert!(!behavior.is_hovered());
        assert_eq!(scene.color(NodeId(1)), Some(RED));
        assert_eq!(scene.color(NodeId(2)), Some(BLUE));
    }

    #[test]
    fn test_leave_without_record_is_noop() {
        let mut scene = SceneFrame::new();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("", &mut scene, &mut doc);
        scene.nodes.push((NodeId(8), Some(RED)));
        behavior.hover_leave(&mut scene);
        assert!(scene.dirty.is_empty());
    }

    #[test]
    fn test_action_navigates() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com; openInIframe: false", &mut scene, &mut doc);

        let flow = behavior.dispatch(&Signal::Event("click".to_string()), &mut scene, &mut doc);
        assert_eq!(flow, Propagation::Stop);
        assert_eq!(doc.location(), Some("https://example.com"));
        assert!(!doc.contains(OVERLAY_ID));
    }

    #[test]
    fn test_other_events_ignored() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com; event: mousedown", &mut scene, &mut doc);

        behavior.dispatch(&Signal::Event("click".to_string()), &mut scene, &mut doc);
        behavior.dispatch(&Signal::TriggerDown { intersects: false }, &mut scene, &mut doc);
        assert_eq!(doc.location(), None);

        behavior.dispatch(&Signal::Event("mousedown".to_string()), &mut scene, &mut doc);
        assert_eq!(doc.location(), Some("https://example.com"));
    }

    #[test]
    fn test_trigger_with_intersection_runs_action() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com", &mut scene, &mut doc);
        behavior.dispatch(&Signal::TriggerDown { intersects: true }, &mut scene, &mut doc);
        assert_eq!(doc.history(), &["https://example.com".to_string()]);
    }

    #[test]
    fn test_navigate_without_target() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let behavior = attach("", &mut scene, &mut doc);
        assert!(!behavior.navigate(&mut doc));
        assert_eq!(doc.location(), None);
    }

    #[test]
    fn test_action_suppressed_while_immersive() {
        for attr in ["target: https://example.com", "target: https://example.com; openInIframe"] {
            let mut scene = scene();
            scene.immersive = Some(ImmersiveKind::Vr);
            let mut doc = MemoryDocument::new();
            let mut behavior = attach(attr, &mut scene, &mut doc);

            let flow = behavior.dispatch(&Signal::Event("click".to_string()), &mut scene, &mut doc);
            assert_eq!(flow, Propagation::Stop);
            assert_eq!(doc.location(), None);
            assert!(!doc.contains(OVERLAY_ID));
            assert!(scene.requests.is_empty());
        }
    }

    #[test]
    fn test_overlay_from_flat_scene() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com; openInIframe: true", &mut scene, &mut doc);
        assert_eq!(doc.count(STYLE_ID), 1);

        behavior.dispatch(&Signal::Event("click".to_string()), &mut scene, &mut doc);
        assert_eq!(doc.overlay().map(|o| o.src.as_str()), Some("https://example.com"));
        assert_eq!(doc.focused(), Some(OVERLAY_ID));
        assert_eq!(behavior.phase(), OverlayPhase::Open);
        assert_eq!(doc.location(), None);
    }

    #[test]
    fn test_overlay_reopen_keeps_single_instance() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com; openInIframe: true", &mut scene, &mut doc);

        behavior.open_overlay(&mut scene, &mut doc);
        behavior.open_overlay(&mut scene, &mut doc);
        assert_eq!(doc.count(OVERLAY_ID), 1);
    }

    #[test]
    fn test_styles_inserted_once() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        attach("openInIframe: true", &mut scene, &mut doc);
        let mut other = SceneFrame::new();
        InteractionBehavior::attach(2, InteractionConfig::from_attribute("openInIframe").unwrap(), &mut other, &mut doc);
        assert_eq!(doc.count(STYLE_ID), 1);

        let mut plain = MemoryDocument::new();
        attach("target: x", &mut scene, &mut plain);
        assert_eq!(plain.count(STYLE_ID), 0);
    }

    #[test]
    fn test_overlay_waits_for_session_exit() {
        let mut scene = scene();
        scene.immersive = Some(ImmersiveKind::Vr);
        let mut doc = MemoryDocument::new();
        let mut behavior = attach(
            "target: https://example.com; openInIframe: true; immersiveAction: allow",
            &mut scene,
            &mut doc,
        );

        behavior.dispatch(&Signal::Event("click".to_string()), &mut scene, &mut doc);
        assert_eq!(scene.requests, vec![SceneRequest::ExitImmersive]);
        assert!(!doc.contains(OVERLAY_ID));
        assert!(behavior.is_awaiting_exit());
        assert_eq!(behavior.phase(), OverlayPhase::AwaitingExit);

        scene.immersive = None;
        behavior.dispatch(&Signal::ImmersiveExited, &mut scene, &mut doc);
        assert_eq!(doc.count(OVERLAY_ID), 1);
        assert_eq!(doc.overlay().map(|o| o.src.as_str()), Some("https://example.com"));
        assert!(!behavior.is_awaiting_exit());

        // The subscription is spent
        doc.remove_all(OVERLAY_ID).unwrap();
        behavior.dispatch(&Signal::ImmersiveExited, &mut scene, &mut doc);
        assert!(!doc.contains(OVERLAY_ID));
    }

    #[test]
    fn test_close_returns_to_previous_session_kind() {
        let mut scene = scene();
        scene.immersive = Some(ImmersiveKind::Ar);
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: https://example.com; openInIframe", &mut scene, &mut doc);

        behavior.open_overlay(&mut scene, &mut doc);
        scene.immersive = None;
        behavior.dispatch(&Signal::ImmersiveExited, &mut scene, &mut doc);
        scene.clear_output();

        assert!(doc.click_close());
        let event = doc.poll_event().unwrap();
        assert_eq!(event, crate::host::DocumentEvent::OverlayClosed { owner: 1 });
        behavior.dispatch(&Signal::OverlayClosed, &mut scene, &mut doc);

        assert!(!doc.contains(OVERLAY_ID));
        assert_eq!(
            scene.requests,
            vec![SceneRequest::EnterImmersive(ImmersiveKind::Ar), SceneRequest::FocusScene]
        );
        assert_eq!(behavior.phase(), OverlayPhase::Closed);
    }

    #[test]
    fn test_reenter_policies_from_flat_scene() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut always = attach("target: a; openInIframe", &mut scene, &mut doc);
        always.open_overlay(&mut scene, &mut doc);
        always.close_overlay(&mut scene, &mut doc);
        assert_eq!(
            scene.requests,
            vec![SceneRequest::EnterImmersive(ImmersiveKind::Vr), SceneRequest::FocusScene]
        );

        let mut scene = self::scene();
        let mut previous = attach("target: a; openInIframe; reenter: previous", &mut scene, &mut doc);
        previous.open_overlay(&mut scene, &mut doc);
        previous.close_overlay(&mut scene, &mut doc);
        assert_eq!(scene.requests, vec![SceneRequest::FocusScene]);
    }

    #[test]
    fn test_close_ignored_when_not_open() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("target: a; openInIframe", &mut scene, &mut doc);
        behavior.dispatch(&Signal::OverlayClosed, &mut scene, &mut doc);
        assert!(scene.requests.is_empty());
    }

    #[test]
    fn test_grabbable_requests_capability() {
        let mut scene = scene();
        let mut doc = MemoryDocument::new();
        attach("grabbable: true", &mut scene, &mut doc);
        assert_eq!(scene.requests, vec![SceneRequest::AddCapability(Capability::Grabbable)]);
    }

    #[test]
    fn test_grab_clamp_tick() {
        let mut scene = SceneFrame::new()
            .with_viewer(Vec3::new(0.0, 1.6, 0.0))
            .with_position(Vec3::new(0.0, 1.6, -3.0));
        let mut doc = MemoryDocument::new();
        let mut behavior = attach("grabbable", &mut scene, &mut doc);

        // Not grabbed: nothing moves
        behavior.dispatch(&Signal::Tick, &mut scene, &mut doc);
        assert!(!scene.moved);

        scene.grabbed = true;
        behavior.dispatch(&Signal::Tick, &mut scene, &mut doc);
        assert!(scene.moved);
        assert!((scene.position - Vec3::new(0.0, 1.6, -0.5)).length() < 1e-5);

        // Viewer walks away, clamp follows on the next step
        scene.viewer = Some(Vec3::new(2.0, 1.6, 0.0));
        behavior.dispatch(&Signal::Tick, &mut scene, &mut doc);
        let viewer = scene.viewer.unwrap();
        assert!(((scene.position - viewer).length() - GRAB_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn test_grab_clamp_requires_grabbable_and_viewer() {
        let mut scene = SceneFrame::new().with_position(Vec3::new(0.0, 0.0, -3.0));
        scene.grabbed = true;
        let mut doc = MemoryDocument::new();

        let plain = attach("", &mut scene, &mut doc);
        scene.viewer = Some(Vec3::ZERO);
        assert!(!plain.clamp_grab(&mut scene));

        let grabbable = attach("grabbable", &mut scene, &mut doc);
        scene.viewer = None;
        assert!(!grabbable.clamp_grab(&mut scene));
        scene.viewer = Some(Vec3::new(0.0, 0.0, -2.8));
        assert!(!grabbable.clamp_grab(&mut scene));
    }
}
