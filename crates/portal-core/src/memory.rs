//! In-process document host
//!
//! Models the parts of a browser document the behavior touches: a flat list
//! of body children, the focused element, and the location. Used for native
//! runs where there is no browser, and as the document in tests.

use std::collections::VecDeque;

use crate::error::HostError;
use crate::host::{DocumentEvent, DocumentHost};
use crate::overlay::{OverlayMarkup, OVERLAY_ID};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryElement {
    Style { id: String, css: String },
    Overlay(OverlayMarkup),
}

impl MemoryElement {
    pub fn id(&self) -> &str {
        match self {
            MemoryElement::Style { id, .. } => id,
            MemoryElement::Overlay(_) => OVERLAY_ID,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<MemoryElement>,
    focused: Option<String>,
    location: Option<String>,
    /// Every location the document was sent to, oldest first
    history: Vec<String>,
    events: VecDeque<DocumentEvent>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[MemoryElement] {
        &self.elements
    }

    /// Number of elements carrying `id`
    pub fn count(&self, id: &str) -> usize {
        self.elements.iter().filter(|e| e.id() == id).count()
    }

    /// The live overlay, if exactly one exists
    pub fn overlay(&self) -> Option<&OverlayMarkup> {
        let mut overlays = self.elements.iter().filter_map(|e| match e {
            MemoryElement::Overlay(o) => Some(o),
            _ => None,
        });
        let first = overlays.next();
        if overlays.next().is_some() {
            return None;
        }
        first
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Simulate a click on the overlay's close control
    pub fn click_close(&mut self) -> bool {
        match self.overlay().map(|o| o.owner) {
            Some(owner) => {
                self.events.push_back(DocumentEvent::OverlayClosed { owner });
                true
            }
            None => false,
        }
    }
}

impl DocumentHost for MemoryDocument {
    fn contains(&self, id: &str) -> bool {
        self.elements.iter().any(|e| e.id() == id)
    }

    fn insert_style(&mut self, id: &str, css: &str) -> Result<(), HostError> {
        self.elements.push(MemoryElement::Style {
            id: id.to_string(),
            css: css.to_string(),
        });
        Ok(())
    }

    fn remove_all(&mut self, id: &str) -> Result<usize, HostError> {
        let before = self.elements.len();
        self.elements.retain(|e| e.id() != id);
        if self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        Ok(before - self.elements.len())
    }

    fn mount_overlay(&mut self, overlay: &OverlayMarkup) -> Result<(), HostError> {
        self.elements.push(MemoryElement::Overlay(overlay.clone()));
        Ok(())
    }

    fn focus(&mut self, id: &str) -> Result<(), HostError> {
        self.focused = Some(id.to_string());
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<(), HostError> {
        self.location = Some(url.to_string());
        self.history.push(url.to_string());
        Ok(())
    }

    fn poll_event(&mut self) -> Option<DocumentEvent> {
        self.events.pop_front()
    }
}
