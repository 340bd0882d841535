//! Browser document host
//!
//! DOM handles are looked up on every call instead of being stored, so the
//! host stays `Send + Sync` and can live in a Bevy resource. The overlay close
//! button pushes into a shared queue that the scene drains each frame.

use portal_core::{DocumentEvent, DocumentHost, HostError, OverlayMarkup};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct BrowserDocument {
    events: Arc<Mutex<VecDeque<DocumentEvent>>>,
}

impl BrowserDocument {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentHost for BrowserDocument {
    fn contains(&self, id: &str) -> bool {
        js_interop::contains(id)
    }

    fn insert_style(&mut self, id: &str, css: &str) -> Result<(), HostError> {
        js_interop::insert_style(id, css)
    }

    fn remove_all(&mut self, id: &str) -> Result<usize, HostError> {
        js_interop::remove_all(id)
    }

    fn mount_overlay(&mut self, overlay: &OverlayMarkup) -> Result<(), HostError> {
        js_interop::mount_overlay(overlay, self.events.clone())
    }

    fn focus(&mut self, id: &str) -> Result<(), HostError> {
        js_interop::focus(id)
    }

    fn navigate(&mut self, url: &str) -> Result<(), HostError> {
        js_interop::navigate(url)
    }

    fn poll_event(&mut self) -> Option<DocumentEvent> {
        self.events.lock().ok()?.pop_front()
    }
}

// ============================================================================
// JavaScript Interop (WASM only)
// ============================================================================

#[cfg(target_arch = "wasm32")]
mod js_interop {
    use super::*;
    use portal_core::overlay::CLOSE_CLASS;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    fn dom_error(op: &str, e: JsValue) -> HostError {
        HostError::Dom(format!("{}: {:?}", op, e))
    }

    fn document() -> Result<Document, HostError> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or(HostError::NoDocument)
    }

    pub fn contains(id: &str) -> bool {
        document()
            .map(|doc| doc.get_element_by_id(id).is_some())
            .unwrap_or(false)
    }

    pub fn insert_style(id: &str, css: &str) -> Result<(), HostError> {
        let document = document()?;
        let style = document
            .create_element("style")
            .map_err(|e| dom_error("create style", e))?;
        style.set_id(id);
        style.set_text_content(Some(css));

        let parent: web_sys::Node = match document.head() {
            Some(head) => head.into(),
            None => document.body().ok_or(HostError::NoDocument)?.into(),
        };
        parent
            .append_child(&style)
            .map_err(|e| dom_error("append style", e))?;
        Ok(())
    }

    pub fn remove_all(id: &str) -> Result<usize, HostError> {
        let document = document()?;
        let mut removed = 0;
        while let Some(element) = document.get_element_by_id(id) {
            element.remove();
            removed += 1;
        }
        Ok(removed)
    }

    pub fn mount_overlay(
        overlay: &OverlayMarkup,
        events: Arc<Mutex<VecDeque<DocumentEvent>>>,
    ) -> Result<(), HostError> {
        let document = document()?;
        let body = document.body().ok_or(HostError::NoDocument)?;

        let holder = document
            .create_element("div")
            .map_err(|e| dom_error("create overlay", e))?;
        holder.set_inner_html(&overlay.to_html());
        let root = holder
            .first_element_child()
            .ok_or_else(|| HostError::Dom("overlay markup is empty".to_string()))?;
        body.append_child(&root)
            .map_err(|e| dom_error("append overlay", e))?;

        let button = root
            .query_selector(&format!(".{}", CLOSE_CLASS))
            .map_err(|e| dom_error("find close button", e))?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let Some(button) = button else {
            tracing::warn!("Overlay has no close button");
            return Ok(());
        };

        let owner = overlay.owner;
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            tracing::debug!(owner, "Overlay close clicked");
            if let Ok(mut queue) = events.lock() {
                queue.push_back(DocumentEvent::OverlayClosed { owner });
            }
        }) as Box<dyn FnMut(_)>);
        button.set_onclick(Some(closure.as_ref().unchecked_ref()));
        closure.forget();

        Ok(())
    }

    pub fn focus(id: &str) -> Result<(), HostError> {
        let element = document()?
            .get_element_by_id(id)
            .ok_or_else(|| HostError::Dom(format!("no element #{}", id)))?;
        let element = element
            .dyn_into::<HtmlElement>()
            .map_err(|_| HostError::Dom(format!("#{} is not focusable", id)))?;
        element.focus().map_err(|e| dom_error("focus", e))
    }

    pub fn navigate(url: &str) -> Result<(), HostError> {
        let window = web_sys::window().ok_or(HostError::NoDocument)?;
        window
            .location()
            .replace(url)
            .map_err(|e| dom_error("navigate", e))
    }
}

// Non-WASM stubs
#[cfg(not(target_arch = "wasm32"))]
mod js_interop {
    use super::*;

    pub fn contains(_id: &str) -> bool {
        false
    }

    pub fn insert_style(_id: &str, _css: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    pub fn remove_all(_id: &str) -> Result<usize, HostError> {
        Err(HostError::NoDocument)
    }

    pub fn mount_overlay(
        _overlay: &OverlayMarkup,
        _events: Arc<Mutex<VecDeque<DocumentEvent>>>,
    ) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    pub fn focus(_id: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }

    pub fn navigate(_url: &str) -> Result<(), HostError> {
        Err(HostError::NoDocument)
    }
}
