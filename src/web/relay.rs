use super::dom::{DomSurface, describe, dom_error};
use crate::achievement::relay::{
    ListenerSlot, RelayError, RelayPort, RelayReceiver, install_listener_once, register_listener,
};
use crate::achievement::surface::SurfaceError;
use crate::achievement::target::{AccessError, HostDocumentProbe};
use js_sys::{Function, JSON, Object, Reflect};
use tracing::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, MessageEvent, Window};

/// Property of the host window holding the live relay listener.
const LISTENER_MARKER: &str = "__streamlitAchievementRelay";

fn parent_window() -> Result<Window, AccessError> {
    let window = web_sys::window().ok_or(AccessError::NotEmbedded)?;
    let parent = window
        .parent()
        .map_err(|e| AccessError::Denied(describe(&e)))?
        .ok_or(AccessError::NotEmbedded)?;
    if Object::is(&parent, &window) {
        return Err(AccessError::NotEmbedded);
    }
    Ok(parent)
}

// Reading `document` off a cross-origin window throws, which is what tells us access is denied.
fn parent_document(parent: &Window) -> Result<Document, AccessError> {
    let document =
        Reflect::get(parent, &JsValue::from_str("document")).map_err(|e| AccessError::Denied(describe(&e)))?;
    document.dyn_into().map_err(|_| AccessError::Denied("host document unavailable".into()))
}

/// Grants relaying when the host document is reachable and the host listener is in place.
pub(crate) struct ParentDocumentProbe;

impl HostDocumentProbe for ParentDocumentProbe {
    fn probe(&self) -> Result<(), AccessError> {
        let parent = parent_window()?;
        let document = parent_document(&parent)?;
        install_listener_once(|| install_host_listener(&parent, document))
            .map_err(|e| AccessError::Denied(format!("cannot install relay listener: {e}")))
    }
}

fn install_host_listener(parent: &Window, document: Document) -> Result<(), SurfaceError> {
    let origin = parent.location().origin().map_err(dom_error)?;
    let mut receiver = RelayReceiver::new(DomSurface::page(document), origin);
    let listener = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
        let Some(json) = JSON::stringify(&event.data()).ok().and_then(|json| json.as_string()) else {
            return;
        };
        if let Err(e) = receiver.receive(&event.origin(), &json) {
            warn!("failed to apply relayed achievement: {e}");
        }
    });
    // Owned by the host window from here on, until a later widget instance detaches it.
    let listener: Function = listener.into_js_value().unchecked_into();
    let registration = register_listener(&mut HostWindowSlot { parent }, listener)?;
    info!("relay listener on host page {registration}");
    Ok(())
}

/// The relay listener recorded under [LISTENER_MARKER] on the host window.
struct HostWindowSlot<'a> {
    parent: &'a Window,
}

impl ListenerSlot for HostWindowSlot<'_> {
    type Listener = Function;

    fn current(&self) -> Option<Function> {
        Reflect::get(self.parent, &JsValue::from_str(LISTENER_MARKER)).ok()?.dyn_into().ok()
    }

    fn attach(&mut self, listener: &Function) -> Result<(), SurfaceError> {
        self.parent.add_event_listener_with_callback("message", listener).map_err(dom_error)?;
        Reflect::set(self.parent, &JsValue::from_str(LISTENER_MARKER), listener).map_err(dom_error)?;
        Ok(())
    }

    fn detach(&mut self, listener: &Function) -> Result<(), SurfaceError> {
        self.parent.remove_event_listener_with_callback("message", listener).map_err(dom_error)
    }
}

/// Posts relay messages to the host window, restricted to our own origin.
pub(crate) struct ParentWindowPort;

impl RelayPort for ParentWindowPort {
    fn post(&self, message: &str) -> Result<(), RelayError> {
        let parent = parent_window().map_err(|e| RelayError::PostFailed(e.to_string()))?;
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .ok_or_else(|| RelayError::PostFailed("unknown origin".into()))?;
        let value = JSON::parse(message).map_err(|e| RelayError::PostFailed(describe(&e)))?;
        parent.post_message(&value, &origin).map_err(|e| RelayError::PostFailed(describe(&e)))
    }
}
