use super::dom::describe;
use crate::achievement::request::RenderArgs;
use crate::host::{Completion, Host, HostError};
use js_sys::{Array, Function, JSON, Object, Reflect};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CustomEvent, Event, EventTarget};

const STREAMLIT_GLOBAL: &str = "Streamlit";
const DEFAULT_RENDER_EVENT: &str = "streamlit:render";

/// The Streamlit component bridge exposed by `streamlit-component-lib`.
pub(crate) struct StreamlitHost;

impl StreamlitHost {
    fn call(method: &'static str, args: &Array) -> Result<(), HostError> {
        let streamlit = streamlit()?;
        let function: Function = Reflect::get(&streamlit, &JsValue::from_str(method))
            .map_err(|e| HostError::CallFailed(method, describe(&e)))?
            .dyn_into()
            .map_err(|_| HostError::CallFailed(method, "not a function".into()))?;
        function.apply(&streamlit, args).map_err(|e| HostError::CallFailed(method, describe(&e)))?;
        Ok(())
    }
}

impl Host for StreamlitHost {
    fn component_ready(&mut self) -> Result<(), HostError> {
        Self::call("setComponentReady", &Array::new())
    }

    fn set_frame_height(&mut self, height: u32) -> Result<(), HostError> {
        Self::call("setFrameHeight", &Array::of1(&JsValue::from(height)))
    }

    fn send_completion(&mut self, completion: &Completion) -> Result<(), HostError> {
        let json = serde_json::to_string(completion)?;
        let value = JSON::parse(&json).map_err(|e| HostError::CallFailed("setComponentValue", describe(&e)))?;
        Self::call("setComponentValue", &Array::of1(&value))
    }
}

/// Call `on_render` with the arguments of every render event the host sends.
pub(crate) fn listen_for_render(mut on_render: impl FnMut(RenderArgs) + 'static) -> Result<(), HostError> {
    let streamlit = streamlit()?;
    let events: EventTarget = Reflect::get(&streamlit, &JsValue::from_str("events"))
        .map_err(|e| HostError::Unavailable(describe(&e)))?
        .dyn_into()
        .map_err(|_| HostError::Unavailable("Streamlit.events is not an event target".into()))?;
    let event_name = Reflect::get(&streamlit, &JsValue::from_str("RENDER_EVENT"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| DEFAULT_RENDER_EVENT.to_string());

    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| match render_args(&event) {
        Ok(args) => on_render(args),
        Err(e) => warn!("ignoring render event: {e}"),
    });
    events
        .add_event_listener_with_callback(&event_name, listener.as_ref().unchecked_ref())
        .map_err(|e| HostError::CallFailed("addEventListener", describe(&e)))?;
    listener.forget();
    Ok(())
}

fn render_args(event: &Event) -> Result<RenderArgs, HostError> {
    let Some(detail) = event.dyn_ref::<CustomEvent>().map(CustomEvent::detail) else {
        return Ok(RenderArgs::default());
    };
    let args = Reflect::get(&detail, &JsValue::from_str("args")).unwrap_or(JsValue::UNDEFINED);
    if args.is_undefined() || args.is_null() {
        return Ok(RenderArgs::default());
    }
    let json = JSON::stringify(&args)
        .map_err(|e| HostError::CallFailed("JSON.stringify", describe(&e)))?
        .as_string()
        .unwrap_or_default();
    Ok(serde_json::from_str(&json)?)
}

fn streamlit() -> Result<Object, HostError> {
    let window = web_sys::window().ok_or_else(|| HostError::Unavailable("no window".into()))?;
    let streamlit = Reflect::get(&window, &JsValue::from_str(STREAMLIT_GLOBAL))
        .map_err(|e| HostError::Unavailable(describe(&e)))?;
    if streamlit.is_undefined() || streamlit.is_null() {
        return Err(HostError::Unavailable(format!("{STREAMLIT_GLOBAL} is not defined")));
    }
    Ok(streamlit.unchecked_into())
}
