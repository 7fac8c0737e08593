//! Browser bindings for the achievement widget.

mod dom;
mod relay;
mod streamlit;
mod timers;

use crate::achievement::lifecycle::{AchievementController, RenderTargets};
use crate::achievement::relay::RelaySurface;
use crate::config::WidgetConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Wire the controller to the page and tell Streamlit we're ready.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("achievement widget needs a document"))?;

    let controller = Rc::new_cyclic(|controller| {
        let targets = RenderTargets {
            inline: Box::new(dom::DomSurface::inline(document)),
            relay: Box::new(RelaySurface::new(relay::ParentWindowPort)),
            probe: Box::new(relay::ParentDocumentProbe),
        };
        RefCell::new(AchievementController::new(
            WidgetConfig::default(),
            Box::new(streamlit::StreamlitHost),
            Box::new(timers::TimeoutScheduler::new(controller.clone())),
            targets,
        ))
    });

    let handler = controller.clone();
    streamlit::listen_for_render(move |args| {
        handler.borrow_mut().handle_render(args);
    })
    .map_err(|e| JsValue::from_str(&e.to_string()))?;
    controller.borrow_mut().start();
    Ok(())
}
