//! An "achievement unlocked" badge for Streamlit components.
//!
//! The platform independent core lives in [achievement]: requests coming from the host are run
//! through an admission guard, resolved to a render target, and driven through an enter, hold and
//! exit lifecycle by [achievement::AchievementController]. On `wasm32` the [web] module binds that
//! controller to the DOM, browser timers and the Streamlit component bridge.

pub mod achievement;
pub mod config;
pub mod host;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::WidgetConfig;
