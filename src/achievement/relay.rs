//! The message protocol used to render floating badges on the host page.
//!
//! The widget side posts [RelayMessage]s through a [RelayPort]; a listener registered on the host
//! window through a [ListenerSlot] feeds them into a [RelayReceiver], which drives a surface in the
//! host document.

use super::animations::{Frame, Placement};
use super::badge::Badge;
use super::request::{AchievementId, DisplayRequest, Palette, Position};
use super::surface::{Surface, SurfaceError};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use strum::Display;
use tracing::debug;

/// The `type` every relay message is tagged with.
pub const RELAY_MESSAGE_TYPE: &str = "streamlit-achievement";

static LISTENER_INSTALLED: OnceCell<()> = OnceCell::new();

/// Run `install` unless the host-side listener was already installed by this process.
///
/// A failed installation is retried on the next call.
pub fn install_listener_once<E>(install: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
    LISTENER_INSTALLED.get_or_try_init(install).map(|_| ())
}

/// How the host window's relay listener changed when this widget registered its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ListenerRegistration {
    /// There was no listener yet.
    Installed,
    /// A listener left behind by an earlier widget instance was swapped out.
    Replaced,
    /// Our listener was already the live one.
    Kept,
}

/// The host window's record of the relay listener currently receiving messages.
///
/// The listener of a widget whose frame has been torn down never runs again, so the record must
/// always point at a listener owned by a live widget.
pub trait ListenerSlot {
    type Listener: PartialEq;

    /// The listener recorded on the host window, if any.
    fn current(&self) -> Option<Self::Listener>;

    /// Start delivering messages to `listener` and record it as the live one.
    fn attach(&mut self, listener: &Self::Listener) -> Result<(), SurfaceError>;

    /// Stop delivering messages to `listener`.
    fn detach(&mut self, listener: &Self::Listener) -> Result<(), SurfaceError>;
}

/// Make `listener` the only relay listener on the host window.
pub fn register_listener<S: ListenerSlot>(
    slot: &mut S,
    listener: S::Listener,
) -> Result<ListenerRegistration, SurfaceError> {
    let previous = slot.current();
    if previous.as_ref() == Some(&listener) {
        return Ok(ListenerRegistration::Kept);
    }
    slot.attach(&listener)?;
    let Some(previous) = previous else {
        return Ok(ListenerRegistration::Installed);
    };
    if let Err(e) = slot.detach(&previous) {
        debug!("failed to detach previous relay listener: {e}");
    }
    Ok(ListenerRegistration::Replaced)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RelayAction {
    Mount,
    Enter,
    Exit,
    Unmount,
}

/// The display parameters carried by a `mount` message, defaults already resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayPayload {
    pub title: String,
    pub description: String,
    pub points: Option<i64>,
    pub icon_text: String,
    pub duration: u64,
    pub icon_background_color: String,
    pub background_color: String,
    pub text_color: String,
    pub shadow_color: String,
    pub auto_width: bool,
    pub position: Position,
    pub timestamp: i64,
    pub transition_ms: u64,
}

impl RelayPayload {
    pub fn new(badge: &Badge) -> Self {
        let request = badge.request();
        Self {
            title: request.title.clone(),
            description: request.description.clone(),
            points: request.points,
            icon_text: request.icon_text.clone(),
            duration: request.duration_ms,
            icon_background_color: request.palette.icon_background.clone(),
            background_color: request.palette.background.clone(),
            text_color: request.palette.text.clone(),
            shadow_color: request.palette.shadow.clone(),
            auto_width: request.auto_width,
            position: request.position,
            timestamp: request.timestamp,
            transition_ms: badge.transition().as_millis() as u64,
        }
    }

    /// Rebuild the badge on the host side. Relayed badges always float.
    pub fn into_badge(self) -> Badge {
        let request = DisplayRequest {
            title: self.title,
            description: self.description,
            points: self.points,
            icon_text: self.icon_text,
            duration_ms: self.duration,
            palette: Palette {
                icon_background: self.icon_background_color,
                background: self.background_color,
                text: self.text_color,
                shadow: self.shadow_color,
            },
            auto_width: self.auto_width,
            floating: true,
            position: self.position,
            timestamp: self.timestamp,
        };
        Badge::new(&request, Placement::Floating(request.position), Duration::from_millis(self.transition_ms))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub action: RelayAction,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelayPayload>,
}

impl RelayMessage {
    pub fn new(action: RelayAction, id: AchievementId) -> Self {
        Self { kind: RELAY_MESSAGE_TYPE.into(), action, id: id.to_string(), data: None }
    }

    pub fn mount(badge: &Badge) -> Self {
        Self { data: Some(RelayPayload::new(badge)), ..Self::new(RelayAction::Mount, badge.id()) }
    }

    pub fn to_json(&self) -> Result<String, RelayError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a message posted to the host window.
    ///
    /// Returns `Ok(None)` for well formed messages that belong to somebody else.
    pub fn from_json(json: &str) -> Result<Option<Self>, RelayError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("type").and_then(|kind| kind.as_str()) != Some(RELAY_MESSAGE_TYPE) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn achievement_id(&self) -> Result<AchievementId, RelayError> {
        self.id.parse().map_err(|_| RelayError::InvalidId(self.id.clone()))
    }
}

/// Errors that can occur while relaying a badge.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error("malformed relay message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid achievement id '{0}'")]
    InvalidId(String),

    #[error("mount message for '{0}' carries no payload")]
    MissingPayload(String),

    #[error("failed to post relay message: {0}")]
    PostFailed(String),
}

/// Delivers serialized relay messages to the host window.
pub trait RelayPort {
    fn post(&self, message: &str) -> Result<(), RelayError>;
}

/// Widget-side surface that renders by posting messages to the host.
pub struct RelaySurface<P> {
    port: P,
    attached: HashSet<AchievementId>,
}

impl<P: RelayPort> RelaySurface<P> {
    pub fn new(port: P) -> Self {
        Self { port, attached: HashSet::new() }
    }

    fn send(&self, message: &RelayMessage) -> Result<(), SurfaceError> {
        self.port.post(&message.to_json()?)?;
        Ok(())
    }
}

impl<P: RelayPort> Surface for RelaySurface<P> {
    fn mount(&mut self, badge: &Badge) -> Result<(), SurfaceError> {
        self.send(&RelayMessage::mount(badge))?;
        self.attached.insert(badge.id());
        Ok(())
    }

    fn apply_frame(&mut self, badge: &Badge, frame: Frame) -> Result<bool, SurfaceError> {
        if !self.attached.contains(&badge.id()) {
            return Ok(false);
        }
        let action = match frame {
            Frame::OffScreen => return Ok(true),
            Frame::OnScreen => RelayAction::Enter,
            Frame::Exit => RelayAction::Exit,
        };
        self.send(&RelayMessage::new(action, badge.id()))?;
        Ok(true)
    }

    fn unmount(&mut self, id: AchievementId) -> Result<bool, SurfaceError> {
        if !self.attached.remove(&id) {
            return Ok(false);
        }
        self.send(&RelayMessage::new(RelayAction::Unmount, id))?;
        Ok(true)
    }
}

/// Host-side end of the relay: applies incoming messages to a surface in the host document.
///
/// Only messages posted from `origin` are applied; any other frame on the host page is ignored.
pub struct RelayReceiver<S> {
    surface: S,
    origin: String,
    badges: HashMap<AchievementId, Badge>,
}

impl<S: Surface> RelayReceiver<S> {
    pub fn new(surface: S, origin: impl Into<String>) -> Self {
        Self { surface, origin: origin.into(), badges: HashMap::new() }
    }

    /// Apply a raw message posted to the host window from `origin`.
    ///
    /// Returns whether the message was a relay message we accepted.
    pub fn receive(&mut self, origin: &str, json: &str) -> Result<bool, SurfaceError> {
        if origin != self.origin {
            return Ok(false);
        }
        let Some(message) = RelayMessage::from_json(json)? else {
            return Ok(false);
        };
        self.handle(message)?;
        Ok(true)
    }

    pub fn handle(&mut self, message: RelayMessage) -> Result<(), SurfaceError> {
        let id = message.achievement_id()?;
        match message.action {
            RelayAction::Mount => {
                let payload = message.data.ok_or_else(|| RelayError::MissingPayload(message.id.clone()))?;
                let badge = payload.into_badge();
                self.surface.mount(&badge)?;
                self.badges.insert(id, badge);
            }
            RelayAction::Enter | RelayAction::Exit => {
                let frame = if message.action == RelayAction::Enter { Frame::OnScreen } else { Frame::Exit };
                let Some(badge) = self.badges.get(&id) else {
                    debug!("ignoring {} for unknown achievement {id}", message.action);
                    return Ok(());
                };
                self.surface.apply_frame(badge, frame)?;
            }
            RelayAction::Unmount => {
                self.badges.remove(&id);
                self.surface.unmount(id)?;
            }
        }
        Ok(())
    }
}
