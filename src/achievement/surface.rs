use super::animations::Frame;
use super::badge::{Badge, KEYFRAMES, STYLESHEET_ID};
use super::relay::RelayError;
use super::request::AchievementId;

/// Errors that can occur when materializing a badge.
#[derive(thiserror::Error, Debug)]
pub enum SurfaceError {
    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("no container to render into: {0}")]
    MissingContainer(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// A document region badges are rendered into.
pub trait Surface {
    /// Attach `badge` in its off-screen frame.
    fn mount(&mut self, badge: &Badge) -> Result<(), SurfaceError>;

    /// Move an attached badge into `frame`.
    ///
    /// Returns `false` without touching anything if the badge is no longer attached.
    fn apply_frame(&mut self, badge: &Badge, frame: Frame) -> Result<bool, SurfaceError>;

    /// Detach a badge. Returns `false` if it wasn't attached.
    fn unmount(&mut self, id: AchievementId) -> Result<bool, SurfaceError>;
}

/// A document stylesheets can be injected into, looked up by element id.
pub trait StyleSheets {
    fn contains(&self, id: &str) -> bool;

    fn insert(&mut self, id: &str, css: &str) -> Result<(), SurfaceError>;
}

/// Inject the badge keyframes unless the document already carries them.
///
/// Returns whether the stylesheet was injected.
pub fn ensure_keyframes(sheets: &mut impl StyleSheets) -> Result<bool, SurfaceError> {
    if sheets.contains(STYLESHEET_ID) {
        return Ok(false);
    }
    sheets.insert(STYLESHEET_ID, KEYFRAMES)?;
    Ok(true)
}
