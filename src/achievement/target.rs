use super::animations::Placement;
use super::request::DisplayRequest;
use strum::Display;
use tracing::warn;

/// Where an accepted achievement is materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RenderMode {
    /// Inside the widget's own frame.
    Inline,
    /// On the host page, through the relay listener.
    Relayed,
}

impl RenderMode {
    /// Whether the badge ends up floating over the host page.
    pub fn is_floating(self) -> bool {
        matches!(self, Self::Relayed)
    }

    pub fn placement(self, request: &DisplayRequest) -> Placement {
        match self {
            Self::Inline => Placement::Inline,
            Self::Relayed => Placement::Floating(request.position),
        }
    }
}

/// Errors when trying to reach the host document.
#[derive(thiserror::Error, Debug)]
pub enum AccessError {
    #[error("widget is not embedded in a host page")]
    NotEmbedded,

    #[error("host document is not accessible: {0}")]
    Denied(String),
}

/// Checks whether the host document can be reached from the widget.
pub trait HostDocumentProbe {
    fn probe(&self) -> Result<(), AccessError>;
}

/// Pick the render mode for a request.
///
/// Floating requests are relayed to the host page when it can be reached and fall back to being
/// rendered inline otherwise.
pub fn resolve(request: &DisplayRequest, probe: &dyn HostDocumentProbe) -> RenderMode {
    if !request.floating {
        return RenderMode::Inline;
    }
    match probe.probe() {
        Ok(()) => RenderMode::Relayed,
        Err(e) => {
            warn!("cannot float achievement {}, rendering inline: {e}", request.id());
            RenderMode::Inline
        }
    }
}
