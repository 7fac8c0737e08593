use crate::achievement::request::DisplayRequest;
use crate::achievement::target::RenderMode;
use serde::Serialize;

/// The acknowledgment sent back to the host once an achievement has been shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub status: &'static str,
    pub title: String,
    pub description: String,
    pub points: Option<i64>,
    pub timestamp: i64,
    pub floating: bool,
}

impl Completion {
    pub fn shown(request: &DisplayRequest, mode: RenderMode) -> Self {
        Self {
            status: "shown",
            title: request.title.clone(),
            description: request.description.clone(),
            points: request.points,
            timestamp: request.timestamp,
            floating: mode.is_floating(),
        }
    }
}

/// Errors raised when talking to the host application.
#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error("host bridge is not available: {0}")]
    Unavailable(String),

    #[error("host call '{0}' failed: {1}")]
    CallFailed(&'static str, String),

    #[error("cannot encode value for host: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The outbound half of the host protocol.
pub trait Host {
    /// Signal that the widget is ready to receive render events.
    fn component_ready(&mut self) -> Result<(), HostError>;

    /// Ask the host to resize the widget's frame.
    fn set_frame_height(&mut self, height: u32) -> Result<(), HostError>;

    /// Hand a value back to the host application.
    fn send_completion(&mut self, completion: &Completion) -> Result<(), HostError>;
}
