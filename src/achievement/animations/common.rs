use std::time::Duration;
use strum::Display;

/// The styles a badge container moves through during its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Frame {
    /// Freshly mounted, waiting for the enter tick.
    OffScreen,
    /// Fully visible.
    OnScreen,
    /// Sliding away.
    Exit,
}

/// Trait for the ways a badge slides in and out.
pub(crate) trait Animation {
    /// The CSS `transform` for the given frame.
    fn transform(&self, frame: Frame) -> &'static str;

    /// The CSS `opacity` for the given frame.
    fn opacity(&self, frame: Frame) -> &'static str {
        match frame {
            Frame::OnScreen => "1",
            Frame::OffScreen | Frame::Exit => "0",
        }
    }
}

/// The `transition` declaration for a given duration.
///
/// Exit timers wait for exactly this duration, so both are derived from the same value.
pub(crate) fn transition_declaration(duration: Duration) -> String {
    format!("all {}ms ease-out", duration.as_millis())
}
