use super::request::DisplayRequest;
use super::state::PresentationState;
use std::time::Duration;
use strum::Display;

/// The verdict on an incoming display request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Admission {
    /// Show it.
    Accept,

    /// Another achievement is on screen and this one arrived too soon after it.
    IgnoreInterruption,

    /// This is a re-delivery of the achievement already on screen.
    IgnoreDuplicate,
}

/// Decide whether `request` may start given the current presentation state.
///
/// The request's own timestamp acts as the clock. This never mutates anything: accepting is up to
/// the caller.
pub fn admit(request: &DisplayRequest, state: &PresentationState, interruption_window: Duration) -> Admission {
    let id = request.id();
    let Some(active) = state.active_achievement else {
        return Admission::Accept;
    };
    let elapsed = request.timestamp.saturating_sub(state.last_accepted_timestamp);
    if elapsed < interruption_window.as_millis() as i64 {
        Admission::IgnoreInterruption
    } else if id == active {
        Admission::IgnoreDuplicate
    } else {
        Admission::Accept
    }
}
