use serde::Deserialize;
use std::time::Duration;

/// Timing and sizing policy for the widget.
///
/// The defaults are the canonical policy; deserializing lets an embedding page or a test override
/// individual fields while keeping the rest.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Minimum spacing between two accepted timestamps while an achievement is on screen.
    pub interruption_window_ms: u64,

    /// Floor applied to the requested display duration.
    pub min_visible_ms: u64,

    /// Delay between mounting the badge and triggering its slide-in, so the off-screen style is
    /// registered before the transition starts.
    pub enter_delay_ms: u64,

    /// Length of the CSS transition. The exit timer waits exactly this long before detaching.
    pub transition_ms: u64,

    /// Frame height requested while rendering inside the widget's own frame.
    pub inline_frame_height: u32,

    /// Frame height requested while the badge is relayed to the host page.
    pub relayed_frame_height: u32,
}

impl WidgetConfig {
    pub fn interruption_window(&self) -> Duration {
        Duration::from_millis(self.interruption_window_ms)
    }

    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// The time a badge stays up before it starts exiting.
    pub fn hold_duration(&self, requested_ms: u64) -> Duration {
        Duration::from_millis(requested_ms.max(self.min_visible_ms))
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            interruption_window_ms: 2000,
            min_visible_ms: 5000,
            enter_delay_ms: 50,
            transition_ms: 800,
            inline_frame_height: 120,
            relayed_frame_height: 1,
        }
    }
}
