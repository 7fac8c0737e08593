pub mod animations;
pub mod badge;
pub mod guard;
pub mod lifecycle;
pub mod relay;
pub mod request;
pub mod state;
pub mod surface;
pub mod target;

#[cfg(test)]
pub(crate) mod testing;

pub use badge::Badge;
pub use guard::{Admission, admit};
pub use lifecycle::{AchievementController, LifecycleTimer, Phase, RenderTargets, Scheduler, TimerKind, TimerOutcome};
pub use request::{AchievementId, DisplayRequest, Position, RenderArgs};
pub use state::PresentationState;
pub use surface::{Surface, SurfaceError};
pub use target::{AccessError, HostDocumentProbe, RenderMode, resolve};
