use super::animations::Frame;
use super::badge::Badge;
use super::guard::{Admission, admit};
use super::request::{AchievementId, DisplayRequest, RenderArgs};
use super::state::PresentationState;
use super::surface::Surface;
use super::target::{HostDocumentProbe, RenderMode, resolve};
use crate::config::WidgetConfig;
use crate::host::{Completion, Host};
use std::time::Duration;
use strum::Display;
use tracing::{debug, info, warn};

/// Where the in-flight achievement is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Idle,
    Entering,
    Holding,
    Exiting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TimerKind {
    /// Slide the badge on screen.
    Enter,
    /// Hold time is over, start exiting.
    Hold,
    /// Exit transition is over, detach.
    Exit,
}

/// A delayed callback into the controller.
///
/// Timers can't be cancelled: instead each one carries the generation it was scheduled in, and
/// anything from an older generation is ignored when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleTimer {
    pub id: AchievementId,
    pub generation: u64,
    pub kind: TimerKind,
}

/// The longest delay browsers honor for a timeout; anything above fires immediately.
pub const MAX_TIMER_DELAY_MS: u32 = i32::MAX as u32;

/// `delay` in whole milliseconds, capped at [MAX_TIMER_DELAY_MS].
pub fn timer_delay_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX).min(MAX_TIMER_DELAY_MS)
}

/// Runs [LifecycleTimer]s after a delay by handing them to [AchievementController::on_timer].
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, timer: LifecycleTimer);
}

/// What happened when a timer fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    /// The achievement moved into the given phase.
    Advanced(Phase),
    /// The timer belonged to an achievement that's no longer current.
    Stale,
}

/// The surfaces an achievement can be rendered into.
pub struct RenderTargets {
    pub inline: Box<dyn Surface>,
    pub relay: Box<dyn Surface>,
    pub probe: Box<dyn HostDocumentProbe>,
}

struct InFlight {
    badge: Badge,
    mode: RenderMode,
    phase: Phase,
    generation: u64,
}

/// Owns the presentation state and drives each achievement from mount to detach.
pub struct AchievementController {
    config: WidgetConfig,
    state: PresentationState,
    host: Box<dyn Host>,
    scheduler: Box<dyn Scheduler>,
    targets: RenderTargets,
    current: Option<InFlight>,
    generation: u64,
}

impl AchievementController {
    pub fn new(
        config: WidgetConfig,
        host: Box<dyn Host>,
        scheduler: Box<dyn Scheduler>,
        targets: RenderTargets,
    ) -> Self {
        Self { config, state: PresentationState::default(), host, scheduler, targets, current: None, generation: 0 }
    }

    /// Announce the widget to the host.
    pub fn start(&mut self) {
        if let Err(e) = self.host.component_ready() {
            warn!("failed to signal readiness: {e}");
        }
        self.resize(RenderMode::Inline);
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.current.as_ref().map(|current| current.phase).unwrap_or(Phase::Idle)
    }

    /// Handle the arguments of a render event.
    ///
    /// Returns `None` when the event carries no request, as the initial render does.
    pub fn handle_render(&mut self, args: RenderArgs) -> Option<Admission> {
        let Some(request) = args.into_request() else {
            debug!("render event without timestamp, nothing to show");
            return None;
        };
        Some(self.display(request))
    }

    /// Show an achievement, unless the guard turns it down.
    pub fn display(&mut self, request: DisplayRequest) -> Admission {
        let admission = admit(&request, &self.state, self.config.interruption_window());
        match admission {
            Admission::Accept => self.begin(request),
            Admission::IgnoreInterruption => debug!("not interrupting ongoing achievement for {}", request.id()),
            Admission::IgnoreDuplicate => debug!("achievement {} already showing", request.id()),
        }
        admission
    }

    /// Advance the lifecycle for a fired timer.
    pub fn on_timer(&mut self, timer: LifecycleTimer) -> TimerOutcome {
        let Some(mut current) = self.current.take() else {
            debug!("{} timer for {} fired with nothing on screen", timer.kind, timer.id);
            return TimerOutcome::Stale;
        };
        if current.generation != timer.generation || current.badge.id() != timer.id {
            debug!("ignoring stale {} timer for {}", timer.kind, timer.id);
            self.current = Some(current);
            return TimerOutcome::Stale;
        }

        match (timer.kind, current.phase) {
            (TimerKind::Enter, Phase::Entering) => {
                self.apply_frame(&current, Frame::OnScreen);
                current.phase = Phase::Holding;
            }
            (TimerKind::Hold, Phase::Entering | Phase::Holding) => {
                self.apply_frame(&current, Frame::Exit);
                current.phase = Phase::Exiting;
                let exit = LifecycleTimer { kind: TimerKind::Exit, ..timer };
                self.scheduler.schedule(self.config.transition(), exit);
            }
            (TimerKind::Exit, Phase::Exiting) => {
                self.finish(current);
                return TimerOutcome::Advanced(Phase::Idle);
            }
            (kind, phase) => {
                debug!("ignoring {kind} timer for {} while {phase}", timer.id);
                self.current = Some(current);
                return TimerOutcome::Stale;
            }
        }
        let phase = current.phase;
        self.current = Some(current);
        TimerOutcome::Advanced(phase)
    }

    fn begin(&mut self, request: DisplayRequest) {
        if let Some(previous) = self.current.take() {
            info!("achievement {} superseded by {}", previous.badge.id(), request.id());
            self.finish(previous);
        }

        let mode = resolve(&request, &*self.targets.probe);
        let Some((badge, mode)) = self.materialize(&request, mode) else {
            return;
        };
        let id = badge.id();
        self.state.accept(id);
        self.generation += 1;
        let generation = self.generation;
        self.resize(mode);

        info!("showing achievement {id} ({mode})");
        self.scheduler.schedule(self.config.enter_delay(), LifecycleTimer { id, generation, kind: TimerKind::Enter });
        self.scheduler.schedule(
            self.config.hold_duration(request.duration_ms),
            LifecycleTimer { id, generation, kind: TimerKind::Hold },
        );
        self.current = Some(InFlight { badge, mode, phase: Phase::Entering, generation });
    }

    fn materialize(&mut self, request: &DisplayRequest, mode: RenderMode) -> Option<(Badge, RenderMode)> {
        let badge = Badge::new(request, mode.placement(request), self.config.transition());
        match self.surface(mode).mount(&badge) {
            Ok(()) => return Some((badge, mode)),
            Err(e) if mode == RenderMode::Relayed => {
                warn!("failed to relay achievement {}, rendering inline: {e}", request.id());
            }
            Err(e) => {
                warn!("failed to mount achievement {}: {e}", request.id());
                return None;
            }
        }
        let badge = Badge::new(request, RenderMode::Inline.placement(request), self.config.transition());
        match self.surface(RenderMode::Inline).mount(&badge) {
            Ok(()) => Some((badge, RenderMode::Inline)),
            Err(e) => {
                warn!("failed to mount achievement {}: {e}", request.id());
                None
            }
        }
    }

    fn apply_frame(&mut self, current: &InFlight, frame: Frame) {
        match self.surface(current.mode).apply_frame(&current.badge, frame) {
            Ok(true) => (),
            Ok(false) => debug!("achievement {} is no longer attached", current.badge.id()),
            Err(e) => warn!("failed to move achievement {} to {frame}: {e}", current.badge.id()),
        }
    }

    fn finish(&mut self, current: InFlight) {
        let id = current.badge.id();
        match self.surface(current.mode).unmount(id) {
            Ok(true) => debug!("achievement {id} removed"),
            Ok(false) => debug!("achievement {id} was already detached"),
            Err(e) => warn!("failed to remove achievement {id}: {e}"),
        }
        self.state.release(id);
        let completion = Completion::shown(current.badge.request(), current.mode);
        if let Err(e) = self.host.send_completion(&completion) {
            warn!("failed to acknowledge achievement {id}: {e}");
        }
    }

    fn resize(&mut self, mode: RenderMode) {
        let height = match mode {
            RenderMode::Inline => self.config.inline_frame_height,
            RenderMode::Relayed => self.config.relayed_frame_height,
        };
        if let Err(e) = self.host.set_frame_height(height) {
            warn!("failed to set frame height: {e}");
        }
    }

    fn surface(&mut self, mode: RenderMode) -> &mut dyn Surface {
        match mode {
            RenderMode::Inline => &mut *self.targets.inline,
            RenderMode::Relayed => &mut *self.targets.relay,
        }
    }
}
