//! Test doubles for the achievement lifecycle.

use super::animations::Frame;
use super::badge::Badge;
use super::lifecycle::{AchievementController, LifecycleTimer, RenderTargets, Scheduler};
use super::request::AchievementId;
use super::surface::{Surface, SurfaceError};
use super::target::{AccessError, HostDocumentProbe};
use crate::config::WidgetConfig;
use crate::host::{Completion, Host, HostError};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SurfaceEvent {
    Mounted(AchievementId),
    Framed(AchievementId, Frame),
    Unmounted(AchievementId),
}

impl SurfaceEvent {
    pub(crate) fn id(&self) -> AchievementId {
        match self {
            Self::Mounted(id) | Self::Framed(id, _) | Self::Unmounted(id) => *id,
        }
    }
}

#[derive(Default)]
struct SurfaceLog {
    events: Vec<SurfaceEvent>,
    attached: Vec<AchievementId>,
    last_badge: Option<Badge>,
    fail_mounts: bool,
}

/// A surface that records what happens to it.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface(Rc<RefCell<SurfaceLog>>);

impl RecordingSurface {
    pub(crate) fn events(&self) -> Vec<SurfaceEvent> {
        self.0.borrow().events.clone()
    }

    pub(crate) fn attached(&self) -> Vec<AchievementId> {
        self.0.borrow().attached.clone()
    }

    pub(crate) fn last_badge(&self) -> Option<Badge> {
        self.0.borrow().last_badge.clone()
    }

    /// Simulate the document being replaced underneath the widget.
    pub(crate) fn detach_all(&self) {
        self.0.borrow_mut().attached.clear();
    }

    pub(crate) fn fail_mounts(&self) {
        self.0.borrow_mut().fail_mounts = true;
    }
}

impl Surface for RecordingSurface {
    fn mount(&mut self, badge: &Badge) -> Result<(), SurfaceError> {
        let mut log = self.0.borrow_mut();
        if log.fail_mounts {
            return Err(SurfaceError::Dom("mount refused".into()));
        }
        log.events.push(SurfaceEvent::Mounted(badge.id()));
        log.attached.push(badge.id());
        log.last_badge = Some(badge.clone());
        Ok(())
    }

    fn apply_frame(&mut self, badge: &Badge, frame: Frame) -> Result<bool, SurfaceError> {
        let mut log = self.0.borrow_mut();
        if !log.attached.contains(&badge.id()) {
            return Ok(false);
        }
        log.events.push(SurfaceEvent::Framed(badge.id(), frame));
        Ok(true)
    }

    fn unmount(&mut self, id: AchievementId) -> Result<bool, SurfaceError> {
        let mut log = self.0.borrow_mut();
        let Some(index) = log.attached.iter().position(|attached| *attached == id) else {
            return Ok(false);
        };
        log.attached.remove(index);
        log.events.push(SurfaceEvent::Unmounted(id));
        Ok(true)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct HostLog {
    pub(crate) ready: usize,
    pub(crate) heights: Vec<u32>,
    pub(crate) completions: Vec<Completion>,
}

#[derive(Clone, Default)]
pub(crate) struct RecordingHost(Rc<RefCell<HostLog>>);

impl RecordingHost {
    pub(crate) fn log(&self) -> HostLog {
        self.0.borrow().clone()
    }
}

impl Host for RecordingHost {
    fn component_ready(&mut self) -> Result<(), HostError> {
        self.0.borrow_mut().ready += 1;
        Ok(())
    }

    fn set_frame_height(&mut self, height: u32) -> Result<(), HostError> {
        self.0.borrow_mut().heights.push(height);
        Ok(())
    }

    fn send_completion(&mut self, completion: &Completion) -> Result<(), HostError> {
        self.0.borrow_mut().completions.push(completion.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct ToggleProbe(Rc<Cell<bool>>);

impl ToggleProbe {
    pub(crate) fn deny(&self) {
        self.0.set(true);
    }
}

impl HostDocumentProbe for ToggleProbe {
    fn probe(&self) -> Result<(), AccessError> {
        if self.0.get() { Err(AccessError::Denied("blocked a frame with origin \"null\"".into())) } else { Ok(()) }
    }
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    pending: Vec<(Duration, LifecycleTimer)>,
}

/// A scheduler driven by a manual clock.
#[derive(Clone, Default)]
pub(crate) struct ManualScheduler(Rc<RefCell<Timeline>>);

impl ManualScheduler {
    pub(crate) fn pending(&self) -> Vec<(Duration, LifecycleTimer)> {
        self.0.borrow().pending.clone()
    }

    fn pop_due(&self, deadline: Duration) -> Option<LifecycleTimer> {
        let mut timeline = self.0.borrow_mut();
        let (index, due) = timeline
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (due, _))| *due <= deadline)
            .min_by_key(|(index, (due, _))| (*due, *index))
            .map(|(index, (due, _))| (index, *due))?;
        timeline.now = due;
        Some(timeline.pending.remove(index).1)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, timer: LifecycleTimer) {
        let mut timeline = self.0.borrow_mut();
        let due = timeline.now + delay;
        timeline.pending.push((due, timer));
    }
}

/// A controller wired to recording doubles.
pub(crate) struct Harness {
    pub(crate) controller: AchievementController,
    pub(crate) host: RecordingHost,
    pub(crate) scheduler: ManualScheduler,
    pub(crate) inline: RecordingSurface,
    pub(crate) relay: RecordingSurface,
    pub(crate) probe: ToggleProbe,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_config(WidgetConfig::default())
    }

    pub(crate) fn with_config(config: WidgetConfig) -> Self {
        let host = RecordingHost::default();
        let scheduler = ManualScheduler::default();
        let inline = RecordingSurface::default();
        let relay = RecordingSurface::default();
        let probe = ToggleProbe::default();
        let targets = RenderTargets {
            inline: Box::new(inline.clone()),
            relay: Box::new(relay.clone()),
            probe: Box::new(probe.clone()),
        };
        let controller =
            AchievementController::new(config, Box::new(host.clone()), Box::new(scheduler.clone()), targets);
        Self { controller, host, scheduler, inline, relay, probe }
    }

    /// Move the clock forward, firing every timer that comes due on the way.
    pub(crate) fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.0.borrow().now + by;
        while let Some(timer) = self.scheduler.pop_due(deadline) {
            self.controller.on_timer(timer);
        }
        self.scheduler.0.borrow_mut().now = deadline;
    }
}
