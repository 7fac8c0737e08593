use crate::achievement::lifecycle::{AchievementController, LifecycleTimer, Scheduler, timer_delay_millis};
use gloo_timers::callback::Timeout;
use std::cell::RefCell;
use std::rc::Weak;
use std::time::Duration;

/// Schedules lifecycle timers with `setTimeout`.
pub(crate) struct TimeoutScheduler {
    controller: Weak<RefCell<AchievementController>>,
}

impl TimeoutScheduler {
    pub(crate) fn new(controller: Weak<RefCell<AchievementController>>) -> Self {
        Self { controller }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&mut self, delay: Duration, timer: LifecycleTimer) {
        let controller = self.controller.clone();
        // Never cancelled: stale timers are ignored by the controller when they fire.
        Timeout::new(timer_delay_millis(delay), move || {
            if let Some(controller) = controller.upgrade() {
                controller.borrow_mut().on_timer(timer);
            }
        })
        .forget();
    }
}
