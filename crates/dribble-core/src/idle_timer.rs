//! Restartable single-shot idle timer.
//!
//! Every `arm()` cancels the live schedule and starts a fresh one, so at most
//! one idle callback is ever pending. Each schedule carries a generation
//! number; a callback whose generation is no longer current (it raced its own
//! cancellation) is rejected by `fire()`.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::scheduler::Event;
use crate::sequencer::DownloadSequencer;

/// Backend that actually waits. Implementations deliver the elapsed
/// generation back to whoever owns the `IdleTimer`.
pub trait TimerDriver {
    fn schedule(&mut self, delay: Duration, generation: u64);
    fn cancel(&mut self);
}

pub struct IdleTimer<D> {
    driver: D,
    delay: Duration,
    generation: u64,
    armed: bool,
}

impl<D: TimerDriver> IdleTimer<D> {
    pub fn new(driver: D, delay: Duration) -> Self {
        Self {
            driver,
            delay,
            generation: 0,
            armed: false,
        }
    }

    /// Restart the idle countdown. Does nothing once the sequencer is drained.
    pub fn arm(&mut self, sequencer: &DownloadSequencer) -> bool {
        if sequencer.is_complete() {
            return false;
        }
        if self.armed {
            self.driver.cancel();
        }
        self.generation += 1;
        self.armed = true;
        self.driver.schedule(self.delay, self.generation);
        tracing::trace!(generation = self.generation, "idle timer armed");
        true
    }

    /// Accept an elapsed callback. True only for the live generation; the
    /// timer is disarmed afterwards.
    pub fn fire(&mut self, generation: u64) -> bool {
        if !self.armed || generation != self.generation {
            tracing::trace!(generation, current = self.generation, "stale idle callback");
            return false;
        }
        self.armed = false;
        true
    }

    pub fn disarm(&mut self) {
        if self.armed {
            self.driver.cancel();
            self.armed = false;
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

/// Sleeps on the tokio timer and posts `Event::IdleElapsed` to the scheduler.
pub struct TokioTimerDriver {
    events: UnboundedSender<Event>,
    task: Option<JoinHandle<()>>,
}

impl TokioTimerDriver {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self { events, task: None }
    }
}

impl TimerDriver for TokioTimerDriver {
    fn schedule(&mut self, delay: Duration, generation: u64) {
        self.cancel();
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::IdleElapsed(generation));
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TokioTimerDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}
