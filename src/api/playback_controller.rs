use tracing::{debug, trace};

use crate::extensions::EngineEvent;
use crate::render::ChartSurface;

use super::TrendsEngine;
use super::playback::{PlayOutcome, StepOutcome};
use super::scheduler::{ScheduledTask, TaskToken};

impl<S: ChartSurface> TrendsEngine<S> {
    /// Play/pause toggle.
    ///
    /// Starting from the last day rewinds to the start-at day (when enabled)
    /// or to the first day worth animating.
    pub fn play(&mut self) {
        self.toggle_playback();
        self.sync();
    }

    /// Pauses a running playback. No-op when already paused.
    pub fn pause(&mut self) {
        if self.core.playback.pause() {
            debug!(day = self.core.playback.current_day, "playback paused");
            self.emit_event(EngineEvent::PlaybackPaused);
            self.sync();
        }
    }

    /// Slider input: pauses and jumps to `day`, clamped into the playable window.
    pub fn scrub(&mut self, day: usize) {
        let was_playing = !self.core.playback.paused;
        let min_day = self.min_day();
        let num_dates = self.num_dates();
        self.core.playback.scrub(day, min_day, num_dates);
        if was_playing {
            self.emit_event(EngineEvent::PlaybackPaused);
        }
        self.sync();
    }

    /// Keyboard shortcuts. Returns whether the key was handled.
    ///
    /// Space toggles playback, `-`/`_` step back and `+`/`=` step forward.
    pub fn handle_key(&mut self, key: char) -> bool {
        let num_dates = self.num_dates();
        if num_dates == 0 {
            return false;
        }

        let was_playing = !self.core.playback.paused;
        match key {
            ' ' => {
                self.play();
                return true;
            }
            '-' | '_' => {
                let min_day = self.min_day();
                self.core.playback.step_back(min_day, num_dates);
            }
            '+' | '=' => self.core.playback.step_forward(num_dates),
            _ => return false,
        }
        trace!(%key, day = self.core.playback.current_day, "keyboard step");
        if was_playing {
            self.emit_event(EngineEvent::PlaybackPaused);
        }
        self.sync();
        true
    }

    /// Sets the start-at day and jumps there.
    ///
    /// Playback starts when start-at is enabled, paused, and autoplay already ran.
    pub fn set_start_at_day(&mut self, day: usize) {
        let min_day = self.min_day();
        let num_dates = self.num_dates();
        self.core.playback.set_start_at_day(day, min_day, num_dates);
        if self.core.playback.should_start_after_start_at_change() {
            self.toggle_playback();
        }
        self.sync();
    }

    pub fn set_enable_start_at(&mut self, enabled: bool) {
        if self.core.playback.enable_start_at == enabled {
            return;
        }
        self.core.playback.enable_start_at = enabled;
        if enabled {
            let num_dates = self.num_dates();
            let playback = &mut self.core.playback;
            playback.current_day = playback.start_at_day.min(num_dates);
            if playback.should_start_after_start_at_change() {
                self.toggle_playback();
            }
        }
        self.sync();
    }

    /// Host notification that the surface is attached and measurable.
    ///
    /// Fires the one-shot autoplay once data is loaded.
    pub fn surface_mounted(&mut self) {
        self.core.presentation.surface_mounted = true;
        self.try_autoplay();
        self.sync();
    }

    /// Advances the virtual clock by `elapsed_ms` and runs every task that
    /// becomes due, including tasks scheduled along the way.
    pub fn advance_time(&mut self, elapsed_ms: u64) {
        let until_ms = self.core.runtime.scheduler.now_ms().saturating_add(elapsed_ms);
        while let Some((token, task)) = self.core.runtime.scheduler.pop_due(until_ms) {
            self.run_task(token, task);
        }
        self.core.runtime.scheduler.settle(until_ms);
    }

    pub(super) fn try_autoplay(&mut self) {
        if !self.core.playback.autoplay
            || !self.core.presentation.surface_mounted
            || self.core.runtime.first_load
        {
            return;
        }
        let Some(min_day) = self.min_day() else {
            return;
        };

        let num_dates = self.num_dates();
        let playback = &mut self.core.playback;
        playback.start_at_day = playback.start_at_day.max(min_day);
        playback.current_day = playback.start_at_day.min(num_dates);
        playback.autoplay = false;
        debug!(min_day, start_at_day = playback.start_at_day, "autoplay");
        if playback.paused && playback.current_day < num_dates {
            self.toggle_playback();
        }
    }

    fn toggle_playback(&mut self) {
        let min_day = self.min_day();
        let num_dates = self.num_dates();
        match self.core.playback.toggle_play(min_day, num_dates) {
            PlayOutcome::Started { generation } => {
                let delay_ms = self.core.runtime.config.first_tick_ms;
                self.core
                    .runtime
                    .scheduler
                    .schedule(ScheduledTask::PlaybackStep { generation }, delay_ms);
                debug!(
                    day = self.core.playback.current_day,
                    generation, "playback started"
                );
                self.emit_event(EngineEvent::PlaybackStarted);
            }
            PlayOutcome::Paused => {
                debug!(day = self.core.playback.current_day, "playback paused");
                self.emit_event(EngineEvent::PlaybackPaused);
            }
        }
    }

    fn run_task(&mut self, token: TaskToken, task: ScheduledTask) {
        match task {
            ScheduledTask::PlaybackStep { generation } => {
                let min_day = self.min_day();
                let num_dates = self.num_dates();
                match self.core.playback.step(generation, min_day, num_dates) {
                    StepOutcome::Ignored => {
                        trace!(generation, "stale playback step ignored");
                    }
                    StepOutcome::Advanced => {
                        let delay_ms = self.core.runtime.config.cadence_ms;
                        self.core
                            .runtime
                            .scheduler
                            .schedule(ScheduledTask::PlaybackStep { generation }, delay_ms);
                        self.sync();
                    }
                    StepOutcome::Finished => {
                        debug!(day = self.core.playback.current_day, "playback finished");
                        self.emit_event(EngineEvent::PlaybackPaused);
                        self.sync();
                    }
                }
            }
            ScheduledTask::SearchRefresh => {
                if self.core.runtime.search_token != Some(token) {
                    trace!("superseded search refresh ignored");
                    return;
                }
                self.core.runtime.search_token = None;
                self.refresh_visible();
            }
        }
    }
}
