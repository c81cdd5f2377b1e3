use serde::{Deserialize, Serialize};

/// Day cursor and play/pause flags.
///
/// `current_day` counts shown days: `0` shows nothing, `num_dates` shows
/// everything. The first day worth animating (`min_day`) is derived from the
/// selection and passed into each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub current_day: usize,
    pub paused: bool,
    pub start_at_day: usize,
    pub enable_start_at: bool,
    /// Pending one-shot playback once the surface is mounted.
    pub autoplay: bool,
    /// Bumped on every start; steps from older runs are ignored.
    pub generation: u64,
}

impl PlaybackState {
    #[must_use]
    pub fn new(autoplay: bool) -> Self {
        Self {
            current_day: 7,
            paused: true,
            start_at_day: 0,
            enable_start_at: false,
            autoplay,
            generation: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Playback started; schedule the first step for this generation.
    Started { generation: u64 },
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Paused or superseded; nothing changed.
    Ignored,
    /// Moved one day forward; schedule the next step.
    Advanced,
    /// Reached the last day (or nothing to animate) and paused.
    Finished,
}

/// Lower playback bound for a derived `min_day`.
#[must_use]
pub fn lower_bound(min_day: Option<usize>, num_dates: usize) -> usize {
    min_day.unwrap_or(0).min(num_dates)
}

/// Clamps `day` into `[min_day, num_dates]`.
#[must_use]
pub fn clamp_day(day: usize, min_day: Option<usize>, num_dates: usize) -> usize {
    day.clamp(lower_bound(min_day, num_dates), num_dates)
}

impl PlaybackState {
    /// Play/pause toggle.
    ///
    /// Starting from the last day rewinds to the start-at day when enabled,
    /// otherwise to `min_day`.
    pub fn toggle_play(&mut self, min_day: Option<usize>, num_dates: usize) -> PlayOutcome {
        if !self.paused {
            self.paused = true;
            return PlayOutcome::Paused;
        }

        if self.current_day == num_dates {
            self.current_day = if self.enable_start_at {
                self.start_at_day.min(num_dates)
            } else {
                min_day.unwrap_or(num_dates).min(num_dates)
            };
        }
        self.paused = false;
        self.generation += 1;
        PlayOutcome::Started {
            generation: self.generation,
        }
    }

    /// Returns whether playback was running.
    pub fn pause(&mut self) -> bool {
        let was_playing = !self.paused;
        self.paused = true;
        was_playing
    }

    /// Timer step for `generation`.
    pub fn step(&mut self, generation: u64, min_day: Option<usize>, num_dates: usize) -> StepOutcome {
        if self.paused || generation != self.generation {
            return StepOutcome::Ignored;
        }
        if self.current_day >= num_dates || min_day.is_none() {
            self.current_day = num_dates;
            self.paused = true;
            return StepOutcome::Finished;
        }

        self.current_day += 1;
        if self.current_day == num_dates {
            self.paused = true;
            return StepOutcome::Finished;
        }
        StepOutcome::Advanced
    }

    /// Slider input: pauses and jumps to a clamped day.
    pub fn scrub(&mut self, day: usize, min_day: Option<usize>, num_dates: usize) {
        self.paused = true;
        self.current_day = clamp_day(day, min_day, num_dates);
    }

    /// Keyboard step back; never below `min_day`.
    pub fn step_back(&mut self, min_day: Option<usize>, num_dates: usize) {
        self.paused = true;
        let lower = lower_bound(min_day, num_dates);
        self.current_day = self.current_day.saturating_sub(1).max(lower).min(num_dates);
    }

    /// Keyboard step forward; never past the last day.
    pub fn step_forward(&mut self, num_dates: usize) {
        self.paused = true;
        self.current_day = (self.current_day + 1).min(num_dates);
    }

    /// Keeps the cursor inside `[min_day, num_dates]` after the window moves.
    ///
    /// Returns whether the cursor changed.
    pub fn clamp_to_window(&mut self, min_day: Option<usize>, num_dates: usize) -> bool {
        let clamped = clamp_day(self.current_day, min_day, num_dates);
        let changed = clamped != self.current_day;
        self.current_day = clamped;
        changed
    }

    /// Sets the start-at day clamped into the window and jumps there.
    pub fn set_start_at_day(&mut self, day: usize, min_day: Option<usize>, num_dates: usize) {
        let clamped = clamp_day(day, min_day, num_dates);
        self.start_at_day = clamped;
        self.current_day = clamped;
    }

    /// Start-at changes kick off playback once autoplay has been consumed.
    #[must_use]
    pub fn should_start_after_start_at_change(&self) -> bool {
        self.enable_start_at && self.paused && !self.autoplay
    }
}
