use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{ConfigError, GameConfig};
use crate::dice::{Dice, RngDice};
use crate::phase::{Activity, DayPhase, EndState, Tint};
use crate::snapshot::{due_text, PromptPosition, SessionSnapshot, PROMPT_MARGIN};

/// Input events consumed by [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Dismisses the start screen, has no effect once started.
    Start,
    Primary,
    Secondary,
}

impl Input {
    fn is_activation(self) -> bool {
        matches!(self, Input::Primary | Input::Secondary)
    }
}

/// Progress counters, reset only by [`Session::reset`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub work_image_index: usize,
    pub day_click_count: u32,
    pub activity_click_count: u32,
    pub prompt_accepted_count: u32,
    pub missed_by_phase: [u32; 3],
    pub days_completed: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timers {
    pub time_remaining: f64,
    pub secret_timer: f64,
    pub reset_countdown: f64,
}

/// First phase, in priority order, whose missed prompts reached the threshold.
pub fn missed_limit_reached(missed_by_phase: &[u32; 3], missed_threshold: u32) -> Option<EndState> {
    DayPhase::ALL
        .iter()
        .find(|phase| missed_by_phase[phase.index()] >= missed_threshold)
        .map(|phase| phase.burnout())
}

/// The workday state machine.
///
/// Advanced one step at a time by [`Session::advance`]; everything else a
/// presentation layer does goes through [`Session::accept_prompt`],
/// [`Session::set_over_prompt`] and [`Session::reset`].
#[derive(Debug)]
pub struct Session<D = RngDice<StdRng>> {
    config: GameConfig,
    dice: D,
    counters: SessionCounters,
    timers: Timers,
    phase: DayPhase,
    activity: Activity,
    end_state: EndState,
    started: bool,
    // set while on an activity screen the player chose; timers hold still
    paused: bool,
    over_prompt: bool,
    prompt_odds: u32,
    prompt_visible: bool,
    prompt_position: PromptPosition,
    activity_screen_active: bool,
    activity_screen_text: String,
    activity_tint: Tint,
    severity: f64,
    work_item: Option<usize>,
}

impl Session {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_dice(config, RngDice::from_entropy())
    }

    pub fn seeded(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_dice(config, RngDice::seeded(seed))
    }
}

impl<D: Dice> Session<D> {
    pub fn with_dice(config: GameConfig, dice: D) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            counters: SessionCounters::default(),
            timers: Timers {
                time_remaining: config.due_duration,
                secret_timer: 0.0,
                reset_countdown: config.reset_delay_after_game_over,
            },
            phase: DayPhase::Morning,
            activity: Activity::Working,
            end_state: EndState::None,
            started: false,
            paused: false,
            over_prompt: false,
            prompt_odds: config.initial_prompt_chance,
            prompt_visible: false,
            prompt_position: PromptPosition::default(),
            activity_screen_active: false,
            activity_screen_text: String::new(),
            activity_tint: Tint::Calm,
            severity: 0.0,
            work_item: None,
            config,
            dice,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn counters(&self) -> &SessionCounters {
        &self.counters
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn phase(&self) -> DayPhase {
        self.phase
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn end_state(&self) -> EndState {
        self.end_state
    }

    pub fn is_over(&self) -> bool {
        self.end_state != EndState::None
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over_prompt(&self) -> bool {
        self.over_prompt
    }

    pub fn prompt_visible(&self) -> bool {
        self.prompt_visible
    }

    pub fn prompt_odds(&self) -> u32 {
        self.prompt_odds
    }

    fn threshold(&self) -> u32 {
        self.config.day_phase_thresholds[self.phase.index()]
    }

    /// Puts every counter, timer and screen back to how a new game starts.
    pub fn reset(&mut self) {
        self.counters = SessionCounters::default();
        self.timers = Timers {
            time_remaining: self.config.due_duration,
            secret_timer: 0.0,
            reset_countdown: self.config.reset_delay_after_game_over,
        };
        self.phase = DayPhase::Morning;
        self.activity = Activity::Working;
        self.end_state = EndState::None;
        self.started = false;
        self.paused = false;
        self.over_prompt = false;
        self.prompt_odds = self.config.initial_prompt_chance;
        self.prompt_visible = false;
        self.prompt_position = PromptPosition::default();
        self.activity_screen_active = false;
        self.activity_screen_text.clear();
        self.activity_tint = Tint::Calm;
        self.severity = 0.0;
        self.work_item = None;

        info!("session reset");
    }

    pub fn on_start_input(&mut self) {
        if self.started || self.is_over() {
            return;
        }
        self.started = true;
        info!(due = self.config.due_duration, "session started");
    }

    pub fn set_over_prompt(&mut self, over: bool) {
        self.over_prompt = over;
    }

    /// Moves the session forward by `dt` seconds.
    ///
    /// Several activations within one step count as a single click.
    pub fn advance(&mut self, dt: f64, inputs: &[Input]) {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if self.is_over() {
            self.timers.reset_countdown -= dt;
            if self.timers.reset_countdown <= 0.0 {
                self.reset();
            }
            return;
        }

        if !self.started {
            if !inputs.is_empty() {
                self.on_start_input();
            }
            return;
        }

        if !self.paused {
            self.timers.time_remaining -= dt;
            self.timers.secret_timer += dt;
        }

        // a click in the step that runs out of time still counts, so a
        // burnout it causes beats the deadline
        let timed_out = self.timers.time_remaining <= 0.0;

        if !timed_out && self.timers.secret_timer > self.config.secret_time_threshold {
            self.finish(EndState::Realized);
            return;
        }

        if !self.over_prompt && inputs.iter().any(|input| input.is_activation()) {
            if self.activity == Activity::Working {
                self.work_click();
            } else {
                self.activity_click();
            }
        }

        if timed_out && !self.end_state.is_burnout() {
            self.finish(EndState::TimedOut);
        }
    }

    fn work_click(&mut self) {
        self.timers.secret_timer = 0.0;

        if self.counters.work_image_index < self.config.work_item_count {
            self.work_item = Some(self.counters.work_image_index);
            self.counters.work_image_index += self.counters.prompt_accepted_count as usize + 1;
        } else {
            self.finish(EndState::Completed);
            return;
        }

        let threshold = self.threshold();
        let count = self.counters.day_click_count;

        let window = self.config.prompt_appear_window;
        let look_back = self.dice.look_back(window.low, window.high);
        if f64::from(count) >= f64::from(threshold) - look_back && count <= threshold {
            if self.dice.roll(self.prompt_odds.max(1)) == 0 {
                let (x, y) = self.dice.place(PROMPT_MARGIN, 1.0 - PROMPT_MARGIN);
                self.prompt_position = PromptPosition { x, y };
                self.prompt_visible = true;
            } else {
                self.prompt_visible = false;
            }
        }

        if count >= threshold {
            let idx = self.phase.index();
            self.counters.missed_by_phase[idx] += 1;
            self.prompt_visible = false;

            let highest = self.counters.missed_by_phase.iter().copied().max().unwrap_or(0);
            self.severity = f64::from(highest) / (f64::from(self.config.missed_threshold) + 1.0);

            debug!(
                phase = %self.phase,
                missed = self.counters.missed_by_phase[idx],
                severity = self.severity,
                "prompt missed"
            );

            if self.check_missed_limit() {
                return;
            }

            match self.phase.next() {
                Some(next) => {
                    debug!(from = %self.phase, to = %next, "phase over");
                    self.phase = next;
                }
                None => {
                    // skipped sleep: forced to bed, and the clock keeps running
                    self.activity = Activity::Sleeping;
                    self.activity_screen_text = Activity::Sleeping.screen_text().to_string();
                    self.activity_tint = Tint::Alarm;
                    self.activity_screen_active = true;
                    debug!("night over without sleep, forcing sleep");
                }
            }
        }

        self.counters.day_click_count += 1;
    }

    fn activity_click(&mut self) {
        self.activity_screen_text.push('.');
        self.counters.activity_click_count += 1;

        if self.counters.activity_click_count < self.config.max_activity_clicks {
            return;
        }

        self.counters.activity_click_count = 0;
        self.activity_screen_active = false;

        if !self.day_transition() {
            return;
        }

        self.activity = Activity::Working;
        self.prompt_visible = false;
        self.paused = false;
    }

    /// Moves on from the phase whose activity just finished.
    /// Returns false when the day ended in burnout.
    fn day_transition(&mut self) -> bool {
        match self.phase {
            DayPhase::Morning => {
                self.phase = DayPhase::Afternoon;
                self.counters.day_click_count = self.config.day_phase_thresholds[0];
            }
            DayPhase::Afternoon => {
                self.phase = DayPhase::Night;
                self.counters.day_click_count = self.config.day_phase_thresholds[1];
            }
            DayPhase::Night => return self.reset_day(),
        }
        debug!(phase = %self.phase, day_clicks = self.counters.day_click_count, "back to work");
        true
    }

    fn reset_day(&mut self) -> bool {
        if self.check_missed_limit() {
            return false;
        }

        self.counters.day_click_count = 0;
        self.counters.days_completed += 1;
        self.prompt_odds = self.prompt_odds.saturating_sub(1);
        self.phase = DayPhase::Morning;
        self.activity_tint = Tint::Calm;

        info!(
            days = self.counters.days_completed,
            odds = self.prompt_odds,
            "day completed"
        );
        true
    }

    fn check_missed_limit(&mut self) -> bool {
        match missed_limit_reached(&self.counters.missed_by_phase, self.config.missed_threshold) {
            Some(end) => {
                self.finish(end);
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, end: EndState) {
        self.end_state = end;
        self.prompt_visible = false;
        self.over_prompt = false;
        self.timers.reset_countdown = self.config.reset_delay_after_game_over;

        info!(
            end = %end,
            days = self.counters.days_completed,
            work_index = self.counters.work_image_index,
            time_remaining = self.timers.time_remaining,
            "session over"
        );
    }

    /// Invoked when the visible prompt is activated.
    pub fn accept_prompt(&mut self) {
        if self.is_over()
            || !self.started
            || !self.prompt_visible
            || self.activity != Activity::Working
        {
            return;
        }

        let activity = self.phase.activity();
        self.activity = activity;
        self.activity_screen_text = activity.screen_text().to_string();
        self.prompt_odds = self.prompt_odds.saturating_add(1);
        self.counters.prompt_accepted_count += 1;
        self.over_prompt = false;
        self.activity_screen_active = true;
        self.prompt_visible = false;
        self.paused = true;

        debug!(
            activity = %activity,
            accepted = self.counters.prompt_accepted_count,
            odds = self.prompt_odds,
            "prompt accepted"
        );
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            day_phase: self.phase,
            activity: self.activity,
            end_state: self.end_state,
            session_over: self.is_over(),
            started: self.started,
            time_remaining_fraction: self.timers.time_remaining / self.config.due_duration,
            time_remaining_text: due_text(self.timers.time_remaining),
            prompt_visible: self.prompt_visible,
            prompt_position: self.prompt_position,
            prompt_label: self.phase.prompt_label(),
            severity: self.severity,
            activity_screen_text: self.activity_screen_text.clone(),
            activity_screen_active: self.activity_screen_active,
            activity_tint: self.activity_tint,
            end_message: self.end_state.message(),
            end_tint: self.end_state.tint(),
            work_item: self.work_item,
            days_completed: self.counters.days_completed,
            missed_by_phase: self.counters.missed_by_phase,
        }
    }
}
