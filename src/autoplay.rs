use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, GameConfig};
use crate::dice::Dice;
use crate::phase::EndState;
use crate::session::{Input, Session};
use crate::util::Summary;

/// How the scripted player behaves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayStyle {
    /// simulated seconds per step
    pub tick: f64,
    pub clicks_per_second: f64,
    /// chance of accepting a visible prompt on any one step
    pub diligence: f64,
    /// hard stop, in simulated seconds
    pub max_seconds: f64,
}

impl Default for PlayStyle {
    fn default() -> Self {
        Self {
            tick: 0.1,
            clicks_per_second: 5.0,
            diligence: 0.3,
            max_seconds: 3_600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run: usize,
    pub end_state: EndState,
    pub elapsed: f64,
    pub clicks: u64,
    pub days_completed: u32,
    pub prompts_accepted: u32,
    pub missed_by_phase: [u32; 3],
}

/// Plays sessions without a screen, for balancing configs and smoke tests.
#[derive(Debug)]
pub struct Autoplayer<R> {
    style: PlayStyle,
    rng: R,
}

impl<R: Rng> Autoplayer<R> {
    pub fn new(style: PlayStyle, rng: R) -> Self {
        Self { style, rng }
    }

    /// Plays one session from the start screen until it ends or `max_seconds` pass.
    pub fn play<D: Dice>(&mut self, run: usize, session: &mut Session<D>) -> RunReport {
        let tick = self.style.tick;
        let click_every = if self.style.clicks_per_second > 0.0 {
            1.0 / self.style.clicks_per_second
        } else {
            f64::INFINITY
        };

        session.advance(0.0, &[Input::Start]);

        let mut elapsed = 0.0;
        let mut since_click = 0.0;
        let mut clicks = 0u64;

        while !session.is_over() && elapsed < self.style.max_seconds {
            if session.prompt_visible() && self.rng.gen_bool(self.style.diligence) {
                session.accept_prompt();
            }

            elapsed += tick;
            since_click += tick;

            if since_click >= click_every {
                since_click -= click_every;
                clicks += 1;
                session.advance(tick, &[Input::Primary]);
            } else {
                session.advance(tick, &[]);
            }
        }

        let counters = session.counters();
        let report = RunReport {
            run,
            end_state: session.end_state(),
            elapsed,
            clicks,
            days_completed: counters.days_completed,
            prompts_accepted: counters.prompt_accepted_count,
            missed_by_phase: counters.missed_by_phase,
        };
        debug!(run, end = %report.end_state, elapsed = report.elapsed, "autoplay run finished");
        report
    }
}

/// Aggregate over a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub runs: usize,
    pub elapsed: Option<Summary>,
    pub outcomes: Vec<(EndState, usize)>,
}

impl BatchSummary {
    pub fn of(reports: &[RunReport]) -> Self {
        let elapsed: Vec<f64> = reports.iter().map(|r| r.elapsed).collect();

        let mut outcomes: Vec<(EndState, usize)> = Vec::new();
        for report in reports {
            match outcomes.iter_mut().find(|(end, _)| *end == report.end_state) {
                Some((_, n)) => *n += 1,
                None => outcomes.push((report.end_state, 1)),
            }
        }

        Self {
            runs: reports.len(),
            elapsed: Summary::of(&elapsed),
            outcomes,
        }
    }
}

/// Plays `runs` seeded sessions; the same seed always gives the same reports.
pub fn simulate(
    config: &GameConfig,
    style: PlayStyle,
    runs: usize,
    seed: u64,
) -> Result<Vec<RunReport>, ConfigError> {
    let mut player = Autoplayer::new(style, StdRng::seed_from_u64(seed));

    (0..runs)
        .map(|run| {
            let mut session = Session::seeded(config.clone(), seed.wrapping_add(run as u64 + 1))?;
            Ok(player.play(run, &mut session))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn quick_config() -> GameConfig {
        GameConfig {
            due_duration: 120.0,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let a = simulate(&quick_config(), PlayStyle::default(), 4, 11).unwrap();
        let b = simulate(&quick_config(), PlayStyle::default(), 4, 11).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 4);
        for (i, report) in a.iter().enumerate() {
            assert_eq!(report.run, i);
            assert_ne!(report.end_state, EndState::None);
        }
    }

    #[test]
    fn test_idle_player_realizes() {
        let style = PlayStyle {
            clicks_per_second: 0.0,
            ..PlayStyle::default()
        };
        let reports = simulate(&quick_config(), style, 1, 3).unwrap();
        assert_eq!(reports[0].end_state, EndState::Realized);
        assert_eq!(reports[0].clicks, 0);
    }

    #[test]
    fn test_lazy_player_burns_out() {
        let config = GameConfig {
            due_duration: 10_000.0,
            work_item_count: 1_000_000,
            ..GameConfig::default()
        };
        let style = PlayStyle {
            diligence: 0.0,
            ..PlayStyle::default()
        };
        let reports = simulate(&config, style, 3, 5).unwrap();
        for report in reports {
            assert_eq!(report.end_state, EndState::Starved);
            assert_eq!(report.prompts_accepted, 0);
        }
    }

    #[test]
    fn test_small_job_completes() {
        let config = GameConfig {
            work_item_count: 20,
            ..GameConfig::default()
        };
        let reports = simulate(&config, PlayStyle::default(), 2, 9).unwrap();
        for report in reports {
            assert_eq!(report.end_state, EndState::Completed);
            assert_eq!(report.clicks, 21);
        }
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let config = GameConfig {
            missed_threshold: 0,
            ..GameConfig::default()
        };
        assert_matches!(
            simulate(&config, PlayStyle::default(), 1, 0),
            Err(ConfigError::NotPositive { .. })
        );
    }

    #[test]
    fn test_batch_summary_counts_outcomes() {
        let report = |run, end_state, elapsed| RunReport {
            run,
            end_state,
            elapsed,
            clicks: 0,
            days_completed: 0,
            prompts_accepted: 0,
            missed_by_phase: [0; 3],
        };
        let reports = vec![
            report(0, EndState::TimedOut, 10.0),
            report(1, EndState::Starved, 20.0),
            report(2, EndState::TimedOut, 30.0),
        ];

        let summary = BatchSummary::of(&reports);
        assert_eq!(summary.runs, 3);
        assert_eq!(
            summary.outcomes,
            vec![(EndState::TimedOut, 2), (EndState::Starved, 1)]
        );
        assert_eq!(summary.elapsed.unwrap().mean, 20.0);
    }
}
