use std::io;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent, MouseEvent};

/// Most events folded into one frame, so a flood of mouse moves cannot stall the clock.
const MAX_EVENTS_PER_FRAME: usize = 64;

/// Terminal input the front-end reacts to
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
}

pub trait GameEventSource {
    /// Waits up to `timeout` for the next event. `None` means nothing arrived in time.
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>>;
}

/// Reads the real terminal through crossterm
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl GameEventSource for TerminalEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }

        Ok(match event::read()? {
            Event::Key(key) => Some(GameEvent::Key(key)),
            Event::Mouse(mouse) => Some(GameEvent::Mouse(mouse)),
            Event::Resize(_, _) => Some(GameEvent::Resize),
            _ => None,
        })
    }
}

/// Feeds events from a channel, for driving the loop without a terminal
pub struct ScriptedEvents {
    rx: Receiver<GameEvent>,
}

impl ScriptedEvents {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for ScriptedEvents {
    fn next_event(&mut self, timeout: Duration) -> io::Result<Option<GameEvent>> {
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => Ok(Some(ev)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                // behave like an idle terminal once the script runs dry
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

/// Everything that happened during one frame
#[derive(Debug, Default)]
pub struct Step {
    pub events: Vec<GameEvent>,
    /// seconds since the previous step
    pub dt: f64,
}

/// Paces the game loop: one `Step` per frame, carrying the real elapsed time.
pub struct Runner<E: GameEventSource> {
    source: E,
    frame: Duration,
    last_step: Instant,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(source: E, frame: Duration) -> Self {
        Self {
            source,
            frame,
            last_step: Instant::now(),
        }
    }

    /// Waits up to one frame for input, then takes whatever else is already queued.
    pub fn step(&mut self) -> io::Result<Step> {
        let mut events = Vec::new();

        if let Some(ev) = self.source.next_event(self.frame)? {
            events.push(ev);
            while events.len() < MAX_EVENTS_PER_FRAME {
                match self.source.next_event(Duration::ZERO)? {
                    Some(ev) => events.push(ev),
                    None => break,
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_step).as_secs_f64();
        self.last_step = now;

        Ok(Step { events, dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    fn space() -> GameEvent {
        GameEvent::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
    }

    #[test]
    fn idle_frame_has_no_events() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(ScriptedEvents::new(rx), Duration::from_millis(1));

        let step = runner.step().unwrap();
        assert!(step.events.is_empty());
        assert!(step.dt > 0.0);
    }

    #[test]
    fn queued_events_share_a_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        tx.send(space()).unwrap();
        let mut runner = Runner::new(ScriptedEvents::new(rx), Duration::from_millis(10));

        let step = runner.step().unwrap();
        assert_eq!(step.events, vec![GameEvent::Resize, space()]);

        tx.send(space()).unwrap();
        let step = runner.step().unwrap();
        assert_eq!(step.events, vec![space()]);
    }

    #[test]
    fn frame_caps_event_count() {
        let (tx, rx) = mpsc::channel();
        for _ in 0..MAX_EVENTS_PER_FRAME + 5 {
            tx.send(space()).unwrap();
        }
        let mut runner = Runner::new(ScriptedEvents::new(rx), Duration::from_millis(10));

        assert_eq!(runner.step().unwrap().events.len(), MAX_EVENTS_PER_FRAME);
        assert_eq!(runner.step().unwrap().events.len(), 5);
    }

    #[test]
    fn step_measures_elapsed_time() {
        let (_tx, rx) = mpsc::channel();
        let mut runner = Runner::new(ScriptedEvents::new(rx), Duration::from_millis(20));

        runner.step().unwrap();
        let step = runner.step().unwrap();
        assert!(step.dt >= 0.015, "dt was {}", step.dt);
    }

    #[test]
    fn finished_script_reads_as_idle() {
        let (tx, rx) = mpsc::channel();
        tx.send(space()).unwrap();
        drop(tx);
        let mut runner = Runner::new(ScriptedEvents::new(rx), Duration::from_millis(5));

        assert_eq!(runner.step().unwrap().events, vec![space()]);
        let step = runner.step().unwrap();
        assert!(step.events.is_empty());
        assert!(step.dt >= 0.004, "dt was {}", step.dt);
    }
}
