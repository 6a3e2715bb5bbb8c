use overdue::snapshot::SessionSnapshot;
use ratatui::Frame;

use crate::{
    ui::{render_activity, render_end, render_start, render_work},
    App,
};

/// A UI Screen boundary: draws one state of the session
pub trait Screen {
    fn render(&self, app: &App, snapshot: &SessionSnapshot, f: &mut Frame);
}

/// Shown until the first click
pub struct StartScreen;

impl Screen for StartScreen {
    fn render(&self, _app: &App, _snapshot: &SessionSnapshot, f: &mut Frame) {
        let area = f.area();
        render_start(area, f.buffer_mut());
    }
}

/// Deadline, current work item and the prompt when it shows up
pub struct WorkScreen;

impl Screen for WorkScreen {
    fn render(&self, _app: &App, snapshot: &SessionSnapshot, f: &mut Frame) {
        let area = f.area();
        render_work(snapshot, area, f.buffer_mut());
    }
}

/// Eating, on a break or sleeping
pub struct ActivityScreen;

impl Screen for ActivityScreen {
    fn render(&self, _app: &App, snapshot: &SessionSnapshot, f: &mut Frame) {
        let area = f.area();
        render_activity(snapshot, area, f.buffer_mut());
    }
}

pub struct EndScreen;

impl Screen for EndScreen {
    fn render(&self, app: &App, snapshot: &SessionSnapshot, f: &mut Frame) {
        let area = f.area();
        let missed_threshold = app.session.config().missed_threshold;
        let restart_in = app.session.timers().reset_countdown;
        render_end(snapshot, missed_threshold, restart_in, area, f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current snapshot
pub fn current_screen(snapshot: &SessionSnapshot) -> Box<dyn Screen> {
    if snapshot.session_over {
        Box::new(EndScreen)
    } else if !snapshot.started {
        Box::new(StartScreen)
    } else if snapshot.activity_screen_active {
        Box::new(ActivityScreen)
    } else {
        Box::new(WorkScreen)
    }
}
