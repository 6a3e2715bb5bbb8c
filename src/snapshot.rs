use serde::Serialize;

use crate::phase::{Activity, DayPhase, EndState, Tint};

/// Margin kept between the prompt and the screen edges, as a fraction of the screen.
pub const PROMPT_MARGIN: f64 = 0.1;

/// Prompt placement in normalised screen coordinates, origin top-left.
/// Both axes stay within `[PROMPT_MARGIN, 1 - PROMPT_MARGIN]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PromptPosition {
    pub x: f64,
    pub y: f64,
}

impl Default for PromptPosition {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub day_phase: DayPhase,
    pub activity: Activity,
    pub end_state: EndState,
    pub session_over: bool,
    pub started: bool,
    pub time_remaining_fraction: f64,
    pub time_remaining_text: String,
    pub prompt_visible: bool,
    pub prompt_position: PromptPosition,
    pub prompt_label: &'static str,
    /// 0..1, how blurred the work screen should look
    pub severity: f64,
    pub activity_screen_text: String,
    pub activity_screen_active: bool,
    pub activity_tint: Tint,
    pub end_message: &'static str,
    pub end_tint: Tint,
    /// index of the work item currently on screen, if any was shown yet
    pub work_item: Option<usize>,
    pub days_completed: u32,
    pub missed_by_phase: [u32; 3],
}

pub fn due_text(time_remaining: f64) -> String {
    format!("Due: {:.2}", time_remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_due_text_format() {
        assert_eq!(due_text(12.345), "Due: 12.35");
        assert_eq!(due_text(0.0), "Due: 0.00");
        assert_eq!(due_text(-0.5), "Due: -0.50");
    }
}
