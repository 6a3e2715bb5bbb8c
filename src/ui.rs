pub mod screen;

use overdue::{snapshot::SessionSnapshot, Tint};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

const HORIZONTAL_MARGIN: u16 = 2;
const PROMPT_PADDING: u16 = 2;
const PROMPT_HEIGHT: u16 = 3;

/// Filler for the work item panel; which lines show depends on the item.
const WORK_LINES: [&str; 12] = [
    "RE: RE: FW: quarterly alignment sync (action items inside)",
    "Please review the attached spreadsheet before end of day",
    "Ticket #4411: button is slightly the wrong shade of blue",
    "Reminder: timesheets are due by Friday, no exceptions",
    "Agenda for the meeting about the meeting schedule",
    "Can you hop on a quick call? Should only take an hour",
    "Updated slide deck v7_final_FINAL_reviewed.pptx",
    "Budget reconciliation: column F does not add up again",
    "Per my last email, see my last email",
    "Onboarding checklist for the new onboarding checklist",
    "Status report: still working on the status report",
    "Circling back on the thing we circled back on last week",
];

pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Neutral => Color::White,
        Tint::Calm => Color::Green,
        Tint::Alarm => Color::Red,
    }
}

fn due_color(fraction: f64) -> Color {
    if fraction > 0.5 {
        Color::Green
    } else if fraction > 0.2 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// Where the prompt button sits inside `area`, if it is showing.
pub fn prompt_rect(area: Rect, snapshot: &SessionSnapshot) -> Option<Rect> {
    if !snapshot.prompt_visible {
        return None;
    }

    let width = (snapshot.prompt_label.width() as u16 + PROMPT_PADDING * 2 + 2).min(area.width);
    let height = PROMPT_HEIGHT.min(area.height);
    if width == 0 || height == 0 {
        return None;
    }

    let center_x = area.x + (snapshot.prompt_position.x * f64::from(area.width)) as u16;
    let center_y = area.y + (snapshot.prompt_position.y * f64::from(area.height)) as u16;

    let x = center_x
        .saturating_sub(width / 2)
        .max(area.x)
        .min(area.right() - width);
    let y = center_y
        .saturating_sub(height / 2)
        .max(area.y)
        .min(area.bottom() - height);

    Some(Rect::new(x, y, width, height))
}

/// Smudges a share of the characters proportional to `severity`.
pub fn blur(line: &str, severity: f64, salt: usize) -> String {
    let cutoff = (severity.clamp(0.0, 1.0) * 100.0) as usize;
    line.chars()
        .enumerate()
        .map(|(i, c)| {
            if c != ' ' && (i * 37 + salt * 11) % 100 < cutoff {
                '░'
            } else {
                c
            }
        })
        .collect()
}

fn hint_style() -> Style {
    Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC)
}

pub fn render_start(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1), // title
            Constraint::Length(1),
            Constraint::Length(1), // call to action
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled("overdue", bold_style.fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled("Click to start working", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(click/space) work  (r)estart  (esc)ape",
        hint_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

pub fn render_work(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // deadline
            Constraint::Min(0),    // work item
            Constraint::Length(1), // status
        ])
        .split(area);

    render_deadline(snapshot, chunks[0], buf);

    let title = match snapshot.work_item {
        Some(item) => format!("Work item {}", item + 1),
        None => "Inbox".to_string(),
    };
    let offset = snapshot.work_item.unwrap_or(0);
    let lines: Vec<Line> = (0..chunks[1].height.saturating_sub(2) as usize)
        .map(|i| {
            let text = WORK_LINES[(offset + i) % WORK_LINES.len()];
            Line::from(blur(text, snapshot.severity, offset + i))
        })
        .collect();

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);

    let status = Line::from(vec![
        Span::styled(
            format!("{}  ", snapshot.day_phase),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("Day {}  ", snapshot.days_completed + 1)),
        Span::styled("(click/space) work  (enter) take prompt  (r)estart  (esc)ape", hint_style()),
    ]);
    Paragraph::new(status).render(chunks[2], buf);

    if let Some(rect) = prompt_rect(area, snapshot) {
        Clear.render(rect, buf);
        Paragraph::new(Span::styled(
            snapshot.prompt_label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .render(rect, buf);
    }
}

fn render_deadline(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let fraction = snapshot.time_remaining_fraction.clamp(0.0, 1.0);
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Deadline"))
        .gauge_style(Style::default().fg(due_color(fraction)))
        .ratio(fraction)
        .label(snapshot.time_remaining_text.as_str())
        .render(area, buf);
}

pub fn render_activity(snapshot: &SessionSnapshot, area: Rect, buf: &mut Buffer) {
    let color = tint_color(snapshot.activity_tint);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Length(1), // activity text
            Constraint::Min(0),
            Constraint::Length(1), // legend
        ])
        .split(area);

    render_deadline(snapshot, chunks[0], buf);

    Paragraph::new(Span::styled(
        snapshot.activity_screen_text.as_str(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled("(click/space) keep going", hint_style()))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
}

pub fn render_end(
    snapshot: &SessionSnapshot,
    missed_threshold: u32,
    restart_in: f64,
    area: Rect,
    buf: &mut Buffer,
) {
    let color = tint_color(snapshot.end_tint);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(1), // message
            Constraint::Length(1),
            Constraint::Length(1), // summary
            Constraint::Min(0),
            Constraint::Length(1), // countdown
        ])
        .split(area);

    Paragraph::new(Span::styled(
        snapshot.end_message,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let [morning, afternoon, night] = snapshot.missed_by_phase;
    let summary = format!(
        "{} days   missed: {morning}/{missed_threshold} meals, {afternoon}/{missed_threshold} breaks, {night}/{missed_threshold} nights",
        snapshot.days_completed
    );
    // burnouts name the limit that was hit
    let summary_style = if snapshot.end_state.is_burnout() {
        Style::default().fg(color)
    } else {
        Style::default()
    };
    Paragraph::new(Span::styled(summary, summary_style))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!("Restarting in {:.1}s  (r)estart now  (esc)ape", restart_in.max(0.0)),
        hint_style(),
    ))
    .alignment(Alignment::Center)
    .render(chunks[5], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use overdue::{
        session::{Input, Session},
        snapshot::PromptPosition,
        GameConfig,
    };

    fn snapshot_with_prompt(x: f64, y: f64, label: &'static str) -> SessionSnapshot {
        let mut snapshot = Session::seeded(GameConfig::default(), 1).unwrap().snapshot();
        snapshot.prompt_visible = true;
        snapshot.prompt_position = PromptPosition { x, y };
        snapshot.prompt_label = label;
        snapshot
    }

    #[test]
    fn test_prompt_rect_hidden() {
        let snapshot = Session::seeded(GameConfig::default(), 1).unwrap().snapshot();
        assert_eq!(prompt_rect(Rect::new(0, 0, 80, 24), &snapshot), None);
    }

    #[test]
    fn test_prompt_rect_centered_on_position() {
        let snapshot = snapshot_with_prompt(0.5, 0.5, "Eat");
        let rect = prompt_rect(Rect::new(0, 0, 80, 24), &snapshot).unwrap();
        assert_eq!(rect, Rect::new(36, 11, 9, 3));
    }

    #[test]
    fn test_prompt_rect_stays_inside_area() {
        let area = Rect::new(10, 5, 30, 10);
        for (x, y) in [(0.1, 0.1), (0.9, 0.9), (0.1, 0.9), (0.9, 0.1)] {
            let snapshot = snapshot_with_prompt(x, y, "Sleep");
            let rect = prompt_rect(area, &snapshot).unwrap();
            assert_eq!(rect.intersection(area), rect);
        }

        let tiny = Rect::new(0, 0, 4, 2);
        let rect = prompt_rect(tiny, &snapshot_with_prompt(0.5, 0.5, "Break")).unwrap();
        assert_eq!(rect, tiny);
    }

    #[test]
    fn test_blur_scales_with_severity() {
        let line = "the quick brown fox jumps over the lazy dog";
        assert_eq!(blur(line, 0.0, 3), line);

        let full = blur(line, 1.0, 3);
        assert!(full.chars().filter(|c| *c != ' ').all(|c| c == '░'));

        let count = |s: &str| s.chars().filter(|c| *c == '░').count();
        assert!(count(&blur(line, 0.25, 3)) <= count(&blur(line, 0.75, 3)));
    }

    #[test]
    fn test_tint_colors() {
        assert_eq!(tint_color(Tint::Calm), Color::Green);
        assert_eq!(tint_color(Tint::Alarm), Color::Red);
        assert_eq!(due_color(0.9), Color::Green);
        assert_eq!(due_color(0.3), Color::Yellow);
        assert_eq!(due_color(0.1), Color::Red);
    }

    #[test]
    fn test_render_end_summary() {
        let mut session = Session::seeded(
            GameConfig {
                work_item_count: 0,
                ..GameConfig::default()
            },
            1,
        )
        .unwrap();
        session.advance(0.0, &[Input::Start]);
        session.advance(0.0, &[Input::Primary]);

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        render_end(&session.snapshot(), 3, 4.0, area, &mut buf);

        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Done!"));
        assert!(content.contains("0 days"));
        assert!(content.contains("0/3 meals"));
        assert!(content.contains("Restarting in 4.0s"));
    }
}
