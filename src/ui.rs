pub mod layout;

use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::controller::ClickOutcome;
use crate::session::Summary;
use crate::slot::{SlotLabel, NUM_SLOTS};
use crate::surface::DisplaySurface;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const SLOT_ROW_HEIGHT: u16 = 5;

/// Terminal rendition of the display surface.
///
/// Holds only what the controller pushed to it plus a little progress text;
/// drawing happens through the [`Widget`] impl.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    total_space: f64,
    widths: [f64; NUM_SLOTS],
    target: Option<SlotLabel>,
    summary: Option<Summary>,
    trials_completed: u32,
    num_trials: u32,
    last_outcome: Option<ClickOutcome>,
}

impl TerminalSurface {
    pub fn new(total_space: f64, num_trials: u32) -> Self {
        Self {
            total_space,
            widths: [0.0; NUM_SLOTS],
            target: None,
            summary: None,
            trials_completed: 0,
            num_trials,
            last_outcome: None,
        }
    }

    pub fn target(&self) -> Option<SlotLabel> {
        self.target
    }

    pub fn widths(&self) -> &[f64; NUM_SLOTS] {
        &self.widths
    }

    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Record how the last click went so the status line can show it
    pub fn record_click(&mut self, trials_completed: u32, outcome: ClickOutcome) {
        self.trials_completed = trials_completed;
        self.last_outcome = Some(outcome);
    }

    fn chunks(&self, area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),               // progress
                Constraint::Min(0),                  // padding
                Constraint::Length(SLOT_ROW_HEIGHT), // slots
                Constraint::Length(1),               // padding
                Constraint::Length(3),               // target readout
                Constraint::Min(0),                  // padding
                Constraint::Length(1),               // legend
            ])
            .split(area)
    }

    /// Slot rectangles for a frame of the given size
    pub fn slot_rects(&self, area: Rect) -> [Rect; NUM_SLOTS] {
        layout::slot_rects(self.chunks(area)[2], &self.widths, self.total_space)
    }

    /// Slot under a mouse click, if any
    pub fn slot_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        layout::slot_at(&self.slot_rects(area), column, row)
    }
}

impl DisplaySurface for TerminalSurface {
    fn render_target(&mut self, label: SlotLabel) {
        self.target = Some(label);
    }

    fn set_slot_width(&mut self, slot: usize, width: f64) {
        self.widths[slot] = width;
    }

    fn notify_summary(&mut self, summary: &Summary) {
        self.trials_completed = summary.trials;
        self.summary = Some(*summary);
    }
}

/// Keyboard shortcut for a slot: `a`-`e` or `1`-`5`
pub fn slot_for_key(code: KeyCode) -> Option<usize> {
    match code {
        KeyCode::Char(c @ 'a'..='e') => Some(c as usize - 'a' as usize),
        KeyCode::Char(c @ 'A'..='E') => Some(c as usize - 'A' as usize),
        KeyCode::Char(c @ '1'..='5') => Some(c as usize - '1' as usize),
        _ => None,
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = self.chunks(area);

        let status = match self.last_outcome {
            Some(ClickOutcome::Correct) => Span::styled("hit", Style::default().fg(Color::Green)),
            Some(ClickOutcome::Incorrect) => Span::styled("miss", Style::default().fg(Color::Red)),
            None => Span::raw(""),
        };
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("trial {}/{}  ", self.trials_completed, self.num_trials),
                dim_style,
            ),
            status,
        ]))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        for (label, rect) in SlotLabel::ALL.iter().zip(self.slot_rects(area)) {
            if rect.width == 0 {
                continue;
            }
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded);
            let inner = block.inner(rect);
            block.render(rect, buf);

            let label_row = Rect {
                y: inner.y + inner.height / 2,
                height: inner.height.min(1),
                ..inner
            };
            Paragraph::new(Span::styled(label.to_string(), bold_style))
                .alignment(Alignment::Center)
                .render(label_row, buf);
        }

        let target_text = self
            .target
            .map(|l| l.to_string())
            .unwrap_or_default();
        Paragraph::new(Span::styled(
            target_text,
            bold_style.fg(Color::Yellow),
        ))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("click")
                .title_alignment(Alignment::Center),
        )
        .render(centered(chunks[4], 11, 3), buf);

        Paragraph::new(Span::styled(
            "click a slot (or press a-e / 1-5)  (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        if let Some(summary) = &self.summary {
            render_summary(summary, area, buf);
        }
    }
}

/// Modal end-of-session notification drawn over the slots
fn render_summary(summary: &Summary, area: Rect, buf: &mut Buffer) {
    let popup = centered(area, 44, 7);
    Clear.render(popup, buf);

    let lines = vec![
        Line::from(Span::styled(
            "end of trial!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "mean click time = {:.3}s (sd {:.3}s)",
            summary.mean_latency_secs, summary.latency_std_dev_secs
        )),
        Line::from(format!(
            "percent errors = {:.1}% ({}/{})",
            summary.error_percent(),
            summary.errors,
            summary.trials
        )),
        Line::from(Span::styled(
            "(esc)ape",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .style(Style::default().fg(Color::Cyan)),
        )
        .render(popup, buf);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
