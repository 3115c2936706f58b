use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::store::ranking::{RankingEntry, position_badge, relative_date};
use crate::ui::theme::Theme;

pub struct Leaderboard<'a> {
    pub entries: &'a [RankingEntry],
    pub now: DateTime<Utc>,
    pub highlight: Option<usize>,
    pub theme: &'a Theme,
}

impl<'a> Leaderboard<'a> {
    pub fn new(entries: &'a [RankingEntry], now: DateTime<Utc>, theme: &'a Theme) -> Self {
        Self {
            entries,
            now,
            highlight: None,
            theme,
        }
    }
}

impl Widget for Leaderboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Leaderboard ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(inner);

        if self.entries.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No scores yet. Finish a quiz to enter the table.",
                Style::default().fg(colors.muted()),
            )))
            .render(layout[0], buf);
        } else {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!(
                        "  {:<5} {:<20} {:>7}  {:<22} {:>8}",
                        "Pos", "Player", "Score", "Category", "When"
                    ),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "  ──────────────────────────────────────────────────────────────────",
                    Style::default().fg(colors.border()),
                )),
            ];

            for (i, entry) in self.entries.iter().enumerate() {
                let position = i + 1;
                let score = format!("{}/{}", entry.correct_answers, entry.questions_answered);
                let category: String = entry.category.chars().take(22).collect();
                let row = format!(
                    "  {:<5} {:<20} {:>7}  {:<22} {:>8}",
                    position_badge(position),
                    entry.player_name,
                    score,
                    category,
                    relative_date(entry.date, self.now),
                );

                let style = if self.highlight == Some(position) {
                    Style::default()
                        .fg(colors.accent_alt())
                        .add_modifier(Modifier::BOLD)
                } else if position <= 3 {
                    Style::default().fg(colors.warning())
                } else {
                    Style::default().fg(colors.fg())
                };
                lines.push(Line::from(Span::styled(row, style)));
            }
            Paragraph::new(lines).render(layout[0], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "  [Esc/q] Back  [c] Clear table",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[1], buf);
    }
}
