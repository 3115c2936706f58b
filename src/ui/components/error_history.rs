use std::collections::HashSet;

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::store::history::ErrorEntry;
use crate::ui::theme::Theme;

/// Missed questions, newest first, with a detail pane for the selection.
pub struct ErrorHistoryView<'a> {
    pub entries: &'a [ErrorEntry],
    pub selected: usize,
    pub marked: &'a HashSet<String>,
    pub theme: &'a Theme,
}

impl<'a> ErrorHistoryView<'a> {
    pub fn new(
        entries: &'a [ErrorEntry],
        selected: usize,
        marked: &'a HashSet<String>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            entries,
            selected,
            marked,
            theme,
        }
    }

    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let visible = area.height.max(1) as usize;
        let first = self.selected.saturating_sub(visible - 1);
        let text_width = (area.width as usize).saturating_sub(6);

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, entry)| {
                let is_selected = i == self.selected;
                let mark = if self.marked.contains(&entry.id) { "[x]" } else { "[ ]" };
                let text: String = entry.question.question.chars().take(text_width).collect();
                let style = if is_selected {
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                Line::from(vec![
                    Span::styled(format!(" {mark} "), Style::default().fg(colors.accent_alt())),
                    Span::styled(text, style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(area, buf);
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(entry) = self.entries.get(self.selected) else {
            return;
        };

        let block = Block::bordered()
            .title(format!(" {} ", entry.category_title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        let your_answer = match entry.user_answer() {
            Some(answer) => Span::styled(answer.to_string(), Style::default().fg(colors.incorrect())),
            None => Span::styled("timed out", Style::default().fg(colors.warning())),
        };
        let mut lines = vec![
            Line::from(Span::styled(
                entry.question.question.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Your answer:    ", Style::default().fg(colors.muted())),
                your_answer,
            ]),
            Line::from(vec![
                Span::styled("Correct answer: ", Style::default().fg(colors.muted())),
                Span::styled(
                    entry.question.correct_option().unwrap_or("?"),
                    Style::default().fg(colors.correct()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Missed on:      ", Style::default().fg(colors.muted())),
                Span::styled(
                    entry.date.format("%d %b %Y %H:%M").to_string(),
                    Style::default().fg(colors.fg()),
                ),
            ]),
        ];
        if let Some(explanation) = &entry.question.explanation {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                explanation.as_str(),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

impl Widget for ErrorHistoryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.marked.is_empty() {
            format!(" Error History ({}) ", self.entries.len())
        } else {
            format!(
                " Error History ({}, {} marked) ",
                self.entries.len(),
                self.marked.len()
            )
        };
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                title,
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
                "  No mistakes recorded. Wrong and timed-out answers show up here.",
                Style::default().fg(colors.muted()),
            )))
            .render(layout[0], buf);
        } else {
            let panes = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(layout[0]);
            self.render_list(panes[0], buf);
            self.render_detail(panes[1], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "  [j/k] Move  [Space] Mark  [r] Revise  [x] Delete  [c] Clear all  [Esc] Back",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[1], buf);
    }
}
