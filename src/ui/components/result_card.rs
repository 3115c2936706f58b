use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::{QuizResult, Verdict};
use crate::store::ranking::position_badge;
use crate::ui::theme::Theme;

pub struct ResultCard<'a> {
    pub title: &'a str,
    pub result: QuizResult,
    pub errors_recorded: usize,
    pub position: Option<usize>,
    pub is_revision: bool,
    pub theme: &'a Theme,
}

impl<'a> ResultCard<'a> {
    pub fn new(title: &'a str, result: QuizResult, theme: &'a Theme) -> Self {
        Self {
            title,
            result,
            errors_recorded: 0,
            position: None,
            is_revision: false,
            theme,
        }
    }
}

impl Widget for ResultCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Quiz Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.title,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let verdict_color = match self.result.verdict {
            Verdict::Perfect | Verdict::Great => colors.correct(),
            Verdict::Average => colors.warning(),
            Verdict::TryAgain => colors.incorrect(),
        };
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!("{}%", self.result.percentage),
                Style::default()
                    .fg(verdict_color)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                self.result.verdict.message(),
                Style::default().fg(verdict_color),
            )),
        ])
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let score_line = Line::from(vec![
            Span::styled("  Correct:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}/{}", self.result.score, self.result.total),
                Style::default()
                    .fg(colors.accent_alt())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(score_line).render(layout[2], buf);

        if !self.is_revision {
            let errors_line = Line::from(vec![
                Span::styled("  Review:   ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{} new question(s) saved to Error History", self.errors_recorded),
                    Style::default().fg(colors.muted()),
                ),
            ]);
            Paragraph::new(errors_line).render(layout[3], buf);
        }

        if let Some(position) = self.position {
            let rank_line = Line::from(vec![
                Span::styled("  Ranking:  ", Style::default().fg(colors.fg())),
                Span::styled(
                    position_badge(position),
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(rank_line).render(layout[4], buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled("  [r] Retry  ", Style::default().fg(colors.accent())),
            Span::styled("[l] Leaderboard  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Home", Style::default().fg(colors.accent())),
        ]))
        .render(layout[6], buf);
    }
}
