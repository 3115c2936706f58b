use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::game::{QuizSession, Selection};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::wrapped_line_count;
use crate::ui::theme::Theme;

const OPTION_KEYS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];
const LOW_TIME_SECS: u32 = 5;

pub fn option_key(index: usize) -> char {
    OPTION_KEYS.get(index).copied().unwrap_or('?')
}

/// The current question with its countdown, options and, once the
/// answer is checked, the feedback and explanation.
pub struct QuestionCard<'a> {
    pub session: &'a QuizSession,
    pub highlighted: usize,
    pub theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(session: &'a QuizSession, highlighted: usize, theme: &'a Theme) -> Self {
        Self {
            session,
            highlighted,
            theme,
        }
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let state = self.session.state();
        let Some(question) = self.session.current_question() else {
            return;
        };

        let block = Block::bordered()
            .title(format!(" {} ", self.session.title()))
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let question_height =
            wrapped_line_count(&question.question, inner.width.saturating_sub(2) as usize) as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(question_height + 1),
                Constraint::Length(question.options.len() as u16 * 2),
                Constraint::Min(0),
            ])
            .split(inner);

        let counter = format!(
            " Question {}/{}",
            state.current_index + 1,
            state.questions.len()
        );
        let score = format!("Score {} ", state.score);
        let pad = (layout[0].width as usize)
            .saturating_sub(counter.chars().count() + score.chars().count());
        Paragraph::new(Line::from(vec![
            Span::styled(counter, Style::default().fg(colors.muted())),
            Span::raw(" ".repeat(pad)),
            Span::styled(
                score,
                Style::default()
                    .fg(colors.accent_alt())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .render(layout[0], buf);

        let duration = self.session.seconds_per_question().max(1);
        let remaining = state.time_remaining;
        let mut bar = ProgressBar::new(
            format!("{remaining}s"),
            remaining as f64 / duration as f64,
            self.theme,
        );
        if remaining <= LOW_TIME_SECS {
            bar = bar.fill(colors.incorrect());
        }
        bar.render(layout[1], buf);

        Paragraph::new(Line::from(Span::styled(
            question.question.as_str(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .wrap(Wrap { trim: true })
        .render(
            Rect {
                x: layout[3].x + 1,
                width: layout[3].width.saturating_sub(2),
                ..layout[3]
            },
            buf,
        );

        let mut option_lines: Vec<Line> = Vec::new();
        for (i, option) in question.options.iter().enumerate() {
            let chosen = state.selection == Selection::Chosen(i);
            let (mark, style) = if state.answer_checked {
                if question.is_correct(i) {
                    ("✓", Style::default().fg(colors.correct()).add_modifier(Modifier::BOLD))
                } else if chosen {
                    ("✗", Style::default().fg(colors.incorrect()).add_modifier(Modifier::BOLD))
                } else {
                    (" ", Style::default().fg(colors.muted()))
                }
            } else if i == self.highlighted {
                (">", Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD))
            } else {
                (" ", Style::default().fg(colors.fg()))
            };
            option_lines.push(Line::from(Span::styled(
                format!(" {mark} [{}] {option}", option_key(i)),
                style,
            )));
            option_lines.push(Line::from(""));
        }
        Paragraph::new(option_lines).render(layout[4], buf);

        if !state.answer_checked {
            return;
        }
        let (headline, headline_color) = match state.selection {
            Selection::Chosen(i) if question.is_correct(i) => ("Correct!", colors.correct()),
            Selection::TimedOut => ("Time's up!", colors.warning()),
            _ => ("Wrong answer.", colors.incorrect()),
        };
        let mut feedback = vec![Line::from(Span::styled(
            format!(" {headline}"),
            Style::default()
                .fg(headline_color)
                .add_modifier(Modifier::BOLD),
        ))];
        if let Some(explanation) = &question.explanation {
            feedback.push(Line::from(Span::styled(
                format!(" {explanation}"),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(feedback)
            .wrap(Wrap { trim: false })
            .render(layout[5], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_keys_are_letters() {
        assert_eq!(option_key(0), 'A');
        assert_eq!(option_key(3), 'D');
        assert_eq!(option_key(42), '?');
    }
}
