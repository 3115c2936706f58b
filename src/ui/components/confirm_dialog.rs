use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Centered yes/no overlay drawn on top of the current screen.
pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(title: &'a str, message: &'a str, theme: &'a Theme) -> Self {
        Self {
            title,
            message,
            theme,
        }
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let dialog_width = (self.message.chars().count() as u16 + 8)
            .max(30)
            .min(area.width);
        let dialog_height = 6u16.min(area.height);
        let dialog_x = area.x + area.width.saturating_sub(dialog_width) / 2;
        let dialog_y = area.y + area.height.saturating_sub(dialog_height) / 2;
        let dialog_area = Rect::new(dialog_x, dialog_y, dialog_width, dialog_height);

        Clear.render(dialog_area, buf);
        let dialog = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(self.message, Style::default().fg(colors.fg()))),
            Line::from(""),
            Line::from(Span::styled(
                "[y] Yes   [n] No",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .style(Style::default().bg(colors.bg()))
        .block(
            Block::bordered()
                .title(format!(" {} ", self.title))
                .border_style(Style::default().fg(colors.incorrect()))
                .style(Style::default().bg(colors.bg())),
        );
        dialog.render(dialog_area, buf);
    }
}
