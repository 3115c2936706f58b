use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::ui::theme::Theme;

/// One-row gauge with a centered caption.
pub struct ProgressBar<'a> {
    pub caption: String,
    pub ratio: f64,
    pub fill: Option<Color>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(caption: impl Into<String>, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            caption: caption.into(),
            ratio: ratio.clamp(0.0, 1.0),
            fill: None,
            theme,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        if area.width == 0 || area.height == 0 {
            return;
        }

        let fill = self.fill.unwrap_or_else(|| colors.bar_filled());
        let filled_width = (self.ratio * area.width as f64).round() as u16;

        for x in area.x..area.x + area.width {
            let style = if x < area.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, area.y)].set_style(style);
        }

        let caption_len = self.caption.chars().count() as u16;
        let caption_x = area.x + (area.width.saturating_sub(caption_len)) / 2;
        for (i, ch) in self.caption.chars().enumerate() {
            let x = caption_x + i as u16;
            if x >= area.x + area.width {
                break;
            }
            let cell = &mut buf[(x, area.y)];
            cell.set_char(ch);
            if x < area.x + filled_width {
                cell.set_fg(colors.bg());
            } else {
                cell.set_fg(colors.fg());
            }
        }
    }
}
