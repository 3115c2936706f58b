use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::content::category::{Category, HomeTab};
use crate::ui::theme::Theme;

/// Home screen: tab strip plus the categories of the active tab.
pub struct CategoryMenu<'a> {
    pub tab: HomeTab,
    pub categories: &'a [&'static Category],
    pub favorites: &'a [String],
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> CategoryMenu<'a> {
    pub fn new(
        tab: HomeTab,
        categories: &'a [&'static Category],
        favorites: &'a [String],
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            tab,
            categories,
            favorites,
            selected,
            theme,
        }
    }

    fn is_favorite(&self, category: &Category) -> bool {
        self.favorites.iter().any(|f| f == category.id)
    }
}

impl Widget for &CategoryMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(Span::styled(
                "NEON QUIZ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick a category and beat the clock",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let tab_spans: Vec<Span> = HomeTab::ALL
            .iter()
            .flat_map(|&tab| {
                let style = if tab == self.tab {
                    Style::default()
                        .fg(colors.accent_alt())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default().fg(colors.muted())
                };
                vec![Span::styled(format!(" {} ", tab.label()), style), Span::raw("  ")]
            })
            .collect();
        Paragraph::new(Line::from(tab_spans))
            .alignment(Alignment::Center)
            .render(layout[1], buf);

        if self.categories.is_empty() {
            let msg = match self.tab {
                HomeTab::Favorites => "No favorites yet. Press [f] on a category to add it.",
                _ => "No categories here.",
            };
            Paragraph::new(Line::from(Span::styled(msg, Style::default().fg(colors.muted()))))
                .alignment(Alignment::Center)
                .render(layout[2], buf);
            return;
        }

        // Two rows per item; scroll so the selection stays visible.
        let visible = (layout[2].height / 2).max(1) as usize;
        let first = self.selected.saturating_sub(visible - 1);

        let mut lines: Vec<Line> = Vec::new();
        for (i, category) in self.categories.iter().enumerate().skip(first).take(visible) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let star = if self.is_favorite(category) { " ★" } else { "" };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            lines.push(Line::from(vec![
                Span::styled(format!(" {indicator} {} ", category.icon), label_style),
                Span::styled(category.title, label_style),
                Span::styled(star, Style::default().fg(colors.warning())),
            ]));
            lines.push(Line::from(Span::styled(
                format!("      {}", category.description),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(lines).render(layout[2], buf);
    }
}
