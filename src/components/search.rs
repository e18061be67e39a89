use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::app::SearchInput;
use crate::theme::ThemeColors;

/// One-line search bar shown under the tree while a query is being edited
/// or is active.
pub struct SearchBarWidget<'a> {
    input: &'a SearchInput,
    theme: &'a ThemeColors,
    editing: bool,
    match_count: usize,
}

impl<'a> SearchBarWidget<'a> {
    pub fn new(input: &'a SearchInput, theme: &'a ThemeColors) -> Self {
        Self {
            input,
            theme,
            editing: false,
            match_count: 0,
        }
    }

    /// Draw the text cursor.
    pub fn editing(mut self, editing: bool) -> Self {
        self.editing = editing;
        self
    }

    /// Number of visible rows for the current query.
    pub fn match_count(mut self, count: usize) -> Self {
        self.match_count = count;
        self
    }
}

impl<'a> Widget for SearchBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let query = &self.input.input;
        let cursor_pos = self.input.cursor_position.min(query.len());

        let label_style = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let input_style = Style::default().fg(self.theme.tree_fg);
        let cursor_style = Style::default()
            .bg(self.theme.tree_fg)
            .fg(self.theme.status_bg)
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![Span::styled(" / ", label_style)];
        if self.editing {
            let (before, rest) = query.split_at(cursor_pos);
            let mut rest_chars = rest.chars();
            let cursor_char = rest_chars
                .next()
                .map(String::from)
                .unwrap_or_else(|| " ".to_string());
            spans.push(Span::styled(before.to_string(), input_style));
            spans.push(Span::styled(cursor_char, cursor_style));
            spans.push(Span::styled(rest_chars.as_str().to_string(), input_style));
        } else {
            spans.push(Span::styled(query.clone(), input_style));
        }

        let count = format!("  {} rows", self.match_count);
        spans.push(Span::styled(count, Style::default().fg(self.theme.dim_fg)));

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn render(input: &SearchInput, editing: bool) -> Buffer {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        SearchBarWidget::new(input, &tc)
            .editing(editing)
            .match_count(3)
            .render(area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_query_and_count() {
        let input = SearchInput {
            input: "tree".to_string(),
            cursor_position: 4,
        };
        let content = text(&render(&input, false));
        assert!(content.starts_with(" / tree  3 rows"));
    }

    #[test]
    fn cursor_cell_is_inverted_mid_query() {
        let input = SearchInput {
            input: "aéb".to_string(),
            cursor_position: 1,
        };
        let buf = render(&input, true);
        let tc = theme::dark_theme();
        let cell = buf.cell((4, 0)).unwrap();
        assert_eq!(cell.symbol(), "é");
        assert_eq!(cell.bg, tc.tree_fg);
        assert!(text(&buf).starts_with(" / aéb"));
    }

    #[test]
    fn cursor_at_end_is_a_blank_cell() {
        let input = SearchInput {
            input: "ab".to_string(),
            cursor_position: 2,
        };
        let buf = render(&input, true);
        let tc = theme::dark_theme();
        assert_eq!(buf.cell((5, 0)).unwrap().bg, tc.tree_fg);
    }
}
