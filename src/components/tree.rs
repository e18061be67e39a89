use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use pathtree::panel::Panel;
use pathtree::tree::{highlight, row_prefix, VisibleRow};

use crate::theme::ThemeColors;

/// Renders one panel's visible rows with box-drawing prefixes, status letters
/// and search-match highlighting.
///
/// Layout of a row: `{prefix}{indicator} {status}{name}`. The indicator is
/// always two cells wide so mouse hit-testing can find it from the prefix.
pub struct TreeWidget<'a> {
    panel: &'a Panel,
    theme: &'a ThemeColors,
    use_icons: bool,
    show_status: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(panel: &'a Panel, theme: &'a ThemeColors) -> Self {
        Self {
            panel,
            theme,
            use_icons: true,
            show_status: true,
            block: None,
        }
    }

    pub fn use_icons(mut self, use_icons: bool) -> Self {
        self.use_icons = use_icons;
        self
    }

    pub fn show_status(mut self, show_status: bool) -> Self {
        self.show_status = show_status;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn indicator(&self, row: &VisibleRow) -> &'static str {
        match (self.use_icons, row.is_folder, row.is_expanded) {
            (true, true, true) => "\u{f07c} ",
            (true, true, false) => "\u{f07b} ",
            (true, false, _) => "\u{f15b} ",
            (false, true, true) => "▾ ",
            (false, true, false) => "▸ ",
            (false, false, _) => "  ",
        }
    }

    fn row_line(&self, index: usize, row: &VisibleRow, is_cursor: bool) -> Line<'a> {
        let selected = self.panel.is_selected(&row.path);
        let mut base = Style::default();
        if selected {
            base = base.bg(self.theme.tree_selected_bg);
        }
        if is_cursor {
            base = base.bg(self.theme.tree_cursor_bg).add_modifier(Modifier::BOLD);
        }

        let name_style = match (row.status, row.is_folder) {
            (Some(code), _) if self.show_status => base.fg(self.theme.status_color(code)),
            (_, true) => base.fg(self.theme.tree_dir_fg).add_modifier(Modifier::BOLD),
            (_, false) => base.fg(self.theme.tree_file_fg),
        };

        let mut spans = vec![
            Span::styled(row_prefix(self.panel.rows(), index), base.fg(self.theme.dim_fg)),
            Span::styled(self.indicator(row), name_style),
        ];

        if self.show_status {
            let letter = match row.status {
                Some(code) => format!("{} ", code.as_char()),
                None => "  ".to_string(),
            };
            let style = match row.status {
                Some(code) => base.fg(self.theme.status_color(code)).add_modifier(Modifier::BOLD),
                None => base,
            };
            spans.push(Span::styled(letter, style));
        }

        let match_style = name_style
            .fg(self.theme.match_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        for segment in highlight(&row.name, self.panel.query()) {
            let style = if segment.matched { match_style } else { name_style };
            spans.push(Span::styled(segment.text, style));
        }

        if selected {
            spans.push(Span::styled(" ●", base.fg(self.theme.accent_fg)));
        }

        Line::from(spans).style(base)
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let rows = self.panel.rows();
        let visible_height = inner_area.height as usize;
        if visible_height == 0 {
            return;
        }

        if rows.is_empty() {
            let message = if self.panel.is_searching() {
                format!("No paths match \"{}\"", self.panel.query().trim())
            } else {
                "No paths".to_string()
            };
            let line = Line::from(Span::styled(message, Style::default().fg(self.theme.dim_fg)));
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
            return;
        }

        let scroll = self.panel.scroll_offset;
        for (i, (index, row)) in rows
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible_height)
            .enumerate()
        {
            let y = inner_area.y + i as u16;
            let line = self.row_line(index, row, index == self.panel.cursor);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
