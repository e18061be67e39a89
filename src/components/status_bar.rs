use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

const KEY_HINTS: &str = " /:search  space:select  E/C:expand  ?:help ";

/// Status bar: cursor path, panel counts, key hints, or a transient message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    watcher_status: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            info,
            theme,
            status_message: None,
            watcher_status: None,
        }
    }

    pub fn status_message(mut self, msg: &'a str) -> Self {
        self.status_message = Some(msg);
        self
    }

    pub fn watcher_status(mut self, status: &'a str) -> Self {
        self.watcher_status = Some(status);
        self
    }
}

/// Keep the last `max` characters, marking the cut with `...`.
fn truncate_left(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let tail: String = text.chars().skip(len - (max - 3)).collect();
    format!("...{tail}")
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let base = Style::default().bg(self.theme.status_bg);

        if let Some(msg) = self.status_message {
            let display: String = msg.chars().take(width).collect();
            let display = format!("{:<width$}", display, width = width);
            let line = Line::from(Span::styled(display, base.fg(self.theme.warning_fg)));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // [path] ... [info] [watcher] [hints]
        let watcher = self.watcher_status.map(|w| format!(" {w}")).unwrap_or_default();
        let right_len = self.info.chars().count()
            + watcher.chars().count()
            + KEY_HINTS.chars().count();
        let path_width = width.saturating_sub(right_len + 1);
        let path_display = truncate_left(self.path_str, path_width);
        let gap = width
            .saturating_sub(path_display.chars().count())
            .saturating_sub(right_len);

        let spans = vec![
            Span::styled(path_display, base.fg(self.theme.status_fg)),
            Span::styled(" ".repeat(gap), base),
            Span::styled(
                self.info.to_string(),
                base.fg(self.theme.accent_fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(watcher, base.fg(self.theme.warning_fg)),
            Span::styled(
                KEY_HINTS,
                base.fg(self.theme.dim_fg).add_modifier(Modifier::DIM),
            ),
        ];

        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
