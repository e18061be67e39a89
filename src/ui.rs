use ratatui::{
    layout::{Constraint, Layout},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::app::{App, AppMode, SearchInput};
use crate::components::help::HelpOverlay;
use crate::components::search::SearchBarWidget;
use crate::components::status_bar::StatusBarWidget;
use crate::components::tree::TreeWidget;
use crate::theme::ThemeColors;

/// Display options resolved from config once at startup.
pub struct ViewOptions {
    pub theme: ThemeColors,
    pub use_icons: bool,
    pub show_status: bool,
}

/// Render the application UI.
pub fn render(app: &mut App, view: &ViewOptions, frame: &mut Frame) {
    let theme = &view.theme;
    let show_tabs = app.panels.len() > 1;
    let show_search = app.mode == AppMode::Search || app.panel().is_searching();

    let [tabs_area, tree_area, search_area, status_area] = Layout::vertical([
        Constraint::Length(u16::from(show_tabs)),
        Constraint::Min(3),
        Constraint::Length(u16::from(show_search)),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    if show_tabs {
        let titles: Vec<Line> = app
            .panels
            .iter()
            .map(|view| {
                Line::from(format!(
                    " {} ({}) ",
                    view.panel.title(),
                    view.panel.path_count()
                ))
            })
            .collect();
        let tabs = Tabs::new(titles)
            .select(app.focused)
            .style(Style::default().fg(theme.dim_fg))
            .highlight_style(
                Style::default()
                    .fg(theme.border_focused_fg)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, tabs_area);
    }

    let title = if show_tabs {
        format!(" {} ", app.panel().title())
    } else {
        format!(" {} ", app.panels[app.focused].source.describe())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_fg));

    // Keep the cursor row visible and remember where rows land for mouse hits.
    let inner = block.inner(tree_area);
    app.tree_area = inner;
    app.panel_mut().update_scroll(inner.height as usize);

    let tree_widget = TreeWidget::new(app.panel(), theme)
        .use_icons(view.use_icons)
        .show_status(view.show_status)
        .block(block);
    frame.render_widget(tree_widget, tree_area);

    if show_search {
        // Outside search mode the bar mirrors the focused panel's kept query.
        let kept = SearchInput {
            input: app.panel().query().to_string(),
            cursor_position: 0,
        };
        let input = if app.mode == AppMode::Search {
            &app.search
        } else {
            &kept
        };
        let search_widget = SearchBarWidget::new(input, theme)
            .editing(app.mode == AppMode::Search)
            .match_count(app.panel().rows().len());
        frame.render_widget(search_widget, search_area);
    }

    let cursor_path = app
        .panel()
        .cursor_row()
        .map(|row| row.path.clone())
        .unwrap_or_default();
    let selected = app.panel().selection().selected.len();
    let info = if selected > 0 {
        format!("{} paths · {} selected", app.panel().path_count(), selected)
    } else {
        format!("{} paths", app.panel().path_count())
    };
    let mut status_bar = StatusBarWidget::new(&cursor_path, &info, theme);
    if !app.watcher_active {
        status_bar = status_bar.watcher_status("[no watch]");
    }
    if let Some((msg, _)) = &app.status_message {
        status_bar = status_bar.status_message(msg);
    }
    frame.render_widget(status_bar, status_area);

    if app.mode == AppMode::Help {
        frame.render_widget(HelpOverlay::new(theme, app.help_scroll), frame.area());
    }
}
