//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light), plus custom hex overrides from the
//! config file layered on top of the dark one.

use ratatui::style::Color;

use pathtree::tree::StatusCode;

use crate::config::{ThemeColorsConfig, ThemeConfig};

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Tree panel
    pub tree_fg: Color,
    pub tree_cursor_bg: Color,
    pub tree_selected_bg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,
    pub match_fg: Color,

    // Change status letters
    pub status_added_fg: Color,
    pub status_modified_fg: Color,
    pub status_deleted_fg: Color,
    pub status_renamed_fg: Color,
    pub status_type_changed_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable)
    pub warning_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

impl ThemeColors {
    /// Foreground for a status letter and its row name.
    pub fn status_color(&self, code: StatusCode) -> Color {
        match code {
            StatusCode::Added => self.status_added_fg,
            StatusCode::Modified => self.status_modified_fg,
            StatusCode::Deleted => self.status_deleted_fg,
            StatusCode::Renamed => self.status_renamed_fg,
            StatusCode::TypeChanged => self.status_type_changed_fg,
        }
    }
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(205, 214, 244),         // #cdd6f4 (text)
        tree_cursor_bg: Color::Rgb(69, 71, 90),     // #45475a (surface1)
        tree_selected_bg: Color::Rgb(49, 50, 68),   // #313244 (surface0)
        tree_dir_fg: Color::Rgb(137, 180, 250),     // #89b4fa (blue)
        tree_file_fg: Color::Rgb(205, 214, 244),    // #cdd6f4
        match_fg: Color::Rgb(249, 226, 175),        // #f9e2af (yellow)

        status_added_fg: Color::Rgb(166, 227, 161),        // #a6e3a1 (green)
        status_modified_fg: Color::Rgb(250, 179, 135),     // #fab387 (peach)
        status_deleted_fg: Color::Rgb(243, 139, 168),      // #f38ba8 (red)
        status_renamed_fg: Color::Rgb(148, 226, 213),      // #94e2d5 (teal)
        status_type_changed_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)

        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086 (overlay0)
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        tree_fg: Color::Rgb(76, 79, 105),           // #4c4f69 (text)
        tree_cursor_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        tree_selected_bg: Color::Rgb(230, 233, 239), // #e6e9ef (surface0)
        tree_dir_fg: Color::Rgb(30, 102, 245),      // #1e66f5 (blue)
        tree_file_fg: Color::Rgb(76, 79, 105),
        match_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)

        status_added_fg: Color::Rgb(64, 160, 43),         // #40a02b (green)
        status_modified_fg: Color::Rgb(254, 100, 11),     // #fe640b (peach)
        status_deleted_fg: Color::Rgb(210, 15, 57),       // #d20f39 (red)
        status_renamed_fg: Color::Rgb(23, 146, 153),      // #179299 (teal)
        status_type_changed_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),

        warning_fg: Color::Rgb(223, 142, 29),
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default): dark Catppuccin palette
/// - `"light"`: light Catppuccin palette
/// - `"custom"`: start from dark palette, then override with custom hex values
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    let scheme = config.scheme.as_deref().unwrap_or("dark");
    match scheme {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        other => {
            if other != "dark" {
                tracing::warn!(scheme = other, "unknown theme scheme, using dark");
            }
            dark_theme()
        }
    }
}

/// Overwrite `slot` when `hex` is present and parses.
fn override_color(slot: &mut Color, hex: &Option<String>) {
    if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
        *slot = color;
    }
}

/// Apply custom hex color overrides on top of an existing theme.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    override_color(&mut theme.tree_fg, &custom.tree_fg);
    override_color(&mut theme.tree_cursor_bg, &custom.tree_cursor_bg);
    override_color(&mut theme.tree_selected_bg, &custom.tree_selected_bg);
    override_color(&mut theme.tree_dir_fg, &custom.tree_dir_fg);
    override_color(&mut theme.tree_file_fg, &custom.tree_file_fg);
    override_color(&mut theme.match_fg, &custom.match_fg);
    override_color(&mut theme.status_added_fg, &custom.status_added_fg);
    override_color(&mut theme.status_modified_fg, &custom.status_modified_fg);
    override_color(&mut theme.status_deleted_fg, &custom.status_deleted_fg);
    override_color(&mut theme.status_renamed_fg, &custom.status_renamed_fg);
    override_color(
        &mut theme.status_type_changed_fg,
        &custom.status_type_changed_fg,
    );
    override_color(&mut theme.status_bg, &custom.status_bg);
    override_color(&mut theme.status_fg, &custom.status_fg);
    override_color(&mut theme.border_fg, &custom.border_fg);
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_light_theme() {
        let config = ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(30, 102, 245));
    }

    #[test]
    fn test_resolve_default_and_unknown_are_dark() {
        let theme = resolve_theme(&ThemeConfig::default());
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
        let config = ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        };
        assert_eq!(resolve_theme(&config).tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_resolve_custom_overrides() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                tree_fg: Some("#c0caf5".to_string()),
                status_deleted_fg: Some("#ff0000".to_string()),
                match_fg: Some("#zzzzzz".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_fg, Color::Rgb(192, 202, 245));
        assert_eq!(theme.status_color(StatusCode::Deleted), Color::Rgb(255, 0, 0));
        // Invalid hex keeps the dark default.
        assert_eq!(theme.match_fg, dark_theme().match_fg);
    }

    #[test]
    fn test_status_colors_are_distinct() {
        let theme = dark_theme();
        let codes = [
            StatusCode::Added,
            StatusCode::Modified,
            StatusCode::Deleted,
            StatusCode::Renamed,
            StatusCode::TypeChanged,
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(theme.status_color(*a), theme.status_color(*b));
            }
        }
    }
}
