//! Console helpers: color toggling and the colored error prefix.

use owo_colors::OwoColorize;

/// Whether the environment permits colored output (`NO_COLOR` unset).
pub fn env_allows_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Colors are on unless `--no-color` is passed or `NO_COLOR` is set.
pub fn use_colors(no_color_flag: bool) -> bool {
    !no_color_flag && env_allows_color()
}

/// Apply `style` to `text` only when `color` is on.
pub fn paint(color: bool, text: &str, style: impl FnOnce(&str) -> String) -> String {
    if color {
        style(text)
    } else {
        text.to_string()
    }
}

pub fn error_prefix() -> String {
    paint(env_allows_color(), "error:", |s| s.red().bold().to_string())
}
