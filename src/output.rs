//! Terminal styling for command output.
//!
//! `--color=auto` defers to `console`'s detection (TTY, `TERM=dumb`,
//! `CLICOLOR`, `CLICOLOR_FORCE`) and additionally honours `NO_COLOR`.
//! Without color, emoji are replaced by plain markers and `Updated:` records
//! are printed verbatim so that output stays machine-readable.

use console::style;

/// Whether command output is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag: `always`, `never`, or anything else for auto.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => std::env::var_os("NO_COLOR").is_none() && console::colors_enabled(),
        };
        Self { use_color }
    }

    /// Make `console` styling on stdout and stderr follow this configuration.
    pub fn install(&self) {
        console::set_colors_enabled(self.use_color);
        console::set_colors_enabled_stderr(self.use_color);
    }

    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

/// The emoji when styling is on, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Format one `<verb>: <target>` record, highlighting the verb.
pub fn update_line(config: &OutputConfig, record: &str) -> String {
    match record.split_once(": ") {
        Some((verb, target)) if config.use_color => {
            format!("{}: {}", style(verb).green().bold().force_styling(true), target)
        }
        _ => record.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        assert!(OutputConfig::from_env_and_flag("always").use_color);
        assert!(!OutputConfig::from_env_and_flag("NEVER").use_color);
    }

    #[test]
    fn test_plain_output() {
        let config = OutputConfig::without_color();
        assert_eq!(emoji(&config, "✅", "[OK]"), "[OK]");
        assert_eq!(update_line(&config, "Updated: a.json"), "Updated: a.json");
    }

    #[test]
    fn test_styled_update_line_keeps_target() {
        let config = OutputConfig { use_color: true };
        assert_eq!(emoji(&config, "✅", "[OK]"), "✅");
        let line = update_line(&config, "Updated: a.json");
        assert_ne!(line, "Updated: a.json");
        assert!(line.ends_with(": a.json"));
    }
}
