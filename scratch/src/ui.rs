//! Terminal output settings
//!
//! Color and prompt settings are resolved once at startup and passed to
//! everything that prints.

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

/// Default prompt shown when reading input
pub const DEFAULT_PROMPT: &str = "› ";

/// Output settings for one invocation
#[derive(Debug, Clone)]
pub struct Ui {
    /// Emit ANSI colors
    pub color: bool,
    /// Prompt prefix for input lines
    pub prompt: String,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            color: false,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Ui {
    /// Detect terminal capabilities from the environment
    ///
    /// `color` is the configured preference (None = auto), `no_color` the
    /// command line flag, which always wins.
    pub fn detect(color: Option<bool>, no_color: bool, prompt: impl Into<String>) -> Self {
        let term = std::env::var("TERM").unwrap_or_default();
        let env_flag = |name: &str| std::env::var_os(name).is_some_and(|v| !v.is_empty());

        let raw = !std::io::stdout().is_terminal() && !env_flag("FAKETTY");
        let term_color = term.contains("xterm") || term.contains("color") || term == "screen";

        let auto = term_color && !raw && !env_flag("NO_COLOR");
        let color = !no_color && color.unwrap_or(auto);

        Self {
            color,
            prompt: prompt.into(),
        }
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.color { style(text).to_string() } else { text.to_string() }
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    pub fn dimmed(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    /// Horizontal rule used around the variables review table
    pub fn separator(&self) -> String {
        self.dimmed(&"-".repeat(88))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_output_without_color() {
        let ui = Ui::default();
        assert_eq!(ui.red("error"), "error");
        assert_eq!(ui.bold("x"), "x");
    }

    #[test]
    fn test_no_color_flag_wins() {
        let ui = Ui::detect(Some(true), true, "> ");
        assert!(!ui.color);
        assert_eq!(ui.prompt, "> ");
    }

    #[test]
    fn test_separator_width() {
        let ui = Ui::default();
        assert_eq!(ui.separator().len(), 88);
    }
}
