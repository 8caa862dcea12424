//! CLI argument parsing for scratch

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use std::io::Write;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  scratch                      List all templates
  scratch package              Show files and variables of template \"package\"
  scratch package .            Generate package blank files in current directory
  scratch service ~/src/myapp  Generate service blank files in sources directory";

#[derive(Parser, Debug)]
#[command(name = "scratch")]
#[command(author, version, about = "Utility for generating blank files for apps and services", long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Template name (omit to list templates)
    pub template: Option<String>,

    /// Target directory (omit to show template contents)
    pub dir: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory with templates
    #[arg(short, long)]
    pub templates: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Disable colors in output
    #[arg(long = "no-color", visible_alias = "nc")]
    pub no_color: bool,

    /// Print shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    pub completion: Option<Shell>,
}

/// What the invocation asks for, derived from the positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List,
    Show { template: String },
    Generate { template: String, dir: PathBuf },
}

impl Cli {
    pub fn action(&self) -> Action {
        match (&self.template, &self.dir) {
            (Some(template), Some(dir)) => Action::Generate {
                template: template.clone(),
                dir: dir.clone(),
            },
            (Some(template), None) => Action::Show {
                template: template.clone(),
            },
            _ => Action::List,
        }
    }
}

/// Write a completion script for `shell`
pub fn generate_completion(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "scratch", out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions() {
        let cli = Cli::parse_from(["scratch"]);
        assert_eq!(cli.action(), Action::List);

        let cli = Cli::parse_from(["scratch", "package"]);
        assert_eq!(
            cli.action(),
            Action::Show {
                template: "package".to_string()
            }
        );

        let cli = Cli::parse_from(["scratch", "package", "out"]);
        assert_eq!(
            cli.action(),
            Action::Generate {
                template: "package".to_string(),
                dir: PathBuf::from("out")
            }
        );
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["scratch", "--nc", "-t", "/tmp/templates", "--completion", "bash"]);
        assert!(cli.no_color);
        assert_eq!(cli.templates, Some(PathBuf::from("/tmp/templates")));
        assert_eq!(cli.completion, Some(Shell::Bash));
    }

    #[test]
    fn test_completion_script() {
        let mut out = Vec::new();
        generate_completion(Shell::Bash, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("scratch"));
    }

    #[test]
    fn test_command_is_valid() {
        Cli::command().debug_assert();
    }
}
