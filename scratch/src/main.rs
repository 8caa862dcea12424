use std::io::{self, IsTerminal};

use clap::Parser;
use eyre::{Context, Result};
use log::{LevelFilter, debug, info};

use scratch::cli::{Action, Cli, generate_completion};
use scratch::commands::{Outcome, cmd_generate, cmd_list, cmd_show};
use scratch::{Catalog, Config, LinePrompter, ReadlinePrompter, Ui, VariableRegistry};

fn parse_level(level: &str) -> LevelFilter {
    match level.to_uppercase().as_str() {
        "WARNING" => LevelFilter::Warn,
        other => other.parse().unwrap_or_else(|_| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", level);
            LevelFilter::Info
        }),
    }
}

/// Log level priority: --log-level > config file > RUST_LOG > WARN
fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) {
    let mut builder = env_logger::Builder::from_default_env();

    if let Some(level) = cli_log_level.or(config_log_level) {
        builder.filter_level(parse_level(level));
    } else if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(LevelFilter::Warn);
    }

    builder.init();
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        generate_completion(shell, &mut io::stdout());
        return;
    }

    let config = match Config::load(cli.config.as_ref()).context("Failed to load configuration") {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(1);
        }
    };

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref());

    let ui = Ui::detect(config.color, cli.no_color, config.prompt.as_str());
    colored::control::set_override(ui.color);
    debug!("main: ui={:?}", ui);

    if let Err(err) = run(&cli, &config, &ui) {
        eprintln!("{}", ui.red(&format!("{:#}", err)));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config, ui: &Ui) -> Result<()> {
    let templates_dir = config.resolve_templates_dir(cli.templates.as_deref());
    let catalog = Catalog::open(&templates_dir, VariableRegistry::builtin())?;
    let mut stdout = io::stdout();

    match cli.action() {
        Action::List => {
            debug!("run: matched List");
            cmd_list(&catalog, ui, &mut stdout)?;
        }
        Action::Show { template } => {
            debug!("run: matched Show template={}", template);
            cmd_show(&catalog, ui, &template, &mut stdout)?;
        }
        Action::Generate { template, dir } => {
            debug!("run: matched Generate template={} dir={}", template, dir.display());
            let outcome = if io::stdin().is_terminal() {
                let prompter = ReadlinePrompter::new()?;
                cmd_generate(&catalog, config, ui, &template, &dir, prompter, &mut stdout)?
            } else {
                let prompter = LinePrompter::new(io::stdin().lock(), io::stdout());
                cmd_generate(&catalog, config, ui, &template, &dir, prompter, &mut stdout)?
            };

            if outcome == Outcome::Aborted {
                info!("Nothing generated for template {}", template);
            }
        }
    }

    Ok(())
}
