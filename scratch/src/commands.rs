//! Command implementations behind the CLI
//!
//! Each command writes its human readable output to `out` so that the binary
//! can hand in stdout and tests a buffer.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Result, ScratchError};
use crate::materializer::{check_target_dir, materialize};
use crate::prompt::Prompter;
use crate::registry::DeriveContext;
use crate::resolver::{Confirmation, Resolver, apply_derived};
use crate::ui::Ui;

/// Result of a generation run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Files were written to the given directory
    Generated(PathBuf),
    /// The user declined at the confirmation step; nothing was written
    Aborted,
}

fn emit(out: &mut impl Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(|e| ScratchError::io("<stdout>", e))
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

/// List every template with its file count
pub fn cmd_list(catalog: &Catalog, ui: &Ui, out: &mut impl Write) -> Result<()> {
    debug!("cmd_list: called");
    let templates = catalog.list()?;

    if templates.is_empty() {
        return emit(out, &ui.yellow("No templates found"));
    }

    emit(out, "")?;
    for template in &templates {
        let detail = if template.is_empty() {
            "(empty)".to_string()
        } else {
            format!("({})", plural(template.files.len(), "file", "files"))
        };
        emit(out, &format!(" {} {} {}", ui.dimmed("•"), template.name, ui.dimmed(&detail)))?;
    }
    emit(out, "")
}

/// Show the files and variables of a single template
pub fn cmd_show(catalog: &Catalog, ui: &Ui, name: &str, out: &mut impl Write) -> Result<()> {
    debug!("cmd_show: name={}", name);
    let registry = catalog.registry();
    let template = catalog.get(name)?;

    emit(out, "")?;
    emit(out, &format!("{} {}", ui.bold(&template.name), ui.dimmed(&template.path.display().to_string())))?;
    emit(out, "")?;

    if template.is_empty() {
        emit(out, &ui.dimmed("  (empty)"))?;
    }
    for file in &template.files {
        emit(out, &format!("  {} {}", ui.dimmed("•"), file.display()))?;
    }

    if !template.vars.is_empty() {
        emit(out, "")?;
        emit(out, &ui.bold("Variables:"))?;
        for var in registry.iter().filter(|v| template.vars.contains_key(v.name)) {
            let marker = if var.is_derived() { ui.dimmed(" (derived)") } else { String::new() };
            emit(out, &format!("  {:<20} {}{}", var.name, var.description, marker))?;
        }
    }

    emit(out, "")
}

/// Generate files from a template into `dir`
///
/// Order of checks: the target directory, then the template's existence, then
/// the template scan. Values are read through `prompter`.
pub fn cmd_generate<P: Prompter, W: Write>(
    catalog: &Catalog,
    config: &Config,
    ui: &Ui,
    name: &str,
    dir: &Path,
    prompter: P,
    out: &mut W,
) -> Result<Outcome> {
    debug!("cmd_generate: name={} dir={}", name, dir.display());
    let registry = catalog.registry();

    check_target_dir(dir, &config.allowed_entries)?;

    if !catalog.exists(name) {
        return Err(ScratchError::TemplateNotFound { name: name.to_string() });
    }

    let dir = std::path::absolute(dir).map_err(|e| ScratchError::io(dir, e))?;
    let mut template = catalog.get(name)?;
    let ctx = DeriveContext::now(config.date_format.as_str());

    let confirmation = {
        let mut resolver = Resolver::new(registry, ui, prompter, &mut *out);
        resolver.read_inputs(&mut template.vars)?;
        apply_derived(registry, &mut template.vars, &ctx)?;
        resolver.confirm(&template.vars)?
    };

    if confirmation == Confirmation::Abort {
        return Ok(Outcome::Aborted);
    }

    emit(out, &ui.bold("Generating files…"))?;
    emit(out, "")?;

    materialize(&template, &dir)?;

    info!("Template {} generated into {}", name, dir.display());
    emit(out, &ui.green("Files successfully generated!"))?;
    Ok(Outcome::Generated(dir))
}
