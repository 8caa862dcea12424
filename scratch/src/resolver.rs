//! Variable resolver
//!
//! Resolution happens in two passes over the template's variables:
//!
//! 1. Every variable the user has to enter is prompted for in registry order
//!    and re-prompted until the value passes validation.
//! 2. Derived variables are computed from the values entered in pass 1.
//!
//! Afterwards the full set can be shown to the user for confirmation.

use std::io::Write;

use log::{debug, info};

use crate::error::{Result, ScratchError};
use crate::prompt::Prompter;
use crate::registry::{DeriveContext, VariableKind, VariableRegistry};
use crate::template::Variables;
use crate::ui::Ui;

/// Outcome of the confirmation checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Proceed,
    Abort,
}

/// Reads and validates variable values
pub struct Resolver<'a, P, W> {
    registry: &'a VariableRegistry,
    ui: &'a Ui,
    prompter: P,
    out: W,
}

impl<'a, P: Prompter, W: Write> Resolver<'a, P, W> {
    pub fn new(registry: &'a VariableRegistry, ui: &'a Ui, prompter: P, out: W) -> Self {
        Self {
            registry,
            ui,
            prompter,
            out,
        }
    }

    /// Run both passes, filling every variable in `vars`
    pub fn resolve(&mut self, vars: &mut Variables, ctx: &DeriveContext) -> Result<()> {
        self.read_inputs(vars)?;
        apply_derived(self.registry, vars, ctx)
    }

    /// Pass 1: prompt for every user supplied variable the template uses
    pub fn read_inputs(&mut self, vars: &mut Variables) -> Result<()> {
        let registry = self.registry;
        let total = registry.input_count(vars);
        let mut current = 0;

        self.emit("")?;

        for var in registry.iter() {
            if var.is_derived() || !vars.contains_key(var.name) {
                continue;
            }

            current += 1;

            loop {
                let header = format!(
                    "{} {}",
                    self.ui.dimmed(&format!("[{}/{}]", current, total)),
                    self.ui.cyan(&format!("{}:", var.description))
                );
                self.emit(&header)?;

                let value = self.prompter.read_line(&self.ui.prompt)?;
                self.emit("")?;

                if !var.is_valid(&value) {
                    info!("Rejected value {:?} for {}", value, var.name);
                    let msg = format!("\"{}\" is not a valid value for this variable", value);
                    self.emit(&self.ui.yellow(&msg))?;
                    self.emit("")?;
                    continue;
                }

                debug!("read_inputs: {}={:?}", var.name, value);
                vars.insert(var.name.to_string(), value);
                break;
            }
        }

        Ok(())
    }

    /// Show the resolved values and ask whether to go on
    pub fn confirm(&mut self, vars: &Variables) -> Result<Confirmation> {
        let registry = self.registry;
        self.emit(&self.ui.separator())?;

        for var in registry.iter() {
            if let Some(value) = vars.get(var.name) {
                let line = format!("  {} {}", self.ui.bold(&format!("{:<16}", format!("{}:", var.name))), value);
                self.emit(&line)?;
            }
        }

        self.emit(&self.ui.separator())?;
        self.emit("")?;

        loop {
            let question = format!("{} {} {}", "Everything is ok?", self.ui.dimmed("(Y/n)"), self.ui.prompt);
            let answer = self.prompter.read_line(&question)?;
            self.emit("")?;

            match answer.trim().to_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(Confirmation::Proceed),
                "n" | "no" => {
                    info!("Generation aborted by user");
                    return Ok(Confirmation::Abort);
                }
                other => {
                    let msg = format!("Please answer yes or no (got \"{}\")", other);
                    self.emit(&self.ui.yellow(&msg))?;
                }
            }
        }
    }

    fn emit(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line).map_err(|e| ScratchError::io("<stdout>", e))
    }
}

/// Pass 2: compute every derived variable the template uses
pub fn apply_derived(registry: &VariableRegistry, vars: &mut Variables, ctx: &DeriveContext) -> Result<()> {
    let derived: Vec<_> = registry
        .iter()
        .filter(|v| vars.contains_key(v.name))
        .filter_map(|v| match v.kind {
            VariableKind::Derived(derivation) => Some((v.name, derivation)),
            VariableKind::Input => None,
        })
        .collect();

    for (name, derivation) in derived {
        let value = derivation.compute(vars, ctx)?;
        debug!("apply_derived: {}={:?}", name, value);
        vars.insert(name.to_string(), value);
    }

    Ok(())
}
