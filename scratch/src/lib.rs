//! Scratch - generate blank project files from named templates
//!
//! A template is a directory of files with `{{NAME}}` placeholders. Scratch
//! scans the template for the variables it uses, asks the user for their
//! values, derives the rest and copies the files into a target directory with
//! every placeholder replaced.
//!
//! # Layout
//!
//! ```text
//! ~/.config/scratch/templates/
//! ├── package/
//! │   └── README.md        # "Hello {{NAME}}, version {{VERSION}}."
//! └── simple-utility/
//!     └── _name_.go        # renamed to <SHORT_NAME>.go
//! ```
//!
//! # Example
//!
//! ```ignore
//! use scratch::{Catalog, VariableRegistry, materialize};
//!
//! let catalog = Catalog::open("templates", VariableRegistry::builtin())?;
//! let mut template = catalog.get("package")?;
//! template.vars.insert("NAME".into(), "Widget".into());
//! template.vars.insert("VERSION".into(), "1.0".into());
//! materialize(&template, "out".as_ref())?;
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod materializer;
pub mod prompt;
pub mod registry;
pub mod resolver;
pub mod scanner;
pub mod template;
pub mod ui;

pub use catalog::Catalog;
pub use commands::Outcome;
pub use config::Config;
pub use error::{PromptError, Result, ScratchError};
pub use materializer::{check_target_dir, materialize};
pub use prompt::{LinePrompter, Prompter, ReadlinePrompter};
pub use registry::{DeriveContext, Derivation, Variable, VariableKind, VariableRegistry};
pub use resolver::{Confirmation, Resolver};
pub use scanner::scan;
pub use template::{Template, Variables};
pub use ui::Ui;
