//! Template model and placeholder tokens

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::bytes::Regex;

/// Resolved values keyed by variable name
pub type Variables = BTreeMap<String, String>;

/// Matches `{{NAME}}` placeholders; group 1 is the variable name
pub static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z0-9_]+)\}\}").expect("placeholder pattern must compile"));

/// Substring in a template file path replaced with SHORT_NAME
pub const FILENAME_PLACEHOLDER: &str = "_name_";

/// A template discovered on disk
#[derive(Debug, Clone)]
pub struct Template {
    /// Name of the template (its directory name)
    pub name: String,
    /// Path to the directory with template data
    pub path: PathBuf,
    /// Variables used by the template
    pub vars: Variables,
    /// Files of the template, relative to `path`
    pub files: Vec<PathBuf>,
}

impl Template {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Names of every placeholder found in a chunk of bytes
    pub fn placeholders(line: &[u8]) -> impl Iterator<Item = String> + '_ {
        PLACEHOLDER
            .captures_iter(line)
            .filter_map(|caps| caps.get(1))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
    }
}
