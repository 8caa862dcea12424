//! Variable registry
//!
//! Static catalog of every placeholder a template may reference. Each variable
//! carries a human description used as the prompt, an optional validation
//! pattern, and its kind: entered by the user or derived from other values.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::LazyLock;

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use log::debug;
use regex::Regex;

use crate::error::{Result, ScratchError};
use crate::template::Variables;

pub const VAR_NAME: &str = "NAME";
pub const VAR_SHORT_NAME: &str = "SHORT_NAME";
pub const VAR_VERSION: &str = "VERSION";
pub const VAR_DESC: &str = "DESC";
pub const VAR_DESC_README: &str = "DESC_README";
pub const VAR_CODEBEAT_UUID: &str = "CODEBEAT_UUID";

pub const VAR_SHORT_NAME_TITLE: &str = "SHORT_NAME_TITLE";
pub const VAR_SHORT_NAME_LOWER: &str = "SHORT_NAME_LOWER";
pub const VAR_SHORT_NAME_UPPER: &str = "SHORT_NAME_UPPER";
pub const VAR_SPEC_CHANGELOG_DATE: &str = "SPEC_CHANGELOG_DATE";

/// Default format for SPEC_CHANGELOG_DATE (e.g. "Fri Oct 16 2026")
pub const DEFAULT_DATE_FORMAT: &str = "%a %b %d %Y";

static BUILTIN: LazyLock<VariableRegistry> = LazyLock::new(|| {
    VariableRegistry::new(vec![
        Variable::input(VAR_NAME, "Name", Some(r"^[a-zA-Z0-9_\-]{2,32}$")),
        Variable::input(
            VAR_SHORT_NAME,
            "Short name (binary name or repository name)",
            Some(r"^[a-z0-9_\-]{2,32}$"),
        ),
        Variable::input(VAR_VERSION, "Version (in semver notation)", Some(r"^[0-9]+\.[0-9]*\.?[0-9]*$")),
        Variable::input(VAR_DESC, "Description", Some(r"^.{16,128}$")),
        Variable::input(
            VAR_DESC_README,
            "Description for README file (part after 'app is… ')",
            Some(r"^.{16,128}$"),
        ),
        Variable::input(VAR_CODEBEAT_UUID, "Codebeat project UUID", None),
        Variable::derived(VAR_SHORT_NAME_TITLE, "Short name in title case", Derivation::TitleCase),
        Variable::derived(VAR_SHORT_NAME_LOWER, "Short name in lower case", Derivation::LowerCase),
        Variable::derived(VAR_SHORT_NAME_UPPER, "Short name in upper case", Derivation::UpperCase),
        Variable::derived(VAR_SPEC_CHANGELOG_DATE, "Date in spec changelog", Derivation::ChangelogDate),
    ])
});

/// How a derived variable gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// SHORT_NAME with the first letter of every word upper-cased
    TitleCase,
    /// SHORT_NAME in lower case
    LowerCase,
    /// SHORT_NAME in upper case
    UpperCase,
    /// Current date rendered with the configured date format
    ChangelogDate,
}

/// Inputs a derivation may need beyond the resolved user values
#[derive(Debug, Clone)]
pub struct DeriveContext {
    pub today: NaiveDate,
    pub date_format: String,
}

impl DeriveContext {
    /// Context for the current local date
    pub fn now(date_format: impl Into<String>) -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
            date_format: date_format.into(),
        }
    }
}

impl Derivation {
    /// The user supplied variable this derivation reads, if any
    pub fn source(&self) -> Option<&'static str> {
        match self {
            Self::TitleCase | Self::LowerCase | Self::UpperCase => Some(VAR_SHORT_NAME),
            Self::ChangelogDate => None,
        }
    }

    /// Compute the value from already resolved user input
    pub fn compute(&self, vars: &Variables, ctx: &DeriveContext) -> Result<String> {
        let short_name = vars.get(VAR_SHORT_NAME).map(String::as_str).unwrap_or_default();
        match self {
            Self::TitleCase => Ok(title_case(short_name)),
            Self::LowerCase => Ok(short_name.to_lowercase()),
            Self::UpperCase => Ok(short_name.to_uppercase()),
            Self::ChangelogDate => format_date(ctx.today, &ctx.date_format),
        }
    }
}

/// Render `date` with a strftime format; time and zone specifiers fail
pub fn format_date(date: NaiveDate, format: &str) -> Result<String> {
    let invalid = || ScratchError::InvalidDateFormat {
        format: format.to_string(),
    };

    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut rendered = String::new();
    write!(rendered, "{}", date.format(format)).map_err(|_| invalid())?;
    Ok(rendered)
}

/// Check that a date format can render a plain date
pub fn check_date_format(format: &str) -> Result<()> {
    format_date(NaiveDate::default(), format).map(|_| ())
}

/// Whether the user supplies the value or it is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Input,
    Derived(Derivation),
}

/// A known placeholder variable
#[derive(Debug, Clone)]
pub struct Variable {
    pub name: &'static str,
    pub description: &'static str,
    pub validator: Option<Regex>,
    pub kind: VariableKind,
}

impl Variable {
    fn input(name: &'static str, description: &'static str, pattern: Option<&str>) -> Self {
        Self {
            name,
            description,
            validator: pattern.map(|p| Regex::new(p).expect("builtin validator must compile")),
            kind: VariableKind::Input,
        }
    }

    fn derived(name: &'static str, description: &'static str, derivation: Derivation) -> Self {
        Self {
            name,
            description,
            validator: None,
            kind: VariableKind::Derived(derivation),
        }
    }

    /// True if the value passes this variable's validator (or there is none)
    pub fn is_valid(&self, value: &str) -> bool {
        self.validator.as_ref().map(|re| re.is_match(value)).unwrap_or(true)
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.kind, VariableKind::Derived(_))
    }
}

/// Ordered catalog of known variables
#[derive(Debug, Clone)]
pub struct VariableRegistry {
    /// Names in prompt order
    order: Vec<&'static str>,
    info: HashMap<&'static str, Variable>,
}

impl VariableRegistry {
    /// Build a registry; prompt order follows the order of `vars`
    pub fn new(vars: Vec<Variable>) -> Self {
        let order = vars.iter().map(|v| v.name).collect();
        let info = vars.into_iter().map(|v| (v.name, v)).collect();
        Self { order, info }
    }

    /// The process-wide registry of supported variables
    pub fn builtin() -> &'static VariableRegistry {
        &BUILTIN
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.info.get(name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.info.contains_key(name)
    }

    /// True if the variable is known and must be entered by the user
    pub fn requires_input(&self, name: &str) -> bool {
        self.get(name).map(|v| !v.is_derived()).unwrap_or(false)
    }

    /// Validate a value; unknown variables never validate
    pub fn is_valid(&self, name: &str, value: &str) -> bool {
        let valid = self.get(name).map(|v| v.is_valid(value)).unwrap_or(false);
        debug!("is_valid: {}={:?} -> {}", name, value, valid);
        valid
    }

    /// Variables in registry order
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.order.iter().filter_map(|name| self.info.get(name))
    }

    /// Number of variables from `vars` the user has to enter
    pub fn input_count(&self, vars: &Variables) -> usize {
        vars.keys().filter(|name| self.requires_input(name)).count()
    }
}

/// Upper-case the first letter of every word; any character that is not a
/// letter, digit or underscore starts a new word.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;

    for c in value.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_builtin_known_and_input() {
        let registry = VariableRegistry::builtin();

        assert!(registry.is_known(VAR_NAME));
        assert!(registry.is_known(VAR_SPEC_CHANGELOG_DATE));
        assert!(!registry.is_known("FOO"));

        assert!(registry.requires_input(VAR_SHORT_NAME));
        assert!(!registry.requires_input(VAR_SHORT_NAME_UPPER));
        assert!(!registry.requires_input("FOO"));
    }

    #[test]
    fn test_validators() {
        let registry = VariableRegistry::builtin();

        assert!(registry.is_valid(VAR_NAME, "Widget"));
        assert!(!registry.is_valid(VAR_NAME, "W"));
        assert!(!registry.is_valid(VAR_NAME, "has space"));

        assert!(registry.is_valid(VAR_SHORT_NAME, "frobnicator"));
        assert!(!registry.is_valid(VAR_SHORT_NAME, "Frobnicator"));

        assert!(registry.is_valid(VAR_VERSION, "1.0"));
        assert!(registry.is_valid(VAR_VERSION, "1.2.3"));
        assert!(!registry.is_valid(VAR_VERSION, "v1.0"));

        assert!(!registry.is_valid(VAR_DESC, "too short"));
        assert!(registry.is_valid(VAR_DESC, "Utility for generating blank files"));

        // No validator means anything goes
        assert!(registry.is_valid(VAR_CODEBEAT_UUID, ""));
        assert!(!registry.is_valid("FOO", "anything"));
    }

    #[test]
    fn test_order_puts_inputs_first() {
        let registry = VariableRegistry::builtin();
        let names: Vec<_> = registry.iter().map(|v| v.name).collect();

        assert_eq!(&names[..3], &[VAR_NAME, VAR_SHORT_NAME, VAR_VERSION]);
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_input_count_skips_derived() {
        let registry = VariableRegistry::builtin();
        let v = vars(&[(VAR_NAME, ""), (VAR_SHORT_NAME, ""), (VAR_SHORT_NAME_UPPER, "")]);

        assert_eq!(registry.input_count(&v), 2);
    }

    #[test]
    fn test_derivations() {
        let v = vars(&[(VAR_SHORT_NAME, "my-app")]);
        let ctx = DeriveContext {
            today: NaiveDate::from_ymd_opt(2022, 3, 4).unwrap(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        };

        assert_eq!(Derivation::TitleCase.compute(&v, &ctx).unwrap(), "My-App");
        assert_eq!(Derivation::LowerCase.compute(&v, &ctx).unwrap(), "my-app");
        assert_eq!(Derivation::UpperCase.compute(&v, &ctx).unwrap(), "MY-APP");
        assert_eq!(Derivation::ChangelogDate.compute(&v, &ctx).unwrap(), "Fri Mar 04 2022");
    }

    #[test]
    fn test_changelog_date_rejects_time_specifiers() {
        let ctx = DeriveContext {
            today: NaiveDate::from_ymd_opt(2022, 3, 4).unwrap(),
            date_format: "%a %H:%M".to_string(),
        };

        let err = Derivation::ChangelogDate.compute(&Variables::new(), &ctx).unwrap_err();
        assert!(matches!(err, ScratchError::InvalidDateFormat { format } if format == "%a %H:%M"));
    }

    #[test]
    fn test_check_date_format() {
        assert!(check_date_format(DEFAULT_DATE_FORMAT).is_ok());
        assert!(check_date_format("%Y-%m-%d").is_ok());
        assert!(check_date_format("%Y-%m-%d %H:%M").is_err());
        assert!(check_date_format("%Q").is_err());
    }

    #[test]
    fn test_derivation_sources() {
        assert_eq!(Derivation::UpperCase.source(), Some(VAR_SHORT_NAME));
        assert_eq!(Derivation::ChangelogDate.source(), None);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("scratch"), "Scratch");
        assert_eq!(title_case("my_app"), "My_app");
        assert_eq!(title_case("two words"), "Two Words");
        assert_eq!(title_case(""), "");
    }
}
