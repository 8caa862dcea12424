//! Template catalog
//!
//! Every readable directory directly under the templates root is a template.

use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, warn};
use nix::unistd::{AccessFlags, access};

use crate::error::{Result, ScratchError};
use crate::registry::VariableRegistry;
use crate::scanner;
use crate::template::Template;

/// Access to the templates stored under one root directory
pub struct Catalog<'a> {
    root: PathBuf,
    registry: &'a VariableRegistry,
}

impl<'a> Catalog<'a> {
    /// Open the catalog; the root must be an accessible directory
    pub fn open(root: impl AsRef<Path>, registry: &'a VariableRegistry) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            return Err(ScratchError::TemplatesDirNotFound { path: root });
        }
        if !root.is_dir() {
            return Err(ScratchError::TemplatesDirAccess {
                path: root,
                reason: "not a directory".to_string(),
            });
        }
        access(&root, AccessFlags::R_OK | AccessFlags::X_OK).map_err(|errno| ScratchError::TemplatesDirAccess {
            path: root.clone(),
            reason: errno.desc().to_string(),
        })?;

        debug!("Catalog::open: root={}", root.display());
        Ok(Self { root, registry })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn registry(&self) -> &'a VariableRegistry {
        self.registry
    }

    /// Names of all templates in natural order
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root).map_err(|e| ScratchError::io(&self.root, e))? {
            let entry = entry.map_err(|e| ScratchError::io(&self.root, e))?;
            let path = entry.path();

            if !path.is_dir() {
                continue;
            }
            if access(&path, AccessFlags::R_OK | AccessFlags::X_OK).is_err() {
                warn!("Skipping inaccessible template directory {}", path.display());
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort_by(|a, b| natural_cmp(a, b));
        Ok(names)
    }

    /// All templates, each scanned; the first broken template fails the listing
    pub fn list(&self) -> Result<Vec<Template>> {
        self.names()?.iter().map(|name| self.get(name)).collect()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.names().map(|names| names.iter().any(|n| n == name)).unwrap_or(false)
    }

    /// Scan a single template
    pub fn get(&self, name: &str) -> Result<Template> {
        let dir = self.root.join(name);

        if !is_plain_name(name) || !dir.is_dir() {
            return Err(ScratchError::TemplateNotFound { name: name.to_string() });
        }

        scanner::scan(name, &dir, self.registry)
    }
}

/// A single path component naming an entry directly under the root
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None)) && !name.contains('/')
}

/// Compare strings so that embedded numbers sort by value ("app2" < "app10")
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let na = take_number(&mut a);
                let nb = take_number(&mut b);
                let digits_a = na.trim_start_matches('0');
                let digits_b = nb.trim_start_matches('0');

                let ord = digits_a
                    .len()
                    .cmp(&digits_b.len())
                    .then_with(|| digits_a.cmp(digits_b))
                    .then_with(|| na.len().cmp(&nb.len()));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut number = String::new();
    while let Some(c) = chars.peek().copied()
        && c.is_ascii_digit()
    {
        number.push(c);
        chars.next();
    }
    number
}
