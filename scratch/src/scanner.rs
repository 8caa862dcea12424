//! Template scanner
//!
//! Walks a template directory, collects the relative paths of its files and
//! every placeholder they reference, then checks those placeholders against
//! the registry.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Result, ScratchError};
use crate::registry::{VAR_SHORT_NAME, VariableKind, VariableRegistry};
use crate::template::{FILENAME_PLACEHOLDER, Template, Variables};

/// Scan the template stored in `dir` under the given name
pub fn scan(name: &str, dir: &Path, registry: &VariableRegistry) -> Result<Template> {
    debug!("scan: template={} dir={}", name, dir.display());

    let files = list_files(dir)?;
    let mut vars = extract_variables(dir, &files)?;
    validate_variables(name, &vars, registry)?;
    add_implied_variables(&mut vars, &files, registry);

    debug!("scan: template={} files={} vars={}", name, files.len(), vars.len());

    Ok(Template {
        name: name.to_string(),
        path: dir.to_path_buf(),
        vars,
        files,
    })
}

/// All files under `dir`, relative to it, sorted by path
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }

        // Entries under dir always carry it as a prefix
        if let Ok(rel) = entry.path().strip_prefix(dir) {
            files.push(rel.to_path_buf());
        }
    }

    Ok(files)
}

/// Collect the distinct set of variables used across all files
fn extract_variables(dir: &Path, files: &[PathBuf]) -> Result<Variables> {
    let mut vars = Variables::new();

    for file in files {
        for name in scan_file(&dir.join(file))? {
            vars.entry(name).or_default();
        }
    }

    Ok(vars)
}

/// Every placeholder name referenced in a single file, in order of appearance
pub fn scan_file(path: &Path) -> Result<Vec<String>> {
    let fd = File::open(path).map_err(|e| ScratchError::io(path, e))?;
    let mut reader = BufReader::new(fd);
    let mut line = Vec::new();
    let mut result = Vec::new();

    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).map_err(|e| ScratchError::io(path, e))?;
        if read == 0 {
            break;
        }
        result.extend(Template::placeholders(&line));
    }

    Ok(result)
}

/// Derived variables need their source, and `_name_` in a file path needs
/// SHORT_NAME, even when no file references them directly
fn add_implied_variables(vars: &mut Variables, files: &[PathBuf], registry: &VariableRegistry) {
    let mut implied: Vec<&str> = vars
        .keys()
        .filter_map(|name| match registry.get(name).map(|v| v.kind) {
            Some(VariableKind::Derived(derivation)) => derivation.source(),
            _ => None,
        })
        .collect();

    let renames = files
        .iter()
        .any(|f| f.to_str().is_some_and(|s| s.contains(FILENAME_PLACEHOLDER)));
    if renames {
        implied.push(VAR_SHORT_NAME);
    }

    for name in implied {
        if !vars.contains_key(name) {
            debug!("add_implied_variables: {}", name);
            vars.insert(name.to_string(), String::new());
        }
    }
}

fn validate_variables(template: &str, vars: &Variables, registry: &VariableRegistry) -> Result<()> {
    match vars.keys().find(|name| !registry.is_known(name)) {
        Some(unknown) => Err(ScratchError::UnknownVariable {
            template: template.to_string(),
            variable: unknown.clone(),
        }),
        None => Ok(()),
    }
}
