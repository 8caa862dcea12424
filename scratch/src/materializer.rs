//! Template materializer
//!
//! Copies template files into the target directory, substituting placeholder
//! tokens line by line. Every written line ends with `\n` whatever the source
//! used. There is no rollback: a failure leaves whatever was already written.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use nix::unistd::{AccessFlags, access};
use regex::bytes::Captures;

use crate::error::{Result, ScratchError};
use crate::registry::VAR_SHORT_NAME;
use crate::template::{FILENAME_PLACEHOLDER, PLACEHOLDER, Template, Variables};

/// Entries a target directory may already contain
pub const DEFAULT_ALLOWED_ENTRIES: &[&str] = &[".git", ".github", "README.md", "LICENSE"];

/// Check that `dir` can receive generated files
///
/// A missing directory is fine, it is created on generation. An existing one
/// must be an accessible directory holding nothing but `allowed` entries.
pub fn check_target_dir(dir: &Path, allowed: &[String]) -> Result<()> {
    debug!("check_target_dir: {}", dir.display());

    let meta = match fs::metadata(dir) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(ScratchError::io(dir, e)),
    };

    if !meta.is_dir() {
        return Err(ScratchError::TargetNotDirectory { path: dir.to_path_buf() });
    }

    access(dir, AccessFlags::R_OK | AccessFlags::W_OK | AccessFlags::X_OK).map_err(|errno| {
        ScratchError::TargetAccess {
            path: dir.to_path_buf(),
            reason: errno.desc().to_string(),
        }
    })?;

    let mut unexpected = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| ScratchError::io(dir, e))? {
        let entry = entry.map_err(|e| ScratchError::io(dir, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !allowed.iter().any(|a| *a == name) {
            unexpected.push(name);
        }
    }

    unexpected.sort();
    match unexpected.into_iter().next() {
        Some(entry) => Err(ScratchError::TargetNotEmpty {
            path: dir.to_path_buf(),
            entry,
        }),
        None => Ok(()),
    }
}

/// Copy every template file into `target_dir` with the template's resolved
/// variables applied
pub fn materialize(template: &Template, target_dir: &Path) -> Result<()> {
    let vars = &template.vars;
    fs::create_dir_all(target_dir).map_err(|e| ScratchError::io(target_dir, e))?;

    for file in &template.files {
        let source = template.path.join(file);
        let target = target_dir.join(target_path(file, vars));

        if let Some(parent) = target.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| ScratchError::io(parent, e))?;
        }

        copy_file(&source, &target, vars)?;
        debug!("materialize: {} -> {}", source.display(), target.display());
    }

    info!(
        "Generated {} files from template {} in {}",
        template.files.len(),
        template.name,
        target_dir.display()
    );
    Ok(())
}

/// Relative target path for a template file, with the filename placeholder
/// replaced by SHORT_NAME
pub fn target_path(file: &Path, vars: &Variables) -> PathBuf {
    match file.to_str() {
        Some(name) if name.contains(FILENAME_PLACEHOLDER) => {
            let short_name = vars.get(VAR_SHORT_NAME).map(String::as_str).unwrap_or_default();
            PathBuf::from(name.replace(FILENAME_PLACEHOLDER, short_name))
        }
        _ => file.to_path_buf(),
    }
}

fn copy_file(source: &Path, target: &Path, vars: &Variables) -> Result<()> {
    let reader = BufReader::new(File::open(source).map_err(|e| ScratchError::io(source, e))?);
    let writer = BufWriter::new(File::create(target).map_err(|e| ScratchError::io(target, e))?);

    render(reader, writer, vars).map_err(|e| ScratchError::io(target, e))
}

/// Stream `reader` into `writer` line by line with variables applied
pub fn render<R: BufRead, W: Write>(mut reader: R, mut writer: W, vars: &Variables) -> std::io::Result<()> {
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        writer.write_all(&render_line(strip_line_ending(&line), vars))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Replace every `{{NAME}}` with its value; tokens without a value stay as is
pub fn render_line<'l>(line: &'l [u8], vars: &Variables) -> Cow<'l, [u8]> {
    PLACEHOLDER.replace_all(line, |caps: &Captures| {
        let name = String::from_utf8_lossy(&caps[1]);
        match vars.get(&*name) {
            Some(value) => value.as_bytes().to_vec(),
            None => caps[0].to_vec(),
        }
    })
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VAR_NAME;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn allowed() -> Vec<String> {
        DEFAULT_ALLOWED_ENTRIES.iter().map(|s| s.to_string()).collect()
    }

    fn render_str(input: &str, vars: &Variables) -> String {
        let mut out = Vec::new();
        render(input.as_bytes(), &mut out, vars).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_substitutes_tokens() {
        let v = vars(&[("NAME", "Widget"), ("VERSION", "1.0")]);
        assert_eq!(
            render_str("Hello {{NAME}}, version {{VERSION}}.", &v),
            "Hello Widget, version 1.0.\n"
        );
    }

    #[test]
    fn test_render_normalizes_line_endings() {
        let v = Variables::new();
        assert_eq!(render_str("a\r\nb\nc", &v), "a\nb\nc\n");
        assert_eq!(render_str("", &v), "");
        assert_eq!(render_str("\n\n", &v), "\n\n");
    }

    #[test]
    fn test_render_leaves_unknown_tokens() {
        let v = vars(&[("NAME", "Widget")]);
        assert_eq!(render_str("{{NAME}} {{OTHER}} {{lower}}", &v), "Widget {{OTHER}} {{lower}}\n");
    }

    #[test]
    fn test_render_line_borrows_without_tokens() {
        let v = vars(&[("NAME", "Widget")]);
        assert!(matches!(render_line(b"plain text", &v), Cow::Borrowed(_)));
    }

    #[test]
    fn test_target_path_replaces_name() {
        let v = vars(&[(VAR_SHORT_NAME, "frobnicator")]);

        assert_eq!(target_path(Path::new("_name_.go"), &v), PathBuf::from("frobnicator.go"));
        assert_eq!(
            target_path(Path::new("cmd/_name_/main.go"), &v),
            PathBuf::from("cmd/frobnicator/main.go")
        );
        assert_eq!(target_path(Path::new("README.md"), &v), PathBuf::from("README.md"));
    }

    #[test]
    fn test_check_target_dir_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(check_target_dir(&temp.path().join("new"), &allowed()).is_ok());
    }

    #[test]
    fn test_check_target_dir_allow_list() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("README.md"), "readme").unwrap();
        fs::write(temp.path().join("LICENSE"), "license").unwrap();

        assert!(check_target_dir(temp.path(), &allowed()).is_ok());
    }

    #[test]
    fn test_check_target_dir_not_empty() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "notes").unwrap();

        let err = check_target_dir(temp.path(), &allowed()).unwrap_err();
        match err {
            ScratchError::TargetNotEmpty { entry, .. } => assert_eq!(entry, "notes.txt"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_check_target_dir_requires_write_access() {
        if nix::unistd::geteuid().is_root() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("readonly");
        fs::create_dir(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o500)).unwrap();

        let result = check_target_dir(&target, &allowed());
        fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result.unwrap_err(), ScratchError::TargetAccess { .. }));
    }

    #[test]
    fn test_check_target_dir_not_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, "").unwrap();

        let err = check_target_dir(&file, &allowed()).unwrap_err();
        assert!(matches!(err, ScratchError::TargetNotDirectory { .. }));
    }

    #[test]
    fn test_materialize_writes_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("template");
        fs::create_dir_all(src.join("cmd")).unwrap();
        fs::write(src.join("README.md"), "# {{NAME}}\r\n").unwrap();
        fs::write(src.join("cmd/_name_.go"), "package main // {{SHORT_NAME}}").unwrap();

        let template = Template {
            name: "app".to_string(),
            path: src,
            vars: vars(&[(VAR_NAME, "Frob"), (VAR_SHORT_NAME, "frob")]),
            files: vec![PathBuf::from("README.md"), PathBuf::from("cmd/_name_.go")],
        };
        let target = temp.path().join("out/nested");

        materialize(&template, &target).unwrap();

        assert_eq!(fs::read_to_string(target.join("README.md")).unwrap(), "# Frob\n");
        assert_eq!(
            fs::read_to_string(target.join("cmd/frob.go")).unwrap(),
            "package main // frob\n"
        );
    }

    #[test]
    fn test_materialize_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let template = Template {
            name: "broken".to_string(),
            path: temp.path().join("template"),
            vars: Variables::new(),
            files: vec![PathBuf::from("gone.txt")],
        };

        let err = materialize(&template, &temp.path().join("out")).unwrap_err();
        assert!(matches!(err, ScratchError::Io { .. }));
    }
}
