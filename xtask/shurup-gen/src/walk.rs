// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Discovery of test source files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use regex::Regex;

use crate::{
    config::DirConfig,
    error::{GenError, Result},
};

/// A test source file and the priority of the directory entry that led to
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub priority: i64,
}

/// Builds the file name pattern. The match is anchored at the start of the
/// entry name only, so `.+_test\.rs` also accepts `net_test.rs.in`.
pub fn file_pattern(expr: &str) -> Result<Regex> {
    Ok(Regex::new(&format!("^(?:{expr})"))?)
}

/// Collects the test files under every root, in root order.
pub fn collect_files(roots: &[PathBuf], pattern: &Regex) -> Result<Vec<SourceFile>> {
    let mut files = Vec::new();
    for root in roots {
        visit_dir(root, 0, pattern, &mut files)?;
    }
    Ok(files)
}

fn visit_dir(
    dir: &Path,
    priority: i64,
    pattern: &Regex,
    files: &mut Vec<SourceFile>,
) -> Result<()> {
    let items: Vec<(String, i64)> = match DirConfig::load(dir)? {
        Some(config) => config
            .items()
            .iter()
            .map(|item| (item.path.clone(), item.priority))
            .collect(),
        None => list_dir(dir)?
            .into_iter()
            .map(|name| (name, priority))
            .collect(),
    };

    for (name, priority) in items {
        let path = dir.join(&name);
        if path.is_dir() {
            visit_dir(&path, priority, pattern, files)?;
        } else if path.is_file() {
            if pattern.is_match(&name) {
                debug!("found {} (priority {priority})", path.display());
                files.push(SourceFile { path, priority });
            }
        } else {
            warn!("skipping {}: no such file or directory", path.display());
        }
    }
    Ok(())
}

/// Entry names of `dir`, sorted so the output does not depend on the
/// platform's directory order.
fn list_dir(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| GenError::io(dir, err))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| GenError::io(dir, err))?;
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => warn!("skipping non UTF-8 entry {name:?} in {}", dir.display()),
        }
    }
    names.sort();
    Ok(names)
}
