// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Generation of the `run_tests.rs` registry file.

use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    cache::{TestCache, modified_time},
    error::{GenError, Result},
    scan::{CaseDecl, scan_file},
    walk::{collect_files, file_pattern},
};

pub const DEFAULT_EXPR: &str = r".+_[Tt]est\.rs";
pub const DEFAULT_CACHE: &str = "tests_processed.cache";
pub const DEFAULT_OUT: &str = "run_tests.rs";

/// Inputs of one preprocessor run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directories scanned for test files.
    pub roots: Vec<PathBuf>,
    /// Pattern for the names of test files.
    pub expr: String,
    pub cache: PathBuf,
    pub out: PathBuf,
}

/// One group of the generated registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    pub name: String,
    pub priority: i64,
    pub cases: Vec<String>,
}

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Test files found under the roots.
    pub files: usize,
    /// Files parsed during this run rather than taken from the cache.
    pub scanned: usize,
    pub groups: usize,
    pub cases: usize,
    /// Whether the output file was (re)written.
    pub written: bool,
}

/// Groups cases by name in first-seen order, then orders groups by
/// descending priority.
///
/// A group's priority is the highest priority of the files declaring its
/// cases. Groups of equal priority keep their first-seen order. A case
/// declared again under the same group is dropped, as both declarations
/// would name the same symbol.
pub fn group_cases<'a, I>(files: I) -> Vec<GroupPlan>
where
    I: IntoIterator<Item = (i64, &'a [CaseDecl])>,
{
    let mut groups: Vec<GroupPlan> = Vec::new();

    for (priority, cases) in files {
        for decl in cases {
            match groups.iter_mut().find(|group| group.name == decl.group) {
                Some(group) => {
                    group.priority = group.priority.max(priority);
                    if group.cases.contains(&decl.case) {
                        warn!("dropping duplicate case {}::{}", decl.group, decl.case);
                    } else {
                        group.cases.push(decl.case.clone());
                    }
                }
                None => groups.push(GroupPlan {
                    name: decl.group.clone(),
                    priority,
                    cases: vec![decl.case.clone()],
                }),
            }
        }
    }

    groups.sort_by(|a, b| b.priority.cmp(&a.priority));
    groups
}

/// Renders the Rust source of the registry file.
pub fn render(groups: &[GroupPlan]) -> String {
    let mut out = String::from("// Generated by shurup-gen. Do not edit.\n\n");

    for group in groups {
        for case in &group.cases {
            out.push_str(&format!("shurup::declare_case!({}, {case});\n", group.name));
        }
    }
    if !groups.is_empty() {
        out.push('\n');
    }

    out.push_str("/// Every registered case, in run order.\n");
    out.push_str("pub fn registry() -> shurup::TestRegistry {\n");
    if groups.is_empty() {
        out.push_str("    shurup::TestRegistry::new()\n");
    } else {
        out.push_str("    let mut registry = shurup::TestRegistry::new();\n");
        for group in groups {
            out.push_str(&format!("    registry\n        .group(\"{}\")", group.name));
            for case in &group.cases {
                out.push_str(&format!(
                    "\n        .case(\"{case}\", shurup::case_fn!({}, {case}))",
                    group.name
                ));
            }
            out.push_str(";\n");
        }
        out.push_str("    registry\n");
    }
    out.push_str("}\n\n");

    out.push_str(
        "/// Parses `args` and runs every case on the console.\n\
         pub fn run_tests<I, S>(args: I) -> shurup::RunOutcome\n\
         where\n    \
             I: IntoIterator<Item = S>,\n    \
             S: AsRef<str>,\n\
         {\n    \
             shurup::run_with_args(args, &registry())\n\
         }\n",
    );
    out
}

/// Scans the roots, refreshes the cache and regenerates the registry file.
pub fn process_tests(options: &Options) -> Result<Summary> {
    let pattern = file_pattern(&options.expr)?;
    let mut cache = TestCache::load(&options.cache)?;
    let files = collect_files(&options.roots, &pattern)?;

    let mut summary = Summary {
        files: files.len(),
        ..Summary::default()
    };
    let mut found = Vec::with_capacity(files.len());
    let mut keys = BTreeSet::new();
    for file in &files {
        let key = file.path.to_string_lossy().into_owned();
        keys.insert(key.clone());
        let mtime = modified_time(&file.path)?;
        if cache.needs_processing(&key, mtime) {
            let cases = scan_file(&file.path)?;
            debug!("scanned {key}: {} case(s)", cases.len());
            cache.insert(key.clone(), mtime, cases);
            summary.scanned += 1;
        }
        found.push((file.priority, cache.get(&key).to_vec()));
    }

    let groups = group_cases(found.iter().map(|(priority, cases)| (*priority, cases.as_slice())));
    summary.groups = groups.len();
    summary.cases = groups.iter().map(|group| group.cases.len()).sum();

    summary.written = write_if_changed(&options.out, &render(&groups))?;
    cache.retain(|path| keys.contains(path));
    cache.save(&options.cache)?;
    Ok(summary)
}

/// Writes `contents` unless `path` already holds exactly that.
fn write_if_changed(path: &Path, contents: &str) -> Result<bool> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => return Ok(false),
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(GenError::io(path, err)),
    }
    fs::write(path, contents).map_err(|err| GenError::io(path, err))?;
    Ok(true)
}
