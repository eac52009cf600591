// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Cache of scanned test files.
//!
//! Scanning parses every test file, so the cases found in each file are
//! remembered together with the file's modification time. The cache is a
//! TOML document:
//!
//! ```toml
//! version = "1"
//!
//! [files."tests/math_test.rs"]
//! mtime = 1718000000000000000
//! cases = [{ group = "Math", case = "addition" }]
//! ```

use std::{
    collections::BTreeMap,
    fs, io,
    path::Path,
    time::UNIX_EPOCH,
};

use toml_edit::{Array, DocumentMut, InlineTable, Item, Table, Value, value};

use crate::{
    error::{GenError, Result},
    scan::CaseDecl,
};

/// Bumped whenever the layout changes; older caches are discarded.
pub const CACHE_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq)]
struct CachedFile {
    mtime: i64,
    cases: Vec<CaseDecl>,
}

/// Cases of recently scanned files, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestCache {
    files: BTreeMap<String, CachedFile>,
}

impl TestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the cache at `path`.
    ///
    /// A missing or outdated cache yields an empty one.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(GenError::io(path, err)),
        };

        match Self::parse(&text) {
            Some(cache) => Ok(cache),
            None => {
                info!("discarding outdated cache {}", path.display());
                Ok(Self::new())
            }
        }
    }

    /// Parses a cache document; `None` if it is malformed or of another
    /// version.
    pub fn parse(text: &str) -> Option<Self> {
        let doc = text.parse::<DocumentMut>().ok()?;
        if doc.get("version").and_then(Item::as_str) != Some(CACHE_VERSION) {
            return None;
        }

        let mut files = BTreeMap::new();
        if let Some(table) = doc.get("files").and_then(Item::as_table) {
            for (path, entry) in table.iter() {
                let entry = entry.as_table()?;
                let mtime = entry.get("mtime").and_then(Item::as_integer)?;
                let cases = entry
                    .get("cases")
                    .and_then(Item::as_array)?
                    .iter()
                    .map(parse_case)
                    .collect::<Option<Vec<_>>>()?;
                files.insert(path.to_string(), CachedFile { mtime, cases });
            }
        }
        Some(Self { files })
    }

    pub fn to_document(&self) -> DocumentMut {
        let mut doc = DocumentMut::new();
        doc["version"] = value(CACHE_VERSION);

        let mut files = Table::new();
        for (path, file) in &self.files {
            let mut cases = Array::new();
            for case in &file.cases {
                let mut entry = InlineTable::new();
                entry.insert("group", Value::from(case.group.as_str()));
                entry.insert("case", Value::from(case.case.as_str()));
                cases.push(entry);
            }

            let mut table = Table::new();
            table["mtime"] = value(file.mtime);
            table["cases"] = value(cases);
            files.insert(path, Item::Table(table));
        }
        doc["files"] = Item::Table(files);
        doc
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_document().to_string()).map_err(|err| GenError::io(path, err))
    }

    /// Returns `true` if `path` was never scanned or changed since.
    pub fn needs_processing(&self, path: &str, mtime: i64) -> bool {
        self.files
            .get(path)
            .is_none_or(|cached| cached.mtime < mtime)
    }

    pub fn insert(&mut self, path: impl Into<String>, mtime: i64, cases: Vec<CaseDecl>) {
        self.files.insert(path.into(), CachedFile { mtime, cases });
    }

    /// Keeps only the entries whose path satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let before = self.files.len();
        self.files.retain(|path, _| keep(path));
        if self.files.len() < before {
            debug!("dropped {} stale cache entries", before - self.files.len());
        }
    }

    /// Cached cases of `path`; empty if it is not cached.
    pub fn get(&self, path: &str) -> &[CaseDecl] {
        self.files
            .get(path)
            .map(|cached| cached.cases.as_slice())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn parse_case(value: &Value) -> Option<CaseDecl> {
    let table = value.as_inline_table()?;
    let group = table.get("group").and_then(Value::as_str)?;
    let case = table.get("case").and_then(Value::as_str)?;
    Some(CaseDecl::new(group, case))
}

/// Modification time of `path` in nanoseconds since the epoch.
pub fn modified_time(path: &Path) -> Result<i64> {
    let modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|err| GenError::io(path, err))?;
    let since_epoch = modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    Ok(i64::try_from(since_epoch).unwrap_or(i64::MAX))
}
