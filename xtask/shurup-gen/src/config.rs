// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Per-directory `.shurup.conf` files.
//!
//! A config file lists the entries of its directory that are visited, one
//! per line, optionally followed by `= <priority>`:
//!
//! ```text
//! # core groups run first
//! core = 10
//! net_test.rs = 5
//! misc
//! ```
//!
//! Lines starting with `#` are comments. A line whose priority is not an
//! integer is ignored.

use std::{fs, io, path::Path};

use crate::error::{GenError, Result};

/// Name of the config file looked up in every visited directory.
pub const CONFIG_FILE_NAME: &str = ".shurup.conf";

/// One entry listed in a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigItem {
    /// Path relative to the directory holding the config file.
    pub path: String,
    pub priority: i64,
}

/// Parsed contents of a `.shurup.conf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirConfig {
    items: Vec<ConfigItem>,
}

impl DirConfig {
    pub fn parse(text: &str) -> Self {
        let items = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (path, priority) = match line.split_once('=') {
                    Some((path, priority)) => (path, priority.trim().parse().ok()?),
                    None => (line, 0),
                };
                Some(ConfigItem {
                    path: path.trim().to_string(),
                    priority,
                })
            })
            .collect();

        Self { items }
    }

    /// Loads the config of `dir`, or `None` if the directory has none.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE_NAME);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(Self::parse(&text))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(GenError::io(path, err)),
        }
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }
}
