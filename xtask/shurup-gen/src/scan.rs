// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Extraction of `#[def_case(Group)]` declarations from Rust sources.

use std::{fs, path::Path};

use syn::{Attribute, Ident, Item};

use crate::error::{GenError, Result};

/// Attribute marking a case body.
const CASE_ATTRIBUTE: &str = "def_case";

/// A (group, case) pair found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CaseDecl {
    pub group: String,
    pub case: String,
}

impl CaseDecl {
    pub fn new(group: impl Into<String>, case: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            case: case.into(),
        }
    }
}

/// Returns the cases declared in `source`, in source order, including those
/// in inline modules.
pub fn scan_source(source: &str) -> syn::Result<Vec<CaseDecl>> {
    let file = syn::parse_file(source)?;
    let mut cases = Vec::new();
    scan_items(&file.items, &mut cases)?;
    Ok(cases)
}

pub fn scan_file(path: &Path) -> Result<Vec<CaseDecl>> {
    let source = fs::read_to_string(path).map_err(|err| GenError::io(path, err))?;
    scan_source(&source).map_err(|source| GenError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn scan_items(items: &[Item], cases: &mut Vec<CaseDecl>) -> syn::Result<()> {
    for item in items {
        match item {
            Item::Fn(function) => {
                if let Some(group) = case_group(&function.attrs)? {
                    cases.push(CaseDecl::new(
                        group.to_string(),
                        function.sig.ident.to_string(),
                    ));
                }
            }
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    scan_items(items, cases)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Group named by a `def_case` attribute, whatever path it is imported
/// under (`def_case`, `shurup::def_case`, ...).
fn case_group(attrs: &[Attribute]) -> syn::Result<Option<Ident>> {
    for attr in attrs {
        let is_case = attr
            .path()
            .segments
            .last()
            .is_some_and(|segment| segment.ident == CASE_ATTRIBUTE);
        if is_case {
            return attr.parse_args::<Ident>().map(Some);
        }
    }
    Ok(None)
}
