// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test preprocessor for the shurup harness.
//!
//! Walks source trees for test files, collects the cases declared with
//! `#[def_case(Group)]` and writes a Rust file holding the case registry and
//! a `run_tests` entry point. Results are cached per file so unchanged files
//! are not parsed again.

#[macro_use]
extern crate log;

pub mod cache;
pub mod config;
pub mod error;
pub mod generate;
pub mod scan;
pub mod walk;

pub use error::{GenError, Result};
pub use generate::{
    DEFAULT_CACHE, DEFAULT_EXPR, DEFAULT_OUT, GroupPlan, Options, Summary, group_cases,
    process_tests, render,
};
