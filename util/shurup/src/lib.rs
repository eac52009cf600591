// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! A small unit-test harness for targets where a full test framework is not
//! available.
//!
//! Cases are plain functions returning [`CaseResult`], grouped into named
//! groups in a [`TestRegistry`]. [`TestRunner`] runs them in declaration
//! order, skipping groups named with `-shurup_skip <group>` on the command
//! line. The first failed assertion ends the run.
//!
//! Output goes to any [`core::fmt::Write`]; use [`LineBufferedSink`] to feed
//! a line-oriented system log instead of standard output.

#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate log;
extern crate alloc;

pub mod assert;
pub mod runner;
pub mod settings;
pub mod sink;

pub use assert::{AssertKind, AssertionFailure, CaseResult, Location};
pub use runner::{
    CaseFailure, CaseFn, CaseStatus, FailurePolicy, RunOutcome, TestCase, TestGroup,
    TestRegistry, TestRunner, TestStats,
};
#[cfg(feature = "std")]
pub use runner::run_tests;
#[cfg(any(feature = "std", feature = "platform-console"))]
pub use runner::run_with_args;
pub use settings::{RunnerSettings, SKIP_FLAG};
#[cfg(all(feature = "platform-console", not(feature = "std")))]
pub use sink::ConsoleIf;
#[cfg(any(feature = "std", feature = "platform-console"))]
pub use sink::Console;
#[cfg(feature = "platform-log")]
pub use sink::{PlatformLineLogger, PlatformLog};
pub use sink::{LineBufferedSink, LineLogger, LogLineLogger};
// Case declaration macros.
pub use shurup_macros::{case_fn, declare_case, def_case};

/// Asserts that two values are equal, returning the failure from the
/// enclosing case.
///
/// The message is optional.
///
/// # Example
/// ```rust
/// use shurup::{CaseResult, test_assert_eq};
///
/// fn sum() -> CaseResult {
///     test_assert_eq!(4, 2 + 2, "sum of two and two");
///     test_assert_eq!("ok", String::from("ok"));
///     Ok(())
/// }
/// # assert!(sum().is_ok());
/// ```
#[macro_export]
macro_rules! test_assert_eq {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::test_assert_eq!($expected, $actual, "")
    };
    ($expected:expr, $actual:expr, $message:expr $(,)?) => {
        $crate::assert::assert_eq(
            stringify!($expected),
            &$expected,
            stringify!($actual),
            &$actual,
            $message,
            $crate::Location::new(file!(), line!()),
        )?
    };
}

/// Asserts that two values differ, returning the failure from the enclosing
/// case.
#[macro_export]
macro_rules! test_assert_ne {
    ($expected:expr, $actual:expr $(,)?) => {
        $crate::test_assert_ne!($expected, $actual, "")
    };
    ($expected:expr, $actual:expr, $message:expr $(,)?) => {
        $crate::assert::assert_ne(
            stringify!($expected),
            &$expected,
            stringify!($actual),
            &$actual,
            $message,
            $crate::Location::new(file!(), line!()),
        )?
    };
}
