// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Value-comparison assertions.
//!
//! An assertion compares an expected and an actual value. When the expected
//! relation holds it returns `Ok(())` and has no side effects; otherwise it
//! yields an [`AssertionFailure`] carrying the formatted diagnostic. The
//! failure is terminal for the whole run: the runner writes the diagnostic
//! to the active sink and ends the run (see [`crate::FailurePolicy`]).
//!
//! Both values must implement [`Display`], so a type without a readable text
//! form cannot be asserted on.

use alloc::{format, string::String};
use core::fmt::{self, Display};

/// Result of a single assertion, and of a whole case body.
pub type CaseResult = Result<(), AssertionFailure>;

/// The relation an assertion expects between its two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertKind {
    /// The values must compare equal.
    Eq,
    /// The values must compare not equal.
    Ne,
}

impl AssertKind {
    /// Operator text used in diagnostics.
    pub const fn operator(self) -> &'static str {
        match self {
            AssertKind::Eq => "==",
            AssertKind::Ne => "!=",
        }
    }
}

/// Source position of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

/// A failed assertion.
///
/// This is the only error kind of the harness. Case code never recovers from
/// it; it is propagated up to the runner with `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    kind: AssertKind,
    location: Location,
    message: String,
}

impl AssertionFailure {
    /// The relation that did not hold.
    pub fn kind(&self) -> AssertKind {
        self.kind
    }

    /// Where the failing assertion was written.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The full diagnostic text, without a trailing newline.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Builds the diagnostic for a failed assertion.
pub fn format_assert_message<E, A>(
    kind: AssertKind,
    expected_expression: &str,
    expected_value: &E,
    actual_expression: &str,
    actual_value: &A,
    message: &str,
    location: Location,
) -> String
where
    E: Display + ?Sized,
    A: Display + ?Sized,
{
    format!(
        "Assertion failed: {message}. Expression: {expected_expression} {op} \
         {actual_expression}, expected value: {expected_value}, actual value: {actual_value}. \
         At {file} ({line})",
        op = kind.operator(),
        file = location.file,
        line = location.line,
    )
}

#[allow(clippy::too_many_arguments)]
fn check<E, A>(
    kind: AssertKind,
    holds: bool,
    expected_expression: &str,
    expected_value: &E,
    actual_expression: &str,
    actual_value: &A,
    message: &str,
    location: Location,
) -> CaseResult
where
    E: Display + ?Sized,
    A: Display + ?Sized,
{
    if holds {
        return Ok(());
    }

    let message = format_assert_message(
        kind,
        expected_expression,
        expected_value,
        actual_expression,
        actual_value,
        message,
        location,
    );
    debug!("assertion failed at {}:{}", location.file, location.line);

    Err(AssertionFailure {
        kind,
        location,
        message,
    })
}

/// Asserts that `expected_value == actual_value`.
///
/// Usually reached through [`test_assert_eq!`](crate::test_assert_eq), which
/// fills in the expression texts and the source location.
pub fn assert_eq<E, A>(
    expected_expression: &str,
    expected_value: &E,
    actual_expression: &str,
    actual_value: &A,
    message: &str,
    location: Location,
) -> CaseResult
where
    E: PartialEq<A> + Display + ?Sized,
    A: Display + ?Sized,
{
    check(
        AssertKind::Eq,
        expected_value == actual_value,
        expected_expression,
        expected_value,
        actual_expression,
        actual_value,
        message,
        location,
    )
}

/// Asserts that `expected_value != actual_value`.
pub fn assert_ne<E, A>(
    expected_expression: &str,
    expected_value: &E,
    actual_expression: &str,
    actual_value: &A,
    message: &str,
    location: Location,
) -> CaseResult
where
    E: PartialEq<A> + Display + ?Sized,
    A: Display + ?Sized,
{
    check(
        AssertKind::Ne,
        expected_value != actual_value,
        expected_expression,
        expected_value,
        actual_expression,
        actual_value,
        message,
        location,
    )
}
