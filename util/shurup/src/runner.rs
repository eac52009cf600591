// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Case registry and runner.
//!
//! Cases are collected into a [`TestRegistry`] of named groups, in the order
//! they are added. [`TestRunner`] walks the registry group by group, printing
//! a header for each group, and for each case either a skip notice or the
//! case header, the case body's outcome, and `Ok`.
//!
//! A failed assertion ends the whole run: no footer is printed for the
//! failing case, and no later case or group runs. With the default
//! [`FailurePolicy::Abort`] the process is terminated as well.
//!
//! # Example
//! ```rust
//! use shurup::{CaseResult, RunnerSettings, TestRegistry, TestRunner, test_assert_eq};
//!
//! fn addition() -> CaseResult {
//!     test_assert_eq!(4, 2 + 2, "addition");
//!     Ok(())
//! }
//!
//! let mut registry = TestRegistry::new();
//! registry.group("Math").case("addition", addition);
//!
//! let settings = RunnerSettings::new();
//! let outcome = TestRunner::new(&settings, String::new()).run(&registry);
//! assert!(outcome.is_success());
//! ```

use alloc::vec::Vec;
use core::fmt::Write;

#[cfg(any(feature = "std", feature = "platform-console"))]
use crate::sink::Console;
use crate::{
    assert::{AssertionFailure, CaseResult},
    settings::RunnerSettings,
};

/// Body of a test case.
pub type CaseFn = fn() -> CaseResult;

/// A named case body.
#[derive(Debug, Clone, Copy)]
pub struct TestCase {
    name: &'static str,
    body: CaseFn,
}

impl TestCase {
    pub const fn new(name: &'static str, body: CaseFn) -> Self {
        Self { name, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the body directly, bypassing the runner.
    pub fn call(&self) -> CaseResult {
        (self.body)()
    }
}

/// Cases sharing one skip decision, kept in declaration order.
#[derive(Debug, Clone)]
pub struct TestGroup {
    name: &'static str,
    cases: Vec<TestCase>,
}

impl TestGroup {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cases: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Appends a case to the group.
    pub fn case(&mut self, name: &'static str, body: CaseFn) -> &mut Self {
        self.cases.push(TestCase::new(name, body));
        self
    }
}

/// Ordered list of test groups.
#[derive(Debug, Clone, Default)]
pub struct TestRegistry {
    groups: Vec<TestGroup>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the group called `name`, appending an empty one if it is not
    /// registered yet.
    ///
    /// A group keeps the position of its first registration; later cases
    /// are appended to it.
    pub fn group(&mut self, name: &'static str) -> &mut TestGroup {
        let index = match self.groups.iter().position(|group| group.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(TestGroup::new(name));
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn groups(&self) -> &[TestGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of cases over all groups.
    pub fn case_count(&self) -> usize {
        self.groups.iter().map(|group| group.cases.len()).sum()
    }
}

/// What the runner does once an assertion has failed.
///
/// Under both policies nothing else runs after the failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Terminate the process after writing the diagnostic.
    #[default]
    Abort,
    /// Stop the run and report the failure through [`RunOutcome::Failed`].
    Stop,
}

/// Outcome of a case that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    Passed,
    Skipped,
}

/// Case counters of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestStats {
    pub passed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl TestStats {
    pub const fn new() -> Self {
        Self {
            passed: 0,
            skipped: 0,
            failed: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.skipped + self.failed
    }
}

/// The case that ended a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    pub group: &'static str,
    pub case: &'static str,
    pub failure: AssertionFailure,
}

/// Result of [`TestRunner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every group was visited and no assertion failed.
    Completed(TestStats),
    /// The run stopped at the first failed assertion.
    Failed(CaseFailure, TestStats),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn stats(&self) -> TestStats {
        match self {
            RunOutcome::Completed(stats) | RunOutcome::Failed(_, stats) => *stats,
        }
    }

    pub fn failure(&self) -> Option<&CaseFailure> {
        match self {
            RunOutcome::Completed(_) => None,
            RunOutcome::Failed(failure, _) => Some(failure),
        }
    }
}

/// Drives groups and cases, writing progress to `W`.
///
/// Writes to the output are not checked: sinks are expected to accept
/// everything they are given.
pub struct TestRunner<'a, W: Write> {
    settings: &'a RunnerSettings,
    out: W,
    policy: FailurePolicy,
    stats: TestStats,
}

#[cfg(any(feature = "std", feature = "platform-console"))]
impl<'a> TestRunner<'a, Console> {
    /// Runner printing to the console.
    pub fn console(settings: &'a RunnerSettings) -> Self {
        Self::new(settings, Console)
    }
}

impl<'a, W: Write> TestRunner<'a, W> {
    pub fn new(settings: &'a RunnerSettings, out: W) -> Self {
        Self {
            settings,
            out,
            policy: FailurePolicy::default(),
            stats: TestStats::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn settings(&self) -> &RunnerSettings {
        self.settings
    }

    pub fn stats(&self) -> TestStats {
        self.stats
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Prints the group header. Never skipped.
    pub fn start_group(&mut self, group_name: &str) {
        debug!("running group {group_name}");
        let _ = writeln!(self.out, "{group_name}:");
    }

    /// Hook run after the last case of a group. Prints nothing.
    pub fn end_group(&mut self, group_name: &str) {
        trace!("group {group_name} done");
    }

    /// Prints the notice for a case that is not run.
    pub fn skip_case(&mut self, group_name: &str, case_name: &str) {
        trace!("skipping {group_name}::{case_name}");
        self.stats.skipped += 1;
        let _ = writeln!(self.out, "   Testing {case_name}: SKIPPED");
    }

    /// Runs `case` regardless of the skip settings.
    ///
    /// Returns `Err` only under [`FailurePolicy::Stop`]; under
    /// [`FailurePolicy::Abort`] a failure does not return.
    pub fn call_case(&mut self, group_name: &str, case: &TestCase) -> CaseResult {
        let _ = write!(self.out, "  Testing {}: ", case.name());

        match case.call() {
            Ok(()) => {
                trace!("{group_name}::{} passed", case.name());
                self.stats.passed += 1;
                let _ = writeln!(self.out, "Ok");
                Ok(())
            }
            Err(failure) => {
                self.stats.failed += 1;
                let _ = writeln!(self.out, "{failure}");
                error!("{group_name}::{} failed", case.name());
                match self.policy {
                    FailurePolicy::Abort => terminate(&failure),
                    FailurePolicy::Stop => Err(failure),
                }
            }
        }
    }

    /// Runs `case` unless its group is skipped.
    pub fn run_case(
        &mut self,
        group_name: &str,
        case: &TestCase,
    ) -> Result<CaseStatus, AssertionFailure> {
        if self.settings.is_skipped(group_name) {
            self.skip_case(group_name, case.name());
            return Ok(CaseStatus::Skipped);
        }
        self.call_case(group_name, case)?;
        Ok(CaseStatus::Passed)
    }

    /// Runs every case of `group` in declaration order, between the group
    /// header and the group end hook.
    pub fn run_group(&mut self, group: &TestGroup) -> Result<(), CaseFailure> {
        self.start_group(group.name());
        for case in group.cases() {
            if let Err(failure) = self.run_case(group.name(), case) {
                return Err(CaseFailure {
                    group: group.name(),
                    case: case.name(),
                    failure,
                });
            }
        }
        self.end_group(group.name());
        Ok(())
    }

    /// Runs every group of `registry` in order, stopping at the first
    /// failure.
    pub fn run(&mut self, registry: &TestRegistry) -> RunOutcome {
        if registry.is_empty() {
            warn!("no test groups registered");
        }

        for group in registry.groups() {
            if let Err(failure) = self.run_group(group) {
                return RunOutcome::Failed(failure, self.stats);
            }
        }

        info!(
            "{} passed, {} skipped",
            self.stats.passed, self.stats.skipped
        );
        RunOutcome::Completed(self.stats)
    }
}

#[cfg(feature = "std")]
fn terminate(_failure: &AssertionFailure) -> ! {
    std::process::abort()
}

#[cfg(not(feature = "std"))]
fn terminate(failure: &AssertionFailure) -> ! {
    panic!("{failure}")
}

/// Parses `args` into settings and runs `registry` on the console.
///
/// With the default policy a failure terminates the process, so a returned
/// outcome is always [`RunOutcome::Completed`].
#[cfg(any(feature = "std", feature = "platform-console"))]
pub fn run_with_args<I, S>(args: I, registry: &TestRegistry) -> RunOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut settings = RunnerSettings::new();
    settings.parse_arguments(args);
    TestRunner::console(&settings).run(registry)
}

/// Runs `registry` with settings taken from the process arguments.
///
/// # Example
/// ```rust,no_run
/// fn main() {
///     let registry = shurup::TestRegistry::new();
///     let stats = shurup::run_tests(&registry);
///     println!("{} cases passed", stats.passed);
/// }
/// ```
#[cfg(feature = "std")]
pub fn run_tests(registry: &TestRegistry) -> TestStats {
    let settings = RunnerSettings::from_env();
    TestRunner::console(&settings).run(registry).stats()
}
