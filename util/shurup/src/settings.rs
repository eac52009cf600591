// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Run configuration: which groups are skipped.

use alloc::{
    collections::BTreeSet,
    string::{String, ToString},
};

/// Command-line flag naming one group to skip. Repeatable.
pub const SKIP_FLAG: &str = "-shurup_skip";

/// Skip configuration for a single run.
///
/// Built once before the run and handed to the runner by shared reference,
/// so skip decisions cannot change while groups are executing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerSettings {
    are_all_groups_skipped: bool,
    skipped_groups: BTreeSet<String>,
}

impl RunnerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds settings from the process arguments.
    #[cfg(feature = "std")]
    pub fn from_env() -> Self {
        Self::from_os_args(std::env::args_os())
    }

    /// Builds settings from raw OS arguments.
    ///
    /// Arguments that are not valid UTF-8 are converted lossily; as unknown
    /// tokens they are then ignored.
    #[cfg(feature = "std")]
    pub fn from_os_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut settings = Self::new();
        settings.parse_arguments(
            args.into_iter()
                .map(|arg| arg.as_ref().to_string_lossy().into_owned()),
        );
        settings
    }

    pub fn are_all_groups_skipped(&self) -> bool {
        self.are_all_groups_skipped
    }

    pub fn set_all_groups_skipped(&mut self, are_all_groups_skipped: bool) {
        self.are_all_groups_skipped = are_all_groups_skipped;
    }

    pub fn skipped_groups(&self) -> &BTreeSet<String> {
        &self.skipped_groups
    }

    /// Returns `true` if cases of `group_name` must not run.
    pub fn is_skipped(&self, group_name: &str) -> bool {
        if self.are_all_groups_skipped {
            return true;
        }
        self.skipped_groups.contains(group_name)
    }

    /// Replaces the skipped groups with those named by `-shurup_skip <group>`
    /// pairs in `args`.
    ///
    /// Unknown tokens are ignored, as is a trailing flag without a value.
    /// The all-groups flag is left untouched.
    pub fn parse_arguments<I, S>(&mut self, args: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.skipped_groups.clear();

        // The value is only peeked: in `-shurup_skip -shurup_skip Foo` both
        // "-shurup_skip" and "Foo" are skipped.
        let mut args = args.into_iter().peekable();
        while let Some(arg) = args.next() {
            if arg.as_ref() != SKIP_FLAG {
                continue;
            }
            if let Some(group) = args.peek() {
                trace!("skipping group {}", group.as_ref());
                self.skipped_groups.insert(group.as_ref().to_string());
            }
        }
    }
}
