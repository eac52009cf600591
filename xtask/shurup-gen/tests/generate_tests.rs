//! Unit tests for grouping, rendering and whole preprocessor runs

#![cfg(test)]


use std::{
    fs,
    time::{Duration, SystemTime},
};

use shurup_gen::{
    GroupPlan, Summary,
    cache::{CACHE_VERSION, TestCache},
    group_cases, process_tests, render,
    scan::CaseDecl,
};
use test_helpers::{Workspace, case_source, write_file};

fn plan(name: &str, priority: i64, cases: &[&str]) -> GroupPlan {
    GroupPlan {
        name: name.to_string(),
        priority,
        cases: cases.iter().map(|case| case.to_string()).collect(),
    }
}

// ========== Grouping Tests ==========

#[test]
fn test_group_cases_merges_and_orders_by_priority() {
    let low = [CaseDecl::new("A", "a1"), CaseDecl::new("B", "b1")];
    let high = [CaseDecl::new("C", "c1"), CaseDecl::new("A", "a2")];
    let mid = [CaseDecl::new("D", "d1")];

    let groups = group_cases([(0, &low[..]), (5, &high[..]), (0, &mid[..])]);

    assert_eq!(
        groups,
        [
            plan("A", 5, &["a1", "a2"]),
            plan("C", 5, &["c1"]),
            plan("B", 0, &["b1"]),
            plan("D", 0, &["d1"]),
        ]
    );
}

#[test]
fn test_group_cases_drops_duplicates() {
    let first = [CaseDecl::new("A", "shared"), CaseDecl::new("A", "own")];
    let second = [CaseDecl::new("A", "shared"), CaseDecl::new("B", "shared")];

    let groups = group_cases([(0, &first[..]), (2, &second[..])]);

    assert_eq!(
        groups,
        [plan("A", 2, &["shared", "own"]), plan("B", 2, &["shared"])]
    );
}

#[test]
fn test_group_cases_empty() {
    assert!(group_cases(Vec::<(i64, &[CaseDecl])>::new()).is_empty());
}

// ========== Rendering Tests ==========

#[test]
fn test_render_registry() {
    let rendered = render(&[
        plan("Math", 0, &["addition", "subtraction"]),
        plan("Text", 0, &["concat"]),
    ]);

    assert_eq!(
        rendered,
        r#"// Generated by shurup-gen. Do not edit.

shurup::declare_case!(Math, addition);
shurup::declare_case!(Math, subtraction);
shurup::declare_case!(Text, concat);

/// Every registered case, in run order.
pub fn registry() -> shurup::TestRegistry {
    let mut registry = shurup::TestRegistry::new();
    registry
        .group("Math")
        .case("addition", shurup::case_fn!(Math, addition))
        .case("subtraction", shurup::case_fn!(Math, subtraction));
    registry
        .group("Text")
        .case("concat", shurup::case_fn!(Text, concat));
    registry
}

/// Parses `args` and runs every case on the console.
pub fn run_tests<I, S>(args: I) -> shurup::RunOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    shurup::run_with_args(args, &registry())
}
"#
    );
}

#[test]
fn test_render_without_cases() {
    let rendered = render(&[]);

    assert!(rendered.contains(
        "pub fn registry() -> shurup::TestRegistry {\n    shurup::TestRegistry::new()\n}"
    ));
    assert!(!rendered.contains("declare_case!"));
}

// ========== Preprocessor Run Tests ==========

#[test]
fn test_process_generates_registry() {
    let workspace = Workspace::new();
    write_file(
        &workspace.src(),
        "math_test.rs",
        &case_source(&[("Math", "addition"), ("Math", "subtraction")]),
    );
    write_file(
        &workspace.src(),
        "nested/text_Test.rs",
        &case_source(&[("Text", "concat")]),
    );
    write_file(&workspace.src(), "helpers.rs", &case_source(&[("Ignored", "helper")]));

    let summary = process_tests(&workspace.options()).unwrap();

    assert_eq!(
        summary,
        Summary {
            files: 2,
            scanned: 2,
            groups: 2,
            cases: 3,
            written: true,
        }
    );
    let output = workspace.output();
    assert!(output.contains("shurup::declare_case!(Math, addition);"));
    assert!(output.contains(".case(\"concat\", shurup::case_fn!(Text, concat))"));
    assert!(!output.contains("Ignored"));
    assert!(output.find("\"Math\"").unwrap() < output.find("\"Text\"").unwrap());
}

#[test]
fn test_second_run_uses_cache() {
    let workspace = Workspace::new();
    write_file(&workspace.src(), "math_test.rs", &case_source(&[("Math", "addition")]));
    let options = workspace.options();

    process_tests(&options).unwrap();
    let second = process_tests(&options).unwrap();

    assert_eq!(second.scanned, 0);
    assert_eq!(second.cases, 1);
    assert!(!second.written);

    let cache = TestCache::load(&options.cache).unwrap();
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_modified_file_is_rescanned() {
    let workspace = Workspace::new();
    let path = write_file(&workspace.src(), "math_test.rs", &case_source(&[("Math", "addition")]));
    let options = workspace.options();
    process_tests(&options).unwrap();

    fs::write(&path, case_source(&[("Math", "addition"), ("Math", "division")])).unwrap();
    let file = fs::File::options().write(true).open(&path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();

    let summary = process_tests(&options).unwrap();

    assert_eq!(summary.scanned, 1);
    assert!(summary.written);
    assert!(workspace.output().contains("shurup::case_fn!(Math, division)"));
}

#[test]
fn test_outdated_cache_is_discarded() {
    let workspace = Workspace::new();
    write_file(&workspace.src(), "math_test.rs", &case_source(&[("Math", "addition")]));
    let options = workspace.options();
    fs::write(&options.cache, "version = \"0\"\n[files]\n").unwrap();

    let summary = process_tests(&options).unwrap();

    assert_eq!(summary.scanned, 1);
    let saved = fs::read_to_string(&options.cache).unwrap();
    assert!(saved.contains(&format!("version = \"{CACHE_VERSION}\"")));
}

#[test]
fn test_config_restricts_entries_and_sets_priority() {
    let workspace = Workspace::new();
    let src = workspace.src();
    write_file(&src, ".shurup.conf", "# late groups first\nlate = 3\nearly_test.rs\n");
    write_file(&src, "early_test.rs", &case_source(&[("Early", "first")]));
    write_file(&src, "late/late_test.rs", &case_source(&[("Late", "second")]));
    write_file(&src, "unlisted_test.rs", &case_source(&[("Unlisted", "third")]));

    let summary = process_tests(&workspace.options()).unwrap();

    assert_eq!(summary.groups, 2);
    let output = workspace.output();
    assert!(!output.contains("Unlisted"));
    assert!(output.find("\"Late\"").unwrap() < output.find("\"Early\"").unwrap());
}

#[test]
fn test_invalid_source_is_reported() {
    let workspace = Workspace::new();
    write_file(&workspace.src(), "broken_test.rs", "fn broken( {");

    let err = process_tests(&workspace.options()).unwrap_err();

    assert!(err.to_string().contains("broken_test.rs"));
}

#[test]
fn test_invalid_pattern_is_reported() {
    let workspace = Workspace::new();
    let mut options = workspace.options();
    options.expr = "(".to_string();

    assert!(process_tests(&options).is_err());
}

#[test]
fn test_duplicate_case_is_declared_once() {
    let workspace = Workspace::new();
    write_file(&workspace.src(), "a_test.rs", &case_source(&[("Math", "addition")]));
    write_file(&workspace.src(), "b_test.rs", &case_source(&[("Math", "addition")]));

    let summary = process_tests(&workspace.options()).unwrap();

    assert_eq!(summary.files, 2);
    assert_eq!(summary.cases, 1);
    assert_eq!(
        workspace
            .output()
            .matches("shurup::declare_case!(Math, addition);")
            .count(),
        1
    );
}

#[test]
fn test_deleted_file_leaves_cache() {
    let workspace = Workspace::new();
    write_file(&workspace.src(), "math_test.rs", &case_source(&[("Math", "addition")]));
    let removed = write_file(&workspace.src(), "text_test.rs", &case_source(&[("Text", "concat")]));
    let options = workspace.options();
    process_tests(&options).unwrap();
    assert_eq!(TestCache::load(&options.cache).unwrap().len(), 2);

    fs::remove_file(&removed).unwrap();
    let summary = process_tests(&options).unwrap();

    assert_eq!(summary.scanned, 0);
    assert!(summary.written);
    let cache = TestCache::load(&options.cache).unwrap();
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&removed.to_string_lossy()).is_empty());
    assert!(!workspace.output().contains("Text"));
}
