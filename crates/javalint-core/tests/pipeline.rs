//! Integration test: the full pipeline over throw-away Java trees.
//!
//! Each test builds a temporary project with `rules/rules.json` and a few
//! `.java` files, runs the [`Analyzer`] and inspects the written reports.

use javalint_core::{
    Analyzer, AnalyzerError, Config, DeclTree, NodeKind, ParseOutput, ParsedUnit, ParserError,
    ProjectContext, RuleError, StructuralParser, StructuralSource,
};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn project(rules: &str, files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("rules")).unwrap();
    std::fs::write(dir.path().join("rules/rules.json"), rules).unwrap();
    for (name, text) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, text).unwrap();
    }
    dir
}

fn rules(entries: &[(&str, &str)]) -> String {
    let rules: Vec<Value> = entries
        .iter()
        .map(|(object, pattern)| {
            serde_json::json!({
                "type": "style",
                "object": object,
                "pattern": pattern,
                "message": format!("{object} must match {pattern}"),
                "severity": "Error",
            })
        })
        .collect();
    serde_json::json!({ "rules": rules }).to_string()
}

fn run(root: &Path) -> Result<javalint_core::Report, AnalyzerError> {
    Analyzer::builder().root(root).build()?.run()
}

fn read_report(root: &Path, file: &str) -> Value {
    let text = std::fs::read_to_string(root.join(file)).expect("report file should exist");
    serde_json::from_str(&text).expect("report should be JSON")
}

fn names(report: &Value, key: &str, name_key: &str) -> Vec<String> {
    report[key]
        .as_array()
        .expect("top-level array")
        .iter()
        .map(|e| e[name_key].as_str().unwrap().to_owned())
        .collect()
}

// ── Properties of a successful run ──

#[test]
fn repeated_runs_are_byte_identical() {
    let dir = project(
        &rules(&[("class", "^[A-Z]"), ("variable", "^[a-z]+$")]),
        &[
            ("A.java", "class bad_name {\n    int Count;\n    String userName;\n}\n"),
            ("b/B.java", "class B {\n    double Ratio;\n}\n"),
        ],
    );

    run(dir.path()).unwrap();
    let first_classes = std::fs::read(dir.path().join("nonMatchingClasses.json")).unwrap();
    let first_vars = std::fs::read(dir.path().join("nonMatchingVariables.json")).unwrap();

    run(dir.path()).unwrap();
    assert_eq!(
        std::fs::read(dir.path().join("nonMatchingClasses.json")).unwrap(),
        first_classes
    );
    assert_eq!(
        std::fs::read(dir.path().join("nonMatchingVariables.json")).unwrap(),
        first_vars
    );
}

#[test]
fn commented_identifiers_are_neither_extracted_nor_located() {
    let dir = project(
        &rules(&[("variable", "^[A-Z]+$")]),
        &[("A.java", "/* int count; */\nint total;\n// int other;\n")],
    );

    run(dir.path()).unwrap();
    let report = read_report(dir.path(), "nonMatchingVariables.json");
    assert_eq!(names(&report, "nonMatchingVariables", "variableName"), vec!["total"]);
    assert_eq!(report["nonMatchingVariables"][0]["row"], 2);
    assert_eq!(report["nonMatchingVariables"][0]["col"], 5);
}

#[test]
fn location_requires_word_boundary() {
    let dir = project(
        &rules(&[("variable", "^[A-Z]")]),
        &[(
            "A.java",
            "class A {\n    int countTotal;\n    int count;\n}\n",
        )],
    );

    let report = run(dir.path()).unwrap();
    let count = report
        .variables
        .iter()
        .find(|v| v.name == "count")
        .expect("count is reported");
    let location = count.location.as_ref().expect("count is located");
    assert_eq!(location.position.row, 3);
    assert_eq!(location.position.column, 9);
}

#[test]
fn vacuous_pattern_flags_every_class() {
    let dir = project(
        &rules(&[("class", "^$NOMATCH$")]),
        &[("A.java", "class Foo {}\nclass Bar {}\n")],
    );

    run(dir.path()).unwrap();
    let report = read_report(dir.path(), "nonMatchingClasses.json");
    assert_eq!(names(&report, "nonMatchingClasses", "className"), vec!["Foo", "Bar"]);
    let entry = report["nonMatchingClasses"][0].as_object().unwrap();
    assert_eq!(entry.len(), 3, "class entries carry no location: {entry:?}");
    assert_eq!(entry["severity"], "Error");
}

#[test]
fn failures_accumulate_across_rules_without_dedup() {
    let dir = project(
        &rules(&[("variable", "^[A-Z]"), ("variable", "_")]),
        &[("A.java", "class A {\n    int count;\n}\n")],
    );

    run(dir.path()).unwrap();
    let report = read_report(dir.path(), "nonMatchingVariables.json");
    assert_eq!(
        names(&report, "nonMatchingVariables", "variableName"),
        vec!["count", "count"]
    );
    assert_eq!(
        report["nonMatchingVariables"][0]["message"],
        "variable must match ^[A-Z]"
    );
    assert_eq!(report["nonMatchingVariables"][1]["message"], "variable must match _");
}

#[test]
fn duplicate_names_bind_to_first_file_in_enumeration_order() {
    let dir = project(
        &rules(&[("variable", "^[A-Z]")]),
        &[
            ("A.java", "class A {\n    int before;\n    int shared;\n}\n"),
            ("B.java", "class B {\n    int shared;\n}\n"),
        ],
    );

    let report = run(dir.path()).unwrap();
    let shared: Vec<_> = report
        .variables
        .iter()
        .filter(|v| v.name == "shared")
        .collect();
    assert_eq!(shared.len(), 2);
    for violation in shared {
        let location = violation.location.as_ref().unwrap();
        assert!(location.file.ends_with("A.java"));
        assert_eq!(location.position.row, 3);
    }
}

#[test]
fn located_entries_have_row_col_and_hyperlink() {
    let dir = project(
        &rules(&[("variable", "^[A-Z]")]),
        &[("src/Main.java", "class Main {\n    String name;\n    int age;\n}\n")],
    );

    run(dir.path()).unwrap();
    let report = read_report(dir.path(), "nonMatchingVariables.json");
    let entries = report["nonMatchingVariables"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    for entry in entries {
        let row = entry["row"].as_u64().expect("row");
        let col = entry["col"].as_u64().expect("col");
        let link = entry["hyperlink"].as_str().expect("hyperlink");
        assert!(link.starts_with("file:///"), "{link}");
        assert!(link.ends_with(&format!("#L{row},{col}")), "{link}");
        assert!(entry["file"].as_str().unwrap().ends_with("Main.java"));
    }
}

#[test]
fn empty_reports_are_still_written() {
    let dir = project(
        &rules(&[("class", "^[A-Z]")]),
        &[("A.java", "class Good {}\n")],
    );

    run(dir.path()).unwrap();
    assert_eq!(
        std::fs::read_to_string(dir.path().join("nonMatchingVariables.json")).unwrap(),
        "{\n    \"nonMatchingVariables\": []\n}"
    );
    assert!(!dir.path().join("nonMatchingMethods.json").exists());
    assert!(!dir.path().join("missingJavadocsClass.json").exists());
}

#[test]
fn no_write_config_leaves_tree_untouched() {
    let dir = project(&rules(&[("class", "^[a-z]")]), &[("A.java", "class A {}\n")]);
    let mut config = Config::default();
    config.report.write = false;

    let report = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(report.classes.len(), 1);
    assert!(!dir.path().join("nonMatchingClasses.json").exists());
}

// ── Read failures ──

/// A `Bad.java` link whose target does not exist: discovered, never readable.
#[cfg(unix)]
fn dangling_source(dir: &Path) {
    std::os::unix::fs::symlink(dir.join("Deleted.java"), dir.join("Bad.java")).unwrap();
}

#[test]
fn non_utf8_file_is_still_analyzed() {
    let dir = project(&rules(&[("variable", "^[a-z]+$")]), &[]);
    std::fs::write(
        dir.path().join("Cafe.java"),
        b"class Cafe {\n    // caf\xE9\n    int bad_name;\n}\n",
    )
    .unwrap();

    let report = run(dir.path()).unwrap();
    assert!(report.file_errors.is_empty());
    assert_eq!(report.files_checked, 1);

    let variables = read_report(dir.path(), "nonMatchingVariables.json");
    let entry = &variables["nonMatchingVariables"][0];
    assert_eq!(entry["variableName"], "bad_name");
    assert_eq!(entry["row"], 3);
    assert_eq!(entry["col"], 9);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_recorded_and_skipped() {
    let dir = project(
        &rules(&[("class", "^[a-z]")]),
        &[("Good.java", "class Good {}\n")],
    );
    dangling_source(dir.path());

    let report = run(dir.path()).unwrap();
    assert_eq!(report.files_checked, 1);
    assert_eq!(report.file_errors.len(), 1);
    assert!(report.file_errors[0].path.ends_with("Bad.java"));
    assert_eq!(report.classes.len(), 1);
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_fatal_when_configured() {
    let dir = project(&rules(&[("class", "^[a-z]")]), &[]);
    dangling_source(dir.path());
    let mut config = Config::default();
    config.analyzer.fail_on_read_error = true;

    let err = Analyzer::builder()
        .root(dir.path())
        .config(config)
        .build()
        .unwrap()
        .run()
        .unwrap_err();
    assert!(matches!(err, AnalyzerError::FileRead { .. }), "{err}");
    assert!(!dir.path().join("nonMatchingClasses.json").exists());
}

// ── Rule file errors abort without writing ──

#[test]
fn missing_rule_file_aborts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("A.java"), "class A {}\n").unwrap();

    let err = run(dir.path()).unwrap_err();
    assert!(
        matches!(err, AnalyzerError::Rules(RuleError::MissingRuleFile { .. })),
        "{err}"
    );
    assert!(!dir.path().join("nonMatchingClasses.json").exists());
}

#[test]
fn malformed_rule_file_aborts() {
    let dir = project("{ \"rules\": [", &[("A.java", "class A {}\n")]);

    let err = run(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::Rules(RuleError::MalformedRuleJson { .. })
    ));
    assert!(!dir.path().join("nonMatchingVariables.json").exists());
}

// ── Structural strategy ──

/// Builds one tree per file from a fixed layout, ignoring file contents.
struct FixedParser;

impl StructuralParser for FixedParser {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn parse(&self, ctx: &ProjectContext<'_>) -> Result<ParseOutput, ParserError> {
        let units = ctx
            .source_files
            .iter()
            .map(|file| {
                let mut tree = DeclTree::new();
                let class = tree.push(tree.root(), NodeKind::ClassDeclaration, Some("Service".into()));
                tree.set_documented(class, false);
                let method = tree.push(class, NodeKind::MethodDeclaration, Some("Start".into()));
                tree.set_documented(method, false);
                tree.push(method, NodeKind::VariableDeclarator, Some("local".into()));
                ParsedUnit {
                    file: Some(file.clone()),
                    tree,
                }
            })
            .collect();
        Ok(ParseOutput {
            units,
            files_read: ctx.source_files.len(),
            ..ParseOutput::default()
        })
    }
}

#[test]
fn structural_strategy_writes_method_and_javadoc_reports() {
    let rule_json = r#"{ "rules": [
        { "type": "style", "object": "method", "pattern": "^[a-z]", "message": "methods are camelCase", "severity": "Warning" },
        { "type": "javadoc", "object": "method", "message": "document public methods", "severity": "Info" }
    ] }"#;
    let dir = project(
        rule_json,
        &[(
            "Service.java",
            "class Service {\n    void Start() {\n        int local;\n    }\n}\n",
        )],
    );

    Analyzer::builder()
        .root(dir.path())
        .source(StructuralSource::new(Box::new(FixedParser)))
        .build()
        .unwrap()
        .run()
        .unwrap();

    let methods = read_report(dir.path(), "nonMatchingMethods.json");
    let entry = &methods["nonMatchingMethods"][0];
    assert_eq!(entry["methodName"], "Start");
    assert_eq!(entry["severity"], "Warning");
    assert_eq!(entry["row"], 2);
    assert_eq!(entry["col"], 10);

    let classes = read_report(dir.path(), "missingJavadocsClass.json");
    assert_eq!(classes["missingJavadocsClass"][0]["className"], "Service");
    assert_eq!(
        classes["missingJavadocsClass"][0]["message"],
        "Missing Javadoc comment"
    );

    let doc_methods = read_report(dir.path(), "missingJavadocsMethod.json");
    assert_eq!(doc_methods["missingJavadocsMethod"][0]["message"], "document public methods");
    assert_eq!(doc_methods["missingJavadocsMethod"][0]["severity"], "Info");
}
