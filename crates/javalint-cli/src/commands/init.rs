//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# javalint configuration

[analyzer]
# Root directory to analyze, relative to this file's directory
# root = "src/main/java"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/target/**",
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Rule file, relative to the root
rules_file = "rules/rules.json"

# Abort instead of skipping files that cannot be read
fail_on_read_error = false

[extractor]
# heuristic | tree-sitter | subprocess
# Only tree-sitter and subprocess extract methods and Javadoc presence.
# With one of them, add a method rule to rules/rules.json:
#   { "type": "style", "object": "method", "pattern": "^[a-z][a-zA-Z0-9]*$",
#     "message": "Method names must be camelCase", "severity": "Warning" }
strategy = "heuristic"

# External parser for the subprocess strategy; the root path is appended
# command = ["java", "-jar", "decl-parser.jar"]

# Fall back to the heuristic strategy when a structural parser fails
fallback = true

[report]
# Where report JSON files are written (default: the analyzed root)
# output_dir = "reports"
write = true
"#;

const DEFAULT_RULES: &str = r#"{
    "rules": [
        {
            "type": "style",
            "object": "class",
            "pattern": "^[A-Z][a-zA-Z0-9]*$",
            "message": "Class names must be PascalCase",
            "severity": "Error"
        },
        {
            "type": "style",
            "object": "variable",
            "pattern": "^[a-z][a-zA-Z0-9]*$",
            "message": "Variable names must be camelCase",
            "severity": "Warning"
        },
        {
            "type": "javadoc",
            "object": "class",
            "message": "Classes must have a Javadoc comment",
            "severity": "Info"
        },
        {
            "type": "javadoc",
            "object": "method",
            "message": "Methods must have a Javadoc comment",
            "severity": "Info"
        }
    ]
}
"#;

/// Runs the init command in `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join("javalint.toml");
    let rules_path = dir.join("rules").join("rules.json");

    for path in [&config_path, &rules_path] {
        if path.exists() && !force {
            bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    std::fs::create_dir_all(dir.join("rules"))?;
    std::fs::write(&rules_path, DEFAULT_RULES)
        .with_context(|| format!("Failed to write {}", rules_path.display()))?;

    println!("Created javalint.toml and rules/rules.json");
    println!("\nNext steps:");
    println!("  1. Edit rules/rules.json to set naming patterns");
    println!("  2. Run: javalint check");

    Ok(())
}
