//! Check command implementation.

use anyhow::{Context, Result};
use javalint_core::{
    Analyzer, Config, ExtractorConfig, FallbackSource, HeuristicSource, Severity, SourceBox,
    Strategy, StructuralParser, StructuralSource, SubprocessParser,
};
use javalint_ts::TreeSitterJavaParser;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Command-line overrides for a check run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Strategy override.
    pub strategy: Option<Strategy>,
    /// Terminal output format.
    pub format: OutputFormat,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Skip writing report files.
    pub no_write: bool,
    /// Failing severity threshold.
    pub fail_on: Option<Severity>,
}

/// Runs the check command.
///
/// Returns `false` when `--fail-on` is set and a violation reaches it.
pub fn run(path: &Path, source: &ConfigSource, options: &CheckOptions) -> Result<bool> {
    let mut config = source.load()?;
    if let Some(strategy) = options.strategy {
        config.extractor.strategy = strategy;
    }
    if options.no_write {
        config.report.write = false;
    }

    let root = project_root(path, &config);
    let declarations = build_source(&config.extractor)?;
    let strategy = strategy_label(&config.extractor);

    let analyzer = Analyzer::builder()
        .root(root)
        .excludes(options.exclude.iter().cloned())
        .source_box(declarations)
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with the {strategy} strategy",
        analyzer.root().display()
    );
    tracing::debug!("Declaration source: {}", analyzer.source_name());

    let report = analyzer.run().context("Analysis failed")?;

    super::output::print(&report, options.format)?;

    Ok(!options
        .fail_on
        .is_some_and(|threshold| report.has_violations_at(threshold)))
}

/// The analyzed root: `[analyzer] root` taken relative to the project dir.
fn project_root(path: &Path, config: &Config) -> PathBuf {
    path.join(&config.analyzer.root)
}

/// Human-readable strategy name, noting the heuristic fallback.
fn strategy_label(extractor: &ExtractorConfig) -> String {
    if extractor.strategy.is_structural() && extractor.fallback {
        format!("{} (heuristic fallback)", extractor.strategy)
    } else {
        extractor.strategy.to_string()
    }
}

/// Builds the declaration source for the configured strategy.
///
/// Structural strategies are wrapped in a heuristic fallback unless
/// `fallback = false`.
pub fn build_source(extractor: &ExtractorConfig) -> Result<SourceBox> {
    let parser: Box<dyn StructuralParser> = match extractor.strategy {
        Strategy::Heuristic => return Ok(Box::new(HeuristicSource::new())),
        Strategy::TreeSitter => Box::new(TreeSitterJavaParser::new()),
        Strategy::Subprocess => match SubprocessParser::from_command(&extractor.command) {
            Ok(parser) => Box::new(parser),
            Err(e) if extractor.fallback => {
                tracing::warn!("{e}, using the heuristic strategy");
                return Ok(Box::new(HeuristicSource::new()));
            }
            Err(e) => {
                return Err(e).context("[extractor] command is required for the subprocess strategy")
            }
        },
    };

    let structural = StructuralSource::new(parser);
    if extractor.fallback {
        Ok(Box::new(FallbackSource::new(
            Box::new(structural),
            Box::new(HeuristicSource::new()),
        )))
    } else {
        Ok(Box::new(structural))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javalint_core::DeclarationSource;

    fn extractor(strategy: Strategy, command: &[&str], fallback: bool) -> ExtractorConfig {
        ExtractorConfig {
            strategy,
            command: command.iter().map(ToString::to_string).collect(),
            fallback,
        }
    }

    #[test]
    fn heuristic_source_by_default() {
        let source = build_source(&ExtractorConfig::default()).unwrap();
        assert_eq!(source.name(), "heuristic");
    }

    #[test]
    fn tree_sitter_source_keeps_its_name_behind_fallback() {
        let source = build_source(&extractor(Strategy::TreeSitter, &[], true)).unwrap();
        assert_eq!(source.name(), "tree-sitter");
    }

    #[test]
    fn subprocess_without_command() {
        let source = build_source(&extractor(Strategy::Subprocess, &[], true)).unwrap();
        assert_eq!(source.name(), "heuristic");
        assert!(build_source(&extractor(Strategy::Subprocess, &[], false)).is_err());
    }

    #[test]
    fn failing_subprocess_falls_back_to_heuristic() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("rules")).unwrap();
        std::fs::write(
            dir.path().join("rules/rules.json"),
            r#"{"rules":[{"type":"style","object":"class","pattern":"^[a-z]","message":"m","severity":"Error"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("A.java"), "class Account {}\n").unwrap();

        let source = build_source(&extractor(
            Strategy::Subprocess,
            &["javalint-test-no-such-parser"],
            true,
        ))
        .unwrap();
        let report = Analyzer::builder()
            .root(dir.path())
            .source_box(source)
            .build()
            .unwrap()
            .analyze()
            .unwrap();
        assert_eq!(report.classes.len(), 1);
        assert_eq!(report.classes[0].name, "Account");
        assert!(report.missing_javadoc_classes.is_none());
    }

    #[test]
    fn strategy_label_mentions_fallback_only_for_structural() {
        assert_eq!(
            strategy_label(&extractor(Strategy::Heuristic, &[], true)),
            "heuristic"
        );
        assert_eq!(
            strategy_label(&extractor(Strategy::TreeSitter, &[], true)),
            "tree-sitter (heuristic fallback)"
        );
        assert_eq!(
            strategy_label(&extractor(Strategy::Subprocess, &["parser"], false)),
            "subprocess"
        );
    }

    #[test]
    fn root_is_relative_to_project_dir() {
        let mut config = Config::default();
        config.analyzer.root = PathBuf::from("src/main/java");
        assert_eq!(
            project_root(Path::new("/work/app"), &config),
            PathBuf::from("/work/app/src/main/java")
        );
    }
}
