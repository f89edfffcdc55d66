//! Rule set loading from `rules/rules.json`.
//!
//! ```json
//! { "rules": [
//!     { "type": "style", "object": "variable", "pattern": "^[a-z][a-zA-Z0-9]*$",
//!       "message": "Variables must be camelCase", "severity": "Error" }
//! ] }
//! ```
//!
//! `type` is `style` (naming pattern) or `javadoc` (message and severity for
//! missing documentation). Entries with any other `type` or `object` are
//! skipped. Patterns are searched unanchored and may use look-around and
//! backreferences.

use std::path::{Path, PathBuf};

use fancy_regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{DeclKind, Severity};

/// Errors loading a rule set.
#[derive(Debug, Error)]
pub enum RuleError {
    /// The rule file does not exist.
    #[error("rule file not found: {}", path.display())]
    MissingRuleFile {
        /// Expected location.
        path: PathBuf,
    },

    /// The rule file exists but could not be read.
    #[error("failed to read rule file {}: {source}", path.display())]
    Io {
        /// Rule file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The rule file is not valid rule JSON.
    #[error("malformed rule JSON: {message}")]
    MalformedRuleJson {
        /// Parse error detail.
        message: String,
    },

    /// A rule pattern is not a valid regular expression.
    #[error("rules[{index}]: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// Position of the rule in the file.
        index: usize,
        /// The offending pattern.
        pattern: String,
        /// Regex compile error.
        source: Box<fancy_regex::Error>,
    },
}

/// What a rule constrains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// Naming pattern.
    Style,
    /// Documentation presence.
    Javadoc,
}

impl RuleType {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "style" => Some(Self::Style),
            "javadoc" => Some(Self::Javadoc),
            _ => None,
        }
    }
}

/// A validated rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Rule type.
    pub rule_type: RuleType,
    /// Declaration kind the rule applies to.
    pub object: DeclKind,
    /// Compiled pattern; `None` never matches.
    pub pattern: Option<Regex>,
    /// Message attached to violations.
    pub message: String,
    /// Severity attached to violations.
    pub severity: Severity,
}

impl Rule {
    /// Creates a style rule, compiling `pattern`.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` does not compile.
    pub fn style(
        object: DeclKind,
        pattern: &str,
        message: impl Into<String>,
        severity: Severity,
    ) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            rule_type: RuleType::Style,
            object,
            pattern: Some(Regex::new(pattern)?),
            message: message.into(),
            severity,
        })
    }

    /// Unanchored search of the pattern in `name`.
    ///
    /// A search that exceeds the backtracking limit counts as no match.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.pattern
            .as_ref()
            .is_some_and(|re| match re.is_match(name) {
                Ok(found) => found,
                Err(e) => {
                    warn!("pattern `{}` failed on `{name}`: {e}", re.as_str());
                    false
                }
            })
    }

    /// The pattern source, or an empty string for vacuous rules.
    #[must_use]
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_ref().map_or("", Regex::as_str)
    }
}

#[derive(Debug, Deserialize)]
struct RuleFileDto {
    rules: Vec<RuleDto>,
}

#[derive(Debug, Deserialize)]
struct RuleDto {
    #[serde(rename = "type")]
    kind: String,
    object: String,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default = "default_severity")]
    severity: Severity,
}

fn default_severity() -> Severity {
    Severity::Error
}

fn parse_object(s: &str) -> Option<DeclKind> {
    match s {
        "class" => Some(DeclKind::Class),
        "method" => Some(DeclKind::Method),
        "variable" => Some(DeclKind::Variable),
        _ => None,
    }
}

/// An ordered, immutable set of rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Creates a rule set from already-built rules.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Loads `<root>/rules/rules.json` or another rule file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn from_file(path: &Path) -> Result<Self, RuleError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RuleError::MissingRuleFile {
                    path: path.to_path_buf(),
                }
            } else {
                RuleError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Self::parse(&content)
    }

    /// Parses rule JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a pattern is invalid.
    pub fn parse(content: &str) -> Result<Self, RuleError> {
        let dto: RuleFileDto =
            serde_json::from_str(content).map_err(|e| RuleError::MalformedRuleJson {
                message: e.to_string(),
            })?;

        let mut rules = Vec::with_capacity(dto.rules.len());
        for (index, raw) in dto.rules.into_iter().enumerate() {
            let (Some(rule_type), Some(object)) =
                (RuleType::parse(&raw.kind), parse_object(&raw.object))
            else {
                debug!(
                    "rules[{index}]: skipping type `{}` object `{}`",
                    raw.kind, raw.object
                );
                continue;
            };

            let pattern = raw
                .pattern
                .map(|p| {
                    Regex::new(&p).map_err(|source| RuleError::InvalidPattern {
                        index,
                        pattern: p.clone(),
                        source: Box::new(source),
                    })
                })
                .transpose()?;

            rules.push(Rule {
                rule_type,
                object,
                pattern,
                message: raw.message,
                severity: raw.severity,
            });
        }

        Ok(Self { rules })
    }

    /// All rules in file order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Style rules targeting `kind`, in file order.
    pub fn style_rules(&self, kind: DeclKind) -> impl Iterator<Item = &Rule> {
        self.rules
            .iter()
            .filter(move |r| r.rule_type == RuleType::Style && r.object == kind)
    }

    /// Returns true if any style rule targets `kind`.
    #[must_use]
    pub fn has_style_rules(&self, kind: DeclKind) -> bool {
        self.style_rules(kind).next().is_some()
    }

    /// The first javadoc rule targeting `kind`.
    #[must_use]
    pub fn javadoc_rule(&self, kind: DeclKind) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.rule_type == RuleType::Javadoc && r.object == kind)
    }
}
