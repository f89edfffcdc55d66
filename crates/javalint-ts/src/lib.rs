//! # javalint-ts
//!
//! Tree-sitter powered structural parsing for javalint.
//!
//! [`TreeSitterJavaParser`] implements `javalint_core::StructuralParser`:
//! it parses every Java file in-process with `tree-sitter-java` and turns
//! each syntax tree into a `DeclTree` of class, method and variable nodes,
//! with Javadoc presence recorded on classes and methods.
//!
//! ```ignore
//! use javalint_core::{Analyzer, StructuralSource};
//! use javalint_ts::TreeSitterJavaParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .source(StructuralSource::new(Box::new(TreeSitterJavaParser::new())))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod java;

pub use java::TreeSitterJavaParser;
