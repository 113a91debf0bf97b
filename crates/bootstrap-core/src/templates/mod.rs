//! Template bundles: loading, selection, substitution, and generation
//!
//! This module provides:
//! - Bundle metadata types (TemplateBundle, FileEntry, TemplateSummary)
//! - A directory-backed store that reads bundles fresh on every lookup
//! - The placeholder substitution engine
//! - Requirement-driven template selection
//! - Project generation and the disk commit step

pub mod bundle;
pub mod generator;
pub mod selector;
pub mod store;
pub mod substitution;

pub use bundle::{FileEntry, StructuredFile, TemplateBundle, TemplateSummary};
pub use generator::{
    commit_files, parse_tools, to_kebab_case, GenerationResult, ProjectConfig, ProjectGenerator,
};
pub use selector::{select_template, RequirementFlags, TemplateKind};
pub use store::TemplateStore;
pub use substitution::{substitute_args, substitute_project};
