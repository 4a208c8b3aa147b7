//! The whole-program type registry, selector-promotion engine, and
//! implementation-matching engine.
//!
//! The fixed pipeline is: sort-by-deps → collect-declarations →
//! resolve-type-sources → collect-direct-selectors → promote-selectors →
//! find-implementations → index-cross-references. [`analyzer::Analyzer`]
//! runs all six phases and hands back a frozen, read-only
//! [`analyzer::AnalysisResult`] (§6's output contract). Every other module
//! in this crate implements exactly one phase (or one shared concern —
//! the registry, ids, selectors, signatures, errors, config) and is
//! forbidden from mutating an earlier phase's outputs except to attach new
//! derived attributes (§2).

pub mod config;
pub use config::AnalyzerConfig;

pub mod errors;
pub use errors::{AnalysisError, AnalysisOutcome};

pub mod ids;
pub use ids::{FuncIndex, MethodId, PackageIndex, TypeIndex, TypeNameIndex, ValueIndex};

pub mod selector;
pub use selector::{Cond, EmbedStep, FieldMode, FieldSelector, MethodSelector, Selector, SelectorPayload};

pub mod signature;
pub use signature::MethodSignature;

pub mod registry;
pub use registry::{DeclRef, Denotation, Implementation, TypeAttributes, TypeInfo, TypeName, TypeRegistry, TypeShape, TypeSource};

pub mod packages;
pub use packages::{ImportRecord, Package};

pub mod package_walker;
pub use package_walker::sort_by_dependencies;

pub mod declarations;
pub use declarations::{collect_declarations, DeclTables, FuncInfo, ValueInfo, ValueKind};

pub mod type_source;
pub use type_source::resolve_type_sources;

pub mod direct_selectors;
pub use direct_selectors::collect_direct_selectors;

pub mod promotion;
pub use promotion::promote_selectors;

pub mod implementation;
pub use implementation::find_implementations;

pub mod xref;
pub use xref::index_cross_references;

pub mod util;

pub mod analyzer;
pub use analyzer::{AnalysisResult, Analyzer};
