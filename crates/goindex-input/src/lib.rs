//! The narrow input contract the analyzer core consumes (§6 of the design).
//!
//! This is deliberately **not** a parser or type checker — those are named
//! out-of-scope external collaborators. It is the shape of data a type
//! checker for a structurally-subtyped, interface-and-embedding language
//! (concretely, Go) would hand to a downstream analyzer: a set of packages,
//! each with its dependency edges and top-level declarations, plus opaque
//! type objects exposing kind, identity, underlying type, methods, fields,
//! tuple elements and a variadic flag.
//!
//! `builder` provides an ergonomic way to construct these fixtures in
//! tests and in the CLI demo without hand-rolling arena indices.

pub mod types;
pub use types::{MethodDecl, QualifiedName, StructFieldDecl, TypeObject, TypeObjectId, TypeObjectKind};

pub mod decl;
pub use decl::{FuncDeclInput, ImportInput, ReceiverInput, TopLevelDecl, TypeDeclInput, ValueDeclInput, ValueKind};

pub mod package;
pub use package::{CheckedPackage, CheckedProgram};

pub mod builder;
pub use builder::{PackageBuilder, ProgramBuilder};
