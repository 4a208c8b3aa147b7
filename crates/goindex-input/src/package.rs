//! The package graph and type-object arena handed to the core (§3's
//! `Package` input half, before dependency sort / indexing happen).

use serde::{Deserialize, Serialize};

use crate::decl::TopLevelDecl;
use crate::types::{TypeObject, TypeObjectId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedPackage {
    pub import_path: String,
    /// Import paths of this package's direct dependencies.
    pub deps: Vec<String>,
    pub decls: Vec<TopLevelDecl>,
    /// The builtin package's source-file copy (documentation-only AST), per
    /// the §4.2 special case. At most one package in a program sets this.
    pub is_builtin_source: bool,
    /// The checker's internal universe copy of the builtin package. At most
    /// one package in a program sets this.
    pub is_universe: bool,
}

impl CheckedPackage {
    #[must_use]
    pub fn new(import_path: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            deps: Vec::new(),
            decls: Vec::new(),
            is_builtin_source: false,
            is_universe: false,
        }
    }
}

/// A whole type-checked program: the type-object arena plus every package.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CheckedProgram {
    pub type_objects: Vec<TypeObject>,
    pub packages: Vec<CheckedPackage>,
}

impl CheckedProgram {
    #[must_use]
    pub fn type_object(&self, id: TypeObjectId) -> &TypeObject {
        &self.type_objects[id.0 as usize]
    }
}
