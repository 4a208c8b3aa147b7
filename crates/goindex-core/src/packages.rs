//! `Package` (§3): the registry's view of a package after the dependency
//! walk has ordered and indexed it.

use crate::ids::{FuncIndex, PackageIndex, TypeNameIndex, ValueIndex};

#[derive(Clone, Debug)]
pub struct ImportRecord {
    pub local_name: String,
    pub imported_path: String,
}

#[derive(Clone, Debug)]
pub struct Package {
    pub import_path: String,
    pub deps: Vec<PackageIndex>,
    pub dependents: Vec<PackageIndex>,
    pub dep_level: u32,
    pub index: PackageIndex,
    pub type_names: Vec<TypeNameIndex>,
    pub funcs: Vec<FuncIndex>,
    pub values: Vec<ValueIndex>,
    pub imports: Vec<ImportRecord>,
    pub is_builtin_source: bool,
    pub is_universe: bool,
}

impl Package {
    #[must_use]
    pub(crate) fn new(import_path: String, index: PackageIndex) -> Self {
        Self {
            import_path,
            deps: Vec::new(),
            dependents: Vec::new(),
            dep_level: 0,
            index,
            type_names: Vec::new(),
            funcs: Vec::new(),
            values: Vec::new(),
            imports: Vec::new(),
            is_builtin_source: false,
            is_universe: false,
        }
    }
}
