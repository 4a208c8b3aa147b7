//! The fixed pipeline orchestrator (§2, §5): sort-by-deps →
//! collect-declarations → resolve-type-sources → collect-direct-selectors →
//! promote-selectors → find-implementations → index-cross-references.
//! Strictly single-threaded; each phase reads only the frozen outputs of
//! earlier phases. Builtin/universe aliasing and runtime-function-position
//! harvesting are tolerable degradations folded into
//! [`AnalysisResult::degradations`] rather than aborting (§7).

use tracing::info;

use goindex_common::{Diagnostic, Position};
use goindex_input::{CheckedProgram, TypeObjectId};
use rustc_hash::FxHashMap;

use crate::config::AnalyzerConfig;
use crate::declarations::{alias_builtin_universe, collect_builtin_function_positions, collect_declarations, DeclTables};
use crate::direct_selectors::collect_direct_selectors;
use crate::errors::AnalysisOutcome;
use crate::ids::{PackageIndex, TypeIndex, TypeNameIndex};
use crate::implementation::find_implementations;
use crate::package_walker::sort_by_dependencies;
use crate::packages::Package;
use crate::promotion::promote_selectors;
use crate::registry::{TypeInfo, TypeName, TypeRegistry};
use crate::type_source::resolve_type_sources;
use crate::xref::index_cross_references;

/// Runs the §2 pipeline over a type-checked program. Holds only
/// configuration — all phase state lives in the `TypeRegistry` created
/// fresh for each `analyze` call, so one `Analyzer` can run multiple
/// programs (never concurrently; see §5).
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    #[must_use]
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Runs all six phases to completion, freezes the registry, and
    /// returns the read-only [`AnalysisResult`]. On a fatal error (§7) the
    /// registry is dropped along with whatever partial state it held —
    /// there is no partial-success protocol.
    pub fn analyze(&self, program: &CheckedProgram) -> AnalysisOutcome<AnalysisResult> {
        let mut registry = TypeRegistry::new();
        let mut degradations = Vec::new();

        info!(packages = program.packages.len(), "phase 1/6: sorting packages by dependency level");
        let mut packages = sort_by_dependencies(program)?;

        info!("phase 2/6: collecting declarations");
        let tables = collect_declarations(&mut registry, &mut packages, program)?;

        if !self.config.builtin_package_path.is_empty() {
            degradations.extend(alias_builtin_universe(&mut registry, &packages));
        }

        let (runtime_func_positions, runtime_diags) =
            collect_builtin_function_positions(&packages, &tables, &self.config.builtin_package_path);
        degradations.extend(runtime_diags);

        info!("phase 3/6: resolving type sources");
        resolve_type_sources(&mut registry);

        info!("phase 4/6: collecting direct selectors");
        collect_direct_selectors(&mut registry);

        info!("phase 5/6: promoting selectors");
        promote_selectors(&mut registry, self.config.strict_interface_overlap)?;

        info!("phase 6/6: finding implementations");
        find_implementations(&mut registry)?;

        info!("indexing cross-references");
        index_cross_references(&mut registry, &tables);

        registry.freeze();
        info!(types = registry.len(), "analysis complete");

        Ok(AnalysisResult { registry, packages, tables, degradations, runtime_func_positions })
    }
}

/// The output contract of §6: read-only, indexed access to the frozen
/// registry and the declaration tables collected alongside it. `Analyzer`
/// is effectively single-use-at-a-time per §5; callers needing shared read
/// access across threads wrap this themselves (e.g. in an `Arc`) rather
/// than the crate imposing a specific synchronization primitive.
pub struct AnalysisResult {
    registry: TypeRegistry,
    packages: Vec<Package>,
    tables: DeclTables,
    /// Missing-but-tolerable facts accumulated in-band per §7, rather than
    /// aborting analysis (missing builtin package, unresolved runtime
    /// functions).
    pub degradations: Vec<Diagnostic>,
    /// Positions of the runtime package's magic functions, harvested per
    /// the original analyzer's `analyzePackage_CollectSomeRuntimeFunctionPositions`
    /// (see DESIGN.md). Empty if no runtime package was configured or found.
    pub runtime_func_positions: FxHashMap<String, Position>,
}

impl AnalysisResult {
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    #[must_use]
    pub fn package(&self, idx: PackageIndex) -> &Package {
        &self.packages[idx.index()]
    }

    #[must_use]
    pub fn lookup_type_name(&self, pkg_path: &str, name: &str) -> Option<TypeNameIndex> {
        self.registry.lookup_type_name(pkg_path, name)
    }

    #[must_use]
    pub fn lookup_type(&self, tt: TypeObjectId) -> Option<TypeIndex> {
        self.registry.lookup_existing(tt)
    }

    #[must_use]
    pub fn type_name(&self, idx: TypeNameIndex) -> &TypeName {
        self.registry.type_name(idx)
    }

    #[must_use]
    pub fn type_info(&self, idx: TypeIndex) -> &TypeInfo {
        self.registry.get(idx)
    }

    #[must_use]
    pub fn tables(&self) -> &DeclTables {
        &self.tables
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.registry.is_frozen()
    }
}
