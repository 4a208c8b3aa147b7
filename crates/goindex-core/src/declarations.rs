//! The declaration collector (§4.2): walks each package's top-level
//! declarations once, in dependency order, registering types, functions,
//! values and imports. Also implements the §4.2 builtin/universe aliasing
//! special case and attaches concrete methods to their receiver's
//! `TypeInfo` (§4.3c).

use goindex_common::{Diagnostic, Position};
use goindex_input::{CheckedProgram, TopLevelDecl, ValueKind as InputValueKind};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::errors::{AnalysisError, AnalysisOutcome};
use crate::ids::{FuncIndex, PackageIndex, TypeIndex, ValueIndex};
use crate::packages::{ImportRecord, Package};
use crate::registry::{Denotation, TypeRegistry};
use crate::selector::Selector;
use crate::signature::MethodSignature;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Var,
    Const,
}

#[derive(Clone, Debug)]
pub struct FuncInfo {
    pub name: String,
    pub pkg_path: String,
    pub exported: bool,
    pub pos: Position,
    /// The receiver's resolved `TypeInfo` and whether it was `*T`. `None`
    /// for free functions.
    pub receiver: Option<(TypeIndex, bool)>,
    pub params: Vec<TypeIndex>,
    pub results: Vec<TypeIndex>,
    pub variadic: bool,
}

impl FuncInfo {
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct ValueInfo {
    pub name: String,
    pub pkg_path: String,
    pub exported: bool,
    pub pos: Position,
    pub kind: ValueKind,
    pub type_index: TypeIndex,
}

#[derive(Default)]
pub struct DeclTables {
    pub funcs: Vec<FuncInfo>,
    pub values: Vec<ValueInfo>,
}

impl DeclTables {
    #[must_use]
    pub fn func(&self, idx: FuncIndex) -> &FuncInfo {
        &self.funcs[idx.index()]
    }

    #[must_use]
    pub fn value(&self, idx: ValueIndex) -> &ValueInfo {
        &self.values[idx.index()]
    }
}

/// Walks `packages` (already sorted by §4.1) in order, collecting
/// declarations into `registry` and `DeclTables`.
pub fn collect_declarations(
    registry: &mut TypeRegistry,
    packages: &mut [Package],
    program: &CheckedProgram,
) -> AnalysisOutcome<DeclTables> {
    let src_by_path: FxHashMap<&str, &goindex_input::CheckedPackage> =
        program.packages.iter().map(|p| (p.import_path.as_str(), p)).collect();

    let mut tables = DeclTables::default();

    // Stable index-order snapshot matching `packages`'s final topological
    // order, since we need to know each package's pkg_path while mutating
    // `packages[i]` in place.
    let order: Vec<String> = packages.iter().map(|p| p.import_path.clone()).collect();

    for (pkg_i, import_path) in order.iter().enumerate() {
        let Some(src) = src_by_path.get(import_path.as_str()) else { continue };
        for decl in &src.decls {
            match decl {
                TopLevelDecl::Type(t) => {
                    if t.name == "_" {
                        continue;
                    }
                    let rhs_idx = registry.register_type(program, t.rhs)?;
                    let tn_idx = registry.register_type_name(import_path, &t.name, t.exported, rhs_idx, t.alias, t.pos.clone());
                    packages[pkg_i].type_names.push(tn_idx);
                }
                TopLevelDecl::Func(f) => {
                    if f.name == "_" {
                        continue;
                    }
                    let mut param_idxs = Vec::with_capacity(f.params.len());
                    for p in &f.params {
                        param_idxs.push(registry.register_type(program, *p)?);
                    }
                    let mut result_idxs = Vec::with_capacity(f.results.len());
                    for r in &f.results {
                        result_idxs.push(registry.register_type(program, *r)?);
                    }

                    let receiver = match &f.receiver {
                        Some(recv) => {
                            let Some(tn_idx) = registry.lookup_type_name(import_path, &recv.type_name) else {
                                return Err(AnalysisError::UnresolvedReceiver {
                                    func_name: f.name.clone(),
                                    receiver_type: recv.type_name.clone(),
                                    pos: f.pos.clone(),
                                });
                            };
                            if registry.type_name(tn_idx).is_alias() {
                                return Err(AnalysisError::UnresolvedReceiver {
                                    func_name: f.name.clone(),
                                    receiver_type: recv.type_name.clone(),
                                    pos: f.pos.clone(),
                                });
                            }
                            let recv_type = registry.type_name(tn_idx).denoted();
                            let signature =
                                MethodSignature::new(&f.name, import_path, param_idxs.clone(), result_idxs.clone(), f.variadic);
                            // Methods on `*T` are stored on `T` with
                            // `pointer_recv = true` (invariant 5).
                            registry
                                .get_mut(recv_type)
                                .direct_selectors
                                .push(Selector::direct_method(&f.name, import_path, signature, recv.pointer));
                            // A `*T` receiver clause is itself proof that
                            // `*T` exists as a type in the checker's
                            // universe, independent of whether any
                            // parameter, result, or value declaration ever
                            // names it explicitly — so it must be
                            // registered here rather than left to whatever
                            // phase happens to reference it later (§3
                            // lifecycle, §4.5 S2).
                            if recv.pointer {
                                registry.get_or_create_pointer(recv_type);
                            }
                            Some((recv_type, recv.pointer))
                        }
                        None => None,
                    };

                    tables.funcs.push(FuncInfo {
                        name: f.name.clone(),
                        pkg_path: import_path.clone(),
                        exported: f.exported,
                        pos: f.pos.clone(),
                        receiver,
                        params: param_idxs,
                        results: result_idxs,
                        variadic: f.variadic,
                    });
                    packages[pkg_i].funcs.push(FuncIndex::from(tables.funcs.len() - 1));
                }
                TopLevelDecl::Value(v) => {
                    if v.name == "_" {
                        continue;
                    }
                    let type_index = registry.register_type(program, v.type_obj)?;
                    tables.values.push(ValueInfo {
                        name: v.name.clone(),
                        pkg_path: import_path.clone(),
                        exported: v.exported,
                        pos: v.pos.clone(),
                        kind: match v.kind {
                            InputValueKind::Var => ValueKind::Var,
                            InputValueKind::Const => ValueKind::Const,
                        },
                        type_index,
                    });
                    packages[pkg_i].values.push(ValueIndex::from(tables.values.len() - 1));
                }
                TopLevelDecl::Import(i) => {
                    if i.local_name == "_" {
                        continue;
                    }
                    packages[pkg_i]
                        .imports
                        .push(ImportRecord { local_name: i.local_name.clone(), imported_path: i.imported_path.clone() });
                }
            }
        }
        debug!(package = %import_path, "collected declarations");
    }

    Ok(tables)
}

/// The §4.2 builtin-package special case: the builtin package has both a
/// source-file copy (for documentation) and a checker-internal copy (the
/// universe). Resolves each same-named pair onto one canonical `TypeInfo`,
/// re-pointing both `TypeName`s as aliases of it — otherwise implementation
/// matching over `error` and similar types fails, since the two copies
/// would never be seen as the same type.
pub fn alias_builtin_universe(registry: &mut TypeRegistry, packages: &[Package]) -> Vec<Diagnostic> {
    let Some(source_pkg) = packages.iter().find(|p| p.is_builtin_source) else {
        let msg = "no builtin source package present; skipping universe aliasing";
        warn!("{msg}");
        return vec![Diagnostic::warning(Position::synthetic("builtin"), msg)];
    };
    let Some(universe_pkg) = packages.iter().find(|p| p.is_universe) else {
        let msg = "builtin runtime package missing from program; selection features depending on it will not resolve";
        warn!("{msg}");
        return vec![Diagnostic::warning(Position::synthetic("builtin"), msg)];
    };

    let universe_by_name: FxHashMap<String, crate::ids::TypeNameIndex> = universe_pkg
        .type_names
        .iter()
        .map(|&tn| (registry.type_name(tn).name.clone(), tn))
        .collect();

    for &source_tn in &source_pkg.type_names {
        let name = registry.type_name(source_tn).name.clone();
        let Some(&universe_tn) = universe_by_name.get(&name) else { continue };
        let canonical = registry.type_name(universe_tn).denoted();

        // Detach the universe copy's direct `Named` link (it becomes an
        // alias, not the canonical name, per "register both copies as
        // aliases") and re-point it at the shared canonical type.
        registry.get_mut(canonical).type_name = None;
        registry.type_name_mut(universe_tn).denotation = Denotation::Alias(canonical);
        registry.get_mut(canonical).aliases.push(universe_tn);

        // Re-point the source copy to alias the same canonical type,
        // orphaning whatever separate `TypeInfo` it had registered before
        // (and clearing that orphan's back-reference so it doesn't keep
        // pointing at a `TypeName` that now denotes something else).
        let orphaned = registry.type_name(source_tn).denoted();
        if orphaned != canonical {
            registry.get_mut(orphaned).type_name = None;
        }
        registry.type_name_mut(source_tn).denotation = Denotation::Alias(canonical);
        registry.get_mut(canonical).aliases.push(source_tn);

        registry.get_mut(canonical).attributes.insert(crate::registry::TypeAttributes::BUILTIN);
        debug!(type_name = %name, "aliased builtin source copy onto universe canonical type");
    }

    Vec::new()
}

/// Ported from the original analyzer's
/// `analyzePackage_CollectSomeRuntimeFunctionPositions`: records the source
/// positions of a fixed set of well-known runtime functions (channel ops,
/// select, panic/recover) so later views can deep-link to them, e.g. from a
/// rendered `select` statement to `runtime.selectgo`'s declaration. A
/// missing runtime package or function is the "missing-but-tolerable" half
/// of §7 — the feature degrades by simply not resolving those links, rather
/// than aborting analysis.
const RUNTIME_FUNCTION_NAMES: &[&str] =
    &["selectgo", "selectnbsend", "selectnbrecv", "selectnbrecv2", "chansend", "chanrecv1", "chanrecv2", "gopanic", "gorecover"];

pub fn collect_builtin_function_positions(
    packages: &[Package],
    tables: &DeclTables,
    runtime_package_path: &str,
) -> (FxHashMap<String, Position>, Vec<Diagnostic>) {
    let mut positions = FxHashMap::default();
    let mut diagnostics = Vec::new();

    if runtime_package_path.is_empty() {
        return (positions, diagnostics);
    }

    let Some(pkg) = packages.iter().find(|p| p.import_path == runtime_package_path) else {
        let msg = format!("runtime package {runtime_package_path} not present; select/channel deep-links will not resolve");
        warn!("{msg}");
        diagnostics.push(Diagnostic::warning(Position::synthetic("runtime"), msg));
        return (positions, diagnostics);
    };

    for &name in RUNTIME_FUNCTION_NAMES {
        match pkg.funcs.iter().map(|&fi| tables.func(fi)).find(|f| f.name == name) {
            Some(f) => {
                positions.insert(name.to_string(), f.pos.clone());
            }
            None => {
                let msg = format!("runtime.{name} not found");
                warn!("{msg}");
                diagnostics.push(Diagnostic::warning(Position::synthetic("runtime"), msg));
            }
        }
    }

    (positions, diagnostics)
}
