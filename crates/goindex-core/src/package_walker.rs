//! The package walker (§4.1): computes dependency levels by memoized DFS
//! and orders packages by `(dep_level, import_path)` for determinism.

use rustc_hash::FxHashMap;

use goindex_common::limits::MAX_PACKAGE_WALK_VISITS;
use goindex_input::CheckedProgram;

use crate::errors::{AnalysisError, AnalysisOutcome};
use crate::ids::PackageIndex;
use crate::packages::Package;

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

fn dep_level(
    i: usize,
    program: &CheckedProgram,
    path_to_idx: &FxHashMap<String, usize>,
    levels: &mut [u32],
    state: &mut [VisitState],
    visits: &mut usize,
) -> AnalysisOutcome<u32> {
    match state[i] {
        VisitState::Done => return Ok(levels[i]),
        VisitState::InProgress => {
            return Err(AnalysisError::CyclicPackageDependency { package: program.packages[i].import_path.clone() });
        }
        VisitState::Unvisited => state[i] = VisitState::InProgress,
    }

    *visits += 1;
    if *visits > MAX_PACKAGE_WALK_VISITS {
        return Err(AnalysisError::CyclicPackageDependency { package: program.packages[i].import_path.clone() });
    }

    let mut max_dep = 0u32;
    for dep_path in &program.packages[i].deps {
        let Some(&di) = path_to_idx.get(dep_path) else {
            // Input contract guarantees dependency edges resolve; a
            // missing one is the "missing-but-tolerable" half of §7, not a
            // cycle — skip it rather than abort.
            continue;
        };
        let dl = dep_level(di, program, path_to_idx, levels, state, visits)?;
        max_dep = max_dep.max(dl);
    }

    let level = 1 + if program.packages[i].deps.is_empty() { 0 } else { max_dep };
    levels[i] = level;
    state[i] = VisitState::Done;
    Ok(level)
}

/// Sorts and indexes `program.packages` per §4.1, returning the ordered
/// `Package` records (dependency edges already resolved to `PackageIndex`,
/// back-edges populated).
pub fn sort_by_dependencies(program: &CheckedProgram) -> AnalysisOutcome<Vec<Package>> {
    let n = program.packages.len();
    let path_to_idx: FxHashMap<String, usize> =
        program.packages.iter().enumerate().map(|(i, p)| (p.import_path.clone(), i)).collect();

    let mut levels = vec![0u32; n];
    let mut state = vec![VisitState::Unvisited; n];
    let mut visits = 0usize;
    for i in 0..n {
        dep_level(i, program, &path_to_idx, &mut levels, &mut state, &mut visits)?;
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        levels[a].cmp(&levels[b]).then_with(|| program.packages[a].import_path.cmp(&program.packages[b].import_path))
    });

    // old index -> final PackageIndex
    let mut new_index_of = vec![0u32; n];
    for (final_pos, &old_i) in order.iter().enumerate() {
        new_index_of[old_i] = final_pos as u32;
    }

    let mut packages: Vec<Package> = order
        .iter()
        .enumerate()
        .map(|(final_pos, &old_i)| {
            let src = &program.packages[old_i];
            let mut pkg = Package::new(src.import_path.clone(), PackageIndex(final_pos as u32));
            pkg.dep_level = levels[old_i];
            pkg.is_builtin_source = src.is_builtin_source;
            pkg.is_universe = src.is_universe;
            pkg.deps = src
                .deps
                .iter()
                .filter_map(|d| path_to_idx.get(d))
                .map(|&old_d| PackageIndex(new_index_of[old_d]))
                .collect();
            pkg
        })
        .collect();

    for final_pos in 0..n {
        let deps = packages[final_pos].deps.clone();
        for dep in deps {
            packages[dep.index()].dependents.push(PackageIndex(final_pos as u32));
        }
    }

    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goindex_input::CheckedPackage;

    fn program_with(pkgs: Vec<(&str, Vec<&str>)>) -> CheckedProgram {
        let mut program = CheckedProgram::default();
        for (path, deps) in pkgs {
            let mut pkg = CheckedPackage::new(path);
            pkg.deps = deps.into_iter().map(str::to_string).collect();
            program.packages.push(pkg);
        }
        program
    }

    #[test]
    fn leaf_packages_get_dep_level_one() {
        let program = program_with(vec![("a", vec![])]);
        let packages = sort_by_dependencies(&program).expect("no cycle");
        assert_eq!(packages[0].dep_level, 1);
    }

    #[test]
    fn dep_level_is_one_plus_max_of_deps() {
        // c -> b -> a ; dep_level(a) = 1, dep_level(b) = 2, dep_level(c) = 3
        let program = program_with(vec![("a", vec![]), ("b", vec!["a"]), ("c", vec!["b"])]);
        let packages = sort_by_dependencies(&program).expect("no cycle");
        let level_of = |path: &str| packages.iter().find(|p| p.import_path == path).unwrap().dep_level;
        assert_eq!(level_of("a"), 1);
        assert_eq!(level_of("b"), 2);
        assert_eq!(level_of("c"), 3);
    }

    #[test]
    fn ordering_ties_broken_by_import_path() {
        // Both b and c are leaves (dep_level 1); must sort alphabetically.
        let program = program_with(vec![("c", vec![]), ("b", vec![]), ("a", vec![])]);
        let packages = sort_by_dependencies(&program).expect("no cycle");
        let order: Vec<&str> = packages.iter().map(|p| p.import_path.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn every_dependency_precedes_its_dependents() {
        let program = program_with(vec![("leaf", vec![]), ("mid", vec!["leaf"]), ("top", vec!["mid", "leaf"])]);
        let packages = sort_by_dependencies(&program).expect("no cycle");
        let pos_of = |path: &str| packages.iter().position(|p| p.import_path == path).unwrap();
        assert!(pos_of("leaf") < pos_of("mid"));
        assert!(pos_of("mid") < pos_of("top"));
        assert!(pos_of("leaf") < pos_of("top"));
    }

    #[test]
    fn cyclic_dependency_is_fatal() {
        let program = program_with(vec![("a", vec!["b"]), ("b", vec!["a"])]);
        let err = sort_by_dependencies(&program).expect_err("cycle must be rejected");
        assert!(matches!(err, AnalysisError::CyclicPackageDependency { .. }));
    }

    #[test]
    fn missing_dependency_edge_is_tolerated_not_fatal() {
        // "a" depends on "ghost", which isn't in the program at all.
        let program = program_with(vec![("a", vec!["ghost"])]);
        let packages = sort_by_dependencies(&program).expect("missing dep edge is tolerable, not fatal");
        assert_eq!(packages[0].dep_level, 1);
        assert!(packages[0].deps.is_empty());
    }

    #[test]
    fn back_edges_mirror_forward_edges() {
        let program = program_with(vec![("a", vec![]), ("b", vec!["a"])]);
        let packages = sort_by_dependencies(&program).expect("no cycle");
        let a_pos = packages.iter().position(|p| p.import_path == "a").unwrap();
        let b_pos = packages.iter().position(|p| p.import_path == "b").unwrap();
        assert_eq!(packages[a_pos].dependents, vec![PackageIndex(b_pos as u32)]);
    }
}
