//! The implementation-matching engine (§4.5): a three-pass algorithm over
//! every interface underlying and every candidate type, using a
//! monotonically advancing per-type `counter` to realize k-way set
//! intersection without allocating intermediate sets. Single-threaded by
//! design (§5) — the counter scheme would corrupt under concurrent callers.

use rustc_hash::{FxHashMap, FxHashSet};

use goindex_input::TypeObjectKind;

use crate::errors::AnalysisOutcome;
use crate::ids::{MethodId, TypeIndex};
use crate::registry::{Implementation, TypeRegistry};
use crate::signature::MethodSignature;

/// A distinct unnamed-interface `TypeInfo` (the underlying of one or more
/// named interface types, or used directly) together with the method ids
/// of its `all_methods` and every type sharing it as underlying — the
/// "named variants" that finalization attaches `Implementation`s to.
struct InterfaceGroup {
    underlying: TypeIndex,
    method_ids: Vec<MethodId>,
    named_variants: Vec<TypeIndex>,
}

/// Runs all three passes plus finalization and pointer-method merging over
/// every registered type. Must run after selector promotion (§4.4) has set
/// `all_methods` for every type.
pub fn find_implementations(registry: &mut TypeRegistry) -> AnalysisOutcome<()> {
    let indices = registry.indices();

    // Pass 1: group every type by its underlying interface (if any with
    // >=1 method) and assign a dense method id to each distinct signature
    // among those interfaces' methods.
    let mut groups: Vec<InterfaceGroup> = Vec::new();
    let mut group_of_underlying: FxHashMap<TypeIndex, usize> = FxHashMap::default();
    let mut method_id_of: FxHashMap<MethodSignature, MethodId> = FxHashMap::default();
    let mut method2types: Vec<Vec<TypeIndex>> = Vec::new();

    for &idx in &indices {
        let underlying = registry.get(idx).underlying;
        let u = registry.get(underlying);
        if u.kind != TypeObjectKind::Interface || u.all_methods.is_empty() {
            continue;
        }
        let gi = *group_of_underlying.entry(underlying).or_insert_with(|| {
            groups.push(InterfaceGroup { underlying, method_ids: Vec::new(), named_variants: Vec::new() });
            groups.len() - 1
        });
        groups[gi].named_variants.push(idx);
    }

    for gi in 0..groups.len() {
        let underlying = groups[gi].underlying;
        let methods = registry.get(underlying).all_methods.clone();
        let mut method_ids = Vec::with_capacity(methods.len());
        for sel in &methods {
            let Some(m) = sel.as_method() else { continue };
            let mid = *method_id_of.entry(m.signature.clone()).or_insert_with(|| {
                method2types.push(Vec::new());
                MethodId::from(method2types.len() - 1)
            });
            method2types[mid.index()].push(underlying);
            method_ids.push(mid);
        }
        groups[gi].method_ids = method_ids;
    }

    // Pass 2: intersect with concrete (non-interface-underlying) methods.
    // Methods with no matching interface signature are dropped — they
    // cannot cause any match.
    //
    // `*T` carries no selectors of its own (invariant 5) — its match
    // capability is `T`'s full, unfiltered `all_methods` (pointer
    // indirection always grants the full method set). `T` itself only
    // matches through methods reachable without requiring a pointer
    // receiver: a selector with `pointer_recv && !indirect` needs an
    // addressable value, so it is excluded from `T`'s own match set (S2).
    for &idx in &indices {
        let underlying = registry.get(idx).underlying;
        if registry.get(underlying).kind == TypeObjectKind::Interface {
            continue;
        }
        let (methods, is_pointer) = effective_methods(registry, idx);
        for sel in &methods {
            let Some(m) = sel.as_method() else { continue };
            if !is_pointer && m.pointer_recv && !sel.indirect {
                continue;
            }
            if let Some(&mid) = method_id_of.get(&m.signature) {
                method2types[mid.index()].push(idx);
            }
        }
    }

    // Pass 3: k-way AND via generation counters, one interface group at a
    // time (§4.5, §9). `search_round` only ever increases across the whole
    // pass, so a type's `counter` unambiguously records the last round it
    // survived.
    let mut search_round: u32 = 0;

    for gi in 0..groups.len() {
        let method_ids = groups[gi].method_ids.clone();
        let Some((&first, rest)) = method_ids.split_first() else { continue };

        for &t in &method2types[first.index()] {
            registry.get_mut(t).counter = search_round + 1;
        }
        search_round += 1;

        for &mid in rest {
            for &t in &method2types[mid.index()] {
                if registry.get(t).counter == search_round {
                    registry.get_mut(t).counter = search_round + 1;
                }
            }
            search_round += 1;
        }

        let last = *method_ids.last().expect("non-empty (checked by split_first)");
        let matched: Vec<TypeIndex> =
            method2types[last.index()].iter().copied().filter(|&t| registry.get(t).counter == search_round).collect();

        finalize_group(registry, &groups[gi], &matched, &group_of_underlying, &groups);
    }

    // Copy implements/implemented_bys from each underlying to every named
    // type sharing that underlying.
    for g in &groups {
        let implements = registry.get(g.underlying).implements.clone();
        let implemented_bys = registry.get(g.underlying).implemented_bys.clone();
        for &t in &g.named_variants {
            if t == g.underlying {
                continue;
            }
            registry.get_mut(t).implements = implements.clone();
            registry.get_mut(t).implemented_bys = implemented_bys.clone();
        }
    }

    merge_pointer_implements(registry, &indices);

    Ok(())
}

/// The method list `idx` brings to matching, and whether `idx` is itself a
/// pointer type: for a pointer `*T`, that's `T`'s `all_methods` unfiltered
/// (`*T` never has its own selectors — invariant 5); for anything else it's
/// the type's own `all_methods`, later filtered by the caller to exclude
/// receiver-only-reachable-through-a-pointer methods. A pointer whose base
/// is itself an interface or a pointer (`*I`, `**T`) never has methods —
/// mirrors the original analyzer's own consistency check that `*I`/`**T`
/// method sets are always empty.
fn effective_methods(registry: &TypeRegistry, idx: TypeIndex) -> (Vec<crate::selector::Selector>, bool) {
    if registry.get(idx).kind != TypeObjectKind::Pointer {
        return (registry.get(idx).all_methods.clone(), false);
    }
    let Some(base) = registry.get(idx).shape.elem() else { return (Vec::new(), true) };
    let base_underlying_kind = registry.get(registry.get(base).underlying).kind;
    if matches!(base_underlying_kind, TypeObjectKind::Interface | TypeObjectKind::Pointer) {
        return (Vec::new(), true);
    }
    (registry.get(base).all_methods.clone(), true)
}

/// Per-group finalization: records `Implementation{impler, interface}` for
/// every matched type against every named variant of this group's
/// underlying, then builds `implemented_bys` with non-pointer matchers
/// first and pointer matchers whose base is not already present (so `T`
/// and `*T` never both appear).
fn finalize_group(
    registry: &mut TypeRegistry,
    group: &InterfaceGroup,
    matched: &[TypeIndex],
    group_of_underlying: &FxHashMap<TypeIndex, usize>,
    groups: &[InterfaceGroup],
) {
    for &t in matched {
        for &it in &group.named_variants {
            registry.get_mut(t).implements.push(Implementation { impler: t, interface: it });
        }
    }

    let mut seen_bases: FxHashSet<TypeIndex> = FxHashSet::default();
    let mut implemented_bys: Vec<TypeIndex> = Vec::with_capacity(matched.len());

    for &t in matched {
        if registry.get(t).kind == TypeObjectKind::Pointer {
            continue;
        }
        let underlying = registry.get(t).underlying;
        if registry.get(underlying).kind == TypeObjectKind::Interface {
            // `t` is itself an interface implementing this one: attribute
            // every named variant of *its* underlying group instead of `t`
            // alone, mirroring how `named_variants` was built for `group`.
            if let Some(&other_gi) = group_of_underlying.get(&underlying) {
                for &it in &groups[other_gi].named_variants {
                    if seen_bases.insert(it) {
                        implemented_bys.push(it);
                    }
                }
                continue;
            }
        }
        if seen_bases.insert(t) {
            implemented_bys.push(t);
        }
    }

    for &t in matched {
        if registry.get(t).kind != TypeObjectKind::Pointer {
            continue;
        }
        let Some(base) = registry.get(t).shape.elem() else { continue };
        if !seen_bases.contains(&base) {
            implemented_bys.push(t);
        }
    }

    registry.get_mut(group.underlying).implemented_bys = implemented_bys;
}

/// After per-underlying iteration: for every `T` where `*T` has non-empty
/// `implements`, merge those into `T.implements` (only interfaces `T`
/// doesn't already implement without pointer indirection), then clear
/// `(*T).implements`.
fn merge_pointer_implements(registry: &mut TypeRegistry, indices: &[TypeIndex]) {
    for &idx in indices {
        if registry.get(idx).kind != TypeObjectKind::Pointer {
            continue;
        }
        let ptr_implements = registry.get(idx).implements.clone();
        if ptr_implements.is_empty() {
            continue;
        }
        let Some(base) = registry.get(idx).shape.elem() else { continue };

        let existing: FxHashSet<TypeIndex> = registry.get(base).implements.iter().map(|i| i.interface).collect();
        for imp in ptr_implements {
            if !existing.contains(&imp.interface) {
                registry.get_mut(base).implements.push(Implementation { impler: base, interface: imp.interface });
            }
        }
        registry.get_mut(idx).implements.clear();
    }
}
