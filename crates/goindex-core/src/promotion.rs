//! Selector promotion (§4.4): computes `all_fields`/`all_methods` for every
//! registered type, in two passes — interfaces first (§4.4a), then
//! everything else (§4.4b) — so that an embedded interface's `all_methods`
//! is always ready by the time a struct embedding it is expanded.
//!
//! A same-id collision is tagged `Hidden` as soon as it's detected, but the
//! emit step (`keep_visible_or_ambiguous`) is what decides whether a
//! `Hidden` entry actually survives into `all_fields`/`all_methods`: once a
//! shallower `Normal` selector exists for that id, every deeper `Hidden`
//! sibling is dropped (shadowing, §4.4b/S4) — a `Hidden` entry is only kept
//! when no `Normal` representative of its id exists anywhere in the list,
//! which is the ambiguous-at-the-same-depth case (S3).

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use goindex_common::limits::MAX_PROMOTION_DEPTH;
use goindex_input::TypeObjectKind;

use crate::errors::{AnalysisError, AnalysisOutcome};
use crate::ids::TypeIndex;
use crate::registry::{TypeAttributes, TypeRegistry};
use crate::selector::{Cond, EmbedStep, FieldMode, Selector};

/// Runs both promotion passes over every registered type. `strict_overlap`
/// is the §9 Open Question's resolution threaded down from
/// [`crate::config::AnalyzerConfig::strict_interface_overlap`]: when `true`,
/// any same-name overlap between embedded interfaces is fatal even when the
/// signatures agree; the default (`false`) tolerates identical-signature
/// overlap per spec.md's stated policy.
pub fn promote_selectors(registry: &mut TypeRegistry, strict_overlap: bool) -> AnalysisOutcome<()> {
    promote_interfaces(registry, strict_overlap)?;
    promote_non_interfaces(registry)?;
    Ok(())
}

// ---------------------------------------------------------------------
// §4.4a — interface promotion
// ---------------------------------------------------------------------

fn promote_interfaces(registry: &mut TypeRegistry, strict_overlap: bool) -> AnalysisOutcome<()> {
    let indices = registry.indices();
    let mut visiting: FxHashSet<TypeIndex> = FxHashSet::default();
    for idx in indices {
        let is_interface_like = matches!(registry.get(idx).kind, TypeObjectKind::Interface)
            || (registry.get(idx).kind == TypeObjectKind::Named
                && registry.get(registry.get(idx).underlying).kind == TypeObjectKind::Interface);
        if is_interface_like {
            ensure_interface_promoted(registry, idx, &mut visiting, strict_overlap)?;
        }
    }
    Ok(())
}

/// Promotes `idx` (a named interface or an unnamed interface literal),
/// recursing into embedded interfaces first. `visiting` breaks cycles
/// introduced by a named interface that (directly or through an unnamed
/// wrapper) embeds itself (§4.4a, S6): a re-entrant call simply returns
/// with whatever partial result the outer call has accumulated so far.
fn ensure_interface_promoted(
    registry: &mut TypeRegistry,
    idx: TypeIndex,
    visiting: &mut FxHashSet<TypeIndex>,
    strict_overlap: bool,
) -> AnalysisOutcome<()> {
    if registry.get(idx).has_attr(TypeAttributes::PROMOTED_SELECTORS_COLLECTED) {
        return Ok(());
    }
    if !visiting.insert(idx) {
        return Ok(());
    }

    match registry.get(idx).kind {
        TypeObjectKind::Named => {
            let underlying = registry.get(idx).underlying;
            if underlying != idx {
                ensure_interface_promoted(registry, underlying, visiting, strict_overlap)?;
                let (direct, methods) = {
                    let u = registry.get(underlying);
                    (u.direct_selectors.clone(), u.all_methods.clone())
                };
                let info = registry.get_mut(idx);
                info.direct_selectors = direct;
                info.all_methods = methods;
            }
            registry.get_mut(idx).attributes.insert(TypeAttributes::PROMOTED_SELECTORS_COLLECTED);
        }
        TypeObjectKind::Interface => {
            merge_unnamed_interface(registry, idx, visiting, strict_overlap)?;
            registry.get_mut(idx).attributes.insert(TypeAttributes::PROMOTED_SELECTORS_COLLECTED);
        }
        _ => {}
    }

    visiting.remove(&idx);
    Ok(())
}

fn merge_unnamed_interface(
    registry: &mut TypeRegistry,
    idx: TypeIndex,
    visiting: &mut FxHashSet<TypeIndex>,
    strict_overlap: bool,
) -> AnalysisOutcome<()> {
    let direct = registry.get(idx).direct_selectors.clone();
    let direct_methods: Vec<Selector> = direct.iter().filter(|s| s.is_method()).cloned().collect();
    let embeds: Vec<TypeIndex> = direct.iter().filter_map(|s| s.as_field().map(|f| f.type_index)).collect();

    if embeds.is_empty() {
        registry.get_mut(idx).all_methods = direct_methods;
        return Ok(());
    }

    let mut by_id: IndexMap<String, Selector> = IndexMap::new();
    for m in direct_methods {
        by_id.insert(m.id.clone(), m);
    }

    for embed in embeds {
        ensure_interface_promoted(registry, embed, visiting, strict_overlap)?;
        let embed_methods = registry.get(embed).all_methods.clone();
        for m in embed_methods {
            match by_id.get(&m.id) {
                None => {
                    by_id.insert(m.id.clone(), m);
                }
                Some(existing) => {
                    let identical = same_method_signature(existing, &m);
                    if !identical || (strict_overlap && identical) {
                        let type_name = registry
                            .get(idx)
                            .type_name
                            .map(|tn| registry.type_name(tn).name.clone())
                            .unwrap_or_else(|| "<unnamed interface>".to_string());
                        return Err(AnalysisError::ConflictingInterfaceMethod { type_name, method: m.name });
                    }
                    // Identical signature, non-strict mode: first occurrence
                    // wins, the later one is tolerated (overlapping
                    // interface methods).
                }
            }
        }
    }

    registry.get_mut(idx).all_methods = by_id.into_values().collect();
    Ok(())
}

fn same_method_signature(a: &Selector, b: &Selector) -> bool {
    match (a.as_method(), b.as_method()) {
        (Some(x), Some(y)) => x.signature == y.signature,
        _ => false,
    }
}

// ---------------------------------------------------------------------
// §4.4b — non-interface promotion
// ---------------------------------------------------------------------

fn promote_non_interfaces(registry: &mut TypeRegistry) -> AnalysisOutcome<()> {
    let indices = registry.indices();

    for idx in &indices {
        if registry.get(*idx).kind == TypeObjectKind::Struct {
            run_struct_bfs(registry, *idx);
        }
    }

    for idx in &indices {
        if registry.get(*idx).kind != TypeObjectKind::Named {
            continue;
        }
        if registry.get(*idx).has_attr(TypeAttributes::PROMOTED_SELECTORS_COLLECTED) {
            continue;
        }
        let underlying = registry.get(*idx).underlying;
        match registry.get(underlying).kind {
            TypeObjectKind::Struct => finish_named_struct(registry, *idx),
            _ => {
                // Interface underlying was already finished by the earlier
                // pass; anything else (Pointer, Basic, Slice, Map, Chan,
                // Signature) has no fields and promotes nothing beyond its
                // own direct methods (§4.4b case 3).
                let methods = registry.get(*idx).direct_selectors.clone();
                let info = registry.get_mut(*idx);
                info.all_methods = methods;
                info.attributes.insert(TypeAttributes::PROMOTED_SELECTORS_COLLECTED);
            }
        }
    }

    Ok(())
}

/// Runs the breadth-first layered promotion described in §4.4b/§9 rooted at
/// a single struct-kind `TypeInfo`, seeded by its own direct selectors
/// (fields only — struct literals never carry direct methods).
fn run_struct_bfs(registry: &mut TypeRegistry, root: TypeIndex) {
    if registry.get(root).has_attr(TypeAttributes::PROMOTED_SELECTORS_COLLECTED) {
        return;
    }

    let mut list: Vec<Selector> = registry.get(root).direct_selectors.clone();
    let mut by_id: FxHashMap<String, usize> = FxHashMap::default();
    for (i, s) in list.iter().enumerate() {
        by_id.insert(s.id.clone(), i);
    }

    let mut checked_types: FxHashMap<TypeIndex, u32> = FxHashMap::default();
    checked_types.insert(root, 0);

    let mut frontier: Vec<usize> =
        list.iter().enumerate().filter(|(_, s)| is_embedded_field(s)).map(|(i, _)| i).collect();

    let mut depth = 0u32;
    while !frontier.is_empty() {
        depth += 1;
        if depth as usize > MAX_PROMOTION_DEPTH {
            warn!(type_index = root.index(), depth, "embedding depth exceeds circuit breaker, truncating promotion");
            break;
        }
        let mut next_frontier = Vec::new();

        for &fi in &frontier {
            let embed_selector = list[fi].clone();
            let Some(field) = embed_selector.as_field() else { continue };
            let embed_type = field.type_index;
            let step = EmbedStep { field_name: embed_selector.name.clone(), owner: embed_type };

            for (key, selectors, via_pointer) in reachable_groups(registry, embed_type) {
                if let Some(&prev_depth) = checked_types.get(&key) {
                    if prev_depth < depth {
                        continue;
                    }
                }
                checked_types.insert(key, depth);

                for s in &selectors {
                    let mut new_sel = s.promote_through(step.clone(), depth, via_pointer);
                    let mut already_known = false;
                    if let Some(&old_i) = by_id.get(&new_sel.id) {
                        already_known = true;
                        if list[old_i].depth == depth {
                            list[old_i].cond = Cond::Hidden;
                            new_sel.cond = Cond::Hidden;
                        } else if list[old_i].depth < depth {
                            new_sel.cond = Cond::Hidden;
                        }
                    }

                    let embeds_further = is_embedded_field(&new_sel);
                    let pos = list.len();
                    if !already_known {
                        by_id.insert(new_sel.id.clone(), pos);
                    }
                    list.push(new_sel);
                    if embeds_further {
                        next_frontier.push(pos);
                    }
                }
            }
        }

        frontier = next_frontier;
    }

    let all_fields = keep_visible_or_ambiguous(list.iter().filter(|s| s.is_field()).cloned());
    let all_methods = keep_visible_or_ambiguous(list.iter().filter(|s| s.is_method()).cloned());

    let info = registry.get_mut(root);
    info.all_fields = all_fields;
    info.all_methods = all_methods;
    info.attributes.insert(TypeAttributes::PROMOTED_SELECTORS_COLLECTED);
}

fn is_embedded_field(s: &Selector) -> bool {
    s.as_field().is_some_and(|f| f.mode != FieldMode::None)
}

/// Drops a `Hidden` selector once a `Normal` selector with the same id is
/// present in the same batch (shadowing, S4); a `Hidden` selector survives
/// only when no `Normal` representative of its id exists at all
/// (ambiguity, S3).
fn keep_visible_or_ambiguous(selectors: impl Iterator<Item = Selector>) -> Vec<Selector> {
    let selectors: Vec<Selector> = selectors.collect();
    let has_normal: FxHashSet<String> =
        selectors.iter().filter(|s| s.cond == Cond::Normal).map(|s| s.id.clone()).collect();
    selectors.into_iter().filter(|s| s.cond == Cond::Normal || !has_normal.contains(&s.id)).collect()
}

/// Named-type finish (§4.4b): combines a named struct's own direct methods
/// with its underlying's promoted methods/fields, letting a direct method
/// shadow a same-id promoted entry (but never the reverse — only one
/// `Normal` collision is possible here since the underlying's own BFS
/// already resolved field/method-vs-field/method collisions among
/// themselves).
fn finish_named_struct(registry: &mut TypeRegistry, named_idx: TypeIndex) {
    let underlying = registry.get(named_idx).underlying;
    run_struct_bfs(registry, underlying);

    let direct_methods = registry.get(named_idx).direct_selectors.clone();
    let mut seen: FxHashSet<String> = direct_methods.iter().map(|s| s.id.clone()).collect();
    let mut all_methods = direct_methods;

    for m in registry.get(underlying).all_methods.clone() {
        // A direct method at this level always shadows a same-id promoted
        // entry, Hidden or not. Otherwise pass the entry through as-is —
        // only a `Normal` promoted entry marks the id seen, so multiple
        // `Hidden` siblings sharing an id (ambiguity, already resolved by
        // the underlying's own emit step) all survive the merge.
        if seen.contains(&m.id) {
            continue;
        }
        if m.cond == Cond::Normal {
            seen.insert(m.id.clone());
        }
        all_methods.push(m);
    }

    let mut all_fields = Vec::new();
    for f in registry.get(underlying).all_fields.clone() {
        if seen.contains(&f.id) {
            continue;
        }
        if f.cond == Cond::Normal {
            seen.insert(f.id.clone());
        }
        all_fields.push(f);
    }

    let info = registry.get_mut(named_idx);
    info.all_methods = all_methods;
    info.all_fields = all_fields;
    info.attributes.insert(TypeAttributes::PROMOTED_SELECTORS_COLLECTED);
}

/// The per-kind "what's reachable one level deeper through this embedded
/// field" table from §4.4b, split into independent `(key, selectors,
/// via_pointer)` groups so each keeps its own `checked_types` short-circuit
/// key — mirroring that a named-struct embed contributes methods (keyed on
/// the named type) and fields (keyed on its underlying struct) as two
/// separately-tracked expansions.
fn reachable_groups(registry: &mut TypeRegistry, embed_type: TypeIndex) -> Vec<(TypeIndex, Vec<Selector>, bool)> {
    match registry.get(embed_type).kind {
        TypeObjectKind::Named => {
            let underlying = registry.get(embed_type).underlying;
            match registry.get(underlying).kind {
                TypeObjectKind::Struct => vec![
                    (embed_type, registry.get(embed_type).direct_selectors.clone(), false),
                    (underlying, registry.get(underlying).direct_selectors.clone(), false),
                ],
                TypeObjectKind::Interface => {
                    // Every interface-like type was already fully promoted
                    // by `promote_interfaces`, which runs to completion over
                    // *all* types before `promote_non_interfaces` starts —
                    // this is just a defensive re-assert of that ordering,
                    // not a live promotion path (hence tolerating any
                    // signature-conflict error here rather than propagating
                    // it: it would mean an invariant was already violated
                    // earlier, not a fresh one introduced now).
                    let mut visiting = FxHashSet::default();
                    let _ = ensure_interface_promoted(registry, embed_type, &mut visiting, false);
                    vec![(embed_type, registry.get(embed_type).all_methods.clone(), false)]
                }
                // Named pointer types cannot be embedded further.
                TypeObjectKind::Pointer => Vec::new(),
                _ => vec![(embed_type, registry.get(embed_type).direct_selectors.clone(), false)],
            }
        }
        TypeObjectKind::Struct => vec![(embed_type, registry.get(embed_type).direct_selectors.clone(), false)],
        TypeObjectKind::Interface => vec![(embed_type, registry.get(embed_type).all_methods.clone(), false)],
        TypeObjectKind::Pointer => {
            let Some(base) = registry.get(embed_type).shape.elem() else { return Vec::new() };
            match registry.get(base).kind {
                TypeObjectKind::Struct => vec![(base, registry.get(base).direct_selectors.clone(), true)],
                TypeObjectKind::Named => {
                    let base_underlying = registry.get(base).underlying;
                    match registry.get(base_underlying).kind {
                        TypeObjectKind::Struct => vec![
                            (base, registry.get(base).direct_selectors.clone(), true),
                            (base_underlying, registry.get(base_underlying).direct_selectors.clone(), true),
                        ],
                        // Embedding *I or a pointer-to-pointer base is not
                        // embeddable; nothing promotes through it.
                        TypeObjectKind::Interface | TypeObjectKind::Pointer => Vec::new(),
                        _ => vec![(base, registry.get(base).direct_selectors.clone(), true)],
                    }
                }
                _ => Vec::new(),
            }
        }
        _ => Vec::new(),
    }
}
