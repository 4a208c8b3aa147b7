//! The cross-reference indexer (§4.6): links exported declarations back to
//! the named types they involve, so a type name can enumerate "values of
//! this type", "functions taking this type", "functions returning this
//! type". Methods whose receiver is an unexported type name are local-only
//! API and do not propagate their parameter/result references.

use smallvec::SmallVec;

use goindex_input::TypeObjectKind;

use crate::declarations::DeclTables;
use crate::ids::{FuncIndex, TypeIndex, ValueIndex};
use crate::registry::{DeclRef, TypeRegistry};

/// Walks every declaration in `tables` and attaches back-references onto
/// the named types it reaches. Must run after the registry's `underlying`/
/// `shape` links are in place (i.e. any time after declaration collection);
/// in practice this is the last pipeline phase, run once promotion and
/// implementation matching have settled every type's final shape.
pub fn index_cross_references(registry: &mut TypeRegistry, tables: &DeclTables) {
    for (i, f) in tables.funcs.iter().enumerate() {
        if !f.exported {
            continue;
        }
        if let Some((receiver_type, _pointer)) = f.receiver {
            if receiver_is_unexported(registry, receiver_type) {
                continue;
            }
        }

        let func_idx = FuncIndex::from(i);
        for &p in &f.params {
            for named in reachable_named_types(registry, p) {
                registry.get_mut(named).as_inputs_of.push(DeclRef::Func(func_idx));
            }
        }
        for &r in &f.results {
            for named in reachable_named_types(registry, r) {
                registry.get_mut(named).as_outputs_of.push(DeclRef::Func(func_idx));
            }
        }
    }

    for (i, v) in tables.values.iter().enumerate() {
        if !v.exported {
            continue;
        }
        let value_idx = ValueIndex::from(i);
        for named in reachable_named_types(registry, v.type_index) {
            registry.get_mut(named).as_types_of.push(DeclRef::Value(value_idx));
        }
    }
}

fn receiver_is_unexported(registry: &TypeRegistry, receiver_type: TypeIndex) -> bool {
    registry.get(receiver_type).type_name.map(|tn| !registry.type_name(tn).exported).unwrap_or(false)
}

/// The named types reachable from `idx` without crossing a struct/interface
/// boundary: `idx` itself if it is named, or one step through any number of
/// pointer/slice/array/chan/map containers. A depth guard stands in for "no
/// cycles in well-formed declared signatures" rather than a hard language
/// limit.
fn reachable_named_types(registry: &TypeRegistry, idx: TypeIndex) -> SmallVec<[TypeIndex; 2]> {
    let mut out = SmallVec::new();
    collect_named(registry, idx, &mut out, 0);
    out
}

const MAX_REACHABILITY_DEPTH: u32 = 16;

fn collect_named(registry: &TypeRegistry, idx: TypeIndex, out: &mut SmallVec<[TypeIndex; 2]>, depth: u32) {
    if depth > MAX_REACHABILITY_DEPTH {
        return;
    }
    let info = registry.get(idx);
    if info.type_name.is_some() {
        out.push(idx);
        return;
    }
    match info.kind {
        TypeObjectKind::Pointer | TypeObjectKind::Slice | TypeObjectKind::Array | TypeObjectKind::Chan => {
            if let Some(elem) = info.shape.elem() {
                collect_named(registry, elem, out, depth + 1);
            }
        }
        TypeObjectKind::Map => {
            if let Some(key) = info.shape.map_key() {
                collect_named(registry, key, out, depth + 1);
            }
            if let Some(elem) = info.shape.elem() {
                collect_named(registry, elem, out, depth + 1);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goindex_input::{CheckedProgram, QualifiedName, TypeObject};

    fn register(program: &mut CheckedProgram, obj: TypeObject) -> goindex_input::TypeObjectId {
        let id = goindex_input::TypeObjectId(program.type_objects.len() as u32);
        program.type_objects.push(obj);
        id
    }

    #[test]
    fn named_type_is_reachable_through_pointer_slice_and_map() {
        let mut program = CheckedProgram::default();
        let underlying = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let named = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "T"), underlying));
        let ptr = register(&mut program, TypeObject::pointer(named));
        let slice = register(&mut program, TypeObject::slice(ptr));

        let mut registry = TypeRegistry::new();
        let named_idx = registry.register_type(&program, named).expect("registers");
        registry.register_type_name("pkg", "T", true, named_idx, false, goindex_common::Position::synthetic("pkg"));
        let slice_idx = registry.register_type(&program, slice).expect("registers");

        let reached = reachable_named_types(&registry, slice_idx);
        assert_eq!(reached.as_slice(), &[named_idx]);
    }

    #[test]
    fn unnamed_struct_is_not_itself_reachable() {
        let mut program = CheckedProgram::default();
        let anon_struct = register(&mut program, TypeObject::unnamed_struct(vec![]));

        let mut registry = TypeRegistry::new();
        let idx = registry.register_type(&program, anon_struct).expect("registers");

        assert!(reachable_named_types(&registry, idx).is_empty());
    }
}
