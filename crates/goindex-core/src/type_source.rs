//! The type-source resolver (§4.3): classifies a named type declaration's
//! right-hand side by shape, so documentation-style views can render
//! `type A = p.X`, `type A *B`, `type A struct{...}` faithfully.

use goindex_input::TypeObjectKind;

use crate::ids::{TypeIndex, TypeNameIndex};
use crate::registry::{TypeRegistry, TypeSource};

/// Classifies every registered `TypeName`'s denoted type and records the
/// result on its `TypeInfo::source`. Idempotent — re-running overwrites
/// with the same result since it only reads already-registered data.
pub fn resolve_type_sources(registry: &mut TypeRegistry) {
    let names: Vec<TypeNameIndex> = registry.type_names().map(|(idx, _)| idx).collect();
    for tn_idx in names {
        let tn = registry.type_name(tn_idx);
        let denoted = tn.denoted();
        // An alias's `denoted` already *is* the RHS (`type A = B` denotes B
        // itself). A named declaration's `denoted` is the declared type's
        // own identity instead — its RHS lives one level down, on its
        // `underlying` (`type T struct{...}`'s RHS is the struct literal,
        // not `T` itself).
        let rhs = if tn.is_alias() { denoted } else { registry.get(denoted).underlying };
        let source = classify(registry, rhs);
        registry.get_mut(denoted).source = source;
    }
}

fn classify(registry: &TypeRegistry, rhs: TypeIndex) -> TypeSource {
    classify_rec(registry, rhs, false)
}

/// Walks through any number of leading `*` before settling on the RHS's
/// shape, per §4.3's table: `*T` recurses on `T` with `star` latched true;
/// anything else resolves immediately to either a `type_name` (an
/// identifier or qualified identifier naming another type) or an
/// `unnamed_type` (a struct/interface/slice/map/... literal).
fn classify_rec(registry: &TypeRegistry, rhs: TypeIndex, star_seen: bool) -> TypeSource {
    let info = registry.get(rhs);
    match info.kind {
        TypeObjectKind::Named | TypeObjectKind::Basic => {
            TypeSource { type_name: info.type_name, unnamed_type: None, star: star_seen }
        }
        TypeObjectKind::Pointer => match info.shape.elem() {
            Some(elem) => classify_rec(registry, elem, true),
            // A pointer literal with no resolvable element (shouldn't occur
            // for a well-formed input contract) still reports the star.
            None => TypeSource { type_name: None, unnamed_type: None, star: true },
        },
        _ => TypeSource { type_name: None, unnamed_type: Some(rhs), star: star_seen },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goindex_common::Position;
    use goindex_input::{CheckedProgram, QualifiedName, TypeObject, TypeObjectId};

    fn register(program: &mut CheckedProgram, obj: TypeObject) -> TypeObjectId {
        let id = TypeObjectId(program.type_objects.len() as u32);
        program.type_objects.push(obj);
        id
    }

    /// `type T struct{...}` must classify as `unnamed_type = <the struct>`,
    /// not `type_name = T` (T's own name).
    #[test]
    fn named_struct_declaration_classifies_its_underlying() {
        let mut program = CheckedProgram::default();
        let struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let named_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "T"), struct_tt));

        let mut registry = TypeRegistry::new();
        let named_idx = registry.register_type(&program, named_tt).expect("registers");
        registry.register_type_name("pkg", "T", true, named_idx, false, Position::default());

        resolve_type_sources(&mut registry);

        let source = &registry.get(named_idx).source;
        assert_eq!(source.type_name, None);
        assert_eq!(source.unnamed_type, Some(registry.get(named_idx).underlying));
        assert!(!source.star);
    }

    /// `type A B` (a named declaration whose RHS is another named type) must
    /// recover `B`'s own name as `Source.TypeName`, not `A`'s.
    #[test]
    fn named_alias_like_declaration_recovers_the_referenced_name() {
        let mut program = CheckedProgram::default();
        let b_struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let b_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "B"), b_struct_tt));
        let a_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "A"), b_tt));

        let mut registry = TypeRegistry::new();
        let b_idx = registry.register_type(&program, b_tt).expect("registers");
        registry.register_type_name("pkg", "B", true, b_idx, false, Position::default());
        let a_idx = registry.register_type(&program, a_tt).expect("registers");
        registry.register_type_name("pkg", "A", true, a_idx, false, Position::default());

        resolve_type_sources(&mut registry);

        let source = &registry.get(a_idx).source;
        assert_eq!(source.type_name, registry.get(b_idx).type_name);
        assert_eq!(source.unnamed_type, None);
    }

    /// `type A = B` (an alias) denotes B directly — `denoted` already is the
    /// RHS, so this must classify exactly as it did before this module's fix.
    #[test]
    fn alias_declaration_classifies_the_aliased_type_itself() {
        let mut program = CheckedProgram::default();
        let b_struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let b_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "B"), b_struct_tt));

        let mut registry = TypeRegistry::new();
        let b_idx = registry.register_type(&program, b_tt).expect("registers");
        registry.register_type_name("pkg", "B", true, b_idx, false, Position::default());
        registry.register_type_name("pkg", "A", true, b_idx, true, Position::default());

        resolve_type_sources(&mut registry);

        let source = &registry.get(b_idx).source;
        assert_eq!(source.type_name, registry.get(b_idx).type_name);
        assert_eq!(source.unnamed_type, None);
    }

    /// `type A *B` classifies with `star = true`, recursing past the
    /// synthesized pointer straight to B's own name.
    #[test]
    fn pointer_declaration_latches_star_and_recurses_to_the_pointee() {
        let mut program = CheckedProgram::default();
        let b_struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let b_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "B"), b_struct_tt));
        let ptr_tt = register(&mut program, TypeObject::pointer(b_tt));
        let a_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "A"), ptr_tt));

        let mut registry = TypeRegistry::new();
        let b_idx = registry.register_type(&program, b_tt).expect("registers");
        registry.register_type_name("pkg", "B", true, b_idx, false, Position::default());
        let a_idx = registry.register_type(&program, a_tt).expect("registers");
        registry.register_type_name("pkg", "A", true, a_idx, false, Position::default());

        resolve_type_sources(&mut registry);

        let source = &registry.get(a_idx).source;
        assert!(source.star);
        assert_eq!(source.type_name, registry.get(b_idx).type_name);
    }
}
