//! The type registry (§3): one `TypeInfo` per distinct type identity in the
//! program, interned through the checker's type objects.

use bitflags::bitflags;
use goindex_common::Position;
use goindex_input::{CheckedProgram, TypeObjectId, TypeObjectKind};
use rustc_hash::FxHashMap;

use crate::errors::{AnalysisError, AnalysisOutcome};
use crate::ids::{TypeIndex, TypeNameIndex};
use crate::selector::Selector;

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct TypeAttributes: u32 {
        const DIRECT_SELECTORS_COLLECTED   = 1 << 0;
        const PROMOTED_SELECTORS_COLLECTED = 1 << 1;
        const BUILTIN                      = 1 << 2;
        const EMBEDDABLE                   = 1 << 3;
        const PTR_EMBEDDABLE                = 1 << 4;
        const HAS_UNEXPORTEDS               = 1 << 5;
        const DEFINED                        = 1 << 6;
        const COMPARABLE                     = 1 << 7;
        const SENDABLE                       = 1 << 8;
        const RECEIVABLE                     = 1 << 9;
        const VARIADIC                       = 1 << 10;
    }
}

/// One `Implementation{impler, interface}` pair (§3, §4.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Implementation {
    pub impler: TypeIndex,
    pub interface: TypeIndex,
}

/// Back-reference from a named type to an exported declaration involving it
/// (§4.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclRef {
    Func(crate::ids::FuncIndex),
    Value(crate::ids::ValueIndex),
}

/// A resolved struct field, shape-cached onto the struct literal's
/// `TypeInfo` at registration time (§4.3a).
#[derive(Clone, Debug)]
pub struct ShapeField {
    pub name: String,
    pub type_index: TypeIndex,
    pub tag: String,
    pub embedded: bool,
}

/// A resolved interface method, shape-cached onto the interface literal's
/// `TypeInfo` at registration time (§4.3b).
#[derive(Clone, Debug)]
pub struct ShapeMethod {
    pub name: String,
    pub params: Vec<TypeIndex>,
    pub results: Vec<TypeIndex>,
    pub variadic: bool,
}

/// The kind-specific structural payload of a `TypeInfo`, resolved once (and
/// recursively, through nested `register_type` calls) when the type is
/// first registered. Exists so every later phase — source classification,
/// direct-selector collection, promotion — reads arena indices only and
/// never needs to go back to the checker's opaque `TypeObject`.
#[derive(Clone, Debug, Default)]
pub enum TypeShape {
    /// `Named`/`Basic`/`Tuple`: no shape of its own here: a named type's
    /// shape lives on its `underlying`.
    #[default]
    None,
    Struct {
        fields: Vec<ShapeField>,
    },
    Interface {
        methods: Vec<ShapeMethod>,
        embeds: Vec<TypeIndex>,
    },
    Pointer {
        elem: TypeIndex,
    },
    Slice {
        elem: TypeIndex,
    },
    Array {
        elem: TypeIndex,
    },
    Chan {
        elem: TypeIndex,
    },
    Map {
        key: TypeIndex,
        elem: TypeIndex,
    },
    Signature {
        params: Vec<TypeIndex>,
        results: Vec<TypeIndex>,
        variadic: bool,
    },
}

impl TypeShape {
    #[must_use]
    pub fn as_struct(&self) -> Option<&[ShapeField]> {
        match self {
            TypeShape::Struct { fields } => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_interface(&self) -> Option<(&[ShapeMethod], &[TypeIndex])> {
        match self {
            TypeShape::Interface { methods, embeds } => Some((methods, embeds)),
            _ => None,
        }
    }

    /// The element type of any single-element container kind (Pointer,
    /// Slice, Array, Chan) or the value type of a Map.
    #[must_use]
    pub fn elem(&self) -> Option<TypeIndex> {
        match *self {
            TypeShape::Pointer { elem } | TypeShape::Slice { elem } | TypeShape::Array { elem } | TypeShape::Chan { elem } => {
                Some(elem)
            }
            TypeShape::Map { elem, .. } => Some(elem),
            _ => None,
        }
    }

    #[must_use]
    pub fn map_key(&self) -> Option<TypeIndex> {
        match *self {
            TypeShape::Map { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// The type-source classification of a named type's right-hand side
/// (§4.3). Decorative relative to promotion/implementation — it exists so
/// documentation-style renderers can show `type A = p.X` vs `type A struct
/// {...}` — but is a required component of the pipeline.
#[derive(Clone, Debug, Default)]
pub struct TypeSource {
    /// Set when the RHS is, possibly through one or more `*`, an
    /// identifier or qualified identifier naming another type.
    pub type_name: Option<TypeNameIndex>,
    /// Set when the RHS is, possibly through one or more `*`, an unnamed
    /// type literal (struct/interface/slice/map/...).
    pub unnamed_type: Option<TypeIndex>,
    /// `true` iff the RHS was `*T` for some `T` (§4.3's `StarSource`).
    pub star: bool,
}

#[derive(Clone, Debug)]
pub struct TypeInfo {
    /// The opaque type object this `TypeInfo` was interned from. `None` for
    /// a pointer base synthesized during promotion/implementation matching
    /// (§3 lifecycle: "`TypeInfo`s are created ... via `register_type`
    /// called from the promotion/implementation phases when new pointer
    /// bases must be introduced") rather than seen directly in the input.
    pub tt: Option<TypeObjectId>,
    pub kind: TypeObjectKind,
    /// Self for underlyings (invariant 2: `t.underlying.underlying ==
    /// t.underlying`).
    pub underlying: TypeIndex,
    pub type_name: Option<TypeNameIndex>,
    pub aliases: Vec<TypeNameIndex>,
    pub shape: TypeShape,
    pub source: TypeSource,
    pub direct_selectors: Vec<Selector>,
    pub all_fields: Vec<Selector>,
    pub all_methods: Vec<Selector>,
    pub implements: Vec<Implementation>,
    pub implemented_bys: Vec<TypeIndex>,
    pub as_types_of: Vec<DeclRef>,
    pub as_inputs_of: Vec<DeclRef>,
    pub as_outputs_of: Vec<DeclRef>,
    pub index: TypeIndex,
    pub attributes: TypeAttributes,
    /// The monotonically advancing last-touched round used by the §4.5
    /// pass-3 set-intersection scheme. Never meaningful outside that pass.
    pub(crate) counter: u32,
}

impl TypeInfo {
    #[must_use]
    pub fn has_attr(&self, a: TypeAttributes) -> bool {
        self.attributes.contains(a)
    }
}

/// A named or aliased declaration (§3). `Named` xor `Alias`, never both
/// (invariant 3).
#[derive(Clone, Debug)]
pub enum Denotation {
    Named(TypeIndex),
    Alias(TypeIndex),
}

#[derive(Clone, Debug)]
pub struct TypeName {
    pub pkg_path: String,
    pub name: String,
    pub exported: bool,
    pub denotation: Denotation,
    pub pos: Position,
    pub uses: Vec<Position>,
}

impl TypeName {
    #[must_use]
    pub fn denoted(&self) -> TypeIndex {
        match self.denotation {
            Denotation::Named(t) | Denotation::Alias(t) => t,
        }
    }

    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self.denotation, Denotation::Alias(_))
    }
}

/// The registry itself: arenas for `TypeInfo` and `TypeName`, plus the
/// identity and qualified-name indices that make `register_type` and
/// `lookup_type_name` total functions (§3 invariant 1, §6 output contract).
pub struct TypeRegistry {
    type_infos: Vec<TypeInfo>,
    by_tt: FxHashMap<TypeObjectId, TypeIndex>,
    type_names: Vec<TypeName>,
    by_qualified_name: FxHashMap<(String, String), TypeNameIndex>,
    /// Pointer bases synthesized on demand during implementation matching
    /// (§4.5 finalize / §3 lifecycle), keyed by the pointee so a second
    /// request for `*T` returns the same `TypeInfo` rather than a duplicate.
    ptr_of: FxHashMap<TypeIndex, TypeIndex>,
    frozen: bool,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            type_infos: Vec::new(),
            by_tt: FxHashMap::default(),
            type_names: Vec::new(),
            by_qualified_name: FxHashMap::default(),
            ptr_of: FxHashMap::default(),
            frozen: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.type_infos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.type_infos.is_empty()
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn get(&self, idx: TypeIndex) -> &TypeInfo {
        &self.type_infos[idx.index()]
    }

    #[must_use]
    pub fn get_mut(&mut self, idx: TypeIndex) -> &mut TypeInfo {
        &mut self.type_infos[idx.index()]
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> {
        self.type_infos.iter()
    }

    #[must_use]
    pub fn indices(&self) -> Vec<TypeIndex> {
        (0..self.type_infos.len()).map(TypeIndex::from).collect()
    }

    #[must_use]
    pub fn lookup_existing(&self, tt: TypeObjectId) -> Option<TypeIndex> {
        self.by_tt.get(&tt).copied()
    }

    /// Interns a type object as a `TypeInfo`, or returns the existing one —
    /// invariant 1's "first registration wins". Computing `underlying`
    /// recursively registers the checker-resolved underlying object too
    /// (itself already fully collapsed by the checker, so this never
    /// recurses more than one level). Also resolves the type's kind-specific
    /// `shape` (struct fields, interface methods/embeds, container element,
    /// ...), recursively registering whatever it references, so no later
    /// phase needs the original `TypeObject` again.
    pub fn register_type(&mut self, program: &CheckedProgram, tt: TypeObjectId) -> AnalysisOutcome<TypeIndex> {
        if let Some(existing) = self.by_tt.get(&tt) {
            return Ok(*existing);
        }
        if self.frozen {
            return Err(AnalysisError::RegistryFrozen);
        }

        let obj = program.type_object(tt).clone();

        // `*T` may already have a `TypeInfo` synthesized by
        // `get_or_create_pointer` (e.g. a pointer-receiver method forced it
        // into existence before the checker's own `*T` type object was
        // ever registered elsewhere). Reuse it rather than minting a
        // second entry for the same pointer type — otherwise invariant 1
        // breaks for pointers specifically.
        if obj.kind == TypeObjectKind::Pointer {
            if let Some(elem_tt) = obj.elem {
                let elem_idx = self.register_type(program, elem_tt)?;
                let ptr_idx = self.get_or_create_pointer(elem_idx);
                self.get_mut(ptr_idx).tt = Some(tt);
                self.by_tt.insert(tt, ptr_idx);
                return Ok(ptr_idx);
            }
        }

        let index = TypeIndex::from(self.type_infos.len());
        // Reserve the slot before recursing so a cyclic underlying or
        // shape chain (e.g. `type I interface { I }`, §4.4a / S6, or a
        // self-referential `type Node struct { Next *Node }`) resolves
        // back to this same index rather than recursing forever.
        self.type_infos.push(TypeInfo {
            tt: Some(tt),
            kind: obj.kind,
            underlying: index,
            type_name: None,
            aliases: Vec::new(),
            shape: TypeShape::None,
            source: TypeSource::default(),
            direct_selectors: Vec::new(),
            all_fields: Vec::new(),
            all_methods: Vec::new(),
            implements: Vec::new(),
            implemented_bys: Vec::new(),
            as_types_of: Vec::new(),
            as_inputs_of: Vec::new(),
            as_outputs_of: Vec::new(),
            index,
            attributes: TypeAttributes::empty(),
            counter: 0,
        });
        self.by_tt.insert(tt, index);

        let underlying_index = match obj.underlying {
            Some(u) => self.register_type(program, u)?,
            None => index,
        };
        self.get_mut(index).underlying = underlying_index;

        let shape = self.build_shape(program, &obj)?;
        self.get_mut(index).shape = shape;

        Ok(index)
    }

    /// Returns the `TypeInfo` for `*base`, synthesizing one if this is the
    /// first time a pointer to `base` is needed (§3 lifecycle, §4.5
    /// finalize's pointer-method merge). Not gated on `frozen`: the
    /// registry stays open for exactly this purpose until §4.5 completes.
    ///
    /// Checked against *every* already-registered `Pointer`-kind
    /// `TypeInfo`, not just `ptr_of`: a `*base` may already have been
    /// registered through an ordinary `register_type` call (the checker
    /// handed us an explicit `*T` type object, e.g. as a parameter or value
    /// type) before this method ever needed one of its own. Reusing that
    /// one instead of minting a second keeps invariant 1 (`type_identity(tt)
    /// -> TypeInfo` a total function) true for pointer types as well.
    pub fn get_or_create_pointer(&mut self, base: TypeIndex) -> TypeIndex {
        if let Some(&existing) = self.ptr_of.get(&base) {
            return existing;
        }
        if let Some(existing) =
            self.type_infos.iter().find(|t| t.kind == TypeObjectKind::Pointer && t.shape.elem() == Some(base))
        {
            let idx = existing.index;
            self.ptr_of.insert(base, idx);
            return idx;
        }

        let index = TypeIndex::from(self.type_infos.len());
        self.type_infos.push(TypeInfo {
            tt: None,
            kind: TypeObjectKind::Pointer,
            underlying: index,
            type_name: None,
            aliases: Vec::new(),
            shape: TypeShape::Pointer { elem: base },
            source: TypeSource::default(),
            direct_selectors: Vec::new(),
            all_fields: Vec::new(),
            all_methods: Vec::new(),
            implements: Vec::new(),
            implemented_bys: Vec::new(),
            as_types_of: Vec::new(),
            as_inputs_of: Vec::new(),
            as_outputs_of: Vec::new(),
            index,
            attributes: TypeAttributes::empty(),
            counter: 0,
        });
        self.ptr_of.insert(base, index);
        index
    }

    /// Resolves `obj`'s kind-specific structural payload, registering
    /// (recursively) every `TypeObjectId` it references.
    fn build_shape(&mut self, program: &CheckedProgram, obj: &goindex_input::TypeObject) -> AnalysisOutcome<TypeShape> {
        Ok(match obj.kind {
            TypeObjectKind::Struct => {
                let mut fields = Vec::with_capacity(obj.fields.len());
                for f in &obj.fields {
                    let type_index = self.register_type(program, f.type_obj)?;
                    fields.push(ShapeField { name: f.name.clone(), type_index, tag: f.tag.clone(), embedded: f.embedded });
                }
                TypeShape::Struct { fields }
            }
            TypeObjectKind::Interface => {
                let mut methods = Vec::with_capacity(obj.methods.len());
                for m in &obj.methods {
                    let mut params = Vec::with_capacity(m.params.len());
                    for p in &m.params {
                        params.push(self.register_type(program, *p)?);
                    }
                    let mut results = Vec::with_capacity(m.results.len());
                    for r in &m.results {
                        results.push(self.register_type(program, *r)?);
                    }
                    methods.push(ShapeMethod { name: m.name.clone(), params, results, variadic: m.variadic });
                }
                let mut embeds = Vec::with_capacity(obj.embeds.len());
                for e in &obj.embeds {
                    embeds.push(self.register_type(program, *e)?);
                }
                TypeShape::Interface { methods, embeds }
            }
            // `register_type` short-circuits Pointer-kind objects before
            // ever reaching `build_shape` (to dedup against
            // `get_or_create_pointer`-synthesized pointers), so this arm is
            // unreachable in practice; kept only so the match stays
            // exhaustive over `TypeObjectKind`.
            TypeObjectKind::Pointer => TypeShape::None,
            TypeObjectKind::Slice => {
                let Some(elem) = obj.elem else { return Ok(TypeShape::None) };
                TypeShape::Slice { elem: self.register_type(program, elem)? }
            }
            TypeObjectKind::Array => {
                let Some(elem) = obj.elem else { return Ok(TypeShape::None) };
                TypeShape::Array { elem: self.register_type(program, elem)? }
            }
            TypeObjectKind::Chan => {
                let Some(elem) = obj.elem else { return Ok(TypeShape::None) };
                TypeShape::Chan { elem: self.register_type(program, elem)? }
            }
            TypeObjectKind::Map => {
                let (Some(key), Some(elem)) = (obj.key, obj.elem) else { return Ok(TypeShape::None) };
                TypeShape::Map { key: self.register_type(program, key)?, elem: self.register_type(program, elem)? }
            }
            TypeObjectKind::Signature => {
                let mut params = Vec::with_capacity(obj.params.len());
                for p in &obj.params {
                    params.push(self.register_type(program, *p)?);
                }
                let mut results = Vec::with_capacity(obj.results.len());
                for r in &obj.results {
                    results.push(self.register_type(program, *r)?);
                }
                TypeShape::Signature { params, results, variadic: obj.variadic }
            }
            TypeObjectKind::Named | TypeObjectKind::Basic | TypeObjectKind::Tuple => TypeShape::None,
        })
    }

    /// Registers a `TypeName` denoting `denoted`, returning its index. Also
    /// links the `TypeInfo` back to this name: a `Named` denotation sets
    /// `type_name`, an `Alias` denotation appends to `aliases`.
    pub fn register_type_name(
        &mut self,
        pkg_path: &str,
        name: &str,
        exported: bool,
        denoted: TypeIndex,
        is_alias: bool,
        pos: Position,
    ) -> TypeNameIndex {
        let idx = TypeNameIndex::from(self.type_names.len());
        let denotation = if is_alias { Denotation::Alias(denoted) } else { Denotation::Named(denoted) };
        self.type_names.push(TypeName {
            pkg_path: pkg_path.to_string(),
            name: name.to_string(),
            exported,
            denotation,
            pos,
            uses: Vec::new(),
        });
        self.by_qualified_name.insert((pkg_path.to_string(), name.to_string()), idx);

        if is_alias {
            self.get_mut(denoted).aliases.push(idx);
        } else {
            self.get_mut(denoted).type_name = Some(idx);
        }
        idx
    }

    #[must_use]
    pub fn type_name(&self, idx: TypeNameIndex) -> &TypeName {
        &self.type_names[idx.index()]
    }

    #[must_use]
    pub fn type_name_mut(&mut self, idx: TypeNameIndex) -> &mut TypeName {
        &mut self.type_names[idx.index()]
    }

    #[must_use]
    pub fn lookup_type_name(&self, pkg_path: &str, name: &str) -> Option<TypeNameIndex> {
        self.by_qualified_name.get(&(pkg_path.to_string(), name.to_string())).copied()
    }

    #[must_use]
    pub fn type_names(&self) -> impl Iterator<Item = (TypeNameIndex, &TypeName)> {
        self.type_names.iter().enumerate().map(|(i, tn)| (TypeNameIndex::from(i), tn))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goindex_input::{QualifiedName, TypeObject};

    fn register(program: &mut CheckedProgram, obj: TypeObject) -> TypeObjectId {
        let id = TypeObjectId(program.type_objects.len() as u32);
        program.type_objects.push(obj);
        id
    }

    /// Invariant 1: `type_identity(tt) -> TypeInfo` is total — two
    /// `register_type` calls for the same `TypeObjectId` return the same
    /// `TypeIndex`.
    #[test]
    fn register_type_is_idempotent() {
        let mut program = CheckedProgram::default();
        let struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));

        let mut registry = TypeRegistry::new();
        let first = registry.register_type(&program, struct_tt).expect("registers");
        let second = registry.register_type(&program, struct_tt).expect("registers");
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    /// Invariant 2: `t.underlying.underlying == t.underlying` — an
    /// underlying's own underlying is itself.
    #[test]
    fn underlying_of_underlying_is_itself() {
        let mut program = CheckedProgram::default();
        let underlying_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let named_tt = register(&mut program, TypeObject::named(QualifiedName::new("pkg", "T"), underlying_tt));

        let mut registry = TypeRegistry::new();
        let named_idx = registry.register_type(&program, named_tt).expect("registers");
        let underlying_idx = registry.get(named_idx).underlying;
        assert_eq!(registry.get(underlying_idx).underlying, underlying_idx);
    }

    /// A pointer synthesized via `get_or_create_pointer` and later
    /// re-discovered through an explicit `*T` checker type object must
    /// resolve to the same `TypeInfo`, not a duplicate.
    #[test]
    fn get_or_create_pointer_dedupes_against_later_explicit_pointer_object() {
        let mut program = CheckedProgram::default();
        let struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));

        let mut registry = TypeRegistry::new();
        let base_idx = registry.register_type(&program, struct_tt).expect("registers");
        let synthesized = registry.get_or_create_pointer(base_idx);

        let ptr_tt = register(&mut program, TypeObject::pointer(struct_tt));
        let explicit = registry.register_type(&program, ptr_tt).expect("registers");

        assert_eq!(synthesized, explicit, "synthesized and explicit *T must be the same TypeInfo");
        assert_eq!(registry.iter().filter(|t| t.kind == TypeObjectKind::Pointer).count(), 1);
    }

    /// Same dedup guarantee in the opposite order: an explicit `*T` object
    /// registered first, then `get_or_create_pointer` called for the same
    /// base, must reuse it rather than synthesizing a second pointer.
    #[test]
    fn explicit_pointer_object_dedupes_against_later_get_or_create_pointer() {
        let mut program = CheckedProgram::default();
        let struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let ptr_tt = register(&mut program, TypeObject::pointer(struct_tt));

        let mut registry = TypeRegistry::new();
        let base_idx = registry.register_type(&program, struct_tt).expect("registers");
        let explicit = registry.register_type(&program, ptr_tt).expect("registers");
        let synthesized = registry.get_or_create_pointer(base_idx);

        assert_eq!(explicit, synthesized);
        assert_eq!(registry.iter().filter(|t| t.kind == TypeObjectKind::Pointer).count(), 1);
    }

    #[test]
    fn register_type_after_freeze_fails() {
        let mut program = CheckedProgram::default();
        let struct_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));
        let other_tt = register(&mut program, TypeObject::unnamed_struct(vec![]));

        let mut registry = TypeRegistry::new();
        registry.register_type(&program, struct_tt).expect("registers");
        registry.freeze();

        let err = registry.register_type(&program, other_tt).expect_err("frozen registry must reject new types");
        assert_eq!(err, AnalysisError::RegistryFrozen);
    }
}
