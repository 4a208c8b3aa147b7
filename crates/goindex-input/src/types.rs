//! Opaque type objects, as the type checker would hand them to us.
//!
//! `TypeObjectId` is the identity the core relies on for invariant 1
//! (`type_identity(tt) -> TypeInfo` is a total function): two declarations
//! that the checker resolved to the same type share one `TypeObjectId`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeObjectId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeObjectKind {
    Named,
    Interface,
    Struct,
    Pointer,
    Array,
    Slice,
    Map,
    Chan,
    Basic,
    Signature,
    Tuple,
}

/// The fully qualified name of a named or basic type's declaration site.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Empty for predeclared basics (`int`, `string`, …) and for the builtin
    /// package's universe copy, per the §4.2 builtin special case.
    pub pkg_path: String,
    pub name: String,
}

impl QualifiedName {
    #[must_use]
    pub fn new(pkg_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self { pkg_path: pkg_path.into(), name: name.into() }
    }
}

/// A field of a struct type literal (§4.3a). Whether the field is embedded
/// (anonymous) is an AST-level fact the checker already resolved; the core
/// derives `Selector::mode` (None/Direct/Indirect) from `embedded` and
/// whether `type_obj` is itself a pointer kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructFieldDecl {
    /// For an embedded field this is the embedded type's own name.
    pub name: String,
    pub type_obj: TypeObjectId,
    pub tag: String,
    pub embedded: bool,
}

/// A method specification of an interface type literal (§4.3b). Interface
/// methods never carry a pointer-receiver flag — that distinction only
/// exists for concrete methods (§4.3c), which arrive as `FuncDeclInput`
/// with a receiver instead of as part of a `TypeObject`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<TypeObjectId>,
    pub results: Vec<TypeObjectId>,
    pub variadic: bool,
}

/// One entry in the checker's type-object table. Kinds not relevant to a
/// given variant simply leave their fields empty/`None`; this mirrors
/// `go/types.Type`'s single-interface-many-kinds shape closely enough for
/// the core to treat it as an opaque, kind-inspectable object per §6.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeObject {
    pub kind: TypeObjectKind,
    /// `Some` for `Named`/`Basic`: the declaration this type object denotes.
    pub name: Option<QualifiedName>,
    /// The language-level underlying type. `None` for the predeclared
    /// basics and for already-unnamed literals (the core treats `underlying
    /// == self` for those, satisfying invariant 2).
    pub underlying: Option<TypeObjectId>,
    /// Struct kind only.
    pub fields: Vec<StructFieldDecl>,
    /// Interface kind only: directly declared methods.
    pub methods: Vec<MethodDecl>,
    /// Interface kind only: directly embedded interface expressions.
    pub embeds: Vec<TypeObjectId>,
    /// Pointer/Slice/Array/Chan kind only: the element type.
    pub elem: Option<TypeObjectId>,
    /// Map kind only: the key type.
    pub key: Option<TypeObjectId>,
    /// Signature kind only.
    pub params: Vec<TypeObjectId>,
    pub results: Vec<TypeObjectId>,
    pub variadic: bool,
}

impl TypeObject {
    #[must_use]
    pub fn basic(name: impl Into<String>) -> Self {
        Self {
            kind: TypeObjectKind::Basic,
            name: Some(QualifiedName::new("", name)),
            underlying: None,
            fields: Vec::new(),
            methods: Vec::new(),
            embeds: Vec::new(),
            elem: None,
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    #[must_use]
    pub fn named(qname: QualifiedName, underlying: TypeObjectId) -> Self {
        Self {
            kind: TypeObjectKind::Named,
            name: Some(qname),
            underlying: Some(underlying),
            fields: Vec::new(),
            methods: Vec::new(),
            embeds: Vec::new(),
            elem: None,
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    #[must_use]
    pub fn unnamed_struct(fields: Vec<StructFieldDecl>) -> Self {
        Self {
            kind: TypeObjectKind::Struct,
            name: None,
            underlying: None,
            fields,
            methods: Vec::new(),
            embeds: Vec::new(),
            elem: None,
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    #[must_use]
    pub fn unnamed_interface(methods: Vec<MethodDecl>, embeds: Vec<TypeObjectId>) -> Self {
        Self {
            kind: TypeObjectKind::Interface,
            name: None,
            underlying: None,
            fields: Vec::new(),
            methods,
            embeds,
            elem: None,
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    #[must_use]
    pub fn pointer(elem: TypeObjectId) -> Self {
        Self {
            kind: TypeObjectKind::Pointer,
            name: None,
            underlying: None,
            fields: Vec::new(),
            methods: Vec::new(),
            embeds: Vec::new(),
            elem: Some(elem),
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }

    #[must_use]
    pub fn slice(elem: TypeObjectId) -> Self {
        Self {
            kind: TypeObjectKind::Slice,
            name: None,
            underlying: None,
            fields: Vec::new(),
            methods: Vec::new(),
            embeds: Vec::new(),
            elem: Some(elem),
            key: None,
            params: Vec::new(),
            results: Vec::new(),
            variadic: false,
        }
    }
}
