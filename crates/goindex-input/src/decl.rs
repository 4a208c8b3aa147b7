//! Top-level declarations as the checker's AST walk would surface them
//! (§4.2). Blank identifiers (`_`) are simply never represented here — the
//! collector never needs to special-case them.

use serde::{Deserialize, Serialize};

use goindex_common::Position;

use crate::types::TypeObjectId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverInput {
    /// The named type's declared name (never a pointer or qualified name —
    /// receivers are always either `Ident` or `*Ident`, per §7's assertion).
    pub type_name: String,
    pub pointer: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclInput {
    pub name: String,
    pub exported: bool,
    pub pos: Position,
    /// The type object this name denotes.
    pub rhs: TypeObjectId,
    /// `true` for a type alias (`type A = B`), `false` for a named
    /// declaration (`type A B`). A `TypeDeclInput` is one xor the other,
    /// matching invariant 3.
    pub alias: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncDeclInput {
    pub name: String,
    pub exported: bool,
    pub pos: Position,
    pub receiver: Option<ReceiverInput>,
    pub params: Vec<TypeObjectId>,
    pub results: Vec<TypeObjectId>,
    pub variadic: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Var,
    Const,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDeclInput {
    pub name: String,
    pub exported: bool,
    pub pos: Position,
    pub type_obj: TypeObjectId,
    pub kind: ValueKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInput {
    pub local_name: String,
    pub imported_path: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopLevelDecl {
    Type(TypeDeclInput),
    Func(FuncDeclInput),
    Value(ValueDeclInput),
    Import(ImportInput),
}
