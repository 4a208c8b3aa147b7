//! `Selector` (§3): a field or method reachable on a type, directly
//! declared or promoted through embedding.

use smallvec::SmallVec;

use crate::ids::TypeIndex;
use crate::signature::MethodSignature;
use crate::util::selector_id;

/// How a struct field participates in embedding (§4.3a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldMode {
    /// A normal named field.
    None,
    /// An embedded field `T`.
    Direct,
    /// An embedded field `*T`.
    Indirect,
}

#[derive(Clone, Debug)]
pub struct FieldSelector {
    pub type_index: TypeIndex,
    pub tag: String,
    pub mode: FieldMode,
}

#[derive(Clone, Debug)]
pub struct MethodSelector {
    pub signature: MethodSignature,
    pub pointer_recv: bool,
}

#[derive(Clone, Debug)]
pub enum SelectorPayload {
    Field(FieldSelector),
    Method(MethodSelector),
}

/// One step of an embedding chain: the embedded field that was expanded to
/// reach the next depth, and the type it was declared on. Stored outermost
/// (depth 0) first, matching how the original analyzer's `EmbededFieldsPath`
/// renders `Outer.Inner.X`.
#[derive(Clone, Debug)]
pub struct EmbedStep {
    pub field_name: String,
    pub owner: TypeIndex,
}

/// Whether a selector is reachable by its short name (§4.4b shadowing and
/// ambiguity rules).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    Normal,
    /// Shadowed by a shallower same-named selector, or tied for shallowest
    /// depth with another same-named selector (ambiguous) — either way,
    /// unreachable by short name.
    Hidden,
}

#[derive(Clone, Debug)]
pub struct Selector {
    pub id: String,
    pub name: String,
    pub payload: SelectorPayload,
    pub depth: u32,
    pub indirect: bool,
    pub embedding_chain: SmallVec<[EmbedStep; 4]>,
    pub cond: Cond,
}

impl Selector {
    #[must_use]
    pub fn direct_field(name: &str, pkg_path: &str, type_index: TypeIndex, tag: String, mode: FieldMode) -> Self {
        Self {
            id: selector_id(name, pkg_path),
            name: name.to_string(),
            payload: SelectorPayload::Field(FieldSelector { type_index, tag, mode }),
            depth: 0,
            indirect: false,
            embedding_chain: SmallVec::new(),
            cond: Cond::Normal,
        }
    }

    #[must_use]
    pub fn direct_method(name: &str, pkg_path: &str, signature: MethodSignature, pointer_recv: bool) -> Self {
        Self {
            id: selector_id(name, pkg_path),
            name: name.to_string(),
            payload: SelectorPayload::Method(MethodSelector { signature, pointer_recv }),
            depth: 0,
            indirect: false,
            embedding_chain: SmallVec::new(),
            cond: Cond::Normal,
        }
    }

    /// Builds the promoted copy of `self` reached one level deeper through
    /// `step`, per §4.4b: "construct a new Selector copy carrying
    /// `embedding_chain = cons(f, e.embedding_chain)`, `depth = d+1`,
    /// `indirect = e.indirect || via_pointer`".
    #[must_use]
    pub fn promote_through(&self, step: EmbedStep, depth: u32, via_pointer: bool) -> Self {
        let mut chain = self.embedding_chain.clone();
        chain.push(step);
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            payload: self.payload.clone(),
            depth,
            indirect: self.indirect || via_pointer,
            embedding_chain: chain,
            cond: Cond::Normal,
        }
    }

    #[must_use]
    pub fn is_field(&self) -> bool {
        matches!(self.payload, SelectorPayload::Field(_))
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        matches!(self.payload, SelectorPayload::Method(_))
    }

    #[must_use]
    pub fn as_field(&self) -> Option<&FieldSelector> {
        match &self.payload {
            SelectorPayload::Field(f) => Some(f),
            SelectorPayload::Method(_) => None,
        }
    }

    #[must_use]
    pub fn as_method(&self) -> Option<&MethodSelector> {
        match &self.payload {
            SelectorPayload::Method(m) => Some(m),
            SelectorPayload::Field(_) => None,
        }
    }

    /// Renders the embedding chain the way the original analyzer's debug
    /// dump did, e.g. `Outer.Inner.X`.
    #[must_use]
    pub fn trace_chain(&self) -> String {
        let mut parts: Vec<&str> = self.embedding_chain.iter().map(|s| s.field_name.as_str()).collect();
        parts.push(&self.name);
        parts.join(".")
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (depth {}, {:?})", self.trace_chain(), self.depth, self.cond)
    }
}
