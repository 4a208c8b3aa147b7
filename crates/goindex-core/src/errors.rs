//! The two error kinds of §7.
//!
//! Fatal variants mean the input violated the type checker's documented
//! contract and recovery has no well-defined meaning; the analyzer aborts
//! by returning `Err`, naming the offending declaration and its position.
//! Degraded facts are folded into [`crate::analyzer::AnalysisResult`] as
//! [`goindex_common::Diagnostic`]s instead of aborting.

use goindex_common::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// A package dependency edge introduces a cycle; §4.1 forbids this by
    /// input contract, so a revisit in-progress during the memoized DFS is
    /// fatal rather than something the walker resolves.
    CyclicPackageDependency { package: String },
    /// A function declaration's receiver does not resolve to a named type
    /// declared in the same package (§4.3c / §7's "AST receiver shape"
    /// assertion, generalized to "receiver names an unknown type").
    UnresolvedReceiver { func_name: String, receiver_type: String, pos: Position },
    /// A type declaration's `TypesInfo` entry was not a `TypeName` (here:
    /// the declared RHS referenced a type object the registry never saw).
    UnresolvedTypeReference { decl_name: String, pos: Position },
    /// Two embedded interfaces (or an embedded interface and a direct
    /// method) disagree on the signature of a same-named method (§4.4a).
    ConflictingInterfaceMethod { type_name: String, method: String },
    /// `register_type` was called after the registry was frozen (§3
    /// lifecycle rule — forbidden once §4.5 completes).
    RegistryFrozen,
    /// Method-signature construction encountered a type object the
    /// registry had not already interned (§9: "must not trigger
    /// `register_type`"; the type checker's signature form is required to
    /// reference only pre-existing canonical objects).
    UnregisteredSignatureType { method: String },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CyclicPackageDependency { package } => {
                write!(f, "cycle detected among package dependencies at {package}")
            }
            Self::UnresolvedReceiver { func_name, receiver_type, pos } => {
                write!(f, "{pos}: method {func_name} has receiver of unknown type {receiver_type}")
            }
            Self::UnresolvedTypeReference { decl_name, pos } => {
                write!(f, "{pos}: type declaration {decl_name} references an unregistered type object")
            }
            Self::ConflictingInterfaceMethod { type_name, method } => {
                write!(f, "{type_name}: embedded interfaces disagree on the signature of method {method}")
            }
            Self::RegistryFrozen => write!(f, "register_type called after the registry was frozen"),
            Self::UnregisteredSignatureType { method } => {
                write!(f, "signature of method {method} references a type not yet registered")
            }
        }
    }
}

impl std::error::Error for AnalysisError {}

pub type AnalysisOutcome<T> = Result<T, AnalysisError>;
