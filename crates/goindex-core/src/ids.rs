//! Dense arena indices. Per the §9 design note, every "pointer" field in the
//! data model (`underlying`, `type_name`, `aliases`, `implemented_bys`,
//! embedding chains) is a `u32`-newtype index into an arena `Vec` owned by
//! the registry, rather than a reference-counted pointer — this sidesteps
//! ownership cycles in the type graph without weak references.

use std::fmt;

macro_rules! arena_index {
    ($name:ident) => {
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self(v as u32)
            }
        }
    };
}

arena_index!(TypeIndex);
arena_index!(TypeNameIndex);
arena_index!(PackageIndex);
arena_index!(MethodId);
arena_index!(FuncIndex);
arena_index!(ValueIndex);
