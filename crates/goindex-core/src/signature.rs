//! `MethodSignature` (§3): the hash/equality key used during implementation
//! matching (§4.5) and during interface-method-overlap checks (§4.4a).

use smallvec::SmallVec;

use crate::ids::TypeIndex;
use crate::util::is_exported;

#[derive(Clone, Debug)]
pub struct MethodSignature {
    pub name: String,
    /// Only semantically relevant when `name` is unexported — two
    /// unexported methods of the same name from different packages are
    /// distinct signatures (they can never satisfy the same interface
    /// method), matching the "unexporteds from different packages do not
    /// collide" rule for selector ids.
    pkg_path_if_unexported: String,
    inputs: SmallVec<[TypeIndex; 4]>,
    outputs: SmallVec<[TypeIndex; 2]>,
    variadic: bool,
}

impl MethodSignature {
    #[must_use]
    pub fn new(name: impl Into<String>, pkg_path: &str, inputs: Vec<TypeIndex>, outputs: Vec<TypeIndex>, variadic: bool) -> Self {
        let name = name.into();
        let pkg_path_if_unexported = if is_exported(&name) { String::new() } else { pkg_path.to_string() };
        Self { name, pkg_path_if_unexported, inputs: inputs.into(), outputs: outputs.into(), variadic }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }
}

impl PartialEq for MethodSignature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.pkg_path_if_unexported == other.pkg_path_if_unexported
            && self.inputs == other.inputs
            && self.outputs == other.outputs
            && self.variadic == other.variadic
    }
}
impl Eq for MethodSignature {}

impl std::hash::Hash for MethodSignature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.pkg_path_if_unexported.hash(state);
        self.inputs.hash(state);
        self.outputs.hash(state);
        self.variadic.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TypeIndex;

    fn idx(i: u32) -> TypeIndex {
        TypeIndex::from(i as usize)
    }

    #[test]
    fn exported_methods_ignore_package_path() {
        let a = MethodSignature::new("Error", "pkg/a", vec![], vec![idx(0)], false);
        let b = MethodSignature::new("Error", "pkg/b", vec![], vec![idx(0)], false);
        assert_eq!(a, b, "two packages' exported Error() string signatures must be the same key");
    }

    #[test]
    fn unexported_methods_from_different_packages_do_not_collide() {
        let a = MethodSignature::new("helper", "pkg/a", vec![], vec![], false);
        let b = MethodSignature::new("helper", "pkg/b", vec![], vec![], false);
        assert_ne!(a, b, "unexported methods of the same name in different packages must be distinct signatures");
    }

    #[test]
    fn differing_input_types_are_distinct() {
        let a = MethodSignature::new("M", "pkg/a", vec![idx(1)], vec![], false);
        let b = MethodSignature::new("M", "pkg/a", vec![idx(2)], vec![], false);
        assert_ne!(a, b);
    }

    #[test]
    fn variadic_flag_participates_in_equality() {
        let a = MethodSignature::new("M", "pkg/a", vec![idx(1)], vec![], false);
        let b = MethodSignature::new("M", "pkg/a", vec![idx(1)], vec![], true);
        assert_ne!(a, b);
    }
}
