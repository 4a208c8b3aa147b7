//! Small free functions shared across phases.

/// The language's exportedness rule: an identifier is exported iff its
/// first character is uppercase. This determines both a selector's id
/// (§3: `name` for exported, `pkgpath.name` for unexported) and whether a
/// declaration participates in cross-package method-signature equality.
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// The externally visible key for name resolution (§3, "Selector id").
#[must_use]
pub fn selector_id(name: &str, pkg_path: &str) -> String {
    if is_exported(name) { name.to_string() } else { format!("{pkg_path}.{name}") }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exported_names_start_uppercase() {
        assert!(is_exported("Error"));
        assert!(!is_exported("error"));
        assert!(!is_exported(""));
    }

    #[test]
    fn selector_id_qualifies_only_unexported_names() {
        assert_eq!(selector_id("Read", "io"), "Read");
        assert_eq!(selector_id("read", "io"), "io.read");
    }

    #[test]
    fn unexported_ids_from_different_packages_do_not_collide() {
        assert_ne!(selector_id("helper", "pkg/a"), selector_id("helper", "pkg/b"));
    }
}
