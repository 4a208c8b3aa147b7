//! Analyzer configuration: a small `Copy` struct of knobs threaded through
//! the pipeline rather than scattered constants.

#[derive(Clone, Copy, Debug)]
pub struct AnalyzerConfig {
    /// The upstream implementation tolerates embedded interfaces (or
    /// direct-vs-embedded) whose methods have identical signatures but
    /// panics on a mismatch. When `true`, this analyzer goes further and
    /// treats *any* same-name overlap between embedded interfaces as
    /// fatal, regardless of signature equality — an escape hatch for
    /// callers targeting a language revision that tightened the rule back
    /// up. Default `false` matches the prescribed policy.
    pub strict_interface_overlap: bool,
    /// Import path identifying the builtin package's checker-internal
    /// universe copy, used by the §4.2 builtin/universe aliasing special
    /// case. Empty string disables the special case entirely (no builtin
    /// package in this program).
    pub builtin_package_path: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self { strict_interface_overlap: false, builtin_package_path: String::new() }
    }
}
