//! S3–S6: selector-promotion scenarios covering shadowing, ambiguity,
//! embedded-interface method merging, and recursive-underlying termination.

use goindex_core::{Cond, FieldMode, Analyzer, AnalyzerConfig};
use goindex_input::builder::{field, method_spec};
use goindex_input::ProgramBuilder;

#[test]
fn s3_ambiguous_promotion_marks_both_x_hidden() {
    // type A struct{ X int }
    // type B struct{ X int }
    // type C struct{ A; B }
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/ambig");

    let int_ty = b.basic("int");

    let a_struct = b.unnamed_struct(vec![field("X", int_ty, false)]);
    let a = b.declare_named(&mut pkg, "A", true, a_struct);

    let b_struct = b.unnamed_struct(vec![field("X", int_ty, false)]);
    let b_named = b.declare_named(&mut pkg, "B", true, b_struct);

    let c_struct = b.unnamed_struct(vec![field("A", a, true), field("B", b_named, true)]);
    b.declare_named(&mut pkg, "C", true, c_struct);

    let program = b.finish();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("analysis succeeds");

    let c_tn = result.lookup_type_name("example.com/ambig", "C").expect("C registered");
    let c_idx = result.type_name(c_tn).denoted();
    let c_info = result.type_info(c_idx);

    let normal_x = c_info
        .all_fields
        .iter()
        .any(|s| s.name == "X" && s.cond == Cond::Normal);
    assert!(!normal_x, "C.all_fields must contain no Normal selector named X");

    let hidden_xs: Vec<_> = c_info.all_fields.iter().filter(|s| s.name == "X" && s.cond == Cond::Hidden).collect();
    assert_eq!(hidden_xs.len(), 2, "both A.X and B.X should be present as Hidden");
}

#[test]
fn s4_shadowed_promotion_keeps_only_outer_x() {
    // type Inner struct{ X int }
    // type Outer struct{ Inner; X string }
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/shadow");

    let int_ty = b.basic("int");
    let string_ty = b.basic("string");

    let inner_struct = b.unnamed_struct(vec![field("X", int_ty, false)]);
    let inner = b.declare_named(&mut pkg, "Inner", true, inner_struct);

    let outer_struct = b.unnamed_struct(vec![field("Inner", inner, true), field("X", string_ty, false)]);
    b.declare_named(&mut pkg, "Outer", true, outer_struct);

    let program = b.finish();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("analysis succeeds");

    let outer_tn = result.lookup_type_name("example.com/shadow", "Outer").expect("Outer registered");
    let outer_idx = result.type_name(outer_tn).denoted();
    let outer_info = result.type_info(outer_idx);

    let xs: Vec<_> = outer_info.all_fields.iter().filter(|s| s.name == "X").collect();
    assert_eq!(xs.len(), 1, "Outer.all_fields must contain exactly one X");
    let x = xs[0];
    assert_eq!(x.cond, Cond::Normal);
    assert_eq!(x.depth, 0);
    assert_eq!(x.as_field().expect("X is a field").type_index, string_ty);
}

#[test]
fn s5_embedded_interface_merges_methods_without_duplicates() {
    // type R interface{ Read() }
    // type W interface{ Write() }
    // type RW interface{ R; W }
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/rw");

    let r_iface = b.unnamed_interface(vec![method_spec("Read", vec![], vec![])], vec![]);
    let r = b.declare_named(&mut pkg, "R", true, r_iface);

    let w_iface = b.unnamed_interface(vec![method_spec("Write", vec![], vec![])], vec![]);
    let w = b.declare_named(&mut pkg, "W", true, w_iface);

    let rw_iface = b.unnamed_interface(vec![], vec![r, w]);
    b.declare_named(&mut pkg, "RW", true, rw_iface);

    // A concrete type implementing both Read and Write.
    let both_struct = b.unnamed_struct(vec![]);
    b.declare_named(&mut pkg, "Both", true, both_struct);
    b.declare_method(&mut pkg, "Both", false, "Read", true, vec![], vec![]);
    b.declare_method(&mut pkg, "Both", false, "Write", true, vec![], vec![]);

    let program = b.finish();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("analysis succeeds");

    let rw_tn = result.lookup_type_name("example.com/rw", "RW").expect("RW registered");
    let rw_idx = result.type_name(rw_tn).denoted();
    let rw_info = result.type_info(rw_idx);

    let mut names: Vec<&str> = rw_info.all_methods.iter().map(|s| s.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Read", "Write"]);
    assert_eq!(rw_info.all_methods.len(), 2, "no duplicate methods after merge");

    let both_tn = result.lookup_type_name("example.com/rw", "Both").expect("Both registered");
    let both_idx = result.type_name(both_tn).denoted();
    assert!(rw_info.implemented_bys.contains(&both_idx), "Both should implement RW");
}

#[test]
fn s6_recursive_underlying_terminates_with_empty_methods() {
    // type I interface{ I } -- I's underlying unnamed interface embeds I itself.
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/cycle");

    // Reserve I's Named TypeObjectId, then the unnamed interface that is
    // its underlying and embeds I itself, then patch I's `underlying` in
    // place to close the cycle — neither object can reference the other at
    // construction time.
    let placeholder_iface = b.unnamed_interface(vec![], vec![]);
    let i = b.declare_named(&mut pkg, "I", true, placeholder_iface);
    let cyclic_iface = b.unnamed_interface(vec![], vec![i]);
    b.type_object_mut(i).underlying = Some(cyclic_iface);

    let program = b.finish();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("analysis terminates");

    let i_tn = result.lookup_type_name("example.com/cycle", "I").expect("I registered");
    let i_idx = result.type_name(i_tn).denoted();
    let i_info = result.type_info(i_idx);
    assert!(i_info.all_methods.is_empty(), "I.all_methods must be empty after cycle-broken promotion");
}

#[test]
fn identical_signature_overlap_is_tolerated_by_default_but_fatal_in_strict_mode() {
    // type R interface{ Close() error }
    // type W interface{ Close() error }
    // type RW interface{ R; W } -- both embeds agree on Close's signature.
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/overlap");

    let string_ty = b.basic("string");

    let r_iface = b.unnamed_interface(vec![method_spec("Close", vec![], vec![string_ty])], vec![]);
    let r = b.declare_named(&mut pkg, "R", true, r_iface);

    let w_iface = b.unnamed_interface(vec![method_spec("Close", vec![], vec![string_ty])], vec![]);
    let w = b.declare_named(&mut pkg, "W", true, w_iface);

    let rw_iface = b.unnamed_interface(vec![], vec![r, w]);
    b.declare_named(&mut pkg, "RW", true, rw_iface);

    let program = b.finish();

    let tolerant = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("tolerated by default");
    let rw_tn = tolerant.lookup_type_name("example.com/overlap", "RW").expect("RW registered");
    let rw_idx = tolerant.type_name(rw_tn).denoted();
    assert_eq!(tolerant.type_info(rw_idx).all_methods.len(), 1, "only one Close survives the merge");

    let strict_config = AnalyzerConfig { strict_interface_overlap: true, ..AnalyzerConfig::default() };
    let err = Analyzer::new(strict_config).analyze(&program).expect_err("strict mode rejects any overlap");
    assert!(matches!(err, goindex_core::AnalysisError::ConflictingInterfaceMethod { .. }));
}

#[test]
fn indirect_embedding_marks_field_mode_indirect() {
    // type Inner struct{ X int }
    // type Outer struct{ *Inner }
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/ptr-embed");

    let int_ty = b.basic("int");
    let inner_struct = b.unnamed_struct(vec![field("X", int_ty, false)]);
    let inner = b.declare_named(&mut pkg, "Inner", true, inner_struct);
    let inner_ptr = b.pointer(inner);

    let outer_struct = b.unnamed_struct(vec![field("Inner", inner_ptr, true)]);
    b.declare_named(&mut pkg, "Outer", true, outer_struct);

    let program = b.finish();
    let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program).expect("analysis succeeds");

    let outer_tn = result.lookup_type_name("example.com/ptr-embed", "Outer").expect("Outer registered");
    let outer_idx = result.type_name(outer_tn).denoted();
    let outer_info = result.type_info(outer_idx);

    let inner_field = outer_info.direct_selectors.iter().find(|s| s.name == "Inner").expect("Inner field present");
    assert_eq!(inner_field.as_field().expect("field").mode, FieldMode::Indirect);

    let x = outer_info.all_fields.iter().find(|s| s.name == "X").expect("X promoted through *Inner");
    assert!(x.indirect, "X reached through *Inner must be marked indirect");
    assert_eq!(x.depth, 1);
}
