//! Selector-promotion and implementation-matching microbenchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use goindex_core::{Analyzer, AnalyzerConfig};
use goindex_input::builder::{field, method_spec};
use goindex_input::{CheckedProgram, ProgramBuilder, ValueKind};

/// A chain of `DEPTH` structs, each embedding the previous one by value,
/// with the innermost implementing an interface — exercises the §4.4 BFS
/// promotion loop over a realistic embedding depth.
fn build_embedding_chain(depth: usize) -> CheckedProgram {
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("bench.example/chain");

    let string = b.basic("string");
    let greeter = b.unnamed_interface(vec![method_spec("Greet", vec![], vec![string])], vec![]);
    b.declare_named(&mut pkg, "Greeter", true, greeter);

    let base_struct = b.unnamed_struct(vec![field("Name", string, false)]);
    let mut prev = b.declare_named(&mut pkg, "Base", true, base_struct);
    b.declare_method(&mut pkg, "Base", false, "Greet", true, vec![], vec![string]);

    for i in 0..depth {
        let name = format!("Layer{i}");
        let st = b.unnamed_struct(vec![field("Base", prev, true)]);
        prev = b.declare_named(&mut pkg, &name, true, st);
    }

    b.finish()
}

/// `width` distinct structs, each implementing the same interface with a
/// value receiver, plus one pointer-receiver-only implementer — exercises
/// the §4.5 group-by-interface and k-way-AND passes at scale.
fn build_wide_implementers(width: usize) -> CheckedProgram {
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("bench.example/wide");

    let float64 = b.basic("float64");
    let shaper = b.unnamed_interface(vec![method_spec("Area", vec![], vec![float64])], vec![]);
    b.declare_named(&mut pkg, "Shaper", true, shaper);

    for i in 0..width {
        let name = format!("Shape{i}");
        let st = b.unnamed_struct(vec![field("Size", float64, false)]);
        b.declare_named(&mut pkg, &name, true, st);
        b.declare_method(&mut pkg, &name, false, "Area", true, vec![], vec![float64]);
    }

    let ptr_struct = b.unnamed_struct(vec![field("Size", float64, false)]);
    let ptr_named = b.declare_named(&mut pkg, "PointerShape", true, ptr_struct);
    b.declare_method(&mut pkg, "PointerShape", true, "Area", true, vec![], vec![float64]);
    let ptr = b.pointer(ptr_named);
    b.declare_value(&mut pkg, "DefaultPointerShape", true, ValueKind::Var, ptr);

    b.finish()
}

fn bench_embedding_depth(c: &mut Criterion) {
    for depth in [8usize, 32, 64] {
        let program = build_embedding_chain(depth);
        c.bench_function(&format!("promote_embedding_depth_{depth}"), |b| {
            b.iter(|| {
                let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program);
                black_box(result)
            })
        });
    }
}

fn bench_implementation_width(c: &mut Criterion) {
    for width in [16usize, 64, 256] {
        let program = build_wide_implementers(width);
        c.bench_function(&format!("find_implementations_width_{width}"), |b| {
            b.iter(|| {
                let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program);
                black_box(result)
            })
        });
    }
}

criterion_group!(promotion_benches, bench_embedding_depth, bench_implementation_width);
criterion_main!(promotion_benches);
