//! Plain-text rendering of an [`AnalysisResult`] for the CLI.

use goindex_core::{AnalysisResult, TypeIndex};
use goindex_input::TypeObjectKind;

pub fn print_summary(result: &AnalysisResult, verbose: bool) {
    println!("packages: {}", result.packages().len());
    println!("types:    {}", result.type_count());
    println!();

    for pkg in result.packages() {
        let exported: Vec<_> = pkg.type_names.iter().filter(|&&tn| result.type_name(tn).exported).collect();
        if exported.is_empty() && !verbose {
            continue;
        }
        println!("package {} (dep_level={})", pkg.import_path, pkg.dep_level);

        for &tn_idx in &pkg.type_names {
            let tn = result.type_name(tn_idx);
            if !tn.exported && !verbose {
                continue;
            }
            let idx = tn.denoted();
            let info = result.type_info(idx);
            println!("  {} {}", if tn.is_alias() { "alias" } else { "type " }, tn.name);

            if verbose {
                for f in &info.all_fields {
                    println!("      field  {f}");
                }
                for m in &info.all_methods {
                    println!("      method {m}");
                }
            }

            if !info.implements.is_empty() {
                let names: Vec<String> = info.implements.iter().map(|i| type_label(result, i.interface)).collect();
                println!("      implements: {}", names.join(", "));
            }
            if !info.implemented_bys.is_empty() {
                let names: Vec<String> = info.implemented_bys.iter().map(|&t| type_label(result, t)).collect();
                println!("      implemented by: {}", names.join(", "));
            }
            if !info.as_inputs_of.is_empty() || !info.as_outputs_of.is_empty() || !info.as_types_of.is_empty() {
                println!(
                    "      cross-refs: {} input(s), {} output(s), {} value(s)",
                    info.as_inputs_of.len(),
                    info.as_outputs_of.len(),
                    info.as_types_of.len()
                );
            }
        }
        println!();
    }

    if !result.runtime_func_positions.is_empty() {
        println!("runtime function positions:");
        for (name, pos) in &result.runtime_func_positions {
            println!("  {name} @ {pos}");
        }
        println!();
    }

    if !result.degradations.is_empty() {
        println!("degradations ({}):", result.degradations.len());
        for d in &result.degradations {
            println!("  {d}");
        }
    }
}

/// A short human-readable label for a type: its declared name if it has
/// one, or a synthesized literal rendering (`*T`, `[]T`) otherwise.
fn type_label(result: &AnalysisResult, idx: TypeIndex) -> String {
    let info = result.type_info(idx);
    match info.kind {
        TypeObjectKind::Pointer => match info.shape.elem() {
            Some(elem) => format!("*{}", type_label(result, elem)),
            None => "*<unknown>".to_string(),
        },
        TypeObjectKind::Slice => match info.shape.elem() {
            Some(elem) => format!("[]{}", type_label(result, elem)),
            None => "[]<unknown>".to_string(),
        },
        _ => format!("<unnamed#{}>", idx.index()),
    }
}
