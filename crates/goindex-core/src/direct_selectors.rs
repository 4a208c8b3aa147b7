//! Direct-selector collection (§4.3a/§4.3b): struct fields and interface
//! method/embed entries, read off the shape cached during registration.
//! Concrete methods (§4.3c) are attached earlier, directly onto a named
//! type's own `TypeInfo`, while [`crate::declarations::collect_declarations`]
//! walks function declarations — this pass only covers what a struct or
//! interface literal's own shape declares.

use rustc_hash::FxHashMap;

use goindex_input::TypeObjectKind;

use crate::ids::TypeIndex;
use crate::registry::{TypeAttributes, TypeRegistry};
use crate::selector::{FieldMode, Selector};
use crate::signature::MethodSignature;

/// Fills `direct_selectors` for every struct and interface literal
/// `TypeInfo` in the registry. Idempotent via `DIRECT_SELECTORS_COLLECTED`.
pub fn collect_direct_selectors(registry: &mut TypeRegistry) {
    let owners = owning_packages(registry);

    for idx in registry.indices() {
        if registry.get(idx).has_attr(TypeAttributes::DIRECT_SELECTORS_COLLECTED) {
            continue;
        }
        let pkg_path = owners.get(&idx).cloned().unwrap_or_default();
        let selectors = match registry.get(idx).kind {
            TypeObjectKind::Struct => struct_field_selectors(registry, idx, &pkg_path),
            TypeObjectKind::Interface => interface_selectors(registry, idx, &pkg_path),
            _ => Vec::new(),
        };
        let info = registry.get_mut(idx);
        info.direct_selectors.extend(selectors);
        info.attributes.insert(TypeAttributes::DIRECT_SELECTORS_COLLECTED);
    }
}

/// Maps a struct/interface literal's own index to the package that declared
/// it, used for an unexported selector's id (§4.3a: "the field's package set
/// to `nil` if exported, else the declaring package"). The literal itself
/// never carries a `type_name` — only the `Named` `TypeInfo` that points at
/// it as `underlying` does — so the owning package has to be found by
/// walking every non-alias `TypeName` back to the literal it denotes.
fn owning_packages(registry: &TypeRegistry) -> FxHashMap<TypeIndex, String> {
    let mut owners = FxHashMap::default();
    for (_, tn) in registry.type_names() {
        if tn.is_alias() {
            continue;
        }
        let underlying = registry.get(tn.denoted()).underlying;
        owners.entry(underlying).or_insert_with(|| tn.pkg_path.clone());
    }
    owners
}

fn struct_field_selectors(registry: &TypeRegistry, idx: TypeIndex, pkg_path: &str) -> Vec<Selector> {
    let Some(fields) = registry.get(idx).shape.as_struct() else { return Vec::new() };
    fields
        .iter()
        .map(|f| {
            let mode = if !f.embedded {
                FieldMode::None
            } else if registry.get(f.type_index).kind == TypeObjectKind::Pointer {
                FieldMode::Indirect
            } else {
                FieldMode::Direct
            };
            Selector::direct_field(&f.name, pkg_path, f.type_index, f.tag.clone(), mode)
        })
        .collect()
}

fn interface_selectors(registry: &TypeRegistry, idx: TypeIndex, pkg_path: &str) -> Vec<Selector> {
    let Some((methods, embeds)) = registry.get(idx).shape.as_interface() else { return Vec::new() };

    let mut out = Vec::with_capacity(methods.len() + embeds.len());
    for m in methods {
        let signature = MethodSignature::new(&m.name, pkg_path, m.params.clone(), m.results.clone(), m.variadic);
        out.push(Selector::direct_method(&m.name, pkg_path, signature, false));
    }
    for &embed in embeds {
        let name = embedded_field_name(registry, embed);
        out.push(Selector::direct_field(&name, pkg_path, embed, String::new(), FieldMode::Direct));
    }
    out
}

fn embedded_field_name(registry: &TypeRegistry, embed: TypeIndex) -> String {
    registry
        .get(embed)
        .type_name
        .map(|tn| registry.type_name(tn).name.clone())
        .unwrap_or_else(|| format!("<unnamed#{}>", embed.index()))
}
