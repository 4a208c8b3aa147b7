//! A small built-in fixture, used when `goindex` is run without
//! `--fixture`, exercising the scenarios `SPEC_FULL.md` §8 names: a
//! value-receiver implementer, a pointer-receiver-only implementer, and an
//! embedded-field struct.

use goindex_input::builder::{field, method_spec};
use goindex_input::{CheckedProgram, ProgramBuilder, ValueKind};

#[must_use]
pub fn build_demo_program() -> CheckedProgram {
    let mut b = ProgramBuilder::new();
    let mut pkg = b.package("example.com/shapes");

    let float64 = b.basic("float64");
    let string = b.basic("string");

    let shaper_iface = b.unnamed_interface(vec![method_spec("Area", vec![], vec![float64])], vec![]);
    let shaper = b.declare_named(&mut pkg, "Shaper", true, shaper_iface);

    // Circle implements Shaper with a value receiver.
    let circle_struct = b.unnamed_struct(vec![field("Radius", float64, false)]);
    b.declare_named(&mut pkg, "Circle", true, circle_struct);
    b.declare_method(&mut pkg, "Circle", false, "Area", true, vec![], vec![float64]);

    // Square implements Shaper only through *Square.
    let square_struct = b.unnamed_struct(vec![field("Side", float64, false)]);
    let square = b.declare_named(&mut pkg, "Square", true, square_struct);
    b.declare_method(&mut pkg, "Square", true, "Area", true, vec![], vec![float64]);

    // Reference *Square somewhere so it's actually registered.
    let square_ptr = b.pointer(square);
    b.declare_value(&mut pkg, "DefaultSquare", true, ValueKind::Var, square_ptr);

    // A free function taking the interface, to populate cross-references.
    b.declare_func(&mut pkg, "Describe", true, vec![shaper], vec![string]);

    b.finish()
}
