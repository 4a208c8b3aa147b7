//! Ergonomic fixture construction for tests and the CLI demo.
//!
//! Builds a [`CheckedProgram`] the way a human would sketch the Go-like
//! source it represents, without hand-rolling `TypeObjectId` arithmetic.

use goindex_common::{Position, Span};

use crate::decl::{FuncDeclInput, ImportInput, ReceiverInput, TopLevelDecl, TypeDeclInput, ValueDeclInput, ValueKind};
use crate::package::{CheckedPackage, CheckedProgram};
use crate::types::{MethodDecl, QualifiedName, StructFieldDecl, TypeObject, TypeObjectId, TypeObjectKind};

#[derive(Default)]
pub struct ProgramBuilder {
    program: CheckedProgram,
}

impl ProgramBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, obj: TypeObject) -> TypeObjectId {
        let id = TypeObjectId(self.program.type_objects.len() as u32);
        self.program.type_objects.push(obj);
        id
    }

    /// Interns a predeclared basic type (`int`, `string`, `bool`, …),
    /// reusing an existing entry with the same name if one was already
    /// created — basics have no package and share identity by name alone,
    /// mirroring the checker's universe.
    pub fn basic(&mut self, name: &str) -> TypeObjectId {
        for (i, obj) in self.program.type_objects.iter().enumerate() {
            if obj.kind == TypeObjectKind::Basic && obj.name.as_ref().is_some_and(|q| q.name == name) {
                return TypeObjectId(i as u32);
            }
        }
        self.intern(TypeObject::basic(name))
    }

    pub fn unnamed_struct(&mut self, fields: Vec<StructFieldDecl>) -> TypeObjectId {
        self.intern(TypeObject::unnamed_struct(fields))
    }

    pub fn unnamed_interface(&mut self, methods: Vec<MethodDecl>, embeds: Vec<TypeObjectId>) -> TypeObjectId {
        self.intern(TypeObject::unnamed_interface(methods, embeds))
    }

    pub fn pointer(&mut self, elem: TypeObjectId) -> TypeObjectId {
        self.intern(TypeObject::pointer(elem))
    }

    /// Direct access to an already-interned type object, for fixtures that
    /// need to patch a self-referential shape in place (e.g. an interface
    /// that embeds the very named type it is the underlying of — there's no
    /// other way to close that cycle without a two-step construction).
    pub fn type_object_mut(&mut self, id: TypeObjectId) -> &mut TypeObject {
        &mut self.program.type_objects[id.0 as usize]
    }

    pub fn slice(&mut self, elem: TypeObjectId) -> TypeObjectId {
        self.intern(TypeObject::slice(elem))
    }

    /// Declares a named type `pkg.name` with the given underlying type and
    /// registers the `type` declaration in `pkg`. Returns the new type's id
    /// (the `Named` object, not the underlying).
    pub fn declare_named(
        &mut self,
        pkg: &mut PackageBuilderHandle,
        name: &str,
        exported: bool,
        underlying: TypeObjectId,
    ) -> TypeObjectId {
        let qname = QualifiedName::new(pkg.import_path.clone(), name);
        let named_id = self.intern(TypeObject::named(qname, underlying));
        self.package_mut(pkg).decls.push(TopLevelDecl::Type(TypeDeclInput {
            name: name.to_string(),
            exported,
            pos: fixture_pos(pkg, name),
            rhs: named_id,
            alias: false,
        }));
        named_id
    }

    /// Declares a type alias `type name = underlying` in `pkg`.
    pub fn declare_alias(
        &mut self,
        pkg: &mut PackageBuilderHandle,
        name: &str,
        exported: bool,
        denoted: TypeObjectId,
    ) {
        self.package_mut(pkg).decls.push(TopLevelDecl::Type(TypeDeclInput {
            name: name.to_string(),
            exported,
            pos: fixture_pos(pkg, name),
            rhs: denoted,
            alias: true,
        }));
    }

    /// Declares a concrete method `func (recv Type) name(params) results`.
    pub fn declare_method(
        &mut self,
        pkg: &mut PackageBuilderHandle,
        receiver_type: &str,
        pointer_receiver: bool,
        name: &str,
        exported: bool,
        params: Vec<TypeObjectId>,
        results: Vec<TypeObjectId>,
    ) {
        self.package_mut(pkg).decls.push(TopLevelDecl::Func(FuncDeclInput {
            name: name.to_string(),
            exported,
            pos: fixture_pos(pkg, name),
            receiver: Some(ReceiverInput { type_name: receiver_type.to_string(), pointer: pointer_receiver }),
            params,
            results,
            variadic: false,
        }));
    }

    /// Declares a free (non-method) function.
    pub fn declare_func(
        &mut self,
        pkg: &mut PackageBuilderHandle,
        name: &str,
        exported: bool,
        params: Vec<TypeObjectId>,
        results: Vec<TypeObjectId>,
    ) {
        self.package_mut(pkg).decls.push(TopLevelDecl::Func(FuncDeclInput {
            name: name.to_string(),
            exported,
            pos: fixture_pos(pkg, name),
            receiver: None,
            params,
            results,
            variadic: false,
        }));
    }

    pub fn declare_value(
        &mut self,
        pkg: &mut PackageBuilderHandle,
        name: &str,
        exported: bool,
        kind: ValueKind,
        type_obj: TypeObjectId,
    ) {
        self.package_mut(pkg).decls.push(TopLevelDecl::Value(ValueDeclInput {
            name: name.to_string(),
            exported,
            pos: fixture_pos(pkg, name),
            type_obj,
            kind,
        }));
    }

    pub fn declare_import(&mut self, pkg: &mut PackageBuilderHandle, local_name: &str, imported_path: &str) {
        self.package_mut(pkg).decls.push(TopLevelDecl::Import(ImportInput {
            local_name: local_name.to_string(),
            imported_path: imported_path.to_string(),
        }));
    }

    pub fn package(&mut self, import_path: &str) -> PackageBuilderHandle {
        if !self.program.packages.iter().any(|p| p.import_path == import_path) {
            self.program.packages.push(CheckedPackage::new(import_path));
        }
        PackageBuilderHandle { import_path: import_path.to_string() }
    }

    pub fn depends_on(&mut self, pkg: &mut PackageBuilderHandle, dep_import_path: &str) {
        let p = self.package_mut(pkg);
        if !p.deps.iter().any(|d| d == dep_import_path) {
            p.deps.push(dep_import_path.to_string());
        }
    }

    pub fn mark_builtin_source(&mut self, pkg: &mut PackageBuilderHandle) {
        self.package_mut(pkg).is_builtin_source = true;
    }

    pub fn mark_universe(&mut self, pkg: &mut PackageBuilderHandle) {
        self.package_mut(pkg).is_universe = true;
    }

    fn package_mut(&mut self, pkg: &PackageBuilderHandle) -> &mut CheckedPackage {
        self.program.packages.iter_mut().find(|p| p.import_path == pkg.import_path).expect("package was registered")
    }

    #[must_use]
    pub fn finish(self) -> CheckedProgram {
        self.program
    }
}

/// Lightweight handle to a package under construction. Exists so callers
/// don't hold a `&mut CheckedPackage` across calls that also need `&mut
/// ProgramBuilder` to intern type objects.
pub struct PackageBuilderHandle {
    import_path: String,
}

fn fixture_pos(pkg: &PackageBuilderHandle, name: &str) -> Position {
    Position::new(format!("{}.go", pkg.import_path), Span::at(name.len() as u32))
}

/// Convenience constructor for a struct field.
#[must_use]
pub fn field(name: &str, type_obj: TypeObjectId, embedded: bool) -> StructFieldDecl {
    StructFieldDecl { name: name.to_string(), type_obj, tag: String::new(), embedded }
}

/// Convenience constructor for an interface method specification.
#[must_use]
pub fn method_spec(name: &str, params: Vec<TypeObjectId>, results: Vec<TypeObjectId>) -> MethodDecl {
    MethodDecl { name: name.to_string(), params, results, variadic: false }
}

pub type PackageBuilder = PackageBuilderHandle;
