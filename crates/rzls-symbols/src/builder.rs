//! Fluent construction of small symbol graphs.
//!
//! ```
//! use rzls_symbols::CompilationBuilder;
//! use rzls_symbols::PropertyBuilder;
//! use rzls_symbols::TypeBuilder;
//! use rzls_symbols::TypeRef;
//!
//! let compilation = CompilationBuilder::new("App")
//!     .with_type(
//!         TypeBuilder::class("App.Counter")
//!             .property(PropertyBuilder::new("Count", TypeRef::int())),
//!     )
//!     .build()
//!     .unwrap();
//! assert!(compilation.get_type_by_metadata_name("App.Counter").is_some());
//! ```

use crate::compilation::AssemblyDef;
use crate::symbols::Accessibility;
use crate::symbols::AttributeData;
use crate::symbols::MethodSymbol;
use crate::symbols::NamedTypeSymbol;
use crate::symbols::ParameterSymbol;
use crate::symbols::PropertySymbol;
use crate::symbols::TypeKind;
use crate::symbols::TypeParameterSymbol;
use crate::Compilation;
use crate::SymbolLoadError;
use crate::TypeRef;

#[derive(Debug, Clone)]
pub struct CompilationBuilder {
    primary: AssemblyBuilder,
    references: Vec<AssemblyBuilder>,
}

impl CompilationBuilder {
    #[must_use]
    pub fn new(assembly_name: impl Into<String>) -> Self {
        Self {
            primary: AssemblyBuilder::new(assembly_name),
            references: Vec::new(),
        }
    }

    /// Add a type to the primary assembly.
    #[must_use]
    pub fn with_type(mut self, ty: TypeBuilder) -> Self {
        self.primary = self.primary.with_type(ty);
        self
    }

    #[must_use]
    pub fn reference(mut self, assembly: AssemblyBuilder) -> Self {
        self.references.push(assembly);
        self
    }

    pub fn build(self) -> Result<Compilation, SymbolLoadError> {
        Compilation::new(
            self.primary.into_def(),
            self.references
                .into_iter()
                .map(AssemblyBuilder::into_def)
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct AssemblyBuilder {
    name: String,
    types: Vec<NamedTypeSymbol>,
}

impl AssemblyBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeBuilder) -> Self {
        self.types.push(ty.symbol);
        self
    }

    #[must_use]
    pub fn into_def(self) -> AssemblyDef {
        AssemblyDef {
            name: self.name,
            types: self.types,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeBuilder {
    symbol: NamedTypeSymbol,
}

impl TypeBuilder {
    /// Start a type from its dotted full name; the last segment is the
    /// simple name, the rest the namespace.
    fn new(full_name: &str, kind: TypeKind) -> Self {
        let (namespace, name) = full_name.rsplit_once('.').unwrap_or(("", full_name));
        Self {
            symbol: NamedTypeSymbol {
                name: name.to_string(),
                namespace: namespace.to_string(),
                containing_type: None,
                kind,
                accessibility: Accessibility::Public,
                is_abstract: kind == TypeKind::Interface,
                is_static: false,
                base_type: None,
                interfaces: Vec::new(),
                type_parameters: Vec::new(),
                attributes: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
                documentation: None,
                metadata_name: String::new(),
                nested_types: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn class(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Class)
    }

    #[must_use]
    pub fn structure(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Struct)
    }

    #[must_use]
    pub fn interface(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Interface)
    }

    #[must_use]
    pub fn enumeration(full_name: &str) -> Self {
        Self::new(full_name, TypeKind::Enum)
    }

    /// A delegate type whose `Invoke` takes `parameters` and returns
    /// `returns`.
    #[must_use]
    pub fn delegate(full_name: &str, parameters: Vec<TypeRef>, returns: TypeRef) -> Self {
        let invoke = parameters
            .into_iter()
            .enumerate()
            .fold(MethodBuilder::new("Invoke", returns), |method, (index, ty)| {
                method.parameter(format!("arg{index}"), ty)
            });
        Self::new(full_name, TypeKind::Delegate).method(invoke)
    }

    /// Nest this type inside the type with the given metadata name.
    #[must_use]
    pub fn nested_in(mut self, containing_metadata_name: impl Into<String>) -> Self {
        self.symbol.containing_type = Some(containing_metadata_name.into());
        self
    }

    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.symbol.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.symbol.is_abstract = true;
        self
    }

    #[must_use]
    pub fn static_type(mut self) -> Self {
        self.symbol.is_static = true;
        self
    }

    #[must_use]
    pub fn base(mut self, base: TypeRef) -> Self {
        self.symbol.base_type = Some(base);
        self
    }

    #[must_use]
    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.symbol.interfaces.push(interface);
        self
    }

    #[must_use]
    pub fn type_parameter(mut self, parameter: TypeParameterSymbol) -> Self {
        self.symbol.type_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.symbol.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.symbol.properties.push(property.symbol);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.symbol.methods.push(method.symbol);
        self
    }

    #[must_use]
    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.symbol.documentation = Some(documentation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    symbol: PropertySymbol,
}

impl PropertyBuilder {
    /// A public instance property with public getter and setter.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            symbol: PropertySymbol {
                name: name.into(),
                ty,
                accessibility: Accessibility::Public,
                getter: Some(Accessibility::Public),
                setter: Some(Accessibility::Public),
                is_static: false,
                is_override: false,
                parameters: Vec::new(),
                attributes: Vec::new(),
                documentation: None,
            },
        }
    }

    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.symbol.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn getter(mut self, getter: Option<Accessibility>) -> Self {
        self.symbol.getter = getter;
        self
    }

    #[must_use]
    pub fn setter(mut self, setter: Option<Accessibility>) -> Self {
        self.symbol.setter = setter;
        self
    }

    #[must_use]
    pub fn read_only(self) -> Self {
        self.setter(None)
    }

    #[must_use]
    pub fn static_property(mut self) -> Self {
        self.symbol.is_static = true;
        self
    }

    #[must_use]
    pub fn overrides(mut self) -> Self {
        self.symbol.is_override = true;
        self
    }

    /// Make this an indexer with one more parameter.
    #[must_use]
    pub fn indexer_parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.symbol.parameters.push(ParameterSymbol::new(name, ty));
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.symbol.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.symbol.documentation = Some(documentation.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct MethodBuilder {
    symbol: MethodSymbol,
}

impl MethodBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            symbol: MethodSymbol {
                name: name.into(),
                accessibility: Accessibility::Public,
                is_static: false,
                is_async: false,
                parameters: Vec::new(),
                return_type,
                attributes: Vec::new(),
                documentation: None,
            },
        }
    }

    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.symbol.parameters.push(ParameterSymbol::new(name, ty));
        self
    }

    #[must_use]
    pub fn async_method(mut self) -> Self {
        self.symbol.is_async = true;
        self
    }

    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.symbol.is_static = true;
        self
    }

    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.symbol.accessibility = accessibility;
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeData) -> Self {
        self.symbol.attributes.push(attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Symbol;

    #[test]
    fn splits_namespace_from_name() {
        let compilation = CompilationBuilder::new("App")
            .with_type(TypeBuilder::class("App.Shared.Nav"))
            .with_type(TypeBuilder::class("Global"))
            .build()
            .unwrap();
        let nav = compilation.get_type_by_metadata_name("App.Shared.Nav").unwrap();
        assert_eq!(compilation.type_symbol(nav).namespace(), "App.Shared");
        assert!(compilation.get_type_by_metadata_name("Global").is_some());
    }

    #[test]
    fn generic_types_carry_arity() {
        let compilation = CompilationBuilder::new("App")
            .with_type(
                TypeBuilder::class("App.Grid")
                    .type_parameter(TypeParameterSymbol::new("TItem")),
            )
            .build()
            .unwrap();
        let grid = compilation.get_type_by_metadata_name("App.Grid`1").unwrap();
        let symbol = compilation.type_symbol(grid);
        assert_eq!(symbol.display_name(), "App.Grid<TItem>");
        assert_eq!(symbol.full_name(), "App.Grid");
        assert_eq!(symbol.name(), "Grid");
    }

    #[test]
    fn delegate_has_invoke() {
        let compilation = CompilationBuilder::new("App")
            .with_type(TypeBuilder::delegate(
                "App.Handler",
                vec![TypeRef::string()],
                TypeRef::void(),
            ))
            .build()
            .unwrap();
        let handler = TypeRef::named("App.Handler");
        assert!(compilation.is_delegate(&handler));
        let invoke = compilation.delegate_invoke(&handler).unwrap();
        assert_eq!(invoke.parameters().len(), 1);
        assert!(invoke.returns_void());
    }

    #[test]
    fn unresolved_framework_delegates() {
        let compilation = CompilationBuilder::new("App").build().unwrap();
        assert!(compilation.is_delegate(&TypeRef::named("System.Action")));
        assert!(compilation.is_delegate(&TypeRef::generic(
            "System.Func`1",
            vec![TypeRef::named("System.Threading.Tasks.Task")]
        )));
        assert!(!compilation.is_delegate(&TypeRef::string()));
    }
}
