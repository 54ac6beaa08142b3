use serde::Deserialize;
use serde::Serialize;

use crate::compilation::TypeId;
use crate::types::display_metadata_name;
use crate::TypeRef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    #[default]
    Public,
    Internal,
    Protected,
    ProtectedInternal,
    Private,
}

impl Accessibility {
    #[must_use]
    pub fn is_public(self) -> bool {
        self == Accessibility::Public
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    NamedType,
    Property,
    Method,
}

/// A constant argument of an attribute application, already evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypedConstant {
    Null,
    Bool(bool),
    Int(i64),
    String(String),
    Type(TypeRef),
    Enum { type_name: String, value: i64 },
    Array(Vec<TypedConstant>),
}

impl TypedConstant {
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        TypedConstant::String(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedConstant::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedConstant::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer value of an integral or enum constant.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedConstant::Int(value) | TypedConstant::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_type(&self) -> Option<&TypeRef> {
        match self {
            TypedConstant::Type(ty) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, TypedConstant::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedArgument {
    pub name: String,
    pub value: TypedConstant,
}

/// An attribute applied to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeData {
    /// Metadata name of the attribute class.
    pub class: String,
    #[serde(default)]
    pub constructor_arguments: Vec<TypedConstant>,
    #[serde(default)]
    pub named_arguments: Vec<NamedArgument>,
}

impl AttributeData {
    #[must_use]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            constructor_arguments: Vec::new(),
            named_arguments: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, value: TypedConstant) -> Self {
        self.constructor_arguments.push(value);
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>, value: TypedConstant) -> Self {
        self.named_arguments.push(NamedArgument {
            name: name.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn is(&self, class: &str) -> bool {
        self.class == class
    }

    #[must_use]
    pub fn constructor_argument(&self, index: usize) -> Option<&TypedConstant> {
        self.constructor_arguments.get(index)
    }

    #[must_use]
    pub fn named_argument(&self, name: &str) -> Option<&TypedConstant> {
        self.named_arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

/// Common capabilities of every symbol kind.
pub trait Symbol {
    fn kind(&self) -> SymbolKind;

    fn name(&self) -> &str;

    fn attributes(&self) -> &[AttributeData];

    fn accessibility(&self) -> Accessibility;

    fn documentation(&self) -> Option<&str>;

    fn attribute(&self, class: &str) -> Option<&AttributeData> {
        self.attributes().iter().find(|attribute| attribute.is(class))
    }

    fn has_attribute(&self, class: &str) -> bool {
        self.attribute(class).is_some()
    }

    fn attributes_of<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a AttributeData> + 'a {
        self.attributes()
            .iter()
            .filter(move |attribute| attribute.is(class))
    }

    /// `[EditorBrowsable(EditorBrowsableState.Never)]`.
    fn is_editor_hidden(&self) -> bool {
        self.attributes_of("System.ComponentModel.EditorBrowsableAttribute")
            .any(|attribute| {
                attribute
                    .constructor_argument(0)
                    .and_then(TypedConstant::as_int)
                    == Some(EDITOR_BROWSABLE_NEVER)
            })
    }
}

const EDITOR_BROWSABLE_NEVER: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

impl ParameterSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) ty: TypeRef,
    #[serde(default)]
    pub(crate) accessibility: Accessibility,
    #[serde(default = "public_accessor")]
    pub(crate) getter: Option<Accessibility>,
    #[serde(default = "public_accessor")]
    pub(crate) setter: Option<Accessibility>,
    #[serde(default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) is_override: bool,
    #[serde(default)]
    pub(crate) parameters: Vec<ParameterSymbol>,
    #[serde(default)]
    pub(crate) attributes: Vec<AttributeData>,
    #[serde(default)]
    pub(crate) documentation: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn public_accessor() -> Option<Accessibility> {
    Some(Accessibility::Public)
}

impl PropertySymbol {
    #[must_use]
    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    #[must_use]
    pub fn getter(&self) -> Option<Accessibility> {
        self.getter
    }

    #[must_use]
    pub fn setter(&self) -> Option<Accessibility> {
        self.setter
    }

    #[must_use]
    pub fn has_public_getter(&self) -> bool {
        self.getter.is_some_and(Accessibility::is_public)
    }

    #[must_use]
    pub fn has_public_setter(&self) -> bool {
        self.setter.is_some_and(Accessibility::is_public)
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[must_use]
    pub fn is_override(&self) -> bool {
        self.is_override
    }

    #[must_use]
    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterSymbol] {
        &self.parameters
    }
}

impl Symbol for PropertySymbol {
    fn kind(&self) -> SymbolKind {
        SymbolKind::Property
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeData] {
        &self.attributes
    }

    fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) accessibility: Accessibility,
    #[serde(default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) is_async: bool,
    #[serde(default)]
    pub(crate) parameters: Vec<ParameterSymbol>,
    #[serde(default = "TypeRef::void")]
    pub(crate) return_type: TypeRef,
    #[serde(default)]
    pub(crate) attributes: Vec<AttributeData>,
    #[serde(default)]
    pub(crate) documentation: Option<String>,
}

impl MethodSymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[must_use]
    pub fn is_async(&self) -> bool {
        self.is_async
    }

    #[must_use]
    pub fn parameters(&self) -> &[ParameterSymbol] {
        &self.parameters
    }

    #[must_use]
    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    #[must_use]
    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }
}

impl Symbol for MethodSymbol {
    fn kind(&self) -> SymbolKind {
        SymbolKind::Method
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeData] {
        &self.attributes
    }

    fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

/// A generic type parameter and its constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeParameterSymbol {
    pub name: String,
    pub has_reference_type_constraint: bool,
    pub has_value_type_constraint: bool,
    pub has_unmanaged_constraint: bool,
    pub has_notnull_constraint: bool,
    pub has_constructor_constraint: bool,
    pub constraint_types: Vec<TypeRef>,
}

impl TypeParameterSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_constraints(&self) -> bool {
        self.has_reference_type_constraint
            || self.has_value_type_constraint
            || self.has_unmanaged_constraint
            || self.has_notnull_constraint
            || self.has_constructor_constraint
            || !self.constraint_types.is_empty()
    }
}

/// A class, struct, interface, enum or delegate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedTypeSymbol {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) namespace: String,
    /// Metadata name of the enclosing type, for nested types.
    #[serde(default)]
    pub(crate) containing_type: Option<String>,
    #[serde(default)]
    pub(crate) kind: TypeKind,
    #[serde(default)]
    pub(crate) accessibility: Accessibility,
    #[serde(default)]
    pub(crate) is_abstract: bool,
    #[serde(default)]
    pub(crate) is_static: bool,
    #[serde(default)]
    pub(crate) base_type: Option<TypeRef>,
    #[serde(default)]
    pub(crate) interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub(crate) type_parameters: Vec<TypeParameterSymbol>,
    #[serde(default)]
    pub(crate) attributes: Vec<AttributeData>,
    #[serde(default)]
    pub(crate) properties: Vec<PropertySymbol>,
    #[serde(default)]
    pub(crate) methods: Vec<MethodSymbol>,
    #[serde(default)]
    pub(crate) documentation: Option<String>,
    #[serde(skip)]
    pub(crate) metadata_name: String,
    #[serde(skip)]
    pub(crate) nested_types: Vec<TypeId>,
}

impl NamedTypeSymbol {
    /// Simple name without namespace or arity.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `Ns.Outer+Inner`1` form; unique within an assembly.
    #[must_use]
    pub fn metadata_name(&self) -> &str {
        &self.metadata_name
    }

    #[must_use]
    pub fn containing_type(&self) -> Option<&str> {
        self.containing_type.as_deref()
    }

    #[must_use]
    pub fn type_kind(&self) -> TypeKind {
        self.kind
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    #[must_use]
    pub fn is_delegate(&self) -> bool {
        self.kind == TypeKind::Delegate
    }

    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    #[must_use]
    pub fn base_type(&self) -> Option<&TypeRef> {
        self.base_type.as_ref()
    }

    /// Directly declared interfaces.
    #[must_use]
    pub fn interfaces(&self) -> &[TypeRef] {
        &self.interfaces
    }

    #[must_use]
    pub fn type_parameters(&self) -> &[TypeParameterSymbol] {
        &self.type_parameters
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertySymbol] {
        &self.properties
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodSymbol] {
        &self.methods
    }

    #[must_use]
    pub fn nested_types(&self) -> &[TypeId] {
        &self.nested_types
    }

    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<&PropertySymbol> {
        self.properties.iter().find(|property| property.name == name)
    }

    #[must_use]
    pub fn find_method(&self, name: &str) -> Option<&MethodSymbol> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// Source-form name without type parameters: `Ns.Outer.Inner`.
    #[must_use]
    pub fn full_name(&self) -> String {
        display_metadata_name(&self.metadata_name)
    }

    /// Source-form name with type parameters: `Ns.Outer.Inner<T>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut display = self.full_name();
        if self.is_generic() {
            display.push('<');
            let names = self
                .type_parameters
                .iter()
                .map(|parameter| parameter.name.as_str())
                .collect::<Vec<_>>();
            display.push_str(&names.join(", "));
            display.push('>');
        }
        display
    }

    /// A reference to this type with its own type parameters as arguments.
    #[must_use]
    pub fn to_type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.metadata_name.clone(),
            self.type_parameters
                .iter()
                .map(|parameter| TypeRef::type_parameter(parameter.name.clone()))
                .collect(),
        )
    }

    /// Metadata-name segment this type contributes: `Name` or `Name`N`.
    pub(crate) fn metadata_segment(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}`{}", self.name, self.type_parameters.len())
        }
    }
}

impl Symbol for NamedTypeSymbol {
    fn kind(&self) -> SymbolKind {
        SymbolKind::NamedType
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[AttributeData] {
        &self.attributes
    }

    fn accessibility(&self) -> Accessibility {
        self.accessibility
    }

    fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}
