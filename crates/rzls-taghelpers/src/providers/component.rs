//! Components: public, concrete classes implementing `IComponent`.
//!
//! Every component yields a short-name descriptor (`<Foo>`) and a
//! fully-qualified one (`<N.Foo>`), plus one child-content descriptor per
//! `RenderFragment` parameter of each.

use rustc_hash::FxHashSet;
use rzls_symbols::Compilation;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::PropertySymbol;
use rzls_symbols::Symbol;
use rzls_symbols::TypeId;
use rzls_symbols::TypeKind;
use rzls_symbols::TypeParameterSymbol;
use rzls_symbols::TypeRef;

use super::ProviderContext;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::BoundAttributeBuilder;
use crate::BoundAttributeDescriptor;
use crate::BuildError;
use crate::MetadataKey;
use crate::ProviderError;
use crate::TagHelperDescriptor;
use crate::TagHelperDescriptorBuilder;
use crate::TagHelperKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for ComponentTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "component"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        if context
            .well_known_type(self.name(), known::ICOMPONENT)
            .is_none()
        {
            return Ok(());
        }

        let compilation = context.compilation();
        let mut components = Vec::new();
        context.for_each_type(|id, symbol| {
            if is_component(compilation, id, symbol) && !context.excludes(symbol.is_editor_hidden()) {
                components.push(id);
            }
        });
        tracing::debug!(count = components.len(), "Found component types");

        for id in components {
            let component = ComponentType::new(context, id);
            for fully_qualified in [false, true] {
                let descriptor = component.build(fully_qualified)?;
                let child_contents = child_content_descriptors(&descriptor)?;
                context.add(descriptor);
                for child_content in child_contents {
                    context.add(child_content);
                }
            }
        }
        Ok(())
    }
}

fn is_component(compilation: &Compilation, id: TypeId, symbol: &NamedTypeSymbol) -> bool {
    symbol.type_kind() == TypeKind::Class
        && symbol.accessibility().is_public()
        && !symbol.is_abstract()
        && !symbol.is_static()
        && symbol.simple_name() != known::IMPORTS_COMPONENT_NAME
        && compilation.implements(id, known::ICOMPONENT)
}

/// The five mutually exclusive shapes of a component parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PropertyKind {
    Enum,
    ChildContent,
    EventCallback,
    Delegate { awaitable: bool },
    Plain,
}

impl PropertyKind {
    fn classify(compilation: &Compilation, ty: &TypeRef) -> Self {
        if compilation.is_enum(ty) {
            PropertyKind::Enum
        } else if ty.is_named(known::RENDER_FRAGMENT) || ty.is_named(known::RENDER_FRAGMENT_GENERIC)
        {
            PropertyKind::ChildContent
        } else if ty.is_named(known::EVENT_CALLBACK) || ty.is_named(known::EVENT_CALLBACK_GENERIC) {
            PropertyKind::EventCallback
        } else if compilation.is_delegate(ty) {
            PropertyKind::Delegate {
                awaitable: is_awaitable_delegate(compilation, ty),
            }
        } else {
            PropertyKind::Plain
        }
    }
}

/// Whether invoking the delegate yields something that can be awaited.
fn is_awaitable_delegate(compilation: &Compilation, ty: &TypeRef) -> bool {
    if let Some(invoke) = compilation.delegate_invoke(ty) {
        return invoke.is_async() || is_awaitable(compilation, invoke.return_type());
    }
    // `Func<..., TResult>` from an unloaded library.
    ty.metadata_name()
        .is_some_and(|name| name.starts_with("System.Func`"))
        && ty
            .type_arguments()
            .last()
            .is_some_and(|result| is_awaitable(compilation, result))
}

/// `Task`, `ValueTask`, or a type whose `GetAwaiter()` returns an awaiter.
fn is_awaitable(compilation: &Compilation, ty: &TypeRef) -> bool {
    if [
        known::TASK,
        known::TASK_GENERIC,
        known::VALUE_TASK,
        known::VALUE_TASK_GENERIC,
    ]
    .iter()
    .any(|name| ty.is_named(name))
    {
        return true;
    }
    let Some(id) = compilation.resolve(ty) else {
        return false;
    };
    compilation
        .find_method(id, "GetAwaiter")
        .filter(|method| method.parameters().is_empty())
        .and_then(|method| compilation.resolve(method.return_type()))
        .is_some_and(|awaiter| has_awaiter_shape(compilation, awaiter))
}

/// `bool IsCompleted`, `void OnCompleted(Action)` and `GetResult()`.
fn has_awaiter_shape(compilation: &Compilation, id: TypeId) -> bool {
    let is_completed = compilation
        .find_property(id, "IsCompleted")
        .is_some_and(|property| property.ty().is_named(known::BOOLEAN));
    let on_completed = compilation.find_method(id, "OnCompleted").is_some_and(|method| {
        method.returns_void()
            && matches!(method.parameters(), [continuation] if compilation.is_delegate(&continuation.ty))
    });
    let get_result = compilation
        .find_method(id, "GetResult")
        .is_some_and(|method| method.parameters().is_empty());
    is_completed && on_completed && get_result
}

/// A bindable component parameter.
#[derive(Debug)]
struct ComponentProperty<'a> {
    symbol: &'a PropertySymbol,
    kind: PropertyKind,
}

/// A component type with its bindable parameters already collected.
#[derive(Debug)]
struct ComponentType<'a> {
    symbol: &'a NamedTypeSymbol,
    assembly: &'a str,
    properties: Vec<ComponentProperty<'a>>,
}

impl<'a> ComponentType<'a> {
    fn new(context: &ProviderContext<'a>, id: TypeId) -> Self {
        let compilation = context.compilation();
        Self {
            symbol: compilation.type_symbol(id),
            assembly: compilation.assembly_of(id).name(),
            properties: bindable_properties(context, id),
        }
    }

    fn build(&self, fully_qualified: bool) -> Result<TagHelperDescriptor, BuildError> {
        let type_name = self.symbol.display_name();
        let tag_name = if fully_qualified {
            self.symbol.full_name()
        } else {
            self.symbol.simple_name().to_string()
        };

        let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
            TagHelperKind::Component,
            &type_name,
            self.assembly,
        );
        builder
            .set_case_sensitive(true)
            .set_documentation(self.symbol.documentation().map(str::to_string));
        let metadata = builder.metadata_mut();
        metadata.set_text(MetadataKey::RuntimeName, known::runtime::COMPONENT);
        metadata.set_text(MetadataKey::TypeName, &type_name);
        metadata.set_text(MetadataKey::TypeNamespace, self.type_namespace());
        metadata.set_text(MetadataKey::TypeNameIdentifier, self.symbol.simple_name());
        if self.symbol.is_generic() {
            metadata.set_flag(MetadataKey::GenericTyped, true);
        }
        if fully_qualified {
            metadata.set_flag(MetadataKey::FullyQualifiedNameMatch, true);
        }

        builder.tag_matching_rule(|rule| {
            rule.set_tag_name(tag_name);
        });

        for property in &self.properties {
            builder.bind_attribute(|attribute| {
                configure_property(attribute, &type_name, property);
            });
        }

        let cascading = self.cascading_type_parameters();
        for parameter in self.symbol.type_parameters() {
            builder.bind_attribute(|attribute| {
                configure_type_parameter(
                    attribute,
                    &type_name,
                    parameter,
                    cascading.contains(parameter.name.as_str()),
                );
            });
        }

        if self.needs_context_attribute() {
            builder.bind_attribute(|attribute| {
                configure_context(attribute, None);
            });
        }

        builder.build()
    }

    /// Namespace for top-level types, containing type for nested ones.
    fn type_namespace(&self) -> String {
        match self.symbol.containing_type() {
            Some(containing) => rzls_symbols::display_metadata_name(containing),
            None => self.symbol.namespace().to_string(),
        }
    }

    /// Type parameters named by `[CascadingTypeParameter]`.
    fn cascading_type_parameters(&self) -> FxHashSet<&'a str> {
        self.symbol
            .attributes_of(known::CASCADING_TYPE_PARAMETER_ATTRIBUTE)
            .filter_map(|attribute| attribute.constructor_argument(0)?.as_str())
            .collect()
    }

    /// A shared `Context` is offered once several child contents take a
    /// parameter and the component declares none itself.
    fn needs_context_attribute(&self) -> bool {
        let parameterized = self
            .properties
            .iter()
            .filter(|property| {
                property.kind == PropertyKind::ChildContent
                    && !property.symbol.ty().is_named(known::RENDER_FRAGMENT)
            })
            .count();
        parameterized > 1
            && !self.properties.iter().any(|property| {
                property
                    .symbol
                    .name()
                    .eq_ignore_ascii_case(known::CHILD_CONTENT_PARAMETER_NAME)
            })
    }
}

/// Walk the type and its bases, most derived first, stopping at
/// `ComponentBase`. The first declaration of a name decides it, so a
/// derived member shadows a base member of the same name.
fn bindable_properties<'a>(context: &ProviderContext<'a>, id: TypeId) -> Vec<ComponentProperty<'a>> {
    let compilation = context.compilation();
    let mut seen = FxHashSet::default();
    let mut properties = Vec::new();

    for current in compilation.type_and_base_types(id) {
        let symbol = compilation.type_symbol(current);
        if symbol.metadata_name() == known::COMPONENT_BASE {
            break;
        }
        for property in symbol.properties() {
            if seen.contains(property.name()) {
                continue;
            }
            let has_parameter = property.has_attribute(known::PARAMETER_ATTRIBUTE);
            if !has_parameter && property.is_override() {
                // The base declaration decides.
                continue;
            }
            seen.insert(property.name());

            let bindable = has_parameter
                && property.accessibility().is_public()
                && !property.is_indexer()
                && property.has_public_setter()
                && !property.is_static()
                && !context.excludes(property.is_editor_hidden());
            if bindable {
                properties.push(ComponentProperty {
                    symbol: property,
                    kind: PropertyKind::classify(compilation, property.ty()),
                });
            }
        }
    }
    properties
}

fn configure_property(attribute: &mut BoundAttributeBuilder, owner: &str, property: &ComponentProperty<'_>) {
    let symbol = property.symbol;
    let ty = symbol.ty();
    attribute
        .set_name(symbol.name())
        .set_type_name(ty.full_name())
        .set_property_name(symbol.name())
        .set_is_editor_required(symbol.has_attribute(known::EDITOR_REQUIRED_ATTRIBUTE))
        .set_documentation(symbol.documentation().map(str::to_string))
        .set_display_name(format!("{} {owner}.{}", ty.full_name(), symbol.name()))
        .set_is_enum(property.kind == PropertyKind::Enum);

    let metadata = attribute.metadata_mut();
    match property.kind {
        PropertyKind::ChildContent => metadata.set_flag(MetadataKey::ChildContent, true),
        PropertyKind::EventCallback => metadata.set_flag(MetadataKey::EventCallback, true),
        PropertyKind::Delegate { awaitable } => {
            metadata.set_flag(MetadataKey::DelegateSignature, true);
            if awaitable {
                metadata.set_flag(MetadataKey::DelegateWithAwaitableResult, true);
            }
        }
        PropertyKind::Enum | PropertyKind::Plain => {}
    }
    if ty.contains_type_parameter() {
        metadata.set_flag(MetadataKey::GenericTyped, true);
    }
}

fn configure_type_parameter(
    attribute: &mut BoundAttributeBuilder,
    owner: &str,
    parameter: &TypeParameterSymbol,
    cascading: bool,
) {
    let name = parameter.name.as_str();
    attribute
        .set_name(name)
        .set_type_name(known::TYPE)
        .set_property_name(name)
        .set_documentation(Some(format!(
            "Specifies the type of the type parameter {name} for the {owner} component."
        )));

    let metadata = attribute.metadata_mut();
    metadata.set_flag(MetadataKey::TypeParameter, true);
    if cascading {
        metadata.set_flag(MetadataKey::TypeParameterIsCascading, true);
    }
    if let Some(constraints) = constraint_clause(parameter) {
        metadata.set_text(MetadataKey::TypeParameterConstraints, constraints);
    }
}

/// `where T : class, IFoo, new()`: the primary constraint first, then
/// type constraints, then the constructor constraint.
fn constraint_clause(parameter: &TypeParameterSymbol) -> Option<String> {
    let mut constraints = Vec::new();
    if parameter.has_reference_type_constraint {
        constraints.push("class".to_string());
    }
    if parameter.has_notnull_constraint {
        constraints.push("notnull".to_string());
    }
    if parameter.has_unmanaged_constraint {
        constraints.push("unmanaged".to_string());
    } else if parameter.has_value_type_constraint {
        constraints.push("struct".to_string());
    }
    constraints.extend(parameter.constraint_types.iter().map(TypeRef::display));
    if parameter.has_constructor_constraint {
        constraints.push("new()".to_string());
    }

    if constraints.is_empty() {
        None
    } else {
        Some(format!("where {} : {}", parameter.name, constraints.join(", ")))
    }
}

/// The `Context` attribute naming a child content's parameter, for one
/// child content or, with `None`, for all of a component's.
fn configure_context(attribute: &mut BoundAttributeBuilder, child_content: Option<&str>) {
    let documentation = match child_content {
        Some(name) => format!("Specifies the parameter name for the '{name}' child content expression."),
        None => "Specifies the parameter name for all child content expressions.".to_string(),
    };
    attribute
        .set_name(known::CHILD_CONTENT_PARAMETER_NAME)
        .set_type_name(known::STRING)
        .set_property_name(known::CHILD_CONTENT_PARAMETER_NAME)
        .set_documentation(Some(documentation));
    attribute
        .metadata_mut()
        .set_flag(MetadataKey::ChildContentParameterName, true);
}

/// One descriptor per child content attribute of `component`, matching
/// only directly inside the component's own tag.
fn child_content_descriptors(
    component: &TagHelperDescriptor,
) -> Result<Vec<TagHelperDescriptor>, BuildError> {
    let Some(parent_tag) = component
        .tag_matching_rules()
        .first()
        .map(|rule| rule.tag_name().to_string())
    else {
        return Ok(Vec::new());
    };

    component
        .bound_attributes()
        .iter()
        .filter(|attribute| attribute.is_child_content_property())
        .map(|attribute| build_child_content(component, attribute, &parent_tag))
        .collect()
}

fn build_child_content(
    component: &TagHelperDescriptor,
    attribute: &BoundAttributeDescriptor,
    parent_tag: &str,
) -> Result<TagHelperDescriptor, BuildError> {
    let name = format!("{}.{}", component.name(), attribute.name());
    let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
        TagHelperKind::ChildContent,
        name,
        component.assembly_name(),
    );
    builder
        .set_case_sensitive(true)
        .set_documentation(attribute.documentation().map(str::to_string));
    let metadata = builder.metadata_mut();
    metadata.set_text(MetadataKey::RuntimeName, known::runtime::NONE);
    if let Some(type_name) = component.type_name() {
        metadata.set_text(MetadataKey::TypeName, type_name);
    }
    if component.is_fully_qualified_name_match() {
        metadata.set_flag(MetadataKey::FullyQualifiedNameMatch, true);
    }

    builder.tag_matching_rule(|rule| {
        rule.set_tag_name(attribute.name())
            .set_parent_tag(Some(parent_tag.to_string()));
    });
    if attribute.is_parameterized_child_content_property() {
        builder.bind_attribute(|context| {
            configure_context(context, Some(attribute.name()));
        });
    }
    builder.build()
}
