//! Reflection-based tag helpers: concrete types implementing `ITagHelper`.

use rustc_hash::FxHashSet;
use rzls_symbols::AttributeData;
use rzls_symbols::Compilation;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::PropertySymbol;
use rzls_symbols::Symbol;
use rzls_symbols::TypeId;
use rzls_symbols::TypeKind;
use rzls_symbols::TypeRef;
use rzls_symbols::TypedConstant;

use super::ProviderContext;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::parse_required_attributes;
use crate::to_html_case;
use crate::BoundAttributeBuilder;
use crate::BuildError;
use crate::MetadataKey;
use crate::ProviderError;
use crate::TagHelperDescriptor;
use crate::TagHelperDescriptorBuilder;
use crate::TagHelperDiagnostic;
use crate::TagHelperKind;
use crate::TagMatchingRuleBuilder;
use crate::TagStructure;
use crate::ELEMENT_CATCH_ALL_TARGET;

const DICTIONARY: &str = "System.Collections.Generic.Dictionary`2";

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for DefaultTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "default"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        if context
            .well_known_type(self.name(), known::ITAG_HELPER)
            .is_none()
        {
            return Ok(());
        }

        let compilation = context.compilation();
        let mut tag_helpers = Vec::new();
        context.for_each_type(|id, symbol| {
            if is_tag_helper(compilation, id, symbol) && !context.excludes(symbol.is_editor_hidden()) {
                tag_helpers.push(id);
            }
        });

        for id in tag_helpers {
            let descriptor = build_tag_helper(context, id)?;
            context.add(descriptor);
        }
        Ok(())
    }
}

fn is_tag_helper(compilation: &Compilation, id: TypeId, symbol: &NamedTypeSymbol) -> bool {
    symbol.type_kind() != TypeKind::Interface
        && symbol.accessibility().is_public()
        && !symbol.is_abstract()
        && !symbol.is_generic()
        && compilation.implements(id, known::ITAG_HELPER)
}

fn build_tag_helper(context: &ProviderContext<'_>, id: TypeId) -> Result<TagHelperDescriptor, BuildError> {
    let compilation = context.compilation();
    let symbol = compilation.type_symbol(id);
    let type_name = symbol.full_name();

    let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
        TagHelperKind::Default,
        &type_name,
        compilation.assembly_of(id).name(),
    );
    builder.set_documentation(symbol.documentation().map(str::to_string));
    let metadata = builder.metadata_mut();
    metadata.set_text(MetadataKey::TypeName, &type_name);
    metadata.set_text(MetadataKey::RuntimeName, known::runtime::TAG_HELPER);

    let targets: Vec<_> = symbol
        .attributes_of(known::HTML_TARGET_ELEMENT_ATTRIBUTE)
        .collect();
    if targets.is_empty() {
        let name = symbol.simple_name();
        let name = name.strip_suffix(known::TAG_HELPER_SUFFIX).unwrap_or(name);
        builder.tag_matching_rule(|rule| {
            rule.set_tag_name(to_html_case(name));
        });
    }
    for target in targets {
        builder.tag_matching_rule(|rule| configure_target(rule, target));
    }

    if let Some(restrict) = symbol.attribute(known::RESTRICT_CHILDREN_ATTRIBUTE) {
        for child in restrict
            .constructor_arguments
            .iter()
            .flat_map(constant_strings)
        {
            builder.allow_child_tag(child);
        }
    }
    if let Some(hint) = symbol
        .attribute(known::OUTPUT_ELEMENT_HINT_ATTRIBUTE)
        .and_then(|hint| hint.constructor_argument(0))
        .and_then(TypedConstant::as_str)
    {
        builder.set_tag_output_hint(hint);
    }

    for property in accessible_properties(context, id) {
        builder.bind_attribute(|attribute| {
            configure_property(attribute, compilation, &type_name, property);
        });
    }

    builder.build()
}

/// One `[HtmlTargetElement]` declaration: tag (default `*`), parent tag,
/// tag structure and the required-attribute selector.
fn configure_target(rule: &mut TagMatchingRuleBuilder, target: &AttributeData) {
    let tag = target
        .constructor_argument(0)
        .and_then(TypedConstant::as_str)
        .unwrap_or(ELEMENT_CATCH_ALL_TARGET);
    rule.set_tag_name(tag);

    if let Some(parent) = target
        .named_argument("ParentTag")
        .and_then(TypedConstant::as_str)
    {
        rule.set_parent_tag(Some(parent.to_string()));
    }
    if let Some(structure) = target
        .named_argument("TagStructure")
        .and_then(TypedConstant::as_int)
    {
        rule.set_tag_structure(TagStructure::from_value(structure));
    }
    if let Some(selector) = target
        .named_argument("Attributes")
        .and_then(TypedConstant::as_str)
    {
        let parsed = parse_required_attributes(selector);
        for attribute in parsed.attributes {
            rule.push_required_attribute(attribute);
        }
        for diagnostic in parsed.diagnostics {
            rule.add_diagnostic(diagnostic);
        }
    }
}

/// A string, or every string inside an array.
fn constant_strings(constant: &TypedConstant) -> Vec<String> {
    match constant {
        TypedConstant::String(text) => vec![text.clone()],
        TypedConstant::Array(items) => items.iter().flat_map(constant_strings).collect(),
        _ => Vec::new(),
    }
}

/// Public instance properties with a public getter, derived first, the
/// first declaration of a name winning. A property must also be settable,
/// explicitly named or dictionary-shaped to become an attribute.
fn accessible_properties<'a>(context: &ProviderContext<'a>, id: TypeId) -> Vec<&'a PropertySymbol> {
    let compilation = context.compilation();
    let mut seen = FxHashSet::default();
    let mut properties = Vec::new();
    for current in compilation.type_and_base_types(id) {
        for property in compilation.type_symbol(current).properties() {
            if !seen.insert(property.name()) {
                continue;
            }
            let accessible = property.accessibility().is_public()
                && property.has_public_getter()
                && !property.is_static()
                && !property.is_indexer()
                && !property.has_attribute(known::HTML_ATTRIBUTE_NOT_BOUND_ATTRIBUTE)
                && !context.excludes(property.is_editor_hidden());
            if !accessible {
                continue;
            }
            let named = property.has_attribute(known::HTML_ATTRIBUTE_NAME_ATTRIBUTE);
            if property.has_public_setter()
                || named
                || dictionary_arguments(compilation, property.ty()).is_some()
            {
                properties.push(property);
            }
        }
    }
    properties
}

/// Key and value types when `ty` is, or implements, `IDictionary<K, V>`.
fn dictionary_arguments(compilation: &Compilation, ty: &TypeRef) -> Option<(TypeRef, TypeRef)> {
    let pair = |args: &[TypeRef]| match args {
        [key, value] => Some((key.clone(), value.clone())),
        _ => None,
    };
    if ty.is_named(known::IDICTIONARY) || ty.is_named(DICTIONARY) {
        return pair(ty.type_arguments());
    }

    let id = compilation.resolve(ty)?;
    let symbol = compilation.type_symbol(id);
    let interface = compilation
        .all_interfaces(id)
        .into_iter()
        .find(|interface| interface.is_named(known::IDICTIONARY))?;
    let arguments: Vec<_> = interface
        .type_arguments()
        .iter()
        .map(|argument| substitute(argument, symbol, ty.type_arguments()))
        .collect();
    pair(&arguments)
}

/// Replace the type parameters of `owner` with the arguments it was
/// constructed with.
fn substitute(ty: &TypeRef, owner: &NamedTypeSymbol, arguments: &[TypeRef]) -> TypeRef {
    match ty {
        TypeRef::TypeParameter { name } => owner
            .type_parameters()
            .iter()
            .position(|parameter| &parameter.name == name)
            .and_then(|index| arguments.get(index))
            .cloned()
            .unwrap_or_else(|| ty.clone()),
        TypeRef::Named { name, args } => TypeRef::generic(
            name.clone(),
            args.iter()
                .map(|arg| substitute(arg, owner, arguments))
                .collect(),
        ),
        TypeRef::Array { element } => TypeRef::array(substitute(element, owner, arguments)),
    }
}

fn configure_property(
    attribute: &mut BoundAttributeBuilder,
    compilation: &Compilation,
    owner: &str,
    property: &PropertySymbol,
) {
    let name_attribute = property.attribute(known::HTML_ATTRIBUTE_NAME_ATTRIBUTE);
    let explicit_name = name_attribute
        .and_then(|attribute| attribute.constructor_argument(0))
        .and_then(TypedConstant::as_str)
        .filter(|name| !name.is_empty());
    // `Some(None)` when the prefix is explicitly null.
    let explicit_prefix = name_attribute
        .and_then(|attribute| attribute.named_argument("DictionaryAttributePrefix"))
        .map(|prefix| prefix.as_str().map(str::to_string));
    let attribute_name = explicit_name.map_or_else(|| to_html_case(property.name()), str::to_string);
    let has_public_setter = property.has_public_setter();
    let ty = property.ty();

    attribute
        .set_type_name(ty.full_name())
        .set_property_name(property.name())
        .set_is_enum(compilation.is_enum(ty))
        .set_documentation(property.documentation().map(str::to_string));

    let type_name = owner.to_string();
    let property_name = property.name().to_string();
    let (diagnostic, indexer) = match dictionary_arguments(compilation, ty) {
        None if explicit_prefix.is_some() => (
            Some(TagHelperDiagnostic::DictionaryPrefixOnNonDictionary {
                type_name,
                property: property_name,
            }),
            None,
        ),
        None if !has_public_setter && explicit_name.is_some() => (
            Some(TagHelperDiagnostic::NameOnNonSettableProperty {
                type_name,
                property: property_name,
            }),
            None,
        ),
        None => (None, None),
        Some((key, _)) if !key.is_named(known::STRING) => (
            explicit_prefix
                .is_some()
                .then_some(TagHelperDiagnostic::NonStringDictionaryKey {
                    type_name,
                    property: property_name,
                }),
            None,
        ),
        Some(_) if !has_public_setter && name_attribute.is_some() && explicit_prefix.is_none() => (
            Some(TagHelperDiagnostic::MissingDictionaryPrefix {
                type_name,
                property: property_name,
            }),
            None,
        ),
        Some((_, value)) => {
            let prefix = explicit_prefix.unwrap_or_else(|| Some(format!("{attribute_name}-")));
            (None, prefix.map(|prefix| (prefix, value.full_name())))
        }
    };

    // A setter-less dictionary is reachable only through its prefix.
    if has_public_setter || indexer.is_none() {
        attribute.set_name(attribute_name);
    }
    if let Some((prefix, value_type)) = indexer {
        attribute.as_dictionary(prefix, value_type);
    }
    if let Some(diagnostic) = diagnostic {
        attribute.add_diagnostic(diagnostic);
    }
}
