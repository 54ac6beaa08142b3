//! Two-way binding.
//!
//! Three layers all produce [`TagHelperKind::Bind`] descriptors:
//! the `@bind-*` fallback on any tag, element bindings declared by
//! `[BindElement]`/`[BindInputElement]` on `BindAttributes` types, and
//! component bindings inferred from `X`/`XChanged` parameter pairs.

use std::sync::LazyLock;

use rzls_symbols::AttributeData;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::Symbol;
use rzls_symbols::TypedConstant;

use super::ProviderContext;
use super::Singleton;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::BoundAttributeBuilder;
use crate::BoundAttributeDescriptor;
use crate::BuildError;
use crate::MetadataKey;
use crate::NameComparison;
use crate::ProviderError;
use crate::TagHelperDescriptor;
use crate::TagHelperDescriptorBuilder;
use crate::TagHelperKind;
use crate::TagMatchingRuleBuilder;
use crate::ValueComparison;
use crate::ELEMENT_CATCH_ALL_TARGET;

const BIND_PREFIX: &str = "@bind-";

static FALLBACK_BIND_TAG_HELPER: Singleton = LazyLock::new(build_fallback);

#[derive(Debug, Clone, Copy, Default)]
pub struct BindTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for BindTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "bind"
    }

    /// Component bindings pattern-match over component descriptors.
    fn order(&self) -> i32 {
        1000
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        let Some(bind_converter) = context.well_known_type(self.name(), known::BIND_CONVERTER)
        else {
            return Ok(());
        };

        if context.is_in_scope(bind_converter) {
            context.add(Singleton::force(&FALLBACK_BIND_TAG_HELPER).clone()?);
        }

        for descriptor in element_bindings(context)? {
            context.add(descriptor);
        }

        for component in context.existing() {
            if component.is_component() {
                for descriptor in component_bindings(component)? {
                    context.add(descriptor);
                }
            }
        }
        Ok(())
    }
}

fn build_fallback() -> Result<TagHelperDescriptor, BuildError> {
    let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
        TagHelperKind::Bind,
        "Bind",
        known::COMPONENTS_ASSEMBLY,
    );
    builder.set_case_sensitive(true).set_documentation(Some(
        "Binds the provided expression to an attribute and a change event, based on the naming \
         of the bind attribute. For example: '@bind-value=\"...\"' and \
         '@bind-value:event=\"onchange\"' will assign the current value of the expression to \
         the 'value' attribute, and assign a delegate that attempts to set the value to the \
         'onchange' attribute."
            .to_string(),
    ));
    let metadata = builder.metadata_mut();
    metadata.set_flag(MetadataKey::ClassifyAttributesOnly, true);
    metadata.set_flag(MetadataKey::BindFallback, true);
    metadata.set_text(MetadataKey::RuntimeName, known::runtime::NONE);

    builder.tag_matching_rule(|rule| {
        rule.set_tag_name(ELEMENT_CATCH_ALL_TARGET)
            .require_attribute(|attribute| {
                attribute
                    .set_name(BIND_PREFIX)
                    .set_name_comparison(NameComparison::PrefixMatch);
            });
    });

    builder.bind_attribute(|attribute| {
        attribute
            .as_dictionary(BIND_PREFIX, known::OBJECT)
            .set_type_name("System.Collections.Generic.Dictionary<string, object>")
            .set_property_name("Bind")
            .set_documentation(Some(
                "Binds the provided expression to an attribute and a change event, based on the \
                 naming of the bind attribute."
                    .to_string(),
            ));
        add_conversion_parameters(attribute, "@bind-...", None, None);
        add_accessor_parameters(attribute, "@bind-...", known::OBJECT, known::DELEGATE);
    });

    builder.build()
}

/// `:format`, `:event` and `:culture`.
fn add_conversion_parameters(
    attribute: &mut BoundAttributeBuilder,
    attribute_name: &str,
    format_property: Option<&str>,
    event_property: Option<&str>,
) {
    attribute
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("format")
                .set_type_name(known::STRING)
                .set_documentation(format!(
                    "Specifies a format to convert the value specified by the '{attribute_name}' \
                     attribute. The format string can currently only be used with expressions \
                     of type 'DateTime'."
                ));
            if let Some(property) = format_property {
                parameter.set_property_name(property);
            }
        })
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("event")
                .set_type_name(known::STRING)
                .set_documentation(format!(
                    "Specifies the event handler name to attach for change notifications for \
                     the value provided by the '{attribute_name}' attribute."
                ));
            if let Some(property) = event_property {
                parameter.set_property_name(property);
            }
        })
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("culture")
                .set_type_name(known::CULTURE_INFO)
                .set_documentation(format!(
                    "Specifies the culture to use for conversions of the value provided by the \
                     '{attribute_name}' attribute."
                ));
        });
}

/// `:get`, `:set` and `:after`.
fn add_accessor_parameters(
    attribute: &mut BoundAttributeBuilder,
    attribute_name: &str,
    get_type: &str,
    set_type: &str,
) {
    attribute
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("get")
                .set_type_name(get_type)
                .set_documentation(format!(
                    "Specifies the expression to use for binding the value to the \
                     '{attribute_name}' attribute."
                ));
        })
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("set")
                .set_type_name(set_type)
                .set_documentation(format!(
                    "Specifies the expression to use for updating the bound value when a new \
                     value is available from '{attribute_name}'."
                ));
        })
        .bind_attribute_parameter(|parameter| {
            parameter
                .set_name("after")
                .set_type_name(known::DELEGATE)
                .set_documentation(format!(
                    "Specifies an action to run after the new value from '{attribute_name}' \
                     has been set."
                ));
        });
}

/// One `[BindElement]` or `[BindInputElement]` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ElementBindEntry {
    element: String,
    type_attribute: Option<String>,
    suffix: Option<String>,
    value_attribute: String,
    change_attribute: String,
    is_invariant_culture: bool,
    format: Option<String>,
}

impl ElementBindEntry {
    /// `BindElement(element, suffix, value, change)`.
    fn from_element_attribute(attribute: &AttributeData) -> Option<Self> {
        let [element, suffix, value, change] = attribute.constructor_arguments.as_slice() else {
            return None;
        };
        Some(Self {
            element: required_text(element)?,
            type_attribute: None,
            suffix: optional_text(suffix)?,
            value_attribute: required_text(value)?,
            change_attribute: required_text(change)?,
            is_invariant_culture: false,
            format: None,
        })
    }

    /// `BindInputElement(type, suffix, value, change[, invariantCulture,
    /// format])`.
    fn from_input_attribute(attribute: &AttributeData) -> Option<Self> {
        let (head, tail) = match attribute.constructor_arguments.as_slice() {
            [kind, suffix, value, change] => ([kind, suffix, value, change], None),
            [kind, suffix, value, change, invariant, format] => {
                ([kind, suffix, value, change], Some((invariant, format)))
            }
            _ => return None,
        };
        let [kind, suffix, value, change] = head;
        let (is_invariant_culture, format) = match tail {
            Some((invariant, format)) => (invariant.as_bool()?, optional_text(format)?),
            None => (false, None),
        };
        Some(Self {
            element: "input".to_string(),
            type_attribute: optional_text(kind)?,
            suffix: optional_text(suffix)?,
            value_attribute: required_text(value)?,
            change_attribute: required_text(change)?,
            is_invariant_culture,
            format,
        })
    }

    fn descriptor_name(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("Bind_{suffix}"),
            None => "Bind".to_string(),
        }
    }

    fn attribute_name(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{BIND_PREFIX}{suffix}"),
            None => "@bind".to_string(),
        }
    }

    /// Sub-attribute naming falls back to the value attribute.
    fn effective_suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(&self.value_attribute)
    }

    fn build(
        &self,
        host: &NamedTypeSymbol,
        assembly: &str,
    ) -> Result<TagHelperDescriptor, BuildError> {
        let attribute_name = self.attribute_name();
        let documentation = format!(
            "Binds the provided expression to the '{}' attribute and a change event delegate to \
             the '{}' attribute.",
            self.value_attribute, self.change_attribute
        );

        let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
            TagHelperKind::Bind,
            self.descriptor_name(),
            assembly,
        );
        builder
            .set_case_sensitive(true)
            .set_documentation(Some(documentation.clone()));
        let metadata = builder.metadata_mut();
        metadata.set_flag(MetadataKey::ClassifyAttributesOnly, true);
        metadata.set_text(MetadataKey::RuntimeName, known::runtime::NONE);
        metadata.set_text(MetadataKey::TypeName, host.metadata_name());
        metadata.set_text(MetadataKey::BindValueAttribute, &self.value_attribute);
        metadata.set_text(MetadataKey::BindChangeAttribute, &self.change_attribute);
        if let Some(type_attribute) = &self.type_attribute {
            metadata.set_text(MetadataKey::BindTypeAttribute, type_attribute);
        }
        if self.is_invariant_culture {
            metadata.set_flag(MetadataKey::BindIsInvariantCulture, true);
        }
        if let Some(format) = &self.format {
            metadata.set_text(MetadataKey::BindFormat, format);
        }

        builder.tag_matching_rule(|rule| {
            self.element_rule(rule);
            rule.require_attribute(|attribute| {
                attribute.set_name(&attribute_name);
            });
        });
        builder.tag_matching_rule(|rule| {
            self.element_rule(rule);
            rule.require_attribute(|attribute| {
                attribute.set_name(format!("{attribute_name}:get"));
            })
            .require_attribute(|attribute| {
                attribute.set_name(format!("{attribute_name}:set"));
            });
        });

        let suffix = self.effective_suffix();
        builder.bind_attribute(|attribute| {
            attribute
                .set_name(&attribute_name)
                .set_type_name(known::OBJECT)
                .set_property_name(&self.value_attribute)
                .set_documentation(Some(documentation));
            add_conversion_parameters(
                attribute,
                &attribute_name,
                Some(&format!("format-{suffix}")),
                Some(&format!("event-{suffix}")),
            );
            add_accessor_parameters(attribute, &attribute_name, known::OBJECT, known::DELEGATE);
        });

        builder.build()
    }

    /// Element name plus the exact `type="..."` constraint, if any.
    fn element_rule(&self, rule: &mut TagMatchingRuleBuilder) {
        rule.set_tag_name(&self.element);
        if let Some(type_attribute) = &self.type_attribute {
            rule.require_attribute(|attribute| {
                attribute
                    .set_name("type")
                    .set_value(type_attribute, ValueComparison::FullMatch);
            });
        }
    }
}

/// A string argument that must be present.
fn required_text(argument: &TypedConstant) -> Option<String> {
    argument
        .as_str()
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// `Some(None)` for a null argument, `None` when the argument is not text.
fn optional_text(argument: &TypedConstant) -> Option<Option<String>> {
    match argument {
        TypedConstant::Null => Some(None),
        TypedConstant::String(text) if text.is_empty() => Some(None),
        TypedConstant::String(text) => Some(Some(text.clone())),
        _ => None,
    }
}

/// Layers 2 and 3. Entries are emitted in scan order, duplicates included.
fn element_bindings(context: &ProviderContext<'_>) -> Result<Vec<TagHelperDescriptor>, BuildError> {
    let mut hosts = Vec::new();
    context.for_each_type(|id, symbol| {
        if symbol.accessibility().is_public()
            && !symbol.is_generic()
            && symbol.simple_name() == known::BIND_ATTRIBUTES_TYPE_NAME
        {
            hosts.push(id);
        }
    });

    let compilation = context.compilation();
    let mut descriptors = Vec::new();
    for id in hosts {
        let host = compilation.type_symbol(id);
        let assembly = compilation.assembly_of(id).name();
        for attribute in host.attributes() {
            let entry = if attribute.is(known::BIND_ELEMENT_ATTRIBUTE) {
                ElementBindEntry::from_element_attribute(attribute)
            } else if attribute.is(known::BIND_INPUT_ELEMENT_ATTRIBUTE) {
                ElementBindEntry::from_input_attribute(attribute)
            } else {
                continue;
            };
            let Some(entry) = entry else {
                tracing::debug!(
                    host = %host.full_name(),
                    attribute = %attribute.class,
                    arguments = attribute.constructor_arguments.len(),
                    "Skipping malformed bind attribute"
                );
                continue;
            };
            descriptors.push(entry.build(host, assembly)?);
        }
    }
    Ok(descriptors)
}

/// Layer 4: `@bind-X` for every `X`/`XChanged` pair on a component.
fn component_bindings(component: &TagHelperDescriptor) -> Result<Vec<TagHelperDescriptor>, BuildError> {
    let mut descriptors = Vec::new();
    for change in component.bound_attributes() {
        let Some(value_name) = change.name().strip_suffix("Changed") else {
            continue;
        };
        if value_name.is_empty()
            || !(change.is_delegate_property() || change.is_event_callback_property())
        {
            continue;
        }
        let Some(value) = find_attribute(component, value_name) else {
            continue;
        };
        let expression = find_attribute(component, &format!("{value_name}Expression"));
        descriptors.push(build_component_binding(component, value, change, expression)?);
    }
    Ok(descriptors)
}

fn find_attribute<'a>(
    component: &'a TagHelperDescriptor,
    name: &str,
) -> Option<&'a BoundAttributeDescriptor> {
    component
        .bound_attributes()
        .iter()
        .find(|attribute| attribute.name() == name)
}

fn build_component_binding(
    component: &TagHelperDescriptor,
    value: &BoundAttributeDescriptor,
    change: &BoundAttributeDescriptor,
    expression: Option<&BoundAttributeDescriptor>,
) -> Result<TagHelperDescriptor, BuildError> {
    let attribute_name = format!("{BIND_PREFIX}{}", value.name());
    let documentation = format!(
        "Binds the provided expression to the '{}' property and a change event delegate to the \
         '{}' property of the component.",
        value.name(),
        change.name()
    );

    let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
        TagHelperKind::Bind,
        component.name(),
        component.assembly_name(),
    );
    builder
        .set_display_name(component.display_name())
        .set_case_sensitive(true)
        .set_documentation(Some(documentation.clone()));
    let metadata = builder.metadata_mut();
    metadata.set_flag(MetadataKey::ClassifyAttributesOnly, true);
    metadata.set_text(MetadataKey::RuntimeName, known::runtime::NONE);
    metadata.set_text(MetadataKey::BindValueAttribute, value.name());
    metadata.set_text(MetadataKey::BindChangeAttribute, change.name());
    if let Some(expression) = expression {
        metadata.set_text(MetadataKey::BindExpressionAttribute, expression.name());
    }
    if let Some(type_name) = component.type_name() {
        metadata.set_text(MetadataKey::TypeName, type_name);
    }
    if component.is_fully_qualified_name_match() {
        metadata.set_flag(MetadataKey::FullyQualifiedNameMatch, true);
    }

    for rule in component.tag_matching_rules() {
        builder
            .tag_matching_rule(|bind_rule| {
                bind_rule
                    .set_tag_name(rule.tag_name())
                    .set_parent_tag(rule.parent_tag().map(str::to_string))
                    .require_attribute(|attribute| {
                        attribute.set_name(&attribute_name);
                    });
            })
            .tag_matching_rule(|bind_rule| {
                bind_rule
                    .set_tag_name(rule.tag_name())
                    .set_parent_tag(rule.parent_tag().map(str::to_string))
                    .require_attribute(|attribute| {
                        attribute.set_name(format!("{attribute_name}:get"));
                    })
                    .require_attribute(|attribute| {
                        attribute.set_name(format!("{attribute_name}:set"));
                    });
            });
    }

    builder.bind_attribute(|attribute| {
        attribute
            .set_name(&attribute_name)
            .set_type_name(change.type_name())
            .set_property_name(value.property_name().unwrap_or(value.name()))
            .set_documentation(Some(documentation));
        add_accessor_parameters(attribute, &attribute_name, value.type_name(), change.type_name());
    });

    builder.build()
}

#[cfg(test)]
mod tests {
    use rzls_conf::DiscoverySettings;
    use rzls_symbols::Compilation;
    use rzls_symbols::CompilationBuilder;
    use rzls_symbols::TypeBuilder;

    use super::*;

    fn bind_attributes(host: TypeBuilder) -> Compilation {
        CompilationBuilder::new("App")
            .with_type(TypeBuilder::class(known::BIND_CONVERTER).static_type())
            .with_type(host)
            .build()
            .unwrap()
    }

    fn run(compilation: &Compilation, existing: &[TagHelperDescriptor]) -> Vec<TagHelperDescriptor> {
        let settings = DiscoverySettings::default();
        let mut context =
            ProviderContext::new(compilation, &settings, None).with_existing(existing);
        BindTagHelperDescriptorProvider.execute(&mut context).unwrap();
        context.into_results()
    }

    fn text(value: &str) -> TypedConstant {
        TypedConstant::string(value)
    }

    #[test]
    fn skipped_without_bind_converter() {
        let compilation = CompilationBuilder::new("App")
            .with_type(TypeBuilder::class("Web.BindAttributes"))
            .build()
            .unwrap();
        assert!(run(&compilation, &[]).is_empty());
    }

    #[test]
    fn fallback_matches_any_bind_prefix() {
        let compilation = bind_attributes(TypeBuilder::class("Web.Unrelated"));
        let descriptors = run(&compilation, &[]);
        assert_eq!(descriptors.len(), 1);

        let fallback = &descriptors[0];
        assert!(fallback.is_fallback_bind());
        let rule = &fallback.tag_matching_rules()[0];
        assert!(rule.is_catch_all());
        assert!(rule.matches("div", None, &[("@bind-value".to_string(), "x".to_string())]));

        let attribute = &fallback.bound_attributes()[0];
        assert!(attribute.is_indexer_only());
        let parameters: Vec<_> = attribute.parameters().iter().map(|p| p.name()).collect();
        assert_eq!(parameters, ["format", "event", "culture", "get", "set", "after"]);
    }

    #[test]
    fn element_entries_distinguish_input_types() {
        let compilation = bind_attributes(
            TypeBuilder::class("Web.BindAttributes")
                .attribute(
                    AttributeData::new(known::BIND_INPUT_ELEMENT_ATTRIBUTE)
                        .arg(TypedConstant::Null)
                        .arg(TypedConstant::Null)
                        .arg(text("value"))
                        .arg(text("onchange"))
                        .arg(TypedConstant::Bool(false))
                        .arg(TypedConstant::Null),
                )
                .attribute(
                    AttributeData::new(known::BIND_INPUT_ELEMENT_ATTRIBUTE)
                        .arg(text("checkbox"))
                        .arg(TypedConstant::Null)
                        .arg(text("checked"))
                        .arg(text("onchange"))
                        .arg(TypedConstant::Bool(false))
                        .arg(TypedConstant::Null),
                )
                .attribute(
                    AttributeData::new(known::BIND_INPUT_ELEMENT_ATTRIBUTE)
                        .arg(text("number"))
                        .arg(text("value"))
                        .arg(text("value"))
                        .arg(text("onchange"))
                        .arg(TypedConstant::Bool(true))
                        .arg(TypedConstant::Null),
                )
                .attribute(
                    AttributeData::new(known::BIND_ELEMENT_ATTRIBUTE)
                        .arg(text("select"))
                        .arg(TypedConstant::Null)
                        .arg(text("value"))
                        .arg(text("onchange")),
                ),
        );
        let descriptors = run(&compilation, &[]);
        let element: Vec<_> = descriptors
            .iter()
            .filter(|descriptor| !descriptor.is_fallback_bind())
            .collect();
        assert_eq!(element.len(), 4);

        let bare = element[0];
        assert_eq!(bare.name(), "Bind");
        assert_eq!(bare.bind_type_attribute(), None);
        let checkbox = element[1];
        assert_eq!(checkbox.bind_type_attribute(), Some("checkbox"));
        assert_eq!(checkbox.bind_value_attribute(), Some("checked"));

        let attrs = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
                .collect()
        };
        let checkbox_input = attrs(&[("type", "checkbox"), ("@bind", "done")]);
        assert!(bare.tag_matching_rules()[0].matches("input", None, &checkbox_input));
        assert!(checkbox.tag_matching_rules()[0].matches("input", None, &checkbox_input));
        let text_input = attrs(&[("type", "text"), ("@bind", "name")]);
        assert!(!checkbox.tag_matching_rules()[0].matches("input", None, &text_input));
        assert!(
            checkbox.tag_matching_rules()[0].specificity()
                > bare.tag_matching_rules()[0].specificity()
        );

        let accessor = attrs(&[("type", "checkbox"), ("@bind:get", "a"), ("@bind:set", "b")]);
        assert!(checkbox.tag_matching_rules()[1].matches("input", None, &accessor));

        let number = element[2];
        assert_eq!(number.name(), "Bind_value");
        assert_eq!(number.bound_attributes()[0].name(), "@bind-value");
        assert!(number.metadata().flag(MetadataKey::BindIsInvariantCulture));
        assert_eq!(
            checkbox.bound_attributes()[0]
                .find_parameter("format")
                .and_then(|parameter| parameter.property_name()),
            Some("format-checked")
        );

        assert_eq!(element[3].tag_matching_rules()[0].tag_name(), "select");
    }

    #[test]
    fn malformed_element_entries_are_skipped() {
        let compilation = bind_attributes(
            TypeBuilder::class("Web.BindAttributes")
                .attribute(AttributeData::new(known::BIND_ELEMENT_ATTRIBUTE))
                .attribute(
                    AttributeData::new(known::BIND_ELEMENT_ATTRIBUTE)
                        .arg(text("select"))
                        .arg(TypedConstant::Int(3))
                        .arg(text("value"))
                        .arg(text("onchange")),
                ),
        );
        let descriptors = run(&compilation, &[]);
        assert_eq!(descriptors.len(), 1);
        assert!(descriptors[0].is_fallback_bind());
    }

    fn component_with(attributes: &[(&str, &str, MetadataKey)]) -> TagHelperDescriptor {
        let mut builder =
            TagHelperDescriptorBuilder::get_pooled_instance(TagHelperKind::Component, "N.Foo", "App");
        builder.set_case_sensitive(true).tag_matching_rule(|rule| {
            rule.set_tag_name("Foo");
        });
        builder
            .metadata_mut()
            .set_text(MetadataKey::TypeName, "N.Foo");
        for (name, type_name, flag) in attributes {
            builder.bind_attribute(|attribute| {
                attribute
                    .set_name(*name)
                    .set_type_name(*type_name)
                    .set_property_name(*name);
                attribute.metadata_mut().set_flag(*flag, true);
            });
        }
        builder.build().unwrap()
    }

    #[test]
    fn component_value_changed_pair() {
        let compilation = bind_attributes(TypeBuilder::class("Web.Unrelated"));
        let component = component_with(&[
            ("Name", "System.String", MetadataKey::GenericTyped),
            (
                "NameChanged",
                "Microsoft.AspNetCore.Components.EventCallback<System.String>",
                MetadataKey::EventCallback,
            ),
            (
                "NameExpression",
                "System.Linq.Expressions.Expression<System.Func<System.String>>",
                MetadataKey::GenericTyped,
            ),
        ]);
        let descriptors = run(&compilation, std::slice::from_ref(&component));
        let bind = descriptors
            .iter()
            .find(|descriptor| !descriptor.is_fallback_bind())
            .unwrap();

        assert_eq!(bind.kind(), TagHelperKind::Bind);
        assert_eq!(bind.name(), "N.Foo");
        assert_eq!(bind.bind_value_attribute(), Some("Name"));
        assert_eq!(bind.bind_change_attribute(), Some("NameChanged"));
        assert_eq!(bind.bind_expression_attribute(), Some("NameExpression"));

        let attribute = &bind.bound_attributes()[0];
        assert_eq!(attribute.name(), "@bind-Name");
        assert_eq!(
            attribute.type_name(),
            "Microsoft.AspNetCore.Components.EventCallback<System.String>"
        );
        assert_eq!(
            attribute.find_parameter("get").map(|parameter| parameter.type_name()),
            Some("System.String")
        );
        assert!(bind.tag_matching_rules()[0].matches(
            "Foo",
            None,
            &[("@bind-Name".to_string(), "name".to_string())]
        ));
    }

    #[test]
    fn change_without_value_produces_nothing() {
        let compilation = bind_attributes(TypeBuilder::class("Web.Unrelated"));
        let component = component_with(&[(
            "ValueChanged",
            "System.Action<System.String>",
            MetadataKey::DelegateSignature,
        )]);
        let descriptors = run(&compilation, std::slice::from_ref(&component));
        assert!(descriptors.iter().all(TagHelperDescriptor::is_fallback_bind));
    }

    #[test]
    fn change_must_be_delegate_or_event_callback() {
        let compilation = bind_attributes(TypeBuilder::class("Web.Unrelated"));
        let component = component_with(&[
            ("Value", "System.String", MetadataKey::GenericTyped),
            ("ValueChanged", "System.String", MetadataKey::GenericTyped),
        ]);
        let descriptors = run(&compilation, std::slice::from_ref(&component));
        assert!(descriptors.iter().all(TagHelperDescriptor::is_fallback_bind));
    }
}
