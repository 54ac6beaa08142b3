use rzls_symbols::AttributeData;
use rzls_symbols::NamedTypeSymbol;
use rzls_symbols::Symbol;
use rzls_symbols::TypedConstant;

use super::ProviderContext;
use super::TagHelperDescriptorProvider;
use crate::known;
use crate::BuildError;
use crate::MetadataKey;
use crate::ProviderError;
use crate::TagHelperDescriptor;
use crate::TagHelperDescriptorBuilder;
use crate::TagHelperKind;
use crate::ELEMENT_CATCH_ALL_TARGET;

/// `@onclick` and friends, declared by `[EventHandler]` attributes on
/// `EventHandlers` types.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventHandlerTagHelperDescriptorProvider;

impl TagHelperDescriptorProvider for EventHandlerTagHelperDescriptorProvider {
    fn name(&self) -> &'static str {
        "event-handler"
    }

    #[tracing::instrument(skip_all, fields(provider = self.name()))]
    fn execute(&self, context: &mut ProviderContext<'_>) -> Result<(), ProviderError> {
        if context
            .well_known_type(self.name(), known::EVENT_HANDLER_ATTRIBUTE)
            .is_none()
        {
            return Ok(());
        }

        let mut hosts = Vec::new();
        context.for_each_type(|id, symbol| {
            if symbol.accessibility().is_public()
                && !symbol.is_generic()
                && symbol.simple_name() == known::EVENT_HANDLERS_TYPE_NAME
            {
                hosts.push(id);
            }
        });

        let compilation = context.compilation();
        for id in hosts {
            let host = compilation.type_symbol(id);
            let assembly = compilation.assembly_of(id).name();
            for attribute in host.attributes_of(known::EVENT_HANDLER_ATTRIBUTE) {
                let Some(entry) = EventHandlerEntry::from_attribute(attribute) else {
                    tracing::debug!(
                        host = %host.full_name(),
                        arguments = attribute.constructor_arguments.len(),
                        "Skipping malformed event handler attribute"
                    );
                    continue;
                };
                context.add(entry.build(host, assembly)?);
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
struct EventHandlerEntry<'a> {
    attribute: &'a str,
    event_args_type: String,
    prevent_default: bool,
    stop_propagation: bool,
}

impl<'a> EventHandlerEntry<'a> {
    /// `(name, eventArgsType)` or `(name, eventArgsType, preventDefault,
    /// stopPropagation)`.
    fn from_attribute(attribute: &'a AttributeData) -> Option<Self> {
        let arguments = &attribute.constructor_arguments;
        let (prevent_default, stop_propagation) = match arguments.len() {
            2 => (false, false),
            4 => (arguments[2].as_bool()?, arguments[3].as_bool()?),
            _ => return None,
        };
        let name = arguments[0].as_str().filter(|name| !name.is_empty())?;
        let event_args_type = match &arguments[1] {
            TypedConstant::Type(ty) => ty.full_name(),
            _ => return None,
        };
        Some(Self {
            attribute: name,
            event_args_type,
            prevent_default,
            stop_propagation,
        })
    }

    fn build(
        &self,
        host: &NamedTypeSymbol,
        assembly: &str,
    ) -> Result<TagHelperDescriptor, BuildError> {
        let attribute_name = format!("@{}", self.attribute);
        let documentation = format!(
            "Sets the '{attribute_name}' attribute to the provided string or delegate value. \
             A delegate value should be of type '{}'.",
            self.event_args_type
        );

        let mut builder = TagHelperDescriptorBuilder::get_pooled_instance(
            TagHelperKind::EventHandler,
            self.attribute,
            assembly,
        );
        builder
            .set_case_sensitive(true)
            .set_documentation(Some(documentation.clone()));
        let metadata = builder.metadata_mut();
        metadata.set_flag(MetadataKey::ClassifyAttributesOnly, true);
        metadata.set_text(MetadataKey::RuntimeName, known::runtime::NONE);
        metadata.set_text(MetadataKey::TypeName, host.metadata_name());
        metadata.set_text(MetadataKey::EventArgsType, &self.event_args_type);

        builder.tag_matching_rule(|rule| {
            rule.set_tag_name(ELEMENT_CATCH_ALL_TARGET)
                .require_attribute(|attribute| {
                    attribute.set_name(&attribute_name);
                });
        });
        for (enabled, parameter) in [
            (self.prevent_default, "preventDefault"),
            (self.stop_propagation, "stopPropagation"),
        ] {
            if enabled {
                builder.tag_matching_rule(|rule| {
                    rule.set_tag_name(ELEMENT_CATCH_ALL_TARGET)
                        .require_attribute(|attribute| {
                            attribute.set_name(format!("{attribute_name}:{parameter}"));
                        });
                });
            }
        }

        builder.bind_attribute(|attribute| {
            attribute
                .set_name(&attribute_name)
                .set_type_name(format!(
                    "Microsoft.AspNetCore.Components.EventCallback<{}>",
                    self.event_args_type
                ))
                .set_property_name(self.attribute)
                .set_documentation(Some(documentation));
            attribute
                .metadata_mut()
                .set_flag(MetadataKey::WeaklyTyped, true);

            if self.prevent_default {
                attribute.bind_attribute_parameter(|parameter| {
                    parameter
                        .set_name("preventDefault")
                        .set_type_name(known::BOOLEAN)
                        .set_documentation(format!(
                            "Specifies whether to cancel (if cancelable) the default action \
                             that belongs to the '{attribute_name}' event."
                        ));
                });
            }
            if self.stop_propagation {
                attribute.bind_attribute_parameter(|parameter| {
                    parameter
                        .set_name("stopPropagation")
                        .set_type_name(known::BOOLEAN)
                        .set_documentation(format!(
                            "Specifies whether to prevent further propagation of the \
                             '{attribute_name}' event in the capturing and bubbling phases."
                        ));
                });
            }
        });

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use rzls_conf::DiscoverySettings;
    use rzls_symbols::AttributeData;
    use rzls_symbols::CompilationBuilder;
    use rzls_symbols::TypeBuilder;
    use rzls_symbols::TypeRef;

    use super::*;

    fn event_handler(arguments: Vec<TypedConstant>) -> AttributeData {
        arguments
            .into_iter()
            .fold(AttributeData::new(known::EVENT_HANDLER_ATTRIBUTE), AttributeData::arg)
    }

    fn discover(host: TypeBuilder) -> Vec<TagHelperDescriptor> {
        let compilation = CompilationBuilder::new("App")
            .with_type(TypeBuilder::class(known::EVENT_HANDLER_ATTRIBUTE))
            .with_type(host)
            .build()
            .unwrap();
        let settings = DiscoverySettings::default();
        let mut context = ProviderContext::new(&compilation, &settings, None);
        EventHandlerTagHelperDescriptorProvider
            .execute(&mut context)
            .unwrap();
        context.into_results()
    }

    #[test]
    fn emits_weakly_typed_event_callback() {
        let descriptors = discover(
            TypeBuilder::class("Web.EventHandlers")
                .attribute(event_handler(vec![
                    TypedConstant::string("onclick"),
                    TypedConstant::Type(TypeRef::named("Web.MouseEventArgs")),
                    TypedConstant::Bool(true),
                    TypedConstant::Bool(false),
                ]))
                .attribute(event_handler(vec![
                    TypedConstant::string("onchange"),
                    TypedConstant::Type(TypeRef::named("Web.ChangeEventArgs")),
                ])),
        );

        assert_eq!(descriptors.len(), 2);
        let click = &descriptors[0];
        assert_eq!(click.kind(), TagHelperKind::EventHandler);
        assert_eq!(click.name(), "onclick");
        assert!(click.classify_attributes_only());
        assert_eq!(click.tag_matching_rules().len(), 2);
        assert_eq!(
            click.tag_matching_rules()[1].required_attributes()[0].name(),
            "@onclick:preventDefault"
        );

        let attribute = &click.bound_attributes()[0];
        assert_eq!(attribute.name(), "@onclick");
        assert_eq!(
            attribute.type_name(),
            "Microsoft.AspNetCore.Components.EventCallback<Web.MouseEventArgs>"
        );
        assert!(attribute.is_weakly_typed());
        assert!(attribute.is_directive_attribute());
        let parameters: Vec<_> = attribute.parameters().iter().map(|p| p.name()).collect();
        assert_eq!(parameters, ["preventDefault"]);

        assert!(descriptors[1].bound_attributes()[0].parameters().is_empty());
    }

    #[test]
    fn skips_malformed_attributes() {
        let descriptors = discover(
            TypeBuilder::class("Web.EventHandlers")
                .attribute(AttributeData::new(known::EVENT_HANDLER_ATTRIBUTE))
                .attribute(event_handler(vec![
                    TypedConstant::string("oninput"),
                    TypedConstant::string("not a type"),
                ]))
                .attribute(event_handler(vec![
                    TypedConstant::string("onfocus"),
                    TypedConstant::Type(TypeRef::named("Web.FocusEventArgs")),
                ])),
        );
        let names: Vec<_> = descriptors.iter().map(TagHelperDescriptor::name).collect();
        assert_eq!(names, ["onfocus"]);
    }

    #[test]
    fn requires_exact_host_name() {
        let descriptors = discover(TypeBuilder::class("Web.MoreEventHandlers").attribute(
            event_handler(vec![
                TypedConstant::string("onclick"),
                TypedConstant::Type(TypeRef::named("Web.MouseEventArgs")),
            ]),
        ));
        assert!(descriptors.is_empty());
    }
}
