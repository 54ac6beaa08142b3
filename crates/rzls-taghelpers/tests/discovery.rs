use rzls_conf::DiscoverySettings;
use rzls_symbols::AttributeData;
use rzls_symbols::Compilation;
use rzls_symbols::CompilationBuilder;
use rzls_symbols::PropertyBuilder;
use rzls_symbols::TypeBuilder;
use rzls_symbols::TypeParameterSymbol;
use rzls_symbols::TypeRef;
use rzls_symbols::TypedConstant;
use rzls_taghelpers::known;
use rzls_taghelpers::ComponentResolution;
use rzls_taghelpers::TagHelperBinder;
use rzls_taghelpers::TagHelperDescriptor;
use rzls_taghelpers::TagHelperDiscovery;
use rzls_taghelpers::TagHelperKind;

fn parameter(name: &str, ty: TypeRef) -> PropertyBuilder {
    PropertyBuilder::new(name, ty).attribute(AttributeData::new(known::PARAMETER_ATTRIBUTE))
}

fn framework() -> CompilationBuilder {
    CompilationBuilder::new("App")
        .with_type(TypeBuilder::interface(known::ICOMPONENT))
        .with_type(
            TypeBuilder::class(known::COMPONENT_BASE)
                .abstract_type()
                .implements(TypeRef::named(known::ICOMPONENT)),
        )
        .with_type(TypeBuilder::class(known::BIND_CONVERTER).static_type())
}

fn component(full_name: &str) -> TypeBuilder {
    TypeBuilder::class(full_name).base(TypeRef::named(known::COMPONENT_BASE))
}

fn discover(compilation: &Compilation) -> Vec<TagHelperDescriptor> {
    TagHelperDiscovery::default()
        .discover(compilation, &DiscoverySettings::default(), None)
        .unwrap()
}

fn of_kind(descriptors: &[TagHelperDescriptor], kind: TagHelperKind) -> Vec<&TagHelperDescriptor> {
    descriptors
        .iter()
        .filter(|descriptor| descriptor.kind() == kind)
        .collect()
}

fn attrs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), (*value).to_string()))
        .collect()
}

#[test]
fn component_gets_short_and_fully_qualified_rules() {
    let compilation = framework().with_type(component("N.Foo")).build().unwrap();
    let descriptors = discover(&compilation);
    let components = of_kind(&descriptors, TagHelperKind::Component);
    assert_eq!(components.len(), 2);

    let tags: Vec<_> = components
        .iter()
        .map(|descriptor| descriptor.tag_matching_rules()[0].tag_name())
        .collect();
    assert_eq!(tags, ["Foo", "N.Foo"]);
    assert!(components.iter().all(|descriptor| descriptor.case_sensitive()));
    assert!(!components[0].is_fully_qualified_name_match());
    assert!(components[1].is_fully_qualified_name_match());

    let binder = TagHelperBinder::new(None, descriptors.clone());
    assert!(binder.get_binding("foo", &[], None).is_none());
    let short = binder.get_binding("Foo", &[], None).unwrap();
    assert_eq!(
        short.component(),
        Some(ComponentResolution::Resolved(components[0]))
    );
    let qualified = binder.get_binding("N.Foo", &[], None).unwrap();
    assert_eq!(
        qualified.component(),
        Some(ComponentResolution::Resolved(components[1]))
    );
}

#[test]
fn value_and_changed_parameters_synthesise_bind() {
    let compilation = framework()
        .with_type(
            component("N.Foo")
                .property(parameter("Name", TypeRef::string()))
                .property(parameter(
                    "NameChanged",
                    TypeRef::generic(known::EVENT_CALLBACK_GENERIC, vec![TypeRef::string()]),
                ))
                .property(parameter("Orphan", TypeRef::string()))
                .property(parameter(
                    "LonelyChanged",
                    TypeRef::generic(known::EVENT_CALLBACK_GENERIC, vec![TypeRef::string()]),
                )),
        )
        .build()
        .unwrap();
    let descriptors = discover(&compilation);
    let binds: Vec<_> = of_kind(&descriptors, TagHelperKind::Bind)
        .into_iter()
        .filter(|descriptor| !descriptor.is_fallback_bind())
        .collect();

    // One per component variant; `LonelyChanged` has no `Lonely` to pair with.
    assert_eq!(binds.len(), 2);
    for bind in &binds {
        assert_eq!(bind.bind_value_attribute(), Some("Name"));
        assert_eq!(bind.bind_change_attribute(), Some("NameChanged"));
        assert_eq!(bind.bound_attributes().len(), 1);
        let attribute = &bind.bound_attributes()[0];
        assert_eq!(attribute.name(), "@bind-Name");
        assert_eq!(
            attribute.type_name(),
            "Microsoft.AspNetCore.Components.EventCallback<System.String>"
        );
    }

    let binder = TagHelperBinder::new(None, descriptors.clone());
    let binding = binder
        .get_binding("Foo", &attrs(&[("@bind-Name", "name")]), None)
        .unwrap();
    let matched = binding.bound_attribute_for("@bind-Name:after").unwrap();
    assert_eq!(matched.attribute.name(), "@bind-Name");
    assert_eq!(matched.parameter.map(|parameter| parameter.name()), Some("after"));
}

#[test]
fn generic_component_exposes_type_parameter_attribute() {
    let compilation = framework()
        .with_type(
            component("N.Foo")
                .type_parameter(TypeParameterSymbol::new("T"))
                .attribute(
                    AttributeData::new(known::CASCADING_TYPE_PARAMETER_ATTRIBUTE)
                        .arg(TypedConstant::string("T")),
                )
                .property(parameter("Value", TypeRef::type_parameter("T"))),
        )
        .build()
        .unwrap();
    let descriptors = discover(&compilation);
    let foo = of_kind(&descriptors, TagHelperKind::Component)[0];

    let synthetic: Vec<_> = foo
        .bound_attributes()
        .iter()
        .filter(|attribute| attribute.is_type_parameter_property())
        .collect();
    assert_eq!(synthetic.len(), 1);
    assert_eq!(synthetic[0].name(), "T");
    assert_eq!(synthetic[0].type_name(), known::TYPE);
    assert!(synthetic[0].is_cascading_type_parameter_property());
    assert!(foo.find_bound_attribute("Value").unwrap().is_generic_typed_property());
}

#[test]
fn input_type_constraints_do_not_shadow_bare_input() {
    let entry = |type_attribute: TypedConstant, value: &str| {
        AttributeData::new(known::BIND_INPUT_ELEMENT_ATTRIBUTE)
            .arg(type_attribute)
            .arg(TypedConstant::Null)
            .arg(TypedConstant::string(value))
            .arg(TypedConstant::string("onchange"))
            .arg(TypedConstant::Bool(false))
            .arg(TypedConstant::Null)
    };
    let compilation = framework()
        .with_type(
            TypeBuilder::class("Web.BindAttributes")
                .attribute(entry(TypedConstant::Null, "value"))
                .attribute(entry(TypedConstant::string("checkbox"), "checked"))
                .attribute(entry(TypedConstant::string("text"), "value")),
        )
        .build()
        .unwrap();
    let descriptors = discover(&compilation);
    let binder = TagHelperBinder::new(None, descriptors);

    let checkbox = binder
        .get_binding("input", &attrs(&[("type", "checkbox"), ("@bind", "done")]), None)
        .unwrap();
    let types: Vec<_> = checkbox
        .descriptors()
        .filter(|descriptor| !descriptor.is_fallback_bind())
        .map(TagHelperDescriptor::bind_type_attribute)
        .collect();
    assert_eq!(types, [None, Some("checkbox")]);
    let best = checkbox.most_specific(Some(TagHelperKind::Bind)).unwrap();
    assert_eq!(best.descriptor.bind_type_attribute(), Some("checkbox"));

    let text = binder
        .get_binding("input", &attrs(&[("type", "text"), ("@bind", "name")]), None)
        .unwrap();
    let best = text.most_specific(Some(TagHelperKind::Bind)).unwrap();
    assert_eq!(best.descriptor.bind_type_attribute(), Some("text"));
}

#[test]
fn rediscovery_is_content_stable() {
    let compilation = framework()
        .with_type(
            component("N.Foo")
                .property(parameter("Title", TypeRef::string()))
                .property(parameter("ChildContent", TypeRef::named(known::RENDER_FRAGMENT))),
        )
        .build()
        .unwrap();
    let first = discover(&compilation);
    let second = discover(&compilation);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn discovery_without_framework_finds_nothing() {
    let compilation = CompilationBuilder::new("App")
        .with_type(TypeBuilder::class("N.Foo"))
        .build()
        .unwrap();
    assert!(discover(&compilation).is_empty());
}
