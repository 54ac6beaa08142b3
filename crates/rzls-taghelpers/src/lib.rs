mod attributes;
mod binder;
mod builder;
mod db;
mod descriptor;
mod diagnostics;
mod discovery;
mod error;
pub mod known;
mod metadata;
mod names;
mod pool;
pub mod providers;
mod rules;
mod selector;

pub use attributes::BoundAttributeDescriptor;
pub use attributes::BoundAttributeParameterDescriptor;
pub use binder::BoundAttributeMatch;
pub use binder::ComponentResolution;
pub use binder::TagHelperBinder;
pub use binder::TagHelperBinding;
pub use binder::TagHelperMatch;
pub use builder::BoundAttributeBuilder;
pub use builder::BoundAttributeParameterBuilder;
pub use builder::RequiredAttributeBuilder;
pub use builder::TagHelperDescriptorBuilder;
pub use builder::TagMatchingRuleBuilder;
pub use db::assembly_tag_helpers;
pub use db::workspace_tag_helpers;
pub use db::Db;
pub use db::TagHelperResult;
pub use db::TargetAssembly;
pub use db::Workspace;
pub use descriptor::AllowedChildTag;
pub use descriptor::TagHelperDescriptor;
pub use descriptor::TagHelperKind;
pub use diagnostics::TagHelperDiagnostic;
pub use discovery::TagHelperDiscovery;
pub use error::BuildError;
pub use error::DiscoveryError;
pub use error::ProviderError;
pub use metadata::Metadata;
pub use metadata::MetadataKey;
pub use metadata::MetadataValue;
pub use names::name_starts_with;
pub use names::names_equal;
pub use names::to_html_case;
pub use pool::PooledBuilder;
pub use rules::NameComparison;
pub use rules::RequiredAttributeDescriptor;
pub use rules::TagMatchingRule;
pub use rules::TagStructure;
pub use rules::ValueComparison;
pub use rules::ELEMENT_CATCH_ALL_TARGET;
pub use selector::parse_required_attributes;
pub use selector::ParsedSelector;
