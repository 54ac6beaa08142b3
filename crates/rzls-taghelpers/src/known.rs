//! Metadata names of well-known framework types and members.

pub const COMPONENTS_ASSEMBLY: &str = "Microsoft.AspNetCore.Components";

pub const ICOMPONENT: &str = "Microsoft.AspNetCore.Components.IComponent";
pub const COMPONENT_BASE: &str = "Microsoft.AspNetCore.Components.ComponentBase";
pub const PARAMETER_ATTRIBUTE: &str = "Microsoft.AspNetCore.Components.ParameterAttribute";
pub const EDITOR_REQUIRED_ATTRIBUTE: &str = "Microsoft.AspNetCore.Components.EditorRequiredAttribute";
pub const CASCADING_TYPE_PARAMETER_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Components.CascadingTypeParameterAttribute";
pub const RENDER_FRAGMENT: &str = "Microsoft.AspNetCore.Components.RenderFragment";
pub const RENDER_FRAGMENT_GENERIC: &str = "Microsoft.AspNetCore.Components.RenderFragment`1";
pub const EVENT_CALLBACK: &str = "Microsoft.AspNetCore.Components.EventCallback";
pub const EVENT_CALLBACK_GENERIC: &str = "Microsoft.AspNetCore.Components.EventCallback`1";
pub const BIND_CONVERTER: &str = "Microsoft.AspNetCore.Components.BindConverter";
pub const BIND_ELEMENT_ATTRIBUTE: &str = "Microsoft.AspNetCore.Components.BindElementAttribute";
pub const BIND_INPUT_ELEMENT_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Components.BindInputElementAttribute";
pub const EVENT_HANDLER_ATTRIBUTE: &str = "Microsoft.AspNetCore.Components.EventHandlerAttribute";
pub const ELEMENT_REFERENCE: &str = "Microsoft.AspNetCore.Components.ElementReference";
pub const RENDER_TREE_BUILDER: &str =
    "Microsoft.AspNetCore.Components.Rendering.RenderTreeBuilder";
pub const ADD_MULTIPLE_ATTRIBUTES: &str = "AddMultipleAttributes";
pub const ADD_NAMED_EVENT: &str = "AddNamedEvent";
pub const ICOMPONENT_RENDER_MODE: &str = "Microsoft.AspNetCore.Components.IComponentRenderMode";

pub const ITAG_HELPER: &str = "Microsoft.AspNetCore.Razor.TagHelpers.ITagHelper";
pub const HTML_TARGET_ELEMENT_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Razor.TagHelpers.HtmlTargetElementAttribute";
pub const HTML_ATTRIBUTE_NAME_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Razor.TagHelpers.HtmlAttributeNameAttribute";
pub const HTML_ATTRIBUTE_NOT_BOUND_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Razor.TagHelpers.HtmlAttributeNotBoundAttribute";
pub const RESTRICT_CHILDREN_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Razor.TagHelpers.RestrictChildrenAttribute";
pub const OUTPUT_ELEMENT_HINT_ATTRIBUTE: &str =
    "Microsoft.AspNetCore.Razor.TagHelpers.OutputElementHintAttribute";

pub const IDICTIONARY: &str = "System.Collections.Generic.IDictionary`2";
pub const BOOLEAN: &str = "System.Boolean";
pub const STRING: &str = "System.String";
pub const OBJECT: &str = "System.Object";
pub const TYPE: &str = "System.Type";
pub const DELEGATE: &str = "System.Delegate";
pub const CULTURE_INFO: &str = "System.Globalization.CultureInfo";
pub const TASK: &str = "System.Threading.Tasks.Task";
pub const TASK_GENERIC: &str = "System.Threading.Tasks.Task`1";
pub const VALUE_TASK: &str = "System.Threading.Tasks.ValueTask";
pub const VALUE_TASK_GENERIC: &str = "System.Threading.Tasks.ValueTask`1";

/// Types scanned for bind entries and event handler entries.
pub const BIND_ATTRIBUTES_TYPE_NAME: &str = "BindAttributes";
pub const EVENT_HANDLERS_TYPE_NAME: &str = "EventHandlers";

/// Components with this name hold `@using` lines, not markup.
pub const IMPORTS_COMPONENT_NAME: &str = "_Imports";

/// Suffix stripped from reflected tag helper type names.
pub const TAG_HELPER_SUFFIX: &str = "TagHelper";

pub const CHILD_CONTENT_PARAMETER_NAME: &str = "Context";

/// Runtime names recorded on descriptors.
pub mod runtime {
    pub const COMPONENT: &str = "Components.IComponent";
    pub const NONE: &str = "Components.None";
    pub const TAG_HELPER: &str = "ITagHelper";
}
