use std::collections::BTreeMap;

use serde::Serialize;

/// Well-known metadata keys.
///
/// Nearly every piece of descriptor metadata is a flag or one of a handful
/// of strings, so these are typed. Anything else goes in the custom map of
/// [`Metadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MetadataKey {
    RuntimeName,
    TypeName,
    TypeNamespace,
    TypeNameIdentifier,
    PropertyName,
    GloballyQualifiedTypeName,
    FullyQualifiedNameMatch,
    ClassifyAttributesOnly,
    GenericTyped,
    ChildContent,
    ChildContentParameterName,
    TypeParameter,
    TypeParameterIsCascading,
    TypeParameterConstraints,
    DelegateSignature,
    DelegateWithAwaitableResult,
    EventCallback,
    WeaklyTyped,
    BindFallback,
    BindValueAttribute,
    BindChangeAttribute,
    BindExpressionAttribute,
    BindTypeAttribute,
    BindIsInvariantCulture,
    BindFormat,
    EventArgsType,
}

impl MetadataKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKey::RuntimeName => "Common.RuntimeName",
            MetadataKey::TypeName => "Common.TypeName",
            MetadataKey::TypeNamespace => "Common.TypeNamespace",
            MetadataKey::TypeNameIdentifier => "Common.TypeNameIdentifier",
            MetadataKey::PropertyName => "Common.PropertyName",
            MetadataKey::GloballyQualifiedTypeName => "Common.GloballyQualifiedTypeName",
            MetadataKey::FullyQualifiedNameMatch => "Components.NameMatch",
            MetadataKey::ClassifyAttributesOnly => "Components.ClassifyAttributesOnly",
            MetadataKey::GenericTyped => "Components.GenericTyped",
            MetadataKey::ChildContent => "Components.ChildContent",
            MetadataKey::ChildContentParameterName => "Components.ChildContentParameterName",
            MetadataKey::TypeParameter => "Components.TypeParameter",
            MetadataKey::TypeParameterIsCascading => "Components.TypeParameterIsCascading",
            MetadataKey::TypeParameterConstraints => "Components.TypeParameterConstraints",
            MetadataKey::DelegateSignature => "Components.DelegateSignature",
            MetadataKey::DelegateWithAwaitableResult => "Components.DelegateWithAwaitableResult",
            MetadataKey::EventCallback => "Components.EventCallback",
            MetadataKey::WeaklyTyped => "Components.IsWeaklyTyped",
            MetadataKey::BindFallback => "Components.Bind.Fallback",
            MetadataKey::BindValueAttribute => "Components.Bind.ValueAttribute",
            MetadataKey::BindChangeAttribute => "Components.Bind.ChangeAttribute",
            MetadataKey::BindExpressionAttribute => "Components.Bind.ExpressionAttribute",
            MetadataKey::BindTypeAttribute => "Components.Bind.TypeAttribute",
            MetadataKey::BindIsInvariantCulture => "Components.Bind.IsInvariantCulture",
            MetadataKey::BindFormat => "Components.Bind.Format",
            MetadataKey::EventArgsType => "Components.EventHandler.EventArgs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Flag(bool),
    Text(String),
}

/// Key/value bag attached to descriptors, bound attributes and parameters.
///
/// Ordered maps keep equality and hashing structural and serialization
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    known: BTreeMap<MetadataKey, MetadataValue>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    custom: BTreeMap<String, String>,
}

impl Metadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.custom.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: MetadataKey) -> Option<&MetadataValue> {
        self.known.get(&key)
    }

    /// A flag is set only when stored as `true`.
    #[must_use]
    pub fn flag(&self, key: MetadataKey) -> bool {
        matches!(self.known.get(&key), Some(MetadataValue::Flag(true)))
    }

    #[must_use]
    pub fn text(&self, key: MetadataKey) -> Option<&str> {
        match self.known.get(&key) {
            Some(MetadataValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, key: MetadataKey) -> bool {
        self.known.contains_key(&key)
    }

    pub fn set_flag(&mut self, key: MetadataKey, value: bool) {
        self.known.insert(key, MetadataValue::Flag(value));
    }

    pub fn set_text(&mut self, key: MetadataKey, value: impl Into<String>) {
        self.known.insert(key, MetadataValue::Text(value.into()));
    }

    pub fn remove(&mut self, key: MetadataKey) {
        self.known.remove(&key);
    }

    #[must_use]
    pub fn custom(&self, key: &str) -> Option<&str> {
        self.custom.get(key).map(String::as_str)
    }

    pub fn set_custom(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.custom.insert(key.into(), value.into());
    }

    pub fn clear(&mut self) {
        self.known.clear();
        self.custom.clear();
    }

    /// Iterate every entry as `(key, value)` strings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        let known = self.known.iter().map(|(key, value)| {
            let value = match value {
                MetadataValue::Flag(flag) => flag.to_string(),
                MetadataValue::Text(text) => text.clone(),
            };
            (key.as_str(), value)
        });
        let custom = self
            .custom
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()));
        known.chain(custom)
    }
}
