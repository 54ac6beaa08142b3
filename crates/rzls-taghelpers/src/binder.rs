use rustc_hash::FxHashMap;

use crate::names::name_starts_with;
use crate::names::names_equal;
use crate::BoundAttributeDescriptor;
use crate::BoundAttributeParameterDescriptor;
use crate::TagHelperDescriptor;
use crate::TagHelperKind;
use crate::TagMatchingRule;

/// Index of descriptors by target tag name, answering which descriptors
/// apply to a concrete element.
#[derive(Debug, Clone)]
pub struct TagHelperBinder {
    prefix: Option<String>,
    descriptors: Vec<TagHelperDescriptor>,
    /// Lower-cased tag name to descriptor indices, ascending.
    by_tag: FxHashMap<String, Vec<usize>>,
    catch_all: Vec<usize>,
}

impl TagHelperBinder {
    #[must_use]
    pub fn new(prefix: Option<String>, descriptors: Vec<TagHelperDescriptor>) -> Self {
        let mut by_tag: FxHashMap<String, Vec<usize>> = FxHashMap::default();
        let mut catch_all = Vec::new();

        for (index, descriptor) in descriptors.iter().enumerate() {
            for rule in descriptor.tag_matching_rules() {
                let bucket = if rule.is_catch_all() {
                    &mut catch_all
                } else {
                    by_tag.entry(rule.tag_name().to_ascii_lowercase()).or_default()
                };
                if bucket.last() != Some(&index) {
                    bucket.push(index);
                }
            }
        }

        Self {
            prefix: prefix.filter(|prefix| !prefix.is_empty()),
            descriptors,
            by_tag,
            catch_all,
        }
    }

    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    #[must_use]
    pub fn descriptors(&self) -> &[TagHelperDescriptor] {
        &self.descriptors
    }

    /// Bind an element. Returns `None` when nothing applies, including every
    /// element that lacks the configured tag prefix.
    #[must_use]
    pub fn get_binding(
        &self,
        tag_name: &str,
        attributes: &[(String, String)],
        parent_tag: Option<&str>,
    ) -> Option<TagHelperBinding<'_>> {
        let tag_name = self.strip_prefix(tag_name)?;
        let parent_tag = parent_tag.map(|parent| self.strip_prefix(parent).unwrap_or(parent));

        let mut candidates: Vec<usize> = self
            .by_tag
            .get(&tag_name.to_ascii_lowercase())
            .into_iter()
            .flatten()
            .chain(&self.catch_all)
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let matches: Vec<TagHelperMatch<'_>> = candidates
            .into_iter()
            .filter_map(|index| {
                let descriptor = &self.descriptors[index];
                let rules: Vec<_> = descriptor
                    .tag_matching_rules()
                    .iter()
                    .filter(|rule| rule.matches(tag_name, parent_tag, attributes))
                    .collect();
                (!rules.is_empty()).then_some(TagHelperMatch { descriptor, rules })
            })
            .collect();

        if matches.is_empty() {
            return None;
        }

        tracing::trace!(tag_name, matches = matches.len(), "Bound element");
        Some(TagHelperBinding {
            tag_name: tag_name.to_string(),
            parent_tag: parent_tag.map(str::to_string),
            matches,
        })
    }

    fn strip_prefix<'a>(&self, tag_name: &'a str) -> Option<&'a str> {
        match self.prefix.as_deref() {
            None => Some(tag_name),
            Some(prefix) if name_starts_with(tag_name, prefix, false) => {
                let stripped = &tag_name[prefix.len()..];
                (!stripped.is_empty()).then_some(stripped)
            }
            Some(_) => None,
        }
    }
}

/// One descriptor together with the rules of it that matched.
#[derive(Debug, Clone)]
pub struct TagHelperMatch<'a> {
    pub descriptor: &'a TagHelperDescriptor,
    pub rules: Vec<&'a TagMatchingRule>,
}

impl TagHelperMatch<'_> {
    /// Specificity of the best matched rule.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        self.rules
            .iter()
            .map(|rule| rule.specificity())
            .max()
            .unwrap_or_default()
    }
}

/// How a component element resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentResolution<'a> {
    Resolved(&'a TagHelperDescriptor),
    /// Several components share the short name; the fully-qualified tag
    /// disambiguates.
    Ambiguous(Vec<&'a str>),
}

/// The markup attribute a bound attribute, dictionary entry or parameter
/// answers to.
#[derive(Debug, Clone, Copy)]
pub struct BoundAttributeMatch<'a> {
    pub descriptor: &'a TagHelperDescriptor,
    pub attribute: &'a BoundAttributeDescriptor,
    pub parameter: Option<&'a BoundAttributeParameterDescriptor>,
    pub is_indexer: bool,
}

#[derive(Debug, Clone)]
pub struct TagHelperBinding<'a> {
    tag_name: String,
    parent_tag: Option<String>,
    matches: Vec<TagHelperMatch<'a>>,
}

impl<'a> TagHelperBinding<'a> {
    /// The element name with any tag prefix removed.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    #[must_use]
    pub fn parent_tag(&self) -> Option<&str> {
        self.parent_tag.as_deref()
    }

    #[must_use]
    pub fn matches(&self) -> &[TagHelperMatch<'a>] {
        &self.matches
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &'a TagHelperDescriptor> + '_ {
        self.matches.iter().map(|matched| matched.descriptor)
    }

    /// True when every match only classifies attributes, leaving the
    /// element itself as plain markup.
    #[must_use]
    pub fn is_attribute_match(&self) -> bool {
        self.matches
            .iter()
            .all(|matched| matched.descriptor.classify_attributes_only())
    }

    /// The match whose best rule is most specific, optionally restricted to
    /// one kind. Ties go to the descriptor discovered first.
    #[must_use]
    pub fn most_specific(&self, kind: Option<TagHelperKind>) -> Option<&TagHelperMatch<'a>> {
        self.matches
            .iter()
            .filter(|matched| kind.is_none_or(|kind| matched.descriptor.kind() == kind))
            .rev()
            .max_by_key(|matched| matched.specificity())
    }

    /// Resolve component matches: a fully-qualified match wins outright,
    /// otherwise exactly one short-name match must exist.
    #[must_use]
    pub fn component(&self) -> Option<ComponentResolution<'a>> {
        let components: Vec<&'a TagHelperDescriptor> = self
            .descriptors()
            .filter(|descriptor| descriptor.is_component())
            .collect();

        if let Some(qualified) = components
            .iter()
            .copied()
            .find(|descriptor| descriptor.is_fully_qualified_name_match())
        {
            return Some(ComponentResolution::Resolved(qualified));
        }

        match components.as_slice() {
            [] => None,
            [single] => Some(ComponentResolution::Resolved(*single)),
            many => Some(ComponentResolution::Ambiguous(
                many.iter().map(|descriptor| descriptor.name()).collect(),
            )),
        }
    }

    /// Whether `child` may be nested in this element. Only descriptors that
    /// restrict their children have a say.
    #[must_use]
    pub fn is_child_allowed(&self, child: &str) -> bool {
        let mut restricting = self
            .descriptors()
            .filter(|descriptor| !descriptor.allowed_child_tags().is_empty())
            .peekable();
        if restricting.peek().is_none() {
            return true;
        }
        restricting.any(|descriptor| {
            descriptor
                .allowed_child_tags()
                .iter()
                .any(|allowed| names_equal(child, allowed.name(), descriptor.case_sensitive()))
        })
    }

    /// Find what a markup attribute binds to: an exact name first, then a
    /// `name:parameter` form, then a dictionary prefix.
    #[must_use]
    pub fn bound_attribute_for(&self, name: &str) -> Option<BoundAttributeMatch<'a>> {
        let attributes = || {
            self.descriptors().flat_map(|descriptor| {
                descriptor
                    .bound_attributes()
                    .iter()
                    .map(move |attribute| (descriptor, attribute))
            })
        };

        if let Some((descriptor, attribute)) =
            attributes().find(|(_, attribute)| attribute.matches_name(name))
        {
            return Some(BoundAttributeMatch {
                descriptor,
                attribute,
                parameter: None,
                is_indexer: false,
            });
        }

        if let Some((base, parameter_name)) = name.split_once(':') {
            let owners: Vec<_> = attributes()
                .filter_map(|(descriptor, attribute)| {
                    if attribute.matches_name(base) {
                        Some((descriptor, attribute, false))
                    } else if attribute.matches_indexer(base) {
                        Some((descriptor, attribute, true))
                    } else {
                        None
                    }
                })
                .collect();
            // A known base with an unknown parameter binds to nothing.
            if !owners.is_empty() {
                return owners
                    .into_iter()
                    .find_map(|(descriptor, attribute, is_indexer)| {
                        attribute
                            .find_parameter(parameter_name)
                            .map(|parameter| BoundAttributeMatch {
                                descriptor,
                                attribute,
                                parameter: Some(parameter),
                                is_indexer,
                            })
                    });
            }
        }

        attributes()
            .find(|(_, attribute)| attribute.matches_indexer(name))
            .map(|(descriptor, attribute)| BoundAttributeMatch {
                descriptor,
                attribute,
                parameter: None,
                is_indexer: true,
            })
    }
}
