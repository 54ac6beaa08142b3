//! Name comparison and validation shared by descriptors, builders and the
//! binder.

/// Characters never allowed in tag or attribute names.
pub(crate) const INVALID_NAME_CHARACTERS: &[char] =
    &['@', '!', '<', '/', '?', '[', '>', ']', '=', '"', '\'', '*'];

#[must_use]
pub fn names_equal(left: &str, right: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        left == right
    } else {
        left.eq_ignore_ascii_case(right)
    }
}

#[must_use]
pub fn name_starts_with(name: &str, prefix: &str, case_sensitive: bool) -> bool {
    if name.len() < prefix.len() || !name.is_char_boundary(prefix.len()) {
        return false;
    }
    names_equal(&name[..prefix.len()], prefix, case_sensitive)
}

/// The first character that may not appear in a markup name, treating
/// whitespace as invalid too.
pub(crate) fn find_invalid_character(name: &str) -> Option<char> {
    name.chars()
        .find(|c| c.is_whitespace() || INVALID_NAME_CHARACTERS.contains(c))
}

/// Validate a tag or parent tag name. `Err(None)` means empty or whitespace.
pub(crate) fn validate_tag_name(name: &str, allow_wildcard: bool) -> Result<(), Option<char>> {
    if name.trim().is_empty() {
        return Err(None);
    }
    if allow_wildcard && name == "*" {
        return Ok(());
    }
    match find_invalid_character(name) {
        Some(character) => Err(Some(character)),
        None => Ok(()),
    }
}

/// Validate an attribute name, skipping the transition of a directive
/// attribute.
pub(crate) fn invalid_attribute_character(name: &str, is_directive_attribute: bool) -> Option<char> {
    let name = if is_directive_attribute {
        name.strip_prefix('@').unwrap_or(name)
    } else {
        name
    };
    find_invalid_character(name)
}

/// Convert a Pascal-cased member name to lower-case hyphenated form:
/// `InputTagHelper` becomes `input-tag-helper`, `SomeURLValue` becomes
/// `some-url-value`.
#[must_use]
pub fn to_html_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut html = String::with_capacity(name.len() + 4);
    for (index, &c) in chars.iter().enumerate() {
        if index > 0 && c.is_ascii_uppercase() {
            let previous = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            if (previous.is_ascii_alphanumeric() && next_is_lower) || previous.is_ascii_lowercase() {
                html.push('-');
            }
        }
        html.push(c.to_ascii_lowercase());
    }
    html
}
