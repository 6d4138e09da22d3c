//! Compound selectors: `tag`, `.class`, `#id`, `[attr]` and `[attr="value"]`
//! combined without whitespace. Combinators are not supported; callers walk
//! the tree themselves when structure matters.

use crate::error::SelectorError;
use crate::node::ElementData;

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttributeMatch {
    name: String,
    value: Option<String>,
}

/// Parsed compound selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeMatch>,
}

impl Selector {
    /// Selector matching every element.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Match by tag name.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self {
            tag: Some(name.to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Match by class.
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::default().with_class(name)
    }

    /// Match by attribute presence.
    #[must_use]
    pub fn attr(name: &str) -> Self {
        Self::default().with_attr(name)
    }

    /// Match by exact attribute value.
    #[must_use]
    pub fn attr_eq(name: &str, value: &str) -> Self {
        Self::default().with_attr_eq(name, value)
    }

    /// Add a class requirement.
    #[must_use]
    pub fn with_class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }

    /// Add an attribute presence requirement.
    #[must_use]
    pub fn with_attr(mut self, name: &str) -> Self {
        self.attributes.push(AttributeMatch {
            name: name.to_string(),
            value: None,
        });
        self
    }

    /// Add an exact attribute value requirement.
    #[must_use]
    pub fn with_attr_eq(mut self, name: &str, value: &str) -> Self {
        self.attributes.push(AttributeMatch {
            name: name.to_string(),
            value: Some(value.to_string()),
        });
        self
    }

    /// Parse a compound selector string.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError`] for empty input, combinators or whitespace,
    /// and unterminated attribute selectors.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }
        let bytes = input.as_bytes();
        let mut selector = Self::default();
        let mut pos = 0;

        if input.starts_with('*') {
            pos = 1;
        } else {
            let end = scan_ident(bytes, pos);
            if end > pos {
                selector.tag = Some(input[pos..end].to_ascii_lowercase());
                pos = end;
            }
        }

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' | b'#' => {
                    let start = pos + 1;
                    let end = scan_ident(bytes, start);
                    if end == start {
                        return Err(unexpected(input, pos));
                    }
                    let name = input[start..end].to_string();
                    if bytes[pos] == b'.' {
                        selector.classes.push(name);
                    } else {
                        selector.id = Some(name);
                    }
                    pos = end;
                }
                b'[' => {
                    let close = input[pos..]
                        .find(']')
                        .map(|offset| pos + offset)
                        .ok_or(SelectorError::UnterminatedAttribute)?;
                    let body = &input[pos + 1..close];
                    let attribute = match body.split_once('=') {
                        Some((name, value)) => AttributeMatch {
                            name: name.trim().to_string(),
                            value: Some(unquote(value.trim()).to_string()),
                        },
                        None => AttributeMatch {
                            name: body.trim().to_string(),
                            value: None,
                        },
                    };
                    if attribute.name.is_empty() {
                        return Err(unexpected(input, pos + 1));
                    }
                    selector.attributes.push(attribute);
                    pos = close + 1;
                }
                _ => return Err(unexpected(input, pos)),
            }
        }
        Ok(selector)
    }

    /// Whether an element satisfies every requirement.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        if self.tag.as_deref().is_some_and(|tag| tag != element.tag()) {
            return false;
        }
        if let Some(id) = &self.id {
            if element.attribute("id") != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| element.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            element
                .attribute(&attr.name)
                .is_some_and(|value| attr.value.as_deref().is_none_or(|want| want == value))
        })
    }
}

fn scan_ident(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len()
        && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-' || bytes[pos] == b'_')
    {
        pos += 1;
    }
    pos
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .or_else(|| {
            value
                .strip_prefix('\'')
                .and_then(|rest| rest.strip_suffix('\''))
        })
        .unwrap_or(value)
}

fn unexpected(input: &str, position: usize) -> SelectorError {
    SelectorError::Unexpected {
        found: input[position..].chars().next().unwrap_or(' '),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, attrs: &[(&str, &str)]) -> ElementData {
        let mut data = ElementData::new(tag);
        for (key, value) in attrs {
            data.set_attribute(key, value);
        }
        data
    }

    #[test]
    fn parses_compound_selector() {
        let selector =
            Selector::parse(r#"button.usa-accordion__button[aria-controls][type="button"]"#)
                .expect("selector");
        let button = element(
            "button",
            &[
                ("class", "usa-accordion__button"),
                ("aria-controls", "a1"),
                ("type", "button"),
            ],
        );
        assert!(selector.matches(&button));
        assert!(!selector.matches(&element("button", &[("class", "usa-accordion__button")])));
    }

    #[test]
    fn builder_matches_like_parsed_form() {
        let built = Selector::tag("th").with_attr("data-sortable");
        assert_eq!(built, Selector::parse("th[data-sortable]").expect("selector"));
        assert_eq!(
            Selector::parse("#tip").expect("selector"),
            Selector {
                id: Some("tip".into()),
                ..Selector::default()
            }
        );
    }

    #[test]
    fn rejects_combinators_and_garbage() {
        assert_eq!(Selector::parse("  "), Err(SelectorError::Empty));
        assert!(matches!(
            Selector::parse("div > p"),
            Err(SelectorError::Unexpected { found: ' ', .. })
        ));
        assert_eq!(
            Selector::parse("[open"),
            Err(SelectorError::UnterminatedAttribute)
        );
        assert!(Selector::parse(".").is_err());
    }

    #[test]
    fn universal_selector_matches_everything() {
        let selector = Selector::parse("*").expect("selector");
        assert!(selector.matches(&element("td", &[])));
        assert_eq!(selector, Selector::any());
    }
}
