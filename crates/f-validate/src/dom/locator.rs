// File: src/dom/locator.rs
// Purpose: The selector subset used by field criteria and placement attributes

use super::Dom;

/// A parsed selector.
///
/// Supports comma-separated alternatives of compound selectors built from a
/// tag, `#id`, `.class`, `[attr]` and `[attr=value]`. Combinators are not
/// supported; a locator that does not parse matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    source: String,
    alternatives: Vec<Compound>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Locator {
    /// Parses `source`, returning `None` when it uses unsupported syntax
    pub fn parse(source: &str) -> Option<Self> {
        let alternatives = split_alternatives(source)
            .into_iter()
            .map(|part| parse_compound(part.trim()))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// `[name]` or `[name="value"]`
    pub fn attribute(name: &str, value: Option<&str>) -> Self {
        let source = match value {
            Some(value) => format!("[{}=\"{}\"]", name, value),
            None => format!("[{}]", name),
        };

        Self {
            source,
            alternatives: vec![Compound {
                attributes: vec![(name.to_ascii_lowercase(), value.map(str::to_string))],
                ..Compound::default()
            }],
        }
    }

    /// `.class`
    pub fn class(class: &str) -> Self {
        Self {
            source: format!(".{}", class),
            alternatives: vec![Compound {
                classes: vec![class.to_string()],
                ..Compound::default()
            }],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        self.alternatives.iter().any(|compound| compound.matches(dom, node))
    }
}

impl Compound {
    fn matches<D: Dom + ?Sized>(&self, dom: &D, node: &D::Node) -> bool {
        if let Some(tag) = &self.tag {
            if dom.tag_name(node) != *tag {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if dom.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.iter().all(|class| dom.has_class(node, class)) {
            return false;
        }

        self.attributes.iter().all(|(name, expected)| match expected {
            Some(expected) => dom.attribute(node, name).as_deref() == Some(expected.as_str()),
            None => dom.has_attribute(node, name),
        })
    }
}

/// Splits on commas outside quotes and attribute brackets
fn split_alternatives(source: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote = None;
    let mut depth = 0usize;

    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    parts.push(&source[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    (*pos > start).then(|| chars[start..*pos].iter().collect())
}

fn parse_compound(source: &str) -> Option<Compound> {
    if source.is_empty() {
        return None;
    }

    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;
    let mut compound = Compound::default();

    if is_ident_char(chars[0]) {
        compound.tag = Some(take_ident(&chars, &mut pos)?.to_ascii_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                compound.id = Some(take_ident(&chars, &mut pos)?);
            }
            '.' => {
                pos += 1;
                compound.classes.push(take_ident(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                compound.attributes.push(parse_attribute(&chars, &mut pos)?);
            }
            _ => return None,
        }
    }

    Some(compound)
}

fn parse_attribute(chars: &[char], pos: &mut usize) -> Option<(String, Option<String>)> {
    let name = take_ident(chars, pos)?.to_ascii_lowercase();

    match chars.get(*pos)? {
        ']' => {
            *pos += 1;
            Some((name, None))
        }
        '=' => {
            *pos += 1;
            let value = match chars.get(*pos)? {
                quote @ ('"' | '\'') => {
                    let quote = *quote;
                    *pos += 1;
                    let start = *pos;
                    while chars.get(*pos)? != &quote {
                        *pos += 1;
                    }
                    let value: String = chars[start..*pos].iter().collect();
                    *pos += 1;
                    value
                }
                _ => take_ident(chars, pos)?,
            };

            if chars.get(*pos)? != &']' {
                return None;
            }
            *pos += 1;
            Some((name, Some(value)))
        }
        _ => None,
    }
}
