//! CSS-like selectors over virtual nodes.
//!
//! Supported: tag names, `*`, `.class`, `#id`, `[attr]` and `[attr=value]`
//! compounds, joined by whitespace as descendant combinators.

use super::vnode::VNode;
use super::DomError;

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    pub(crate) fn parse(input: &str) -> Result<Self, DomError> {
        let invalid = |reason: &str| DomError::InvalidSelector {
            selector: input.to_string(),
            reason: reason.to_string(),
        };
        let chars: Vec<char> = input.chars().collect();
        let mut compound = Compound::default();
        let mut pos = 0;

        if chars.first() == Some(&'*') {
            pos = 1;
        } else {
            let tag = read_ident(&chars, &mut pos);
            if !tag.is_empty() {
                compound.tag = Some(tag);
            }
        }

        while pos < chars.len() {
            let marker = chars[pos];
            pos += 1;
            match marker {
                '.' | '#' => {
                    let name = read_ident(&chars, &mut pos);
                    if name.is_empty() {
                        return Err(invalid("expected a name"));
                    }
                    if marker == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                }
                '[' => {
                    let name = read_ident(&chars, &mut pos);
                    if name.is_empty() {
                        return Err(invalid("expected an attribute name"));
                    }
                    let value = if chars.get(pos) == Some(&'=') {
                        pos += 1;
                        Some(read_value(&chars, &mut pos).ok_or_else(|| invalid("unterminated value"))?)
                    } else {
                        None
                    };
                    if chars.get(pos) != Some(&']') {
                        return Err(invalid("expected `]`"));
                    }
                    pos += 1;
                    compound.attrs.push((name, value));
                }
                other => return Err(invalid(&format!("unexpected `{other}`"))),
            }
        }
        Ok(compound)
    }

    pub(crate) fn matches(&self, node: &VNode) -> bool {
        if let Some(tag) = &self.tag {
            if tag != node.tag() {
                return false;
            }
        }
        if self.id.is_some() && self.id.as_deref() != node.id() {
            return false;
        }
        self.classes.iter().all(|class| node.has_class(class))
            && self.attrs.iter().all(|(name, expected)| match (node.get_attr(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            })
    }
}

fn is_ident(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_ident(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

fn read_value(chars: &[char], pos: &mut usize) -> Option<String> {
    match chars.get(*pos) {
        Some(&quote) if quote == '"' || quote == '\'' => {
            let start = *pos + 1;
            let end = chars[start..].iter().position(|c| *c == quote)? + start;
            *pos = end + 1;
            Some(chars[start..end].iter().collect())
        }
        _ => {
            let start = *pos;
            while *pos < chars.len() && chars[*pos] != ']' {
                *pos += 1;
            }
            Some(chars[start..*pos].iter().collect())
        }
    }
}

/// A parsed selector.
#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    steps: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, DomError> {
        let steps = split_steps(input)
            .iter()
            .map(|step| Compound::parse(step))
            .collect::<Result<Vec<_>, _>>()?;
        if steps.is_empty() {
            return Err(DomError::InvalidSelector {
                selector: input.to_string(),
                reason: "empty selector".to_string(),
            });
        }
        Ok(Self { steps })
    }

    /// Every node under `root` (inclusive) matching this selector, in
    /// document order.
    pub fn select<'a>(&self, root: &'a VNode) -> Vec<&'a VNode> {
        let mut found = Vec::new();
        let mut ancestors = Vec::new();
        self.walk(root, &mut ancestors, &mut found);
        found
    }

    fn walk<'a>(&self, node: &'a VNode, ancestors: &mut Vec<&'a VNode>, found: &mut Vec<&'a VNode>) {
        if self.matches(node, ancestors) {
            found.push(node);
        }
        ancestors.push(node);
        for child in node.child_nodes() {
            self.walk(child, ancestors, found);
        }
        ancestors.pop();
    }

    fn matches(&self, node: &VNode, ancestors: &[&VNode]) -> bool {
        let Some((last, rest)) = self.steps.split_last() else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        let mut pending = rest.iter().rev().peekable();
        for ancestor in ancestors.iter().rev() {
            match pending.peek() {
                Some(step) if step.matches(ancestor) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

/// Split on whitespace outside attribute brackets and quotes.
fn split_steps(input: &str) -> Vec<String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    steps.push(std::mem::take(&mut current));
                }
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.is_empty() {
        steps.push(current);
    }
    steps
}
