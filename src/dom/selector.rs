//! Tiny selector subset used by the effect layer.
//!
//! Supported: `tag`, `#id`, `.class`, `[attr]`, `[attr="v"]`, `[attr^="v"]`,
//! any compound of those, and comma-separated lists. No combinators.

use super::Element;

#[derive(Debug, Clone, PartialEq)]
enum AttrMatch {
    Exists(String),
    Equals(String, String),
    Prefix(String, String),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parse a selector list. Returns `None` for anything outside the subset.
    pub fn parse(input: &str) -> Option<Self> {
        let mut alternatives = Vec::new();
        for part in input.split(',') {
            alternatives.push(parse_compound(part.trim())?);
        }
        if alternatives.is_empty() {
            return None;
        }
        Some(Self { alternatives })
    }

    pub fn matches(&self, el: &Element) -> bool {
        self.alternatives.iter().any(|c| compound_matches(c, el))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &[char], pos: &mut usize) -> Option<String> {
    let start = *pos;
    while *pos < chars.len() && is_ident_char(chars[*pos]) {
        *pos += 1;
    }
    if *pos == start {
        None
    } else {
        Some(chars[start..*pos].iter().collect())
    }
}

fn parse_compound(s: &str) -> Option<Compound> {
    if s.is_empty() {
        return None;
    }
    let chars: Vec<char> = s.chars().collect();
    let mut pos = 0;
    let mut c = Compound::default();

    if chars[0] == '*' {
        pos = 1;
    } else if is_ident_char(chars[0]) {
        c.tag = Some(take_ident(&chars, &mut pos)?.to_lowercase());
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                c.id = Some(take_ident(&chars, &mut pos)?);
            }
            '.' => {
                pos += 1;
                c.classes.push(take_ident(&chars, &mut pos)?);
            }
            '[' => {
                pos += 1;
                let close = chars[pos..].iter().position(|&ch| ch == ']')? + pos;
                let body: String = chars[pos..close].iter().collect();
                c.attrs.push(parse_attr(&body)?);
                pos = close + 1;
            }
            _ => return None,
        }
    }
    Some(c)
}

fn parse_attr(body: &str) -> Option<AttrMatch> {
    let unquote = |v: &str| v.trim().trim_matches('"').trim_matches('\'').to_string();
    if let Some((name, value)) = body.split_once("^=") {
        return Some(AttrMatch::Prefix(name.trim().to_string(), unquote(value)));
    }
    if let Some((name, value)) = body.split_once('=') {
        return Some(AttrMatch::Equals(name.trim().to_string(), unquote(value)));
    }
    let name = body.trim();
    if name.is_empty() || !name.chars().all(is_ident_char) {
        return None;
    }
    Some(AttrMatch::Exists(name.to_string()))
}

fn compound_matches(c: &Compound, el: &Element) -> bool {
    if !el.is_element() {
        return false;
    }
    if let Some(ref tag) = c.tag {
        if &el.tag != tag {
            return false;
        }
    }
    if let Some(ref id) = c.id {
        if el.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    if !c.classes.iter().all(|cls| el.has_class(cls)) {
        return false;
    }
    c.attrs.iter().all(|m| match m {
        AttrMatch::Exists(n) => el.attr(n).is_some(),
        AttrMatch::Equals(n, v) => el.attr(n) == Some(v.as_str()),
        AttrMatch::Prefix(n, v) => el.attr(n).is_some_and(|a| a.starts_with(v.as_str())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_forms() {
        assert!(Selector::parse(".nav-link").is_some());
        assert!(Selector::parse("a[href^=\"#\"]").is_some());
        assert!(Selector::parse(".terminal-window, .project-card, .gallery-item").is_some());
        assert!(Selector::parse("section#skills.dark").is_some());
    }

    #[test]
    fn rejects_combinators() {
        assert!(Selector::parse(".gallery-item img").is_none());
        assert!(Selector::parse("ul > li").is_none());
        assert!(Selector::parse("").is_none());
    }
}
