//! Lightweight inline-style handling.
//!
//! Elements carry their inline `style=""` declarations as a [`StyleMap`].
//! Effects write declarations (`width`, `opacity`, `filter`, custom
//! properties) and the native host reads a few of them back to paint.

/// Ordered list of inline CSS declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    decls: Vec<(String, String)>,
}

impl StyleMap {
    pub fn get(&self, prop: &str) -> Option<&str> {
        self.decls
            .iter()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.as_str())
    }

    /// Set a declaration, replacing an existing one in place.
    pub fn set(&mut self, prop: &str, value: impl Into<String>) {
        let value = value.into();
        match self.decls.iter_mut().find(|(k, _)| k == prop) {
            Some(slot) => slot.1 = value,
            None => self.decls.push((prop.to_string(), value)),
        }
    }

    pub fn remove(&mut self, prop: &str) -> Option<String> {
        let idx = self.decls.iter().position(|(k, _)| k == prop)?;
        Some(self.decls.remove(idx).1)
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Serialize back to `prop: value; ...` form.
    pub fn to_css_text(&self) -> String {
        self.decls
            .iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Parse an inline `style="..."` attribute value.
pub fn parse_inline_style(style: &str) -> StyleMap {
    let mut map = StyleMap::default();
    for decl in style.split(';') {
        let parts: Vec<&str> = decl.splitn(2, ':').collect();
        if parts.len() != 2 {
            continue;
        }
        let prop = parts[0].trim().to_lowercase();
        let val = parts[1].trim();
        if prop.is_empty() || val.is_empty() {
            continue;
        }
        map.set(&prop, val);
    }
    map
}

/// Parse a CSS color value into [r, g, b, a] (0.0–1.0).
pub fn parse_css_color(val: &str) -> Option<[f32; 4]> {
    let v = val.trim().to_lowercase();

    let named = match v.as_str() {
        "black" => Some([0.0, 0.0, 0.0, 1.0]),
        "white" => Some([1.0, 1.0, 1.0, 1.0]),
        "red" => Some([1.0, 0.0, 0.0, 1.0]),
        "green" => Some([0.0, 0.5, 0.0, 1.0]),
        "lime" => Some([0.0, 1.0, 0.0, 1.0]),
        "cyan" => Some([0.0, 1.0, 1.0, 1.0]),
        "magenta" => Some([1.0, 0.0, 1.0, 1.0]),
        "gray" | "grey" => Some([0.5, 0.5, 0.5, 1.0]),
        "transparent" => Some([0.0, 0.0, 0.0, 0.0]),
        _ => None,
    };
    if named.is_some() {
        return named;
    }

    if let Some(hex) = v.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0])
            }
            _ => None,
        };
    }

    if v.starts_with("rgb") {
        let inner = v
            .trim_start_matches("rgba(")
            .trim_start_matches("rgb(")
            .trim_end_matches(')');
        let nums: Vec<f32> = inner
            .split(',')
            .filter_map(|s| s.trim().parse::<f32>().ok())
            .collect();
        if nums.len() >= 3 {
            let a = if nums.len() >= 4 { nums[3] } else { 1.0 };
            return Some([
                (nums[0] / 255.0).clamp(0.0, 1.0),
                (nums[1] / 255.0).clamp(0.0, 1.0),
                (nums[2] / 255.0).clamp(0.0, 1.0),
                a.clamp(0.0, 1.0),
            ]);
        }
    }

    None
}

/// Parse `"75%"` (or a bare number) into a fraction in `0.0..=1.0`.
pub fn parse_percent(val: &str) -> Option<f32> {
    let num = val.trim().trim_end_matches('%').trim();
    num.parse::<f32>().ok().map(|p| (p / 100.0).clamp(0.0, 1.0))
}

/// Extract the angle in degrees from a `hue-rotate(...)` filter value.
pub fn parse_hue_rotate(val: &str) -> Option<f32> {
    let v = val.trim().to_lowercase();
    let inner = v.strip_prefix("hue-rotate(")?.strip_suffix(')')?.trim();
    if let Some(deg) = inner.strip_suffix("deg") {
        deg.trim().parse().ok()
    } else if let Some(turn) = inner.strip_suffix("turn") {
        turn.trim().parse::<f32>().ok().map(|t| t * 360.0)
    } else {
        inner.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inline() {
        let props = parse_inline_style("width: 80%; Opacity: 0 ; --target-width: 80%");
        assert_eq!(props.get("width"), Some("80%"));
        assert_eq!(props.get("opacity"), Some("0"));
        assert_eq!(props.get("--target-width"), Some("80%"));
    }

    #[test]
    fn set_replaces_in_place() {
        let mut s = parse_inline_style("a: 1; b: 2");
        s.set("a", "3");
        assert_eq!(s.to_css_text(), "a: 3; b: 2");
        assert_eq!(s.remove("b").as_deref(), Some("2"));
        assert_eq!(s.to_css_text(), "a: 3");
    }

    #[test]
    fn parse_hex_colors() {
        let c = parse_css_color("#00ff00").unwrap();
        assert!(c[0].abs() < 0.01);
        assert!((c[1] - 1.0).abs() < 0.01);

        let c3 = parse_css_color("#0f0").unwrap();
        assert!((c3[1] - 1.0).abs() < 0.01);
    }

    #[test]
    fn parse_rgba_color() {
        let c = parse_css_color("rgba(0, 0, 0, 0.04)").unwrap();
        assert!((c[3] - 0.04).abs() < 0.001);
    }

    #[test]
    fn percent_and_filter() {
        assert_eq!(parse_percent("75%"), Some(0.75));
        assert_eq!(parse_percent("250"), Some(1.0));
        assert_eq!(parse_hue_rotate("hue-rotate(120deg)"), Some(120.0));
        assert_eq!(parse_hue_rotate("none"), None);
    }
}
