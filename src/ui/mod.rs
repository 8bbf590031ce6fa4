//! Stateless egui helpers: the terminal palette, the hue-rotate filter,
//! key translation and small text utilities.

use eframe::egui;
use cyber_portfolio::render::canvas::Rgba;

// ─── Palette ──────────────────────────────────────────────────────────────────

pub const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0, 0, 0);
pub const GREEN: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);
pub const DIM_GREEN: egui::Color32 = egui::Color32::from_rgb(0, 110, 0);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(200, 255, 200);
pub const CYAN: egui::Color32 = egui::Color32::from_rgb(0, 255, 255);
pub const PANEL: egui::Color32 = egui::Color32::from_rgb(10, 20, 10);

pub fn to_color32(c: Rgba) -> egui::Color32 {
    let a = (c.a.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, a)
}

/// CSS `hue-rotate(deg)` applied to one color.
pub fn hue_rotate(color: egui::Color32, degrees: f32) -> egui::Color32 {
    if degrees == 0.0 {
        return color;
    }
    let (s, c) = degrees.to_radians().sin_cos();
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let (r, g, b) = (r as f32, g as f32, b as f32);

    let nr = (0.213 + c * 0.787 - s * 0.213) * r
        + (0.715 - c * 0.715 - s * 0.715) * g
        + (0.072 - c * 0.072 + s * 0.928) * b;
    let ng = (0.213 - c * 0.213 + s * 0.143) * r
        + (0.715 + c * 0.285 + s * 0.140) * g
        + (0.072 - c * 0.072 - s * 0.283) * b;
    let nb = (0.213 - c * 0.213 - s * 0.787) * r
        + (0.715 - c * 0.715 + s * 0.715) * g
        + (0.072 + c * 0.928 + s * 0.072) * b;

    let q = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    egui::Color32::from_rgba_unmultiplied(q(nr), q(ng), q(nb), a)
}

// ─── Keys ─────────────────────────────────────────────────────────────────────

/// DOM `KeyboardEvent.code` for an egui key, when the page could care.
pub fn dom_code(key: egui::Key) -> Option<String> {
    use egui::Key;
    let fixed = match key {
        Key::ArrowUp => "ArrowUp",
        Key::ArrowDown => "ArrowDown",
        Key::ArrowLeft => "ArrowLeft",
        Key::ArrowRight => "ArrowRight",
        Key::Escape => "Escape",
        Key::Enter => "Enter",
        Key::Space => "Space",
        Key::Tab => "Tab",
        Key::Backspace => "Backspace",
        _ => "",
    };
    if !fixed.is_empty() {
        return Some(fixed.to_string());
    }
    let name = key.name();
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => Some(format!("Key{}", ch.to_ascii_uppercase())),
        (Some(ch), None) if ch.is_ascii_digit() => Some(format!("Digit{}", ch)),
        _ => None,
    }
}

/// DOM `KeyboardEvent.key` matching a code from [`dom_code`].
pub fn dom_key(code: &str) -> String {
    if let Some(letter) = code.strip_prefix("Key") {
        return letter.to_lowercase();
    }
    if let Some(digit) = code.strip_prefix("Digit") {
        return digit.to_string();
    }
    match code {
        "Space" => " ".to_string(),
        other => other.to_string(),
    }
}

// ─── Text utilities ───────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(hue_rotate(GREEN, 0.0), GREEN);
    }

    #[test]
    fn full_turn_is_near_identity() {
        let c = hue_rotate(GREEN, 360.0);
        let [r, g, b, _] = c.to_srgba_unmultiplied();
        assert!(r <= 2 && g >= 253 && b <= 2);
    }

    #[test]
    fn matrix_mode_shifts_green_away() {
        let [_, g, b, _] = hue_rotate(GREEN, 120.0).to_srgba_unmultiplied();
        assert!(b > g);
    }

    #[test]
    fn keys_map_to_dom_codes() {
        assert_eq!(dom_code(egui::Key::ArrowUp).as_deref(), Some("ArrowUp"));
        assert_eq!(dom_code(egui::Key::B).as_deref(), Some("KeyB"));
        assert_eq!(dom_code(egui::Key::Num7).as_deref(), Some("Digit7"));
        assert_eq!(dom_key("KeyA"), "a");
        assert_eq!(dom_key("Escape"), "Escape");
    }

    #[test]
    fn truncates_by_chars() {
        assert_eq!(truncate_str("Portfolio", 20), "Portfolio");
        assert_eq!(truncate_str("Full Stack Developer", 10), "Full St...");
    }
}
