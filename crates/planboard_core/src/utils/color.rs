//! Project color helpers.

use uuid::Uuid;

/// Palette new projects draw their color from.
pub const PROJECT_PALETTE: [&str; 12] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#84cc16", "#f97316",
    "#ec4899", "#6366f1", "#14b8a6", "#eab308",
];

/// Picks a palette color at random.
pub fn random_project_color() -> &'static str {
    let seed = Uuid::new_v4().as_bytes()[0] as usize;
    PROJECT_PALETTE[seed % PROJECT_PALETTE.len()]
}

/// Parses `#rrggbb` (leading `#` optional) into its channels.
pub fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Whether `value` is a `#rrggbb` color.
pub fn is_hex_color(value: &str) -> bool {
    value.starts_with('#') && parse_hex(value).is_some()
}

/// CSS `rgba(...)` form of a hex color, or `None` for malformed input.
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Option<String> {
    let (r, g, b) = parse_hex(hex)?;
    Some(format!("rgba({r}, {g}, {b}, {alpha})"))
}

/// Black or white, whichever reads better on `background`.
///
/// Uses the YIQ brightness weights; malformed input falls back to black.
pub fn contrast_color(background: &str) -> &'static str {
    let Some((r, g, b)) = parse_hex(background) else {
        return "#000000";
    };
    let brightness = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    if brightness > 128 {
        "#000000"
    } else {
        "#ffffff"
    }
}

#[cfg(test)]
mod tests {
    use super::{contrast_color, hex_to_rgba, is_hex_color, random_project_color, PROJECT_PALETTE};

    #[test]
    fn random_color_comes_from_palette() {
        for _ in 0..20 {
            assert!(PROJECT_PALETTE.contains(&random_project_color()));
        }
    }

    #[test]
    fn hex_to_rgba_formats_channels() {
        assert_eq!(
            hex_to_rgba("#3b82f6", 0.5).as_deref(),
            Some("rgba(59, 130, 246, 0.5)")
        );
        assert_eq!(hex_to_rgba("#xyz", 1.0), None);
    }

    #[test]
    fn contrast_picks_black_on_light_and_white_on_dark() {
        assert_eq!(contrast_color("#ffffff"), "#000000");
        assert_eq!(contrast_color("#f59e0b"), "#000000");
        assert_eq!(contrast_color("#1e293b"), "#ffffff");
    }

    #[test]
    fn hex_color_requires_hash_and_six_digits() {
        assert!(is_hex_color("#10b981"));
        assert!(!is_hex_color("10b981"));
        assert!(!is_hex_color("#10b98"));
    }
}
