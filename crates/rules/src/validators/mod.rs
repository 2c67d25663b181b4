//! Built-in leaf validators
//!
//! Typed [`Validate`](crate::foundation::Validate) checks over `str` live in
//! [`text`] and [`color`] and reach runtime values through the [`Text`]
//! adapter. Checks that depend on the value kind (emptiness, bounds, literal
//! comparisons) live in [`bounds`] and implement
//! [`ValueCheck`](crate::registry::ValueCheck) directly.
//!
//! Regular expressions are compiled once into [`Patterns`], which the leaf
//! registry owns and hands out by clone.

pub mod bounds;
pub mod color;
pub mod text;

pub use bounds::{Bound, BooleanLike, IsDefault, Literal, OneOf, Required};
pub use color::{HexColor, Hsl, Hsla, Rgb, Rgba};
pub use text::{
    Alpha, Alphanum, Contains, Email, EndsWith, Excludes, Ip, Ipv4, Ipv6, Lowercase, MatchesRegex,
    Numeric, StartsWith, Text, Uppercase, Url, Uuid,
};

use regex::Regex;

/// Compiled patterns shared by the built-in validators.
///
/// `Regex` clones share the compiled program, so validators built from the
/// same `Patterns` never recompile.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`
    pub hex_color: Regex,
    /// `rgb(r, g, b)` with bytes or percentages
    pub rgb: Regex,
    /// `rgba(r, g, b, a)`
    pub rgba: Regex,
    /// `hsl(h, s%, l%)`
    pub hsl: Regex,
    /// `hsla(h, s%, l%, a)`
    pub hsla: Regex,
    /// Email addresses.
    pub email: Regex,
    /// `http`/`https` URLs.
    pub url: Regex,
    /// Hyphenated UUIDs.
    pub uuid: Regex,
    /// ASCII letters.
    pub alpha: Regex,
    /// ASCII letters and digits.
    pub alphanum: Regex,
    /// Signed decimal numbers.
    pub numeric: Regex,
}

const BYTE: &str = r"(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)";
const PERCENT: &str = r"(?:100|[1-9]?\d)%";
const ALPHA: &str = r"(?:(?:0|1)(?:\.0+)?|0?\.\d+)";
const HUE: &str = r"(?:360|3[0-5]\d|[12]\d\d|[1-9]?\d)";

impl Patterns {
    /// Compiles every built-in pattern.
    #[must_use]
    pub fn compile() -> Self {
        let channels = format!(
            r"(?:{BYTE}\s*,\s*{BYTE}\s*,\s*{BYTE}|{PERCENT}\s*,\s*{PERCENT}\s*,\s*{PERCENT})"
        );
        let hsl = format!(r"{HUE}\s*,\s*{PERCENT}\s*,\s*{PERCENT}");

        Self {
            hex_color: pattern(
                r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$",
            ),
            rgb: pattern(&format!(r"^rgb\(\s*{channels}\s*\)$")),
            rgba: pattern(&format!(r"^rgba\(\s*{channels}\s*,\s*{ALPHA}\s*\)$")),
            hsl: pattern(&format!(r"^hsl\(\s*{hsl}\s*\)$")),
            hsla: pattern(&format!(r"^hsla\(\s*{hsl}\s*,\s*{ALPHA}\s*\)$")),
            email: pattern(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
            ),
            url: pattern(r"^https?://[^\s/$.?#].[^\s]*$"),
            uuid: pattern(
                r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
            ),
            alpha: pattern(r"^[a-zA-Z]+$"),
            alphanum: pattern(r"^[a-zA-Z0-9]+$"),
            numeric: pattern(r"^[-+]?\d+(?:\.\d+)?$"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::compile()
    }
}

#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in pattern compiles")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        let patterns = Patterns::compile();
        assert!(patterns.hex_color.is_match("#FF0000"));
        assert!(patterns.rgb.is_match("rgb(255,0,0)"));
        assert!(patterns.rgb.is_match("rgb( 10%, 20%, 100% )"));
        assert!(!patterns.rgb.is_match("rgb(256,0,0)"));
        assert!(patterns.uuid.is_match("550e8400-e29b-41d4-a716-446655440000"));
    }
}
