//! CSS color validators

use regex::Regex;

use crate::foundation::ValidationError;
use crate::validators::Patterns;

crate::validator! {
    /// Validates a hex color: `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`.
    pub HexColor { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("hex color") }
    new(patterns: &Patterns) { Self { pattern: patterns.hex_color.clone() } }
    fn hex_color(patterns: &Patterns);
}

crate::validator! {
    /// Validates `rgb(r, g, b)` with byte or percentage channels.
    pub Rgb { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("rgb color") }
    new(patterns: &Patterns) { Self { pattern: patterns.rgb.clone() } }
    fn rgb(patterns: &Patterns);
}

crate::validator! {
    /// Validates `rgba(r, g, b, a)` with alpha in `[0, 1]`.
    pub Rgba { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("rgba color") }
    new(patterns: &Patterns) { Self { pattern: patterns.rgba.clone() } }
    fn rgba(patterns: &Patterns);
}

crate::validator! {
    /// Validates `hsl(h, s%, l%)`.
    pub Hsl { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("hsl color") }
    new(patterns: &Patterns) { Self { pattern: patterns.hsl.clone() } }
    fn hsl(patterns: &Patterns);
}

crate::validator! {
    /// Validates `hsla(h, s%, l%, a)`.
    pub Hsla { pattern: Regex } for str;
    rule(self, input) { self.pattern.is_match(input) }
    error(self, input) { ValidationError::invalid_format("hsla color") }
    new(patterns: &Patterns) { Self { pattern: patterns.hsla.clone() } }
    fn hsla(patterns: &Patterns);
}
