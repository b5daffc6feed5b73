//! The arithmetic behind vertical rhythm and the modular scale.
//!
//! All spacing is a multiple of the base line height (`base_font_size *
//! base_line_height`), and every font size is fit to a whole (or half)
//! number of those lines so text stays on the baseline grid. Lengths are
//! produced in `rem`, relative to the base font size.

use crate::config::ThemeConfig;
use crate::length::{format_number, Length};

/// A font size fit to the baseline grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scale {
    pub font_size: Length,

    /// Unitless line height (a multiple of `font_size`).
    pub line_height: f64,
}

impl Scale {
    /// The `fontSize` and `lineHeight` declarations for this scale.
    pub fn declarations(&self) -> [(&'static str, String); 2] {
        [
            ("fontSize", self.font_size.to_string()),
            ("lineHeight", format_number(self.line_height)),
        ]
    }
}

/// The rhythm parameters of a theme.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalRhythm {
    base_font_size_px: f64,
    base_line_height: f64,
    scale_ratio: f64,
    min_line_padding_px: f64,
    round_to_nearest_half_line: bool,
}

impl VerticalRhythm {
    pub fn new(config: &ThemeConfig) -> VerticalRhythm {
        VerticalRhythm {
            base_font_size_px: config.base_font_size_px(),
            base_line_height: config.base_line_height,
            scale_ratio: config.scale_ratio,
            min_line_padding_px: config.min_line_padding.value,
            round_to_nearest_half_line: config.round_to_nearest_half_line,
        }
    }

    pub fn base_font_size_px(&self) -> f64 {
        self.base_font_size_px
    }

    /// The height of one rhythm line in pixels.
    pub fn base_line_height_px(&self) -> f64 {
        self.base_font_size_px * self.base_line_height
    }

    /// The length of `lines` rhythm lines.
    pub fn rhythm(&self, lines: f64) -> Length {
        Length::rem(lines * self.base_line_height_px() / self.base_font_size_px)
    }

    /// The modular scale factor for `step`: `scale_ratio ^ step`.
    pub fn modular_scale(&self, step: f64) -> f64 {
        self.scale_ratio.powf(step)
    }

    /// The font size `step` steps along the modular scale from the base font
    /// size, fit to the baseline grid.
    pub fn scale(&self, step: f64) -> Scale {
        self.adjust_font_size_to(self.base_font_size_px * self.modular_scale(step))
    }

    /// The number of rhythm lines a font size occupies: the fewest lines (or
    /// half lines) that leave at least `min_line_padding` above and below.
    pub fn lines_for_font_size(&self, font_size_px: f64) -> f64 {
        let line = self.base_line_height_px();
        let step = match self.round_to_nearest_half_line {
            true => 0.5,
            false => 1.0,
        };
        let needed = font_size_px + self.min_line_padding_px * 2.0;
        let mut lines = (needed / line / step).ceil() * step;
        // the division can round down by an ulp
        while lines * line < needed {
            lines += step;
        }
        lines
    }

    /// Fits an arbitrary font size (in pixels) to the baseline grid.
    pub fn adjust_font_size_to(&self, font_size_px: f64) -> Scale {
        let line_height = match font_size_px > 0.0 {
            true => self.lines_for_font_size(font_size_px) * self.base_line_height_px() / font_size_px,
            false => self.base_line_height,
        };
        Scale {
            font_size: Length::rem(font_size_px / self.base_font_size_px),
            line_height,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{ThemeConfig, ThemeDefinition};

    fn rhythm(base: f64, line_height: f64, ratio: f64) -> VerticalRhythm {
        VerticalRhythm::new(
            &ThemeConfig::from_definition(ThemeDefinition {
                base_font_size: Some(Length::px(base)),
                base_line_height: Some(line_height),
                scale_ratio: Some(ratio),
                ..ThemeDefinition::default()
            })
            .unwrap(),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rhythm_is_linear() {
        let r = rhythm(16.0, 1.45, 1.25);
        assert_eq!(r.rhythm(0.0).value, 0.0);
        for m in &[0.25, 0.5, 1.0, 1.5, 2.0 / 3.0, 3.0, -1.0] {
            assert_eq!(r.rhythm(2.0 * m).value, 2.0 * r.rhythm(*m).value);
        }
        assert!(close(r.rhythm(1.0).to_px(16.0), 16.0 * 1.45));
        assert_eq!(r.rhythm(1.0).to_string(), "1.45rem");
    }

    #[test]
    fn test_scale_is_monotonic() {
        let r = rhythm(16.0, 1.45, 1.25);
        for step in -6..6 {
            let lower = r.scale(step as f64).font_size.value;
            let upper = r.scale((step + 1) as f64).font_size.value;
            assert!(lower < upper, "scale({}) >= scale({})", step, step + 1);
        }
        assert!(close(r.scale(0.0).font_size.to_px(16.0), 16.0));
        assert!(close(r.scale(1.0).font_size.to_px(16.0), 20.0));
    }

    #[test]
    fn test_lines_for_font_size() {
        // One line is 23.2px.
        let r = rhythm(16.0, 1.45, 2.0);
        assert_eq!(r.lines_for_font_size(16.0), 1.0);
        // 20px fits in one line but leaves less than 2px on either side.
        assert_eq!(r.lines_for_font_size(20.0), 1.5);
        assert_eq!(r.lines_for_font_size(32.0), 2.0);
        assert_eq!(r.lines_for_font_size(40.0), 2.0);
    }

    #[test]
    fn test_large_line_padding() {
        let r = VerticalRhythm::new(
            &ThemeConfig::from_definition(ThemeDefinition {
                base_font_size: Some(Length::px(16.0)),
                base_line_height: Some(1.45),
                scale_ratio: Some(2.0),
                min_line_padding: Some(Length::px(20.0)),
                ..ThemeDefinition::default()
            })
            .unwrap(),
        );
        let line = r.base_line_height_px();
        for font_size in &[8.0, 16.0, 20.0, 32.0, 64.0] {
            let lines = r.lines_for_font_size(*font_size);
            assert!(lines * line - font_size >= 40.0, "{}px in {} lines", font_size, lines);
            assert!((lines - 0.5) * line - font_size < 40.0, "{}px in {} lines", font_size, lines);
        }
        // 16px needs 56px of line box, i.e. 2.5 lines of 23.2px.
        assert_eq!(r.lines_for_font_size(16.0), 2.5);
    }

    #[test]
    fn test_adjust_font_size_to() {
        let r = rhythm(16.0, 1.45, 2.0);
        let scale = r.scale(0.0);
        assert_eq!(scale.font_size, Length::rem(1.0));
        assert!(close(scale.line_height, 1.45));

        let h1 = r.scale(1.0);
        assert_eq!(h1.font_size, Length::rem(2.0));
        assert!(close(h1.line_height, 2.0 * 23.2 / 32.0));
        assert_eq!(h1.declarations()[0], ("fontSize", String::from("2rem")));
    }
}
