//! Defines [`TypographyEngine`], the read-only object presentation code
//! queries for spacing, font sizes, and the theme's global CSS.

use crate::config::{Styles, ThemeConfig};
use crate::length::Length;
use crate::rhythm::{Scale, VerticalRhythm};
use crate::styles;

/// Computes everything derived from a [`ThemeConfig`]. Construction is
/// deterministic and the engine is immutable afterwards, so it can be shared
/// freely between threads.
#[derive(Clone, Debug)]
pub struct TypographyEngine {
    config: ThemeConfig,
    rhythm: VerticalRhythm,
    styles: Styles,
}

/// Builds a [`TypographyEngine`] from a validated [`ThemeConfig`]. The global
/// style table is generated here, once.
pub fn create_typography_engine(config: ThemeConfig) -> TypographyEngine {
    let rhythm = VerticalRhythm::new(&config);
    let styles = styles::global_styles(&config, &rhythm);
    TypographyEngine {
        config,
        rhythm,
        styles,
    }
}

impl TypographyEngine {
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// The vertical space taken by `lines` lines of body text, in `rem`.
    /// Linear in `lines`, and zero for zero lines.
    pub fn rhythm(&self, lines: f64) -> Length {
        self.rhythm.rhythm(lines)
    }

    /// The font size `step` steps along the theme's modular scale (positive
    /// steps are larger than the base font size, negative steps smaller),
    /// along with the line height that keeps it on the baseline grid.
    pub fn scale(&self, step: f64) -> Scale {
        self.rhythm.scale(step)
    }

    /// Fits an arbitrary font size to the baseline grid. `rem`, `em` and `%`
    /// sizes are taken relative to the base font size.
    pub fn adjust_font_size_to(&self, font_size: Length) -> Scale {
        self.rhythm
            .adjust_font_size_to(font_size.to_px(self.rhythm.base_font_size_px()))
    }

    /// The global style table: generated base rules with the theme's
    /// overrides applied.
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// The global style table compiled to CSS.
    pub fn to_css(&self) -> String {
        styles::compile(&self.styles)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Result, ThemeDefinition};

    fn engine(base: f64, line_height: f64, ratio: f64) -> Result<TypographyEngine> {
        Ok(create_typography_engine(ThemeConfig::from_definition(
            ThemeDefinition {
                base_font_size: Some(Length::px(base)),
                base_line_height: Some(line_height),
                scale_ratio: Some(ratio),
                ..ThemeDefinition::default()
            },
        )?))
    }

    #[test]
    fn test_scenario() -> Result<()> {
        let engine = engine(16.0, 1.45, 1.25)?;
        assert!((engine.rhythm(1.0).to_px(16.0) - 16.0 * 1.45).abs() < 1e-9);
        assert!((engine.scale(0.0).font_size.to_px(16.0) - 16.0).abs() < 1e-9);
        assert_eq!(engine.rhythm(0.0).value, 0.0);
        Ok(())
    }

    #[test]
    fn test_outputs_are_stable() -> Result<()> {
        let first = engine(18.0, 1.6, 1.5)?;
        let second = engine(18.0, 1.6, 1.5)?;
        for step in &[-2.0, -0.2, 0.0, 0.6, 1.0, 3.0] {
            assert_eq!(first.scale(*step), second.scale(*step));
            assert_eq!(first.scale(*step), first.scale(*step));
            assert_eq!(first.rhythm(*step), second.rhythm(*step));
        }
        assert_eq!(first.to_css(), second.to_css());
        Ok(())
    }

    #[test]
    fn test_adjust_font_size_to() -> Result<()> {
        let engine = engine(16.0, 1.5, 2.0)?;
        let percent = engine.adjust_font_size_to("85%".parse().unwrap());
        let px = engine.adjust_font_size_to(Length::px(13.6));
        assert_eq!(percent.font_size.to_string(), "0.85rem");
        assert!((percent.line_height - px.line_height).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn test_to_css() -> Result<()> {
        let css = engine(16.0, 1.5, 2.0)?.to_css();
        assert!(css.starts_with("html{"));
        assert!(css.contains("h1{font-size:2rem;line-height:1.125;}"));
        Ok(())
    }
}
