//! Defines the theme configuration types: [`ThemeDefinition`], the raw theme
//! as it's deserialized from YAML, [`ThemeConfig`], the validated theme, and
//! [`Styles`], the selector-keyed style tables used both for theme overrides
//! and for the engine's generated global styles. Also defines
//! [`ConfigurationError`].

use crate::fonts::GoogleFont;
use crate::length::{format_number, parse_number, Length, Unit};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::PathBuf;

/// CSS declarations for a single selector, keyed by property name. Property
/// names are camelCase (`boxShadow`) and are converted to kebab-case when
/// the styles are compiled.
pub type Declarations = IndexMap<String, String>;

/// A table of CSS rules keyed by selector. Insertion order is preserved
/// since it determines the order of the compiled CSS.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Styles(IndexMap<String, Declarations>);

/// A patch of [`Styles`] applied over a theme's `override_styles`.
pub type StyleOverride = Styles;

impl Styles {
    pub fn new() -> Styles {
        Styles::default()
    }

    /// Adds a rule built from `(property, value)` pairs, replacing any
    /// existing rule for `selector`.
    pub fn with(mut self, selector: &str, declarations: &[(&str, &str)]) -> Styles {
        self.insert(
            selector,
            declarations
                .iter()
                .map(|(property, value)| (property.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    pub fn get(&self, selector: &str) -> Option<&Declarations> {
        self.0.get(selector)
    }

    /// Inserts the rule for `selector`, returning the rule it replaced.
    pub fn insert(
        &mut self,
        selector: impl Into<String>,
        declarations: Declarations,
    ) -> Option<Declarations> {
        self.0.insert(selector.into(), declarations)
    }

    /// Sets a single property on `selector`'s rule, creating the rule if
    /// needed.
    pub fn set(&mut self, selector: &str, property: &str, value: impl Into<String>) {
        self.0
            .entry(selector.to_owned())
            .or_default()
            .insert(property.to_owned(), value.into());
    }

    /// Shallow merge: each selector in `patch` replaces that selector's whole
    /// rule here. Selectors that aren't in `patch` are left alone.
    pub fn merge(&mut self, patch: &Styles) {
        for (selector, declarations) in patch.iter() {
            self.0.insert(selector.clone(), declarations.clone());
        }
    }

    /// Deep merge: each property in `patch` overwrites the same property of
    /// the same selector here, leaving the selector's other properties in
    /// place.
    pub fn merge_deep(&mut self, patch: &Styles) {
        for (selector, declarations) in patch.iter() {
            let rule = self.0.entry(selector.clone()).or_default();
            for (property, value) in declarations {
                rule.insert(property.clone(), value.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Declarations)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A theme as it's written in a theme file. Every field is optional here;
/// [`ThemeConfig::from_definition`] fills in defaults and rejects themes that
/// are missing the base values.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeDefinition {
    pub title: Option<String>,
    pub base_font_size: Option<Length>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub base_line_height: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub scale_ratio: Option<f64>,
    #[serde(default)]
    pub header_font_family: Vec<String>,
    #[serde(default)]
    pub body_font_family: Vec<String>,
    pub header_color: Option<String>,
    pub body_color: Option<String>,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub header_weight: Option<String>,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub body_weight: Option<String>,
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub bold_weight: Option<String>,
    #[serde(default, deserialize_with = "deserialize_number")]
    pub block_margin_bottom: Option<f64>,
    pub include_normalize: Option<bool>,
    #[serde(default)]
    pub google_fonts: Vec<GoogleFont>,
    pub min_line_padding: Option<Length>,
    pub round_to_nearest_half_line: Option<bool>,
    #[serde(default)]
    pub override_styles: Styles,
}

/// The validated typographic configuration from which a
/// [`crate::engine::TypographyEngine`] is built.
#[derive(Clone, Debug, PartialEq)]
pub struct ThemeConfig {
    pub title: String,

    /// The root font size. Always a `px` length.
    pub base_font_size: Length,

    /// The unitless line height for body text.
    pub base_line_height: f64,

    /// The ratio between consecutive steps of the modular scale. Always
    /// greater than 1 so that the scale increases with the step.
    pub scale_ratio: f64,

    pub header_font_family: Vec<String>,
    pub body_font_family: Vec<String>,
    pub header_color: String,
    pub body_color: String,
    pub header_weight: String,
    pub body_weight: String,
    pub bold_weight: String,

    /// The bottom margin of block elements, in rhythm lines.
    pub block_margin_bottom: f64,

    pub include_normalize: bool,
    pub google_fonts: Vec<GoogleFont>,

    /// The minimum space kept above and below the glyphs when fitting a font
    /// size to whole (or half) lines. Always a `px` length.
    pub min_line_padding: Length,

    pub round_to_nearest_half_line: bool,

    /// Style rules applied over the generated global styles.
    pub override_styles: Styles,
}

const DEFAULT_FONT_FAMILY: &[&str] = &[
    "-apple-system",
    "BlinkMacSystemFont",
    "Segoe UI",
    "Roboto",
    "Oxygen",
    "Ubuntu",
    "Cantarell",
    "Fira Sans",
    "Droid Sans",
    "Helvetica Neue",
    "sans-serif",
];

impl ThemeConfig {
    /// Validates a [`ThemeDefinition`], filling in defaults for the optional
    /// fields. The base font size, base line height and scale ratio are
    /// required.
    pub fn from_definition(definition: ThemeDefinition) -> Result<ThemeConfig> {
        let base_font_size = definition
            .base_font_size
            .ok_or(ConfigurationError::MissingValue("baseFontSize"))?;
        if base_font_size.unit != Unit::Px {
            return Err(invalid("baseFontSize", "must be a px length"));
        }
        if !(base_font_size.value > 0.0) || !base_font_size.value.is_finite() {
            return Err(invalid("baseFontSize", "must be positive and finite"));
        }

        let base_line_height = definition
            .base_line_height
            .ok_or(ConfigurationError::MissingValue("baseLineHeight"))?;
        if !(base_line_height > 0.0) || !base_line_height.is_finite() {
            return Err(invalid("baseLineHeight", "must be positive and finite"));
        }
        if !(base_font_size.value * base_line_height).is_finite() {
            return Err(invalid("baseLineHeight", "line height in px overflows"));
        }

        let scale_ratio = definition
            .scale_ratio
            .ok_or(ConfigurationError::MissingValue("scaleRatio"))?;
        if !(scale_ratio > 1.0) || !scale_ratio.is_finite() {
            return Err(invalid("scaleRatio", "must be finite and greater than 1"));
        }

        let block_margin_bottom = definition.block_margin_bottom.unwrap_or(1.0);
        if !(block_margin_bottom >= 0.0) || !block_margin_bottom.is_finite() {
            return Err(invalid("blockMarginBottom", "must be finite and not negative"));
        }

        let min_line_padding = definition.min_line_padding.unwrap_or(Length::px(2.0));
        if min_line_padding.unit != Unit::Px
            || !(min_line_padding.value >= 0.0)
            || !min_line_padding.value.is_finite()
        {
            return Err(invalid(
                "minLinePadding",
                "must be a finite, non-negative px length",
            ));
        }

        let font_family = |family: Vec<String>| match family.is_empty() {
            true => DEFAULT_FONT_FAMILY.iter().map(|f| f.to_string()).collect(),
            false => family,
        };

        Ok(ThemeConfig {
            title: definition.title.unwrap_or_else(|| String::from("untitled")),
            base_font_size,
            base_line_height,
            scale_ratio,
            header_font_family: font_family(definition.header_font_family),
            body_font_family: font_family(definition.body_font_family),
            header_color: definition
                .header_color
                .unwrap_or_else(|| String::from("inherit")),
            body_color: definition
                .body_color
                .unwrap_or_else(|| String::from("hsla(0,0%,0%,0.8)")),
            header_weight: definition
                .header_weight
                .unwrap_or_else(|| String::from("bold")),
            body_weight: definition
                .body_weight
                .unwrap_or_else(|| String::from("normal")),
            bold_weight: definition
                .bold_weight
                .unwrap_or_else(|| String::from("bold")),
            block_margin_bottom,
            include_normalize: definition.include_normalize.unwrap_or(true),
            google_fonts: definition.google_fonts,
            min_line_padding,
            round_to_nearest_half_line: definition.round_to_nearest_half_line.unwrap_or(true),
            override_styles: definition.override_styles,
        })
    }

    /// Applies a [`StyleOverride`] patch to the theme's override table. See
    /// [`Styles::merge`] for the merge semantics.
    pub fn with_overrides(mut self, patch: &StyleOverride) -> ThemeConfig {
        self.override_styles.merge(patch);
        self
    }

    /// The base font size in pixels.
    pub fn base_font_size_px(&self) -> f64 {
        self.base_font_size.value
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field,
        reason: reason.to_owned(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

// Accepts either a finite YAML number or a fraction string like `5/2`.
fn deserialize_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Number(n)) if n.is_finite() => Ok(Some(n)),
        Some(Scalar::Number(n)) => Err(D::Error::custom(format!("invalid number: `{}`", n))),
        Some(Scalar::Text(s)) => parse_number(&s)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("{}", e))),
    }
}

// Font weights may be written as numbers (`700`) or keywords (`bold`).
fn deserialize_weight<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => None,
        Some(Scalar::Number(n)) => Some(format_number(n)),
        Some(Scalar::Text(s)) => Some(s),
    })
}

/// The result of a fallible configuration operation.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Represents a malformed or missing theme. These errors are fatal: there is
/// no sensible typography without the base metrics.
#[derive(Debug)]
pub enum ConfigurationError {
    /// Returned when a required base value is absent from the theme.
    MissingValue(&'static str),

    /// Returned when a theme value is present but unusable.
    InvalidValue { field: &'static str, reason: String },

    /// Returned when a theme name isn't in the built-in registry.
    UnknownTheme(String),

    /// Returned for I/O problems while opening theme files.
    OpenThemeFile { path: PathBuf, err: std::io::Error },

    /// Returned when there was an error parsing a theme as YAML.
    DeserializeYaml(serde_yaml::Error),

    /// An error with an annotation.
    Annotated(String, Box<ConfigurationError>),
}

impl fmt::Display for ConfigurationError {
    /// Displays a [`ConfigurationError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigurationError::MissingValue(field) => {
                write!(f, "theme is missing required value `{}`", field)
            }
            ConfigurationError::InvalidValue { field, reason } => {
                write!(f, "invalid theme value `{}`: {}", field, reason)
            }
            ConfigurationError::UnknownTheme(name) => write!(f, "unknown theme `{}`", name),
            ConfigurationError::OpenThemeFile { path, err } => {
                write!(f, "Opening theme file '{}': {}", path.display(), err)
            }
            ConfigurationError::DeserializeYaml(err) => err.fmt(f),
            ConfigurationError::Annotated(annotation, err) => {
                write!(f, "{}: {}", annotation, err)
            }
        }
    }
}

impl std::error::Error for ConfigurationError {
    /// Implements the [`std::error::Error`] trait for [`ConfigurationError`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigurationError::MissingValue(_) => None,
            ConfigurationError::InvalidValue { .. } => None,
            ConfigurationError::UnknownTheme(_) => None,
            ConfigurationError::OpenThemeFile { path: _, err } => Some(err),
            ConfigurationError::DeserializeYaml(err) => Some(err),
            ConfigurationError::Annotated(_, err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for ConfigurationError {
    /// Converts a [`serde_yaml::Error`] into a [`ConfigurationError`]. It
    /// allows us to use the `?` operator for [`serde_yaml`] deserialization
    /// functions.
    fn from(err: serde_yaml::Error) -> ConfigurationError {
        ConfigurationError::DeserializeYaml(err)
    }
}
