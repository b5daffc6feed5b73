//! Exports [`initialize`], which takes a theme from definition to a ready
//! [`Typography`] context: validating the theme, applying the site's style
//! overrides, building the [`TypographyEngine`], and, outside of production,
//! injecting the global CSS into a [`StyleTarget`].

use crate::config::{Result, StyleOverride, Styles, ThemeConfig, ThemeDefinition};
use crate::engine::{create_typography_engine, TypographyEngine};
use crate::inject::{StyleTarget, STYLE_ELEMENT_ID};
use crate::length::Length;
use crate::rhythm::Scale;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// The environment variable the binary reads the [`Environment`] from.
pub const ENVIRONMENT_VARIABLE: &str = "FUTHORC_ENV";

/// The mode the site is running in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    /// Production builds embed the CSS at build time, so nothing is injected.
    Production,
    Development,
    Test,
    Other(String),
}

impl Environment {
    /// Reads the environment from [`ENVIRONMENT_VARIABLE`], defaulting to
    /// [`Environment::Development`] when it's unset.
    pub fn from_env() -> Environment {
        match std::env::var(ENVIRONMENT_VARIABLE) {
            Ok(value) => value.parse().unwrap_or(Environment::Development),
            Err(_) => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Environment, Infallible> {
        let s = s.trim();
        Ok(match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "development" | "dev" | "" => Environment::Development,
            "test" => Environment::Test,
            _ => Environment::Other(s.to_owned()),
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Development => f.write_str("development"),
            Environment::Test => f.write_str("test"),
            Environment::Other(name) => f.write_str(name),
        }
    }
}

/// Options for [`initialize`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitOptions {
    /// Whether to inject the global CSS into the style target.
    pub inject_styles: bool,
}

impl InitOptions {
    /// Injects styles in every environment except production.
    pub fn for_environment(environment: &Environment) -> InitOptions {
        InitOptions {
            inject_styles: !environment.is_production(),
        }
    }
}

/// The blog's override: responsive image links shouldn't get the underline
/// `box-shadow` that themes put on links.
pub fn image_link_override() -> StyleOverride {
    Styles::new().with("a.gatsby-resp-image-link", &[("boxShadow", "none")])
}

/// The initialized typography: the engine plus the calculators presentation
/// code uses. Built once by the entry point and passed to whatever needs it.
#[derive(Clone, Debug)]
pub struct Typography {
    engine: TypographyEngine,
}

impl Typography {
    /// See [`TypographyEngine::rhythm`].
    pub fn rhythm(&self, lines: f64) -> Length {
        self.engine.rhythm(lines)
    }

    /// See [`TypographyEngine::scale`].
    pub fn scale(&self, step: f64) -> Scale {
        self.engine.scale(step)
    }

    pub fn engine(&self) -> &TypographyEngine {
        &self.engine
    }

    pub fn config(&self) -> &ThemeConfig {
        self.engine.config()
    }

    pub fn into_engine(self) -> TypographyEngine {
        self.engine
    }
}

/// Initializes the typography from a theme definition.
///
/// 1. Validates `definition`, failing with a
///    [`crate::config::ConfigurationError`] before anything is built.
/// 2. Merges `patch` into the theme's override table (see
///    [`Styles::merge`]).
/// 3. Builds the [`TypographyEngine`].
/// 4. When `options.inject_styles` is set, injects the engine's CSS into
///    `target` exactly once. Injection failures are logged and otherwise
///    ignored since `rhythm` and `scale` don't depend on them.
///
/// Every target replaces what was injected under the same id, so calling this
/// again (e.g. on reload) updates the styles rather than duplicating them.
pub fn initialize(
    definition: ThemeDefinition,
    patch: &StyleOverride,
    options: InitOptions,
    target: &mut dyn StyleTarget,
) -> Result<Typography> {
    let config = ThemeConfig::from_definition(definition)?.with_overrides(patch);
    debug!(theme = %config.title, overrides = config.override_styles.len(), "theme loaded");

    let engine = create_typography_engine(config);

    if options.inject_styles {
        match target.inject(STYLE_ELEMENT_ID, &engine.to_css()) {
            Ok(()) => info!(id = STYLE_ELEMENT_ID, "injected typography styles"),
            Err(e) => warn!(error = %e, "failed to inject typography styles"),
        }
    } else {
        debug!("skipping style injection");
    }

    Ok(Typography { engine })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::ConfigurationError;
    use crate::inject::{InjectError, StyleRegistry};

    #[derive(Default)]
    struct CountingTarget {
        calls: usize,
        fail: bool,
    }

    impl StyleTarget for CountingTarget {
        fn inject(&mut self, _id: &str, _css: &str) -> crate::inject::Result<()> {
            self.calls += 1;
            match self.fail {
                true => Err(InjectError::MissingHead),
                false => Ok(()),
            }
        }
    }

    fn definition() -> ThemeDefinition {
        ThemeDefinition {
            base_font_size: Some(Length::px(16.0)),
            base_line_height: Some(1.45),
            scale_ratio: Some(1.25),
            ..ThemeDefinition::default()
        }
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("Production".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!("development".parse::<Environment>(), Ok(Environment::Development));
        assert_eq!("test".parse::<Environment>(), Ok(Environment::Test));
        assert_eq!("staging".parse::<Environment>(), Ok(Environment::Other("staging".to_owned())));
        assert_eq!(
            " Staging-EU ".parse::<Environment>(),
            Ok(Environment::Other("Staging-EU".to_owned()))
        );
        assert!(!InitOptions::for_environment(&Environment::Production).inject_styles);
        assert!(InitOptions::for_environment(&Environment::Test).inject_styles);
        assert!(InitOptions::for_environment(&Environment::Other("staging".to_owned())).inject_styles);
    }

    #[test]
    fn test_production_does_not_inject() -> Result<()> {
        let mut target = CountingTarget::default();
        let options = InitOptions::for_environment(&Environment::Production);
        initialize(definition(), &image_link_override(), options, &mut target)?;
        assert_eq!(target.calls, 0);
        Ok(())
    }

    #[test]
    fn test_development_injects_once_per_call() -> Result<()> {
        let mut target = CountingTarget::default();
        let options = InitOptions::for_environment(&Environment::Development);
        initialize(definition(), &image_link_override(), options, &mut target)?;
        assert_eq!(target.calls, 1);
        initialize(definition(), &image_link_override(), options, &mut target)?;
        assert_eq!(target.calls, 2);
        Ok(())
    }

    #[test]
    fn test_injection_failure_is_not_fatal() -> Result<()> {
        let mut target = CountingTarget {
            calls: 0,
            fail: true,
        };
        let typography = initialize(
            definition(),
            &StyleOverride::new(),
            InitOptions {
                inject_styles: true,
            },
            &mut target,
        )?;
        assert_eq!(target.calls, 1);
        assert_eq!(typography.rhythm(0.0).value, 0.0);
        Ok(())
    }

    #[test]
    fn test_missing_base_font_size_fails_before_injection() {
        let mut target = CountingTarget::default();
        let mut definition = definition();
        definition.base_font_size = None;
        let result = initialize(
            definition,
            &image_link_override(),
            InitOptions {
                inject_styles: true,
            },
            &mut target,
        );
        assert!(matches!(result, Err(ConfigurationError::MissingValue("baseFontSize"))));
        assert_eq!(target.calls, 0);
    }

    #[test]
    fn test_override_reaches_styles() -> Result<()> {
        let mut registry = StyleRegistry::new();
        let typography = initialize(
            definition(),
            &image_link_override(),
            InitOptions {
                inject_styles: true,
            },
            &mut registry,
        )?;
        assert_eq!(
            typography.config().override_styles.get("a.gatsby-resp-image-link"),
            image_link_override().get("a.gatsby-resp-image-link")
        );
        let css = registry.get(STYLE_ELEMENT_ID).unwrap();
        assert!(css.contains("a.gatsby-resp-image-link{box-shadow:none;}"));
        assert_eq!(css, typography.engine().to_css());
        Ok(())
    }

    #[test]
    fn test_reinitializing_is_stable() -> Result<()> {
        let mut registry = StyleRegistry::new();
        let options = InitOptions {
            inject_styles: true,
        };
        let first = initialize(definition(), &image_link_override(), options, &mut registry)?;
        let second = initialize(definition(), &image_link_override(), options, &mut registry)?;
        assert_eq!(registry.len(), 1);
        for step in -3..=3 {
            let step = step as f64;
            assert_eq!(first.scale(step), second.scale(step));
            assert_eq!(first.rhythm(step), second.rhythm(step));
        }
        Ok(())
    }
}
