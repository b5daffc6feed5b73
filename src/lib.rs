//! The typography layer for a personal static blog. A theme describes the
//! base metrics of the site's text (font size, line height, and the ratio of
//! its modular scale) plus any style overrides; from it this crate derives:
//!
//! 1. A vertical rhythm ([`engine::TypographyEngine::rhythm`]) for spacing
//! 2. A modular scale ([`engine::TypographyEngine::scale`]) for font sizes
//! 3. The global CSS that applies both to the site's HTML
//!
//! Startup goes through [`bootstrap::initialize`], which validates the theme
//! ([`config`]), applies the site's overrides, builds the engine, and, when
//! not in production, injects the CSS into a style target ([`inject`]).
//! Production builds are expected to embed the CSS at build time instead.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod bootstrap;
pub mod config;
pub mod engine;
pub mod fonts;
pub mod inject;
pub mod length;
pub mod rhythm;
pub mod styles;
pub mod theme;

pub use bootstrap::{initialize, Environment, InitOptions, Typography};
pub use config::{ConfigurationError, StyleOverride, Styles, ThemeConfig, ThemeDefinition};
pub use engine::{create_typography_engine, TypographyEngine};
pub use length::Length;
pub use rhythm::Scale;
