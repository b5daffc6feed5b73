//! End-to-end tests: built-in themes through initialization and injection.

use futhorc_typography::bootstrap::image_link_override;
use futhorc_typography::inject::{HtmlDocument, StyleSheetFile, STYLE_ELEMENT_ID};
use futhorc_typography::{initialize, theme, ConfigurationError, Environment, InitOptions};

const PAGE: &str = "<!DOCTYPE html><html><head><title>Hello</title></head><body><p>hi</p></body></html>";

#[test]
fn test_wordpress_theme_in_development() -> Result<(), ConfigurationError> {
    let mut document = HtmlDocument::new(PAGE);
    let typography = initialize(
        theme::builtin("wordpress-2016")?,
        &image_link_override(),
        InitOptions::for_environment(&Environment::Development),
        &mut document,
    )?;

    let html = document.as_str();
    assert_eq!(html.matches(&format!(r#"<style id="{}">"#, STYLE_ELEMENT_ID)).count(), 1);
    assert!(html.contains("a.gatsby-resp-image-link{box-shadow:none;}"));
    assert!(html.contains("font-family:Montserrat,sans-serif;}"));
    assert!(html.ends_with("</head><body><p>hi</p></body></html>"));

    // The theme's `a` rule is untouched by the image-link override.
    let links = typography.config().override_styles.get("a").unwrap();
    assert_eq!(links.get("boxShadow").map(String::as_str), Some("0 1px 0 0 currentColor"));

    // One rhythm line is 16px * 1.75.
    assert!((typography.rhythm(1.0).to_px(16.0) - 28.0).abs() < 1e-9);
    assert!(typography.scale(-1.0).font_size.value < typography.scale(0.0).font_size.value);
    Ok(())
}

#[test]
fn test_production_leaves_document_alone() -> Result<(), ConfigurationError> {
    let mut document = HtmlDocument::new(PAGE);
    initialize(
        theme::builtin("default")?,
        &image_link_override(),
        InitOptions::for_environment(&Environment::Production),
        &mut document,
    )?;
    assert_eq!(document.as_str(), PAGE);
    Ok(())
}

#[test]
fn test_reload_rewrites_stylesheet() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("typography.css");
    let mut sheet = StyleSheetFile::new(&path);
    let options = InitOptions {
        inject_styles: true,
    };

    let typography = initialize(theme::builtin("default")?, &image_link_override(), options, &mut sheet)?;
    let first = std::fs::read_to_string(&path)?;
    initialize(theme::builtin("default")?, &image_link_override(), options, &mut sheet)?;
    let second = std::fs::read_to_string(&path)?;

    assert_eq!(first, second);
    assert!(first.contains(&typography.engine().to_css()));
    Ok(())
}

#[test]
fn test_unwritable_stylesheet_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut sheet = StyleSheetFile::new(dir.path().join("missing").join("typography.css"));
    let typography = initialize(
        theme::builtin("default")?,
        &image_link_override(),
        InitOptions {
            inject_styles: true,
        },
        &mut sheet,
    )?;
    assert_eq!(typography.rhythm(1.0).to_string(), "1.45rem");
    Ok(())
}
