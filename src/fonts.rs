//! Support for loading a theme's web fonts from Google Fonts.

use serde::Deserialize;
use url::{ParseError, Url};

const GOOGLE_FONTS_BASE: &str = "https://fonts.googleapis.com/css";

/// A font family hosted by Google Fonts along with the styles to load, e.g.
/// `Merriweather` with `["400", "400i", "700"]`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GoogleFont {
    pub name: String,
    #[serde(default)]
    pub styles: Vec<String>,
}

/// Builds the stylesheet URL for a set of Google Fonts. Returns `None` when
/// there are no fonts to load.
pub fn google_fonts_url(fonts: &[GoogleFont]) -> Result<Option<Url>, ParseError> {
    if fonts.is_empty() {
        return Ok(None);
    }

    let families = fonts
        .iter()
        .map(|font| {
            let name = font.name.split_whitespace().collect::<Vec<_>>().join("+");
            match font.styles.is_empty() {
                true => name,
                false => format!("{}:{}", name, font.styles.join(",")),
            }
        })
        .collect::<Vec<_>>()
        .join("|");

    Url::parse(&format!("{}?family={}", GOOGLE_FONTS_BASE, families)).map(Some)
}

/// Renders the `<link>` tag that loads a set of Google Fonts, or an empty
/// string when there are none.
pub fn google_fonts_link(fonts: &[GoogleFont]) -> Result<String, ParseError> {
    Ok(match google_fonts_url(fonts)? {
        None => String::new(),
        Some(url) => format!(r#"<link href="{}" rel="stylesheet" type="text/css"/>"#, url),
    })
}
