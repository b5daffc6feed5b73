//! Generates the global style table for a theme and compiles [`Styles`] into
//! CSS text.

use crate::config::{Styles, ThemeConfig};
use crate::length::{format_number, parse_number};
use crate::rhythm::{Scale, VerticalRhythm};

const BLOCK_ELEMENTS: &str = "h1,h2,h3,h4,h5,h6,hgroup,ul,ol,dl,dd,p,figure,pre,table,\
fieldset,blockquote,form,noscript,iframe,img,hr,address";

const KERNING: &str = r#""kern", "liga", "clig", "calt""#;
const TABULAR_NUMBERS: &str = r#""tnum""#;

/// Builds the global styles for a theme: the (optional) normalize rules, the
/// base typography derived from the rhythm, and finally the theme's own
/// `override_styles`, which are merged property by property over the
/// generated rules.
pub fn global_styles(config: &ThemeConfig, rhythm: &VerticalRhythm) -> Styles {
    let mut styles = Styles::new();
    if config.include_normalize {
        normalize(&mut styles);
    }

    let block_margin = rhythm.rhythm(config.block_margin_bottom);
    let half_block_margin = format!("calc({} / 2)", block_margin.with_unit());
    let body_font_family = font_family(&config.body_font_family);

    styles.set(
        "html",
        "font",
        format!(
            "{}%/{} {}",
            format_number(config.base_font_size_px() / 16.0 * 100.0),
            format_number(config.base_line_height),
            body_font_family
        ),
    );
    styles.set("html", "boxSizing", "border-box");
    styles.set("html", "overflowY", "scroll");
    for selector in &["*", "*:before", "*:after"] {
        styles.set(selector, "boxSizing", "inherit");
    }

    styles.set("body", "color", config.body_color.as_str());
    styles.set("body", "fontFamily", body_font_family);
    styles.set("body", "fontWeight", config.body_weight.as_str());
    styles.set("body", "wordWrap", "break-word");
    styles.set("body", "fontKerning", "normal");
    font_feature_settings(&mut styles, "body", KERNING);

    styles.set("img", "maxWidth", "100%");

    for property in &[
        "marginLeft",
        "marginRight",
        "marginTop",
        "paddingBottom",
        "paddingLeft",
        "paddingRight",
        "paddingTop",
    ] {
        styles.set(BLOCK_ELEMENTS, property, "0");
    }
    styles.set(BLOCK_ELEMENTS, "marginBottom", block_margin.to_string());

    styles.set("blockquote", "marginRight", rhythm.rhythm(1.0).to_string());
    styles.set("blockquote", "marginBottom", block_margin.to_string());
    styles.set("blockquote", "marginLeft", rhythm.rhythm(1.0).to_string());

    styles.set("b,strong,dt,th", "fontWeight", config.bold_weight.as_str());

    styles.set("hr", "background", "hsla(0,0%,0%,0.2)");
    styles.set("hr", "border", "none");
    styles.set("hr", "height", "1px");
    styles.set(
        "hr",
        "marginBottom",
        format!("calc({} - 1px)", block_margin.with_unit()),
    );

    styles.set("ol,ul", "listStylePosition", "outside");
    styles.set("ol,ul", "listStyleImage", "none");
    styles.set("ol,ul", "marginLeft", rhythm.rhythm(1.0).to_string());
    styles.set("li", "marginBottom", half_block_margin.as_str());
    styles.set("ol li,ul li", "paddingLeft", "0");
    styles.set("li > ol,li > ul", "marginLeft", rhythm.rhythm(1.0).to_string());
    styles.set("li > ol,li > ul", "marginBottom", half_block_margin.as_str());
    styles.set("li > ol,li > ul", "marginTop", half_block_margin.as_str());
    styles.set(
        "blockquote *:last-child,li *:last-child,p *:last-child",
        "marginBottom",
        "0",
    );
    styles.set("li > p", "marginBottom", half_block_margin.as_str());

    set_scale(
        &mut styles,
        "code,kbd,pre,samp",
        &rhythm.adjust_font_size_to(0.85 * config.base_font_size_px()),
    );

    styles.set("abbr,acronym", "borderBottom", "1px dotted hsla(0,0%,0%,0.5)");
    styles.set("abbr,acronym", "cursor", "help");
    styles.set("abbr[title]", "borderBottom", "1px dotted hsla(0,0%,0%,0.5)");
    styles.set("abbr[title]", "cursor", "help");
    styles.set("abbr[title]", "textDecoration", "none");

    set_scale(&mut styles, "table", &rhythm.scale(0.0));
    styles.set("table", "borderCollapse", "collapse");
    styles.set("table", "width", "100%");
    styles.set("thead", "textAlign", "left");

    let cell_padding = rhythm.rhythm(2.0 / 3.0).to_string();
    let half_line = rhythm.rhythm(0.5);
    styles.set("td,th", "textAlign", "left");
    styles.set("td,th", "borderBottom", "1px solid hsla(0,0%,0%,0.12)");
    font_feature_settings(&mut styles, "td,th", TABULAR_NUMBERS);
    styles.set("td,th", "paddingLeft", cell_padding.as_str());
    styles.set("td,th", "paddingRight", cell_padding.as_str());
    styles.set("td,th", "paddingTop", half_line.to_string());
    styles.set(
        "td,th",
        "paddingBottom",
        format!("calc({} - 1px)", half_line.with_unit()),
    );
    styles.set("th:first-child,td:first-child", "paddingLeft", "0");
    styles.set("th:last-child,td:last-child", "paddingRight", "0");

    let headings = "h1,h2,h3,h4,h5,h6";
    styles.set(headings, "color", config.header_color.as_str());
    styles.set(headings, "fontFamily", font_family(&config.header_font_family));
    styles.set(headings, "fontWeight", config.header_weight.as_str());
    styles.set(headings, "textRendering", "optimizeLegibility");
    for (heading, step) in &[
        ("h1", 1.0),
        ("h2", 3.0 / 5.0),
        ("h3", 2.0 / 5.0),
        ("h4", 0.0),
        ("h5", -1.0 / 5.0),
        ("h6", -1.5 / 5.0),
    ] {
        set_scale(&mut styles, heading, &rhythm.scale(*step));
    }

    styles.merge_deep(&resolve_rhythm(&config.override_styles, rhythm));
    styles
}

fn normalize(styles: &mut Styles) {
    styles.set("html", "fontFamily", "sans-serif");
    styles.set("html", "msTextSizeAdjust", "100%");
    styles.set("html", "WebkitTextSizeAdjust", "100%");
    styles.set("body", "margin", "0");
    styles.set(
        "article,aside,details,figcaption,figure,footer,header,main,menu,nav,section,summary",
        "display",
        "block",
    );
    styles.set("a", "backgroundColor", "transparent");
    styles.set("a", "WebkitTextDecorationSkip", "objects");
    styles.set("code,kbd,pre,samp", "fontFamily", "monospace,monospace");
    styles.set("code,kbd,pre,samp", "fontSize", "1em");
    styles.set("img", "borderStyle", "none");
    styles.set("hr", "boxSizing", "content-box");
    styles.set("hr", "overflow", "visible");
    styles.set("sub,sup", "fontSize", "75%");
    styles.set("sub,sup", "lineHeight", "0");
    styles.set("sub,sup", "position", "relative");
    styles.set("sub,sup", "verticalAlign", "baseline");
    styles.set("sub", "bottom", "-0.25em");
    styles.set("sup", "top", "-0.5em");
}

fn set_scale(styles: &mut Styles, selector: &str, scale: &Scale) {
    for (property, value) in scale.declarations().iter() {
        styles.set(selector, property, value.as_str());
    }
}

fn font_feature_settings(styles: &mut Styles, selector: &str, settings: &str) {
    for property in &[
        "MozFontFeatureSettings",
        "msFontFeatureSettings",
        "WebkitFontFeatureSettings",
        "fontFeatureSettings",
    ] {
        styles.set(selector, property, settings);
    }
}

/// Joins a font stack, quoting family names that contain spaces.
pub fn font_family(families: &[String]) -> String {
    families
        .iter()
        .map(|family| match family.contains(' ') {
            true => format!("'{}'", family),
            false => family.clone(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

// Replaces `rhythm(n)` tokens in override values with the computed length.
fn resolve_rhythm(styles: &Styles, rhythm: &VerticalRhythm) -> Styles {
    let mut resolved = Styles::new();
    for (selector, declarations) in styles.iter() {
        resolved.insert(
            selector.as_str(),
            declarations
                .iter()
                .map(|(property, value)| (property.clone(), resolve_value(value, rhythm)))
                .collect(),
        );
    }
    resolved
}

fn resolve_value(value: &str, rhythm: &VerticalRhythm) -> String {
    const TOKEN: &str = "rhythm(";
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find(TOKEN) {
        let (before, token) = rest.split_at(start);
        out.push_str(before);
        let argument = &token[TOKEN.len()..];
        match argument.find(')') {
            Some(end) => {
                match parse_number(&argument[..end]) {
                    Ok(lines) => out.push_str(&rhythm.rhythm(lines).with_unit()),
                    // not a rhythm call we understand; keep it verbatim
                    Err(_) => out.push_str(&token[..TOKEN.len() + end + 1]),
                }
                rest = &argument[end + 1..];
            }
            None => {
                out.push_str(token);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Compiles [`Styles`] into CSS text. Rules without declarations are
/// skipped.
pub fn compile(styles: &Styles) -> String {
    let mut css = String::new();
    for (selector, declarations) in styles.iter() {
        if declarations.is_empty() {
            continue;
        }
        css.push_str(selector);
        css.push('{');
        for (property, value) in declarations {
            css.push_str(&property_name(property));
            css.push(':');
            css.push_str(value);
            css.push(';');
        }
        css.push('}');
    }
    css
}

/// Converts a camelCase property name into its CSS (kebab-case) form,
/// including vendor prefixes: `MozFontFeatureSettings` becomes
/// `-moz-font-feature-settings` and `msTextSizeAdjust` becomes
/// `-ms-text-size-adjust`.
pub fn property_name(property: &str) -> String {
    let mut name = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    if name.starts_with("ms-") {
        name.insert(0, '-');
    }
    name
}
