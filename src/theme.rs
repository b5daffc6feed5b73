//! Provides [`ThemeDefinition`]s: the built-in themes compiled into the crate
//! and theme files on disk. Both use the same YAML schema, e.g.:
//!
//! ```yaml
//! title: my-theme
//! baseFontSize: 16px
//! baseLineHeight: 1.45
//! scaleRatio: 5/2
//! bodyFontFamily: [Georgia, serif]
//! overrideStyles:
//!   blockquote:
//!     marginLeft: rhythm(1)
//! ```

use crate::config::{ConfigurationError, Result, ThemeDefinition};
use std::fs::File;
use std::path::{Path, PathBuf};

/// The file name [`find_theme_file`] looks for.
pub const THEME_FILE_NAME: &str = "typography.yaml";

const BUILTIN_THEMES: &[(&str, &str)] = &[
    ("default", include_str!("themes/default.yaml")),
    ("wordpress-2016", include_str!("themes/wordpress-2016.yaml")),
];

/// The names of the built-in themes.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_THEMES.iter().map(|(name, _)| *name)
}

/// Looks up a built-in theme by name.
pub fn builtin(name: &str) -> Result<ThemeDefinition> {
    let (_, source) = BUILTIN_THEMES
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .ok_or_else(|| ConfigurationError::UnknownTheme(name.to_owned()))?;
    parse(source).map_err(|e| {
        ConfigurationError::Annotated(format!("parsing built-in theme `{}`", name), Box::new(e))
    })
}

/// Parses a theme definition from YAML text.
pub fn parse(yaml: &str) -> Result<ThemeDefinition> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Loads a theme definition from a YAML file.
pub fn from_file(path: &Path) -> Result<ThemeDefinition> {
    let file = File::open(path).map_err(|err| ConfigurationError::OpenThemeFile {
        path: path.to_owned(),
        err,
    })?;
    serde_yaml::from_reader(file).map_err(|e| {
        ConfigurationError::Annotated(
            format!("parsing theme file `{}`", path.display()),
            Box::new(e.into()),
        )
    })
}

/// Searches `dir` and then each of its ancestors for a [`THEME_FILE_NAME`]
/// file, returning the first one found.
pub fn find_theme_file(dir: &Path) -> Option<PathBuf> {
    dir.ancestors()
        .map(|ancestor| ancestor.join(THEME_FILE_NAME))
        .find(|path| path.is_file())
}
