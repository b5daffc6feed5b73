use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use futhorc_typography::bootstrap::image_link_override;
use futhorc_typography::fonts::google_fonts_link;
use futhorc_typography::inject::{HtmlDocument, StyleRegistry, StyleSheetFile};
use futhorc_typography::length::{format_number, parse_number};
use futhorc_typography::{initialize, theme, Environment, InitOptions, ThemeDefinition, Typography};
use std::error::Error;
use std::path::Path;

type Result<T> = std::result::Result<T, Box<dyn Error>>;

fn main() {
    let matches = App::new("futhorc-typography")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Computes a blog theme's vertical rhythm, modular scale, and global CSS")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("theme")
                .short("t")
                .long("theme")
                .value_name("NAME")
                .takes_value(true)
                .conflicts_with("theme-file")
                .help("A built-in theme (`default`, `wordpress-2016`)"),
        )
        .arg(
            Arg::with_name("theme-file")
                .long("theme-file")
                .value_name("PATH")
                .takes_value(true)
                .help("A theme YAML file; defaults to the nearest `typography.yaml`"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Increases logging verbosity (-v, -vv, -vvv)"),
        )
        .subcommand(SubCommand::with_name("css").about("Prints the theme's global CSS"))
        .subcommand(
            SubCommand::with_name("rhythm")
                .about("Prints the length of a number of rhythm lines")
                .arg(
                    Arg::with_name("LINES")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("A number or fraction, e.g. `1/2`"),
                ),
        )
        .subcommand(
            SubCommand::with_name("scale")
                .about("Prints the font size and line height for a modular scale step")
                .arg(
                    Arg::with_name("STEP")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("A number or fraction, e.g. `-1/5`"),
                ),
        )
        .subcommand(SubCommand::with_name("fonts").about("Prints the Google Fonts <link> tag"))
        .subcommand(
            SubCommand::with_name("inject")
                .about("Injects the global CSS into an HTML file or stylesheet (skipped in production)")
                .arg(Arg::with_name("TARGET").required(true)),
        )
        .get_matches();

    init_tracing(matches.occurrences_of("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u64) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let definition = load_theme(matches)?;
    match matches.subcommand() {
        ("css", _) => println!("{}", build(definition)?.engine().to_css()),
        ("rhythm", Some(sub)) => {
            let lines = parse_number(sub.value_of("LINES").unwrap_or_default())?;
            println!("{}", build(definition)?.rhythm(lines));
        }
        ("scale", Some(sub)) => {
            let step = parse_number(sub.value_of("STEP").unwrap_or_default())?;
            let scale = build(definition)?.scale(step);
            println!(
                "font-size: {}; line-height: {}",
                scale.font_size,
                format_number(scale.line_height)
            );
        }
        ("fonts", _) => {
            let typography = build(definition)?;
            println!("{}", google_fonts_link(&typography.config().google_fonts)?);
        }
        ("inject", Some(sub)) => {
            inject(definition, Path::new(sub.value_of("TARGET").unwrap_or_default()))?
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}

fn load_theme(matches: &ArgMatches) -> Result<ThemeDefinition> {
    if let Some(path) = matches.value_of("theme-file") {
        return Ok(theme::from_file(Path::new(path))?);
    }
    if let Some(name) = matches.value_of("theme") {
        return Ok(theme::builtin(name)?);
    }
    match theme::find_theme_file(&std::env::current_dir()?) {
        Some(path) => {
            tracing::info!(path = %path.display(), "using theme file");
            Ok(theme::from_file(&path)?)
        }
        None => Ok(theme::builtin("default")?),
    }
}

// Builds the typography without touching any style target.
fn build(definition: ThemeDefinition) -> Result<Typography> {
    let options = InitOptions {
        inject_styles: false,
    };
    Ok(initialize(
        definition,
        &image_link_override(),
        options,
        &mut StyleRegistry::new(),
    )?)
}

fn inject(definition: ThemeDefinition, target: &Path) -> Result<()> {
    let environment = Environment::from_env();
    let options = InitOptions::for_environment(&environment);
    tracing::info!(%environment, inject_styles = options.inject_styles, "injecting");

    if target.extension().map_or(false, |ext| ext == "css") {
        let mut sheet = StyleSheetFile::new(target);
        initialize(definition, &image_link_override(), options, &mut sheet)?;
        return Ok(());
    }

    let mut document = HtmlDocument::new(std::fs::read_to_string(target)?);
    let original = document.clone();
    initialize(definition, &image_link_override(), options, &mut document)?;
    if document != original {
        std::fs::write(target, document.into_string())?;
    }
    Ok(())
}
