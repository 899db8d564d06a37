use clap::{Arg, ArgAction, ArgMatches, Command};
use log::{error, info, warn};
use mdpdf::config::{self, ConfigSource, DEFAULT_CONFIG_FILE};
use mdpdf::fonts::FontConfig;
use mdpdf::validation;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug)]
enum AppError {
    FileReadError(std::io::Error),
    ConversionError(String),
    ConfigError(String),
    PathError(String),
}

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verbosity {
    Quiet,   // No output except errors
    Normal,  // Standard output
    Verbose, // Detailed output
}

fn get_markdown_input(matches: &ArgMatches) -> Result<String, AppError> {
    if let Some(file_path) = matches.get_one::<String>("path") {
        fs::read_to_string(file_path).map_err(AppError::FileReadError)
    } else if let Some(markdown_string) = matches.get_one::<String>("string") {
        Ok(markdown_string.to_string())
    } else {
        Err(AppError::ConversionError("No input provided".to_string()))
    }
}

/// Get the configuration source based on CLI arguments or default behavior.
///
/// Priority order:
/// 1. If `--config` is explicitly provided, use that file
/// 2. If `mdpdfrc.toml` exists in current directory, use it
/// 3. Otherwise use default configuration
fn get_config_source(matches: &ArgMatches) -> ConfigSource<'_> {
    if let Some(config_file) = matches.get_one::<String>("config") {
        return ConfigSource::File(config_file.as_str());
    }

    if std::path::Path::new(DEFAULT_CONFIG_FILE).exists() {
        return ConfigSource::File(DEFAULT_CONFIG_FILE);
    }

    ConfigSource::Default
}

fn get_output_path(matches: &ArgMatches) -> Result<PathBuf, AppError> {
    let current_dir = std::env::current_dir().map_err(|e| AppError::PathError(e.to_string()))?;

    Ok(matches
        .get_one::<String>("output")
        .map(|p| current_dir.join(p))
        .unwrap_or_else(|| current_dir.join("output.pdf")))
}

fn get_font_config(matches: &ArgMatches) -> Option<FontConfig> {
    if !matches.contains_id("font-path") && !matches.contains_id("default-font") {
        return None;
    }

    let custom_paths: Vec<PathBuf> = matches
        .get_many::<String>("font-path")
        .map(|values| values.map(PathBuf::from).collect())
        .unwrap_or_default();

    let default_font = matches
        .get_one::<String>("default-font")
        .map(|s| s.to_string());

    Some(FontConfig {
        custom_paths,
        default_font,
    })
}

fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

fn run(matches: ArgMatches) -> Result<(), AppError> {
    let verbosity = get_verbosity(&matches);
    let dry_run = matches.get_flag("dry-run");

    let markdown = get_markdown_input(&matches)?;
    let output_path = get_output_path(&matches)?;
    let output_path_str = output_path
        .to_str()
        .ok_or_else(|| AppError::PathError("Invalid output path".to_string()))?;
    let font_config = get_font_config(&matches);
    let config_source = get_config_source(&matches);

    // An explicit --config must be readable and valid
    if matches.contains_id("config") {
        config::try_load_config(config_source.clone())
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
    }

    if let Some(dump_path) = matches.get_one::<String>("dump-model") {
        let document = mdpdf::markdown_to_document(&markdown)
            .map_err(|e| AppError::ConversionError(e.to_string()))?;
        document
            .save_to_json_file(dump_path)
            .map_err(|e| AppError::PathError(format!("{}: {}", dump_path, e)))?;
        if verbosity != Verbosity::Quiet {
            println!("📝 Wrote document model ({} blocks) to {}", document.len(), dump_path);
        }
    }

    let warnings =
        validation::validate_conversion(&markdown, font_config.as_ref(), Some(output_path_str));

    if verbosity != Verbosity::Quiet {
        if !warnings.is_empty() {
            if verbosity == Verbosity::Verbose {
                info!("🔍 Pre-flight validation:");
            }
            for warning in &warnings {
                warn!("{}", warning);
            }
        } else if verbosity == Verbosity::Verbose {
            info!("✓ Pre-flight validation passed");
        }

        if dry_run {
            println!("✓ Dry-run validation complete. No PDF generated.");
            if warnings.is_empty() {
                println!("✓ No issues detected. Run without --dry-run to generate PDF.");
            } else {
                println!(
                    "⚠️  {} warning(s) found. Review above and run without --dry-run to generate PDF anyway.",
                    warnings.len()
                );
            }
            return Ok(());
        }
    } else if dry_run {
        if warnings.is_empty() {
            return Ok(());
        }
        return Err(AppError::ConversionError(format!(
            "{} validation warnings",
            warnings.len()
        )));
    }

    if verbosity == Verbosity::Verbose {
        info!("📄 Generating PDF...");
        if let Some(font) = font_config.as_ref().and_then(|c| c.default_font.as_ref()) {
            info!("   Font: {}", font);
        }
    }

    mdpdf::parse_into_file(
        markdown,
        output_path_str,
        config_source,
        font_config.as_ref(),
    )
    .map_err(|e| AppError::ConversionError(e.to_string()))?;

    if verbosity != Verbosity::Quiet {
        println!("✅ Successfully saved PDF to {}", output_path_str);

        if verbosity == Verbosity::Verbose {
            if let Ok(metadata) = fs::metadata(output_path_str) {
                let size_kb = metadata.len() as f64 / 1024.0;
                if size_kb < 1024.0 {
                    println!("   Size: {:.1} KB", size_kb);
                } else {
                    println!("   Size: {:.2} MB", size_kb / 1024.0);
                }
            }
        }
    }

    Ok(())
}

fn build_cli() -> Command {
    Command::new("mdpdf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown files or strings to PDF")
        .after_help(
            "EXAMPLES:\n  \
            mdpdf -p document.md -o output.pdf\n  \
            mdpdf -s \"# Hello World\" --default-font \"DejaVu Sans\"\n  \
            mdpdf -p doc.md --verbose --dry-run\n  \
            mdpdf -p doc.md --dump-model model.json\n",
        )
        .arg(
            Arg::new("path")
                .short('p')
                .long("path")
                .value_name("FILE_PATH")
                .help("Path to the markdown file")
                .conflicts_with("string"),
        )
        .arg(
            Arg::new("string")
                .short('s')
                .long("string")
                .value_name("MARKDOWN_STRING")
                .help("Markdown content as a string")
                .conflicts_with("path"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("OUTPUT_PATH")
                .help("Path to the output PDF file (defaults to ./output.pdf)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("CONFIG_FILE")
                .help("Path to configuration file (TOML format). Auto-detects mdpdfrc.toml if not specified"),
        )
        .arg(
            Arg::new("font-path")
                .long("font-path")
                .value_name("PATH")
                .help("Path to custom font directory or font file")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("default-font")
                .long("default-font")
                .value_name("FONT_NAME")
                .help("Font family for the document text (default: SimSun)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show detailed output including validation warnings and file size")
                .action(ArgAction::SetTrue)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress all output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Validate input without generating PDF")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("dump-model")
                .long("dump-model")
                .value_name("JSON_FILE")
                .help("Write the intermediate document model as JSON"),
        )
        .arg(
            Arg::new("get-default-configuration")
                .long("get-default-configuration")
                .help("Print a default mdpdfrc.toml to stdout and exit")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    // Initialize logger with environment variable control (RUST_LOG)
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let mut cmd = build_cli();
    let matches = cmd.clone().get_matches();

    if matches.get_flag("get-default-configuration") {
        println!("{}", config::default_config_toml());
        process::exit(0);
    }

    if !matches.contains_id("path") && !matches.contains_id("string") {
        let _ = cmd.print_help();
        println!();
        process::exit(1);
    }

    if let Err(e) = run(matches) {
        match e {
            AppError::FileReadError(e) => error!("[X] Error reading file: {}", e),
            AppError::ConversionError(e) => error!("[X] Conversion error: {}", e),
            AppError::ConfigError(e) => error!("[X] Configuration error: {}", e),
            AppError::PathError(e) => error!("[X] Path error: {}", e),
        }
        process::exit(1);
    }
}
