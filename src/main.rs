use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use transcript_accuracy::accuracy::AccuracyCalculator;
use transcript_accuracy::config::Config;
use transcript_accuracy::normalizer::normalize;
use transcript_accuracy::report::{render_text, render_yaml};
use transcript_accuracy::text_diff::split_lines;

#[derive(Parser)]
#[command(name = "transcript-accuracy")]
#[command(about = "Measure how closely a transcript matches a reference text", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file to use instead of ~/.transcript-accuracy/settings.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip [start --> end] timestamp markers from a transcript
    Normalize {
        /// Transcript file, or "-" for stdin
        input: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare a modified text against the original and print an accuracy report
    Compare {
        /// Reference text file, or "-" for stdin
        original: PathBuf,
        /// Text to evaluate, or "-" for stdin
        modified: PathBuf,
        /// Strip timestamp markers from the original before comparing
        #[arg(long)]
        strip_original: bool,
        /// Strip timestamp markers from the modified text before comparing
        #[arg(long)]
        strip_modified: bool,
        /// Append a unified diff of the two texts
        #[arg(long)]
        diff: bool,
        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Write the default settings file
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Yaml,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Normalize { input, output } => normalize_command(&input, output.as_deref()),
        Commands::Compare {
            original,
            modified,
            strip_original,
            strip_modified,
            diff,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            compare_command(
                &config,
                &original,
                &modified,
                strip_original,
                strip_modified,
                diff,
                format,
            )
        }
        Commands::InitConfig => init_config_command(cli.config.as_deref()),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load_or_create(),
    }
}

/// Read a file, or stdin when the path is "-"
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn normalize_command(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = read_input(input)?;
    let text = normalize(&raw);
    debug!(
        input_lines = split_lines(&raw).len(),
        output_lines = split_lines(&text).len(),
        "normalized transcript"
    );

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", text))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote normalized text to {}", path.display());
        }
        None => println!("{}", text),
    }

    Ok(())
}

fn compare_command(
    config: &Config,
    original_path: &Path,
    modified_path: &Path,
    strip_original: bool,
    strip_modified: bool,
    show_diff: bool,
    format: OutputFormat,
) -> Result<()> {
    if original_path == Path::new("-") && modified_path == Path::new("-") {
        bail!("Only one of the inputs can be read from stdin");
    }

    let mut original = read_input(original_path)?;
    let mut modified = read_input(modified_path)?;

    if strip_original {
        original = normalize(&original);
    }
    if strip_modified {
        modified = normalize(&modified);
    }

    let calculator = AccuracyCalculator::with_texts(&original, &modified, config.analysis_options());
    let report = calculator.full_analysis();

    match format {
        OutputFormat::Text => {
            print!("{}", render_text(&report, config.report.word_limit));
            if show_diff {
                let diff = calculator.detailed_diff();
                println!("\n🔍 DIFF:");
                if diff.is_empty() {
                    info!("Texts are identical line by line");
                }
                for line in diff {
                    println!("{}", line);
                }
            }
        }
        OutputFormat::Yaml => {
            let diff = show_diff.then(|| calculator.detailed_diff());
            print!("{}", render_yaml(&report, diff.as_deref())?);
        }
    }

    Ok(())
}

fn init_config_command(path: Option<&Path>) -> Result<()> {
    let config = Config::default();

    match path {
        Some(path) => {
            config.save_to(path)?;
            println!("✓ Wrote default config to {}", path.display());
        }
        None => {
            config.save()?;
            println!("✓ Wrote default config to {}", Config::config_path()?.display());
        }
    }

    Ok(())
}
