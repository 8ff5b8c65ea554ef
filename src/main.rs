// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, warn, info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use shortsub::app_config::{self, Config};
use shortsub::app_controller::{Controller, DurationSource, GenerationRequest};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Time a script's lines against its narration and write an SRT file
    Subtitles(SubtitlesArgs),

    /// Run the full pipeline: captions, burned-in video and metadata
    Generate(GenerateArgs),

    /// Check an existing SRT file for gaps, overlaps and coverage
    Inspect(InspectArgs),

    /// Generate shell completions for shortsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct SubtitlesArgs {
    /// Script file: JSON script or plain text with one caption per line
    #[arg(value_name = "SCRIPT")]
    script_path: PathBuf,

    /// Narration audio to measure
    #[arg(short, long, conflicts_with = "duration", required_unless_present = "duration")]
    audio: Option<PathBuf>,

    /// Narration length in seconds, instead of probing an audio file
    #[arg(short, long)]
    duration: Option<f64>,

    /// Output SRT file
    #[arg(short, long, default_value = "subtitles.srt")]
    output: PathBuf,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Script file; the built-in sample script is used in dry runs when omitted
    #[arg(value_name = "SCRIPT")]
    script_path: Option<PathBuf>,

    /// Pre-rendered narration audio
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Identifier used in the output directory name
    #[arg(long, default_value = "001")]
    id: String,

    /// Theme recorded in the metadata
    #[arg(long, default_value = "")]
    theme: String,

    /// Use a silent narration (and the sample script if none is given)
    #[arg(long)]
    dry_run: bool,

    /// Force overwrite of an existing video
    #[arg(short, long)]
    force_overwrite: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// SRT file to check
    #[arg(value_name = "SRT")]
    srt_path: PathBuf,

    /// Expected narration length in seconds
    #[arg(short, long)]
    duration: Option<f64>,
}

/// shortsub - captions for short narrated videos
///
/// Times narration lines against the measured audio length, writes SubRip
/// captions and burns them into a vertical video with ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "shortsub")]
#[command(version)]
#[command(about = "Caption timing and burn-in for short narrated videos")]
#[command(long_about = "shortsub assigns each narration line a caption interval proportional to its length,
writes the captions as SRT and composes the final video with ffmpeg.

EXAMPLES:
    shortsub subtitles script.json -a audio.mp3 -o subtitles.srt
    shortsub subtitles lines.txt -d 42.5
    shortsub generate script.json -a narration.mp3 --id 007 --theme \"sleep\"
    shortsub generate --dry-run --theme \"coffee\"
    shortsub inspect subtitles.srt -d 42.5
    shortsub completions bash > shortsub.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();
            let _ = writeln!(
                std::io::stderr(),
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at info; the config may lower or raise it once loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "shortsub", &mut std::io::stdout());
        return Ok(());
    }

    let config = Config::load_or_create(&cli.config_path, cli.log_level.clone().map(Into::into))?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config);

    match cli.command {
        Commands::Subtitles(args) => run_subtitles(&controller, args).await,
        Commands::Generate(args) => run_generate(&controller, args).await,
        Commands::Inspect(args) => run_inspect(&controller, args),
        Commands::Completions { .. } => Ok(()),
    }
}

async fn run_subtitles(controller: &Controller, args: SubtitlesArgs) -> Result<()> {
    if args.output.exists() && !args.force_overwrite {
        warn!("Output file already exists: {:?}. Use -f to force overwrite.", args.output);
        return Ok(());
    }

    let duration = match (args.audio, args.duration) {
        (Some(audio), _) => DurationSource::Audio(audio),
        (None, Some(secs)) => DurationSource::Seconds(secs),
        (None, None) => return Err(anyhow!("Either --audio or --duration is required")),
    };

    controller
        .write_subtitles(&args.script_path, duration, &args.output)
        .await
        .map_err(|e| anyhow!("Failed to write subtitles: {}", e))?;

    info!("Success: {:?}", args.output);
    Ok(())
}

async fn run_generate(controller: &Controller, args: GenerateArgs) -> Result<()> {
    let request = GenerationRequest {
        id: args.id,
        theme: args.theme,
        script_path: args.script_path,
        audio_path: args.audio,
        dry_run: args.dry_run,
        force_overwrite: args.force_overwrite,
    };

    let report = controller.generate(&request).await.map_err(|e| {
        error!("Generation failed for {}: {}", request.id, e);
        anyhow!("Generation failed: {}", e)
    })?;

    if report.generated {
        info!("Success: {:?}", report.video_path);
    }
    Ok(())
}

fn run_inspect(controller: &Controller, args: InspectArgs) -> Result<()> {
    let (track, report) = controller
        .inspect_srt(&args.srt_path, args.duration)
        .map_err(|e| anyhow!("Failed to inspect {:?}: {}", args.srt_path, e))?;

    info!("{} entries, ends at {:.3}s", report.entry_count, track.total_duration());
    for issue in &report.track_issues {
        warn!("{}", issue);
    }
    for entry in &report.entries {
        for issue in &entry.issues {
            warn!("Entry {}: {}", entry.seq_num, issue);
        }
    }

    if report.passed() {
        info!("No timing defects found in {:?}", args.srt_path);
        Ok(())
    } else {
        Err(anyhow!("{} timing issue(s) found in {:?}", report.total_issues(), args.srt_path))
    }
}
