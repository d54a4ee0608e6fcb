//! gen-novella - Prepare novella text for speech synthesis and document export

mod config;
mod export;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::GenNovellaConfig;
use env_logger::Env;
use log::debug;
use novella_text::speech::{ClipJoiner, FfmpegJoiner};
use novella_text::{Document, SegmentationPolicy, count_words, outline, segment};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gen-novella")]
#[command(about = "Segment novella text for speech synthesis and document export", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, default_value_t = false, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a text file into speech-sized segments
    Segment {
        /// Path to the novella text file
        file: PathBuf,

        /// Preferred segment size in characters (default from config)
        #[arg(long)]
        target_size: Option<usize>,

        /// Maximum segment size in characters (default from config)
        #[arg(long)]
        hard_max: Option<usize>,

        /// Write one file per segment plus manifest.json into this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print segments as JSON instead of a summary
        #[arg(long)]
        json: bool,

        /// Leave "..." and "--" as written
        #[arg(long)]
        no_speech_cues: bool,
    },
    /// Show the chapter outline used for EPUB/PDF generation
    Outline {
        /// Path to the novella text file
        file: PathBuf,

        /// Print the outline as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count words in a generated novella
    Count {
        /// Path to the novella text file
        file: PathBuf,
    },
    /// Join audio clips in order with silence between them
    Join {
        /// Clips to join, in reading order
        #[arg(required = true)]
        clips: Vec<PathBuf>,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,

        /// Silence between clips in milliseconds (default from config)
        #[arg(long)]
        gap_ms: Option<u64>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default target segment size
    SetTargetSize {
        /// Characters
        value: usize,
    },
    /// Set default maximum segment size
    SetHardMax {
        /// Characters
        value: usize,
    },
    /// Set default silence between joined clips
    SetGap {
        /// Milliseconds
        value: u64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match &args.command {
        Commands::Segment {
            file,
            target_size,
            hard_max,
            out_dir,
            json,
            no_speech_cues,
        } => {
            let config = GenNovellaConfig::load().context("Failed to load configuration")?;
            let mut policy = config.segmentation.clone();
            if let Some(size) = target_size {
                policy = policy.with_target_size(*size);
            }
            if let Some(max) = hard_max {
                policy = policy.with_hard_max(*max);
            }
            if *no_speech_cues {
                policy = policy.with_speech_cues(false);
            }
            debug!("Segmentation policy: {:?}", policy);
            handle_segment(file, &policy, out_dir.as_deref(), *json)
        }
        Commands::Outline { file, json } => handle_outline(file, *json),
        Commands::Count { file } => {
            let document = read_document(file)?;
            println!("{}", count_words(document.text()));
            Ok(())
        }
        Commands::Join {
            clips,
            output,
            gap_ms,
        } => {
            let config = GenNovellaConfig::load().context("Failed to load configuration")?;
            let gap = Duration::from_millis(gap_ms.unwrap_or(config.gap_ms));
            handle_join(clips, output, gap)
        }
        Commands::Config { action } => handle_config_command(action),
    }
}

fn read_document(path: &Path) -> Result<Document> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Document::from_path(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn handle_segment(
    file: &Path,
    policy: &SegmentationPolicy,
    out_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let document = read_document(file)?;
    let segmentation = segment(&document, policy).context("Failed to segment text")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&segmentation.segments)?);
    } else {
        eprintln!(
            "\"{}\": {} segments, {} chars ({})",
            document.title(),
            segmentation.segments.len(),
            segmentation.total_chars(),
            if segmentation.structural {
                "chapter markers"
            } else {
                "paragraph packing"
            }
        );
        for s in &segmentation.segments {
            println!("{:>4}  {:>6} chars  {}", s.index, s.size, preview(&s.text, 60));
        }
    }

    if let Some(dir) = out_dir {
        let paths = export::write_segments(dir, document.title(), &segmentation, policy)?;
        eprintln!("Wrote {} segment files to {}", paths.len(), dir.display());
    }

    Ok(())
}

fn handle_outline(file: &Path, json: bool) -> Result<()> {
    let document = read_document(file)?;
    let outline = outline(&document).context("Failed to build outline")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
        return Ok(());
    }

    println!("{}", outline.title);
    println!();
    for (i, section) in outline.sections.iter().enumerate() {
        println!(
            "{:>3}. {} ({} paragraphs, {} words)",
            i + 1,
            section.title,
            section.paragraphs.len(),
            section.word_count
        );
    }
    println!();
    println!("Total words: {}", outline.word_count());
    Ok(())
}

fn handle_join(clips: &[PathBuf], output: &Path, gap: Duration) -> Result<()> {
    for clip in clips {
        if !clip.exists() {
            anyhow::bail!("Clip not found: {}", clip.display());
        }
    }

    let joiner = FfmpegJoiner::new();
    debug!("Joining with gap {:?}", gap);
    if clips.len() > 1 && !joiner.is_available() {
        anyhow::bail!("ffmpeg not found. Install it to join audio clips.");
    }

    eprintln!("Joining {} clips into {}", clips.len(), output.display());
    joiner
        .join(clips, gap, output)
        .context("Failed to join clips")?;
    eprintln!("Done: {}", output.display());
    Ok(())
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = GenNovellaConfig::load()?;
            println!("Configuration file: {:?}", GenNovellaConfig::config_path()?);
            println!();
            println!("gap_ms = {}", config.gap_ms);
            println!();
            println!("[segmentation]");
            println!("target_size = {}", config.segmentation.target_size);
            println!("hard_max = {}", config.segmentation.hard_max);
            println!(
                "prefer_paragraph_breaks = {}",
                config.segmentation.prefer_paragraph_breaks
            );
            println!(
                "prefer_sentence_breaks = {}",
                config.segmentation.prefer_sentence_breaks
            );
            println!("speech_cues = {}", config.segmentation.speech_cues);
        }
        ConfigAction::SetTargetSize { value } => {
            let mut config = GenNovellaConfig::load()?;
            config.segmentation.target_size = *value;
            config.segmentation.validate()?;
            config.save()?;
            println!("Default target size set to: {}", value);
        }
        ConfigAction::SetHardMax { value } => {
            let mut config = GenNovellaConfig::load()?;
            config.segmentation.hard_max = *value;
            config.segmentation.validate()?;
            config.save()?;
            println!("Default hard max set to: {}", value);
        }
        ConfigAction::SetGap { value } => {
            let mut config = GenNovellaConfig::load()?;
            config.gap_ms = *value;
            config.save()?;
            println!("Default gap set to: {} ms", value);
        }
    }
    Ok(())
}

/// First `max_chars` characters of a segment on one line.
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &flat[..cut]),
        None => flat,
    }
}
