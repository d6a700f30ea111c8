use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

use meeting_minutes::io::{
    SAMPLE_TRANSCRIPT, read_transcript_file, resolve_request, resolve_state_file,
};
use meeting_minutes::text::{split_by_speaker, text_stats};
use meeting_minutes::validation::validate_output_path;
use meeting_minutes::{
    DocxRenderer, LazyCompletion, MeetingState, Pipeline, Settings, check_connection,
    format_summary, write_state_json,
};

#[derive(Parser)]
#[command(name = "meeting-minutes")]
#[command(author, version, about = "Generate meeting minutes from a transcript", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the extraction pipeline and write a .docx document
    Generate {
        /// Transcript text file
        #[arg(short, long, conflicts_with_all = ["state", "sample"])]
        input: Option<PathBuf>,

        /// Initial state as JSON (raw_transcript, title, date)
        #[arg(long, conflicts_with = "sample")]
        state: Option<PathBuf>,

        /// Use the bundled sample transcript
        #[arg(short, long)]
        sample: bool,

        /// Output document path (.docx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Meeting title
        #[arg(short, long)]
        title: Option<String>,

        /// Meeting date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        /// Also write the final state as JSON
        #[arg(long)]
        json_output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Test the connection to the configured model
    Check {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show transcript statistics without calling the model
    Inspect {
        /// Transcript text file
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            state,
            sample,
            output,
            title,
            date,
            json_output,
            verbose,
        } => {
            setup_logging(verbose);
            let settings = Settings::load()?;
            let initial = if let Some(path) = state {
                resolve_state_file(&path, title, date)?
            } else {
                let transcript = load_transcript(input.as_deref(), sample, &settings)?;
                resolve_request(transcript, title, date, &settings.output)?
            };
            generate(settings, initial, output, json_output).await
        }
        Commands::Check { verbose } => {
            setup_logging(verbose);
            let settings = Settings::load()?;
            check(settings).await
        }
        Commands::Inspect { input } => {
            setup_logging(false);
            inspect(&input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

/// Transcript text for a request; `None` lets the sample fallback decide
fn load_transcript(input: Option<&Path>, sample: bool, settings: &Settings) -> Result<Option<String>> {
    if sample {
        return Ok(Some(SAMPLE_TRANSCRIPT.to_string()));
    }

    let Some(path) = input else {
        return Ok(None);
    };

    match read_transcript_file(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if settings.output.use_sample_on_error => {
            warn!("{:#}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

async fn generate(
    settings: Settings,
    initial: MeetingState,
    output: Option<PathBuf>,
    json_output: Option<PathBuf>,
) -> Result<()> {
    settings.ensure_dirs()?;

    let output = output.unwrap_or_else(|| {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        settings
            .output
            .output_dir
            .join(format!("minutes_{}.docx", stamp))
    });
    validate_output_path(&output).context("Invalid output path")?;

    info!(
        "Generating minutes for '{}' ({}), {} characters",
        initial.meeting_title,
        initial.meeting_date,
        initial.raw_transcript.chars().count()
    );

    let llm = LazyCompletion::from_settings(settings.clone());
    check_connection(&llm)
        .await
        .context("Connection check failed")?;

    let pipeline = Pipeline::from_settings(&settings)?;
    let state = pipeline.run(initial, &llm).await?;

    let written = DocxRenderer::new().render(&state, &output)?;
    if let Some(json_path) = json_output {
        write_state_json(&state, &json_path)?;
        info!("State written to {:?}", json_path);
    }

    println!();
    print!("{}", format_summary(&state));
    println!("Document: {}", written.display());

    Ok(())
}

async fn check(settings: Settings) -> Result<()> {
    info!(
        "Checking connection to provider '{}'",
        settings.llm.provider
    );
    let llm = LazyCompletion::from_settings(settings);
    check_connection(&llm)
        .await
        .context("Connection check failed")?;

    println!("Connection OK");
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let transcript = read_transcript_file(input)?;
    let stats = text_stats(&transcript);

    println!("Transcript Analysis");
    println!("===================");
    println!("Characters: {}", stats.characters);
    println!("Words: {}", stats.words);
    println!("Lines: {}", stats.lines);
    println!("Paragraphs: {}", stats.paragraphs);
    println!();

    let turns = split_by_speaker(&transcript);
    let mut speakers: Vec<(String, usize, usize)> = Vec::new();
    for turn in &turns {
        let words = turn.text.split_whitespace().count();
        match speakers.iter_mut().find(|(name, _, _)| *name == turn.speaker) {
            Some((_, count, total_words)) => {
                *count += 1;
                *total_words += words;
            }
            None => speakers.push((turn.speaker.clone(), 1, words)),
        }
    }

    println!("Speaker Statistics");
    println!("------------------");
    if speakers.is_empty() {
        println!("No 'Name: text' turns found");
    }
    for (name, count, words) in &speakers {
        println!("{}: {} turns, {} words", name, count, words);
    }

    Ok(())
}
