//! Interactive terminal shell for herbcopy.
//!
//! Walks the user through the same steps every time: API key, optional key
//! check, PDF upload, preview, generation, feedback. All the work happens in
//! the library; this file only prompts, prints and maps flags to `ToolConfig`.

use anyhow::{Context, Result};
use clap::Parser;
use console::{style, Term};
use herbcopy::config::{DEFAULT_BASE_URL, DEFAULT_FEEDBACK_FILE, DEFAULT_MODEL};
use herbcopy::{
    generate_concepts, prepare_document, read_upload, submit_feedback, validate_credential,
    Credential, FeedbackFormat, ProgressCallback, Rating, Stage, ToolConfig,
    WorkflowProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── Colour helpers (console drops styling off-TTY and under NO_COLOR) ─────────

fn green(s: &str) -> String {
    style(s).green().to_string()
}
fn red(s: &str) -> String {
    style(s).red().to_string()
}
fn yellow(s: &str) -> String {
    style(s).yellow().to_string()
}
fn dim(s: &str) -> String {
    style(s).dim().to_string()
}
fn bold(s: &str) -> String {
    style(s).bold().to_string()
}
fn cyan(s: &str) -> String {
    style(s).cyan().to_string()
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Shows a spinner while a slow stage (key check, extraction, generation) runs.
struct SpinnerCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl SpinnerCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn clear(&self) {
        if let Some(bar) = self.slot().take() {
            bar.finish_and_clear();
        }
    }

    /// The current spinner slot; a poisoned lock still holds a usable bar.
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WorkflowProgressCallback for SpinnerCallback {
    fn on_stage_start(&self, stage: Stage) {
        let message = match stage {
            Stage::ValidateCredential => "Testing API key…",
            Stage::Extract => "Extracting text from PDF…",
            Stage::Generate => "Generating marketing concepts…",
            Stage::Normalize | Stage::RecordFeedback => return,
        };
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Some(old) = self.slot().replace(bar) {
            old.finish_and_clear();
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        self.clear();
    }

    fn on_stage_error(&self, _stage: Stage, _error: &str) {
        self.clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive run; prompts for the API key and the PDF
  herbcopy

  # Give the paper up front and skip the key check
  herbcopy --skip-key-check research/ashwagandha.pdf

  # Any OpenAI-compatible endpoint
  herbcopy --base-url http://localhost:11434/v1 --model llama3.1 paper.pdf

  # Store feedback as JSON lines instead of the pipe-delimited log
  herbcopy --feedback-format jsonl --feedback-file feedback.jsonl paper.pdf

FEEDBACK LOG:
  One line per submission, appended to feedback.txt by default:
    Rating: Good | Comments: clear and on-brand | Concepts: ...
  Fields are not escaped; use --feedback-format jsonl if comments or
  concepts may contain '|' or line breaks.

LOGGING:
  RUST_LOG  Override the log filter (e.g. RUST_LOG=herbcopy=debug)
"#;

/// Generate marketing concepts from herbal-medicine research PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "herbcopy",
    version,
    about = "Generate marketing concepts from herbal-medicine research PDFs",
    long_about = "Extracts the text of a research paper, asks a chat LLM for three marketing \
concepts, and records your rating of them in a local feedback log. The API key is entered at a \
masked prompt and is never written to disk.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Research paper (PDF). Prompted for when omitted.
    input: Option<PathBuf>,

    /// Chat model ID.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// OpenAI-compatible API root.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Feedback log to append to.
    #[arg(long, default_value = DEFAULT_FEEDBACK_FILE)]
    feedback_file: PathBuf,

    /// Feedback line format.
    #[arg(long, value_enum, default_value = "delimited")]
    feedback_format: FeedbackFormatArg,

    /// HTTP timeout for the completion service, in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Do not probe the model list before generating.
    #[arg(long)]
    skip_key_check: bool,

    /// Characters of extracted/preprocessed text to show (0 = all).
    #[arg(long, default_value_t = 2000)]
    preview_chars: usize,

    /// Skip the feedback questions.
    #[arg(long)]
    no_feedback: bool,

    /// Print the generation result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress spinners and previews.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FeedbackFormatArg {
    Delimited,
    Jsonl,
}

impl From<FeedbackFormatArg> for FeedbackFormat {
    fn from(v: FeedbackFormatArg) -> Self {
        match v {
            FeedbackFormatArg::Delimited => FeedbackFormat::Delimited,
            FeedbackFormatArg::Jsonl => FeedbackFormat::JsonLines,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Keep library logs quiet by default; the prompts carry the interaction.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let term = Term::stderr();
    term.write_line(&bold("Marketing Concepts Tool"))?;

    // ── API key ──────────────────────────────────────────────────────────
    term.write_str("Your OpenAI API Key: ")?;
    let credential = Credential::new(
        term.read_secure_line()
            .context("Failed to read API key")?
            .trim(),
    );
    if credential.is_blank() {
        term.write_line(&yellow("Please enter your OpenAI API Key to proceed."))?;
        return Ok(ExitCode::FAILURE);
    }

    let config = build_config(&cli)?;

    if !cli.skip_key_check {
        match validate_credential(&credential, &config).await {
            Ok(models) => term.write_line(&format!(
                "{} API Key is valid! {}",
                green("✔"),
                dim(&format!("({} models available)", models.len()))
            ))?,
            Err(e) => {
                term.write_line(&red(&format!("API Key test failed: {e}")))?;
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    // ── 1. Upload ────────────────────────────────────────────────────────
    term.write_line(&format!("\n{}", bold("1. Upload Research Paper")))?;
    let path = match cli.input.clone() {
        Some(p) => p,
        None => {
            let answer = prompt(&term, "Path to a PDF file: ")?;
            if answer.is_empty() {
                term.write_line(&cyan(
                    "Please upload a research paper in PDF format to begin.",
                ))?;
                return Ok(ExitCode::SUCCESS);
            }
            PathBuf::from(answer)
        }
    };

    let upload = match read_upload(&path) {
        Ok(u) => u,
        Err(e) => {
            term.write_line(&red(&e.to_string()))?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let prepared = prepare_document(upload.bytes, &config).await;
    if let Some(ref e) = prepared.extraction.error {
        term.write_line(&red(&e.to_string()))?;
    }
    if !prepared.extraction.has_content() {
        term.write_line(&red("No text could be extracted from the uploaded PDF."))?;
        return Ok(ExitCode::FAILURE);
    }

    if !cli.quiet {
        term.write_line(&format!(
            "\n{} {}",
            bold("Extracted Text"),
            dim(&format!(
                "({} of {} pages from {})",
                prepared.extraction.pages_extracted, prepared.extraction.page_count, upload.name
            ))
        ))?;
        term.write_line(&preview(&prepared.extraction.text, cli.preview_chars))?;

        term.write_line(&format!("\n{}", bold("2. Preprocessing")))?;
        term.write_line(&dim("Preprocessed Text Preview"))?;
        term.write_line(&preview(&prepared.normalized, cli.preview_chars))?;
    }

    // ── 3. Generate ──────────────────────────────────────────────────────
    term.write_line(&format!("\n{}", bold("3. Generate Marketing Concepts")))?;
    if !confirm(&term, "Generate concepts? [Y/n] ")? {
        return Ok(ExitCode::SUCCESS);
    }

    let generation = generate_concepts(&prepared.normalized, &credential, &config).await;
    if let Some(ref e) = generation.error {
        term.write_line(&red(&e.to_string()))?;
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&generation).context("Failed to serialise output")?
        );
    }
    term.write_line(&format!("\n{}", bold("Generated Marketing Concepts")))?;
    term.write_line(&generation.concepts)?;
    if generation.is_success() && !cli.quiet {
        term.write_line(&dim(&format!(
            "{} tokens in  /  {} tokens out  —  {}ms",
            generation.prompt_tokens, generation.completion_tokens, generation.duration_ms
        )))?;
    }

    // ── 4. Feedback ──────────────────────────────────────────────────────
    if cli.no_feedback {
        return Ok(ExitCode::SUCCESS);
    }
    term.write_line(&format!("\n{}", bold("4. Provide Feedback")))?;
    term.write_line("Please rate the quality of the generated marketing concepts.")?;
    for (i, rating) in Rating::ALL.iter().enumerate() {
        term.write_line(&format!("  {}. {}", i + 1, rating))?;
    }

    let rating = loop {
        let answer = prompt(&term, "Rating (1-4, empty to skip): ")?;
        if answer.is_empty() {
            return Ok(ExitCode::SUCCESS);
        }
        match answer.parse::<Rating>() {
            Ok(r) => break r,
            Err(e) => term.write_line(&yellow(&e))?,
        }
    };
    let comments = prompt(&term, "Additional Comments (optional): ")?;

    match submit_feedback(rating, &comments, &generation.concepts, &config) {
        Ok(_) => {
            term.write_line(&green("Thank you for your feedback!"))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            term.write_line(&red(&e.to_string()))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Map CLI args to `ToolConfig`.
fn build_config(cli: &Cli) -> Result<ToolConfig> {
    let mut builder = ToolConfig::builder()
        .model(cli.model.clone())
        .base_url(cli.base_url.clone())
        .request_timeout_secs(cli.timeout)
        .feedback_path(cli.feedback_file.clone())
        .feedback_format(cli.feedback_format.clone().into());

    if !cli.quiet {
        builder = builder.progress_callback(SpinnerCallback::new() as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

fn prompt(term: &Term, question: &str) -> Result<String> {
    term.write_str(question)?;
    Ok(term.read_line().context("Failed to read input")?.trim().to_string())
}

fn confirm(term: &Term, question: &str) -> Result<bool> {
    let answer = prompt(term, question)?.to_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}

/// First `max_chars` characters of `text` (all of it when 0).
fn preview(text: &str, max_chars: usize) -> String {
    let total = text.chars().count();
    if max_chars == 0 || total <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!(
        "{head}\u{2026}\n{}",
        dim(&format!("[{} more characters not shown]", total - max_chars))
    )
}
