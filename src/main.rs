use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use scanclean::ocr::renderer::page_count;
use scanclean::pipeline::{self, PipelineConfig};

#[derive(Parser, Debug)]
#[command(name = "scanclean")]
#[command(version, about = "OCR a scanned PDF into clean, continuous text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert one PDF into a single cleaned text file
    Run {
        /// Input PDF file path
        input: PathBuf,

        /// Output text file path (overwritten if it exists)
        output: PathBuf,

        #[command(flatten)]
        opts: ConvertOpts,

        /// Disable progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert multiple PDF files, one output per input
    Batch {
        /// Input PDF files
        inputs: Vec<PathBuf>,

        /// Output directory for the text files
        #[arg(short, long, default_value = "batch_output")]
        output: PathBuf,

        #[command(flatten)]
        opts: ConvertOpts,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
struct ConvertOpts {
    /// Rendering DPI
    #[arg(long, default_value_t = 350)]
    dpi: u32,

    /// Recognition language(s), e.g. "spa" or "spa+eng"
    #[arg(long, default_value = "spa")]
    lang: String,

    /// Bottom fraction of the page treated as the footnote band
    #[arg(long, default_value_t = 0.22)]
    bottom_ratio: f32,

    /// Lines shorter than this fraction of the median height are suspect
    #[arg(long, default_value_t = 0.70)]
    small_text_factor: f32,

    /// Keep inline reference markers like [12]
    #[arg(long)]
    no_marker_strip: bool,

    /// Keep hyphenated line breaks as-is
    #[arg(long)]
    no_dehyphenate: bool,

    /// Apply the Spanish lexical post-filter
    #[arg(long)]
    fixups: bool,

    /// Write a JSON trace of per-page lines next to the output
    #[arg(short, long)]
    debug: bool,
}

impl ConvertOpts {
    fn into_config(self, input: PathBuf, output: PathBuf) -> PipelineConfig {
        let mut config = PipelineConfig::new(input, output);
        config.dpi = self.dpi;
        config.langs = self.lang;
        config.bottom_ratio = self.bottom_ratio;
        config.small_text_factor = self.small_text_factor;
        config.strip_inline_markers = !self.no_marker_strip;
        config.dehyphenate = !self.no_dehyphenate;
        config.lexical_fixups = self.fixups;
        config.debug = self.debug;
        config
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            opts,
            quiet,
        } => run_single(input, output, opts, quiet),
        Commands::Batch {
            inputs,
            output,
            opts,
        } => run_batch(inputs, output, opts),
        Commands::Info { input } => show_info(input),
    }
}

fn run_single(input: PathBuf, output: PathBuf, opts: ConvertOpts, quiet: bool) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Output: {}", output.display());
        println!("[*] DPI: {}, languages: {}", opts.dpi, opts.lang);
    }

    let config = opts.into_config(input.clone(), output.clone());
    pipeline::run(&config)
        .with_context(|| format!("Failed to process PDF: {}", input.display()))?;

    if !quiet {
        println!("[✓] Wrote: {}", output.display());
    }

    Ok(())
}

fn run_batch(inputs: Vec<PathBuf>, output: PathBuf, opts: ConvertOpts) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    println!("[*] Batch processing {} file(s)", inputs.len());
    println!("[*] Output directory: {}\n", output.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());

        if !input.exists() {
            eprintln!("  [!] Skipped: file does not exist");
            failed += 1;
            continue;
        }

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("document_{}", i + 1));
        let out_file = output.join(format!("{stem}.txt"));

        match run_single(input.clone(), out_file, opts.clone(), true) {
            Ok(_) => {
                println!("  [✓] Success");
                success += 1;
            }
            Err(e) => {
                eprintln!("  [✗] Failed: {e:#}");
                failed += 1;
            }
        }
    }

    println!("\n[*] Summary: {success} succeeded, {failed} failed");

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to process");
    }

    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let pages = page_count(&input)
        .with_context(|| format!("Failed to inspect PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {pages}");

    Ok(())
}
