//! relayout CLI - PDF layout reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use relayout::{
    ContentBlock, ConvertOptions, DocumentConverter, JsonFormat, LayoutConverter, LayoutOptions,
    LineClassifier, LopdfSource, PageSource, StyledDocument,
};

#[derive(Parser)]
#[command(name = "relayout")]
#[command(version)]
#[command(about = "Rebuild PDF layout as styled text and JSON", long_about = None)]
struct Cli {
    #[command(flatten)]
    layout: LayoutArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LayoutArgs {
    /// Vertical tolerance in points for grouping words into lines
    #[arg(long, global = true, default_value_t = 2.0)]
    line_tolerance: f32,

    /// Centering tolerance as a fraction of page width
    #[arg(long, global = true, default_value_t = 0.08)]
    center_tolerance: f32,

    /// Lay out pages one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Apply legal-form heading and label styles
    #[arg(long, global = true)]
    legal_forms: bool,

    /// Drop text lines covered by detected tables
    #[arg(long, global = true)]
    suppress_table_text: bool,

    /// Page range, 1-based and inclusive (e.g., "3" or "2-5")
    #[arg(long, global = true)]
    pages: Option<String>,
}

impl LayoutArgs {
    fn convert_options(&self) -> Result<ConvertOptions, Box<dyn std::error::Error>> {
        let mut layout = LayoutOptions::new()
            .with_line_tolerance(self.line_tolerance)
            .with_center_tolerance(self.center_tolerance)
            .with_suppress_table_text(self.suppress_table_text)
            .with_parallel(!self.sequential);
        if self.legal_forms {
            layout = layout.with_classifier(LineClassifier::legal_forms());
        }

        let mut options = ConvertOptions::new().with_layout(layout);
        if let Some(ref pages) = self.pages {
            let (start, end) =
                parse_pages(pages).ok_or_else(|| format!("Invalid page range: {}", pages))?;
            options = options.with_pages(start, Some(end));
        }
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PDF to text and JSON in an output directory
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert PDF to plain text
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert PDF to the JSON styled-document model
    Json {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information and layout statistics
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse "N" or "N-M" (1-based, inclusive) into a 0-based half-open range.
fn parse_pages(range: &str) -> Option<(usize, usize)> {
    let range = range.trim();
    let (first, last) = match range.split_once('-') {
        Some((a, b)) => (a.trim().parse::<usize>().ok()?, b.trim().parse::<usize>().ok()?),
        None => {
            let page = range.parse::<usize>().ok()?;
            (page, page)
        }
    };

    if first == 0 || last < first {
        return None;
    }
    Some((first - 1, last))
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert { input, output } => cmd_convert(&input, output.as_deref(), &cli.layout),
        Commands::Text { input, output } => cmd_text(&input, output.as_deref(), &cli.layout),
        Commands::Json {
            input,
            output,
            compact,
        } => cmd_json(&input, output.as_deref(), compact, &cli.layout),
        Commands::Info { input, json } => cmd_info(&input, json, &cli.layout),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn convert(input: &Path, layout: &LayoutArgs) -> Result<StyledDocument, Box<dyn std::error::Error>> {
    let options = layout.convert_options()?;
    Ok(LayoutConverter::new().convert(input, &options)?)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let stem = input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("{}_output", stem)));

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Rebuilding layout...");
    let doc = convert(input, layout)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = relayout::render::to_text(&doc)?;
    fs::write(output_dir.join(format!("{}.txt", stem)), &text)?;
    pb.inc(1);

    pb.set_message("Generating JSON...");
    let json = relayout::render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join(format!("{}.json", stem)), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}.txt", "├─".dimmed(), stem);
    println!("  {} {}.json", "└─".dimmed(), stem);

    Ok(())
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert(input, layout)?;
    let text = relayout::render::to_text(&doc)?;
    write_output(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert(input, layout)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = relayout::render::to_json(&doc, format)?;
    write_output(output, &json)
}

fn cmd_info(input: &Path, json: bool, layout: &LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = LopdfSource::open(input)?.metadata();

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref version) = metadata.pdf_version {
        println!("{}: PDF {}", "Format".bold(), version);
    }
    println!("{}: {}", "Pages".bold(), metadata.page_count);

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    let doc = convert(input, layout)?;
    let blocks: Vec<&ContentBlock> = doc.pages.iter().flat_map(|p| p.content_blocks()).collect();
    let lines = blocks.iter().filter(|b| b.is_text()).count();
    let tables = blocks.iter().filter(|b| b.is_table()).count();
    let centered = doc
        .pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| b.style())
        .filter(|s| s.is_centered())
        .count();

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Lines".bold(), lines);
    println!("{}: {}", "Tables".bold(), tables);
    println!("{}: {}", "Centered".bold(), centered);
    println!(
        "{}: {}",
        "Words".bold(),
        doc.plain_text().split_whitespace().count()
    );

    Ok(())
}
