//! ocrlayout CLI - layout OCR reconstruction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use ocrlayout::render::ExtractionStats;
use ocrlayout::{
    parse_file_with_options, parse_pages, AnalysisParser, JsonFormat, LayoutOptions,
    PageSelection, RenderOptions,
};

#[derive(Parser)]
#[command(name = "ocrlayout")]
#[command(version)]
#[command(about = "Rebuild layout OCR results as HTML, Markdown, text, and JSON", long_about = None)]
struct Cli {
    /// Input analysis JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every reconstructing command.
#[derive(clap::Args, Clone)]
struct LayoutArgs {
    /// Skip malformed paragraphs and tables instead of failing
    #[arg(long)]
    lenient: bool,

    /// Process pages one unit at a time
    #[arg(long)]
    sequential: bool,

    /// Minimum fraction of a box that must lie inside a region
    #[arg(long, value_name = "RATIO", env = "OCRLAYOUT_REGION_THRESHOLD")]
    region_threshold: Option<f64>,

    /// Minimum vertical overlap for two elements to share a line
    #[arg(long, value_name = "RATIO", env = "OCRLAYOUT_LINE_THRESHOLD")]
    line_threshold: Option<f64>,

    /// Append tables no paragraph refers to at the end of their page
    #[arg(long)]
    orphan_tables: bool,

    /// Page range (e.g., "1-10", "1,3,5")
    #[arg(long)]
    pages: Option<String>,
}

impl LayoutArgs {
    fn page_selection(&self) -> Result<PageSelection, ocrlayout::Error> {
        match self.pages {
            Some(ref p) => parse_pages(p),
            None => Ok(PageSelection::All),
        }
    }

    fn layout_options(&self) -> Result<LayoutOptions, ocrlayout::Error> {
        let mut options = LayoutOptions::new()
            .with_pages(self.page_selection()?)
            .with_orphan_tables(self.orphan_tables)
            .with_parallel(!self.sequential);
        if self.lenient {
            options = options.lenient();
        }
        if let Some(threshold) = self.region_threshold {
            options = options.with_region_threshold(threshold);
        }
        if let Some(threshold) = self.line_threshold {
            options = options.with_line_threshold(threshold);
        }
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an analysis to all formats (HTML, Markdown, text, JSON)
    Convert {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert an analysis to HTML
    Html {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Attributes of the <table> element
        #[arg(long, value_name = "ATTRS")]
        table_attributes: Option<String>,

        /// Emit bare <table> elements
        #[arg(long, conflicts_with = "table_attributes")]
        plain_tables: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert an analysis to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Table rendering mode
        #[arg(long, value_enum, default_value = "html")]
        table_mode: TableMode,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert an analysis to plain text
    Text {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Convert an analysis to the JSON document model
    Json {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show analysis information
    Info {
        /// Input analysis JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert every analysis JSON file of a directory to HTML
    Batch {
        /// Input directory
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory (input directory if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum TableMode {
    /// Standard Markdown tables
    Markdown,
    /// HTML tables for merged cells
    Html,
}

impl From<TableMode> for ocrlayout::TableFallback {
    fn from(mode: TableMode) -> Self {
        match mode {
            TableMode::Markdown => ocrlayout::TableFallback::Markdown,
            TableMode::Html => ocrlayout::TableFallback::Html,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert {
            input,
            output,
            layout,
        }) => cmd_convert(&input, output.as_deref(), &layout),
        Some(Commands::Html {
            input,
            output,
            table_attributes,
            plain_tables,
            layout,
        }) => cmd_html(
            &input,
            output.as_deref(),
            table_attributes,
            plain_tables,
            &layout,
        ),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            table_mode,
            layout,
        }) => cmd_markdown(&input, output.as_deref(), frontmatter, table_mode, &layout),
        Some(Commands::Text {
            input,
            output,
            layout,
        }) => cmd_text(&input, output.as_deref(), &layout),
        Some(Commands::Json {
            input,
            output,
            compact,
            layout,
        }) => cmd_json(&input, output.as_deref(), compact, &layout),
        Some(Commands::Info { input, json }) => cmd_info(&input, json),
        Some(Commands::Batch {
            input,
            output,
            layout,
        }) => cmd_batch(&input, output.as_deref(), &layout),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                let layout = LayoutArgs {
                    lenient: true,
                    sequential: false,
                    region_threshold: None,
                    line_threshold: None,
                    orphan_tables: false,
                    pages: None,
                };
                cmd_convert(&input, cli.output.as_deref(), &layout)
            } else {
                println!("{}", "Usage: ocrlayout <FILE> [OUTPUT]".yellow());
                println!("       ocrlayout --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn write_or_print(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
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
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reconstructing layout...");
    let doc = parse_file_with_options(input, layout.layout_options()?)?;
    pb.inc(1);

    let render_options = RenderOptions::new()
        .with_frontmatter(true)
        .with_pages(layout.page_selection()?);

    pb.set_message("Generating HTML...");
    let html = ocrlayout::render::to_html(&doc, &render_options)?;
    fs::write(output_dir.join("layout.html"), &html)?;
    pb.inc(1);

    pb.set_message("Generating Markdown...");
    let markdown = ocrlayout::render::to_markdown(&doc, &render_options)?;
    fs::write(output_dir.join("layout.md"), &markdown)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = ocrlayout::render::to_text(&doc, &render_options)?;
    fs::write(output_dir.join("layout.txt"), &text)?;

    let json = ocrlayout::render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("document.json"), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} layout.html", "├─".dimmed());
    println!("  {} layout.md", "├─".dimmed());
    println!("  {} layout.txt", "├─".dimmed());
    println!("  {} document.json", "└─".dimmed());

    Ok(())
}

fn cmd_html(
    input: &Path,
    output: Option<&Path>,
    table_attributes: Option<String>,
    plain_tables: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, layout.layout_options()?)?;

    let mut render_options = RenderOptions::new().with_pages(layout.page_selection()?);
    if let Some(attributes) = table_attributes {
        render_options = render_options.with_table_attributes(attributes);
    } else if plain_tables {
        render_options = render_options.without_table_attributes();
    }

    let html = ocrlayout::render::to_html(&doc, &render_options)?;
    write_or_print(output, &html)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    table_mode: TableMode,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, layout.layout_options()?)?;

    let render_options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_table_fallback(table_mode.into())
        .with_pages(layout.page_selection()?);

    let markdown = ocrlayout::render::to_markdown(&doc, &render_options)?;
    write_or_print(output, &markdown)
}

fn cmd_text(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, layout.layout_options()?)?;

    let render_options = RenderOptions::new().with_pages(layout.page_selection()?);
    let text = ocrlayout::render::to_text(&doc, &render_options)?;
    write_or_print(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, layout.layout_options()?)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = ocrlayout::render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path, as_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient so that statistics are shown even for partly malformed results
    let parser = AnalysisParser::open_with_options(input, LayoutOptions::new().lenient())?;
    let doc = parser.parse()?;
    let stats = ExtractionStats::from_document(&doc, &PageSelection::All);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{}", "Analysis Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    let status = parser.status();
    if status.is_succeeded() {
        println!("{}: {}", "Status".bold(), status.as_str().green());
    } else {
        println!("{}: {}", "Status".bold(), status.as_str().yellow());
    }
    if let Some(ref model_id) = doc.metadata.model_id {
        println!("{}: {}", "Model".bold(), model_id);
    }
    if let Some(ref api_version) = doc.metadata.api_version {
        println!("{}: {}", "API version".bold(), api_version);
    }
    if let Some(ref created) = doc.metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = doc.metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    println!("{}: {}", "Pages".bold(), parser.page_count());

    println!();
    println!("{}", "Layout Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Paragraph groups".bold(), stats.paragraph_count);
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Cells".bold(), stats.cell_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Checkboxes".bold(), stats.checkbox_count);

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: Option<&Path>,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output.unwrap_or(input).to_path_buf();
    fs::create_dir_all(&output_dir)?;

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let options = layout.layout_options()?;
    let render_options = RenderOptions::new().with_pages(layout.page_selection()?);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut failed = 0;
    for path in &files {
        let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
        pb.set_message(name.clone());

        let result = parse_file_with_options(path, options.clone())
            .and_then(|doc| ocrlayout::render::to_html(&doc, &render_options));
        match result {
            Ok(html) => {
                let stem = path.file_stem().unwrap_or_default().to_string_lossy();
                fs::write(output_dir.join(format!("{}.html", stem)), html)?;
            }
            Err(e) => {
                log::warn!("Failed to convert {}: {}", path.display(), e);
                pb.println(format!("{} {}: {}", "Failed".red(), name, e));
                failed += 1;
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} converted, {} failed",
        "Batch complete:".green().bold(),
        files.len() - failed,
        failed
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "ocrlayout".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Layout OCR reconstruction tool");
    println!();
    println!("License: MIT");
}
