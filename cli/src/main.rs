//! mdslides CLI - markdown to slide deck compiler

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use mdslides::export::{to_standalone_html, ExportOptions};
use mdslides::render::{self, DeckStats};
use mdslides::workspace::{self, open_document};
use mdslides::{parse_deck, CompileOptions, JsonFormat, SlideDeck, Theme};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "mdslides")]
#[command(version)]
#[command(about = "Compile markdown documents into themed HTML slide decks", long_about = None)]
struct Cli {
    /// Input markdown file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output HTML file
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct GlobalArgs {
    /// JSON file with compile options
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Theme id (default, dark, light, serif, contrast)
    #[arg(long, env = "MDSLIDES_THEME", value_parser = parse_theme, global = true)]
    theme: Option<Theme>,

    /// Maximum nesting depth of lists and blockquotes
    #[arg(long, value_name = "N", global = true)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build standalone printable HTML pages
    Build {
        /// Input markdown files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (next to each input if not specified)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page title (first slide heading if not specified)
        #[arg(long)]
        title: Option<String>,

        /// Print in portrait orientation
        #[arg(long)]
        portrait: bool,
    },

    /// Render the deck as an HTML fragment
    Html {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the parsed deck as JSON
    Json {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the slide text outline
    Text {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show deck statistics and diagnostics
    Info {
        /// Input markdown file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print statistics and diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a new document from the starter template
    New {
        /// File to create
        #[arg(value_name = "FILE", default_value = "presentation.md")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List available themes
    Themes,
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    value.parse::<Theme>().map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = load_options(&cli.global).and_then(|options| match cli.command {
        Some(Commands::Build {
            inputs,
            output,
            title,
            portrait,
        }) => {
            let export = ExportOptions {
                title,
                landscape: !portrait,
                ..ExportOptions::default()
            };
            cmd_build(&inputs, output.as_deref(), &options, &export)
        }
        Some(Commands::Html { input, output }) => cmd_html(&input, output.as_deref(), &options),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact, &options),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref(), &options),
        Some(Commands::Info { input, json }) => cmd_info(&input, json, &options),
        Some(Commands::New { path, force }) => cmd_new(&path, force),
        Some(Commands::Themes) => {
            cmd_themes();
            Ok(())
        }
        None => {
            // Default behavior: build if input is provided
            if let Some(input) = cli.input {
                cmd_build_single(&input, cli.output.as_deref(), &options)
            } else {
                println!("{}", "Usage: mdslides <FILE> [OUTPUT]".yellow());
                println!("       mdslides --help for more information");
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_options(global: &GlobalArgs) -> CliResult<CompileOptions> {
    let mut options = match &global.config {
        Some(path) => CompileOptions::from_json_file(path)?,
        None => CompileOptions::default(),
    };
    if let Some(theme) = global.theme {
        options = options.with_theme(theme);
    }
    if let Some(depth) = global.max_depth {
        options = options.with_max_nesting_depth(depth);
    }
    log::debug!("Compile options: {:?}", options);
    Ok(options)
}

fn load_deck(input: &Path, options: &CompileOptions) -> CliResult<SlideDeck> {
    let document = open_document(input)?;
    let deck = parse_deck(&document.text, &options.parse);
    report_diagnostics(input, &deck);
    Ok(deck)
}

fn report_diagnostics(input: &Path, deck: &SlideDeck) {
    for diagnostic in deck.diagnostics() {
        eprintln!(
            "{}: {}:{}: {}",
            "warning".yellow().bold(),
            input.display(),
            diagnostic.line,
            diagnostic.message
        );
    }
}

fn emit(content: &str, output: Option<&Path>) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn build_target(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            dir.join(format!("{}.html", stem))
        }
        None => input.with_extension("html"),
    }
}

fn cmd_build_single(input: &Path, output: Option<&Path>, options: &CompileOptions) -> CliResult {
    let deck = load_deck(input, options)?;
    let target = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| build_target(input, None));
    let page = to_standalone_html(&deck, &options.render, &ExportOptions::default());
    emit(&page, Some(&target))
}

fn cmd_build(
    inputs: &[PathBuf],
    output: Option<&Path>,
    options: &CompileOptions,
    export: &ExportOptions,
) -> CliResult {
    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut built = Vec::with_capacity(inputs.len());
    for input in inputs {
        pb.set_message(input.display().to_string());
        let deck = load_deck(input, options)?;
        let target = build_target(input, output);
        fs::write(&target, to_standalone_html(&deck, &options.render, export))?;
        built.push((target, deck.slide_count()));
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, (path, slides)) in built.iter().enumerate() {
        let branch = if i + 1 == built.len() { "└─" } else { "├─" };
        println!(
            "  {} {} ({} slides)",
            branch.dimmed(),
            path.display(),
            slides
        );
    }

    Ok(())
}

fn cmd_html(input: &Path, output: Option<&Path>, options: &CompileOptions) -> CliResult {
    let deck = load_deck(input, options)?;
    let html = render::to_html(&deck, &options.render);
    emit(&html, output)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    options: &CompileOptions,
) -> CliResult {
    let deck = load_deck(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let mut json = render::to_json(&deck, format)?;
    json.push('\n');
    emit(&json, output)
}

fn cmd_text(input: &Path, output: Option<&Path>, options: &CompileOptions) -> CliResult {
    let deck = load_deck(input, options)?;
    let mut text = render::to_text(&deck);
    text.push('\n');
    emit(&text, output)
}

fn cmd_info(input: &Path, json: bool, options: &CompileOptions) -> CliResult {
    let document = open_document(input)?;
    let deck = parse_deck(&document.text, &options.parse);
    let stats = DeckStats::from_deck(&deck);

    if json {
        let report = serde_json::json!({
            "file": input.display().to_string(),
            "theme": options.render.theme,
            "stats": stats,
            "diagnostics": deck.diagnostics(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "Deck Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Theme".bold(), options.render.theme);
    println!("{}: {}", "Slides".bold(), stats.slide_count);
    if let Some(title) = deck.slides.first().and_then(|slide| slide.title()) {
        println!("{}: {}", "Title".bold(), title);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.list_item_count
    );
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Code blocks".bold(), stats.code_block_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Links".bold(), stats.link_count);

    let diagnostics = deck.diagnostics();
    println!();
    if diagnostics.is_empty() {
        println!("{}", "No problems found".green());
    } else {
        println!("{}", "Diagnostics".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for diagnostic in diagnostics {
            println!(
                "  line {} (slide {}): {}",
                diagnostic.line,
                diagnostic.slide + 1,
                diagnostic.message
            );
        }
    }

    Ok(())
}

fn cmd_new(path: &Path, force: bool) -> CliResult {
    if path.exists() && !force {
        return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
    }
    workspace::save_document(&workspace::new_document(), Some(path))?;
    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

fn cmd_themes() {
    println!("{}", "Available themes".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for theme in Theme::ALL {
        println!(
            "  {:<10} {:<8} {}",
            theme.id().bold(),
            theme.alias(),
            theme.description().dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_target() {
        assert_eq!(
            build_target(Path::new("talks/intro.md"), None),
            PathBuf::from("talks/intro.html")
        );
        assert_eq!(
            build_target(Path::new("talks/intro.md"), Some(Path::new("out"))),
            PathBuf::from("out/intro.html")
        );
    }

    #[test]
    fn test_parse_theme() {
        assert_eq!(parse_theme("Dark"), Ok(Theme::Dark));
        assert!(parse_theme("neon").is_err());
    }

    #[test]
    fn test_cmd_new_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.md");

        cmd_new(&path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            workspace::NEW_DOCUMENT_TEMPLATE
        );
        assert!(cmd_new(&path, false).is_err());
        assert!(cmd_new(&path, true).is_ok());
    }

    #[test]
    fn test_cmd_build_writes_pages() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("talk.md");
        fs::write(&input, "# Talk\n---\n- point").unwrap();
        let out = dir.path().join("site");

        let options = CompileOptions::default().with_theme(Theme::Serif);
        cmd_build(&[input], Some(&out), &options, &ExportOptions::default()).unwrap();

        let page = fs::read_to_string(out.join("talk.html")).unwrap();
        assert!(page.contains("<title>Talk</title>"));
        assert!(page.contains("theme-serif"));
    }
}
