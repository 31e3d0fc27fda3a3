//! Slidesmith CLI
//!
//! Usage:
//!   slidesmith generate <SPEC> -o <OUT> [--template <FILE>] [--style <FILE>]
//!   slidesmith inspect <FILE> [--json]
//!   slidesmith replace <FILE> KEY=VALUE... [-o <OUT>]
//!   slidesmith remove <FILE> <INDEX> [-o <OUT>]
//!   slidesmith add <FILE> --title <TEXT> [--bullets <TEXT>...] [--layout <INDEX>] [-o <OUT>]

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;

use slidesmith::deck::{
    DeckCompiler, DeckStyle, LayoutRef, PresentationSpec, ReplacementSet, SlideSpec, WorkingDeck,
    inspect, replace_in_file,
};

#[derive(Parser)]
#[command(name = "slidesmith")]
#[command(about = "Compile YAML/JSON presentation specs into PowerPoint decks")]
#[command(version)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a spec into a .pptx
    Generate {
        /// Spec file (.yaml, .yml or .json)
        input: PathBuf,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
        /// Template providing layouts and theme
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Style overrides (YAML or JSON)
        #[arg(short, long)]
        style: Option<PathBuf>,
    },
    /// Describe layouts and slides of a .pptx
    Inspect {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replace {{KEY}} markers in slide text
    Replace {
        file: PathBuf,
        /// KEY=VALUE pairs
        #[arg(required = true)]
        replacements: Vec<String>,
        /// Output file (defaults to overwriting the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove a slide by 0-based index
    Remove {
        file: PathBuf,
        index: usize,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Append a content slide
    Add {
        file: PathBuf,
        #[arg(long)]
        title: String,
        /// Bullet point, repeatable
        #[arg(short, long)]
        bullets: Vec<String>,
        /// Layout index (auto-detected when omitted)
        #[arg(short, long)]
        layout: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Info } else { LevelFilter::Warn };
    env_logger::Builder::from_default_env().filter_level(level).init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Generate {
            input,
            output,
            template,
            style,
        } => {
            let spec = PresentationSpec::from_path(&input)?;
            let style = match style {
                Some(path) => DeckStyle::from_path(path)?,
                None => DeckStyle::default(),
            };
            let deck = DeckCompiler::with_style(style).compile_to_file(&spec, template.as_deref(), &output)?;
            for warning in &deck.warnings {
                eprintln!("warning: {}", warning);
            }
            println!("Created {} with {} slides", output.display(), deck.slide_count);
        },
        Command::Inspect { file, json } => {
            let report = inspect(&file)?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("Presentation: {}", file.display());
                print!("{}", report);
            }
        },
        Command::Replace {
            file,
            replacements,
            output,
        } => {
            let set = ReplacementSet::from_pairs(&replacements)?;
            let output = output_or_input(&file, output);
            let report = replace_in_file(&file, &set, &output)?;
            for key in &report.unmatched {
                eprintln!("warning: no replacement for {{{{{}}}}}", key);
            }
            println!("Made {} replacements in {}", report.applied, output.display());
        },
        Command::Remove { file, index, output } => {
            let mut deck = WorkingDeck::open(Some(&file), false, DeckStyle::default())?;
            deck.remove_slide(index)?;
            let output = output_or_input(&file, output);
            deck.save(&output)?;
            println!("Removed slide {}; {} slides remain", index, deck.slide_count()?);
        },
        Command::Add {
            file,
            title,
            bullets,
            layout,
            output,
        } => {
            let mut deck = WorkingDeck::open(Some(&file), false, DeckStyle::default())?;
            let mut slide = SlideSpec::content(title, bullets);
            if let Some(index) = layout {
                slide = slide.with_layout(LayoutRef::Index(index));
            }
            let index = deck.push_slide(&slide)?;
            let output = output_or_input(&file, output);
            deck.save(&output)?;
            println!("Added slide {} to {}", index + 1, output.display());
        },
    }
    Ok(())
}

fn output_or_input(input: &Path, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| input.to_path_buf())
}
