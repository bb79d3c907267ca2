use brochure::{config, generate, output, watch};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "brochure")]
#[command(about = "Static site generator for small marketing sites")]
#[command(long_about = "\
Static site generator for small marketing sites

Your content is a folder of JSON documents plus one config.toml. Pages are
built from typed sections, posts become a paginated blog, and the output is
plain HTML with a single stylesheet.

Content structure:

  content/
  ├── config.toml                  # Site config (optional, stock defaults apply)
  ├── static/                      # Copied to the output root as-is
  ├── pages/
  │   ├── home.json                # The home slug renders at /
  │   ├── news.json                # A page with a sectionBlog hosts the listing
  │   └── contact.json
  └── posts/
      ├── rest-is-productive.json  # Slug from the \"slug\" field, file stem fallback
      └── on-burnout.json

Sections (the \"_type\" of each entry in a page's \"sections\" array):
  sectionHeader, sectionContent, sectionCards, sectionFAQ, sectionForm,
  sectionBlog. Unknown section types are skipped and reported, never fatal.

Run 'brochure gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full HTML site into the output directory
    Build,
    /// Validate and render the content tree without writing anything
    Check,
    /// Rebuild on content changes, with notices in the terminal
    Watch,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Building {}", cli.source.display());
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&cli.source)?;
            output::print_check_output(&report);
        }
        Command::Watch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch::run(&cli.source, &cli.output))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
