//! # notemark CLI
//!
//! Command-line interface for the notemark markdown utilities.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use notemark_core::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notemark")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "notemark.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List image and link URLs found in a markdown document
    Urls {
        /// Markdown file (defaults to stdin)
        file: Option<PathBuf>,

        /// Only report images
        #[arg(long)]
        images_only: bool,

        /// Skip images
        #[arg(long, conflicts_with = "images_only")]
        no_images: bool,

        /// Skip links
        #[arg(long)]
        no_anchors: bool,

        /// Tokenize raw HTML and scan it for <img>/<a> tags
        #[arg(long)]
        html: bool,

        /// Emit {url, kind} records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the title derived from a note body
    Title {
        /// Markdown file (defaults to stdin)
        file: Option<PathBuf>,
    },

    /// Point links at a URL to an internal resource id instead
    Rewrite {
        /// Markdown file (defaults to stdin)
        file: Option<PathBuf>,

        /// URL to replace
        #[arg(long)]
        url: String,

        /// Resource id; links become `:/<id>`
        #[arg(long)]
        id: String,
    },

    /// Resolve relative link targets against a base URL
    PrependBase {
        /// Markdown file (defaults to stdin)
        file: Option<PathBuf>,

        /// Base URL (defaults to base_url from the config)
        #[arg(long)]
        base: Option<String>,
    },

    /// Render a markdown table from a YAML layout and JSON rows
    Table {
        /// YAML file listing the columns
        #[arg(long)]
        layout: PathBuf,

        /// JSON array of row objects
        #[arg(long)]
        rows: PathBuf,
    },

    /// Describe how a single line parses as a list item
    ListItem {
        /// The line to inspect
        line: String,
    },

    /// Check whether a divider row matches a table header row
    CheckTable {
        /// Header row, e.g. "| a | b |"
        header: String,

        /// Divider row, e.g. "| --- | --- |"
        divider: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays machine readable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::WARN.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config =
        Config::load_or_default(&cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Urls {
            file,
            images_only,
            no_images,
            no_anchors,
            html,
            json,
        } => {
            let filters = commands::UrlFilters {
                images_only,
                no_images,
                no_anchors,
                html,
                json,
            };
            commands::list_urls(&config, file.as_deref(), filters)
        }
        Commands::Title { file } => commands::show_title(file.as_deref()),
        Commands::Rewrite { file, url, id } => {
            commands::rewrite_resource(file.as_deref(), &url, &id)
        }
        Commands::PrependBase { file, base } => {
            commands::prepend_base(&config, file.as_deref(), base.as_deref())
        }
        Commands::Table { layout, rows } => commands::render_table(&layout, &rows),
        Commands::ListItem { line } => commands::inspect_list_item(&line),
        Commands::CheckTable { header, divider } => commands::check_table(&header, &divider),
    }
}
