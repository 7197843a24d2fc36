use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{error, info, warn};

use folio::logger::configure_logger;
use folio::project::Project;
use folio::site_builder::SiteBuilder;

use crate::config::project_root;

mod config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Project root, the directory holding folio.toml
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the configuration and every content entry
    Check,
    /// Write the manifest and sitemap
    Build {
        /// Output directory, relative to the project root
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let root = match project_root(args.root) {
        Ok(root) => root,
        Err(err) => {
            eprintln!("{}", err);
            eprintln!("Please run folio --help");
            std::process::exit(2);
        }
    };

    let project = Project::open(&root)?;

    if let Err(err) = configure_logger(&project.config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Site {} from {}", project.config.site.url, root.display());

    let builder = SiteBuilder::new(&project);
    let res = match args.command {
        Command::Check => builder.collect().map(|collections| {
            for collection in &collections {
                info!("{}: {} entries ok", collection.name(), collection.entries().len());
            }
        }),
        Command::Build { out_dir } => builder.build(&root.join(out_dir)).map(|report| {
            for file in &report.files {
                info!("Wrote {}", file.display());
            }
        }),
    };

    if let Err(ref err) = res {
        error!("{}", err);
    }
    Ok(res?)
}
