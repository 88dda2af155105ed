use clap::{Parser, Subcommand};
use nbblog::convert::NbconvertBackend;
use nbblog::generate::{self, BuildPaths};
use nbblog::{config, output, scan, serve};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nbblog")]
#[command(about = "Static blog generator for Jupyter notebooks")]
#[command(long_about = "\
Static blog generator for Jupyter notebooks

Each post is a folder holding one notebook. The folder name carries the
publication date and the slug; the notebook is named after the slug.

Posts structure:

  posts/
  ├── config.toml                          # Site config (optional)
  ├── 2020_3_14_pi_day/
  │   ├── pi_day.ipynb                     # Rendered with jupyter nbconvert
  │   └── img/                             # Images referenced as img/...
  │       └── circle.png
  └── 2020_4_1_draft/
      ├── draft.ipynb
      └── no_publish                       # Marker: skipped entirely

Templates (read verbatim, concatenated around generated HTML):

  templates/
  ├── post-top.html    post-bottom.html
  └── list-top.html    list-bottom.html

Posts are re-rendered only when the notebook is newer than its HTML.

Run 'nbblog gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Posts directory
    #[arg(long, default_value = "posts", global = true)]
    source: PathBuf,

    /// Template fragments directory
    #[arg(long, default_value = "templates", global = true)]
    templates: PathBuf,

    /// Output directory (also the directory `serve` publishes)
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest, converter output)
    #[arg(long, default_value = ".nbblog-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the posts directory into a manifest
    Scan,
    /// Validate post folder names and config without building
    Check,
    /// Render changed posts and rebuild the index
    Build {
        /// Re-render every post, ignoring timestamps
        #[arg(long)]
        force: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Serve the output directory over HTTP
    Serve {
        /// Listen address (defaults to [server] address in config.toml)
        #[arg(long)]
        address: Option<String>,
        /// Listen port (defaults to [server] port in config.toml)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_check_output(&manifest);
            println!("==> Posts are valid");
        }
        Command::Build { force } => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!(
                "==> Stage 2: Rendering posts → {}",
                cli.output.display()
            );
            let paths = BuildPaths {
                posts_dir: cli.source.clone(),
                templates_dir: cli.templates.clone(),
                output_dir: cli.output.clone(),
                temp_dir: cli.temp_dir.clone(),
            };
            let converter = NbconvertBackend::new(&manifest.config.converter);
            let report = generate::generate(&manifest, &paths, &converter, force)?;
            output::print_generate_output(&report, &cli.output);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Serve { address, port } => {
            let server = config::load_config(&cli.source)?.server;
            let address = address.unwrap_or(server.address);
            let port = port.unwrap_or(server.port);
            println!(
                "==> Serving {} at http://{}:{}",
                cli.output.display(),
                address,
                port
            );
            actix_web::rt::System::new().block_on(serve::run(cli.output, &address, port))?;
        }
    }

    Ok(())
}

/// Write the scan manifest to `<temp_dir>/manifest.json` for inspection.
fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)?;
    Ok(())
}
