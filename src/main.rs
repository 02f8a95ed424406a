use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;
use viewfinder::{check, config, output, render, theme, transport};

#[derive(Parser)]
#[command(name = "viewfinder")]
#[command(about = "Static HTML renderer for JSON-described photo galleries")]
#[command(long_about = "\
Static HTML renderer for JSON-described photo galleries

A gallery is a tree of folders described by small JSON documents:

  site/
  ├── config.json                  # Site config (title, storage, image sizes)
  ├── folderInfo.json              # Root folder descriptor
  ├── thumb.png                    # Placeholder folder thumbnail
  ├── theme/
  │   └── theme.json               # Optional theme settings bundle
  └── travel/
      ├── folderInfo.json          # Album descriptor
      ├── itemsInfo.json           # Ordered photo list
      └── img/
          ├── thumb/               # thumb_<photo> files
          ├── large/               # large_<photo> files
          ├── src/                 # original files
          └── meta/                # per-photo metadata (optional)

Rendering writes one HTML file per page state: index.html per folder,
page-N.html per extra album page, photo-N.html per photo.

Run 'viewfinder gen-config' to generate a documented viewfinder.toml.")]
#[command(version)]
struct Cli {
    /// Site directory containing the gallery descriptors
    #[arg(long, global = true)]
    site: Option<PathBuf>,

    /// Base URL the site is served from
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// Output directory for rendered pages
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Path to the local configuration file
    #[arg(long, default_value = "viewfinder.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the gallery to static HTML pages
    Render,
    /// Validate the site's descriptor documents without rendering
    Check,
    /// Print a stock viewfinder.toml with all options documented
    GenConfig,
}

/// Effective settings after layering defaults, viewfinder.toml, and flags.
struct Effective {
    site_dir: PathBuf,
    base_url: Url,
    out_dir: PathBuf,
    theme_overlay: Option<serde_json::Value>,
}

fn resolve_settings(cli: &Cli) -> Result<Effective, Box<dyn std::error::Error>> {
    let local = config::load_local_config(&cli.config)?.unwrap_or_default();

    let site_dir = cli
        .site
        .clone()
        .or_else(|| local.site.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("site"));
    let out_dir = cli
        .out
        .clone()
        .or_else(|| local.out.as_deref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("dist"));
    let base_url = match (&cli.base_url, &local.base_url) {
        (Some(url), _) => url.clone(),
        (None, Some(raw)) => Url::parse(raw)?,
        (None, None) => Url::parse("https://localhost/")?,
    };

    Ok(Effective {
        site_dir,
        base_url,
        out_dir,
        theme_overlay: local.theme.as_overlay(),
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Render => {
            let effective = resolve_settings(&cli)?;
            let transport =
                transport::FsTransport::new(&effective.site_dir, effective.base_url.clone());

            let site = config::load_site(&transport, &effective.base_url)?;
            let theme = theme::load_theme(&transport, &site, effective.theme_overlay.as_ref())?;

            println!(
                "==> Rendering {} → {}",
                effective.site_dir.display(),
                effective.out_dir.display()
            );
            let summary =
                render::render_site(&transport, &site, theme.as_ref(), &effective.out_dir)?;
            output::print_render_output(&summary);
        }
        Command::Check => {
            let effective = resolve_settings(&cli)?;
            println!("==> Checking {}", effective.site_dir.display());
            let documents = check::check_site(&effective.site_dir)?;
            output::print_check_output(&documents);
            let invalid = documents.iter().filter(|d| d.error.is_some()).count();
            if invalid > 0 {
                return Err(format!("{invalid} invalid documents").into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_local_toml());
        }
    }

    Ok(())
}
