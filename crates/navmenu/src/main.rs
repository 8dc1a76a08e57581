//! Navmenu command line
//!
//! Renders menu definition files for a given request URL.
//!
//! Usage:
//!   navmenu render --menu menus.yml --url http://localhost/about --format ul
//!   navmenu check --menu menus.yml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tera::Tera;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use navmenu::definition::register_all;
use navmenu::{Attributes, MenuContext, MenuDefinition, MenuRegistry, MenuSettings, view};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render menus as HTML for a request URL.
    Render {
        /// Menu definition file (YAML or JSON).
        #[arg(long)]
        menu: PathBuf,

        /// URL of the current request.
        #[arg(long)]
        url: String,

        /// Menu settings file; falls back to NAVMENU_SETTINGS.
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Base URL for generated links; defaults to the origin of `--url`.
        #[arg(long)]
        base_url: Option<String>,

        /// Only render the menu with this name.
        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_enum, default_value = "ul")]
        format: Format,
    },

    /// Validate a menu definition file.
    Check {
        #[arg(long)]
        menu: PathBuf,

        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Ul,
    Ol,
    Div,
    Navbar,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    match args.command {
        Command::Render {
            menu,
            url,
            settings,
            base_url,
            name,
            format,
        } => {
            let base_url = match base_url {
                Some(base) => base,
                None => url::Url::parse(&url)
                    .with_context(|| format!("invalid request url {url}"))?
                    .origin()
                    .ascii_serialization(),
            };
            let context = MenuContext::simple(&base_url, &url)
                .context("failed to build request context")?;
            let registry = build_registry(&menu, settings.as_deref(), context)?;

            let mut tera = Tera::default();
            if matches!(format, Format::Navbar) {
                view::register(&mut tera).context("failed to load navbar templates")?;
            }

            let mut rendered = 0;
            for builder in registry.all() {
                if name.as_deref().is_some_and(|n| n != builder.name()) {
                    continue;
                }
                let html = match format {
                    Format::Ul => builder.as_ul(Attributes::new()),
                    Format::Ol => builder.as_ol(Attributes::new()),
                    Format::Div => builder.as_div(Attributes::new()),
                    Format::Navbar => view::render_navbar(&tera, builder),
                }
                .with_context(|| format!("failed to render menu {}", builder.name()))?;
                println!("{html}");
                rendered += 1;
            }

            if rendered == 0 {
                bail!("no menu to render");
            }
        }
        Command::Check { menu, settings } => {
            let context = MenuContext::simple("http://localhost", "http://localhost/")
                .context("failed to build request context")?;
            let registry = build_registry(&menu, settings.as_deref(), context)?;
            for builder in registry.all() {
                info!(menu = %builder.name(), items = builder.len(), "menu ok");
            }
            println!("{} menu(s) ok", registry.len());
        }
    }

    Ok(())
}

fn build_registry(
    menu: &Path,
    settings: Option<&Path>,
    context: MenuContext,
) -> Result<MenuRegistry> {
    let settings_path = settings
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("NAVMENU_SETTINGS").map(PathBuf::from));
    let settings = match settings_path {
        Some(path) => MenuSettings::from_path(&path)?,
        None => MenuSettings::default(),
    };

    let definitions = MenuDefinition::list_from_path(menu)?;
    let mut registry = MenuRegistry::new(settings, context);
    register_all(&definitions, &mut registry)
        .with_context(|| format!("failed to register menus from {}", menu.display()))?;
    info!(menus = registry.len(), "menus registered");
    Ok(registry)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
