use anyhow::{bail, Context, Result};
use catalogue::{categories, Catalogue, CatalogueView};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, normalize_api_base_url},
    ClientDirectory, ClientsLoader, LoadState,
};
use shared::{i18n::LocaleContext, locale::Locale};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Projects catalogue and client list of the studio site")]
struct Cli {
    /// Locale code (`en`, `ar`, `ru`); defaults to the configured locale.
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the category buttons.
    Categories,
    /// List projects, optionally narrowed to one category.
    Projects {
        #[arg(long, default_value = "all")]
        category: String,
    },
    /// Fetch and print the client list.
    Clients {
        #[arg(long)]
        api_base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let settings = load_settings()?;

    let locale = match cli.locale.as_deref() {
        Some(raw) => raw.parse::<Locale>()?,
        None => settings.default_locale,
    };
    let ctx = LocaleContext::embedded(locale)?;
    debug!(%locale, direction = ?locale.direction(), "locale selected");

    match cli.command {
        Command::Categories => {
            for category in categories(&ctx.translator) {
                println!("{}\t{}", category.id, category.label);
            }
        }
        Command::Projects { category } => {
            let catalogue = Catalogue::builtin().context("failed to load built-in catalogue")?;
            let mut view = CatalogueView::new(catalogue);
            view.select_raw(&category);

            println!("{}", ctx.t("projects", "title"));
            let visible = view.visible();
            if visible.is_empty() {
                println!("{}", ctx.t("projects", "empty"));
            }
            for item in visible {
                println!(
                    "{}\t{}\t{}\t{}",
                    item.id.0,
                    ctx.t("projects", item.category.as_str()),
                    item.title,
                    item.badge
                );
            }
        }
        Command::Clients { api_base_url } => {
            let api_base_url = match api_base_url {
                Some(raw) => normalize_api_base_url(&raw)?,
                None => settings.api_base_url.clone(),
            };
            info!(%api_base_url, %locale, "loading clients");

            let directory =
                ClientDirectory::new(ClientsLoader::new(api_base_url, settings.empty_list_policy()));
            match directory.refresh(&ctx).await {
                LoadState::Loaded { clients, .. } => {
                    println!("{}", ctx.t("clients", "title"));
                    if clients.is_empty() {
                        println!("{}", ctx.t("clients", "empty"));
                    }
                    for client in clients {
                        println!(
                            "{}\t{}\t{}",
                            client.id,
                            client.name,
                            client.logo.as_deref().unwrap_or("-")
                        );
                    }
                }
                LoadState::Failed { error, .. } => {
                    bail!(
                        "{} ({})",
                        error.localized_message(&ctx.translator),
                        ctx.t("common", "retry")
                    );
                }
                other => bail!("client list did not settle: {other:?}"),
            }
        }
    }

    Ok(())
}
