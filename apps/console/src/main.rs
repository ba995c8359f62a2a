use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use production_core::{
    load_settings, ConfirmationDialog, FileStore, HttpProductionApi, ProductionConsole,
    RefreshOutcome, SortDirection, SortField, StatusMessage,
};
use shared::domain::ProductId;
use tracing::info;
use tracing_subscriber::EnvFilter;

type Console = ProductionConsole<HttpProductionApi, FileStore>;

#[derive(Parser, Debug)]
#[command(about = "Production console for the product catalog endpoint")]
struct Cli {
    /// Endpoint receiving the operation envelopes.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    username: Option<String>,
    /// Local file holding the last production result.
    #[arg(long)]
    storage: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the catalog.
    Products {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SortArg::Name)]
        sort: SortArg,
        #[arg(long)]
        desc: bool,
    },
    /// Convert stock into finished units of a product.
    Produce {
        product: String,
        quantity: String,
        #[arg(long)]
        yes: bool,
    },
    /// Show the last recorded production.
    Last,
    /// Reverse the last recorded production.
    Undo {
        #[arg(long)]
        yes: bool,
    },
    /// Delete a product from the catalog.
    Delete {
        product: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortArg {
    Name,
    MaxProduce,
    Cost,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::MaxProduce => SortField::MaxProduce,
            SortArg::Cost => SortField::ProductionCost,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint_url = endpoint;
    }
    if let Some(username) = cli.username {
        settings.username = Some(username);
    }
    if let Some(storage) = cli.storage {
        settings.storage_path = storage;
    }
    settings.validate()?;
    info!(endpoint = %settings.endpoint_url, storage = %settings.storage_path.display(), "starting console");

    let api = HttpProductionApi::from_settings(&settings)?;
    let store = FileStore::open(&settings.storage_path);
    let username = settings.username().unwrap_or_default().to_string();
    let mut console = ProductionConsole::new(api, store, username);

    match cli.command {
        Command::Products { search, sort, desc } => {
            load_catalog(&mut console).await?;
            list_products(&mut console, search, sort.into(), desc);
        }
        Command::Produce {
            product,
            quantity,
            yes,
        } => produce(&mut console, ProductId::new(product), quantity, yes).await?,
        Command::Last => match console.last_result() {
            Some(result) => println!(
                "push {}: {} unit(s) of {}, total cost {:.2}",
                result.push_id,
                result.quantity_produced,
                result.product_id,
                result.total_production_cost
            ),
            None => println!("no production recorded"),
        },
        Command::Undo { yes } => undo(&mut console, yes).await?,
        Command::Delete { product, yes } => {
            delete(&mut console, ProductId::new(product), yes).await?
        }
    }

    Ok(())
}

async fn load_catalog(console: &mut Console) -> Result<()> {
    match console.refresh_catalog().await {
        RefreshOutcome::Failed { message } => bail!(message),
        RefreshOutcome::Applied { .. } | RefreshOutcome::Stale => Ok(()),
    }
}

fn list_products(console: &mut Console, search: Option<String>, field: SortField, desc: bool) {
    let browser = console.browser_mut();
    browser.set_search(search.unwrap_or_default());
    if browser.sort().field != field {
        browser.toggle_sort(field);
    }
    let wanted = if desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    if browser.sort().direction != wanted {
        browser.toggle_sort(field);
    }

    let rows = console.browser().visible(console.catalog());
    if rows.is_empty() {
        println!("no products");
        return;
    }
    println!(
        "{:<16} {:<32} {:>12} {:>12}",
        "ID", "NAME", "MAX PRODUCE", "COST"
    );
    for product in rows {
        println!(
            "{:<16} {:<32} {:>12} {:>12.2}",
            product.id.as_str(),
            product.name,
            product.max_produce,
            product.production_cost_total
        );
    }
}

async fn produce(console: &mut Console, product: ProductId, quantity: String, yes: bool) -> Result<()> {
    load_catalog(console).await?;
    console.select_product(&product)?;
    console.set_quantity(quantity);

    if let Some(preview) = console.form().cost_preview(console.catalog()) {
        let name = console
            .catalog()
            .get(&product)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| product.to_string());
        let dialog = ConfirmationDialog::new(
            true,
            "Push to production",
            format!(
                "Produce {} unit(s) of {name} at {:.2} per unit (total {:.2})?",
                preview.quantity, preview.unit_cost, preview.total
            ),
            false,
        );
        if !yes && !confirm(&dialog)? {
            println!("cancelled");
            return Ok(());
        }
    }

    console.submit_production().await;
    report(console.form().status())
}

async fn undo(console: &mut Console, yes: bool) -> Result<()> {
    if !console.request_undo() {
        bail!("nothing to undo");
    }
    let dialog = console.undo().dialog(console.last_result());
    if !yes && !confirm(&dialog)? {
        console.cancel_undo();
        println!("cancelled");
        return Ok(());
    }
    console.undo_last().await;
    report(console.undo().status())
}

async fn delete(console: &mut Console, product: ProductId, yes: bool) -> Result<()> {
    load_catalog(console).await?;
    console.request_delete(&product)?;
    let dialog = console.browser().delete_dialog(console.catalog());
    if !yes && !confirm(&dialog)? {
        console.browser_mut().cancel_delete();
        println!("cancelled");
        return Ok(());
    }
    console.delete_pending().await;
    report(console.browser().status())
}

/// Stdin rendition of the dialog's cancel/confirm actions.
fn confirm(dialog: &ConfirmationDialog) -> Result<bool> {
    let Some(view) = dialog.view() else {
        return Ok(false);
    };
    println!("{}", view.title);
    println!("{}", view.message);
    print!(
        "[y] {} / [N] {}: ",
        view.confirm.label.to_lowercase(),
        view.cancel.label.to_lowercase()
    );
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report(status: Option<&StatusMessage>) -> Result<()> {
    match status {
        Some(status) if status.is_error() => bail!(status.text.clone()),
        Some(status) => {
            println!("{}", status.text);
            Ok(())
        }
        None => Ok(()),
    }
}
