//! Wanderlust command-line driver.
//!
//! Runs the resolution core against a file-backed store so locale, variant,
//! saved destinations and onboarding state can be inspected and changed
//! from a shell.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wanderlust::catalog::Catalog;
use wanderlust::experiments::Variant;
use wanderlust::features::display;
use wanderlust::flags::{InMemoryFlagProvider, ProviderSlot};
use wanderlust::storage::FileStore;
use wanderlust::{AppContext, Config};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser)]
#[command(name = "wanderlust", version, about = "Wanderlust experiment and locale core")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the resolved locale, experiments and copy
    Status,
    /// Switch the app language (en, es, fr)
    Locale { code: String },
    /// Apply a compiled-in variant as a manual override
    Variant { variant: Variant },
    /// Drop cached experiments and overrides
    Reset,
    /// Re-fetch feature flags (remote mode)
    Refresh,
    /// Search the destination catalog
    Search { query: String },
    /// Save a destination by id
    Save { id: String },
    /// Remove a saved destination
    Unsave { id: String },
    /// List saved destinations
    Saved,
    /// Walk through onboarding, or reset it
    Onboarding {
        #[arg(long)]
        reset: bool,
    },
    /// Reload the flags file periodically until Ctrl+C
    Watch {
        #[arg(long, default_value_t = 5)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file first (before anything else)
    dotenvy::dotenv().ok();

    // If RUST_LOG is not set, default to "info" level for our crate
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wanderlust=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env();
    info!("Configuration loaded successfully");
    info!("Source mode: {:?}", config.source_mode);

    let store = FileStore::open(&config.store_path)
        .await
        .with_context(|| format!("Failed to open store at {}", config.store_path.display()))?;
    info!("Store opened: {}", store.path().display());

    let provider = match &config.flags_file {
        Some(path) => Some(Arc::new(InMemoryFlagProvider::from_json_file(path)?)),
        None => None,
    };
    let slot = ProviderSlot::empty();
    if let Some(provider) = &provider {
        slot.attach(provider.clone());
    } else if config.is_remote() {
        warn!("Remote mode without WANDERLUST_FLAGS_FILE; experiments will use defaults");
    }

    let ctx = AppContext::new(&config, Arc::new(store), slot);
    ctx.start().await;

    match cli.command.unwrap_or(Command::Status) {
        Command::Status => print_status(&ctx),
        Command::Locale { code } => {
            let locale = ctx.locale().change_locale(&code).await?;
            println!("Locale set to {}", locale);
            print_status(&ctx);
        }
        Command::Variant { variant } => {
            ctx.experiments().switch_variant(variant).await;
            print_status(&ctx);
        }
        Command::Reset => {
            ctx.experiments().reset_to_defaults().await;
            print_status(&ctx);
        }
        Command::Refresh => {
            ctx.experiments().refresh().await;
            println!("{}", ctx.translator().t("config_refreshed"));
            print_status(&ctx);
        }
        Command::Search { query } => {
            let interactions = ctx.interactions();
            let results = interactions.search(&query).await;
            let options = serde_json::json!({ "count": results.len(), "query": query });
            println!("{}", ctx.translator().translate("search_results", Some(&options)));
            for destination in results {
                println!("  [{}] {} - {}", destination.id, destination.title, destination.subtitle);
            }
        }
        Command::Save { id } => {
            anyhow::ensure!(Catalog.get(&id).is_some(), "Unknown destination id: {}", id);
            if ctx.saved_destinations().save(&id).await {
                println!("Saved {}", id);
            } else {
                println!("{} was already saved", id);
            }
        }
        Command::Unsave { id } => {
            if ctx.saved_destinations().remove(&id).await {
                println!("Removed {}", id);
            } else {
                println!("{} was not saved", id);
            }
        }
        Command::Saved => {
            let saved = ctx.saved_destinations().resolve().await;
            println!("{}", ctx.translator().t("saved_destinations"));
            if saved.is_empty() {
                println!("  {}", ctx.translator().t("no_saved"));
            }
            for destination in saved {
                println!(
                    "  [{}] {} {}",
                    destination.id,
                    destination.title,
                    destination.price.unwrap_or_default()
                );
            }
        }
        Command::Onboarding { reset } => run_onboarding(&ctx, reset).await?,
        Command::Watch { interval_secs } => {
            watch(&ctx, provider, &config, Duration::from_secs(interval_secs.max(1))).await?
        }
    }

    Ok(())
}

fn print_status(ctx: &AppContext) {
    let translator = ctx.translator();
    let locale = ctx.locale().current();
    let exp = ctx.experiments().config();

    println!("Locale:      {}", locale);
    println!(
        "Variant:     {} (source: {}, override: {})",
        exp.detected_variant(),
        ctx.experiments().source().name(),
        ctx.experiments()
            .active_override()
            .map_or("none".to_string(), |v| v.to_string())
    );
    println!("CTA:         {} {}", display::cta_label(translator, &exp), exp.cta_color);
    println!("Badge:       {}", display::badge_label(translator, &exp));
    println!("Search:      {}", display::search_placeholder(translator, &exp));
    println!("Onboarding:  {} step(s)", exp.onboarding_steps);

    if display::show_summer_promo(locale, &exp) {
        println!("Banner:      {}", translator.t("summer_promo"));
    }
    if display::show_local_deals(locale, &exp) {
        println!("{}", translator.t("local_deals_title"));
        for deal in Catalog.local_deals() {
            println!("  -{} {}", deal.discount, deal.title);
        }
    }
}

async fn run_onboarding(ctx: &AppContext, reset: bool) -> anyhow::Result<()> {
    let onboarding = ctx.onboarding();
    if reset {
        onboarding
            .reset()
            .await
            .with_context(|| ctx.translator().t("reset_failed"))?;
        println!("Onboarding will show on next launch");
        return Ok(());
    }

    if onboarding.is_complete().await {
        println!("Onboarding already complete");
        return Ok(());
    }

    let total = onboarding.total_steps();
    loop {
        let step = onboarding.current_step();
        let options = serde_json::json!({ "step": step + 1, "total": total });
        println!(
            "{}",
            ctx.translator().translate("onboarding.step_counter", Some(&options))
        );
        if onboarding.next().await? {
            break;
        }
    }
    println!("{}", ctx.translator().t("get_started"));
    Ok(())
}

async fn watch(
    ctx: &AppContext,
    provider: Option<Arc<InMemoryFlagProvider>>,
    config: &Config,
    interval: Duration,
) -> anyhow::Result<()> {
    let (Some(provider), Some(path)) = (provider, config.flags_file.as_deref()) else {
        anyhow::bail!("watch needs WANDERLUST_FLAGS_FILE");
    };

    let mut updates = ctx.experiments().subscribe();
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    info!("Watching {} every {:?}", path.display(), interval);
    print_status(ctx);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                match provider.replace_from_json_file(path) {
                    Ok(count) => {
                        info!("Loaded {} flags", count);
                        ctx.experiments().refresh().await;
                    }
                    Err(e) => warn!("Keeping previous flags: {:#}", e),
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                print_status(ctx);
            }
        }
    }
}
