//! Tax-Free CLI
//!
//! Drives the shopping service directly against the same store the server
//! uses.

use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use exchange_rates::{DEFAULT_API_URL, RateResolver};
use taxfree_hex::ShoppingService;
use taxfree_store::{Store, build_store};
use taxfree_types::domain::money::format_currency;
use taxfree_types::domain::pricing::parse_price;
use taxfree_types::{
    CartFilter, CartItem, CartItemId, Category, Country, Language, PriceQuote, Translator,
    UpdateSettingsRequest,
};

#[derive(Parser)]
#[command(name = "taxfree")]
#[command(author, version, about = "Tax-free shopping calculator", long_about = None)]
struct Cli {
    /// Storage location (`sqlite://...` or `memory://`)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://taxfree.db?mode=rwc")]
    database_url: String,

    /// Base URL of the exchange-rate API
    #[arg(long, env = "RATES_API_URL", default_value = DEFAULT_API_URL)]
    rates_api_url: String,

    /// Rate request timeout in seconds
    #[arg(long, env = "RATES_TIMEOUT_SECS", default_value_t = 10)]
    rates_timeout_secs: u64,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a price in the tourist currency
    Quote {
        /// Amount as typed, e.g. 1000
        price: String,
    },
    /// Cart operations
    Cart {
        #[command(subcommand)]
        action: CartCommands,
    },
    /// Daily spending and category breakdown
    Analytics {
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommands,
    },
    /// Show the session exchange rates
    Rates,
    /// List the country catalog by region
    Countries,
    /// List the purchase categories
    Categories,
    /// Show or change the UI language
    Lang {
        /// en, ja or tr
        code: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartCommands {
    /// List items, optionally filtered
    List {
        #[arg(long)]
        category: Option<String>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Add a purchase at the current settings
    Add {
        price: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Remove an item by id
    Remove { id: String },
    /// Remove every item
    Clear,
    /// Tax-free totals in tourist and home currency
    Totals,
    /// Per-category breakdown
    Categories,
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set {
        #[arg(long, value_enum)]
        tax_free: Option<Toggle>,
        /// Tax-free rate in percent (0-100)
        #[arg(long)]
        rate: Option<f64>,
        /// Home country code
        #[arg(long)]
        home: Option<String>,
        /// Tourist country code
        #[arg(long)]
        tourist: Option<String>,
        /// Third country code
        #[arg(long, conflicts_with = "no_third")]
        third: Option<String>,
        /// Drop the third country
        #[arg(long)]
        no_third: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Commands {
    /// Whether the command prices anything with exchange rates. The rest
    /// run on the offline table and never touch the network.
    fn needs_live_rates(&self) -> bool {
        matches!(
            self,
            Commands::Quote { .. }
                | Commands::Rates
                | Commands::Cart {
                    action: CartCommands::Add { .. }
                }
                | Commands::Settings {
                    action: SettingsCommands::Set { .. }
                }
        )
    }
}

impl Cli {
    fn resolver(&self) -> Result<RateResolver> {
        if !self.command.needs_live_rates() {
            return Ok(RateResolver::offline());
        }
        Ok(RateResolver::standard(
            &self.rates_api_url,
            Duration::from_secs(self.rates_timeout_secs),
        )?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = build_store(&cli.database_url).await?;
    let resolver = cli.resolver()?;
    let mut service = ShoppingService::load(store, resolver).await;
    let out = Output {
        json: cli.json,
        t: service.translator(),
    };

    match cli.command {
        Commands::Quote { price } => {
            let quote = service.quote_input(&price)?;
            out.print(&quote, |t| quote_text(t, &quote))?;
        }

        Commands::Cart { action } => cart(&mut service, &out, action).await?,

        Commands::Analytics { days } => {
            let daily = service.daily_totals(days)?;
            let categories = service.by_category();
            let currency = service.totals().tourist.currency;
            let report = serde_json::json!({ "daily": daily, "categories": categories });
            out.print(&report, |t| {
                let mut lines = vec![t.t("analytics.dailySpending").to_string()];
                lines.extend(daily.iter().map(|d| {
                    format!("  {}  {}", d.date, format_currency(d.total, &currency))
                }));
                lines.push(t.t("analytics.byCategory").to_string());
                lines.extend(categories.iter().map(|c| {
                    format!(
                        "  {} {} x{}  {}",
                        c.category.icon,
                        category_name(t, &c.category),
                        c.count,
                        format_currency(c.total, &currency)
                    )
                }));
                lines.join("\n")
            })?;
        }

        Commands::Settings { action } => match action {
            SettingsCommands::Show => {
                let settings = service.settings().clone();
                out.print(&settings, |t| settings_text(t, &settings))?;
            }
            SettingsCommands::Set {
                tax_free,
                rate,
                home,
                tourist,
                third,
                no_third,
            } => {
                let current = service.settings();
                let mut codes: Vec<String> =
                    current.countries().iter().map(|c| c.code.clone()).collect();
                if let Some(home) = home {
                    codes[0] = home;
                }
                if let Some(tourist) = tourist {
                    codes[1] = tourist;
                }
                if let Some(third) = third {
                    codes.truncate(2);
                    codes.push(third);
                }
                if no_third {
                    codes.truncate(2);
                }
                let req = UpdateSettingsRequest {
                    is_tax_free_enabled: tax_free
                        .map_or(current.is_tax_free_enabled, |t| matches!(t, Toggle::On)),
                    tax_free_rate: rate.unwrap_or(current.tax_free_rate),
                    countries: codes,
                };
                let settings = service.update_settings(req).await?.clone();
                out.print(&settings, |t| settings_text(t, &settings))?;
            }
        },

        Commands::Rates => {
            let rates = service.rates();
            out.print(rates, |_| {
                let mut lines = vec![format!("1 {} ({:?})", rates.base(), rates.source())];
                lines.extend(
                    rates
                        .rates()
                        .iter()
                        .map(|(code, rate)| format!("  {:<4} {}", code, rate)),
                );
                lines.join("\n")
            })?;
        }

        Commands::Countries => {
            let groups = Country::grouped_by_region();
            out.print(&groups, |_| {
                let mut lines = Vec::new();
                for group in &groups {
                    lines.push(group.region.clone());
                    lines.extend(group.countries.iter().map(|c| {
                        format!("  {} {}  {} ({})", c.flag, c.code, c.name, c.currency)
                    }));
                }
                lines.join("\n")
            })?;
        }

        Commands::Categories => {
            let categories = Category::all();
            out.print(&categories, |t| {
                categories
                    .iter()
                    .map(|c| format!("{} {:<14} {}", c.icon, c.id, category_name(t, c)))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }

        Commands::Lang { code } => {
            let language = match code {
                Some(code) => {
                    let language: Language = code.parse()?;
                    service.set_language(language).await?
                }
                None => service.language(),
            };
            let out = Output {
                json: out.json,
                t: Translator::new(language),
            };
            out.print(&language, |t| {
                format!(
                    "{}: {} {}",
                    t.t("settings.language"),
                    language.flag(),
                    language.native_name()
                )
            })?;
        }
    }

    Ok(())
}

async fn cart(
    service: &mut ShoppingService<Store>,
    out: &Output,
    action: CartCommands,
) -> Result<()> {
    match action {
        CartCommands::List { category, from, to } => {
            let filter = CartFilter { category, from, to };
            let items = service.filter_items(&filter);
            out.print(&items, |t| {
                if items.is_empty() {
                    return t.t("common.emptyCart").to_string();
                }
                items
                    .iter()
                    .map(|item| item_text(t, item))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        CartCommands::Add { price, category } => {
            let price = parse_price(&price)?;
            let item = service.add_to_cart(price, category.as_deref()).await?;
            out.print(&item, |t| item_text(t, &item))?;
        }
        CartCommands::Remove { id } => {
            let removed = service.remove_item(&CartItemId::from(id)).await?;
            out.print(&removed, |t| format!("- {}", item_text(t, &removed)))?;
        }
        CartCommands::Clear => {
            let removed = service.clear_cart().await?;
            out.print(&serde_json::json!({ "removed": removed }), |t| {
                format!("{} ({})", t.t("common.emptyCart"), removed)
            })?;
        }
        CartCommands::Totals => {
            let totals = service.totals();
            out.print(&totals, |t| {
                format!(
                    "{}: {} / {}",
                    t.t("analytics.total"),
                    format_currency(totals.tourist.amount, &totals.tourist.currency),
                    format_currency(totals.home.amount, &totals.home.currency)
                )
            })?;
        }
        CartCommands::Categories => {
            let groups = service.by_category();
            let currency = service.totals().tourist.currency;
            out.print(&groups, |t| {
                groups
                    .iter()
                    .map(|g| {
                        format!(
                            "{} {} x{}  {}",
                            g.category.icon,
                            category_name(t, &g.category),
                            g.count,
                            format_currency(g.total, &currency)
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
    }
    Ok(())
}

/// Prints either JSON or translated text.
struct Output {
    json: bool,
    t: Translator,
}

impl Output {
    fn print<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce(&Translator) -> String,
    ) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text(&self.t));
        }
        Ok(())
    }
}

fn category_name(t: &Translator, category: &Category) -> String {
    let key = format!("categories.{}", category.id);
    match t.t(&key) {
        text if text == key => category.name.clone(),
        text => text.to_string(),
    }
}

fn item_text(t: &Translator, item: &CartItem) -> String {
    format!(
        "{}  {}  {} {}  {}  {}",
        item.id,
        item.date.format("%Y-%m-%d"),
        item.category.icon,
        category_name(t, &item.category),
        format_currency(item.tax_free_price, &item.tourist_country.currency),
        format_currency(item.home_price(), &item.home_country.currency)
    )
}

fn quote_text(t: &Translator, quote: &PriceQuote) -> String {
    let mut lines = vec![format!(
        "{}: {}",
        t.t("common.originalPrice"),
        format_currency(quote.original_price, &quote.tourist_currency)
    )];
    if let Some(tax_free) = quote.tax_free_price {
        lines.push(format!(
            "{}: {}",
            t.t("common.taxFreePrice"),
            format_currency(tax_free, &quote.tourist_currency)
        ));
    }
    lines.extend(
        quote
            .conversions
            .iter()
            .map(|c| format!("  {} {}: {}", c.country.flag, c.country.name, c.display)),
    );
    lines.join("\n")
}

fn settings_text(t: &Translator, settings: &taxfree_types::Settings) -> String {
    let toggle = if settings.is_tax_free_enabled { "✓" } else { "✗" };
    let mut lines = vec![
        format!("{}: {}", t.t("settings.enableTaxFree"), toggle),
        format!("{}: {}%", t.t("settings.taxFreeRate"), settings.tax_free_rate),
        t.t("settings.countries").to_string(),
    ];
    lines.extend(
        settings
            .countries()
            .iter()
            .map(|c| format!("  {} {} ({})", c.flag, c.name, c.currency)),
    );
    lines.join("\n")
}
