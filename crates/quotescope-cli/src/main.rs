use std::sync::Arc;

use clap::Parser;
use quotescope_api::{ListQuery, Quote, QuoteFilters, QuotesClient};
use quotescope_core::{
    search_quotes, Config, ControllerOptions, ListBrowser, PositionStore, QuoteController,
    QuoteSource, Theme,
};
use quotescope_tui::{App, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quotescope")]
#[command(version, about = "Terminal browser for a quotes collection", long_about = None)]
struct Cli {
    /// Quotes API base URL (overrides config and QUOTESCOPE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Clone, Copy, Default)]
struct FilterArgs {
    /// Quote type id
    #[arg(long = "type")]
    type_id: Option<u64>,
    /// Topic id
    #[arg(long = "topic")]
    topic_id: Option<u64>,
}

impl From<FilterArgs> for QuoteFilters {
    fn from(args: FilterArgs) -> Self {
        QuoteFilters::new(args.type_id, args.topic_id)
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Browse quotes interactively (default)
    Tui {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print a random quote
    Random {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Print one page of quotes, newest first
    List {
        /// Page number
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Only quotes matching this term
        #[arg(long)]
        search: Option<String>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Search quotes by text
    Search {
        /// Search term
        term: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List quote types, optionally only those under a topic
    Types {
        #[arg(long)]
        topic: Option<u64>,
    },
    /// List topics, optionally only those under a quote type
    Topics {
        #[arg(long = "type")]
        type_id: Option<u64>,
    },
}

/// One-shot commands log to stderr; the TUI owns the terminal so it logs to a file
fn init_logging(interactive: bool) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "quotescope=info".into());

    if interactive {
        let dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine cache directory"))?
            .join("quotescope");
        std::fs::create_dir_all(&dir)?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("quotescope.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Arc::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn print_quote(quote: &Quote) {
    println!("#{}  {}", quote.id, quote.quote);
    match (quote.author.is_empty(), quote.book.is_empty()) {
        (false, false) => println!("    - {}, {}", quote.author, quote.book),
        (false, true) => println!("    - {}", quote.author),
        (true, false) => println!("    - {}", quote.book),
        (true, true) => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui {
        filters: FilterArgs::default(),
    });

    init_logging(matches!(command, Commands::Tui { .. }))?;

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let client = QuotesClient::with_base_url(&config.api.base_url, config.api.timeout())?;
    tracing::debug!("Using quotes API at {}", client.base_url());

    match command {
        Commands::Tui { filters } => {
            let theme = Theme::resolve(config.ui.theme, Theme::detect_system());
            let mut app = App::new(theme, config.navigation.page_size, config.navigation.search_debounce());
            app.filters = filters.into();

            let source: Arc<dyn QuoteSource> = Arc::new(client);
            let (handle, task) = QuoteController::start(source.clone(), ControllerOptions::from(&config.navigation));

            quotescope_tui::run_tui(app, Session { source, handle, config }).await?;
            task.await?;
        }
        Commands::Random { filters } => {
            let filters: QuoteFilters = filters.into();
            let total = client.total_count(&filters).await?;

            let mut store = PositionStore::new();
            match store.randomize(total, &mut rand::thread_rng()) {
                Some(position) => {
                    tracing::info!("Picked position {} of {}", position, total);
                    let quote = client.quote_at_position(&filters, position).await?;
                    print_quote(&quote);
                }
                None => println!("No quotes match these filters."),
            }
        }
        Commands::List { page, search, filters } => {
            let mut query = ListQuery::with_filters(filters.into());
            if let Some(term) = search {
                query = query.search(term);
            }

            let mut browser = ListBrowser::new(config.navigation.page_size);
            browser.set_query(query);
            browser.refresh(&client).await;

            // The page count is only known once page metadata is in
            if browser.page() != page && browser.go_to_page(page) {
                browser.load_page(&client).await;
            }

            if let Some(error) = browser.error() {
                anyhow::bail!("{}", error);
            }

            for quote in browser.quotes() {
                print_quote(quote);
            }
            println!("\nPage {} of {}", browser.page(), browser.total_pages());
        }
        Commands::Search { term, filters } => {
            let results = search_quotes(&client, &term, &filters.into()).await;
            if let Some(error) = results.error {
                anyhow::bail!("{}", error);
            }

            for quote in &results.quotes {
                print_quote(quote);
            }
            println!("\n{} quotes found", results.quotes.len());
        }
        Commands::Types { topic } => {
            for kind in client.types(topic).await? {
                println!("{:>4}  {}", kind.id, kind.name);
            }
        }
        Commands::Topics { type_id } => {
            for topic in client.topics(type_id).await? {
                println!("{:>4}  {}", topic.id, topic.name);
            }
        }
    }

    Ok(())
}
