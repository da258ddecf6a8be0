//! epiboard - COVID-19 statistics dashboard

mod cli;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cli::{CliError, OutputFormat};
use epiboard_core::{
    loaders, prediction, ApiClient, ClientConfig, DataManager, FileStorage, Navigator, Poller,
    RouteTracker, SessionEvent, SessionStore,
};
use epiboard_types::{
    ApiError, CountryCode, DraftField, FormField, Language, Metric, PredictionForm, RouteKey,
    SortColumn, SortConfig, SortDirection,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "epiboard",
    version,
    about = "COVID-19 statistics dashboard",
    long_about = "Browse worldwide COVID-19 statistics, country rankings and death predictions.\n\
                  \n\
                  Pages are gated per country: usa sees everything, fr has no data management,\n\
                  ch only has the prediction form.\n\
                  \n\
                  Examples:\n\
                    epiboard login alice --country fr     # Log in and pick a country\n\
                    epiboard stats                        # Global figures + most affected countries\n\
                    epiboard countries --search fra       # Filter the country list\n\
                    epiboard analytics --metric deaths    # Rankings and cumulative trend\n\
                    epiboard manage list --sort cases --desc\n\
                    epiboard predict --region Europe --country France --date 2024-01-01 ...\n\
                    epiboard watch                        # Refresh the dashboard every 5 minutes\n\
                    epiboard metrics --watch              # Refresh model metrics every minute\n\
                    epiboard web --port 3333              # Serve the browser dashboard\n\
                  \n\
                  Web Frontend Workflow:\n\
                    cd crates/epiboard-web && trunk build --release\n\
                    epiboard web                          # Serves bundle + /api/v1 proxy\n\
                  \n\
                  Environment Variables:\n\
                    EPIBOARD_API_ROOT                     # Backend root (default http://localhost:8000)\n\
                    EPIBOARD_STATE_DIR                    # Where the session token is kept\n\
                    EPIBOARD_PASSWORD                     # Password for 'login'\n\
                    EPIBOARD_FORMAT                       # Force output format: json|table\n\
                    EPIBOARD_NO_COLOR                     # Disable ANSI colors (log-friendly)\n\
                    RUST_LOG                              # Log filter (default epiboard=info)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend root URL
    #[arg(long, env = "EPIBOARD_API_ROOT")]
    api_root: Option<String>,

    /// Directory holding the session state
    #[arg(long, env = "EPIBOARD_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/epiboard/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force output format (json|table)
    #[arg(long, env = "EPIBOARD_FORMAT", value_parser = ["json", "table"])]
    format: Option<String>,

    /// Disable ANSI colors (log-friendly)
    #[arg(long, env = "EPIBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the browser dashboard
    Web {
        /// Port for web server
        #[arg(long, default_value = "3333")]
        port: u16,
        /// Backend root for the proxy (defaults to --api-root)
        #[arg(long)]
        backend: Option<String>,
        /// Open the dashboard in the default browser
        #[arg(long)]
        open: bool,
    },
    /// Log in and store the session token
    Login {
        username: String,
        #[arg(long, env = "EPIBOARD_PASSWORD", hide_env_values = true)]
        password: String,
        /// Country to browse as (usa, fr, ch)
        #[arg(long)]
        country: Option<CountryCode>,
    },
    /// Drop the stored session
    Logout,
    /// Show the current user and the pages they can open
    Whoami,
    /// Change the selected country
    SwitchCountry { country: CountryCode },
    /// Show or change the interface language
    Language { language: Option<Language> },
    /// Global figures and the most affected countries
    Stats,
    /// Per-country summary
    Countries {
        /// Case-insensitive name filter
        #[arg(long, short = 's')]
        search: Option<String>,
    },
    /// One country with derived rates
    Country { id: String },
    /// Rankings and cumulative trend for a metric
    Analytics {
        #[arg(long, short = 'm', default_value = "cases")]
        metric: Metric,
    },
    /// Edit the backend's country table
    Manage {
        #[command(subcommand)]
        action: ManageAction,
    },
    /// Predict new deaths for one record
    Predict(PredictArgs),
    /// Model quality history
    Metrics {
        /// Keep refreshing (interval: metrics_refresh_secs, default 60s)
        #[arg(long)]
        watch: bool,
    },
    /// Refresh the dashboard periodically until interrupted
    Watch,
}

#[derive(Subcommand)]
enum ManageAction {
    /// List rows
    List {
        #[arg(long, short = 's')]
        search: Option<String>,
        /// country | cases | deaths | recovered
        #[arg(long, default_value = "country")]
        sort: SortColumn,
        #[arg(long)]
        desc: bool,
    },
    /// Replace a row's values
    Update {
        id: String,
        #[arg(long)]
        country: Option<String>,
        #[arg(long)]
        cases: Option<i64>,
        #[arg(long)]
        deaths: Option<i64>,
        #[arg(long)]
        recovered: Option<i64>,
    },
    /// Delete a row on the backend
    Delete { id: String },
}

#[derive(clap::Args)]
struct PredictArgs {
    /// WHO region
    #[arg(long)]
    region: String,
    #[arg(long)]
    country: String,
    /// YYYY-MM-DD
    #[arg(long)]
    date: String,
    #[arg(long)]
    confirmed: i64,
    #[arg(long)]
    deaths: i64,
    #[arg(long)]
    recovered: i64,
    #[arg(long)]
    active: i64,
    #[arg(long)]
    new_cases: i64,
    #[arg(long)]
    new_recovered: i64,
}

/// Shared runtime for one command
struct AppContext {
    config: ClientConfig,
    session: Arc<SessionStore>,
    routes: Arc<RouteTracker>,
    api: Arc<ApiClient>,
    format: OutputFormat,
    no_color: bool,
}

impl AppContext {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config =
            ClientConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
        if let Some(root) = &cli.api_root {
            config.api_root = root.clone();
        }
        if let Some(dir) = &cli.state_dir {
            config.state_dir = dir.clone();
        }
        config.validate()?;

        let storage = FileStorage::open(&config.state_dir)
            .with_context(|| format!("Failed to open state dir {}", config.state_dir.display()))?;
        let session = Arc::new(SessionStore::new(Arc::new(storage)));
        session.hydrate();

        let routes = Arc::new(RouteTracker::new("/"));
        let api = Arc::new(ApiClient::new(
            &config,
            Arc::clone(&session),
            Arc::clone(&routes) as Arc<dyn Navigator>,
        )?);

        Ok(Self {
            config,
            session,
            routes,
            api,
            format: OutputFormat::parse(cli.format.as_deref()),
            no_color: cli.no_color,
        })
    }

    fn json(&self) -> bool {
        self.format.is_json()
    }

    /// Pass the route guard, then record the navigation
    fn enter(&self, route: RouteKey) -> Result<()> {
        cli::gate(&self.session.snapshot(), route)?;
        self.routes.navigate(route.path());
        Ok(())
    }

    /// Map an API failure, naming an expired session explicitly
    fn api_error(&self, err: ApiError) -> anyhow::Error {
        if err.is_auth() && !self.session.is_authenticated() {
            CliError::SessionExpired { status: err.status }.into()
        } else {
            anyhow::Error::new(err)
        }
    }

    /// Spinner on stderr while `future` runs; hidden for JSON output and non-terminals
    async fn with_spinner<T>(&self, message: &str, future: impl Future<Output = T>) -> T {
        let spinner = if self.json() {
            ProgressBar::hidden()
        } else {
            new_spinner()
        };
        spinner.set_message(message.to_string());
        let value = future.await;
        spinner.finish_and_clear();
        value
    }
}

fn new_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

fn init_tracing(no_color: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("epiboard=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.no_color);

    let ctx = AppContext::new(&cli)?;

    match cli.command {
        Command::Web {
            port,
            backend,
            open,
        } => run_web(ctx, port, backend, open).await?,
        Command::Login {
            username,
            password,
            country,
        } => run_login(&ctx, &username, &password, country).await?,
        Command::Logout => run_logout(&ctx).await?,
        Command::Whoami => {
            println!("{}", cli::format_whoami(&ctx.session.snapshot(), ctx.json()));
        }
        Command::SwitchCountry { country } => run_switch_country(&ctx, country)?,
        Command::Language { language } => run_language(&ctx, language)?,
        Command::Stats => run_stats(&ctx).await?,
        Command::Countries { search } => run_countries(&ctx, search).await?,
        Command::Country { id } => run_country(&ctx, &id).await?,
        Command::Analytics { metric } => run_analytics(&ctx, metric).await?,
        Command::Manage { action } => run_manage(&ctx, action).await?,
        Command::Predict(args) => run_predict(&ctx, args).await?,
        Command::Metrics { watch } => run_metrics(&ctx, watch).await?,
        Command::Watch => run_watch(ctx).await?,
    }

    Ok(())
}

async fn run_web(ctx: AppContext, port: u16, backend: Option<String>, open: bool) -> Result<()> {
    let mut config = ctx.config;
    if let Some(backend) = backend {
        config.api_root = backend;
    }

    let url = format!("http://localhost:{}", port);
    println!("Dashboard:  {}", url);
    println!("API proxy:  {}/api/v1 -> {}", url, config.api_base());

    if open {
        if let Err(e) = open::that(&url) {
            tracing::warn!(error = %e, "Could not open browser");
        }
    }

    epiboard_web::run(&config, port).await
}

async fn run_login(
    ctx: &AppContext,
    username: &str,
    password: &str,
    country: Option<CountryCode>,
) -> Result<()> {
    if let Some(country) = country {
        ctx.session.switch_country(country)?;
    }

    let user = ctx
        .with_spinner("Logging in...", ctx.session.login(&ctx.api, username, password))
        .await?;

    let home = epiboard_types::home_route(user.country);
    ctx.routes.navigate(home.path());
    println!(
        "Logged in as {} ({}). Start with 'epiboard {}'.",
        user.username,
        user.country.display_name(),
        cli::command_for(home)
    );
    Ok(())
}

async fn run_logout(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("Not logged in.");
        return Ok(());
    }

    // Server-side revocation is best effort; the local session is dropped regardless
    if let Err(e) = ctx.api.logout_remote().await {
        tracing::debug!(error = %e, "Remote logout failed");
    }
    ctx.session.logout()?;
    println!("Logged out.");
    Ok(())
}

fn run_switch_country(ctx: &AppContext, country: CountryCode) -> Result<()> {
    ctx.session.switch_country(country)?;
    let pages: Vec<&str> = epiboard_types::allowed_routes(country)
        .iter()
        .map(|r| r.as_str())
        .collect();
    println!(
        "Country set to {}. Available pages: {}",
        country.display_name(),
        pages.join(", ")
    );
    Ok(())
}

fn run_language(ctx: &AppContext, language: Option<Language>) -> Result<()> {
    let country = ctx.session.selected_country();
    let Some(language) = language else {
        println!("{}", ctx.session.language());
        return Ok(());
    };

    if !Language::options_for(country).contains(&language) {
        let options: Vec<&str> = Language::options_for(country)
            .iter()
            .map(|l| l.as_str())
            .collect();
        return Err(CliError::InvalidInput(format!(
            "Language '{}' is not offered for {} (choose from {})",
            language,
            country.display_name(),
            options.join(", ")
        ))
        .into());
    }
    ctx.session.set_language(language)?;
    println!("Language set to {}.", language.native_name());
    Ok(())
}

async fn run_stats(ctx: &AppContext) -> Result<()> {
    ctx.enter(RouteKey::Dashboard)?;
    let page = ctx
        .with_spinner("Loading dashboard...", loaders::load_dashboard(&ctx.api))
        .await
        .map_err(|e| ctx.api_error(e))?;

    println!(
        "{}",
        cli::format_dashboard(&page, 5, ctx.json(), ctx.no_color)
    );
    Ok(())
}

async fn run_countries(ctx: &AppContext, search: Option<String>) -> Result<()> {
    ctx.enter(RouteKey::Countries)?;
    let countries = ctx
        .with_spinner("Loading countries...", loaders::load_countries(&ctx.api))
        .await
        .map_err(|e| ctx.api_error(e))?;

    let term = search.unwrap_or_default();
    let matches: Vec<_> = epiboard_types::search_countries(&countries, &term)
        .into_iter()
        .cloned()
        .collect();
    println!(
        "{}",
        cli::format_countries(&matches, ctx.json(), ctx.no_color)
    );
    Ok(())
}

async fn run_country(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.enter(RouteKey::CountryDetail)?;
    let detail = ctx
        .with_spinner(
            "Loading country...",
            loaders::load_country_detail(&ctx.api, id),
        )
        .await
        .map_err(|e| ctx.api_error(e))?;

    let Some(detail) = detail else {
        return Err(CliError::NotFound {
            what: "Country",
            id: id.to_string(),
        }
        .into());
    };
    println!("{}", cli::format_country_detail(&detail, ctx.json()));
    Ok(())
}

async fn run_analytics(ctx: &AppContext, metric: Metric) -> Result<()> {
    ctx.enter(RouteKey::Analytics)?;
    let page = ctx
        .with_spinner(
            "Loading analytics...",
            loaders::load_analytics(
                &ctx.api,
                metric,
                ctx.config.top_limit,
                ctx.config.trend_days,
            ),
        )
        .await
        .map_err(|e| ctx.api_error(e))?;

    println!(
        "{}",
        cli::format_analytics(&page, ctx.json(), ctx.no_color)
    );
    Ok(())
}

async fn run_manage(ctx: &AppContext, action: ManageAction) -> Result<()> {
    ctx.enter(RouteKey::DataManagement)?;
    let mut manager = ctx
        .with_spinner("Loading rows...", DataManager::load(&ctx.api))
        .await
        .map_err(|e| ctx.api_error(e))?;

    match action {
        ManageAction::List { search, sort, desc } => {
            let table = manager.table_mut();
            table.sort = SortConfig {
                column: sort,
                direction: if desc {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                },
            };
            table.set_search(search.unwrap_or_default());
            println!(
                "{}",
                cli::format_manage_rows(
                    &table.visible_rows(),
                    table.sort,
                    ctx.json(),
                    ctx.no_color
                )
            );
        }
        ManageAction::Update {
            id,
            country,
            cases,
            deaths,
            recovered,
        } => {
            let table = manager.table_mut();
            if !table.begin_edit(&id) {
                return Err(CliError::NotFound { what: "Row", id }.into());
            }
            if let Some(country) = country {
                table.update_draft(DraftField::Country, &country);
            }
            let numeric = [
                (DraftField::TotalCases, cases),
                (DraftField::TotalDeaths, deaths),
                (DraftField::TotalRecovered, recovered),
            ];
            for (field, value) in numeric {
                if let Some(value) = value {
                    table.update_draft(field, &value.to_string());
                }
            }

            let saved = ctx
                .with_spinner("Saving...", manager.save(&ctx.api))
                .await
                .map_err(|e| ctx.api_error(e))?;
            println!(
                "{}",
                cli::format_manage_rows(
                    std::slice::from_ref(&saved),
                    manager.table().sort,
                    ctx.json(),
                    ctx.no_color
                )
            );
        }
        ManageAction::Delete { id } => {
            if !manager.table().rows().iter().any(|r| r.id == id) {
                return Err(CliError::NotFound { what: "Row", id }.into());
            }
            ctx.with_spinner("Deleting...", manager.delete(&ctx.api, &id))
                .await
                .map_err(|e| ctx.api_error(e))?;
            println!("Deleted {}.", id);
        }
    }
    Ok(())
}

async fn run_predict(ctx: &AppContext, args: PredictArgs) -> Result<()> {
    ctx.enter(RouteKey::Prediction)?;
    let mut form = PredictionForm::new();
    ctx.with_spinner(
        "Loading regions...",
        prediction::load_metadata(&ctx.api, &mut form),
    )
    .await;
    if let Some(message) = form.metadata_error() {
        bail!("Could not load regions and countries: {}", message);
    }

    if !form.regions().iter().any(|r| *r == args.region) {
        return Err(CliError::InvalidInput(format!(
            "Unknown region '{}' (choose from {})",
            args.region,
            form.regions().join(", ")
        ))
        .into());
    }
    form.select_region(&args.region);

    if !form.available_countries().iter().any(|c| *c == args.country) {
        return Err(CliError::InvalidInput(format!(
            "'{}' is not in {} (choose from {})",
            args.country,
            args.region,
            form.available_countries().join(", ")
        ))
        .into());
    }
    form.select_country(&args.country);

    let values = [
        (FormField::Confirmed, args.confirmed.to_string()),
        (FormField::Deaths, args.deaths.to_string()),
        (FormField::Recovered, args.recovered.to_string()),
        (FormField::Active, args.active.to_string()),
        (FormField::NewCases, args.new_cases.to_string()),
        (FormField::NewRecovered, args.new_recovered.to_string()),
        (FormField::Date, args.date.clone()),
    ];
    for (field, value) in &values {
        form.set_field(*field, value);
    }
    if !form.date_is_valid() {
        return Err(CliError::InvalidInput(format!(
            "Invalid date '{}' (expected YYYY-MM-DD)",
            args.date
        ))
        .into());
    }

    let submitted = ctx
        .with_spinner("Predicting...", prediction::submit(&ctx.api, &mut form))
        .await;
    if !submitted {
        bail!("Prediction form is incomplete");
    }

    if let Some(message) = form.error() {
        if !ctx.session.is_authenticated() {
            return Err(CliError::SessionExpired { status: None }.into());
        }
        bail!("Prediction failed: {}", message);
    }
    match form.results() {
        Some(view) => println!("{}", cli::format_prediction(view, ctx.json())),
        None => bail!("Prediction returned no result"),
    }
    Ok(())
}

/// Not gated: the metrics panel is shared by every page
async fn run_metrics(ctx: &AppContext, watch: bool) -> Result<()> {
    if !watch {
        let metrics = ctx
            .with_spinner("Loading model metrics...", loaders::load_model_metrics(&ctx.api))
            .await
            .map_err(|e| ctx.api_error(e))?;

        println!(
            "{}",
            cli::format_metrics(&metrics, ctx.json(), ctx.no_color)
        );
        return Ok(());
    }

    let api = Arc::clone(&ctx.api);
    let json = ctx.json();
    let no_color = ctx.no_color;
    let period = ctx.config.metrics_refresh;

    let poller = Poller::start(period, move || {
        let api = Arc::clone(&api);
        async move {
            match loaders::load_model_metrics(&api).await {
                Ok(metrics) => {
                    clear_screen(json);
                    println!("{}", cli::format_metrics(&metrics, json, no_color));
                    if !json {
                        println!("\n{}", cli::refresh_footer(chrono::Utc::now(), period));
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Model metrics refresh failed"),
            }
        }
    });

    let result = tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C");
    poller.stop();
    result
}

/// Clear screen, cursor home; JSON output stays an append-only stream
fn clear_screen(json: bool) {
    if !json {
        print!("\x1b[2J\x1b[H");
    }
}

async fn run_watch(ctx: AppContext) -> Result<()> {
    ctx.enter(RouteKey::Dashboard)?;

    let mut events = ctx.session.subscribe();
    let api = Arc::clone(&ctx.api);
    let json = ctx.json();
    let no_color = ctx.no_color;
    let period = ctx.config.dashboard_refresh;

    let poller = Poller::start(period, move || {
        let api = Arc::clone(&api);
        async move {
            match loaders::load_dashboard(&api).await {
                Ok(page) => {
                    clear_screen(json);
                    println!("{}", cli::format_dashboard(&page, 5, json, no_color));
                    if !json {
                        println!("\n{}", cli::refresh_footer(page.fetched_at, period));
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Dashboard refresh failed"),
            }
        }
    });

    let result = loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                break signal.context("Failed to listen for Ctrl+C");
            }
            event = events.recv() => {
                match event {
                    Ok(SessionEvent::Expired { status }) => {
                        break Err(CliError::SessionExpired { status: Some(status) }.into());
                    }
                    Ok(SessionEvent::LoggedOut) => break Err(CliError::NotLoggedIn.into()),
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break Ok(()),
                }
            }
        }
    };

    poller.stop();
    result
}
