//! Masjid site CLI
//!
//! Local entry point for inspecting the public data and running admin edits
//! against the configured data service.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use masjid_site::{
    api::{ApiClient, HttpTransport},
    cache::ResultCache,
    error::{AppError, Result},
    models::{
        AgendaFields, AllSiteData, ArticleFields, Config, CountdownEvent, DonationConfig, FooterData,
        GalleryFields, HeroData, MemberFields,
    },
    services::{AdminStore, AuthService, SiteDataProvider, Toaster},
    storage::{FileSessionStorage, SessionStorage},
    utils::time::time_ago,
};
use serde::de::DeserializeOwned;

/// Masjid site data client
#[derive(Parser, Debug)]
#[command(name = "masjid-site", version, about = "Mosque website data client")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "masjid-site.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the landing page data and print a summary
    Site,

    /// Show a single article
    Article { id: String },

    /// Log in as admin and store the session
    Login {
        username: String,

        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show whether an admin session is stored
    Status,

    /// Show the admin dashboard summary
    Dashboard,

    /// Show recent admin activity
    Activity {
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Replace a singleton section from a JSON file
    Save { section: Section, file: PathBuf },

    /// Create a record from a JSON file
    Add { collection: Collection, file: PathBuf },

    /// Delete a record by id
    Delete { collection: Collection, id: String },

    /// Validate the configuration
    Validate,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Section {
    Hero,
    Countdown,
    Donation,
    Footer,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Collection {
    Agenda,
    Article,
    Gallery,
    Board,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Everything a command may need, wired once.
struct App {
    config: Config,
    api: ApiClient,
    session: Arc<dyn SessionStorage>,
    cache: Arc<ResultCache<Arc<AllSiteData>>>,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let session: Arc<dyn SessionStorage> =
            Arc::new(FileSessionStorage::new(config.session.path.clone()));
        let transport = HttpTransport::new(&config.api, Arc::clone(&session))?;
        let cache = Arc::new(ResultCache::new(config.cache.ttl()));

        Ok(Self {
            api: ApiClient::new(Arc::new(transport)),
            session,
            cache,
            config,
        })
    }

    fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), Arc::clone(&self.session))
    }

    fn admin(&self) -> AdminStore {
        AdminStore::new(
            self.api.clone(),
            Arc::clone(&self.cache),
            Toaster::new(self.config.toast.dismiss_after()),
            self.config.admin.activity_log_limit,
        )
    }

    /// Admin commands require a stored session.
    async fn require_login(&self) -> Result<()> {
        if self.auth().is_logged_in().await? {
            Ok(())
        } else {
            Err(AppError::session("Not logged in. Run 'login' first."))
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Print the toast left by an admin write and turn a failed write into an error.
fn report(store: &AdminStore, ok: bool) -> Result<()> {
    let message = store
        .toaster()
        .current()
        .map(|t| t.message)
        .unwrap_or_default();
    if ok {
        println!("{message}");
        Ok(())
    } else {
        Err(AppError::remote("cli", message))
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config).with_env();
    log::debug!("Loaded configuration from {}", cli.config.display());

    let app = App::new(config)?;

    match cli.command {
        Command::Site => {
            let provider = SiteDataProvider::new(app.api.clone(), Arc::clone(&app.cache));
            provider.refresh().await;
            let state = provider.state();

            let Some(data) = state.data else {
                let message = state.error.unwrap_or_default();
                return Err(AppError::remote("getAll", message));
            };

            println!("{}", data.hero.title);
            println!("{}", data.hero.subtitle);
            if data.countdown.is_active() {
                if let Some(left) = data.countdown.remaining(Local::now().naive_local()) {
                    println!(
                        "{}: {} hari {} jam {} menit",
                        data.countdown.name, left.days, left.hours, left.minutes
                    );
                }
            }

            println!("\nAgenda terdekat:");
            for item in data.upcoming_agenda(Local::now().date_naive(), 6) {
                println!(
                    "  {} {} - {} ({})",
                    item.fields.date, item.fields.time, item.fields.title, item.fields.location
                );
            }

            println!(
                "\n{} artikel, {} foto, {} pengurus",
                data.articles.len(),
                data.gallery.len(),
                data.board.len()
            );
            println!(
                "Donasi: Rp {} / Rp {} ({:.0}%)",
                data.donation.donation_collected,
                data.donation.donation_target,
                data.donation.progress_percent()
            );
        }

        Command::Article { id } => match app.api.fetch_article(&id).await? {
            Some(article) => {
                println!("{}", article.fields.title);
                println!("{} | {}", article.fields.author, article.fields.date);
                println!("\n{}", article.fields.content);
            }
            None => {
                log::warn!("Article {id} not found");
            }
        },

        Command::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => {
                    let mut line = String::new();
                    std::io::stdin().read_line(&mut line)?;
                    line.trim_end().to_string()
                }
            };
            app.auth().login(&username, &password).await?;
            println!("Login berhasil");
        }

        Command::Logout => {
            app.auth().logout().await?;
            println!("Logout berhasil");
        }

        Command::Status => {
            let logged_in = app.auth().is_logged_in().await?;
            println!(
                "{} ({})",
                if logged_in { "Logged in" } else { "Logged out" },
                app.config.session.path.display()
            );
        }

        Command::Dashboard => {
            app.require_login().await?;
            let dashboard = app.admin().load_dashboard().await?;
            println!(
                "Agenda: {}  Artikel: {}  Galeri: {}  Pengurus: {}",
                dashboard.agenda_count,
                dashboard.article_count,
                dashboard.gallery_count,
                dashboard.board_count
            );
            println!("Countdown: {} ({})", dashboard.countdown.name, dashboard.countdown.date);
            println!(
                "Donasi: {:.0}% terkumpul",
                dashboard.donation.progress_percent()
            );
            let now = Utc::now();
            for entry in dashboard.recent_activity {
                println!("  {} - {}", time_ago(&entry.timestamp, now), entry.description);
            }
        }

        Command::Activity { limit } => {
            app.require_login().await?;
            let store = AdminStore::new(
                app.api.clone(),
                Arc::clone(&app.cache),
                Toaster::new(app.config.toast.dismiss_after()),
                limit.unwrap_or(app.config.admin.activity_log_limit),
            );
            let now = Utc::now();
            for entry in store.load_activity_log().await {
                println!(
                    "{:<14} {:<7} {:<10} {} ({})",
                    time_ago(&entry.timestamp, now),
                    entry.action,
                    entry.entity,
                    entry.description,
                    entry.user
                );
            }
        }

        Command::Save { section, file } => {
            app.require_login().await?;
            let store = app.admin();
            let ok = match section {
                Section::Hero => store.save_hero(read_json::<HeroData>(&file)?).await,
                Section::Countdown => {
                    store
                        .save_countdown(read_json::<CountdownEvent>(&file)?)
                        .await
                }
                Section::Donation => {
                    store
                        .save_donation(read_json::<DonationConfig>(&file)?)
                        .await
                }
                Section::Footer => store.save_footer(read_json::<FooterData>(&file)?).await,
            };
            report(&store, ok)?;
        }

        Command::Add { collection, file } => {
            app.require_login().await?;
            let store = app.admin();
            let id = match collection {
                Collection::Agenda => store
                    .add_agenda(read_json::<AgendaFields>(&file)?)
                    .await
                    .map(|r| r.id),
                Collection::Article => store
                    .add_article(read_json::<ArticleFields>(&file)?)
                    .await
                    .map(|r| r.id),
                Collection::Gallery => store
                    .add_gallery_item(read_json::<GalleryFields>(&file)?)
                    .await
                    .map(|r| r.id),
                Collection::Board => store
                    .add_board_member(read_json::<MemberFields>(&file)?)
                    .await
                    .map(|r| r.id),
            };
            if let Some(id) = &id {
                log::info!("Created record {id}");
            }
            report(&store, id.is_some())?;
        }

        Command::Delete { collection, id } => {
            app.require_login().await?;
            let store = app.admin();
            let ok = match collection {
                Collection::Agenda => store.delete_agenda(&id).await,
                Collection::Article => store.delete_article(&id).await,
                Collection::Gallery => store.delete_gallery_item(&id).await,
                Collection::Board => store.delete_board_member(&id).await,
            };
            report(&store, ok)?;
        }

        Command::Validate => {
            log::info!("Configuration is valid ({})", app.config.api.endpoint);
        }
    }

    Ok(())
}
