use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pinmark_core::{NewBookmark, PinboardClient, Response, SessionEngine};
use tracing_subscriber::EnvFilter;

mod config;
mod open_helpers;
mod picker;
mod serve;
#[cfg(test)]
mod testing;
mod theme;

#[derive(Parser)]
#[command(name = "pinmark", version, about = "Pinboard bookmark launcher")]
struct Cli {
    /// Pinboard API token (user:HEX); overrides settings.toml
    #[arg(long, global = true)]
    token: Option<String>,
    /// Pinboard API root; overrides settings.toml
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive picker (default)
    Pick,
    /// Read JSON events from stdin, one per line, and answer each on stdout
    Serve,
    /// Render the list for a single query (text after the keyword)
    Query {
        text: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Save a bookmark to Pinboard
    Add {
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Show the effective settings and where they are read from
    Config {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Pick));
    init_tracing(interactive);

    let mut settings = config::load_settings();
    if cli.token.is_some() {
        settings.token = cli.token.clone();
    }
    if cli.base_url.is_some() {
        settings.base_url = cli.base_url.clone();
    }

    match cli.command.unwrap_or(Commands::Pick) {
        Commands::Pick => {
            let theme = theme::TuiTheme::from_settings(settings.theme.as_ref());
            let mut engine = build_engine(&settings)?;
            picker::run_picker_default(&mut engine, theme)?;
        }
        Commands::Serve => {
            let mut engine = build_engine(&settings)?;
            let stdin = std::io::stdin();
            serve::run_serve(&mut engine, stdin.lock(), std::io::stdout().lock())?;
        }
        Commands::Query { text, json } => {
            let mut engine = build_engine(&settings)?;
            let resp = engine.handle_query(&text.join(" "));
            if json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                match resp {
                    Response::Render { items } => {
                        for it in items {
                            println!("{}\t{}", it.title, it.subtitle);
                        }
                    }
                    Response::SetQuery { query } => println!("set query: {query}"),
                }
            }
        }
        Commands::Add {
            url,
            title,
            description,
            tags,
        } => {
            let mut engine = build_engine(&settings)?;
            let bookmark = NewBookmark {
                title: title.unwrap_or_else(|| url.clone()),
                url,
                description: description.unwrap_or_default(),
                tags,
            };
            if !engine.add_bookmark(&bookmark) {
                match &engine.state().last_error {
                    Some(e) => bail!("{e}"),
                    None => bail!("a bookmark needs a url"),
                }
            }
            println!("saved {}", bookmark.url);
        }
        Commands::Config { json } => {
            let shown = settings.redacted();
            if json {
                let out = serde_json::json!({
                    "config_dir": config::config_dir(),
                    "settings_path": config::settings_path(),
                    "settings": shown,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("config_dir\t{}", config::config_dir().display());
                print!("{}", toml::to_string(&shown)?);
            }
        }
    }

    Ok(())
}

fn build_engine(settings: &config::Settings) -> Result<SessionEngine> {
    let token = settings.token.clone().unwrap_or_default();
    let client = PinboardClient::with_timeout(settings.base_url(), token, settings.timeout())
        .with_context(|| format!("invalid base url {}", settings.base_url()))?;
    Ok(SessionEngine::new(
        settings.engine_settings(),
        Box::new(client),
    ))
}

/// Logs go to stderr; the picker stays silent unless `PINMARK_LOG` asks
/// otherwise since it owns the terminal.
fn init_tracing(interactive: bool) {
    let fallback = if interactive { "off" } else { "warn" };
    let filter = EnvFilter::try_from_env("PINMARK_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
