// SchoolHub terminal client entry point.
//
// Usage:
//   schoolhub <test-id>                          take or review a test
//   schoolhub login <role> <email> <password>    store a bearer token
//   schoolhub export-activity <file.csv>         admin activity report
//
// Test-session startup:
// 1. Load config (copying defaults on first run), initialize file tracing
// 2. Open the local database and seed tokens from credentials.toml
// 3. Fetch the test detail over REST and build the session
// 4. Create mpsc channels, spawn the socket client and the app loop
// 5. Run the TUI until the user quits or the submission is acknowledged

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::sync::mpsc;
use tracing::{error, info};

use schoolhub_api::ApiClient;
use schoolhub_app::app::{self, AppState};
use schoolhub_app::session::TestSession;
use schoolhub_core::config::{self, Config};
use schoolhub_core::db::Database;
use schoolhub_core::models::{ActivityFilter, Role};
use schoolhub_core::ws_client;
use schoolhub_tui::tui::{self, SessionEnd};

const USAGE: &str = "usage: schoolhub <test-id>\n       schoolhub login <admin|teacher|student> <email> <password>\n       schoolhub export-activity <file.csv>";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = config::load_config().context("failed to load configuration")?;
    init_tracing(&config.logging.filter)?;
    info!("SchoolHub client starting up");

    let db = Arc::new(
        Database::open(&config.storage.db_path).context("failed to open database")?,
    );
    info!("Database opened at {}", config.storage.db_path);
    seed_tokens(&config, &db)?;

    let api = ApiClient::connect(&config.server.base_url, db.clone());

    match args.as_slice() {
        [cmd, role, email, password] if cmd == "login" => {
            let role = parse_role(role)?;
            api.personal(role).login(email, password).await?;
            println!("Logged in as {role}.");
            Ok(())
        }
        [cmd, file] if cmd == "export-activity" => export_activity(&api, Path::new(file)).await,
        [test_id] if !test_id.starts_with('-') => run_session(config, db, api, test_id).await,
        _ => bail!("{USAGE}"),
    }
}

async fn run_session(
    config: Config,
    db: Arc<Database>,
    api: ApiClient,
    test_id: &str,
) -> anyhow::Result<()> {
    let detail = api
        .students()
        .test_detail(test_id)
        .await
        .with_context(|| format!("failed to load test {test_id}"))?;
    let title = detail.test.title.clone();
    let session = TestSession::from_detail(detail);

    let (ws_tx, ws_rx) = mpsc::channel(64);
    let (out_tx, out_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let mut state = AppState::new(api, session, out_tx);
    if config.session.draft_autosave {
        state = state.with_drafts(db);
    }

    let ws_url = config.server.ws_url.clone();
    let ws_handle = tokio::spawn(async move {
        if let Err(e) = ws_client::run(&ws_url, ws_tx, out_rx).await {
            error!("WebSocket client error: {e}");
        }
    });

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(ws_rx, cmd_rx, ui_tx, state).await {
            error!("Application loop error: {e}");
        }
    });

    info!("Session ready for test {test_id}");
    let end = match tui::run(ui_rx, cmd_tx).await {
        Ok(end) => end,
        Err(e) => {
            error!("TUI error: {e}");
            SessionEnd::Quit
        }
    };

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;
    ws_handle.abort();

    if end == SessionEnd::Submitted {
        println!("Answers for \"{title}\" submitted.");
    }
    info!("SchoolHub client shut down cleanly");
    Ok(())
}

async fn export_activity(api: &ApiClient, out: &Path) -> anyhow::Result<()> {
    let rows = api.reports().activity(&ActivityFilter::default()).await?;
    let file = std::fs::File::create(out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    schoolhub_api::report::write_activity_csv(file, &rows)?;
    println!("Wrote {} activity row(s) to {}.", rows.len(), out.display());
    Ok(())
}

/// Copy non-empty tokens from `credentials.toml` into the token store.
fn seed_tokens(config: &Config, db: &Database) -> anyhow::Result<()> {
    for role in Role::ALL {
        if let Some(token) = config.credentials.token_for(role) {
            db.save_token(role, token)
                .with_context(|| format!("failed to store {role} token"))?;
            info!("Seeded {role} token from credentials");
        }
    }
    Ok(())
}

fn parse_role(raw: &str) -> anyhow::Result<Role> {
    Role::ALL
        .into_iter()
        .find(|r| r.path_segment() == raw)
        .with_context(|| format!("unknown role {raw:?}\n{USAGE}"))
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing(default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("schoolhub.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
