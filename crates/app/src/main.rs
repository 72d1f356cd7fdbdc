use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use url::Url;

use gateway::{FileSessionStore, HttpGateway};
use quiz_core::Clock;
use quiz_core::model::OpenCountPolicy;
use services::{AttemptService, AuthoringService, ResultsService};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidServerUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidServerUrl { raw } => write!(f, "invalid --server value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    attempts: Arc<AttemptService>,
    authoring: Arc<AuthoringService>,
    results: Arc<ResultsService>,
}

impl UiApp for DesktopApp {
    fn attempts(&self) -> Arc<AttemptService> {
        Arc::clone(&self.attempts)
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }

    fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }
}

struct Args {
    server: Url,
    csrf_token: String,
    session_file: PathBuf,
    count_open_as_unanswered: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--server <base_url>] [--csrf-token <token>]");
    eprintln!("                      [--session-file <path>] [--ignore-open-unanswered]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --server http://127.0.0.1:8000/");
    eprintln!("  --session-file <temp dir>/studentTestSession.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZDESK_SERVER_URL, QUIZDESK_CSRF_TOKEN, QUIZDESK_SESSION_FILE");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut server = std::env::var("QUIZDESK_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/".to_string());
        let mut csrf_token = std::env::var("QUIZDESK_CSRF_TOKEN").unwrap_or_default();
        let mut session_file = std::env::var("QUIZDESK_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                std::env::temp_dir().join(format!("{}.json", gateway::SESSION_KEY))
            });
        let mut count_open_as_unanswered = true;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--server" => {
                    server = require_value(args, "--server")?;
                }
                "--csrf-token" => {
                    csrf_token = require_value(args, "--csrf-token")?;
                }
                "--session-file" => {
                    session_file = PathBuf::from(require_value(args, "--session-file")?);
                }
                "--ignore-open-unanswered" => {
                    count_open_as_unanswered = false;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        // The gateway joins relative endpoint paths, so the base must end
        // with a slash.
        if !server.ends_with('/') {
            server.push('/');
        }
        let server = Url::parse(&server).map_err(|_| ArgsError::InvalidServerUrl { raw: server })?;

        Ok(Self {
            server,
            csrf_token,
            session_file,
            count_open_as_unanswered,
        })
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "quizdesk=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|err| {
        eprintln!("{err}");
        print_usage();
        err
    })?;

    tracing::info!(server = %args.server, "starting quizdesk");

    let clock = Clock::default_clock();
    let http = Arc::new(HttpGateway::new(args.server, args.csrf_token));
    let sessions = Arc::new(FileSessionStore::new(args.session_file));
    let policy = if args.count_open_as_unanswered {
        OpenCountPolicy::IncludeOpen
    } else {
        OpenCountPolicy::ExcludeOpen
    };

    let attempts = Arc::new(
        AttemptService::new(clock, Arc::clone(&http) as _, sessions).with_policy(policy),
    );
    let authoring = Arc::new(AuthoringService::new(Arc::clone(&http) as _));
    let results = Arc::new(ResultsService::new(Arc::clone(&http) as _));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        attempts,
        authoring,
        results,
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quizdesk")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
