use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    AppServices, AuthService, CatalogService, CertificateService, Clock,
    EnrollmentService, LectureService, ProgressReporter, ReviewService, SessionContext,
};
use skillforge_core::certificate::DEFAULT_PLATFORM_NAME;
use skillforge_core::model::CourseId;
use storage::ApiConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidCourseId { raw: String },
    MissingCourse,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid --course value: {raw:?}"),
            ArgsError::MissingCourse => write!(f, "certificate requires --course <id>"),
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
    services: AppServices,
    download_dir: PathBuf,
}

impl UiApp for DesktopApp {
    fn session(&self) -> SessionContext {
        self.services.session()
    }

    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn lectures(&self) -> Arc<LectureService> {
        self.services.lectures()
    }

    fn enrollment(&self) -> Arc<EnrollmentService> {
        self.services.enrollment()
    }

    fn certificates(&self) -> Arc<CertificateService> {
        self.services.certificates()
    }

    fn reviews(&self) -> Arc<ReviewService> {
        self.services.reviews()
    }

    fn progress_reporter(&self) -> ProgressReporter {
        self.services.progress_reporter()
    }

    fn download_dir(&self) -> PathBuf {
        self.download_dir.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui          [--api <url>] [--token <token>] [--offline]");
    eprintln!(
        "  cargo run -p app -- certificate --course <id> [--out <dir>] [--api <url>] [--token <token>] [--offline]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {}", storage::http::DEFAULT_API_BASE_URL);
    eprintln!("  --out <your download directory>");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  SKILLFORGE_API_BASE_URL, SKILLFORGE_API_TOKEN, SKILLFORGE_PLATFORM_NAME, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Certificate,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "certificate" => Some(Self::Certificate),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    api: Option<String>,
    token: Option<String>,
    offline: bool,
    course: Option<CourseId>,
    out: Option<PathBuf>,
}

enum Parsed {
    Run(Args),
    Help,
}

impl Args {
    fn parse(
        cmd: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Parsed, ArgsError> {
        let mut parsed = Args::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => parsed.api = Some(require_value(args, "--api")?),
                "--token" => parsed.token = Some(require_value(args, "--token")?),
                "--offline" => parsed.offline = true,
                "--course" if cmd == Command::Certificate => {
                    let raw = require_value(args, "--course")?;
                    let id = CourseId::new(raw.clone())
                        .map_err(|_| ArgsError::InvalidCourseId { raw })?;
                    parsed.course = Some(id);
                }
                "--out" if cmd == Command::Certificate => {
                    parsed.out = Some(PathBuf::from(require_value(args, "--out")?));
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        if cmd == Command::Certificate && parsed.course.is_none() {
            return Err(ArgsError::MissingCourse);
        }
        Ok(Parsed::Run(parsed))
    }
}

fn platform_name() -> String {
    std::env::var("SKILLFORGE_PLATFORM_NAME")
        .ok()
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PLATFORM_NAME.to_owned())
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn build_services(args: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    let clock = Clock::system();
    let platform = platform_name();
    if args.offline {
        return Ok(AppServices::new_offline(clock, &platform)?);
    }

    let mut config = ApiConfig::from_env()?;
    if let Some(api) = &args.api {
        config = ApiConfig::new(api, config.token)?;
    }
    if let Some(token) = &args.token {
        config.token = Some(token.clone());
    }
    Ok(AppServices::new_http(&config, clock, &platform)?)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_owned())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })? {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
    };

    let services = build_services(&parsed)?;
    let download_dir = parsed.out.clone().unwrap_or_else(default_download_dir);

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                download_dir,
            });
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("SkillForge")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Certificate => {
            let course = parsed.course.ok_or(ArgsError::MissingCourse)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            let path = runtime.block_on(async {
                let loaded = services.lectures().load(&course).await?;
                let file = services
                    .certificates()
                    .issue(&course, &loaded.lectures)
                    .await?;
                Ok::<_, Box<dyn std::error::Error>>(file.save_in(&download_dir).await?)
            })?;
            info!(path = %path.display(), "certificate written");
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
