use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Environment variable holding `EnvFilter` directives, e.g. `debug` or
/// `player_spawn=trace`.
pub const LOG_LEVEL_ENV: &str = "PLAYERSPAWN_LOG";

/// Application infrastructure context: paths, version and the logging guard.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// Must stay alive for the lifetime of the application so buffered log
    /// lines are flushed to the file.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application identity.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
}

/// Builder performing the common start-up work: data folder + logging.
pub struct AppBuilder<A: Application> {
    base_path: Option<PathBuf>,
    version: &'static str,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Self {
        Self {
            base_path: None,
            version,
            _marker: PhantomData,
        }
    }

    /// Use an explicit base directory instead of the detected one.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Create the data folder and install the global tracing subscriber
    /// (file + console).
    pub fn build(self) -> Result<AppContext, BoxError> {
        let path_context = match self.base_path {
            Some(base) => PathContext::with_base_path(base, A::APP_ID),
            None => PathContext::new(A::APP_ID),
        };
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let filter = log_filter(std::env::var(LOG_LEVEL_ENV).ok().as_deref());

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking);

        let console_layer = fmt::Layer::default().with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        tracing::info!(
            "{} {} using data folder {}",
            A::APP_ID,
            self.version,
            path_context.data_dir().display()
        );

        Ok(AppContext {
            path_context,
            version: self.version,
            _log_guard: guard,
        })
    }
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Invalid directives are skipped; without any the build's default level
/// applies.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level().into())
        .parse_lossy(directives.unwrap_or_default())
}
