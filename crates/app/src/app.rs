use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Holds path management, version info and the logging guard.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    pub log_level: LevelFilter,
    /// Must stay alive for the duration of the program so buffered log lines
    /// are flushed to the file.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application identity. Pure constants, no logic.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "campus";
    const PROJECT_ID: &'static str = "examiner";
}

/// Path context for `A` without touching logging, so configuration can be
/// read before the subscriber is installed.
pub fn path_context<A: Application>() -> PathContext {
    #[cfg(debug_assertions)]
    {
        PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::STUDIO,
            A::PROJECT_ID,
            A::APP_ID,
        )
    }
    #[cfg(not(debug_assertions))]
    {
        PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID)
    }
}

/// Default level: `INFO` in debug builds, `WARN` in release.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Builder for the application context.
///
/// ```ignore
/// let ctx = AppBuilder::<Examiner>::new(env!("CARGO_PKG_VERSION"))
///     .log_level(Some("debug"))
///     .build()?;
/// ```
pub struct AppBuilder<A: Application> {
    version: &'static str,
    path_context: PathContext,
    level: LevelFilter,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    pub fn new(version: &'static str) -> Self {
        Self {
            version,
            path_context: path_context::<A>(),
            level: default_level(),
            _marker: PhantomData,
        }
    }

    pub fn with_base_path(mut self, base: PathBuf) -> Self {
        self.path_context = PathContext::with_base_path(base, A::STUDIO, A::PROJECT_ID, A::APP_ID);
        self
    }

    /// Override the build-dependent default level. Unparseable names keep
    /// the default.
    pub fn log_level(mut self, level: Option<&str>) -> Self {
        if let Some(parsed) = level.and_then(|l| l.parse::<LevelFilter>().ok()) {
            self.level = parsed;
        }
        self
    }

    /// Create the directories and install the global subscriber:
    /// a non-blocking file layer plus a console layer on stderr.
    pub fn build(self) -> Result<AppContext, BoxError> {
        let path_context = self.path_context;
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path should have a parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path should have a file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let level = self.level;

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        // stdout carries command output
        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .try_init()?;

        tracing::debug!(app = A::APP_ID, version = self.version, %level, "logging initialised");

        Ok(AppContext {
            path_context,
            version: self.version,
            log_level: level,
            _log_guard: guard,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestApp;

    impl Application for TestApp {
        const APP_ID: &'static str = "test_app";
    }

    #[test]
    fn log_level_override_parses_names() {
        let builder = AppBuilder::<TestApp>::new("0.0.0").log_level(Some("debug"));
        assert_eq!(builder.level, LevelFilter::DEBUG);

        let builder = AppBuilder::<TestApp>::new("0.0.0").log_level(Some("chatty"));
        assert_eq!(builder.level, default_level());
    }

    #[test]
    fn base_path_override_keeps_identity() {
        let builder =
            AppBuilder::<TestApp>::new("0.0.0").with_base_path(PathBuf::from("/tmp/test_app"));
        assert_eq!(
            builder.path_context.project_root(),
            PathBuf::from("/tmp/test_app/campus/examiner")
        );
        assert_eq!(builder.path_context.app_id(), "test_app");
    }
}
