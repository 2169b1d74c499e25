use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "trigon_engine=debug,wgpu_core=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "TRIGON_LOG";

/// Modules capped at `warn` unless the filter mentions them.
const NOISY_MODULES: [&str; 3] = ["wgpu_core", "wgpu_hal", "naga"];

static INIT: Once = Once::new();

/// Picks the filter string: explicit config, then `TRIGON_LOG`, then
/// `RUST_LOG`, skipping blank values. `None` means the built-in default.
fn resolve_filter(
    config: Option<String>,
    trigon_log: Option<String>,
    rust_log: Option<String>,
) -> Option<String> {
    let nonblank = |f: &String| !f.trim().is_empty();
    config
        .filter(nonblank)
        .or_else(|| trigon_log.filter(nonblank))
        .or_else(|| rust_log.filter(nonblank))
}

/// Modules from [`NOISY_MODULES`] the filter doesn't already configure.
fn capped_modules(filter: Option<&str>) -> Vec<&'static str> {
    NOISY_MODULES
        .into_iter()
        .filter(|module| filter.is_none_or(|f| !f.contains(module)))
        .collect()
}

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        let filter = resolve_filter(
            config.env_filter,
            std::env::var(LOG_ENV).ok(),
            std::env::var("RUST_LOG").ok(),
        );

        builder.filter_level(log::LevelFilter::Info);
        for module in capped_modules(filter.as_deref()) {
            builder.filter_module(module, log::LevelFilter::Warn);
        }
        if let Some(filter) = &filter {
            builder.parse_filters(filter);
        }

        builder.write_style(config.write_style);

        if builder.try_init().is_err() {
            log::warn!("a logger was already installed; keeping it");
            return;
        }

        log::debug!("logging initialized");
    });
}
