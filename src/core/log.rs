use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber. The server logs at `info` unless `verbose`
/// is set; a `RUST_LOG` directive replaces both.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = app_targets(verbose, env_filter.is_some());
    let level = if verbose { "debug" } else { "info" };
    let env_filter = env_filter.unwrap_or_else(|| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(app_filter)
        .with(env_filter)
        .init();
}

/// Per-target levels, left out when `RUST_LOG` is in charge.
fn app_targets(verbose: bool, env_configured: bool) -> Option<Targets> {
    if env_configured {
        return None;
    }
    let level_filter = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    Some(
        Targets::new()
            .with_target("ratechat", level_filter)
            .with_default(LevelFilter::WARN),
    )
}
