//! Diagnostic logging setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs a stderr `tracing` subscriber.
///
/// The level is `warn`, or `debug` when `verbose` is set; `filter`, when
/// given, replaces both. Calling this twice keeps the first subscriber.
pub fn init(verbose: bool, filter: Option<&str>) {
    let env_filter = build_filter(verbose, filter);
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_filter(verbose: bool, filter: Option<&str>) -> EnvFilter {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    match filter {
        Some(directives) => EnvFilter::builder()
            .with_default_directive(default_level.into())
            .parse_lossy(directives),
        None => EnvFilter::default().add_directive(default_level.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_level_to_debug() {
        assert!(build_filter(true, None).to_string().contains("debug"));
        assert!(build_filter(false, None).to_string().contains("warn"));
    }

    #[test]
    fn explicit_filter_wins() {
        let filter = build_filter(false, Some("repo_facts=trace"));
        assert!(filter.to_string().contains("repo_facts=trace"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(false, None);
        init(true, None);
    }
}
