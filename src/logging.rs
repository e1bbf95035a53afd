use tracing_subscriber::{
    filter::{Directive, LevelFilter},
    EnvFilter,
};

fn parse_log_level(value: &str) -> LevelFilter {
    match value.trim().to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

/// Builds the filter: `RUST_LOG` when set, otherwise `level` with the HTTP
/// stack capped at `warn`.
pub fn build_filter(level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = parse_log_level(level);
    let http_cap = LevelFilter::WARN.min(level);
    ["hyper", "hyper_util", "reqwest"]
        .into_iter()
        .fold(EnvFilter::default().add_directive(level.into()), |filter, target| {
            filter.add_directive(target_directive(target, http_cap))
        })
}

fn target_directive(target: &str, level: LevelFilter) -> Directive {
    format!("{target}={level}")
        .parse()
        .unwrap_or_else(|_| level.into())
}

/// Installs the global subscriber. Logs go to stderr so stdout stays free
/// for command output.
pub fn init_logging(level: &str) {
    let result = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(err) = result {
        eprintln!("Logging already initialised: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_directives_render_level_names() {
        assert_eq!(
            target_directive("reqwest", LevelFilter::WARN).to_string(),
            "reqwest=warn"
        );
    }

    #[test]
    fn unknown_levels_fall_back_to_info() {
        assert_eq!(parse_log_level("verbose"), LevelFilter::INFO);
        assert_eq!(parse_log_level(" WARNING "), LevelFilter::WARN);
        assert_eq!(parse_log_level("off"), LevelFilter::OFF);
    }
}
