use log::LevelFilter;

use crate::types::config::{colors_enabled, config};

fn level_filter(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Initialize the global logger from the effective configuration. Must run
/// after config so level/color are applied.
pub fn init_logging() {
    let level = level_filter(config().log().level());
    let use_colors = colors_enabled();

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let level_label = if use_colors {
                let styled = match record.level() {
                    log::Level::Error => console::style(record.level()).red(),
                    log::Level::Warn => console::style(record.level()).yellow(),
                    log::Level::Info => console::style(record.level()).green(),
                    _ => console::style(record.level()).dim(),
                };
                styled.to_string()
            } else {
                record.level().to_string()
            };
            out.finish(format_args!("[{level_label}] {message}"))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();

    // Double initialization (e.g. in tests) is harmless
    let _ = result;
}
