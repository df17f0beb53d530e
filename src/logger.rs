use colored::{Color, ColoredString, Colorize};
use log::Level;

pub fn base(level: log::LevelFilter) -> fern::Dispatch {
    fern::Dispatch::new().level(level)
}

/// Keeps the decoder's own records at `level` while quietening everything else.
pub fn default(level: log::LevelFilter) -> fern::Dispatch {
    base(log::LevelFilter::Warn).level_for("symkey", level)
}

pub fn stderr(base: fern::Dispatch) -> fern::Dispatch {
    base.format(move |out, message, record| {
        let level = record.level();
        let color = match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Blue,
            Level::Debug => Color::Magenta,
            Level::Trace => Color::Green,
        };
        out.finish(format_args!(
            "{} {}",
            ColoredString::from((level.to_string().to_lowercase() + ":").as_str())
                .color(color)
                .to_string(),
            message
        ))
    })
    .chain(std::io::stderr())
}

/// Installs the stderr logger. A library cannot assume it owns the global
/// logger, so an already-installed logger is reported rather than a panic.
pub fn init(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    stderr(default(level)).apply()
}

/// Like `init`, but tolerates an already-installed logger (tests call this
/// once per test binary).
pub fn try_init(level: log::LevelFilter) {
    let _ = init(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        try_init(log::LevelFilter::Debug);
        assert!(init(log::LevelFilter::Debug).is_err());
        try_init(log::LevelFilter::Trace);
        assert!(log::log_enabled!(target: "symkey::reader", log::Level::Debug));
        assert!(!log::log_enabled!(target: "other_crate", log::Level::Info));
    }
}
