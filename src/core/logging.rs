use std::str::FromStr;

use console::style;
use log::{Level, LevelFilter};

use crate::types::config::{colors_enabled, config};

fn paint(level: Level, text: String) -> String {
    let styled = match level {
        Level::Error => style(text).red().bold(),
        Level::Warn => style(text).yellow(),
        Level::Info => style(text),
        Level::Debug => style(text).dim(),
        Level::Trace => style(text).dim().italic(),
    };
    styled.force_styling(true).to_string()
}

/// Install the global logger using the configured level and color mode.
/// Info-level lines are printed bare so command output stays readable;
/// other levels carry a timestamp and level tag.
pub fn init_logging() {
    let level =
        LevelFilter::from_str(config().log().level()).unwrap_or(LevelFilter::Info);
    let colored = colors_enabled();

    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let line = if record.level() == Level::Info {
                message.to_string()
            } else {
                format!(
                    "{} {:<5} {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    message
                )
            };
            if colored {
                out.finish(format_args!("{}", paint(record.level(), line)))
            } else {
                out.finish(format_args!("{line}"))
            }
        })
        .level(level)
        .chain(std::io::stderr())
        .apply();

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
