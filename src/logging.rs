use log::LevelFilter;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::env;

/// Render a value for a `key=value` log record: whitespace runs become `_`,
/// non-printables are dropped, empty becomes `na`.
pub fn field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn level_from_inputs(verbosity: u8, env_level: Option<&str>) -> LevelFilter {
    match verbosity {
        0 => env_level.and_then(parse_level).unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the stderr logger. `-v` flags beat `TBOOTSTRAP_LOG`.
pub fn init(verbosity: u8) {
    let env_level = env::var("TBOOTSTRAP_LOG").ok();
    let level = level_from_inputs(verbosity, env_level.as_deref());
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    // A logger may already be set when commands run inside tests.
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Never);
}

#[cfg(test)]
mod tests {
    use super::{field, level_from_inputs};
    use log::LevelFilter;

    #[test]
    fn field_rewrites_whitespace() {
        assert_eq!(field("a b\tc"), "a_b_c");
        assert_eq!(field("  padded  "), "padded");
    }

    #[test]
    fn field_falls_back_for_empty() {
        assert_eq!(field("   "), "na");
        assert_eq!(field(""), "na");
    }

    #[test]
    fn verbosity_flags_override_env_level() {
        assert_eq!(level_from_inputs(0, None), LevelFilter::Warn);
        assert_eq!(level_from_inputs(0, Some("debug")), LevelFilter::Debug);
        assert_eq!(level_from_inputs(0, Some("bogus")), LevelFilter::Warn);
        assert_eq!(level_from_inputs(1, Some("error")), LevelFilter::Info);
        assert_eq!(level_from_inputs(3, None), LevelFilter::Trace);
    }
}
