use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Our crates; everything else (reqwest, hyper) stays at `warn`.
const CRATES: &[&str] = &["wikicite", "wikicite_api", "wikicite_cli"];

fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn default_directives(verbose: u8) -> String {
    let level = level_for(verbose);
    let mut directives = String::from("warn");
    for krate in CRATES {
        directives.push(',');
        directives.push_str(krate);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins over `-v` when set. Report output goes to stdout and
/// never through here.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    // Ignored: a subscriber may already be installed (tests).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S,%3f".to_owned()))
        .with_target(verbose >= 2)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives(0),
            "warn,wikicite=warn,wikicite_api=warn,wikicite_cli=warn"
        );
        assert_eq!(
            default_directives(3),
            "warn,wikicite=debug,wikicite_api=debug,wikicite_cli=debug"
        );
    }
}
