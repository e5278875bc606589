//! CLI-specific configuration.
use std::env;
use std::path::PathBuf;

/// Headless client configuration.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Content directory; embedded content is used when unset.
    pub content_dir: Option<PathBuf>,
    /// Print every battle notification, not only the summary.
    pub verbose: bool,
    /// Print notifications as JSON lines instead of text.
    pub json: bool,
}

impl CliConfig {
    /// Construct CLI configuration from environment variables and arguments.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Directory with `abilities.ron`, `moves.ron`,
    ///   and optional `elements.ron` / `rules.toml`
    /// - `COMBAT_VERBOSE` - `true` to print the full battle log (default: true)
    /// - `COMBAT_JSON` - `true` to print the log as JSON lines (default: false)
    ///
    /// A first positional argument overrides `COMBAT_CONTENT_DIR`.
    pub fn from_env() -> Self {
        let mut config = Self {
            content_dir: None,
            verbose: true,
            json: false,
        };

        if let Some(dir) = read_env::<PathBuf>("COMBAT_CONTENT_DIR") {
            config.content_dir = Some(dir);
        }
        if let Some(verbose) = read_env::<bool>("COMBAT_VERBOSE") {
            config.verbose = verbose;
        }
        if let Some(json) = read_env::<bool>("COMBAT_JSON") {
            config.json = json;
        }
        if let Some(dir) = env::args_os().nth(1) {
            config.content_dir = Some(PathBuf::from(dir));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
