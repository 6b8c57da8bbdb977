use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "scenario-guide",
    version,
    about = "Guided scenario/tour playback engine"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: scenario-guide.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered scenarios and tours
    List {
        /// Definition YAML file or directory of YAML files
        #[arg(long)]
        defs: Option<String>,
    },

    /// Lint definition files (empty steps, missing action values, ...)
    Check {
        /// Definition YAML file or directory of YAML files
        #[arg(long)]
        defs: Option<String>,
    },

    /// Play a scenario headlessly against a page fixture
    Play {
        /// Scenario or tour id to play
        #[arg(long)]
        scenario: String,

        /// Definition YAML file or directory of YAML files
        #[arg(long)]
        defs: Option<String>,

        /// Page fixture YAML (routes, elements, click effects)
        #[arg(long)]
        fixture: Option<String>,

        /// Playback mode: automatic or guided
        #[arg(long)]
        mode: Option<String>,

        /// Trace output path (JSONL)
        #[arg(long)]
        trace: Option<String>,

        /// Durable session state file (completion history)
        #[arg(long)]
        state: Option<String>,

        /// Virtual-time budget in milliseconds
        #[arg(long)]
        max_ms: Option<u64>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `scenario-guide.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where definitions live when --defs is not given
    #[serde(default = "default_defs")]
    pub defs: String,

    #[serde(default)]
    pub play: PlayConfig,

    /// Trace output path; unset means tracing off
    pub trace: Option<String>,

    #[serde(default = "default_state_file")]
    pub state_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            defs: default_defs(),
            play: PlayConfig::default(),
            trace: None,
            state_file: default_state_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    #[serde(default = "default_mode")]
    pub mode: String,

    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            tick_ms: default_tick_ms(),
            max_ms: default_max_ms(),
        }
    }
}

// Serde default helpers
fn default_defs() -> String {
    "scenarios".to_string()
}
fn default_state_file() -> String {
    "guide_state.json".to_string()
}
fn default_mode() -> String {
    "automatic".to_string()
}
fn default_tick_ms() -> u64 {
    crate::DEFAULT_TICK_MS
}
fn default_max_ms() -> u64 {
    120_000
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or
/// malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("scenario-guide.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
