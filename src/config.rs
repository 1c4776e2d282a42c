use std::io::Write;
use std::path::Path;

use serde::Deserialize;

use crate::models::{TagSet, tag_set};
use crate::report::{ConsoleReporter, JsonReporter, Reporter};

pub const CONFIG_FILE: &str = "verdict.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Controls which tests a session skips.
#[derive(Debug, Default, Deserialize)]
pub struct RunConfig {
    /// Tests carrying any of these tags are skipped.
    /// Example: ["slow", "network"]
    #[serde(default)]
    pub exclude_tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

/// Selects the reporter used by `TestSuite::main`.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Console colors. Ignored by the JSON format.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: default_color(),
        }
    }
}

impl Config {
    /// Load `verdict.toml` from the workspace root, falling back to defaults if absent or invalid.
    pub fn load(workspace: &Path) -> Self {
        let path = workspace.join(CONFIG_FILE);
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
            Self::default()
        })
    }

    pub fn filter_tags(&self) -> TagSet {
        tag_set(self.run.exclude_tags.iter().cloned())
    }

    pub fn reporter<W: Write + 'static>(&self, out: W) -> Box<dyn Reporter> {
        match self.output.format {
            OutputFormat::Console => Box::new(ConsoleReporter::new(out, self.output.color)),
            OutputFormat::Json => Box::new(JsonReporter::new(out)),
        }
    }
}
