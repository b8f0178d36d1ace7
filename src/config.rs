use clap::Parser;

use crate::error::Error;

#[derive(Parser, Debug, Clone)]
#[command(name = "stopwatch", version, about)]
pub struct Configuration {
    /// Display refresh interval while running, in milliseconds
    #[arg(long, env = "STOPWATCH_REFRESH_MS", default_value_t = 10)]
    refresh_ms: u64,

    /// Number of lap rows shown at once
    #[arg(long, env = "STOPWATCH_VISIBLE_LAPS", default_value_t = 10)]
    visible_laps: usize,

    /// Log filter, e.g. "debug" or "stopwatch=trace"
    #[arg(long, env = "STOPWATCH_LOG", default_value = "warn")]
    log_level: String,
}

impl Configuration {
    pub fn from_args() -> Result<Self, Error> {
        Self::parse().validated()
    }

    fn validated(self) -> Result<Self, Error> {
        if self.refresh_ms == 0 {
            return Err(Error::Config("refresh interval must be at least 1 ms".into()));
        }
        if self.visible_laps == 0 {
            return Err(Error::Config("at least one lap row must be visible".into()));
        }
        Ok(self)
    }

    pub fn refresh_ms(&self) -> u64 {
        self.refresh_ms
    }

    pub fn visible_laps(&self) -> usize {
        self.visible_laps
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            refresh_ms: 10,
            visible_laps: 10,
            log_level: "warn".into(),
        }
    }
}
