//! Configuration and CLI argument handling

use clap::Parser;

use crate::{
    convert::parse_duration,
    error::TimerError,
    state::{CallbackPolicy, TimerConfig, DEFAULT_UPDATE_FREQUENCY_MS},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pretty-timer")]
#[command(about = "A count-up/countdown timer with pretty time rendering")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Time to start from, in seconds or as a duration like 1h5m
    #[arg(short, long, default_value = "0")]
    pub seconds: String,

    /// Run the callback after this duration, e.g. 5m30s or 330
    #[arg(short, long)]
    pub duration: Option<String>,

    /// Custom format using %h %m %s %g %t (raw) or %H %M %S %G %T (padded)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Display refresh period in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_UPDATE_FREQUENCY_MS)]
    pub update_frequency: u64,

    /// Keep firing every time the duration elapses
    #[arg(short, long)]
    pub repeat: bool,

    /// Count down from the duration and stop at zero
    #[arg(short, long, requires = "duration")]
    pub countdown: bool,

    /// Keep a countdown running after it reaches zero
    #[arg(long)]
    pub restart: bool,

    /// Read edits of the displayed time from stdin
    #[arg(short, long)]
    pub editable: bool,

    /// Which ticks run the callback once a duration is set
    #[arg(long, value_enum, default_value_t = CallbackPolicy::Boundary)]
    pub fire_on: CallbackPolicy,

    /// Emit one JSON object per render instead of a terminal line
    #[arg(long)]
    pub json: bool,

    /// Ring the terminal bell when the callback runs
    #[arg(short, long)]
    pub bell: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Build a validated timer configuration with the default callback
    pub fn timer_config(&self) -> Result<TimerConfig, TimerError> {
        let config = TimerConfig {
            seconds: parse_duration(&self.seconds)?,
            editable: self.editable,
            restart: self.restart,
            duration: self.duration.as_deref().map(parse_duration).transpose()?,
            repeat: self.repeat,
            countdown: self.countdown,
            format: self.format.clone(),
            update_frequency: self.update_frequency,
            fire_on: self.fire_on,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
