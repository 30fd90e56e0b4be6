use std::path::PathBuf;

use clap::Parser;

use crate::error::InvalidSelectorValue;
use crate::selector::{SelectorId, SelectorState};

/// Customer analysis dashboard.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Customer table (.csv, .json or .parquet)
    #[arg(long, env = "TABLERO_DATA", default_value = "data/data_clean.csv")]
    pub data: PathBuf,

    /// Verbose logging and selector overlay
    #[arg(long)]
    pub debug: bool,

    /// Initial comparison feature (balance, age, duration)
    #[arg(long, default_value = "balance")]
    pub comparison: Option<String>,

    /// Initial x-axis feature (job, marital, education, balance)
    #[arg(long)]
    pub x_axis: Option<String>,

    /// Initial color feature (job, marital, education, balance)
    #[arg(long)]
    pub color: Option<String>,

    /// Initial segmentation feature (job, marital, education, balance)
    #[arg(long)]
    pub segment: Option<String>,

    /// Write the resolved charts as JSON to this file and exit
    #[arg(long, value_name = "FILE")]
    pub export: Option<PathBuf>,

    /// Window width in points
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Window height in points
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

impl Config {
    /// Initial selector values; anything outside a selector's options is rejected.
    pub fn selectors(&self) -> Result<SelectorState, InvalidSelectorValue> {
        let mut state = SelectorState::cleared();
        state.set_raw(SelectorId::Comparison, self.comparison.as_deref())?;
        state.set_raw(SelectorId::XAxis, self.x_axis.as_deref())?;
        state.set_raw(SelectorId::Color, self.color.as_deref())?;
        state.set_raw(SelectorId::Segment, self.segment.as_deref())?;
        Ok(state)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Field;

    #[test]
    fn defaults_match_the_dashboard() {
        let config = Config::try_parse_from(["tablero-clientes"]).unwrap();
        assert_eq!(config.selectors().unwrap(), SelectorState::default());
        assert!(!config.debug);
        assert_eq!(config.log_level(), log::LevelFilter::Info);
        assert!(config.export.is_none());
    }

    #[test]
    fn selector_flags_are_validated() {
        let config = Config::try_parse_from([
            "tablero-clientes",
            "--comparison",
            "age",
            "--x-axis",
            "job",
            "--color",
            "marital",
            "--segment",
            "balance",
        ])
        .unwrap();
        let state = config.selectors().unwrap();
        assert_eq!(state.comparison(), Some(Field::Age));
        assert_eq!(state.x_axis(), Some(Field::Job));
        assert_eq!(state.color(), Some(Field::Marital));
        assert_eq!(state.segment(), Some(Field::Balance));

        let bad = Config::try_parse_from(["tablero-clientes", "--segment", "duration"]).unwrap();
        let err = bad.selectors().unwrap_err();
        assert_eq!(err.selector, "segment-filter");
    }

    #[test]
    fn debug_raises_log_level() {
        let config = Config::try_parse_from(["tablero-clientes", "--debug"]).unwrap();
        assert_eq!(config.log_level(), log::LevelFilter::Debug);
    }
}
