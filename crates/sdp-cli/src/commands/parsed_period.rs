//! `sdp parsed-period` command implementation

use sdp_common::query::TimePeriod;

use crate::error::{CliError, Result};

pub fn run(value: &str) -> Result<()> {
    let to_error = |source| CliError::TimePeriod {
        value: value.to_string(),
        source,
    };
    let time_period = TimePeriod::parse(value).map_err(to_error)?;
    println!("{}", time_period.parsed_period().map_err(to_error)?);
    Ok(())
}
