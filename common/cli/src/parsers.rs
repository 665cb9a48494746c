use std::ffi::OsStr;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, Command, Error};

/// Parses a whole number of seconds, e.g. '100', into a [`Duration`].
#[derive(Clone, Default)]
pub struct DurationSecondsParser {}

impl TypedValueParser for DurationSecondsParser {
    type Value = Duration;

    fn parse_ref(&self, _cmd: &Command, _arg: Option<&Arg>, value: &OsStr) -> Result<Self::Value, Error> {
        let seconds_str = value
            .to_str()
            .ok_or_else(|| Error::raw(ErrorKind::InvalidValue, "Invalid argument encoding"))?;

        duration_seconds_parser(seconds_str).map_err(|message| Error::raw(ErrorKind::InvalidValue, message))
    }
}

pub fn duration_seconds_parser(value: &str) -> Result<Duration, String> {
    let seconds = value
        .trim()
        .parse::<u64>()
        .map_err(|error| format!("Invalid number of seconds. value: '{}', cause: {}\n", value, error))?;

    Ok(Duration::from_secs(seconds))
}
