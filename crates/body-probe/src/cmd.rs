use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
};

use sarge::{ArgumentType, prelude::*};

use crate::impl_deref_mut;

sarge! {
    #[derive(Debug)]
    pub Args,

    > "Path of a JSON config file."
    #ok 'C' pub config: String,

    > "File whose bytes become the upload body."
    #ok 'f' pub file: String,

    > "Port for the dump listener (0 picks an ephemeral port)."
    #ok 'p' pub port: u16,

    > "Log level filter (error/warn/info/debug/trace)."
    #ok 'L' pub log_level: LogLevel,

    > "Colored log output."
    #ok 'c' pub colored: bool,

    > "help"
    #ok 'h' pub help: bool,
}

#[derive(Debug, Clone)]
pub struct LogLevel(String);

impl ArgumentType for LogLevel {
    type Error = ArgParseError;

    fn from_value(val: Option<&str>) -> sarge::ArgResult<Self> {
        if let Some(v) = val {
            let level = LogLevel::from_str(v).ok()?;
            return Ok(level).into();
        }
        None
    }
}

impl FromStr for LogLevel {
    type Err = log::ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = log::LevelFilter::from_str(s)?;
        Ok(Self(level.to_string().to_lowercase()))
    }
}

impl_deref_mut!(LogLevel(String));
