use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::constants::{CARD_MEMORY_SIZE, DEFAULT_BASE_ADDRESS, MAX_BASE_ADDRESS, MIN_BASE_ADDRESS};
use crate::error::ErrorKind;
use crate::output::Format;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Invalid base address {0:04X}: must be a multiple of 2000 between 2000 and A000")]
    InvalidBaseAddress(u16),
    #[error("Invalid base address: {0:?} is not a 16-bit hexadecimal number")]
    InvalidHex(String),
}

impl OptionsError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Load address of the first card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseAddress(u16);

impl BaseAddress {
    pub fn new(address: u16) -> Result<Self, OptionsError> {
        if !(MIN_BASE_ADDRESS..=MAX_BASE_ADDRESS).contains(&address)
            || address as usize % CARD_MEMORY_SIZE != 0
        {
            return Err(OptionsError::InvalidBaseAddress(address));
        }
        Ok(Self(address))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl Default for BaseAddress {
    fn default() -> Self {
        Self(DEFAULT_BASE_ADDRESS)
    }
}

impl FromStr for BaseAddress {
    type Err = OptionsError;

    /// Hexadecimal, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let address =
            u16::from_str_radix(digits, 16).map_err(|_| OptionsError::InvalidHex(s.to_string()))?;
        Self::new(address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: PathBuf,
    /// Derived from `input` when not given.
    pub output: Option<PathBuf>,
    /// Black & white when not given.
    pub palette: Option<PathBuf>,
    pub format: Format,
    pub base_address: BaseAddress,
}

impl Options {
    pub fn new<P: AsRef<Path>>(input: P) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: None,
            palette: None,
            format: Format::default(),
            base_address: BaseAddress::default(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => self.input.with_extension(self.format.extension()),
        }
    }
}
