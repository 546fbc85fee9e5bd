pub mod asm;
pub mod bin;
pub mod format;
pub mod ihex;
pub mod pap;
pub mod record;

use std::io::{self, Write};

use log::info;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::planes::{BitPlaneImage, PlaneError};

pub use format::Format;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Error writing to file: {0}")]
    Io(#[from] io::Error),
    #[error("{cards} cards starting at {base_address:04X} do not fit below FFFF")]
    AddressOverflow { base_address: u16, cards: u8 },
    #[error("Binary image encoding failed: {0}")]
    Bincode(#[from] bincode::Error),
    #[error("Invalid binary image: {0}")]
    InvalidImage(PlaneError),
}

impl OutputError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OutputError::Io(_) => ErrorKind::Io,
            OutputError::AddressOverflow { .. } => ErrorKind::Capacity,
            OutputError::Bincode(e) => match **e {
                bincode::ErrorKind::Io(_) => ErrorKind::Io,
                _ => ErrorKind::Format,
            },
            OutputError::InvalidImage(e) => e.kind(),
        }
    }
}

/// Writes `image` in `format`. Returns the number of records (lines for
/// `asm`, zero for `bin`).
pub fn write_image<W: Write>(
    writer: &mut W,
    image: &BitPlaneImage,
    format: Format,
    base_address: u16,
) -> Result<u16, OutputError> {
    info!("Writing {} output at {:04X}", format.description(), base_address);

    let records = match format {
        Format::Pap => pap::write_pap(writer, image, base_address)?,
        Format::Ihex => ihex::write_ihex(writer, image, base_address)?,
        Format::Asm => asm::write_asm(writer, image)?,
        Format::Bin => {
            bin::write_bin(writer, image)?;
            0
        }
    };

    writer.flush()?;
    Ok(records)
}
