use std::io::{self, Write};

use super::record::{write_hex_image, RecordFormat};
use super::OutputError;
use crate::constants::IHEX_BYTES_PER_RECORD;
use crate::planes::BitPlaneImage;

pub const END_OF_FILE: &str = ":00000001FF\n";

/// Intel HEX data records (type 00) followed by a fixed end-of-file record.
pub struct IntelHex;

/// Two's complement of the byte sum of length, address and data.
pub fn checksum(address: u16, data: &[u8]) -> u8 {
    let [high, low] = address.to_be_bytes();
    data.iter()
        .fold(
            (data.len() as u8).wrapping_add(high).wrapping_add(low),
            |sum, &byte| sum.wrapping_add(byte),
        )
        .wrapping_neg()
}

impl RecordFormat for IntelHex {
    const BYTES_PER_RECORD: usize = IHEX_BYTES_PER_RECORD;

    fn write_record<W: Write>(writer: &mut W, address: u16, data: &[u8]) -> io::Result<()> {
        write!(writer, ":{:02X}{:04X}00", data.len(), address)?;
        for byte in data {
            write!(writer, "{:02X}", byte)?;
        }
        writeln!(writer, "{:02X}", checksum(address, data))
    }

    fn terminate<W: Write>(writer: &mut W, _records: u16) -> io::Result<()> {
        writer.write_all(END_OF_FILE.as_bytes())
    }
}

pub fn write_ihex<W: Write>(
    writer: &mut W,
    image: &BitPlaneImage,
    base_address: u16,
) -> Result<u16, OutputError> {
    write_hex_image::<IntelHex, W>(writer, image, base_address)
}
