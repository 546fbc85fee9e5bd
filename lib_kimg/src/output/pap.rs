use std::io::{self, Write};

use super::record::{write_hex_image, RecordFormat};
use super::OutputError;
use crate::constants::PAP_BYTES_PER_RECORD;
use crate::planes::BitPlaneImage;

/// MOS Technology papertape, as loaded by the KIM-1 monitor.
pub struct Papertape;

/// 16-bit sum of length, address bytes and data.
pub fn checksum(address: u16, data: &[u8]) -> u16 {
    let [high, low] = address.to_be_bytes();
    data.iter().fold(
        data.len() as u16 + high as u16 + low as u16,
        |sum, &byte| sum.wrapping_add(byte as u16),
    )
}

impl RecordFormat for Papertape {
    const BYTES_PER_RECORD: usize = PAP_BYTES_PER_RECORD;

    fn write_record<W: Write>(writer: &mut W, address: u16, data: &[u8]) -> io::Result<()> {
        write!(writer, ";{:02X}{:04X}", data.len(), address)?;
        for byte in data {
            write!(writer, "{:02X}", byte)?;
        }
        writeln!(writer, "{:04X}", checksum(address, data))
    }

    /// The last record carries the record count in its address field and the
    /// byte sum of that count as checksum.
    fn terminate<W: Write>(writer: &mut W, records: u16) -> io::Result<()> {
        let [high, low] = records.to_be_bytes();
        writeln!(
            writer,
            ";00{:04X}{:04X}",
            records,
            high as u16 + low as u16
        )
    }
}

pub fn write_pap<W: Write>(
    writer: &mut W,
    image: &BitPlaneImage,
    base_address: u16,
) -> Result<u16, OutputError> {
    write_hex_image::<Papertape, W>(writer, image, base_address)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::convert_to_planes;

    #[test]
    fn test_checksum_is_not_negated() {
        assert_eq!(checksum(0x2000, &[0x0F]), 0x0030);
        assert_eq!(checksum(0x20F0, &[0xFF; 24]), 24 + 0x20 + 0xF0 + 24 * 0xFF);
    }

    #[test]
    fn test_terminator() {
        let mut out = Vec::new();
        Papertape::terminate(&mut out, 0x0123).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ";0001230024\n");
    }

    #[test]
    fn test_single_byte_image() {
        let image = convert_to_planes(&[0, 0, 0, 0, 1, 1, 1, 1], 8, 1, 1).unwrap();
        let mut out = Vec::new();
        let records = write_pap(&mut out, &image, 0x2000).unwrap();

        assert_eq!(records, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            ";0120000F0030\n;0000010001\n"
        );
    }

    #[test]
    fn test_row_split_into_24_byte_records() {
        // 40 bytes per row would be flat; 312 pixels = 39 bytes stays row by row.
        let image = convert_to_planes(&vec![1u8; 312], 312, 1, 1).unwrap();
        let mut out = Vec::new();
        let records = write_pap(&mut out, &image, 0x2000).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(records, 2);
        assert!(lines[0].starts_with(";182000FFFF"));
        assert!(lines[1].starts_with(";0F2018FF"));
        assert_eq!(lines[2], ";0000020002");
    }
}
