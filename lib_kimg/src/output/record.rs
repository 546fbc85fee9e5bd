use std::io::{self, Write};

use log::{debug, error, info};

use super::OutputError;
use crate::constants::{CARD_MEMORY_SIZE, MAX_COL_BYTES};
use crate::planes::BitPlaneImage;

/// A line-oriented, checksummed load format.
pub trait RecordFormat {
    const BYTES_PER_RECORD: usize;

    /// Writes one full line for `data`, which holds at most `BYTES_PER_RECORD` bytes.
    fn write_record<W: Write>(writer: &mut W, address: u16, data: &[u8]) -> io::Result<()>;

    /// Writes the end-of-stream line. `records` counts every data record written.
    fn terminate<W: Write>(writer: &mut W, records: u16) -> io::Result<()>;
}

/// Splits `data` into consecutive records starting at `address` and returns
/// how many were written.
pub fn write_records<F: RecordFormat, W: Write>(
    writer: &mut W,
    address: u16,
    data: &[u8],
) -> io::Result<u16> {
    let mut records = 0;

    for (chunk_index, chunk) in data.chunks(F::BYTES_PER_RECORD).enumerate() {
        let offset = (chunk_index * F::BYTES_PER_RECORD) as u16;
        F::write_record(writer, address.wrapping_add(offset), chunk)?;
        records += 1;
    }

    Ok(records)
}

/// Writes every plane of `image` to its card, card `n` loading at
/// `base_address + n * CARD_MEMORY_SIZE`, then the terminator.
///
/// Images narrower than a full display row are written row by row, each row
/// at its own display address (`MAX_COL_BYTES` apart). Full-width images are
/// already laid out like display memory and go out as one flat stream.
pub fn write_hex_image<F: RecordFormat, W: Write>(
    writer: &mut W,
    image: &BitPlaneImage,
    base_address: u16,
) -> Result<u16, OutputError> {
    let end = base_address as usize + image.color_bits as usize * CARD_MEMORY_SIZE;
    if end > 0x1_0000 {
        error!(
            "{} cards at {:04X} run past the end of memory",
            image.color_bits, base_address
        );
        return Err(OutputError::AddressOverflow {
            base_address,
            cards: image.color_bits,
        });
    }

    let flat = image.width as usize > (MAX_COL_BYTES - 1) * 8;
    let row_stride = image.row_stride().max(1);
    let mut records = 0u16;

    for (card, plane) in image.planes().enumerate() {
        let card_address = base_address + (card * CARD_MEMORY_SIZE) as u16;

        if flat {
            debug!("Card {} at {:04X}: {} bytes flat", card, card_address, plane.len());
            records += write_records::<F, W>(writer, card_address, plane)?;
        } else {
            debug!(
                "Card {} at {:04X}: {} rows of {} bytes",
                card,
                card_address,
                image.height,
                row_stride
            );
            for (row, bytes) in plane.chunks(row_stride).enumerate() {
                let row_address = card_address + (row * MAX_COL_BYTES) as u16;
                records += write_records::<F, W>(writer, row_address, bytes)?;
            }
        }
    }

    F::terminate(writer, records)?;
    info!("Wrote {} records", records);

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::convert_to_planes;

    /// Records each call as `(address, length)`.
    struct Probe;

    impl RecordFormat for Probe {
        const BYTES_PER_RECORD: usize = 4;

        fn write_record<W: Write>(writer: &mut W, address: u16, data: &[u8]) -> io::Result<()> {
            writeln!(writer, "{:04X} {}", address, data.len())
        }

        fn terminate<W: Write>(writer: &mut W, records: u16) -> io::Result<()> {
            writeln!(writer, "end {}", records)
        }
    }

    fn probe(image: &BitPlaneImage, base_address: u16) -> (u16, String) {
        let mut out = Vec::new();
        let records = write_hex_image::<Probe, _>(&mut out, image, base_address).unwrap();
        (records, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_record_count_is_ceiling() {
        for len in [0usize, 1, 4, 5, 8, 9] {
            let data = vec![0u8; len];
            let mut out = Vec::new();
            let records = write_records::<Probe, _>(&mut out, 0x2000, &data).unwrap();
            assert_eq!(records as usize, len.div_ceil(4));
        }
    }

    #[test]
    fn test_records_advance_by_record_size() {
        let mut out = Vec::new();
        write_records::<Probe, _>(&mut out, 0x2000, &[0u8; 10]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2000 4\n2004 4\n2008 2\n"
        );
    }

    #[test]
    fn test_rows_start_at_display_columns() {
        // 48 pixels = 6 bytes per row: one full and one short record per row.
        let image = convert_to_planes(&vec![0u8; 48 * 2], 48, 2, 1).unwrap();
        let (records, text) = probe(&image, 0x4000);

        assert_eq!(records, 4);
        assert_eq!(text, "4000 4\n4004 2\n4028 4\n402C 2\nend 4\n");
    }

    #[test]
    fn test_each_plane_on_its_own_card() {
        let image = convert_to_planes(&[0u8; 8], 8, 1, 2).unwrap();
        let (records, text) = probe(&image, 0x2000);

        assert_eq!(records, 2);
        assert_eq!(text, "2000 1\n4000 1\nend 2\n");
    }

    #[test]
    fn test_full_width_is_flat() {
        let image = convert_to_planes(&vec![0u8; 320 * 2], 320, 2, 1).unwrap();
        let (records, text) = probe(&image, 0x2000);

        assert_eq!(records, 20);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2000 4");
        assert_eq!(lines[10], "2028 4");
        assert_eq!(lines[19], "204C 4");
    }

    #[test]
    fn test_rejects_cards_past_end_of_memory() {
        let image = convert_to_planes(&[0u8; 8], 8, 1, 4).unwrap();
        let mut out = Vec::new();
        let err = write_hex_image::<Probe, _>(&mut out, &image, 0xA000).unwrap_err();

        assert!(matches!(
            err,
            OutputError::AddressOverflow {
                base_address: 0xA000,
                cards: 4
            }
        ));
        assert!(out.is_empty());
    }
}
