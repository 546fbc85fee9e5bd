use std::io::{self, Write};

use log::info;

use crate::constants::ASM_BYTES_PER_LINE;
use crate::planes::BitPlaneImage;

const CARD_LABELS: [&str; 4] = ["MASTER", "SLAVE_1", "SLAVE_2", "SLAVE_3"];

/// Writes the planes as labeled ca65 `.BYTE` lists. Returns the number of
/// `.BYTE` lines.
pub fn write_asm<W: Write>(writer: &mut W, image: &BitPlaneImage) -> io::Result<u16> {
    writeln!(writer, "X_SIZE\t= {}", image.width)?;
    writeln!(writer, "Y_SIZE\t= {}", image.height)?;

    let mut lines = 0u16;
    for (label, plane) in CARD_LABELS.iter().zip(image.planes()) {
        write!(writer, "\n\n{}:", label)?;

        for line in plane.chunks(ASM_BYTES_PER_LINE) {
            let bytes: Vec<String> = line.iter().map(|byte| format!("${:02x}", byte)).collect();
            write!(writer, "\n\t\t.BYTE\t{}", bytes.join(", "))?;
            lines += 1;
        }
    }
    writeln!(writer)?;

    info!("Wrote {} .BYTE lines", lines);
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::convert_to_planes;

    #[test]
    fn test_two_planes() {
        let image = convert_to_planes(&[0, 1, 2, 3, 0, 0, 0, 0], 8, 1, 2).unwrap();
        let mut out = Vec::new();
        let lines = write_asm(&mut out, &image).unwrap();

        assert_eq!(lines, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "X_SIZE\t= 8\nY_SIZE\t= 1\n\n\nMASTER:\n\t\t.BYTE\t$50\n\n\nSLAVE_1:\n\t\t.BYTE\t$30\n"
        );
    }

    #[test]
    fn test_sixteen_bytes_per_line() {
        let image = convert_to_planes(&vec![1u8; 136], 136, 1, 1).unwrap();
        let mut out = Vec::new();
        let lines = write_asm(&mut out, &image).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(lines, 2);
        assert!(text.contains(&format!("\t\t.BYTE\t{}\n", vec!["$ff"; 16].join(", "))));
        assert!(text.ends_with("\t\t.BYTE\t$ff\n"));
    }
}
