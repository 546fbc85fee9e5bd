use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CARD_MEMORY_SIZE, MAX_CARDS};
use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum PlaneError {
    #[error("Unsupported color depth: {0} bits (1 to 4 supported)")]
    UnsupportedColorBits(u8),
    #[error("Raster holds {found} pixels, {expected} expected")]
    RasterSizeMismatch { expected: usize, found: usize },
    #[error("Bit plane needs {size} bytes, a card holds {max}")]
    PlaneTooLarge { size: usize, max: usize },
    #[error("Pixel index {index} does not fit in {color_bits} bits")]
    IndexOutOfRange { index: u8, color_bits: u8 },
    #[error("Bit plane buffer holds {found} bytes, {expected} expected")]
    BufferSizeMismatch { expected: usize, found: usize },
}

impl PlaneError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlaneError::UnsupportedColorBits(_) | PlaneError::PlaneTooLarge { .. } => {
                ErrorKind::Capacity
            }
            PlaneError::RasterSizeMismatch { .. } => ErrorKind::DimensionMismatch,
            PlaneError::IndexOutOfRange { .. } => ErrorKind::PaletteMismatch,
            PlaneError::BufferSizeMismatch { .. } => ErrorKind::Format,
        }
    }
}

/// One 1-bit plane per card. Planes sit in fixed `CARD_MEMORY_SIZE` slots of a
/// single buffer, plane 0 first, whatever their used length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitPlaneImage {
    pub width: u16,
    pub height: u16,
    pub color_bits: u8,
    data: Vec<u8>,
}

impl BitPlaneImage {
    /// Bytes per row within a plane: pixels padded up to a whole byte.
    pub fn row_stride(&self) -> usize {
        row_stride(self.width)
    }

    pub fn plane_len(&self) -> usize {
        self.row_stride() * self.height as usize
    }

    pub fn plane(&self, bit: usize) -> &[u8] {
        let start = bit * CARD_MEMORY_SIZE;
        &self.data[start..start + self.plane_len()]
    }

    pub fn planes(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.color_bits as usize).map(move |bit| self.plane(bit))
    }

    /// The combined buffer, `color_bits * CARD_MEMORY_SIZE` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Reassembles the palette index of one pixel from its plane bits.
    /// `None` outside the image.
    pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.row_stride() + x as usize / 8;
        let shift = 7 - (x % 8);

        let index = self
            .planes()
            .enumerate()
            .fold(0u8, |index, (bit, plane)| {
                index | (((plane[offset] >> shift) & 1) << bit)
            });
        Some(index)
    }

    pub fn to_indices(&self) -> Vec<u8> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter_map(|(x, y)| self.pixel(x, y))
            .collect()
    }

    /// Checks a buffer obtained from outside the converter before it is sliced.
    pub(crate) fn validate(&self) -> Result<(), PlaneError> {
        check_color_bits(self.color_bits)?;
        check_plane_len(self.width, self.height)?;

        let expected = self.color_bits as usize * CARD_MEMORY_SIZE;
        if self.data.len() != expected {
            return Err(PlaneError::BufferSizeMismatch {
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }
}

fn row_stride(width: u16) -> usize {
    (width as usize).div_ceil(8)
}

fn check_color_bits(color_bits: u8) -> Result<(), PlaneError> {
    if color_bits == 0 || color_bits as usize > MAX_CARDS {
        error!("Cannot split {} color bits across cards", color_bits);
        return Err(PlaneError::UnsupportedColorBits(color_bits));
    }
    Ok(())
}

fn check_plane_len(width: u16, height: u16) -> Result<usize, PlaneError> {
    let size = row_stride(width) * height as usize;
    if size > CARD_MEMORY_SIZE {
        error!("A {}x{} plane does not fit on a card", width, height);
        return Err(PlaneError::PlaneTooLarge {
            size,
            max: CARD_MEMORY_SIZE,
        });
    }
    Ok(size)
}

/// Splits a row-major raster of palette indices into `color_bits` planes.
///
/// Within a plane each byte covers 8 horizontal pixels, leftmost pixel in the
/// most significant bit; a partial last group in a row is zero padded.
pub fn convert_to_planes(
    raster: &[u8],
    width: u16,
    height: u16,
    color_bits: u8,
) -> Result<BitPlaneImage, PlaneError> {
    info!("Color bits: {}", color_bits);
    check_color_bits(color_bits)?;

    let expected = width as usize * height as usize;
    if raster.len() != expected {
        error!("Raster length {} does not match {}x{}", raster.len(), width, height);
        return Err(PlaneError::RasterSizeMismatch {
            expected,
            found: raster.len(),
        });
    }

    let plane_len = check_plane_len(width, height)?;

    if let Some(&index) = raster.iter().find(|&&index| index >> color_bits != 0) {
        return Err(PlaneError::IndexOutOfRange { index, color_bits });
    }

    let mut data = vec![0u8; color_bits as usize * CARD_MEMORY_SIZE];
    let stride = row_stride(width);

    for (y, row) in raster.chunks(width.max(1) as usize).enumerate() {
        for (group, pixels) in row.chunks(8).enumerate() {
            let offset = group + stride * y;

            for bit in 0..color_bits as usize {
                data[offset + CARD_MEMORY_SIZE * bit] = pixels
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (pixel, &index)| {
                        byte | (((index >> bit) & 1) << (7 - pixel))
                    });
            }
        }
    }

    debug!(
        "Converted {}x{} image into {} planes of {} bytes",
        width, height, color_bits, plane_len
    );

    Ok(BitPlaneImage {
        width,
        height,
        color_bits,
        data,
    })
}
