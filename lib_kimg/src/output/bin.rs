use std::io::{Read, Write};

use log::{debug, error};

use super::OutputError;
use crate::planes::BitPlaneImage;

/// Serializes the whole bit-plane image (dimensions, depth and card buffer).
pub fn write_bin<W: Write>(writer: &mut W, image: &BitPlaneImage) -> Result<(), OutputError> {
    bincode::serialize_into(writer, image)?;
    debug!("Serialized {} bytes of plane data", image.data().len());
    Ok(())
}

pub fn read_bin<R: Read>(reader: R) -> Result<BitPlaneImage, OutputError> {
    let image: BitPlaneImage = bincode::deserialize_from(reader)?;
    image.validate().map_err(|e| {
        error!("Rejected binary image: {}", e);
        OutputError::InvalidImage(e)
    })?;
    Ok(image)
}
