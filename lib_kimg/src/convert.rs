use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use log::{debug, info};
use thiserror::Error;

use crate::error::ErrorKind;
use crate::header::{parse_header, HeaderError};
use crate::options::Options;
use crate::output::{write_image, OutputError};
use crate::palette::{Palette, PaletteError};
use crate::planes::{convert_to_planes, BitPlaneImage, PlaneError};

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Palette reading failed")]
    PaletteFailed(#[from] PaletteError),
    #[error("Image header parsing failed")]
    HeaderFailed(#[from] HeaderError),
    #[error("Bit plane conversion failed")]
    PlaneConversionFailed(#[from] PlaneError),
    #[error("Writing output failed")]
    OutputFailed(#[from] OutputError),
    #[error("Error opening {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::PaletteFailed(e) => e.kind(),
            ConvertError::HeaderFailed(e) => e.kind(),
            ConvertError::PlaneConversionFailed(e) => e.kind(),
            ConvertError::OutputFailed(e) => e.kind(),
            ConvertError::Open { .. } => ErrorKind::Io,
        }
    }
}

/// What a conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub output: PathBuf,
    pub width: u16,
    pub height: u16,
    pub color_bits: u8,
    pub records: u16,
}

/// Parses a header against `palette` and splits it into bit planes, one per
/// bit of palette index.
pub fn convert_image<R: BufRead>(
    header: R,
    palette: &Palette,
) -> Result<BitPlaneImage, ConvertError> {
    let parsed = parse_header(header, palette)?;
    parsed.check_dimensions()?;
    debug!("Color translation: {:?}", parsed.translation);

    let image = convert_to_planes(
        &parsed.raster,
        parsed.width,
        parsed.height,
        palette.color_bits(),
    )?;
    Ok(image)
}

pub fn run(options: &Options) -> Result<Summary, ConvertError> {
    let output = options.output_path();
    info!("Output file is '{}'", output.display());

    let palette = match &options.palette {
        Some(path) => Palette::from_file(path)?,
        None => {
            info!("Using default 1-bit black & white palette.");
            Palette::default()
        }
    };

    let input = File::open(&options.input).map_err(|source| ConvertError::Open {
        path: options.input.clone(),
        source,
    })?;
    let image = convert_image(BufReader::new(input), &palette)?;

    let file = File::create(&output).map_err(|source| ConvertError::Open {
        path: output.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let records = write_image(&mut writer, &image, options.format, options.base_address.get())?;

    Ok(Summary {
        output,
        width: image.width,
        height: image.height,
        color_bits: image.color_bits,
        records,
    })
}
