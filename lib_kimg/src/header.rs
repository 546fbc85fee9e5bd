use std::io::{self, BufRead};

use lazy_static::lazy_static;
use log::{debug, error, info};
use regex::Regex;
use thiserror::Error;

use crate::constants::{
    HEADER_DATA_END, HEADER_DATA_MARKER, MAX_COL_BYTES, MAX_IMAGE_SIZE, MAX_ROWS,
};
use crate::error::ErrorKind;
use crate::palette::{Color, Palette};

lazy_static! {
    static ref WIDTH_REGEX: Regex = Regex::new(r"\bwidth\s*=\s*(\d+)\s*;").unwrap();
    static ref HEIGHT_REGEX: Regex = Regex::new(r"\bheight\s*=\s*(\d+)\s*;").unwrap();
    // `{ r, g, b },` with as many leading components as are present.
    static ref COLOR_TUPLE_REGEX: Regex =
        Regex::new(r"^\s*\{\s*(\d+)(?:\s*,\s*(\d+)(?:\s*,\s*(\d+))?)?").unwrap();
}

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Failed to read image header: {0}")]
    Io(#[from] io::Error),
    #[error("Can't get image dimensions")]
    MissingDimensions,
    #[error("Invalid {name} declaration on line {line}")]
    InvalidDimension { name: &'static str, line: usize },
    #[error("Image is {width}x{height}, max. image size is {max_width}x{max_height}")]
    ImageTooLarge {
        width: u16,
        height: u16,
        max_width: usize,
        max_height: usize,
    },
    #[error("Malformed color table entry on line {line}")]
    MalformedColor { line: usize },
    #[error("Color {color} is not in the palette")]
    UnknownColor { color: Color },
    #[error("Palette does not match: expected {expected} image colors, found {found}")]
    ColorCountMismatch { expected: usize, found: usize },
    #[error("Can't find image data")]
    MissingPixelData,
    #[error("Bad image data format on line {line}")]
    MalformedPixelData { line: usize },
    #[error("Pixel on line {line} uses color index {index}, image has {colors} colors")]
    UnknownColorIndex {
        line: usize,
        index: usize,
        colors: usize,
    },
    #[error("Image is too big: more than {max} pixels")]
    TooManyPixels { max: usize },
    #[error("Can't find image data end")]
    UnterminatedPixelData,
    #[error("Expected image size is {expected} pixels, found {found} (bad image file?)")]
    DimensionMismatch { expected: usize, found: usize },
}

impl HeaderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HeaderError::Io(_) => ErrorKind::Io,
            HeaderError::MissingDimensions
            | HeaderError::MissingPixelData
            | HeaderError::UnterminatedPixelData => ErrorKind::MissingData,
            HeaderError::InvalidDimension { .. }
            | HeaderError::MalformedColor { .. }
            | HeaderError::MalformedPixelData { .. } => ErrorKind::Format,
            HeaderError::ImageTooLarge { .. } | HeaderError::TooManyPixels { .. } => {
                ErrorKind::Capacity
            }
            HeaderError::UnknownColor { .. }
            | HeaderError::ColorCountMismatch { .. }
            | HeaderError::UnknownColorIndex { .. } => ErrorKind::PaletteMismatch,
            HeaderError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
        }
    }
}

/// What the header parser recovered, with pixels already in palette-index space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderImage {
    pub width: u16,
    pub height: u16,
    /// Local color index -> palette index.
    pub translation: Vec<u8>,
    /// Row-major palette indices.
    pub raster: Vec<u8>,
}

impl HeaderImage {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn check_dimensions(&self) -> Result<(), HeaderError> {
        if self.raster.len() != self.pixel_count() {
            error!(
                "Declared {}x{} image but parsed {} pixels",
                self.width,
                self.height,
                self.raster.len()
            );
            return Err(HeaderError::DimensionMismatch {
                expected: self.pixel_count(),
                found: self.raster.len(),
            });
        }
        Ok(())
    }
}

/// Finds the palette entry with exactly this color.
pub fn map_color(palette: &Palette, color: Color) -> Result<u8, HeaderError> {
    palette.index_of(&color).ok_or_else(|| {
        error!("Image color {} has no palette entry", color);
        HeaderError::UnknownColor { color }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingDimensions,
    SeekingColorTable,
    SeekingPixelMarker,
    ReadingPixels,
    Done,
}

struct HeaderScanner<'a> {
    palette: &'a Palette,
    state: ScanState,
    width: Option<u16>,
    height: Option<u16>,
    translation: Vec<u8>,
    raster: Vec<u8>,
}

impl<'a> HeaderScanner<'a> {
    fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            state: ScanState::SeekingDimensions,
            width: None,
            height: None,
            translation: Vec::with_capacity(palette.len()),
            raster: Vec::new(),
        }
    }

    fn feed(&mut self, number: usize, line: &str) -> Result<(), HeaderError> {
        match self.state {
            ScanState::SeekingDimensions => self.scan_dimensions(number, line),
            ScanState::SeekingColorTable => self.scan_color(number, line),
            ScanState::SeekingPixelMarker => {
                if line.trim_end() == HEADER_DATA_MARKER {
                    debug!("Image data starts after line {}", number);
                    self.state = ScanState::ReadingPixels;
                }
                Ok(())
            }
            ScanState::ReadingPixels => self.scan_pixels(number, line),
            ScanState::Done => Ok(()),
        }
    }

    fn scan_dimensions(&mut self, number: usize, line: &str) -> Result<(), HeaderError> {
        if let Some(width) = declared_value(&WIDTH_REGEX, "width", number, line)? {
            self.width = Some(width);
        }
        if let Some(height) = declared_value(&HEIGHT_REGEX, "height", number, line)? {
            self.height = Some(height);
        }

        let (Some(width), Some(height)) = (self.width, self.height) else {
            return Ok(());
        };

        info!("Image dimensions: {}x{} pixels", width, height);
        if width as usize > MAX_COL_BYTES * 8 || height as usize > MAX_ROWS {
            error!("Image {}x{} exceeds the display", width, height);
            return Err(HeaderError::ImageTooLarge {
                width,
                height,
                max_width: MAX_COL_BYTES * 8,
                max_height: MAX_ROWS,
            });
        }
        self.state = ScanState::SeekingColorTable;
        Ok(())
    }

    fn scan_color(&mut self, number: usize, line: &str) -> Result<(), HeaderError> {
        let Some(caps) = COLOR_TUPLE_REGEX.captures(line) else {
            // The table is one contiguous block; leaving it early means it was short.
            if !self.translation.is_empty() {
                error!("Color table ended on line {}", number);
                return Err(self.count_mismatch());
            }
            return Ok(());
        };

        let components: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
        let &[r, g, b] = components.as_slice() else {
            error!("Color table entry on line {} is incomplete", number);
            return Err(HeaderError::MalformedColor { line: number });
        };
        let component = |text: &str| {
            text.parse::<u8>()
                .map_err(|_| HeaderError::MalformedColor { line: number })
        };
        let color = Color::new(component(r)?, component(g)?, component(b)?);

        let index = map_color(self.palette, color)?;
        debug!(
            "Image color #{} {} -> palette #{}",
            self.translation.len(),
            color,
            index
        );
        self.translation.push(index);

        if self.translation.len() == self.palette.len() {
            self.state = ScanState::SeekingPixelMarker;
        }
        Ok(())
    }

    fn scan_pixels(&mut self, number: usize, line: &str) -> Result<(), HeaderError> {
        if line.contains(HEADER_DATA_END) {
            self.state = ScanState::Done;
            return Ok(());
        }

        let tokens = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        for token in tokens {
            if !token.bytes().all(|b| b.is_ascii_digit()) {
                error!("Unexpected {:?} in image data on line {}", token, number);
                return Err(HeaderError::MalformedPixelData { line: number });
            }
            let index: usize = token
                .parse()
                .map_err(|_| HeaderError::MalformedPixelData { line: number })?;

            let Some(&palette_index) = self.translation.get(index) else {
                error!("Color index {} on line {} is not in the color table", index, number);
                return Err(HeaderError::UnknownColorIndex {
                    line: number,
                    index,
                    colors: self.translation.len(),
                });
            };

            if self.raster.len() == MAX_IMAGE_SIZE {
                error!("Image is too big");
                return Err(HeaderError::TooManyPixels {
                    max: MAX_IMAGE_SIZE,
                });
            }
            self.raster.push(palette_index);
        }
        Ok(())
    }

    fn count_mismatch(&self) -> HeaderError {
        HeaderError::ColorCountMismatch {
            expected: self.palette.len(),
            found: self.translation.len(),
        }
    }

    fn finish(self) -> Result<HeaderImage, HeaderError> {
        match self.state {
            ScanState::SeekingDimensions => Err(HeaderError::MissingDimensions),
            ScanState::SeekingColorTable => Err(self.count_mismatch()),
            ScanState::SeekingPixelMarker => Err(HeaderError::MissingPixelData),
            ScanState::ReadingPixels => Err(HeaderError::UnterminatedPixelData),
            ScanState::Done => {
                info!("Image size: {} pixels", self.raster.len());
                Ok(HeaderImage {
                    // Both are set before leaving SeekingDimensions.
                    width: self.width.unwrap_or_default(),
                    height: self.height.unwrap_or_default(),
                    translation: self.translation,
                    raster: self.raster,
                })
            }
        }
    }
}

/// A zero value counts as "not declared".
fn declared_value(
    regex: &Regex,
    name: &'static str,
    number: usize,
    line: &str,
) -> Result<Option<u16>, HeaderError> {
    let Some(caps) = regex.captures(line) else {
        return Ok(None);
    };
    let value: u16 = caps[1]
        .parse()
        .map_err(|_| HeaderError::InvalidDimension { name, line: number })?;
    Ok((value != 0).then_some(value))
}

/// Parses a GIMP C-source header: dimensions, then the color table (each color
/// mapped onto `palette`), then the `header_data` pixel block.
///
/// The returned raster is not checked against the declared dimensions; see
/// [`HeaderImage::check_dimensions`].
pub fn parse_header<R: BufRead>(reader: R, palette: &Palette) -> Result<HeaderImage, HeaderError> {
    let mut scanner = HeaderScanner::new(palette);

    for (number, line) in (1..).zip(reader.lines()) {
        scanner.feed(number, &line?)?;
        if scanner.state == ScanState::Done {
            break;
        }
    }

    let result = scanner.finish();
    if let Err(ref e) = result {
        error!("Header parsing failed: {}", e);
    }
    result
}
