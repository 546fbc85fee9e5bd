use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, error, info, warn};
use regex::Regex;
use thiserror::Error;

use crate::constants::{MAX_PALETTE_SIZE, PALETTE_SIGNATURE};
use crate::error::ErrorKind;

lazy_static! {
    // Up to three leading decimal components; anything after the third is the color name.
    static ref COLOR_LINE_REGEX: Regex =
        Regex::new(r"^\s*(\d+)(?:\s+(\d+)(?:\s+(\d+))?)?").unwrap();
}

#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette: {0}")]
    Io(#[from] io::Error),
    #[error("Unknown palette file format: first line must be \"GIMP Palette\"")]
    InvalidSignature,
    #[error("Bad palette file: line {line} has {found} of 3 color components")]
    IncompleteColor { line: usize, found: usize },
    #[error("Bad palette file: line {line} has a color component above 255")]
    ComponentOutOfRange { line: usize },
    #[error("Too many colors (max. is {max})")]
    TooManyColors { max: usize },
    #[error("Palette contains no colors")]
    Empty,
    #[error("Palette has {found} color, at least 2 are needed")]
    TooFewColors { found: usize },
}

impl PaletteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PaletteError::Io(_) => ErrorKind::Io,
            PaletteError::TooManyColors { .. } => ErrorKind::Capacity,
            PaletteError::InvalidSignature
            | PaletteError::IncompleteColor { .. }
            | PaletteError::ComponentOutOfRange { .. }
            | PaletteError::Empty
            | PaletteError::TooFewColors { .. } => ErrorKind::Format,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Ordered list of colors; a color's position is its palette index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    /// 1-bit black & white.
    fn default() -> Self {
        Self {
            colors: vec![Color::BLACK, Color::WHITE],
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() < 2 {
            error!("A single color palette cannot fill a bit plane");
            return Err(PaletteError::TooFewColors {
                found: colors.len(),
            });
        }
        if colors.len() > MAX_PALETTE_SIZE {
            return Err(PaletteError::TooManyColors {
                max: MAX_PALETTE_SIZE,
            });
        }
        if !colors.len().is_power_of_two() {
            warn!(
                "Palette has {} colors; only the first {} are addressable",
                colors.len(),
                1usize << colors.len().ilog2()
            );
        }
        Ok(Self { colors })
    }

    /// Reads a GIMP palette. Lines whose first token is not a number (comments,
    /// `Name:`, `Columns:`, blank lines) are skipped.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, PaletteError> {
        let mut lines = reader.lines();

        let signature = lines.next().transpose()?;
        if signature.as_deref().map(str::trim_end) != Some(PALETTE_SIGNATURE) {
            error!("Palette signature line missing");
            return Err(PaletteError::InvalidSignature);
        }

        let mut colors = Vec::with_capacity(MAX_PALETTE_SIZE);

        // Line 1 is the signature.
        for (number, line) in (2..).zip(lines) {
            let line = line?;
            let Some(color) = parse_color_line(&line, number)? else {
                continue;
            };

            if colors.len() == MAX_PALETTE_SIZE {
                error!("Palette exceeds {} colors at line {}", MAX_PALETTE_SIZE, number);
                return Err(PaletteError::TooManyColors {
                    max: MAX_PALETTE_SIZE,
                });
            }

            debug!("Palette color #{}: {}", colors.len(), color);
            colors.push(color);
        }

        Self::new(colors)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PaletteError> {
        let path = path.as_ref();
        info!("Reading palette from {}", path.display());
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn index_of(&self, color: &Color) -> Option<u8> {
        self.colors
            .iter()
            .position(|c| c == color)
            .map(|index| index as u8)
    }

    /// Number of bit planes (cards) needed: floor(log2(colors)).
    pub fn color_bits(&self) -> u8 {
        self.colors.len().ilog2() as u8
    }
}

/// Returns `Ok(None)` for lines that carry no color at all.
fn parse_color_line(line: &str, number: usize) -> Result<Option<Color>, PaletteError> {
    let Some(caps) = COLOR_LINE_REGEX.captures(line) else {
        return Ok(None);
    };

    let mut components = [0u8; 3];
    let mut found = 0;
    for (slot, group) in components.iter_mut().zip(caps.iter().skip(1)) {
        let Some(group) = group else { break };
        *slot = group
            .as_str()
            .parse()
            .map_err(|_| PaletteError::ComponentOutOfRange { line: number })?;
        found += 1;
    }

    if found != 3 {
        error!("Palette line {} has only {} components", number, found);
        return Err(PaletteError::IncompleteColor {
            line: number,
            found,
        });
    }

    let [r, g, b] = components;
    Ok(Some(Color::new(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gpl(body: &str) -> String {
        format!("GIMP Palette\nName: test\nColumns: 4\n#\n{body}")
    }

    #[test]
    fn test_read_four_colors() {
        let text = gpl(
            "  0   0   0\tBlack\n 85  85  85\tDark\n170 170 170\tLight\n255 255 255\tWhite\n",
        );
        let palette = Palette::read(text.as_bytes()).unwrap();

        assert_eq!(palette.len(), 4);
        assert_eq!(palette.color_bits(), 2);
        assert_eq!(palette.colors()[1], Color::new(85, 85, 85));
        assert_eq!(palette.index_of(&Color::WHITE), Some(3));
    }

    #[test]
    fn test_trailing_name_is_optional() {
        let palette = Palette::read(gpl("0 0 0\n255 255 255\n").as_bytes()).unwrap();
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn test_missing_signature() {
        let result = Palette::read("JASC-PAL\n0 0 0\n".as_bytes());
        assert!(matches!(result, Err(PaletteError::InvalidSignature)));

        let result = Palette::read("".as_bytes());
        assert!(matches!(result, Err(PaletteError::InvalidSignature)));
    }

    #[test]
    fn test_two_components_is_format_error() {
        let result = Palette::read(gpl("0 0 0\n12 34\n").as_bytes());
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            PaletteError::IncompleteColor { line: 6, found: 2 }
        ));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_component_out_of_range() {
        let result = Palette::read(gpl("0 0 256 Bad\n").as_bytes());
        assert!(matches!(
            result,
            Err(PaletteError::ComponentOutOfRange { line: 5 })
        ));
    }

    #[test]
    fn test_seventeenth_color_is_capacity_error() {
        let body: String = (0..17).map(|i| format!("{i} {i} {i} Grey\n")).collect();
        let err = Palette::read(gpl(&body).as_bytes()).unwrap_err();
        assert!(matches!(err, PaletteError::TooManyColors { max: 16 }));
        assert_eq!(err.kind(), ErrorKind::Capacity);
    }

    #[test]
    fn test_sixteen_colors_fit() {
        let body: String = (0..16).map(|i| format!("{i} {i} {i}\n")).collect();
        let palette = Palette::read(gpl(&body).as_bytes()).unwrap();
        assert_eq!(palette.len(), 16);
        assert_eq!(palette.color_bits(), 4);
    }

    #[test]
    fn test_no_colors() {
        let result = Palette::read(gpl("").as_bytes());
        assert!(matches!(result, Err(PaletteError::Empty)));
    }

    #[test]
    fn test_single_color_is_rejected() {
        let err = Palette::read(gpl("0 0 0 Black\n").as_bytes()).unwrap_err();
        assert!(matches!(err, PaletteError::TooFewColors { found: 1 }));
        assert_eq!(err.kind(), ErrorKind::Format);

        assert!(matches!(
            Palette::new(vec![Color::WHITE]),
            Err(PaletteError::TooFewColors { found: 1 })
        ));
    }

    #[test]
    fn test_default_is_black_and_white() {
        let palette = Palette::default();
        assert_eq!(palette.colors(), &[Color::BLACK, Color::WHITE]);
        assert_eq!(palette.color_bits(), 1);
    }
}
