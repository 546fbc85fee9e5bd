use std::fmt;

/// Coarse classification shared by every stage error, so callers can react to
/// the kind of failure without matching on each stage's variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed palette or header text.
    Format,
    /// The image uses a color the palette does not have, or the counts disagree.
    PaletteMismatch,
    /// Declared width*height differs from the parsed pixel count.
    DimensionMismatch,
    /// A fixed maximum was exceeded.
    Capacity,
    /// A required section or marker never showed up.
    MissingData,
    /// Open, read or write failure.
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Format => "format error",
            ErrorKind::PaletteMismatch => "palette mismatch",
            ErrorKind::DimensionMismatch => "dimension mismatch",
            ErrorKind::Capacity => "capacity exceeded",
            ErrorKind::MissingData => "missing data",
            ErrorKind::Io => "I/O error",
        };
        f.write_str(name)
    }
}
