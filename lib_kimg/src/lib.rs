pub mod constants;
pub mod convert;
pub mod error;
pub mod header;
pub mod options;
pub mod output;
pub mod palette;
pub mod planes;

use log::*;
use std::io::Write;

pub use crate::convert::{convert_image, run, ConvertError, Summary};
pub use crate::error::ErrorKind;
pub use crate::options::{BaseAddress, Options};
pub use crate::output::{write_image, Format};
pub use crate::palette::{Color, Palette};
pub use crate::planes::{convert_to_planes, BitPlaneImage};

pub fn init_logging(level: LevelFilter) {
    env_logger::Builder::new()
        .target(env_logger::Target::Stderr)
        .filter(Some("lib_kimg"), level)
        .filter(Some("kimg"), level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
