/// Output formats the converter can write.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Format {
    #[default]
    Pap,
    Ihex,
    Asm,
    Bin,
}

impl Format {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Output files are named after the format.
    pub fn extension(self) -> &'static str {
        self.name()
    }

    pub fn description(self) -> &'static str {
        match self {
            Format::Pap => "MOS Papertape (default)",
            Format::Ihex => "Intel HEX",
            Format::Asm => "CA65 assembly code",
            Format::Bin => "Binary bit-plane image",
        }
    }
}
