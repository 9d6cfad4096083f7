//! Avatar color assignment.
//!
//! A name is hashed with the 32-bit polynomial string hash
//! (`h = 31 * h + unit` over UTF-16 code units, wrapping) and the unsigned
//! absolute value of the hash, modulo the palette size, picks the color.
//! The only contract is that equal names always get equal colors.

use serde::Serialize;

/// The fixed, ordered avatar palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PastelColor {
    Pink,
    Mint,
    Peach,
    Lavender,
    Salad,
    Orange,
    Aquamarine,
    Salmon,
}

impl PastelColor {
    /// Palette order; indices are what the name hash selects.
    pub const PALETTE: [PastelColor; 8] = [
        PastelColor::Pink,
        PastelColor::Mint,
        PastelColor::Peach,
        PastelColor::Lavender,
        PastelColor::Salad,
        PastelColor::Orange,
        PastelColor::Aquamarine,
        PastelColor::Salmon,
    ];

    /// `#RRGGBB` code of the color.
    pub fn hex(self) -> &'static str {
        match self {
            Self::Pink => "#F8BBD0",
            Self::Mint => "#B2DFDB",
            Self::Peach => "#FFDAB9",
            Self::Lavender => "#D1C4E9",
            Self::Salad => "#DCEDC8",
            Self::Orange => "#FFE0B2",
            Self::Aquamarine => "#A7FFEB",
            Self::Salmon => "#FFAB91",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pink => "pink",
            Self::Mint => "mint",
            Self::Peach => "peach",
            Self::Lavender => "lavender",
            Self::Salad => "salad",
            Self::Orange => "orange",
            Self::Aquamarine => "aquamarine",
            Self::Salmon => "salmon",
        }
    }
}

/// 32-bit polynomial hash over the UTF-16 encoding of `s`.
pub fn name_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Pick the avatar color for a display name.
pub fn color_for(name: &str) -> PastelColor {
    let palette = &PastelColor::PALETTE;
    let index = name_hash(name).unsigned_abs() as usize % palette.len();
    palette[index]
}
