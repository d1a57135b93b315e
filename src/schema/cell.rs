//! Cell kinds and colors.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Type byte of a fluid-capable (empty) cell.
pub const EMPTY: u8 = CellKind::Air as u8;
/// Type byte of cells that block light.
pub const OPAQUE: u8 = CellKind::Clay as u8;
/// Type byte of light emitters.
pub const EMITTER: u8 = CellKind::Light as u8;
/// Type byte written into a cell a granular particle has just moved into.
pub const SETTLED: u8 = CellKind::Sand as u8;

/// Kind of material held by a grid cell.
///
/// The discriminant is the byte stored in the cell-type buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum CellKind {
    /// Empty cell. May carry water mass.
    Air = 0,
    /// Solid wall. Blocks light and water.
    Clay = 1,
    /// Light emitter.
    Light = 2,
    /// Granular particle that falls and slides.
    Sand = 3,
    /// Brush-only kind: painting water writes air plus mass.
    Water = 4,
}

impl CellKind {
    pub const ALL: [CellKind; 5] = [
        CellKind::Air,
        CellKind::Clay,
        CellKind::Light,
        CellKind::Sand,
        CellKind::Water,
    ];

    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether this kind blocks light propagation.
    #[inline]
    pub fn is_opaque(self) -> bool {
        self.as_u8() == OPAQUE
    }

    /// Whether changing a cell to or from this kind invalidates the light field.
    #[inline]
    pub fn affects_light(self) -> bool {
        matches!(self, CellKind::Clay | CellKind::Light)
    }
}

impl TryFrom<u8> for CellKind {
    type Error = UnknownCellKind;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CellKind::ALL
            .into_iter()
            .find(|kind| kind.as_u8() == value)
            .ok_or(UnknownCellKind(value))
    }
}

/// A type byte that does not name any [`CellKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown cell kind {0}")]
pub struct UnknownCellKind(pub u8);

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    #[inline]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Mean of the three channels.
    #[inline]
    pub fn luma(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / 3.0
    }

    /// Randomly perturb each channel by up to `amount * luma`, then scale by `brightness`.
    ///
    /// Channels saturate at 0 and 255.
    pub fn jittered<R: Rng + ?Sized>(self, amount: f32, brightness: f32, rng: &mut R) -> Self {
        let spread = amount * 2.0 * self.luma();
        let mut channel = |c: u8| {
            let v = (c as f32 + (rng.r#gen::<f32>() - 0.5) * spread) * brightness;
            v.floor().clamp(0.0, 255.0) as u8
        };
        Self {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
        }
    }
}
