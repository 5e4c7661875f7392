use fixed::types::I48F16;

/// A length in millimetres, the canonical unit for every margin and
/// coordinate in this crate. Backed by fixed-point arithmetic so that
/// repeated margin sums stay exact and vertical keys are deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mm(I48F16);

impl Mm {
    pub const ZERO: Mm = Mm(I48F16::from_bits(0));

    pub fn from_f32(value: f32) -> Mm {
        if !value.is_finite() {
            return Mm::ZERO;
        }
        Mm(I48F16::saturating_from_num(value))
    }

    pub fn from_i32(value: i32) -> Mm {
        Mm(I48F16::from_num(value))
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    /// Vertical key for the float-margin map: `floor(value * 100)`,
    /// i.e. the position in whole hundredths of a millimetre. Positions
    /// closer together than 0.01mm collapse onto the same band row.
    /// Negative positions floor toward negative infinity.
    pub fn to_centi_i64(self) -> i64 {
        let scaled = (self.0.to_bits() as i128) * 100;
        scaled.div_euclid(1i128 << 16) as i64
    }

    pub fn max(self, other: Mm) -> Mm {
        if self >= other { self } else { other }
    }

    pub fn min(self, other: Mm) -> Mm {
        if self <= other { self } else { other }
    }

    pub fn abs(self) -> Mm {
        if self < Mm::ZERO { -self } else { self }
    }
}

impl std::ops::Add for Mm {
    type Output = Mm;
    fn add(self, rhs: Mm) -> Mm {
        Mm(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Mm {
    fn add_assign(&mut self, rhs: Mm) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Mm {
    type Output = Mm;
    fn sub(self, rhs: Mm) -> Mm {
        Mm(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::SubAssign for Mm {
    fn sub_assign(&mut self, rhs: Mm) {
        *self = *self - rhs;
    }
}

impl std::ops::Neg for Mm {
    type Output = Mm;
    fn neg(self) -> Mm {
        Mm(I48F16::ZERO.saturating_sub(self.0))
    }
}

impl std::ops::Mul<i32> for Mm {
    type Output = Mm;
    fn mul(self, rhs: i32) -> Mm {
        Mm(self.0.saturating_mul(I48F16::from_num(rhs)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Mm,
    pub height: Mm,
}

impl Size {
    pub fn a4() -> Self {
        Self {
            width: Mm::from_f32(210.0),
            height: Mm::from_f32(297.0),
        }
    }

    pub fn letter() -> Self {
        // 8.5in x 11in.
        Self {
            width: Mm::from_f32(215.9),
            height: Mm::from_f32(279.4),
        }
    }

    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width: Mm::from_f32(width_mm),
            height: Mm::from_f32(height_mm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageFormat {
    A4,
    Letter,
    Custom(Size),
}

impl PageFormat {
    /// Physical page dimensions for this format in the given
    /// orientation. Landscape swaps the portrait width and height.
    pub fn size(self, orientation: Orientation) -> Size {
        let portrait = match self {
            PageFormat::A4 => Size::a4(),
            PageFormat::Letter => Size::letter(),
            PageFormat::Custom(size) => size,
        };
        match orientation {
            Orientation::Portrait => portrait,
            Orientation::Landscape => Size {
                width: portrait.height,
                height: portrait.width,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centi_key_floors() {
        assert_eq!(Mm::from_f32(10.0).to_centi_i64(), 1000);
        assert_eq!(Mm::from_f32(10.009).to_centi_i64(), 1000);
        assert_eq!(Mm::from_f32(10.011).to_centi_i64(), 1001);
        assert_eq!(Mm::from_f32(0.0).to_centi_i64(), 0);
        assert_eq!(Mm::from_f32(-0.25).to_centi_i64(), -25);
        assert_eq!(Mm::from_f32(-10.5).to_centi_i64(), -1050);
    }

    #[test]
    fn positions_within_hundredth_share_a_key() {
        let a = Mm::from_f32(25.342);
        let b = Mm::from_f32(25.348);
        assert_eq!(a.to_centi_i64(), b.to_centi_i64());
    }

    #[test]
    fn arithmetic_round_trips() {
        let m = Mm::from_f32(12.5) + Mm::from_f32(7.5) - Mm::from_f32(5.0);
        assert_eq!(m, Mm::from_i32(15));
        assert_eq!((-Mm::from_i32(3)).abs(), Mm::from_i32(3));
        assert_eq!(Mm::from_i32(4) * 3, Mm::from_i32(12));
    }

    #[test]
    fn default_is_zero() {
        assert_eq!(Mm::default(), Mm::ZERO);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let portrait = PageFormat::A4.size(Orientation::Portrait);
        let landscape = PageFormat::A4.size(Orientation::Landscape);
        assert_eq!(portrait.width, landscape.height);
        assert_eq!(portrait.height, landscape.width);
    }
}
