use std::fmt;

use serde::Serialize;

use crate::shape::PrimitiveKind;

/// A scalar value tagged with its Rust type
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Primitive {
    /// `bool`
    Bool(bool),
    /// `char`
    Char(char),
    /// `i8`
    I8(i8),
    /// `i16`
    I16(i16),
    /// `i32`
    I32(i32),
    /// `i64`
    I64(i64),
    /// `i128`
    I128(i128),
    /// `isize`
    Isize(isize),
    /// `u8`
    U8(u8),
    /// `u16`
    U16(u16),
    /// `u32`
    U32(u32),
    /// `u64`
    U64(u64),
    /// `u128`
    U128(u128),
    /// `usize`
    Usize(usize),
    /// `f32`
    F32(f32),
    /// `f64`
    F64(f64),
}

/// `$value as $target` for every source that Rust allows to be cast to an integer
macro_rules! as_integer {
    ($value:expr, $target:ty) => {
        match $value {
            Primitive::Bool(v) => <$target>::from(v),
            Primitive::Char(v) => v as $target,
            Primitive::I8(v) => v as $target,
            Primitive::I16(v) => v as $target,
            Primitive::I32(v) => v as $target,
            Primitive::I64(v) => v as $target,
            Primitive::I128(v) => v as $target,
            Primitive::Isize(v) => v as $target,
            Primitive::U8(v) => v as $target,
            Primitive::U16(v) => v as $target,
            Primitive::U32(v) => v as $target,
            Primitive::U64(v) => v as $target,
            Primitive::U128(v) => v as $target,
            Primitive::Usize(v) => v as $target,
            Primitive::F32(v) => v as $target,
            Primitive::F64(v) => v as $target,
        }
    };
}

/// `$value as $target` for numeric sources; `None` for `bool` and `char`
macro_rules! as_float {
    ($value:expr, $target:ty) => {
        match $value {
            Primitive::Bool(_) | Primitive::Char(_) => None,
            Primitive::I8(v) => Some(<$target>::from(v)),
            Primitive::I16(v) => Some(<$target>::from(v)),
            Primitive::I32(v) => Some(v as $target),
            Primitive::I64(v) => Some(v as $target),
            Primitive::I128(v) => Some(v as $target),
            Primitive::Isize(v) => Some(v as $target),
            Primitive::U8(v) => Some(<$target>::from(v)),
            Primitive::U16(v) => Some(<$target>::from(v)),
            Primitive::U32(v) => Some(v as $target),
            Primitive::U64(v) => Some(v as $target),
            Primitive::U128(v) => Some(v as $target),
            Primitive::Usize(v) => Some(v as $target),
            Primitive::F32(v) => Some(v as $target),
            Primitive::F64(v) => Some(v as $target),
        }
    };
}

impl Primitive {
    /// The Rust type this value holds
    pub const fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::I128(_) => PrimitiveKind::I128,
            Self::Isize(_) => PrimitiveKind::Isize,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::U128(_) => PrimitiveKind::U128,
            Self::Usize(_) => PrimitiveKind::Usize,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
        }
    }

    /// Convert to `target` with `as` semantics
    ///
    /// Integer narrowing truncates, float to integer saturates. Returns `None` when
    /// [`PrimitiveKind::is_castable_to`] would refuse the pair.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap,
        clippy::cast_precision_loss,
        clippy::cast_lossless,
        clippy::unnecessary_cast,
        reason = "casts deliberately follow `as` semantics"
    )]
    pub fn cast(self, target: PrimitiveKind) -> Option<Self> {
        if self.kind() == target {
            return Some(self);
        }
        let cast = match target {
            PrimitiveKind::Bool => return None,
            PrimitiveKind::Char => match self {
                Self::U8(v) => Self::Char(char::from(v)),
                _ => return None,
            },
            PrimitiveKind::I8 => Self::I8(as_integer!(self, i8)),
            PrimitiveKind::I16 => Self::I16(as_integer!(self, i16)),
            PrimitiveKind::I32 => Self::I32(as_integer!(self, i32)),
            PrimitiveKind::I64 => Self::I64(as_integer!(self, i64)),
            PrimitiveKind::I128 => Self::I128(as_integer!(self, i128)),
            PrimitiveKind::Isize => Self::Isize(as_integer!(self, isize)),
            PrimitiveKind::U8 => Self::U8(as_integer!(self, u8)),
            PrimitiveKind::U16 => Self::U16(as_integer!(self, u16)),
            PrimitiveKind::U32 => Self::U32(as_integer!(self, u32)),
            PrimitiveKind::U64 => Self::U64(as_integer!(self, u64)),
            PrimitiveKind::U128 => Self::U128(as_integer!(self, u128)),
            PrimitiveKind::Usize => Self::Usize(as_integer!(self, usize)),
            PrimitiveKind::F32 => Self::F32(as_float!(self, f32)?),
            PrimitiveKind::F64 => Self::F64(as_float!(self, f64)?),
        };
        Some(cast)
    }

    /// An enum discriminant expressed in the enum's underlying representation
    pub fn from_discriminant(underlying: PrimitiveKind, discriminant: i128) -> Option<Self> {
        if !underlying.is_integer() {
            return None;
        }
        Self::I128(discriminant).cast(underlying)
    }

    /// The enum discriminant this integer denotes; `None` for non-integers
    pub fn to_discriminant(self) -> Option<i128> {
        if !self.kind().is_integer() {
            return None;
        }
        match self.cast(PrimitiveKind::I128)? {
            Self::I128(discriminant) => Some(discriminant),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => fmt::Display::fmt(v, f),
            Self::Char(v) => fmt::Display::fmt(v, f),
            Self::I8(v) => fmt::Display::fmt(v, f),
            Self::I16(v) => fmt::Display::fmt(v, f),
            Self::I32(v) => fmt::Display::fmt(v, f),
            Self::I64(v) => fmt::Display::fmt(v, f),
            Self::I128(v) => fmt::Display::fmt(v, f),
            Self::Isize(v) => fmt::Display::fmt(v, f),
            Self::U8(v) => fmt::Display::fmt(v, f),
            Self::U16(v) => fmt::Display::fmt(v, f),
            Self::U32(v) => fmt::Display::fmt(v, f),
            Self::U64(v) => fmt::Display::fmt(v, f),
            Self::U128(v) => fmt::Display::fmt(v, f),
            Self::Usize(v) => fmt::Display::fmt(v, f),
            Self::F32(v) => fmt::Display::fmt(v, f),
            Self::F64(v) => fmt::Display::fmt(v, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cast_narrows_like_as() {
        assert_eq!(
            Primitive::I32(300).cast(PrimitiveKind::U8),
            Some(Primitive::U8(44))
        );
        assert_eq!(
            Primitive::F64(3.9).cast(PrimitiveKind::I16),
            Some(Primitive::I16(3))
        );
        assert_eq!(
            Primitive::F64(1e20).cast(PrimitiveKind::I32),
            Some(Primitive::I32(i32::MAX))
        );
        assert_eq!(
            Primitive::Bool(true).cast(PrimitiveKind::U64),
            Some(Primitive::U64(1))
        );
        assert_eq!(
            Primitive::U8(65).cast(PrimitiveKind::Char),
            Some(Primitive::Char('A'))
        );
    }

    #[test]
    fn test_cast_refuses_non_as_pairs() {
        assert_eq!(Primitive::I32(1).cast(PrimitiveKind::Bool), None);
        assert_eq!(Primitive::Bool(true).cast(PrimitiveKind::F32), None);
        assert_eq!(Primitive::U16(65).cast(PrimitiveKind::Char), None);
    }

    #[test]
    fn test_from_discriminant_uses_underlying_width() {
        assert_eq!(
            Primitive::from_discriminant(PrimitiveKind::U8, 2),
            Some(Primitive::U8(2))
        );
        assert_eq!(Primitive::from_discriminant(PrimitiveKind::F32, 2), None);
    }

    #[test]
    fn test_to_discriminant_accepts_integers_only() {
        assert_eq!(Primitive::U8(2).to_discriminant(), Some(2));
        assert_eq!(Primitive::I64(-3).to_discriminant(), Some(-3));
        assert_eq!(Primitive::F64(2.0).to_discriminant(), None);
    }

    #[test]
    fn test_display_is_plain_value() {
        assert_eq!(Primitive::I64(-7).to_string(), "-7");
        assert_eq!(Primitive::Bool(false).to_string(), "false");
        assert_eq!(Primitive::Char('x').to_string(), "x");
    }
}
