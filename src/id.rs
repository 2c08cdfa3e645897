use std::{cmp, fmt, str};

use fstr::FStr;

/// Represents a Universally Unique IDentifier as four 32-bit parts.
///
/// Part 0 holds the most significant 32 bits and part 3 the least significant. The derived
/// ordering compares the parts in that order as unsigned integers, so it agrees with the
/// lexicographic order of the canonical string representation.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid([u32; 4]);

/// Maps each position of the 8-4-4-4-12 string to the part its hex digit belongs to. `-` marks
/// the fixed hyphen positions.
const TEMPLATE: &[u8; 36] = b"00000000-1111-1111-2222-222233333333";

impl Uuid {
    /// Nil UUID (00000000-0000-0000-0000-000000000000)
    pub const NIL: Self = Self([0; 4]);

    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff)
    pub const MAX: Self = Self([u32::MAX; 4]);

    /// Returns the zero value, which also marks an unset or unparsable identifier.
    pub const fn nil() -> Self {
        Self::NIL
    }

    /// Returns `true` if all the bits are zero.
    pub const fn is_nil(&self) -> bool {
        self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
    }

    /// Creates an object from four 32-bit parts, most significant first.
    pub const fn from_parts(parts: [u32; 4]) -> Self {
        Self(parts)
    }

    /// Returns a reference to the underlying parts, most significant first.
    pub const fn parts(&self) -> &[u32; 4] {
        &self.0
    }

    /// Returns the 16-byte big-endian representation.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut dst = [0u8; 16];
        for (chunk, part) in dst.chunks_exact_mut(4).zip(self.0) {
            chunk.copy_from_slice(&part.to_be_bytes());
        }
        dst
    }

    /// Compares two identifiers and returns `-1`, `0`, or `1` as `self` is less than, equal to,
    /// or greater than `other`.
    pub fn compare_three_way(&self, other: &Self) -> i32 {
        match self.cmp(other) {
            cmp::Ordering::Less => -1,
            cmp::Ordering::Equal => 0,
            cmp::Ordering::Greater => 1,
        }
    }

    /// Parses the 8-4-4-4-12 hexadecimal string representation, returning the nil UUID and
    /// `false` if `src` is malformed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid4ctr::Uuid;
    ///
    /// let (x, ok) = Uuid::parse_or_nil("2ca4b2ce-6c13-40d4-bccf-37d222820f6f");
    /// assert!(ok);
    /// assert_eq!(x.parts(), &[0x2ca4b2ce, 0x6c1340d4, 0xbccf37d2, 0x22820f6f]);
    ///
    /// let (y, ok) = Uuid::parse_or_nil("2ca4b2ce-6c13-40d4-bccf-37d222820f6g");
    /// assert!(!ok);
    /// assert!(y.is_nil());
    /// ```
    pub fn parse_or_nil(src: &str) -> (Self, bool) {
        match src.parse() {
            Ok(value) => (value, true),
            Err(_) => (Self::NIL, false),
        }
    }

    /// Returns the 8-4-4-4-12 hexadecimal string representation stored in a stack-allocated
    /// string type that can be dereferenced as `str` and [`Display`](fmt::Display)ed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use uuid4ctr::Uuid;
    ///
    /// let x = "2CA4B2CE-6C13-40D4-BCCF-37D222820F6F".parse::<Uuid>()?;
    /// let y = x.encode();
    /// assert_eq!(&y as &str, "2ca4b2ce-6c13-40d4-bccf-37d222820f6f");
    /// assert_eq!(format!("{}", y), "2ca4b2ce-6c13-40d4-bccf-37d222820f6f");
    /// # Ok::<(), uuid4ctr::ParseError>(())
    /// ```
    pub fn encode(&self) -> FStr<36> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";

        let bytes = self.to_bytes();
        let mut buffer = [0u8; 36];
        let mut buf_iter = buffer.iter_mut();
        for (i, e) in bytes.iter().enumerate() {
            let e = *e as usize;
            if let Some(b) = buf_iter.next() {
                *b = DIGITS[e >> 4];
            }
            if let Some(b) = buf_iter.next() {
                *b = DIGITS[e & 15];
            }
            if i == 3 || i == 5 || i == 7 || i == 9 {
                if let Some(b) = buf_iter.next() {
                    *b = b'-';
                }
            }
        }
        match FStr::from_inner(buffer) {
            Ok(encoded) => encoded,
            Err(_) => unreachable!("buffer consists of ASCII hex digits and hyphens only"),
        }
    }

    /// Reports the variant field value of the UUID or, if appropriate, "NIL" or "MAX".
    ///
    /// For convenience, this method reports [`Variant::Nil`] or [`Variant::Max`] if `self`
    /// represents the Nil or Max UUID, although the Nil and Max UUIDs are technically subsumed
    /// under the variants `0b0` and `0b111`, respectively.
    pub const fn variant(&self) -> Variant {
        match self.0[2] >> 28 {
            0b0000..=0b0111 => {
                if self.is_nil() {
                    Variant::Nil
                } else {
                    Variant::Var0
                }
            }
            0b1000..=0b1011 => Variant::Var10,
            0b1100..=0b1101 => Variant::Var110,
            _ => {
                if self.0[0] == u32::MAX
                    && self.0[1] == u32::MAX
                    && self.0[2] == u32::MAX
                    && self.0[3] == u32::MAX
                {
                    Variant::Max
                } else {
                    Variant::VarReserved
                }
            }
        }
    }

    /// Returns the version field value of the UUID or `None` if `self` does not have the variant
    /// field value of `0b10`.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(((self.0[1] >> 12) & 0xf) as u8),
            _ => None,
        }
    }
}

/// UUID variants defined by RFC 9562.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// Nil UUID (00000000-0000-0000-0000-000000000000).
    Nil,
    /// The variant field value of `0b0`.
    Var0,
    /// The variant field value of `0b10`, which this crate generates.
    Var10,
    /// The variant field value of `0b110`.
    Var110,
    /// The reserved variant field value of `0b111`.
    VarReserved,
    /// Max UUID (ffffffff-ffff-ffff-ffff-ffffffffffff).
    Max,
}

impl fmt::Display for Uuid {
    /// Returns the 8-4-4-4-12 canonical hexadecimal string representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 8-4-4-4-12 hexadecimal string representation.
    ///
    /// Hex digits are case-insensitive; surrounding whitespace, braces, and missing or moved
    /// hyphens are rejected.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        const ERR: ParseError = ParseError {};
        let src = src.as_bytes();
        if src.len() != TEMPLATE.len() {
            return Err(ERR);
        }

        let mut dst = [0u32; 4];
        for (&c, &t) in src.iter().zip(TEMPLATE) {
            if t == b'-' {
                if c != b'-' {
                    return Err(ERR);
                }
            } else {
                let digit = char::from(c).to_digit(16).ok_or(ERR)?;
                let part = &mut dst[usize::from(t - b'0')];
                *part = (*part << 4) | digit;
            }
        }
        Ok(Self(dst))
    }
}

impl From<Uuid> for [u32; 4] {
    fn from(src: Uuid) -> Self {
        src.0
    }
}

impl From<[u32; 4]> for Uuid {
    fn from(src: [u32; 4]) -> Self {
        Self(src)
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        let mut dst = [0u32; 4];
        for (part, chunk) in dst.iter_mut().zip(src.chunks_exact(4)) {
            *part = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(dst)
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        Self::from_be_bytes(src.to_bytes())
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self::from(src.to_be_bytes())
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        src.parse()
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        src.parse()
    }
}

/// Error parsing an invalid string representation of UUID.
#[derive(Clone, Eq, PartialEq, Hash, Debug, thiserror::Error)]
#[error("invalid string representation")]
pub struct ParseError {}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use super::Uuid;

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            uuid::Uuid::from_bytes(src.to_bytes())
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from(src.into_bytes())
        }
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(VisitorImpl)
            } else {
                deserializer.deserialize_bytes(VisitorImpl)
            }
        }
    }

    struct VisitorImpl;

    impl<'de> de::Visitor<'de> for VisitorImpl {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "a UUID representation")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            value.parse::<Self::Value>().map_err(de::Error::custom)
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            <[u8; 16]>::try_from(value)
                .map(Self::Value::from)
                .map_err(de::Error::custom)
        }
    }

}
