use core::fmt::{self, Write};
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::FixedError;

/// 32-bit Q16.16 fixed-point number with saturating arithmetic.
///
/// Range: -32768.0 to 32767.9999847412109375
/// Precision: 1/65536
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fx32 {
    raw: i32,
}

// ============================================================================
// Constants
// ============================================================================

impl Fx32 {
    /// Number of fractional bits in the representation.
    pub const FRACTIONAL_BITS: u32 = 16;

    /// Raw value of 1.0: 2^16
    pub const ONE_RAW: i32 = 1 << Self::FRACTIONAL_BITS;

    /// Largest raw value; every arithmetic result is clamped to it.
    pub const MAX_RAW: i32 = i32::MAX;

    /// Smallest raw value; every arithmetic result is clamped to it.
    pub const MIN_RAW: i32 = i32::MIN;

    /// Largest integer `from_int` stores without saturating.
    pub const MAX_INT: i32 = Self::MAX_RAW >> Self::FRACTIONAL_BITS;

    /// Smallest integer `from_int` stores without saturating.
    pub const MIN_INT: i32 = Self::MIN_RAW >> Self::FRACTIONAL_BITS;

    /// Maximum value: 32767.9999847412109375
    pub const MAX: Self = Self { raw: Self::MAX_RAW };

    /// Minimum value: -32768.0
    pub const MIN: Self = Self { raw: Self::MIN_RAW };

    /// Zero
    pub const ZERO: Self = Self { raw: 0 };

    /// One (1.0)
    pub const ONE: Self = Self { raw: Self::ONE_RAW };

    /// Minus one (-1.0)
    pub const MINUS_ONE: Self = Self { raw: -Self::ONE_RAW };

    /// Two (2.0)
    pub const TWO: Self = Self {
        raw: 2 * Self::ONE_RAW,
    };

    /// One half (0.5)
    pub const HALF: Self = Self {
        raw: Self::ONE_RAW / 2,
    };

    /// Smallest positive value (1/65536)
    pub const EPSILON: Self = Self { raw: 1 };

    /// Decimal digits needed to write any fraction exactly: 2^-16 = 5^16 / 10^16
    const FRACTION_DIGITS: usize = 16;

    /// 5^16, converts between sixteen decimal fraction digits and 1/65536 units
    const FIVE_POW_16: u64 = 152_587_890_625;
}

impl Default for Fx32 {
    fn default() -> Self {
        Self::ZERO
    }
}

// ============================================================================
// Constructors and Raw Access
// ============================================================================

impl Fx32 {
    /// Creates a value from its raw Q16.16 bits, stored verbatim.
    #[inline(always)]
    pub const fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    /// Returns the raw Q16.16 bits (the value times 65536).
    #[inline(always)]
    pub const fn to_raw(self) -> i32 {
        self.raw
    }

    /// Creates a value from an integer.
    ///
    /// Integers outside `MIN_INT..=MAX_INT` saturate to `MIN` or `MAX`, the
    /// same policy arithmetic uses.
    #[inline(always)]
    pub const fn from_int(value: i32) -> Self {
        Self {
            raw: saturate((value as i64) << Self::FRACTIONAL_BITS),
        }
    }

    /// Creates a value from an integer, or `None` if it does not fit.
    #[inline(always)]
    pub const fn checked_from_int(value: i32) -> Option<Self> {
        if value < Self::MIN_INT || value > Self::MAX_INT {
            None
        } else {
            Some(Self {
                raw: value << Self::FRACTIONAL_BITS,
            })
        }
    }

    /// Returns the integer part, rounded toward negative infinity.
    #[inline(always)]
    pub const fn to_int(self) -> i32 {
        self.raw >> Self::FRACTIONAL_BITS
    }
}

// ============================================================================
// Arithmetic Operations - Addition and Subtraction
// ============================================================================

impl Fx32 {
    /// Checked addition. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.raw.checked_add(rhs.raw) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating addition. Clamps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self {
            raw: saturate(self.raw as i64 + rhs.raw as i64),
        }
    }

    /// Checked subtraction. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.raw.checked_sub(rhs.raw) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating subtraction. Clamps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self {
            raw: saturate(self.raw as i64 - rhs.raw as i64),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Multiplication
// ============================================================================

impl Fx32 {
    /// Full-width product rescaled to Q16.16.
    ///
    /// The arithmetic shift rounds toward negative infinity.
    #[inline(always)]
    const fn mul_wide(self, rhs: Self) -> i64 {
        (self.raw as i64 * rhs.raw as i64) >> Self::FRACTIONAL_BITS
    }

    /// Checked multiplication. Returns `None` if overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        match narrow(self.mul_wide(rhs)) {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating multiplication. Clamps on overflow.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_mul(self, rhs: Self) -> Self {
        Self {
            raw: saturate(self.mul_wide(rhs)),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Division
// ============================================================================

impl Fx32 {
    /// Dividend widened and shifted up by 16 bits before the truncating
    /// division, so the quotient keeps its fractional bits.
    ///
    /// Returns `None` if `rhs` is zero. The quotient never exceeds 2^47 in
    /// magnitude, so it cannot overflow i64.
    #[inline(always)]
    const fn div_wide(self, rhs: Self) -> Option<i64> {
        if rhs.raw == 0 {
            return None;
        }
        Some(((self.raw as i64) << Self::FRACTIONAL_BITS) / rhs.raw as i64)
    }

    /// Checked division. Returns `None` if `rhs` is zero or overflow occurred.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_div(self, rhs: Self) -> Option<Self> {
        match self.div_wide(rhs) {
            Some(quotient) => match narrow(quotient) {
                Some(raw) => Some(Self { raw }),
                None => None,
            },
            None => None,
        }
    }

    /// Saturating division. Clamps on overflow.
    ///
    /// # Errors
    /// Returns `FixedError::DivideByZero` if `rhs` is zero.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn try_div(self, rhs: Self) -> crate::Result<Self> {
        match self.div_wide(rhs) {
            Some(quotient) => Ok(Self {
                raw: saturate(quotient),
            }),
            None => Err(FixedError::DivideByZero),
        }
    }
}

// ============================================================================
// Arithmetic Operations - Negation
// ============================================================================

impl Fx32 {
    /// Checked negation. Returns `None` for `MIN`, whose negation does not fit.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn checked_neg(self) -> Option<Self> {
        match self.raw.checked_neg() {
            Some(raw) => Some(Self { raw }),
            None => None,
        }
    }

    /// Saturating negation. `-MIN` becomes `MAX`.
    #[inline(always)]
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub const fn saturating_neg(self) -> Self {
        Self {
            raw: self.raw.saturating_neg(),
        }
    }
}

// ============================================================================
// Sign Operations
// ============================================================================

impl Fx32 {
    /// Returns `true` if `self` is positive.
    #[inline(always)]
    pub const fn is_positive(self) -> bool {
        self.raw > 0
    }

    /// Returns `true` if `self` is negative.
    #[inline(always)]
    pub const fn is_negative(self) -> bool {
        self.raw < 0
    }

    /// Returns `true` if `self` is zero.
    #[inline(always)]
    pub const fn is_zero(self) -> bool {
        self.raw == 0
    }

    /// Returns the sign of `self` as -1, 0, or 1.
    #[inline(always)]
    pub const fn signum(self) -> i32 {
        self.raw.signum()
    }
}

// ============================================================================
// Integer Power
// ============================================================================

impl Fx32 {
    /// Raises `self` to an integer power.
    ///
    /// Uses exponentiation by squaring over the bits of `|exponent|`, so at
    /// most 32 rounds of saturating multiplication run. `exponent == 0`
    /// yields `ONE` for every base, zero included. A negative exponent
    /// computes the positive power and returns its reciprocal.
    ///
    /// # Errors
    /// Returns `FixedError::DivideByZero` if the exponent is negative and the
    /// positive power is zero.
    #[must_use = "this returns the result of the operation, without modifying the original"]
    pub fn pow(self, exponent: i32) -> crate::Result<Self> {
        if exponent == 0 {
            return Ok(Self::ONE);
        }

        let mut remaining = exponent.unsigned_abs();
        let mut base = self;
        let mut result = Self::ONE;

        while remaining > 0 {
            if remaining & 1 == 1 {
                result = result.saturating_mul(base);
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.saturating_mul(base);
            }
        }

        if exponent > 0 {
            return Ok(result);
        }

        if result.is_zero() {
            log::trace!(
                "pow({:?}, {}) underflowed to zero before taking the reciprocal",
                self,
                exponent
            );
        }
        Self::ONE.try_div(result)
    }
}

// ============================================================================
// Float Conversions
// ============================================================================

impl Fx32 {
    /// Creates a value from an f32, truncating toward zero.
    ///
    /// The scaling runs in f32 precision. NaN becomes zero and values past
    /// the range saturate.
    #[inline(always)]
    pub fn from_f32(value: f32) -> Self {
        Self {
            raw: (value * Self::ONE_RAW as f32) as i32,
        }
    }

    /// Creates a value from an f64, truncating toward zero.
    ///
    /// NaN becomes zero and values past the range saturate.
    #[inline(always)]
    pub fn from_f64(value: f64) -> Self {
        Self {
            raw: (value * Self::ONE_RAW as f64) as i32,
        }
    }

    /// Converts to f32.
    ///
    /// Note: f32 holds 24 significant bits, so large values lose their low
    /// fractional bits.
    #[inline(always)]
    pub fn to_f32(self) -> f32 {
        self.raw as f32 / Self::ONE_RAW as f32
    }

    /// Converts to f64. Exact for every value.
    #[inline(always)]
    pub fn to_f64(self) -> f64 {
        self.raw as f64 / Self::ONE_RAW as f64
    }
}

// ============================================================================
// String Parsing
// ============================================================================

impl Fx32 {
    /// Parses a base-10 string into an `Fx32` without going through a float.
    ///
    /// Supports formats like: "3", "-3", "+3.25", ".5", "0.0000152587890625".
    /// The value is scaled by 65536 and truncated toward zero. Fraction
    /// digits past the sixteenth are validated but cannot change the result.
    ///
    /// Usable in `const` items, which is how the [`crate::math`] constants
    /// are built.
    ///
    /// # Errors
    /// Returns `FixedError::InvalidFormat` if the string is not a decimal.
    /// Returns `FixedError::Overflow` if the value is outside the Q16.16 range.
    pub const fn from_decimal_str(s: &str) -> crate::Result<Self> {
        let bytes = s.as_bytes().trim_ascii();
        let len = bytes.len();

        if len == 0 {
            return Err(FixedError::InvalidFormat);
        }

        let (is_negative, mut pos) = match bytes[0] {
            b'-' => (true, 1),
            b'+' => (false, 1),
            _ => (false, 0),
        };

        // Integer part, bounded so long digit runs cannot overflow u64
        let integer_limit = 1u64 << (31 - Self::FRACTIONAL_BITS);
        let mut integer = 0u64;
        let mut integer_digits = 0usize;
        while pos < len && bytes[pos] != b'.' {
            let digit = bytes[pos].wrapping_sub(b'0');
            if digit > 9 {
                return Err(FixedError::InvalidFormat);
            }
            integer = integer * 10 + digit as u64;
            if integer > integer_limit {
                return Err(FixedError::Overflow);
            }
            integer_digits += 1;
            pos += 1;
        }

        // Fractional part, kept as exactly sixteen decimal digits
        let mut fraction = 0u64;
        let mut fraction_digits = 0usize;
        if pos < len {
            pos += 1;
            if pos == len {
                return Err(FixedError::InvalidFormat);
            }
            while pos < len {
                let digit = bytes[pos].wrapping_sub(b'0');
                if digit > 9 {
                    return Err(FixedError::InvalidFormat);
                }
                if fraction_digits < Self::FRACTION_DIGITS {
                    fraction = fraction * 10 + digit as u64;
                    fraction_digits += 1;
                }
                pos += 1;
            }
        } else if integer_digits == 0 {
            return Err(FixedError::InvalidFormat);
        }

        while fraction_digits < Self::FRACTION_DIGITS {
            fraction *= 10;
            fraction_digits += 1;
        }

        // fraction / 10^16 * 2^16 == fraction / 5^16, floored
        let magnitude = (integer << Self::FRACTIONAL_BITS) + fraction / Self::FIVE_POW_16;

        let raw = if is_negative {
            if magnitude > Self::MIN_RAW.unsigned_abs() as u64 {
                return Err(FixedError::Overflow);
            }
            (-(magnitude as i64)) as i32
        } else {
            if magnitude > Self::MAX_RAW as u64 {
                return Err(FixedError::Overflow);
            }
            magnitude as i32
        };

        Ok(Self { raw })
    }

    /// Returns a display adapter that writes the exact decimal value.
    ///
    /// Every Q16.16 value has a finite decimal expansion of at most sixteen
    /// fraction digits, so [`Fx32::from_decimal_str`] reads the output back
    /// to the same bits.
    #[inline(always)]
    pub const fn exact(self) -> Exact {
        Exact(self)
    }
}

impl FromStr for Fx32 {
    type Err = FixedError;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal_str(s)
    }
}

// ============================================================================
// Operator Overloading
// ============================================================================

impl Add for Fx32 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        self.saturating_add(rhs)
    }
}

impl Sub for Fx32 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        self.saturating_sub(rhs)
    }
}

impl Mul for Fx32 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        self.saturating_mul(rhs)
    }
}

impl Div for Fx32 {
    type Output = Self;

    /// Saturating division.
    ///
    /// # Panics
    /// Panics if `rhs` is zero, like integer division. Use [`Fx32::try_div`]
    /// to get `FixedError::DivideByZero` instead.
    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        match self.try_div(rhs) {
            Ok(quotient) => quotient,
            Err(_) => panic!("attempt to divide by zero"),
        }
    }
}

impl Neg for Fx32 {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.saturating_neg()
    }
}

impl AddAssign for Fx32 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fx32 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fx32 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fx32 {
    #[inline(always)]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Writes an [`Fx32`] as its exact decimal value, see [`Fx32::exact`].
#[derive(Copy, Clone)]
pub struct Exact(Fx32);

impl fmt::Display for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raw = self.0.raw;
        let magnitude = raw.unsigned_abs() as u64;
        let integer = magnitude >> Fx32::FRACTIONAL_BITS;
        let mut fraction = (magnitude & (Fx32::ONE_RAW as u64 - 1)) * Fx32::FIVE_POW_16;

        let mut buffer = StackBuffer::new();
        if raw < 0 {
            buffer.write_str("-")?;
        }
        write!(buffer, "{integer}")?;

        if fraction != 0 {
            let mut digits = Fx32::FRACTION_DIGITS;
            while fraction % 10 == 0 {
                fraction /= 10;
                digits -= 1;
            }
            write!(buffer, ".{fraction:0digits$}")?;
        }
        pad(f, buffer.as_str()?)
    }
}

impl fmt::Debug for Exact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Always four fraction digits of the f32 value, e.g. `3.1416`, with ties
/// rounded away from zero. Width, fill and alignment are honored; a
/// requested precision is not.
///
/// A display convenience; use [`Fx32::exact`] for text that parses back to
/// the same bits.
impl fmt::Display for Fx32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round to f32 first so large values print what to_f32 holds. The
        // rounded value is still a whole number of 1/65536 units.
        let magnitude = (self.raw as f32 as i64).unsigned_abs();
        let half = Fx32::ONE_RAW as u64 / 2;
        let scaled = (magnitude * DISPLAY_SCALE + half) >> Fx32::FRACTIONAL_BITS;

        let mut buffer = StackBuffer::new();
        if self.raw < 0 {
            buffer.write_str("-")?;
        }
        write!(
            buffer,
            "{}.{:04}",
            scaled / DISPLAY_SCALE,
            scaled % DISPLAY_SCALE
        )?;
        pad(f, buffer.as_str()?)
    }
}

impl fmt::Debug for Fx32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // {:#?} shows raw internals
            f.debug_struct("Fx32").field("raw", &self.raw).finish()
        } else {
            write!(f, "Fx32({})", self.exact())
        }
    }
}

// ============================================================================
// Iterator Trait Implementations
// ============================================================================

impl Sum for Fx32 {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Fx32> for Fx32 {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + *x)
    }
}

impl Product for Fx32 {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

impl<'a> Product<&'a Fx32> for Fx32 {
    fn product<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * *x)
    }
}

// ============================================================================
// Serde Support
// ============================================================================

#[cfg(feature = "serde")]
impl Serialize for Fx32 {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Textual in every format, exact so it reads back bit-for-bit
        serializer.collect_str(&self.exact())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Fx32 {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = alloc::string::String::deserialize(deserializer)?;
        Self::from_decimal_str(&s).map_err(de::Error::custom)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// 10^4, the four fraction digits `Display` prints.
const DISPLAY_SCALE: u64 = 10_000;

/// Fixed-size text buffer, long enough for "-32767.9999847412109375".
struct StackBuffer {
    bytes: [u8; 32],
    len: usize,
}

impl StackBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; 32],
            len: 0,
        }
    }

    fn as_str(&self) -> Result<&str, fmt::Error> {
        core::str::from_utf8(&self.bytes[..self.len]).map_err(|_| fmt::Error)
    }
}

impl Write for StackBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.bytes.len() {
            return Err(fmt::Error);
        }
        self.bytes[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Writes `text` honoring the formatter's width, fill and alignment.
/// Numbers align right unless asked otherwise.
fn pad(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let padding = match f.width() {
        Some(width) if width > text.len() => width - text.len(),
        _ => return f.write_str(text),
    };
    let (before, after) = match f.align() {
        Some(fmt::Alignment::Left) => (0, padding),
        Some(fmt::Alignment::Center) => (padding / 2, padding - padding / 2),
        Some(fmt::Alignment::Right) | None => (padding, 0),
    };

    let fill = f.fill();
    for _ in 0..before {
        f.write_char(fill)?;
    }
    f.write_str(text)?;
    for _ in 0..after {
        f.write_char(fill)?;
    }
    Ok(())
}

/// Clamps a widened intermediate into the i32 range.
#[inline(always)]
const fn saturate(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

/// Narrows a widened intermediate, or `None` if it does not fit in i32.
#[inline(always)]
const fn narrow(value: i64) -> Option<i32> {
    if value > i32::MAX as i64 || value < i32::MIN as i64 {
        None
    } else {
        Some(value as i32)
    }
}
