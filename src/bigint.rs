//! Arbitrary-precision integers.
//!
//! This is a private module. Its public items are re-exported by the
//! parent.
//!
//! The integer codec does not care which big number engine does its
//! arithmetic. The narrow contract it relies upon is captured by the
//! [`BigNum`] trait; the engine actually used is selected at compile time
//! through the private `Backend` alias. The public face of all this is
//! [`Int`], the value stored in decoded INTEGER and ENUMERATED values.

use std::fmt;


//------------ BigNum --------------------------------------------------------

/// The arithmetic contract of a big number engine.
///
/// Implementations represent signed integers of arbitrary magnitude.
/// Values are immutable: every operation returns a new instance and leaves
/// its operands untouched. Three-way comparison is covered by the `Ord`
/// supertrait.
pub trait BigNum: Clone + fmt::Debug + Eq + Ord + Sized {
    /// Creates a value from a native integer.
    fn from_i64(value: i64) -> Self;

    /// Creates a value from a base 10 string.
    ///
    /// Returns `None` if the string is not a decimal integer.
    fn from_dec_str(value: &str) -> Option<Self>;

    /// Returns the value as a native integer if it fits.
    fn to_i64(&self) -> Option<i64>;

    /// Returns the value as a base 10 string.
    fn to_dec_string(&self) -> String;

    /// Returns whether the value is less than zero.
    fn is_negative(&self) -> bool;

    /// Returns the sum of the value and `rhs`.
    fn add(&self, rhs: &Self) -> Self;

    /// Returns the value with `rhs` subtracted.
    fn sub(&self, rhs: &Self) -> Self;

    /// Returns the product of the value and `rhs`.
    fn mul(&self, rhs: &Self) -> Self;

    /// Returns the value modulo `rhs`.
    ///
    /// This is the mathematical modulus, not the truncating remainder:
    /// the result takes the sign of `rhs`.
    fn modulus(&self, rhs: &Self) -> Self;

    /// Returns the value raised to the power of `exp`.
    fn pow(&self, exp: u32) -> Self;

    /// Returns the value shifted left by `bits` bits.
    fn shl(&self, bits: usize) -> Self;

    /// Returns the value shifted right by `bits` bits.
    ///
    /// The shift is arithmetic, i.e., it keeps the sign and rounds
    /// towards negative infinity.
    fn shr(&self, bits: usize) -> Self;

    /// Returns the absolute value.
    fn abs(&self) -> Self;
}

impl BigNum for num_bigint::BigInt {
    fn from_i64(value: i64) -> Self {
        value.into()
    }

    fn from_dec_str(value: &str) -> Option<Self> {
        value.parse().ok()
    }

    fn to_i64(&self) -> Option<i64> {
        num_traits::ToPrimitive::to_i64(self)
    }

    fn to_dec_string(&self) -> String {
        self.to_str_radix(10)
    }

    fn is_negative(&self) -> bool {
        num_traits::Signed::is_negative(self)
    }

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn modulus(&self, rhs: &Self) -> Self {
        num_integer::Integer::mod_floor(self, rhs)
    }

    fn pow(&self, exp: u32) -> Self {
        num_traits::Pow::pow(self, exp)
    }

    fn shl(&self, bits: usize) -> Self {
        self << bits
    }

    fn shr(&self, bits: usize) -> Self {
        self >> bits
    }

    fn abs(&self) -> Self {
        num_traits::Signed::abs(self)
    }
}


//------------ Int -----------------------------------------------------------

/// The concrete engine behind [`Int`].
///
/// Swapping the engine only requires changing this alias to another
/// [`BigNum`] implementation.
type Backend = num_bigint::BigInt;

/// A signed integer of arbitrary magnitude.
///
/// This is the value carried by decoded INTEGER and ENUMERATED values.
/// It provides just the arithmetic the library and its callers need,
/// strictly through the [`BigNum`] contract so that the underlying engine
/// remains exchangeable. Like the engine values, an `Int` is immutable.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Int(Backend);

impl Int {
    /// Creates a value from a native integer.
    pub fn from_i64(value: i64) -> Self {
        Int(BigNum::from_i64(value))
    }

    /// Creates a value from a base 10 string.
    ///
    /// Returns `None` if the string is not a decimal integer.
    pub fn from_dec_str(value: &str) -> Option<Self> {
        <Backend as BigNum>::from_dec_str(value).map(Int)
    }

    /// Returns the value as a native integer if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.0.to_i64()
    }

    /// Returns whether the value is less than zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Returns the sum of the value and `rhs`.
    pub fn add(&self, rhs: &Self) -> Self {
        Int(self.0.add(&rhs.0))
    }

    /// Returns the value with `rhs` subtracted.
    pub fn sub(&self, rhs: &Self) -> Self {
        Int(self.0.sub(&rhs.0))
    }

    /// Returns the product of the value and `rhs`.
    pub fn mul(&self, rhs: &Self) -> Self {
        Int(self.0.mul(&rhs.0))
    }

    /// Returns the value modulo `rhs`.
    ///
    /// This is the mathematical modulus taking the sign of `rhs`, not the
    /// truncating remainder.
    pub fn modulus(&self, rhs: &Self) -> Self {
        Int(self.0.modulus(&rhs.0))
    }

    /// Returns the value raised to the power of `exp`.
    pub fn pow(&self, exp: u32) -> Self {
        Int(self.0.pow(exp))
    }

    /// Returns the value shifted left by `bits` bits.
    pub fn shl(&self, bits: usize) -> Self {
        Int(self.0.shl(bits))
    }

    /// Returns the value arithmetically shifted right by `bits` bits.
    pub fn shr(&self, bits: usize) -> Self {
        Int(self.0.shr(bits))
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Int(self.0.abs())
    }

    /// Returns a reference to the underlying engine value.
    pub(crate) fn as_backend(&self) -> &Backend {
        &self.0
    }

    /// Creates a value from an engine value.
    pub(crate) fn from_backend(value: Backend) -> Self {
        Int(value)
    }
}

impl From<i64> for Int {
    fn from(value: i64) -> Self {
        Int::from_i64(value)
    }
}

impl From<i32> for Int {
    fn from(value: i32) -> Self {
        Int::from_i64(value.into())
    }
}

impl fmt::Display for Int {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0.to_dec_string())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic_arithmetic() {
        let a = Int::from(1200);
        let b = Int::from(-34);
        assert_eq!(a.add(&b), Int::from(1166));
        assert_eq!(a.sub(&b), Int::from(1234));
        assert_eq!(a.mul(&b), Int::from(-40800));
        assert_eq!(b.abs(), Int::from(34));
        assert!(b.is_negative());
        assert!(!a.is_negative());
    }

    #[test]
    fn modulus_is_sign_correct() {
        // A true mathematical modulus, not the remainder operator.
        assert_eq!(Int::from(-7).modulus(&Int::from(3)), Int::from(2));
        assert_eq!(Int::from(7).modulus(&Int::from(3)), Int::from(1));
        assert_eq!(Int::from(7).modulus(&Int::from(-3)), Int::from(-2));
        assert_eq!(Int::from(-9).modulus(&Int::from(3)), Int::from(0));
    }

    #[test]
    fn shifts() {
        assert_eq!(Int::from(1).shl(10), Int::from(1024));
        assert_eq!(Int::from(1024).shr(3), Int::from(128));
        // Arithmetic right shift keeps the sign.
        assert_eq!(Int::from(-1).shr(8), Int::from(-1));
        assert_eq!(Int::from(-256).shr(8), Int::from(-1));
    }

    #[test]
    fn pow_and_decimal() {
        let big = Int::from(2).pow(100);
        assert_eq!(big.to_string(), "1267650600228229401496703205376");
        assert_eq!(
            Int::from_dec_str("1267650600228229401496703205376").unwrap(),
            big
        );
        assert_eq!(Int::from_dec_str("-42"), Some(Int::from(-42)));
        assert_eq!(Int::from_dec_str("2.5"), None);
        assert_eq!(Int::from_dec_str("forty"), None);
    }

    #[test]
    fn native_conversion() {
        assert_eq!(Int::from(i64::MIN).to_i64(), Some(i64::MIN));
        assert_eq!(Int::from(i64::MAX).to_i64(), Some(i64::MAX));
        assert_eq!(Int::from(2).pow(100).to_i64(), None);
        assert_eq!(
            Int::from(i64::MAX).add(&Int::from(1)).to_i64(), None
        );
    }

    #[test]
    fn ordering() {
        assert!(Int::from(-2) < Int::from(1));
        assert!(Int::from(2).pow(65) > Int::from(i64::MAX));
        assert_eq!(
            Int::from(5).cmp(&Int::from(5)), std::cmp::Ordering::Equal
        );
    }
}
