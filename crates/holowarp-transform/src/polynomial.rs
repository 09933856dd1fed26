//! Complex maps: polynomials and rational functions
//!
//! A [`ComplexMap`] sends a point of the normalized output plane to the
//! point of the normalized source plane that should be sampled there.

use crate::TransformResult;
use crate::coeffs::CoefficientVector;
use num_complex::Complex64;

/// Denominator magnitude below which a rational function evaluates to 0
pub const POLE_EPSILON: f64 = 1e-6;

/// A function of one complex variable usable as a warp.
///
/// Implementors are evaluated concurrently from many rows, hence `Sync`.
pub trait ComplexMap: Sync {
    fn eval(&self, z: Complex64) -> Complex64;
}

impl<F> ComplexMap for F
where
    F: Fn(Complex64) -> Complex64 + Sync,
{
    fn eval(&self, z: Complex64) -> Complex64 {
        self(z)
    }
}

/// Horner evaluation of `Σ coeffs[i] · z^i`.
#[inline]
fn horner(coeffs: &[Complex64], z: Complex64) -> Complex64 {
    let mut iter = coeffs.iter().rev();
    let mut acc = match iter.next() {
        Some(&c) => c,
        None => return Complex64::new(0.0, 0.0),
    };
    for &c in iter {
        acc = acc * z + c;
    }
    acc
}

/// `P(z) = Σ ci · z^i`
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: CoefficientVector,
}

impl Polynomial {
    pub fn new(coeffs: CoefficientVector) -> Self {
        Self { coeffs }
    }

    /// Build from flattened `(re, im)` pairs.
    pub fn from_reals(values: &[f64]) -> TransformResult<Self> {
        Ok(Self::new(CoefficientVector::from_reals(values)?))
    }

    /// `P(z) = z`
    pub fn identity() -> Self {
        Self::new(CoefficientVector::identity())
    }

    /// `P(z) = c`
    pub fn constant(c: Complex64) -> Self {
        Self::new(CoefficientVector::constant(c))
    }

    pub fn coefficients(&self) -> &CoefficientVector {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.degree()
    }

    /// Evaluate at `z` using Horner's method.
    pub fn evaluate(&self, z: Complex64) -> Complex64 {
        horner(self.coeffs.as_slice(), z)
    }
}

impl ComplexMap for Polynomial {
    #[inline]
    fn eval(&self, z: Complex64) -> Complex64 {
        self.evaluate(z)
    }
}

/// `R(z) = N(z) / D(z)`
///
/// Near a pole (`|D(z)| < POLE_EPSILON`) the result is `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalFunction {
    numerator: Polynomial,
    denominator: Polynomial,
}

impl RationalFunction {
    pub fn new(numerator: Polynomial, denominator: Polynomial) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build from flattened `(re, im)` pairs for each side.
    pub fn from_reals(numerator: &[f64], denominator: &[f64]) -> TransformResult<Self> {
        Ok(Self::new(
            Polynomial::from_reals(numerator)?,
            Polynomial::from_reals(denominator)?,
        ))
    }

    pub fn numerator(&self) -> &Polynomial {
        &self.numerator
    }

    pub fn denominator(&self) -> &Polynomial {
        &self.denominator
    }

    pub fn evaluate(&self, z: Complex64) -> Complex64 {
        let d = self.denominator.evaluate(z);
        if d.norm() < POLE_EPSILON {
            return Complex64::new(0.0, 0.0);
        }
        self.numerator.evaluate(z) / d
    }
}

impl ComplexMap for RationalFunction {
    #[inline]
    fn eval(&self, z: Complex64) -> Complex64 {
        self.evaluate(z)
    }
}
