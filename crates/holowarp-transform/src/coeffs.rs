//! Complex coefficient vectors
//!
//! Callers pass polynomial coefficients as a flat list of real numbers,
//! consecutive pairs forming `(re, im)`. `[0, 0, 1, 0]` is therefore
//! `0 + 1·z`.

use crate::{TransformError, TransformResult};
use num_complex::Complex64;

/// Ordered, non-empty list of complex coefficients `c0, c1, …, ck`.
///
/// `c0` is the constant term.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientVector {
    coeffs: Vec<Complex64>,
}

impl CoefficientVector {
    /// Build from flattened `(re, im)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidCoefficients`] if `values` is empty
    /// or has odd length.
    pub fn from_reals(values: &[f64]) -> TransformResult<Self> {
        if values.is_empty() {
            return Err(TransformError::InvalidCoefficients(
                "coefficient list is empty".to_string(),
            ));
        }
        if values.len() % 2 != 0 {
            return Err(TransformError::InvalidCoefficients(format!(
                "expected (re, im) pairs, got {} values",
                values.len()
            )));
        }

        let coeffs = values
            .chunks_exact(2)
            .map(|pair| Complex64::new(pair[0], pair[1]))
            .collect();
        Ok(Self { coeffs })
    }

    /// Build from complex coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidCoefficients`] if `coeffs` is empty.
    pub fn from_complex(coeffs: Vec<Complex64>) -> TransformResult<Self> {
        if coeffs.is_empty() {
            return Err(TransformError::InvalidCoefficients(
                "coefficient list is empty".to_string(),
            ));
        }
        Ok(Self { coeffs })
    }

    /// The single coefficient `c`
    pub fn constant(c: Complex64) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Coefficients of `P(z) = z`
    pub fn identity() -> Self {
        Self {
            coeffs: vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)],
        }
    }

    /// Number of complex coefficients (always at least 1)
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Always `false`; a vector holds at least the constant term.
    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Highest power of `z` the coefficients describe
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn as_slice(&self) -> &[Complex64] {
        &self.coeffs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Complex64> {
        self.coeffs.iter()
    }
}

impl TryFrom<&[f64]> for CoefficientVector {
    type Error = TransformError;

    fn try_from(values: &[f64]) -> TransformResult<Self> {
        Self::from_reals(values)
    }
}

impl<'a> IntoIterator for &'a CoefficientVector {
    type Item = &'a Complex64;
    type IntoIter = std::slice::Iter<'a, Complex64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_in_order() {
        let cv = CoefficientVector::from_reals(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(cv.len(), 3);
        assert_eq!(cv.degree(), 2);
        assert_eq!(
            cv.as_slice(),
            &[
                Complex64::new(1.0, 2.0),
                Complex64::new(3.0, 4.0),
                Complex64::new(5.0, 6.0)
            ]
        );
    }

    #[test]
    fn test_single_constant() {
        let cv = CoefficientVector::from_reals(&[0.5, -0.5]).unwrap();
        assert_eq!(cv.len(), 1);
        assert_eq!(cv.degree(), 0);
        assert!(!cv.is_empty());
    }

    #[test]
    fn test_odd_length_rejected() {
        let err = CoefficientVector::from_reals(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, TransformError::InvalidCoefficients(_)));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(
            CoefficientVector::from_reals(&[]),
            Err(TransformError::InvalidCoefficients(_))
        ));
        assert!(matches!(
            CoefficientVector::from_complex(Vec::new()),
            Err(TransformError::InvalidCoefficients(_))
        ));
    }

    #[test]
    fn test_non_finite_accepted() {
        let cv = CoefficientVector::try_from(&[f64::NAN, f64::INFINITY][..]).unwrap();
        assert!(cv.as_slice()[0].re.is_nan());
    }
}
