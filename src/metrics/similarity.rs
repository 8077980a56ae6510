use crate::error::{PlotError, Result};

/// Fraction of positions at which two orderings agree.
pub fn permutation_similarity<T: PartialEq>(a: &[T], b: &[T]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(PlotError::LengthMismatch { left: a.len(), right: b.len() });
    }
    if a.is_empty() {
        return Err(PlotError::EmptyInput("permutation"));
    }

    let matching = a.iter().zip(b).filter(|(x, y)| x == y).count();
    Ok(matching as f64 / a.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_is_one() {
        assert_eq!(permutation_similarity(&[3, 1, 2], &[3, 1, 2]).unwrap(), 1.0);
    }

    #[test]
    fn disjoint_positions_is_zero() {
        assert_eq!(permutation_similarity(&[1, 2, 3], &[2, 3, 1]).unwrap(), 0.0);
    }

    #[test]
    fn half_match() {
        assert_eq!(permutation_similarity(&[1, 2, 3, 4], &[1, 3, 2, 4]).unwrap(), 0.5);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(matches!(
            permutation_similarity(&[1, 2], &[1, 2, 3]),
            Err(PlotError::LengthMismatch { left: 2, right: 3 })
        ));
        assert!(permutation_similarity::<u32>(&[], &[]).is_err());
    }
}
