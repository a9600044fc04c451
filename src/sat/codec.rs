//! Binary ("log") encoding of a cell value over a group of boolean variables

/// Literals that pin each bit of `vars` to the bits of `value`, MSB first.
///
/// Every returned literal is meant to become its own unit clause.
pub fn encode_equals(vars: &[i32], value: usize) -> Vec<i32> {
    encode(vars, value, false)
}

/// A single clause that is false exactly when `vars` holds `value`.
pub fn encode_not_equals(vars: &[i32], value: usize) -> Vec<i32> {
    encode(vars, value, true)
}

/// Inverse of [`encode_equals`]: rebuild the value from a group of literals.
///
/// Positive literals read as 1, everything else as 0.
pub fn decode_value(literals: &[i32]) -> usize {
    literals
        .iter()
        .fold(0, |acc, &lit| (acc << 1) | usize::from(lit > 0))
}

fn encode(vars: &[i32], value: usize, negate: bool) -> Vec<i32> {
    let width = vars.len();
    assert!(
        width < usize::BITS as usize && value >> width == 0,
        "value {} does not fit in {} bits",
        value,
        width
    );

    vars.iter()
        .enumerate()
        .map(|(j, &var)| {
            let bit_set = (value >> (width - 1 - j)) & 1 == 1;
            if bit_set != negate {
                var
            } else {
                -var
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_equals_msb_first() {
        // 5 = 0101
        assert_eq!(encode_equals(&[1, 2, 3, 4], 5), vec![-1, 2, -3, 4]);
        assert_eq!(encode_equals(&[5, 6, 7], 0), vec![-5, -6, -7]);
        assert_eq!(encode_equals(&[5, 6, 7], 7), vec![5, 6, 7]);
    }

    #[test]
    fn test_encode_not_equals_inverts_signs() {
        assert_eq!(encode_not_equals(&[1, 2, 3, 4], 5), vec![1, -2, 3, -4]);

        for value in 0..16 {
            let eq = encode_equals(&[1, 2, 3, 4], value);
            let neq = encode_not_equals(&[1, 2, 3, 4], value);
            let negated: Vec<i32> = eq.iter().map(|l| -l).collect();
            assert_eq!(neq, negated);
        }
    }

    #[test]
    fn test_not_equals_clause_falsified_only_by_its_value() {
        let vars = [1, 2, 3];
        for forbidden in 0..8 {
            let clause = encode_not_equals(&vars, forbidden);
            for actual in 0..8 {
                let model = encode_equals(&vars, actual);
                let satisfied = clause.iter().any(|lit| model.contains(lit));
                assert_eq!(satisfied, actual != forbidden);
            }
        }
    }

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value(&[-1, 2, -3, 4]), 5);
        assert_eq!(decode_value(&[9, 10, 11, 12]), 15);
        assert_eq!(decode_value(&[-9, -10, -11, -12]), 0);
        for value in 0..32 {
            assert_eq!(decode_value(&encode_equals(&[1, 2, 3, 4, 5], value)), value);
        }
    }

    #[test]
    #[should_panic]
    fn test_value_too_wide_panics() {
        encode_equals(&[1, 2, 3], 8);
    }
}
