/// Rounds `offset` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two.
///
/// # Examples
///
/// ```
/// use ee_utils::align_up;
///
/// assert_eq!(align_up(0, 8), 0);
/// assert_eq!(align_up(5, 4), 8);
/// assert_eq!(align_up(16, 16), 16);
/// ```
#[inline]
pub const fn align_up(offset: usize, alignment: usize) -> usize {
    debug_assert!(alignment.is_power_of_two());
    (offset + alignment - 1) & !(alignment - 1)
}

/// Number of bytes that must be skipped after `offset` to reach `alignment`.
///
/// # Examples
///
/// ```
/// use ee_utils::padding_for;
///
/// assert_eq!(padding_for(12, 16), 4);
/// assert_eq!(padding_for(32, 16), 0);
/// ```
#[inline]
pub const fn padding_for(offset: usize, alignment: usize) -> usize {
    align_up(offset, alignment) - offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_to_powers_of_two() {
        for alignment in [1usize, 2, 4, 8, 16, 64] {
            for offset in 0..200 {
                let aligned = align_up(offset, alignment);
                assert!(aligned >= offset);
                assert_eq!(aligned % alignment, 0);
                assert!(aligned - offset < alignment);
                assert_eq!(padding_for(offset, alignment), aligned - offset);
            }
        }
    }
}
