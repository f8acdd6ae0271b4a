//! Size constants and alignment helpers shared across the workspace.

/// One kibibyte in bytes.
pub const KIB: usize = 1024;

/// One mebibyte in bytes.
pub const MIB: usize = 1024 * KIB;

/// Granularity of OS page allocations.
///
/// [`SystemPages`](crate::SystemPages) rounds every request up to a multiple
/// of this and returns regions aligned to it.
pub const PAGE_SIZE: usize = 4096;

/// Round `value` up to the next multiple of `align`.
///
/// # Panics
///
/// Panics if `align` is not a power of two, or if rounding overflows.
#[must_use]
pub const fn align_up(value: usize, align: usize) -> usize {
    assert!(align.is_power_of_two(), "alignment must be a power of two");
    match value.checked_add(align - 1) {
        Some(v) => v & !(align - 1),
        None => panic!("align_up overflow"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_basic() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(9, 8), 16);
    }

    #[test]
    fn align_up_page_granularity() {
        assert_eq!(align_up(1, PAGE_SIZE), PAGE_SIZE);
        assert_eq!(align_up(PAGE_SIZE + 1, PAGE_SIZE), 2 * PAGE_SIZE);
        assert_eq!(align_up(MIB, PAGE_SIZE), MIB);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn align_up_rejects_non_power_of_two() {
        let _ = align_up(10, 12);
    }
}
