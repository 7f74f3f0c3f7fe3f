//! Small numeric helpers shared by the pager and the reporters.

use std::time::Duration;

/// Pages still to fetch after the first one: `ceil(total / page_size) - 1`, never negative.
/// A `page_size` of 0 is treated as 1.
pub fn pages_remaining(total: u64, page_size: usize) -> usize {
    let page_size = page_size.max(1) as u64;
    let pages = total.div_ceil(page_size).saturating_sub(1);
    usize::try_from(pages).unwrap_or(usize::MAX)
}

/// Average time per processed node; the whole elapsed time when nothing was processed yet.
pub fn time_per_node(elapsed: Duration, processed: usize) -> Duration {
    let n = u32::try_from(processed.max(1)).unwrap_or(u32::MAX);
    elapsed / n
}
