use std::ops::Range;

/// Greedily packs a sequence of sizes into contiguous index groups.
///
/// A group closes as soon as its cumulative size reaches `limit`, or at the
/// end of the input. Every index lands in exactly one group and input order
/// is preserved; this is deliberate greedy packing, not bin-packing.
pub fn greedy_groups(sizes: &[u64], limit: u64) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    let mut total: u64 = 0;
    for (i, &size) in sizes.iter().enumerate() {
        total = total.saturating_add(size);
        if total >= limit || i == sizes.len() - 1 {
            groups.push(start..i + 1);
            start = i + 1;
            total = 0;
        }
    }
    groups
}
