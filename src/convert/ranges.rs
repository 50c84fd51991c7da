use std::ops::Range;

/// Half-open line intervals already emitted into a converted section.
#[derive(Debug, Default, Clone)]
pub struct RangeSet {
    ranges: Vec<Range<usize>>,
}

impl RangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, range: Range<usize>) {
        if !range.is_empty() {
            self.ranges.push(range);
        }
    }

    /// True if `range` lies entirely inside one merged interval.
    pub fn covers(&self, range: &Range<usize>) -> bool {
        self.merged()
            .iter()
            .any(|r| r.start <= range.start && range.end <= r.end)
    }

    /// Sort, then fuse overlapping or touching intervals in one scan.
    pub fn merged(&self) -> Vec<Range<usize>> {
        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| (r.start, r.end));

        let mut merged: Vec<Range<usize>> = Vec::with_capacity(sorted.len());
        for r in sorted {
            match merged.last_mut() {
                Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
                _ => merged.push(r),
            }
        }
        merged
    }

    /// The parts of `0..len` not covered by any interval.
    pub fn complement(&self, len: usize) -> Vec<Range<usize>> {
        let mut out = Vec::new();
        let mut cursor = 0;
        for r in self.merged() {
            if r.start >= len {
                break;
            }
            if cursor < r.start {
                out.push(cursor..r.start);
            }
            cursor = cursor.max(r.end);
        }
        if cursor < len {
            out.push(cursor..len);
        }
        out
    }
}
