use std::ops::Range;

use crate::error::{PlatematchError, Result};

/// Split `range` into exactly `parts` contiguous half-open intervals.
///
/// Every interval holds `len / parts` indices except the last, which also
/// takes the remainder. With fewer indices than parts the leading intervals
/// are empty. The split is static: matching cost depends on where the hits
/// are, so workers may finish at different times.
pub fn partition(range: Range<usize>, parts: usize) -> Result<Vec<Range<usize>>> {
    if parts == 0 {
        return Err(PlatematchError::Config(
            "cannot partition into zero parts".into(),
        ));
    }
    if range.start > range.end {
        return Err(PlatematchError::Config(format!(
            "range start {} is after end {}",
            range.start, range.end
        )));
    }

    let chunk = range.len() / parts;
    let mut chunks = Vec::with_capacity(parts);
    let mut start = range.start;
    for i in 0..parts {
        let end = if i + 1 == parts {
            range.end
        } else {
            start + chunk
        };
        chunks.push(start..end);
        start = end;
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_chunk_takes_remainder() {
        let chunks = partition(0..10, 3).unwrap();
        assert_eq!(chunks, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_offset_range() {
        let chunks = partition(5..13, 4).unwrap();
        assert_eq!(chunks, vec![5..7, 7..9, 9..11, 11..13]);
    }

    #[test]
    fn test_more_parts_than_indices() {
        let chunks = partition(0..2, 4).unwrap();
        assert_eq!(chunks, vec![0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn test_zero_parts_rejected() {
        assert!(partition(0..10, 0).is_err());
    }
}
