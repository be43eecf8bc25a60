/// Borrowed view of one packet's wire bytes.
///
/// `data` holds the bytes that were actually captured; `reported_len` is the
/// length the packet had on the wire and may exceed `data.len()` when the
/// capture was truncated. `base` is the absolute offset of this view inside
/// the top-level packet so that nested decoders report absolute ranges.
///
/// # Examples
/// ```
/// use streamshark_core::Frame;
///
/// let frame = Frame::with_reported_len(&[1, 2, 3], 10);
/// assert_eq!(frame.captured_len(), 3);
/// assert_eq!(frame.reported_len(), 10);
/// assert!(frame.is_truncated());
///
/// let tail = frame.subset_remaining(2);
/// assert_eq!(tail.base(), 2);
/// assert_eq!(tail.data(), &[3]);
/// assert_eq!(tail.reported_len(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    data: &'a [u8],
    reported_len: usize,
    base: usize,
}

impl<'a> Frame<'a> {
    /// View over fully captured bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            reported_len: data.len(),
            base: 0,
        }
    }

    /// View over possibly truncated bytes. The reported length never drops
    /// below the captured length.
    pub fn with_reported_len(data: &'a [u8], reported_len: usize) -> Self {
        Self {
            data,
            reported_len: reported_len.max(data.len()),
            base: 0,
        }
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn captured_len(&self) -> usize {
        self.data.len()
    }

    pub fn reported_len(&self) -> usize {
        self.reported_len
    }

    pub fn base(&self) -> usize {
        self.base
    }

    pub fn is_truncated(&self) -> bool {
        self.reported_len > self.data.len()
    }

    /// Reported bytes left after `offset`, zero when `offset` is past the end.
    pub fn reported_remaining(&self, offset: usize) -> usize {
        self.reported_len.saturating_sub(offset)
    }

    /// Sub-view starting at `offset` and running to the reported end.
    pub fn subset_remaining(&self, offset: usize) -> Frame<'a> {
        let start = offset.min(self.reported_len);
        Frame {
            data: self.data.get(start..).unwrap_or(&[]),
            reported_len: self.reported_len - start,
            base: self.base + start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;

    #[test]
    fn reported_len_never_below_captured() {
        let frame = Frame::with_reported_len(&[0u8; 6], 2);
        assert_eq!(frame.reported_len(), 6);
        assert!(!frame.is_truncated());
    }

    #[test]
    fn subset_past_captured_keeps_reported_len() {
        let frame = Frame::with_reported_len(&[0u8; 4], 12);
        let subset = frame.subset_remaining(8);
        assert!(subset.data().is_empty());
        assert_eq!(subset.reported_len(), 4);
        assert_eq!(subset.base(), 8);
    }

    #[test]
    fn subset_past_reported_is_empty() {
        let frame = Frame::new(&[0u8; 4]);
        let subset = frame.subset_remaining(9);
        assert_eq!(subset.reported_len(), 0);
        assert_eq!(subset.base(), 4);
    }

    #[test]
    fn nested_subsets_accumulate_base() {
        let bytes = [0u8; 20];
        let frame = Frame::new(&bytes).subset_remaining(8).subset_remaining(3);
        assert_eq!(frame.base(), 11);
        assert_eq!(frame.reported_len(), 9);
    }
}
