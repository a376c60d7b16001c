use core::mem;

/// Read/write window over the raw bytes of one received frame.
///
/// The view hands out header windows front to back. Each window is
/// disjoint from the ones handed out before it, so a stage can hold the
/// Ethernet and IPv4 headers at the same time without aliasing.
pub struct FrameView<'a> {
    rest: &'a mut [u8],
    cursor: usize,
    end: usize,
}

impl<'a> FrameView<'a> {
    pub fn new(frame: &'a mut [u8]) -> Self {
        let end = frame.len();
        Self {
            rest: frame,
            cursor: 0,
            end,
        }
    }

    /// Offset of the first byte of the frame. Always zero.
    #[inline(always)]
    pub fn begin(&self) -> usize {
        0
    }

    /// Offset one past the last byte of the frame.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.end - self.cursor
    }

    /// Splits `size` bytes off the front of the unread region.
    ///
    /// Only [`crate::cursor::try_advance`] calls this; it owns the bounds
    /// check.
    #[inline(always)]
    pub(crate) fn split_front(&mut self, size: usize) -> &'a mut [u8] {
        let rest = mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(size);
        self.rest = tail;
        self.cursor += size;
        head
    }
}
