use crate::frame::FrameView;

/// A fixed-size header laid over a window of frame bytes.
pub trait Header<'a>: Sized {
    const LEN: usize;

    /// Wraps exactly `Self::LEN` bytes. Callers go through [`try_header`].
    fn wrap(bytes: &'a mut [u8]) -> Self;
}

/// Takes the next `size` bytes of the frame, or `None` if the frame ends
/// before them. A refused advance leaves the view untouched.
#[inline(always)]
pub fn try_advance<'a>(view: &mut FrameView<'a>, size: usize) -> Option<&'a mut [u8]> {
    let candidate_end = view.cursor().checked_add(size)?;
    if candidate_end > view.end() {
        return None;
    }

    Some(view.split_front(size))
}

#[inline(always)]
pub fn try_header<'a, H: Header<'a>>(view: &mut FrameView<'a>) -> Option<H> {
    try_advance(view, H::LEN).map(H::wrap)
}

#[cfg(test)]
mod tests {
    use super::try_advance;
    use crate::frame::FrameView;

    #[test]
    fn advance_within_bounds() {
        let mut frame = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut view = FrameView::new(&mut frame);

        let first = try_advance(&mut view, 3).unwrap();
        assert_eq!(first, &[0, 1, 2]);
        assert_eq!(view.cursor(), 3);

        let second = try_advance(&mut view, 5).unwrap();
        assert_eq!(second, &[3, 4, 5, 6, 7]);
        assert_eq!(view.cursor(), 8);
        assert_eq!(view.remaining(), 0);
    }

    #[test]
    fn windows_are_disjoint() {
        let mut frame = [0u8; 4];
        let mut view = FrameView::new(&mut frame);

        let a = try_advance(&mut view, 2).unwrap();
        let b = try_advance(&mut view, 2).unwrap();
        a[0] = 0xaa;
        b[0] = 0xbb;

        assert_eq!(frame, [0xaa, 0, 0xbb, 0]);
    }

    #[test]
    fn refused_advance_does_not_move_cursor() {
        let mut frame = [0u8; 10];
        let mut view = FrameView::new(&mut frame);

        assert!(try_advance(&mut view, 14).is_none());
        assert_eq!(view.cursor(), 0);

        try_advance(&mut view, 6).unwrap();
        assert!(try_advance(&mut view, 5).is_none());
        assert_eq!(view.cursor(), 6);
        assert_eq!(view.remaining(), 4);
    }

    #[test]
    fn exact_fit_and_zero_size() {
        let mut frame = [0u8; 14];
        let mut view = FrameView::new(&mut frame);

        assert_eq!(try_advance(&mut view, 14).unwrap().len(), 14);
        assert_eq!(try_advance(&mut view, 0).unwrap().len(), 0);
        assert!(try_advance(&mut view, 1).is_none());
    }

    #[test]
    fn overflowing_size_is_refused() {
        let mut frame = [0u8; 4];
        let mut view = FrameView::new(&mut frame);
        try_advance(&mut view, 1).unwrap();

        assert!(try_advance(&mut view, usize::MAX).is_none());
        assert_eq!(view.cursor(), 1);
    }
}
