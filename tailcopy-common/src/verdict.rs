/// Disposition of one frame, encoded with the XDP action values so the
/// kernel programs can return it as is.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Drop the frame and report an error.
    Abort = 0,
    /// Hand the frame to the normal receive path.
    Pass = 2,
    /// Send the frame back out of the interface it came in on.
    Transmit = 3,
}

impl Verdict {
    #[inline(always)]
    pub const fn action(self) -> u32 {
        self as u32
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Verdict::Abort => "XDP_ABORTED",
            Verdict::Pass => "XDP_PASS",
            Verdict::Transmit => "XDP_TX",
        };
        f.write_str(name)
    }
}
