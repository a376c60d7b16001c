use log::debug;

use crate::cursor::try_header;
use crate::dispatch::{Stage, Step};
use crate::frame::FrameView;
use crate::headers::{EthernetHeader, Ipv4Header};
use crate::verdict::Verdict;
use crate::{ETH_P_IP, IPPROTO_ICMP, REFLECT_STAGE_KEY};

/// Picks IPv4 ICMP frames and hands them to the next stage.
///
/// Anything shorter than the headers it needs, or not IPv4 ICMP, passes.
/// The frame is never written.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    next: u32,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_next(REFLECT_STAGE_KEY)
    }
}

impl Classifier {
    pub const fn with_next(next: u32) -> Self {
        Self { next }
    }

    pub fn classify(&self, frame: &mut [u8]) -> Step {
        let mut view = FrameView::new(frame);

        let Some(eth) = try_header::<EthernetHeader>(&mut view) else {
            debug!("frame of {} bytes has no ethernet header", view.end());
            return Step::Done(Verdict::Pass);
        };

        if eth.ether_type() != ETH_P_IP {
            return Step::Done(Verdict::Pass);
        }

        let Some(ip) = try_header::<Ipv4Header>(&mut view) else {
            debug!("frame of {} bytes has truncated ipv4 header", view.end());
            return Step::Done(Verdict::Pass);
        };

        if ip.protocol() != IPPROTO_ICMP {
            return Step::Done(Verdict::Pass);
        }

        Step::Transfer(self.next)
    }
}

impl Stage for Classifier {
    fn name(&self) -> &'static str {
        "classify_icmp"
    }

    fn run(&self, frame: &mut [u8]) -> Step {
        self.classify(frame)
    }
}

/// Reflects a frame to its sender by swapping the Ethernet addresses.
#[derive(Debug, Default, Clone, Copy)]
pub struct Reflector;

impl Reflector {
    pub fn mutate_and_transmit(&self, frame: &mut [u8]) -> Verdict {
        let mut view = FrameView::new(frame);

        let Some(mut eth) = try_header::<EthernetHeader>(&mut view) else {
            debug!("frame of {} bytes too short to reflect", view.end());
            return Verdict::Abort;
        };

        eth.swap_addresses();

        Verdict::Transmit
    }
}

impl Stage for Reflector {
    fn name(&self) -> &'static str {
        "reflect"
    }

    fn run(&self, frame: &mut [u8]) -> Step {
        Step::Done(self.mutate_and_transmit(frame))
    }
}
