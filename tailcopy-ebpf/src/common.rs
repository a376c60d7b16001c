use aya_ebpf::maps::ProgramArray;
use aya_ebpf::programs::XdpContext;
use aya_log_ebpf::{debug, info};

use core::mem;
use core::mem::offset_of;
use core::ptr;
use network_types::eth::EthHdr;
use network_types::ip::Ipv4Hdr;

use tailcopy_common::{Verdict, ETH_P_IP, IPPROTO_ICMP, REFLECT_STAGE_KEY};

const PASS: u32 = Verdict::Pass.action();
const TRANSMIT: u32 = Verdict::Transmit.action();
const ABORT: u32 = Verdict::Abort.action();

#[inline(always)]
pub fn try_classify(ctx: &XdpContext, stages: &ProgramArray) -> Result<u32, u32> {
    let ethhdr = ptr_at::<EthHdr>(ctx, 0).ok_or(PASS)?;

    // Raw reads: the header enums only cover known values.
    let ether_type = u16::from_be(unsafe {
        ptr::read_unaligned((ethhdr as *const u8).add(offset_of!(EthHdr, ether_type)) as *const u16)
    });
    if ether_type != ETH_P_IP {
        debug!(ctx, "skipping ether type {:x}", ether_type);
        return Ok(PASS);
    }

    let ipv4hdr = ptr_at::<Ipv4Hdr>(ctx, EthHdr::LEN).ok_or(PASS)?;
    let proto = unsafe { *(ipv4hdr as *const u8).add(offset_of!(Ipv4Hdr, proto)) };
    if proto != IPPROTO_ICMP {
        debug!(ctx, "skipping ip protocol {}", proto);
        return Ok(PASS);
    }

    info!(ctx, "ICMP frame, tail calling stage {}", REFLECT_STAGE_KEY);
    unsafe {
        let _ = stages.tail_call(ctx, REFLECT_STAGE_KEY);
    }

    // Only reached when the slot is empty.
    info!(ctx, "stage {} not registered, passing frame", REFLECT_STAGE_KEY);

    Ok(PASS)
}

#[inline(always)]
pub fn try_reflect(ctx: &XdpContext) -> Result<u32, u32> {
    let ethhdr = ptr_at::<EthHdr>(ctx, 0).ok_or(ABORT)?;

    unsafe {
        let dst = ptr::addr_of_mut!((*ethhdr).dst_addr);
        let src = ptr::addr_of_mut!((*ethhdr).src_addr);

        info!(ctx, "reflecting frame from {:mac}", *src);

        ptr::swap_nonoverlapping(dst, src, 1);
    }

    Ok(TRANSMIT)
}

#[inline(always)]
fn ptr_at<T>(ctx: &XdpContext, offset: usize) -> Option<*mut T> {
    let start = ctx.data();
    let end = ctx.data_end();
    let len = mem::size_of::<T>();

    if start + offset + len > end {
        return None;
    }

    Some((start + offset) as *mut T)
}
