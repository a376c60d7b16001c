#![no_std]
#![no_main]

use aya_ebpf::macros::{map, xdp};
use aya_ebpf::maps::ProgramArray;
use aya_ebpf::programs::XdpContext;

use tailcopy_common::STAGE_TABLE_CAPACITY;

mod common;

/// Stages the classifier can hand a frame to. Filled by the loader.
#[map]
static STAGES: ProgramArray = ProgramArray::with_max_entries(STAGE_TABLE_CAPACITY, 0);

#[xdp]
pub fn classify_icmp(ctx: XdpContext) -> u32 {
    common::try_classify(&ctx, &STAGES).unwrap_or_else(|ret| ret)
}

#[xdp]
pub fn reflect(ctx: XdpContext) -> u32 {
    common::try_reflect(&ctx).unwrap_or_else(|ret| ret)
}

#[link_section = "license"]
#[no_mangle]
static LICENSE: [u8; 4] = tailcopy_common::LICENSE;

#[panic_handler]
fn panic(_info: &core::panic::PanicInfo) -> ! {
    unsafe { core::hint::unreachable_unchecked() }
}
