#![no_std]

pub mod cursor;
pub mod dispatch;
pub mod frame;
pub mod headers;
pub mod stages;
pub mod verdict;

pub use dispatch::{DispatchError, Pipeline, Stage, StageTable, Stages, Step};
pub use frame::FrameView;
pub use stages::{Classifier, Reflector};
pub use verdict::Verdict;

/// License the pipeline programs are loaded under, NUL terminated for the
/// `license` ELF section.
pub const LICENSE: [u8; 4] = *b"GPL\0";

pub const ETH_P_IP: u16 = 0x0800;
pub const ETH_P_IPV6: u16 = 0x86DD;
pub const IPPROTO_ICMP: u8 = 1;

/// Slot of the reflect program in the stage table.
pub const REFLECT_STAGE_KEY: u32 = 0;
pub const STAGE_TABLE_CAPACITY: u32 = 2;
/// [`STAGE_TABLE_CAPACITY`] as a host table size.
pub const STAGE_TABLE_SLOTS: usize = STAGE_TABLE_CAPACITY as usize;

const _: () = assert!((REFLECT_STAGE_KEY as usize) < STAGE_TABLE_SLOTS);

/// Upper bound on chained transfers per frame, same as the kernel's
/// `MAX_TAIL_CALL_CNT`.
pub const MAX_TAIL_CALLS: usize = 33;

/// Name of the program array map in the eBPF object.
pub const STAGES_MAP: &str = "STAGES";
pub const CLASSIFY_PROGRAM: &str = "classify_icmp";
pub const REFLECT_PROGRAM: &str = "reflect";
