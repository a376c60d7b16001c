use network_types::eth::EthHdr;
use network_types::ip::Ipv4Hdr;

use crate::cursor::Header;

pub const ETH_ALEN: usize = 6;
pub const ETH_HDR_LEN: usize = EthHdr::LEN;
pub const IPV4_HDR_LEN: usize = Ipv4Hdr::LEN;

const ETH_DST: usize = 0;
const ETH_SRC: usize = ETH_DST + ETH_ALEN;
const ETH_TYPE: usize = ETH_SRC + ETH_ALEN;
const IPV4_PROTO: usize = 9;

/// Ethernet II header: destination, source, ether type.
pub struct EthernetHeader<'a> {
    bytes: &'a mut [u8],
}

impl<'a> Header<'a> for EthernetHeader<'a> {
    const LEN: usize = ETH_HDR_LEN;

    #[inline(always)]
    fn wrap(bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len(), Self::LEN);
        Self { bytes }
    }
}

impl EthernetHeader<'_> {
    #[inline(always)]
    pub fn destination(&self) -> [u8; ETH_ALEN] {
        let mut addr = [0u8; ETH_ALEN];
        addr.copy_from_slice(&self.bytes[ETH_DST..ETH_SRC]);
        addr
    }

    #[inline(always)]
    pub fn source(&self) -> [u8; ETH_ALEN] {
        let mut addr = [0u8; ETH_ALEN];
        addr.copy_from_slice(&self.bytes[ETH_SRC..ETH_TYPE]);
        addr
    }

    /// Ether type in host byte order.
    #[inline(always)]
    pub fn ether_type(&self) -> u16 {
        u16::from_be_bytes([self.bytes[ETH_TYPE], self.bytes[ETH_TYPE + 1]])
    }

    /// Exchanges destination and source addresses, leaving the ether type
    /// alone.
    #[inline(always)]
    pub fn swap_addresses(&mut self) {
        let (dst, rest) = self.bytes.split_at_mut(ETH_SRC);
        dst.swap_with_slice(&mut rest[..ETH_ALEN]);
    }
}

/// The part of the IPv4 header the pipeline looks at.
pub struct Ipv4Header<'a> {
    bytes: &'a mut [u8],
}

impl<'a> Header<'a> for Ipv4Header<'a> {
    const LEN: usize = IPV4_HDR_LEN;

    #[inline(always)]
    fn wrap(bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(bytes.len(), Self::LEN);
        Self { bytes }
    }
}

impl Ipv4Header<'_> {
    #[inline(always)]
    pub fn protocol(&self) -> u8 {
        self.bytes[IPV4_PROTO]
    }
}
