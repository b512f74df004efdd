// IPv4 header, https://www.rfc-editor.org/rfc/rfc791
//  |       0       |       1       |       2       |       3       |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |Version|  IHL  |Type of Service|          Total Length         |
//  |         Identification        |Flags|      Fragment Offset    |
//  |  Time to Live |    Protocol   |         Header Checksum       |
//  |                       Source Address                          |
//  |                    Destination Address                        |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//
// Raw ICMP sockets hand back the whole datagram, this header included.

use std::net::Ipv4Addr;

use thiserror::Error;

pub const HEADER_SIZE: usize = 20;

const TTL_OFFSET: usize = 8;
const SOURCE_OFFSET: usize = 12;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid size")]
    InvalidSize,
    #[error("invalid packet")]
    InvalidPacket,
}

#[derive(Debug)]
pub struct IpV4Packet<'a> {
    pub ttl: u8,
    pub source: Ipv4Addr,
    pub data: &'a [u8],
}

impl<'a> IpV4Packet<'a> {
    pub fn decode(buffer: &'a [u8]) -> Result<IpV4Packet<'a>, DecodeError> {
        if buffer.len() < HEADER_SIZE {
            return Err(DecodeError::InvalidSize);
        }
        if buffer[0] >> 4 != 4 {
            return Err(DecodeError::InvalidPacket);
        }

        let header_len = usize::from(buffer[0] & 0x0f) * 4;
        if header_len < HEADER_SIZE || header_len > buffer.len() {
            return Err(DecodeError::InvalidSize);
        }

        let mut source = [0u8; 4];
        source.copy_from_slice(&buffer[SOURCE_OFFSET..SOURCE_OFFSET + 4]);

        Ok(IpV4Packet {
            ttl: buffer[TTL_OFFSET],
            source: Ipv4Addr::from(source),
            data: &buffer[header_len..],
        })
    }
}
