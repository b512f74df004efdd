// Echo or Echo Reply Message
//  |       0       |       1       |       2       |       3       |
//  |0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7 0 1 2 3 4 5 6 7|
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |     Type      |      Code     |           Checksum            |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |           Identifier          |        Sequence Number        |
//  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//  |   Data   ...
//  +-+-+-+-+-
//  Type
//      8 for echo message;
//      0 for echo reply message.
//  Code
//      0
//  Checksum
//      The 16-bit one's complement of the one's complement sum of the
//      ICMP message starting with the ICMP Type. The checksum field is
//      zero while it is computed.

use super::{
    checksum, CHECKSUM_OFFSET, CODE_OFFSET, ECHO_REQUEST_CODE, ECHO_REQUEST_TYPE, HEADER_SIZE,
    IDENT_OFFSET, SEQUENCE_OFFSET, TYPE_OFFSET,
};

/// An Echo Request with a zero-filled payload, staged in place before each send.
#[derive(Debug, Clone)]
pub struct EchoRequest {
    buffer: Vec<u8>,
}

impl EchoRequest {
    pub fn new(ident: u16, seq_cnt: u16, size: usize) -> EchoRequest {
        let mut buffer = vec![0u8; HEADER_SIZE + size];

        buffer[TYPE_OFFSET] = ECHO_REQUEST_TYPE;
        buffer[CODE_OFFSET] = ECHO_REQUEST_CODE;
        buffer[IDENT_OFFSET..IDENT_OFFSET + 2].copy_from_slice(&ident.to_be_bytes());
        buffer[SEQUENCE_OFFSET..SEQUENCE_OFFSET + 2].copy_from_slice(&seq_cnt.to_be_bytes());

        EchoRequest { buffer }
    }

    /// Writes `seq_cnt` and a fresh checksum into the header.
    pub fn stage(&mut self, seq_cnt: u16) {
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].fill(0);
        self.buffer[SEQUENCE_OFFSET..SEQUENCE_OFFSET + 2].copy_from_slice(&seq_cnt.to_be_bytes());

        let sum = checksum(&self.buffer);
        self.buffer[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&sum.to_be_bytes());
    }

    pub fn ident(&self) -> u16 {
        u16::from_be_bytes([self.buffer[IDENT_OFFSET], self.buffer[IDENT_OFFSET + 1]])
    }

    pub fn seq_cnt(&self) -> u16 {
        u16::from_be_bytes([self.buffer[SEQUENCE_OFFSET], self.buffer[SEQUENCE_OFFSET + 1]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::icmp::verify;

    #[test]
    fn template_layout() {
        let request = EchoRequest::new(1, 1, 32);
        let bytes = request.as_bytes();

        assert_eq!(bytes.len(), HEADER_SIZE + 32);
        assert_eq!(&bytes[..8], &[8, 0, 0, 0, 0, 1, 0, 1]);
        assert!(bytes[HEADER_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn staged_request_carries_valid_checksum() {
        let mut request = EchoRequest::new(1, 1, 32);
        request.stage(1);

        let bytes = request.as_bytes();
        assert_eq!(&bytes[2..4], &[0xf7, 0xfd]);
        assert!(verify(bytes));
    }

    #[test]
    fn restaging_replaces_old_checksum() {
        let mut request = EchoRequest::new(0x1234, 1, 5);
        request.stage(1);
        let first = request.as_bytes().to_vec();

        request.stage(0x0203);
        assert_eq!(request.seq_cnt(), 0x0203);
        assert_eq!(request.ident(), 0x1234);
        assert!(verify(request.as_bytes()));

        request.stage(1);
        assert_eq!(request.as_bytes(), &first[..]);
    }

    #[test]
    fn empty_payload() {
        let mut request = EchoRequest::new(1, 1, 0);
        request.stage(1);
        assert_eq!(request.as_bytes().len(), HEADER_SIZE);
    }
}
