/// Internet checksum (RFC 1071) over `buffer`.
///
/// The checksum field of an ICMP message must be zero when this is called.
pub fn checksum(buffer: &[u8]) -> u16 {
    let mut sum = 0u32;

    // 1. add up every big-endian 16 bit word
    let mut words = buffer.chunks_exact(2);
    for word in &mut words {
        sum = sum.wrapping_add(u32::from(u16::from_be_bytes([word[0], word[1]])));
    }

    // 2. a trailing odd byte is added as is
    if let [last] = words.remainder() {
        sum = sum.wrapping_add(u32::from(*last));
    }

    // 3. fold the carries back in, the first fold may carry again
    sum = (sum >> 16) + (sum & 0xffff);
    sum = (sum >> 16) + (sum & 0xffff);

    // 4. one's complement
    !sum as u16
}

/// True when a complete message (checksum filled in) sums to zero.
pub fn verify(buffer: &[u8]) -> bool {
    checksum(buffer) == 0
}
