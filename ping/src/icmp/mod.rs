// Message format: ICMPv4, https://www.rfc-editor.org/rfc/rfc792
// Checksum: https://www.rfc-editor.org/rfc/rfc1071

mod checksum;
mod echo;

pub use checksum::{checksum, verify};
pub use echo::EchoRequest;

pub const HEADER_SIZE: usize = 8;

pub const ECHO_REQUEST_TYPE: u8 = 8;
pub const ECHO_REQUEST_CODE: u8 = 0;

pub const TYPE_OFFSET: usize = 0;
pub const CODE_OFFSET: usize = 1;
pub const CHECKSUM_OFFSET: usize = 2;
pub const IDENT_OFFSET: usize = 4;
pub const SEQUENCE_OFFSET: usize = 6;
