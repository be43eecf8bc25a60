use super::error::UdpError;
use super::layout;

/// Strips the fixed UDP header from an IP payload.
pub struct UdpReader<'a> {
    payload: &'a [u8],
}

impl<'a> UdpReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), UdpError> {
        if self.payload.len() < needed {
            return Err(UdpError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn payload_without_header(&self) -> Result<&'a [u8], UdpError> {
        self.require_len(layout::UDP_HEADER_LEN)?;
        Ok(&self.payload[layout::UDP_HEADER_LEN..])
    }
}
