use super::error::DecodeError;
use super::field::{DecodedField, FieldSpec, FieldValue};
use super::frame::Frame;
use super::tree::Layer;

/// Monotonic cursor over a `Frame` that appends every value it reads to a
/// `Layer`.
///
/// Bounds are checked twice: against the reported length (the layout does
/// not fit, `MalformedFrame`) and against the captured bytes (the layout fits
/// but the capture was cut, `CaptureTruncated`).
pub struct FieldCursor<'a, 'l> {
    frame: Frame<'a>,
    offset: usize,
    layer: &'l mut Layer,
}

impl<'a, 'l> FieldCursor<'a, 'l> {
    pub fn new(frame: Frame<'a>, layer: &'l mut Layer) -> Self {
        Self {
            frame,
            offset: 0,
            layer,
        }
    }

    /// Current offset relative to the start of the frame.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn frame(&self) -> Frame<'a> {
        self.frame
    }

    pub fn reported_remaining(&self) -> usize {
        self.frame.reported_remaining(self.offset)
    }

    /// Step over bytes that carry no field (spare/reserved).
    pub fn skip(&mut self, len: usize) {
        self.offset += len;
    }

    pub fn require_len(&self, needed: usize) -> Result<(), DecodeError> {
        if self.reported_remaining() < needed {
            return Err(DecodeError::MalformedFrame {
                protocol: self.layer.protocol,
                offset: self.absolute(self.offset),
                needed,
                reported: self.frame.reported_len(),
            });
        }
        Ok(())
    }

    fn read_slice(&self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.require_len(len)?;
        self.frame
            .data()
            .get(self.offset..self.offset + len)
            .ok_or(DecodeError::CaptureTruncated {
                protocol: self.layer.protocol,
                offset: self.absolute(self.offset),
                needed: len,
                captured: self.frame.captured_len(),
            })
    }

    fn read_array<const N: usize>(&self) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn absolute(&self, offset: usize) -> usize {
        self.frame.base() + offset
    }

    fn push(&mut self, spec: &FieldSpec, offset: usize, len: usize, value: FieldValue) {
        let field = DecodedField::new(spec, self.absolute(offset), len, value);
        self.layer.fields.push(field);
    }

    fn emit(&mut self, spec: &FieldSpec, len: usize, value: FieldValue) {
        self.push(spec, self.offset, len, value);
        self.offset += len;
    }

    /// Read one byte without emitting a field, for packed bytes whose
    /// sub-fields are derived by the caller.
    pub fn take_u8(&mut self) -> Result<u8, DecodeError> {
        let [value] = self.read_array::<1>()?;
        self.offset += 1;
        Ok(value)
    }

    /// Emit a value derived from bytes already consumed at `offset`.
    pub fn add_u8_at(&mut self, spec: &FieldSpec, offset: usize, value: u8) {
        self.push(spec, offset, 1, FieldValue::U8(value));
    }

    pub fn read_u8(&mut self, spec: &FieldSpec) -> Result<u8, DecodeError> {
        let [value] = self.read_array::<1>()?;
        self.emit(spec, 1, FieldValue::U8(value));
        Ok(value)
    }

    pub fn read_u16_be(&mut self, spec: &FieldSpec) -> Result<u16, DecodeError> {
        let value = u16::from_be_bytes(self.read_array()?);
        self.emit(spec, 2, FieldValue::U16(value));
        Ok(value)
    }

    pub fn read_u16_le(&mut self, spec: &FieldSpec) -> Result<u16, DecodeError> {
        let value = u16::from_le_bytes(self.read_array()?);
        self.emit(spec, 2, FieldValue::U16(value));
        Ok(value)
    }

    pub fn read_u32_be(&mut self, spec: &FieldSpec) -> Result<u32, DecodeError> {
        let value = u32::from_be_bytes(self.read_array()?);
        self.emit(spec, 4, FieldValue::U32(value));
        Ok(value)
    }

    pub fn read_u32_le(&mut self, spec: &FieldSpec) -> Result<u32, DecodeError> {
        let value = u32::from_le_bytes(self.read_array()?);
        self.emit(spec, 4, FieldValue::U32(value));
        Ok(value)
    }

    /// Read a flag byte once and emit the raw value followed by one boolean
    /// per bit in `bits`, all covering the same byte.
    pub fn read_flags_u8(
        &mut self,
        spec: &FieldSpec,
        bits: &[FieldSpec],
    ) -> Result<u8, DecodeError> {
        let [raw] = self.read_array::<1>()?;
        let offset = self.offset;
        self.push(spec, offset, 1, FieldValue::U8(raw));
        for bit in bits {
            let set = u32::from(raw) & bit.bitmask != 0;
            self.push(bit, offset, 1, FieldValue::Bool(set));
        }
        self.offset += 1;
        Ok(raw)
    }

    /// Emit an opaque byte range of `len` reported bytes. Only the captured
    /// part is copied into the value.
    pub fn read_bytes(&mut self, spec: &FieldSpec, len: usize) -> Result<(), DecodeError> {
        self.require_len(len)?;
        let data = self.frame.data();
        let start = self.offset.min(data.len());
        let end = (self.offset + len).min(data.len());
        let captured = data[start..end].to_vec();
        self.emit(spec, len, FieldValue::Bytes(captured));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::FieldCursor;
    use crate::protocols::common::error::DecodeError;
    use crate::protocols::common::field::{DisplayRadix, FieldKind, FieldSpec, FieldValue};
    use crate::protocols::common::frame::Frame;
    use crate::protocols::common::tree::Layer;

    const BYTE: FieldSpec = FieldSpec::uint("Byte", "test.byte", FieldKind::U8, DisplayRadix::Hex);
    const WORD: FieldSpec = FieldSpec::uint("Word", "test.word", FieldKind::U16, DisplayRadix::Dec);
    const LONG: FieldSpec = FieldSpec::uint("Long", "test.long", FieldKind::U32, DisplayRadix::Dec);
    const FLAGS: FieldSpec =
        FieldSpec::uint("Flags", "test.flags", FieldKind::U8, DisplayRadix::Hex);
    const HIGH: FieldSpec = FieldSpec::flag("High", "test.flags.high", 0x80);
    const LOW: FieldSpec = FieldSpec::flag("Low", "test.flags.low", 0x01);
    const DATA: FieldSpec = FieldSpec::bytes("Data", "test.data");

    #[test]
    fn reads_advance_and_record_fields() {
        let bytes = [0x7f, 0x12, 0x34, 0x01, 0x02, 0x03, 0x04];
        let frame = Frame::new(&bytes);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        assert_eq!(cursor.read_u8(&BYTE).unwrap(), 0x7f);
        assert_eq!(cursor.read_u16_be(&WORD).unwrap(), 0x1234);
        assert_eq!(cursor.read_u32_le(&LONG).unwrap(), 0x0403_0201);
        assert_eq!(cursor.offset(), 7);

        let offsets: Vec<_> = layer.fields.iter().map(|f| (f.offset, f.length)).collect();
        assert_eq!(offsets, vec![(0, 1), (1, 2), (3, 4)]);
    }

    #[test]
    fn flags_share_one_byte() {
        let bytes = [0x81];
        let frame = Frame::new(&bytes);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        assert_eq!(cursor.read_flags_u8(&FLAGS, &[HIGH, LOW]).unwrap(), 0x81);
        assert_eq!(cursor.offset(), 1);
        assert_eq!(layer.fields.len(), 3);
        assert!(layer.fields.iter().all(|f| f.offset == 0 && f.length == 1));
        assert_eq!(layer.fields[1].value, FieldValue::Bool(true));
        assert_eq!(layer.fields[2].value, FieldValue::Bool(true));
    }

    #[test]
    fn short_reported_length_is_malformed() {
        let bytes = [0x01];
        let frame = Frame::new(&bytes);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        let err = cursor.read_u16_le(&WORD).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MalformedFrame {
                needed: 2,
                reported: 1,
                ..
            }
        ));
        assert!(layer.fields.is_empty());
    }

    #[test]
    fn missing_captured_bytes_are_truncated() {
        let bytes = [0x01];
        let frame = Frame::with_reported_len(&bytes, 4);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        cursor.skip(1);
        let err = cursor.read_u16_be(&WORD).unwrap_err();
        assert!(matches!(err, DecodeError::CaptureTruncated { captured: 1, .. }));
    }

    #[test]
    fn bytes_copy_only_captured_part() {
        let bytes = [0xaa, 0xbb];
        let frame = Frame::with_reported_len(&bytes, 5);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        cursor.read_bytes(&DATA, 5).unwrap();
        let field = &layer.fields[0];
        assert_eq!(field.length, 5);
        assert_eq!(field.value, FieldValue::Bytes(vec![0xaa, 0xbb]));
    }

    #[test]
    fn offsets_are_absolute_in_subsets() {
        let bytes = [0u8, 0, 0, 0x42];
        let frame = Frame::new(&bytes).subset_remaining(3);
        let mut layer = Layer::new("test", &frame);
        let mut cursor = FieldCursor::new(frame, &mut layer);

        cursor.read_u8(&BYTE).unwrap();
        assert_eq!(layer.fields[0].offset, 3);
        assert_eq!(layer.offset, 3);
    }
}
