use serde::Serialize;

/// Display radix requested for a field by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayRadix {
    Hex,
    Dec,
    Bool,
    None,
}

/// Value type of a field, as advertised in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    U8,
    U16,
    U32,
    Bool,
    Bytes,
}

/// Static description of one field: the registration entry the presentation
/// layer uses to label values.
///
/// `bitmask` is non-zero only for flag bits carved out of a wider integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub abbrev: &'static str,
    pub kind: FieldKind,
    pub radix: DisplayRadix,
    #[serde(skip_serializing_if = "is_zero")]
    pub bitmask: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl FieldSpec {
    pub const fn uint(
        name: &'static str,
        abbrev: &'static str,
        kind: FieldKind,
        radix: DisplayRadix,
    ) -> Self {
        Self {
            name,
            abbrev,
            kind,
            radix,
            bitmask: 0,
        }
    }

    pub const fn flag(name: &'static str, abbrev: &'static str, bitmask: u32) -> Self {
        Self {
            name,
            abbrev,
            kind: FieldKind::Bool,
            radix: DisplayRadix::Bool,
            bitmask,
        }
    }

    pub const fn bytes(name: &'static str, abbrev: &'static str) -> Self {
        Self {
            name,
            abbrev,
            kind: FieldKind::Bytes,
            radix: DisplayRadix::None,
            bitmask: 0,
        }
    }
}

/// Typed value extracted for a field.
///
/// `Bytes` carries only the captured portion of a range; the field's
/// `length` may be larger for truncated captures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U8(v) => Some(u64::from(*v)),
            FieldValue::U16(v) => Some(u64::from(*v)),
            FieldValue::U32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

/// One extracted primitive: where it lives in the packet and what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedField {
    pub abbrev: &'static str,
    pub name: &'static str,
    /// Absolute offset within the top-level packet.
    pub offset: usize,
    pub length: usize,
    pub value: FieldValue,
    pub radix: DisplayRadix,
}

impl DecodedField {
    pub fn new(spec: &FieldSpec, offset: usize, length: usize, value: FieldValue) -> Self {
        Self {
            abbrev: spec.abbrev,
            name: spec.name,
            offset,
            length,
            value,
            radix: spec.radix,
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::{DisplayRadix, FieldKind, FieldSpec, FieldValue};

    #[test]
    fn flag_spec_serializes_bitmask() {
        let spec = FieldSpec::flag("SYN", "rssi.flags.syn", 0x80);
        let value = serde_json::to_value(spec).expect("spec json");
        assert_eq!(value["bitmask"], 0x80);
        assert_eq!(value["radix"], "bool");
    }

    #[test]
    fn uint_spec_omits_bitmask() {
        let spec = FieldSpec::uint("TId", "axisp.tid", FieldKind::U8, DisplayRadix::Hex);
        let value = serde_json::to_value(spec).expect("spec json");
        assert!(value.get("bitmask").is_none());
        assert_eq!(value["kind"], "u8");
    }

    #[test]
    fn value_accessors() {
        assert_eq!(FieldValue::U16(0x2301).as_u64(), Some(0x2301));
        assert_eq!(FieldValue::Bool(true).as_bool(), Some(true));
        assert_eq!(FieldValue::Bool(true).as_u64(), None);
        assert_eq!(FieldValue::Bytes(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }
}
