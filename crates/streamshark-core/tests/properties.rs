use streamshark_core::{DecodeError, FieldValue, Frame, default_registry};

mod support;

use support::{axisp_frame, rssi_regular};

#[test]
fn axisp_header_payload_and_tail_partition_the_frame() {
    for payload_len in 0..48 {
        let bytes = axisp_frame(&vec![0x5a; payload_len]);
        let dissection = default_registry()
            .dissect("axisp", Frame::new(&bytes))
            .unwrap();
        assert!(dissection.is_ok(), "payload length {payload_len}");

        let payload = dissection.field("axisp.payload").expect("payload field");
        assert_eq!(payload.offset, 8);
        assert_eq!(payload.length, bytes.len() - 16);
        let crc = dissection.field("axisp.crc").expect("crc field");
        assert_eq!(crc.end(), bytes.len());
        let tuser_last = dissection.field("axisp.tuser_last").expect("tuser_last field");
        assert_eq!(tuser_last.offset, payload.end());
    }
}

#[test]
fn every_field_lies_within_the_reported_length() {
    for len in 0..40 {
        let mut bytes = rssi_regular(&axisp_frame(&[0x11; 8]));
        bytes.truncate(len);
        let dissection = default_registry()
            .dissect("rssi", Frame::new(&bytes))
            .unwrap();
        for field in dissection.fields() {
            assert!(field.end() <= len, "{} ends past {len}", field.abbrev);
        }
    }
}

#[test]
fn regular_residual_is_handed_off_with_its_length() {
    for residual in 1..24 {
        let bytes = rssi_regular(&vec![0u8; residual]);
        let dissection = default_registry()
            .dissect("rssi", Frame::new(&bytes))
            .unwrap();
        let axisp = dissection.layer("axisp").expect("axisp layer");
        assert_eq!(axisp.offset, 8);
        assert_eq!(axisp.length, residual);
        match residual {
            0..=7 => assert!(matches!(dissection.error, Some(DecodeError::MalformedFrame { .. }))),
            8..=15 => assert!(matches!(
                dissection.error,
                Some(DecodeError::NegativePayloadLength { .. })
            )),
            _ => assert!(dissection.is_ok()),
        }
    }
}

#[test]
fn truncated_capture_keeps_reported_length_semantics() {
    let bytes = rssi_regular(&axisp_frame(&[1, 2, 3, 4]));
    let captured = &bytes[..18];
    let frame = Frame::with_reported_len(captured, bytes.len());
    let dissection = default_registry().dissect("rssi", frame).unwrap();

    assert!(matches!(
        dissection.error,
        Some(DecodeError::CaptureTruncated { protocol: "axisp", .. })
    ));
    assert_eq!(
        dissection.field("axisp.payload").map(|field| field.length),
        Some(4)
    );
    assert_eq!(
        dissection.field("axisp.payload").map(|field| &field.value),
        Some(&FieldValue::Bytes(vec![1, 2]))
    );
    assert!(dissection.field("axisp.tuser_last").is_none());
}
