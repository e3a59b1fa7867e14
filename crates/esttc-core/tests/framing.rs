use esttc_core::protocol::{
    build_frame, crc16, Command, Frame, ProtocolError, FRAME_OVERHEAD, MAX_PAYLOAD_SIZE, PREAMBLE,
    SYNC,
};
use pretty_assertions::assert_eq;

#[test]
fn test_crc16_check_value() {
    assert_eq!(crc16(b"123456789"), 0x29B1);
}

#[test]
fn test_crc16_differs_from_xmodem_and_kermit() {
    // Same polynomial, different init/reflection: XMODEM gives 0x31C3, KERMIT 0x2189
    let crc = crc16(b"123456789");
    assert_ne!(crc, 0x31C3);
    assert_ne!(crc, 0x2189);
}

#[test]
fn test_every_command_frames_correctly() {
    for cmd in Command::ALL {
        let payload = cmd.payload();
        let frame = build_frame(payload).unwrap();

        let mut length_prefixed = vec![payload.len() as u8];
        length_prefixed.extend_from_slice(payload);

        assert_eq!(frame.checksum(), crc16(&length_prefixed), "{cmd}");
        assert_eq!(frame.encoded_size(), 5 + 1 + 1 + payload.len() + 2, "{cmd}");
        assert_eq!(frame.length() as usize, payload.len());
        assert_eq!(frame.payload(), payload);

        let bytes = frame.as_bytes();
        assert_eq!(&bytes[..5], &PREAMBLE[..]);
        assert_eq!(bytes[5], SYNC);
        assert_eq!(&bytes[6..bytes.len() - 2], &length_prefixed[..]);
        assert_eq!(&bytes[bytes.len() - 2..], &frame.checksum().to_be_bytes()[..]);
    }
}

#[test]
fn test_known_frame_on_air() {
    let frame = Frame::build(Command::ReadStatusControlWord.payload()).unwrap();
    assert_eq!(
        frame.as_bytes(),
        &[
            0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0x7E, 0x12, b'E', b'S', b'+', b'R', b'2', b'2', b'0',
            b'0', b' ', b'B', b'D', b'8', b'8', b'8', b'E', b'1', b'F', b'\r', 0x46, 0x70,
        ][..]
    );
}

#[test]
fn test_catalog_frames_on_air() {
    let expected = [
        (
            Command::ReadStatusControlWord,
            "AAAAAAAAAA7E1245532B52323230302042443838384531460D4670",
        ),
        (
            Command::EnableBeacons,
            "AAAAAAAAAA7E1745532B5732323030333434302039323837454633410044F3DB",
        ),
        (
            Command::DisableBeacons,
            "AAAAAAAAAA7E1745532B5732323030333430302046364542324133450044CECE",
        ),
        (
            Command::SetBeaconPeriod,
            "AAAAAAAAAA7E1B45532B5732323037303030303030303520414532413446364500441CBD",
        ),
        (
            Command::ReadUptime,
            "AAAAAAAAAA7E1345532B52323230322035333836454633330044C559",
        ),
        (
            Command::ReadReceivedPacketCount,
            "AAAAAAAAAA7E1345532B52323230342042414535344130360044498E",
        ),
    ];

    for (cmd, hex) in expected {
        assert_eq!(build_frame(cmd.payload()).unwrap().to_hex(), hex, "{cmd}");
    }
}

#[test]
fn test_enable_beacons_keeps_nul_d_tail() {
    let payload = Command::EnableBeacons.payload();
    assert_eq!(payload, b"ES+W22003440 9287EF3A\x00D");
    assert_eq!(payload.len(), 23);
}

#[test]
fn test_payload_size_limit() {
    let max = vec![0x55u8; 255];
    let frame = build_frame(&max).expect("255 bytes must fit");
    assert_eq!(frame.length(), 255);
    assert_eq!(frame.encoded_size(), FRAME_OVERHEAD + 255);

    let too_big = vec![0x55u8; 256];
    assert_eq!(
        build_frame(&too_big),
        Err(ProtocolError::PayloadTooLarge {
            len: 256,
            max: MAX_PAYLOAD_SIZE,
        })
    );
}

#[test]
fn test_frame_is_deterministic() {
    let a = build_frame(Command::EnableBeacons.payload()).unwrap();
    let b = build_frame(Command::EnableBeacons.payload()).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, build_frame(Command::DisableBeacons.payload()).unwrap());
}

#[test]
fn test_decode_every_command() {
    for cmd in Command::ALL {
        let frame = build_frame(cmd.payload()).unwrap();
        let mut received = frame.as_bytes().to_vec();
        // Trailing noise after the checksum is ignored
        received.extend_from_slice(&[0x00, 0xFF]);
        let decoded = Frame::from_bytes(&received).unwrap();
        assert_eq!(decoded.payload(), cmd.payload());
    }
}

#[test]
fn test_error_display() {
    let err = ProtocolError::PayloadTooLarge { len: 300, max: 255 };
    assert_eq!(err.to_string(), "Payload too large: 300 bytes (maximum 255)");

    let err = ProtocolError::CrcMismatch {
        expected: 0x4670,
        actual: 0x0001,
    };
    assert_eq!(err.to_string(), "CRC mismatch: expected 0x4670, got 0x0001");
}
