use lsb_codec::{
    PixelBuffer, StegoError,
    channels::channel_offset,
    payload::required_bits,
    steganography::{capacity_bits, decode, encode, max_message_len},
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn random_cover(width: u32, height: u32, channels: usize, seed: u64) -> PixelBuffer {
    let mut data = vec![0u8; width as usize * height as usize * channels];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    PixelBuffer::new(width, height, channels, data).unwrap()
}

/// 按流顺序把给定的比特写进全零 RGB 图像的最低位
fn lsb_fixture(width: u32, height: u32, bits: &[u8]) -> PixelBuffer {
    let mut data = vec![0u8; width as usize * height as usize * 3];
    for (i, &bit) in bits.iter().enumerate() {
        data[channel_offset(i, 3)] = 0x80 | bit;
    }
    PixelBuffer::new(width, height, 3, data).unwrap()
}

fn be_bits(value: u32) -> Vec<u8> {
    (0..32).rev().map(|s| ((value >> s) & 1) as u8).collect()
}

#[test]
fn round_trip_including_empty_message() {
    let cover = random_cover(32, 32, 3, 1);
    let messages: [&[u8]; 4] = [b"", b"x", "多字节文本 🦀".as_bytes(), &[0u8; 300]];

    for message in messages {
        let carrier = encode(&cover, message).unwrap();
        assert_eq!(decode(&carrier).unwrap(), message);
    }
}

#[test]
fn four_by_four_scenario() {
    let cover = random_cover(4, 4, 3, 2);
    assert_eq!(capacity_bits(&cover).unwrap(), 48);
    assert_eq!(max_message_len(&cover).unwrap(), 2);

    let carrier = encode(&cover, b"Hi").unwrap();
    assert_eq!(decode(&carrier).unwrap(), b"Hi");

    let err = encode(&cover, b"Hey").unwrap_err();
    assert!(matches!(
        err,
        StegoError::CapacityExceeded {
            required: 56,
            available: 48
        }
    ));
}

#[test]
fn capacity_boundary() {
    // 19 pixels * 3 channels = 57 bits; "Hey" needs 56
    let roomy = random_cover(19, 1, 3, 3);
    assert!(encode(&roomy, b"Hey").is_ok());

    // 18 pixels = 54 bits, the closest an RGB cover gets to 56 from below
    let short = random_cover(18, 1, 3, 3);
    assert!(matches!(
        encode(&short, b"Hey").unwrap_err(),
        StegoError::CapacityExceeded {
            required: 56,
            available: 54
        }
    ));

    // 16 RGBA pixels = 48 bits, exactly the size of a 2-byte payload
    let exact = random_cover(16, 1, 4, 4);
    assert_eq!(required_bits(2), capacity_bits(&exact).unwrap());
    assert_eq!(decode(&encode(&exact, b"ok").unwrap()).unwrap(), b"ok");

    let err = encode(&exact, b"ok!").unwrap_err();
    assert!(matches!(err, StegoError::CapacityExceeded { .. }));
}

#[test]
fn encodes_are_independent() {
    let cover = random_cover(16, 16, 3, 5);
    let pristine = cover.clone();

    let first = encode(&cover, b"first message").unwrap();
    let second = encode(&cover, b"second message").unwrap();
    let first_again = encode(&cover, b"first message").unwrap();

    assert_ne!(first, second);
    assert_eq!(first, first_again);
    assert_eq!(cover, pristine);
    assert_eq!(decode(&second).unwrap(), b"second message");
}

#[test]
fn only_lsbs_of_touched_channels_change() {
    let cover = random_cover(12, 12, 4, 6);
    let message = b"bit isolation";
    let carrier = encode(&cover, message).unwrap();

    let touched: Vec<usize> = (0..required_bits(message.len()))
        .map(|i| channel_offset(i, 4))
        .collect();
    let (old, new) = (cover.as_raw(), carrier.as_raw());

    for offset in 0..old.len() {
        if touched.contains(&offset) {
            assert!(old[offset] ^ new[offset] <= 1, "offset {offset}");
        } else {
            assert_eq!(old[offset], new[offset], "offset {offset}");
        }
    }
    assert_eq!(carrier.width(), cover.width());
    assert_eq!(carrier.height(), cover.height());
}

#[test]
fn all_zero_image_decodes_to_empty_message() {
    let blank = PixelBuffer::new(4, 4, 3, vec![0; 48]).unwrap();
    assert_eq!(decode(&blank).unwrap(), Vec::<u8>::new());
}

#[test]
fn plain_image_with_small_prefix_decodes_garbage() {
    let mut bits = be_bits(1);
    bits.extend([0, 1, 0, 1, 1, 0, 1, 0]);
    let image = lsb_fixture(4, 4, &bits);

    assert_eq!(decode(&image).unwrap(), vec![0x5A]);
}

#[test]
fn plain_image_with_oversized_prefix_is_truncated() {
    let image = lsb_fixture(4, 4, &be_bits(3));

    let err = decode(&image).unwrap_err();
    assert!(matches!(
        err,
        StegoError::TruncatedPayload {
            required: 56,
            available: 48
        }
    ));

    let saturated = PixelBuffer::new(4, 4, 3, vec![0xFF; 48]).unwrap();
    assert!(matches!(
        decode(&saturated),
        Err(StegoError::TruncatedPayload { .. })
    ));
}

#[test]
fn image_smaller_than_prefix_is_truncated() {
    let tiny = PixelBuffer::new(2, 2, 3, vec![0; 12]).unwrap();
    assert!(matches!(
        decode(&tiny),
        Err(StegoError::TruncatedPayload {
            required: 32,
            available: 12
        })
    ));
}

#[test]
fn mismatched_buffer_is_invalid_image() {
    assert!(matches!(
        PixelBuffer::new(4, 4, 3, vec![0; 47]),
        Err(StegoError::InvalidImage(_))
    ));
    assert!(matches!(
        PixelBuffer::new(4, 4, 2, vec![0; 32]),
        Err(StegoError::InvalidImage(_))
    ));
}
