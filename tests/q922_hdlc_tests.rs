use h224::{
    constants::Q922_FLAG,
    q922::{HdlcEncoded, Q922DecodeError, Q922EncodeError, Q922Frame, Q922StreamDecoder, calculate_fcs},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn random_frame(rng: &mut StdRng, information_field_size: usize) -> Q922Frame {
    let mut frame = Q922Frame::new(information_field_size);
    frame.set_high_order_address_octet(rng.random());
    frame.set_low_order_address_octet(rng.random());
    frame.set_control_field_octet(rng.random());
    rng.fill(frame.information_field_mut());
    frame
}

/// Number of bits occupied by an encode that started on an octet boundary.
fn encoded_bits(encoded: &HdlcEncoded) -> usize {
    if encoded.bit_position == 7 {
        encoded.size * 8
    } else {
        (encoded.size - 1) * 8 + (7 - encoded.bit_position as usize)
    }
}

fn bit_at(data: &[u8], index: usize) -> u8 {
    (data[index / 8] >> (7 - index % 8)) & 0x01
}

/// Builds a flag delimited bit stream around `content_bits` (already in
/// transmission order), inserting stuffed zeros.
fn hdlc_stream(content_bits: &[u8]) -> Vec<u8> {
    let mut bits = Vec::new();
    let flag_bits: Vec<u8> = (0..8).map(|i| (Q922_FLAG >> i) & 0x01).collect();

    bits.extend(&flag_bits);
    let mut ones = 0;
    for &bit in content_bits {
        bits.push(bit);
        if bit == 1 {
            ones += 1;
            if ones == 5 {
                bits.push(0);
                ones = 0;
            }
        } else {
            ones = 0;
        }
    }
    bits.extend(&flag_bits);

    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |octet, (i, &bit)| octet | (bit << (7 - i)))
        })
        .collect()
}

fn octet_bits(octets: &[u8]) -> Vec<u8> {
    octets
        .iter()
        .flat_map(|&octet| (0..8).map(move |i| (octet >> i) & 0x01))
        .collect()
}

#[test]
fn round_trip_all_small_sizes() {
    let mut rng = StdRng::seed_from_u64(0x0922);

    for size in 0..=254 {
        let frame = random_frame(&mut rng, size);

        let encoded = frame.encode_hdlc_to_vec().expect("encode failed");
        assert_eq!(encoded[0], Q922_FLAG);
        assert!(encoded.len() <= frame.hdlc_encoded_size());

        let mut decoded = Q922Frame::new(0);
        decoded.decode_hdlc(&encoded).expect("decode failed");

        assert_eq!(decoded.as_bytes(), frame.as_bytes(), "size {}", size);
    }
}

#[test]
fn header_only_frame_round_trips() {
    let mut frame = Q922Frame::new(0);
    frame.set_low_order_address_octet(0x61);
    frame.set_control_field_octet(0x03);

    let encoded = frame.encode_hdlc_to_vec().expect("encode failed");

    let mut decoded = Q922Frame::default();
    decoded.decode_hdlc(&encoded).expect("decode failed");

    assert_eq!(decoded.information_field_size(), 0);
    assert_eq!(decoded, frame);
}

#[test]
fn all_ones_content_round_trips() {
    let mut frame = Q922Frame::new(64);
    frame.set_high_order_address_octet(0xFF);
    frame.set_low_order_address_octet(0xFF);
    frame.set_control_field_octet(0xFF);
    frame.information_field_mut().fill(0xFF);

    let encoded = frame.encode_hdlc_to_vec().expect("encode failed");

    let mut decoded = Q922Frame::new(0);
    decoded.decode_hdlc(&encoded).expect("decode failed");
    assert_eq!(decoded.as_bytes(), frame.as_bytes());
}

#[test]
fn no_six_ones_between_flags() {
    let mut rng = StdRng::seed_from_u64(7);

    for size in [0usize, 1, 2, 17, 128, 254] {
        let mut frame = random_frame(&mut rng, size);
        // Long runs of ones force stuffing.
        frame.information_field_mut().iter_mut().step_by(3).for_each(|b| *b = 0xFF);

        let mut buf = vec![0; frame.hdlc_encoded_size()];
        let encoded = frame.encode_hdlc_at(&mut buf, 7).expect("encode failed");
        let total_bits = encoded_bits(&encoded);

        let mut ones = 0;
        for index in 8..total_bits - 8 {
            if bit_at(&buf, index) == 1 {
                ones += 1;
                assert!(ones <= 5, "run of six ones at bit {} (size {})", index, size);
            } else {
                ones = 0;
            }
        }
    }
}

#[test]
fn single_bit_flip_between_flags_is_rejected() {
    let mut rng = StdRng::seed_from_u64(42);
    let frame = random_frame(&mut rng, 24);

    let mut buf = vec![0; frame.hdlc_encoded_size()];
    let encoded = frame.encode_hdlc_at(&mut buf, 7).expect("encode failed");
    buf.truncate(encoded.size);
    let total_bits = encoded_bits(&encoded);

    for index in 8..total_bits - 8 {
        let mut corrupted = buf.clone();
        corrupted[index / 8] ^= 0x80 >> (index % 8);

        let mut decoded = Q922Frame::new(0);
        let result = decoded.decode_hdlc(&corrupted);

        assert!(
            !(result.is_ok() && decoded.as_bytes() == frame.as_bytes()),
            "flip at bit {} went unnoticed",
            index
        );
    }
}

#[test]
fn leading_idle_fill_is_skipped() {
    let mut rng = StdRng::seed_from_u64(3);
    let frame = random_frame(&mut rng, 40);
    let encoded = frame.encode_hdlc_to_vec().expect("encode failed");

    let mut flag_filled = vec![Q922_FLAG; 5];
    flag_filled.extend(&encoded);

    let mut ones_filled = vec![0xFF; 3];
    ones_filled.extend(&encoded);

    for input in [flag_filled, ones_filled] {
        let mut decoded = Q922Frame::new(0);
        decoded.decode_hdlc(&input).expect("decode failed");
        assert_eq!(decoded.as_bytes(), frame.as_bytes());
    }
}

#[test]
fn input_without_frame_fails() {
    let mut frame = Q922Frame::default();

    assert_eq!(frame.decode_hdlc(&[]), Err(Q922DecodeError::NoFlag));
    assert_eq!(frame.decode_hdlc(&[0x00; 8]), Err(Q922DecodeError::NoFlag));
    assert_eq!(
        frame.decode_hdlc(&[Q922_FLAG; 8]),
        Err(Q922DecodeError::IncompleteFrame)
    );
}

#[test]
fn flag_needs_its_leading_zero() {
    let mut frame = Q922Frame::default();

    // `1111110` at the very start of the input is not a flag.
    assert_eq!(frame.decode_hdlc(&[0xFC]), Err(Q922DecodeError::NoFlag));
    assert_eq!(frame.decode_hdlc(&[0xFC, 0xFF]), Err(Q922DecodeError::NoFlag));

    assert_eq!(
        frame.decode_hdlc(&[Q922_FLAG]),
        Err(Q922DecodeError::IncompleteFrame)
    );

    let mut decoder = Q922StreamDecoder::new();
    assert_eq!(decoder.read_bytes(&[0xFC]).count(), 0);
}

#[test]
fn truncated_frame_is_incomplete() {
    let mut rng = StdRng::seed_from_u64(11);
    let frame = random_frame(&mut rng, 16);
    let encoded = frame.encode_hdlc_to_vec().expect("encode failed");

    let mut decoded = Q922Frame::new(0);
    assert_eq!(
        decoded.decode_hdlc(&encoded[..encoded.len() / 2]),
        Err(Q922DecodeError::IncompleteFrame)
    );
}

#[test]
fn fcs_mismatch_is_reported() {
    let content = [0x00, 0x61, 0x03, 0x10, 0x20];
    let expected = calculate_fcs(&content);
    let received = expected ^ 0x0100;

    let mut octets = content.to_vec();
    octets.extend(received.to_le_bytes());

    let mut frame = Q922Frame::default();
    assert_eq!(
        frame.decode_hdlc(&hdlc_stream(&octet_bits(&octets))),
        Err(Q922DecodeError::FcsMismatch { expected, received })
    );
}

#[test]
fn short_and_misaligned_candidates_are_rejected() {
    let mut frame = Q922Frame::default();

    assert_eq!(
        frame.decode_hdlc(&hdlc_stream(&octet_bits(&[0x00, 0x61, 0x03, 0x00]))),
        Err(Q922DecodeError::FrameTooShort { size: 4 })
    );

    let mut bits = octet_bits(&[0x00, 0x61, 0x03, 0x00, 0x00, 0x00]);
    bits.extend([0, 0, 0]);
    assert_eq!(
        frame.decode_hdlc(&hdlc_stream(&bits)),
        Err(Q922DecodeError::MisalignedFrame { bits: 51 })
    );
}

#[test]
fn encode_argument_errors() {
    let frame = Q922Frame::new(8);
    let mut buf = vec![0; frame.hdlc_encoded_size()];

    assert_eq!(
        frame.encode_hdlc_at(&mut buf, 8),
        Err(Q922EncodeError::InvalidBitPosition(8))
    );

    let mut small = [0u8; 4];
    assert!(matches!(
        frame.encode_hdlc(&mut small),
        Err(Q922EncodeError::BufferTooSmall { available: 4, .. })
    ));
}

#[test]
fn encode_at_keeps_preceding_bits() {
    let frame = Q922Frame::new(4);
    let mut buf = vec![0xFF; frame.hdlc_encoded_size()];

    let encoded = frame.encode_hdlc_at(&mut buf, 3).expect("encode failed");

    // Bits 7..=4 belong to the previous frame; the flag starts at bit 3.
    assert_eq!(buf[0] & 0xF0, 0xF0);
    assert_eq!(buf[0] & 0x0F, Q922_FLAG >> 4);
    assert!(encoded.size <= buf.len());
    assert!(encoded.bit_position <= 7);
}

#[test]
fn chained_frames_decode_from_stream() {
    let mut rng = StdRng::seed_from_u64(0x7E7E);
    let frames: Vec<Q922Frame> = (0..32)
        .map(|_| {
            let size = rng.random_range(0..64);
            random_frame(&mut rng, size)
        })
        .collect();

    let capacity: usize = frames.iter().map(|f| f.hdlc_encoded_size()).sum();
    let mut stream = vec![0u8; capacity];
    let mut offset = 0;
    let mut bit_position = 7;

    for frame in &frames {
        let encoded = frame
            .encode_hdlc_at(&mut stream[offset..], bit_position)
            .expect("encode failed");

        offset += if encoded.bit_position == 7 {
            encoded.size
        } else {
            encoded.size - 1
        };
        bit_position = encoded.bit_position;
    }
    stream.truncate(offset + usize::from(bit_position != 7));

    let mut decoder = Q922StreamDecoder::new();
    let mut decoded = Vec::new();
    let mut remaining = &stream[..];

    while !remaining.is_empty() {
        let chunk_size = rng.random_range(1..=17).min(remaining.len());
        let (chunk, rest) = remaining.split_at(chunk_size);
        remaining = rest;

        for result in decoder.read_bytes(chunk) {
            decoded.push(result.expect("stream decode failed"));
        }
    }

    assert_eq!(decoded, frames);
}

#[test]
fn stream_decoder_discards_aborted_frame() {
    let mut rng = StdRng::seed_from_u64(5);
    let frame = random_frame(&mut rng, 12);

    let mut stream = vec![Q922_FLAG, 0x12, 0x34, 0xFF, 0xFF];
    stream.extend(frame.encode_hdlc_to_vec().expect("encode failed"));

    let mut decoder = Q922StreamDecoder::default();
    let results: Vec<_> = decoder.read_bytes(&stream).collect();

    assert_eq!(results, vec![Ok(frame.clone())]);

    let mut single = Q922Frame::new(0);
    single.decode_hdlc(&stream).expect("decode failed");
    assert_eq!(single, frame);
}

#[test]
fn stream_decoder_reports_bad_frame_and_recovers() {
    let content = [0x00, 0x61, 0x03, 0xAB];
    let mut octets = content.to_vec();
    octets.extend((calculate_fcs(&content) ^ 0xFFFF).to_le_bytes());

    let mut good = Q922Frame::new(3);
    good.set_low_order_address_octet(0x71);
    good.information_field_mut().copy_from_slice(&[1, 2, 3]);

    let mut stream = hdlc_stream(&octet_bits(&octets));
    stream.extend(good.encode_hdlc_to_vec().expect("encode failed"));

    let mut decoder = Q922StreamDecoder::new();
    let results: Vec<_> = decoder.read_bytes(&stream).collect();

    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0],
        Err(Q922DecodeError::FcsMismatch { .. })
    ));
    assert_eq!(results[1], Ok(good));
}

#[test]
fn stream_decoder_enforces_maximum_and_recovers() {
    let large = Q922Frame::new(10);
    let small = Q922Frame::new(2);

    let mut stream = large.encode_hdlc_to_vec().expect("encode failed");
    stream.extend(small.encode_hdlc_to_vec().expect("encode failed"));

    let mut decoder = Q922StreamDecoder::with_max_information_field_size(4);
    let results: Vec<_> = decoder.read_bytes(&stream).collect();

    assert_eq!(results.len(), 2);
    assert!(matches!(
        results[0],
        Err(Q922DecodeError::InformationFieldTooLarge { max: 4, .. })
    ));

    let decoded = results[1].as_ref().expect("small frame should decode");
    assert_eq!(decoded.as_bytes(), small.as_bytes());
    assert_eq!(decoded.max_information_field_size(), 4);
}

#[test]
fn stream_decoder_reset_drops_partial_frame() {
    let mut rng = StdRng::seed_from_u64(9);
    let first = random_frame(&mut rng, 20);
    let second = random_frame(&mut rng, 20);

    let first_encoded = first.encode_hdlc_to_vec().expect("encode failed");
    let second_encoded = second.encode_hdlc_to_vec().expect("encode failed");

    let mut decoder = Q922StreamDecoder::new();
    assert_eq!(decoder.read_bytes(&first_encoded[..10]).count(), 0);

    decoder.reset();

    let results: Vec<_> = decoder.read_bytes(&second_encoded).collect();
    assert_eq!(results, vec![Ok(second)]);
}
