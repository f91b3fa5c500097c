#[cfg(test)]
mod tests {
    use crate::image_pipeline::nef::predictor::delta_code;
    use crate::image_pipeline::nef::{
        BitWriter, DEFAULT_STARTING_PREDICTIVE_VALUE, MAX_MAGNITUDE_CLASS, NefEncodeError,
        NefEncodeParams, OUTPUT_MARGIN_BYTES, Predictor, encode, encode_to_vec, lookup,
    };

    struct BitReader<'a> {
        data: &'a [u8],
        pos: usize,
    }

    impl<'a> BitReader<'a> {
        fn new(data: &'a [u8]) -> Self {
            Self { data, pos: 0 }
        }

        fn read_bit(&mut self) -> u32 {
            let byte = self.data[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            self.pos += 1;
            bit as u32
        }

        fn read_bits(&mut self, count: u32) -> u32 {
            (0..count).fold(0, |acc, _| (acc << 1) | self.read_bit())
        }

        fn read_class(&mut self) -> u32 {
            let mut code = 0;
            for length in 1..=8 {
                code = (code << 1) | self.read_bit();
                let hit = (0..=MAX_MAGNITUDE_CLASS).find(|&class| {
                    let huff = lookup(class).unwrap();
                    huff.length == length && huff.value == code
                });
                if let Some(class) = hit {
                    return class;
                }
            }
            panic!("no code matches {code:#x}");
        }
    }

    fn signed_delta(class: u32, bits: u32) -> i32 {
        if class == 0 {
            0
        } else if bits & (1 << (class - 1)) == 0 {
            bits as i32 - ((1 << class) - 1)
        } else {
            bits as i32
        }
    }

    fn decode_image(params: &NefEncodeParams, stream: &[u8]) -> Vec<u16> {
        let mut reader = BitReader::new(stream);
        let mut predictor = Predictor::new(params.starting_predictive_value);
        let mut pixels = Vec::with_capacity(params.rows * params.columns);
        for row in 0..params.rows {
            for column in 0..params.columns {
                let class = reader.read_class();
                let bits = reader.read_bits(class);
                let pixel = predictor
                    .predict(row, column)
                    .wrapping_add(signed_delta(class, bits) as u16);
                predictor.observe(row, column, pixel).unwrap();
                pixels.push(pixel);
            }
        }
        pixels
    }

    fn noisy_image(columns: usize, rows: usize, seed: u32) -> Vec<u16> {
        let mut state = seed;
        (0..columns * rows)
            .map(|i| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                let base = 0x0800 + (i % columns) as u32 * 7;
                ((base + (state >> 20)) & 0x3fff) as u16
            })
            .collect()
    }

    fn margin_buffer() -> Vec<u8> {
        vec![0xaa; OUTPUT_MARGIN_BYTES]
    }

    #[test]
    fn test_zero_delta_run() {
        let params = NefEncodeParams::builder()
            .columns(4)
            .rows(1)
            .starting_predictive_value(0x0800)
            .build();
        let source = [0x0800u16; 4];
        let mut output = margin_buffer();

        let bytes = encode(&params, &source, &mut output).unwrap();

        assert_eq!(bytes, 3);
        assert_eq!(&output[..4], &[0xfb, 0xef, 0xbe, 0x00]);
        assert_eq!(output[4], 0xaa);
    }

    #[test]
    fn test_code_table_literal() {
        let expected = [
            (6, 0x3e),
            (7, 0x7e),
            (6, 0x3d),
            (5, 0x1c),
            (4, 0x0c),
            (3, 0x04),
            (3, 0x02),
            (2, 0x00),
            (3, 0x03),
            (3, 0x05),
            (4, 0x0d),
            (5, 0x1d),
            (6, 0x3c),
            (8, 0xfe),
            (8, 0xff),
        ];
        for (class, &(length, value)) in expected.iter().enumerate() {
            let huff = lookup(class as u32).unwrap();
            assert_eq!((huff.length, huff.value), (length, value), "class {class}");
        }
        assert!(lookup(15).is_none());
        assert!(lookup(u32::MAX).is_none());
    }

    #[test]
    fn test_code_table_is_prefix_free() {
        for a in 0..=MAX_MAGNITUDE_CLASS {
            for b in 0..=MAX_MAGNITUDE_CLASS {
                if a == b {
                    continue;
                }
                let long = lookup(a).unwrap();
                let short = lookup(b).unwrap();
                if short.length > long.length {
                    continue;
                }
                assert_ne!(
                    long.value >> (long.length - short.length),
                    short.value,
                    "class {b} code is a prefix of class {a}"
                );
            }
        }
    }

    #[test]
    fn test_largest_class_encodes() {
        let params = NefEncodeParams::builder()
            .columns(1)
            .rows(1)
            .starting_predictive_value(0)
            .build();
        let mut output = margin_buffer();

        let bytes = encode(&params, &[0x3fff], &mut output).unwrap();

        // 8 code bits + 14 data bits, all ones
        assert_eq!(bytes, 3);
        assert_eq!(&output[..4], &[0xff, 0xff, 0xfc, 0x00]);
    }

    #[test]
    fn test_class_past_table_fails() {
        let params = NefEncodeParams::builder()
            .columns(2)
            .rows(1)
            .starting_predictive_value(0)
            .build();
        let mut output = margin_buffer();

        let err = encode(&params, &[0x0000, 0x4000], &mut output).unwrap_err();

        assert_eq!(
            err,
            NefEncodeError::NoHuffmanEntry {
                row: 0,
                column: 1,
                class: 15
            }
        );
        assert_eq!(err.code(), -2);
    }

    #[test]
    fn test_negative_class_past_table_fails() {
        let params = NefEncodeParams::builder()
            .columns(1)
            .rows(1)
            .starting_predictive_value(0x4000)
            .build();
        let mut output = margin_buffer();

        let result = encode(&params, &[0], &mut output);

        assert!(matches!(
            result,
            Err(NefEncodeError::NoHuffmanEntry { class: 15, .. })
        ));
    }

    #[test]
    fn test_delta_code_classes() {
        assert_eq!(delta_code(0).class, 0);
        assert_eq!(delta_code(1).class, 1);
        assert_eq!(delta_code(-1).class, 1);
        assert_eq!(delta_code(2).class, 2);
        assert_eq!(delta_code(3).class, 2);
        assert_eq!(delta_code(8191).class, 13);
        assert_eq!(delta_code(8192).class, 14);
        assert_eq!(delta_code(-16383).class, 14);
        assert_eq!(delta_code(16384).class, 15);

        assert_eq!(delta_code(-1).bits, 0);
        assert_eq!(delta_code(-3).bits, 0);
        assert_eq!(delta_code(-2).bits, 1);
        assert_eq!(delta_code(5).bits, 5);
    }

    #[test]
    fn test_sign_recovered_from_class_and_bits() {
        for delta in -16383..=16383 {
            let code = delta_code(delta);
            assert!(code.class <= MAX_MAGNITUDE_CLASS);
            if code.class > 0 {
                assert!(code.bits < (1 << code.class), "delta {delta} overflows its field");
            }
            assert_eq!(signed_delta(code.class, code.bits), delta);
        }
    }

    #[test]
    fn test_source_buffer_too_small() {
        let params = NefEncodeParams::new(2, 2);
        let mut output = vec![0x55u8; OUTPUT_MARGIN_BYTES];

        let err = encode(&params, &[1, 2, 3], &mut output).unwrap_err();

        assert_eq!(
            err,
            NefEncodeError::SourceBufferTooSmall {
                required: 8,
                available: 6
            }
        );
        assert_eq!(err.code(), -1);
        assert!(output.iter().all(|&b| b == 0x55));
    }

    #[test]
    fn test_source_geometry_overflow() {
        let params = NefEncodeParams::new(usize::MAX, 2);
        let mut output = margin_buffer();

        let result = encode(&params, &[0; 4], &mut output);

        assert!(matches!(
            result,
            Err(NefEncodeError::SourceBufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_output_margin_checked_per_row() {
        let params = NefEncodeParams::new(2, 2);
        let mut output = vec![0u8; OUTPUT_MARGIN_BYTES - 1];

        let err = encode(&params, &[0x0800; 4], &mut output).unwrap_err();

        assert!(matches!(err, NefEncodeError::OutputBufferTooSmall { .. }));
        assert_eq!(err.code(), -3);
    }

    #[test]
    fn test_margin_recomputed_after_rows() {
        let columns = 64;
        let rows = 4;
        let params = NefEncodeParams::new(columns, rows);
        let source = noisy_image(columns, rows, 7);

        // Room for the first row only: the check before row 1 must fail.
        let first_row = encode_to_vec(&NefEncodeParams::new(columns, 1), &source[..columns])
            .unwrap()
            .len();
        let mut output = vec![0u8; OUTPUT_MARGIN_BYTES + first_row / 2];

        let err = encode(&params, &source, &mut output).unwrap_err();

        assert!(matches!(err, NefEncodeError::OutputBufferTooSmall { .. }));
    }

    #[test]
    fn test_empty_geometry() {
        let params = NefEncodeParams::new(16, 0);
        let mut output = Vec::new();

        assert_eq!(encode(&params, &[], &mut output), Ok(0));
    }

    #[test]
    fn test_predictor_seeding() {
        let seed = DEFAULT_STARTING_PREDICTIVE_VALUE;
        let mut predictor = Predictor::new(seed);

        assert_eq!(predictor.predict(0, 0), seed);
        assert_eq!(predictor.predict(0, 1), seed);
        assert_eq!(predictor.predict(0, 2), seed);
        assert_eq!(predictor.predict(1, 3), seed);

        predictor.observe(1, 0, 900).unwrap();
        predictor.observe(1, 1, 901).unwrap();

        assert_eq!(predictor.predict(0, 0), seed);
        assert_eq!(predictor.predict(0, 1), seed);
        assert_eq!(predictor.predict(2, 0), seed);
        assert_eq!(predictor.predict(3, 0), 900);
        assert_eq!(predictor.predict(3, 1), 901);
        assert_eq!(predictor.predict(1, 4), 900);
        assert_eq!(predictor.predict(1, 5), 901);
    }

    #[test]
    fn test_predictor_running_values_follow_row() {
        let mut predictor = Predictor::new(100);

        predictor.observe(0, 0, 110).unwrap();
        predictor.observe(0, 1, 120).unwrap();
        predictor.observe(0, 2, 130).unwrap();
        let code = predictor.observe(0, 3, 115).unwrap();

        assert_eq!(code.class, 3);
        assert_eq!(code.bits, 2);
        assert_eq!(predictor.predict(0, 4), 130);
        assert_eq!(predictor.predict(0, 5), 115);
        // row seeds only move on columns 0 and 1
        assert_eq!(predictor.predict(2, 0), 110);
        assert_eq!(predictor.predict(2, 1), 120);
    }

    #[test]
    fn test_predictor_wraps_at_16_bits() {
        let mut predictor = Predictor::new(0x0010);

        let code = predictor.observe(0, 2, 0x0000).unwrap();

        assert_eq!(code.class, 5);
        assert_eq!(predictor.predict(0, 2), 0x0000);
        assert_eq!(predictor.predict(0, 0), 0x0010);
    }

    #[test]
    fn test_predictor_unchanged_on_out_of_range() {
        let mut predictor = Predictor::new(0);

        let err = predictor.observe(0, 0, 0xffff).unwrap_err();

        assert_eq!(err.class, 16);
        assert_eq!(predictor.predict(0, 0), 0);
        assert_eq!(predictor.predict(0, 2), 0);
    }

    #[test]
    fn test_bit_writer_straddles_word_boundary() {
        let mut buffer = [0u8; 8];
        let mut writer = BitWriter::new(&mut buffer);

        writer.append_bits(20, 0xabcde).unwrap();
        assert_eq!(writer.bytes_stored(), 0);
        writer.append_bits(20, 0x12345).unwrap();
        assert_eq!(writer.bytes_stored(), 4);
        writer.flush().unwrap();

        // 40 data bits, 24 pad bits of which 3 whole bytes go uncounted
        assert_eq!(writer.bytes_stored(), 5);
        assert_eq!(buffer, [0xab, 0xcd, 0xe1, 0x23, 0x45, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_bit_writer_partial_pad_byte_counted() {
        let mut buffer = [0u8; 4];
        let mut writer = BitWriter::new(&mut buffer);

        writer.append_bits(3, 0b101).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.bytes_stored(), 1);
        assert_eq!(buffer, [0xa0, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_bit_writer_flush_on_word_boundary_is_noop() {
        let mut buffer = [0u8; 4];
        let mut writer = BitWriter::new(&mut buffer);

        writer.append_bits(16, 0xbeef).unwrap();
        writer.append_bits(16, 0xcafe).unwrap();
        writer.flush().unwrap();

        assert_eq!(writer.bytes_stored(), 4);
        assert_eq!(buffer, [0xbe, 0xef, 0xca, 0xfe]);
    }

    #[test]
    fn test_bit_writer_rejects_store_past_end() {
        let mut buffer = [0u8; 4];
        let mut writer = BitWriter::new(&mut buffer);

        writer.append_bits(31, 0).unwrap();
        writer.append_bits(1, 0).unwrap();
        let err = writer.append_bits(31, 0).and_then(|_| writer.flush()).unwrap_err();

        assert_eq!(
            err,
            NefEncodeError::OutputBufferTooSmall {
                required: 8,
                capacity: 4
            }
        );
    }

    #[test]
    #[should_panic(expected = "append of 32 bits")]
    fn test_bit_writer_rejects_full_word_append() {
        let mut buffer = [0u8; 8];
        let mut writer = BitWriter::new(&mut buffer);

        let _ = writer.append_bits(32, 0xffff_ffff);
    }

    #[test]
    fn test_multi_row_encode_with_margin_sized_buffer() {
        let params = NefEncodeParams::new(10, 3);
        let source = noisy_image(10, 3, 99);
        let mut tight = margin_buffer();
        let mut sized = vec![0u8; source.len() * 2 + OUTPUT_MARGIN_BYTES];

        let tight_result = encode(&params, &source, &mut tight);
        let bytes = encode(&params, &source, &mut sized).unwrap();

        assert!(matches!(
            tight_result,
            Err(NefEncodeError::OutputBufferTooSmall { capacity, .. }) if capacity == OUTPUT_MARGIN_BYTES
        ));
        assert_eq!(decode_image(&params, &sized[..bytes]), source);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let params = NefEncodeParams::new(32, 12);
        let source = noisy_image(32, 12, 42);

        let first = encode_to_vec(&params, &source).unwrap();
        let second = encode_to_vec(&params, &source).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_encoded_stream_decodes_to_source() {
        let params = NefEncodeParams::builder()
            .columns(37)
            .rows(9)
            .starting_predictive_value(0x0800)
            .build();
        let source = noisy_image(37, 9, 1234);

        let stream = encode_to_vec(&params, &source).unwrap();

        assert_eq!(decode_image(&params, &stream), source);
    }

    #[test]
    fn test_extreme_samples_decode_to_source() {
        let params = NefEncodeParams::new(6, 4);
        let source: Vec<u16> = (0..24)
            .map(|i| if (i / 2) % 2 == 0 { 0x3fff } else { 0 })
            .collect();

        let stream = encode_to_vec(&params, &source).unwrap();

        assert_eq!(decode_image(&params, &stream), source);
    }

    #[test]
    fn test_encode_to_vec_matches_encode() {
        let params = NefEncodeParams::new(10, 3);
        let source = noisy_image(10, 3, 99);
        let mut output = vec![0u8; source.len() * 2 + OUTPUT_MARGIN_BYTES];

        let bytes = encode(&params, &source, &mut output).unwrap();
        let stream = encode_to_vec(&params, &source).unwrap();

        assert_eq!(stream.len(), bytes);
        assert_eq!(&output[..bytes], stream.as_slice());
    }

    #[test]
    fn test_params_builder_defaults() {
        let params = NefEncodeParams::builder().columns(6048).rows(4032).build();

        assert_eq!(params.columns, 6048);
        assert_eq!(params.rows, 4032);
        assert_eq!(params.starting_predictive_value, 0x0800);
        assert_eq!(params.source_size_bytes(), Some(6048 * 4032 * 2));
    }
}
