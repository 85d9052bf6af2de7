/// Validation tests for the file codec.
///
/// These tests verify:
/// 1. **Concrete container scenarios** - exact bytes for known inputs
/// 2. **Round-trip correctness** - encode then decode restores the input
/// 3. **Header well-formedness** - magic, size, lengths in order
/// 4. **Corruption behavior** - tampering yields BadFormat or parseable
///    output, never a crash
#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::codec::{self, EncodeOptions, Stats};
    use crate::container::HEADER_LEN;
    use crate::huffman::MAX_SYMBOLS;
    use crate::{HufError, HufResult};

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    /// Encode `data` from a scratch file, returning the raw container.
    fn encode_bytes(data: &[u8]) -> Vec<u8> {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output.huf");
        fs::write(&input, data).unwrap();
        codec::encode(&input, &output, None).unwrap();
        fs::read(&output).unwrap()
    }

    /// Decode a raw container, returning the codec result and payload.
    fn decode_bytes(container: &[u8]) -> HufResult<Vec<u8>> {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.huf");
        let output = dir.path().join("output");
        fs::write(&input, container).unwrap();
        codec::decode(&input, &output, None)?;
        Ok(fs::read(&output).unwrap())
    }

    fn round_trip(data: &[u8]) -> Vec<u8> {
        decode_bytes(&encode_bytes(data)).unwrap()
    }

    fn lengths_in(container: &[u8]) -> &[u8] {
        &container[12..12 + MAX_SYMBOLS]
    }

    fn body_in(container: &[u8]) -> &[u8] {
        &container[HEADER_LEN..]
    }

    // ---------------------------------------------------------------
    // 1. Concrete container scenarios
    // ---------------------------------------------------------------

    #[test]
    fn scenario_empty_input() {
        let container = encode_bytes(&[]);
        assert_eq!(container.len(), HEADER_LEN);
        assert_eq!(&container[..4], b"HUF2");
        assert_eq!(&container[4..12], &0u64.to_le_bytes());
        assert!(lengths_in(&container).iter().all(|&l| l == 0));

        assert_eq!(decode_bytes(&container).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn scenario_single_byte() {
        let container = encode_bytes(&[0x41]);
        assert_eq!(container.len(), HEADER_LEN + 1);
        assert_eq!(&container[4..12], &1u64.to_le_bytes());

        let lengths = lengths_in(&container);
        assert_eq!(lengths[0x41], 1);
        assert_eq!(lengths.iter().filter(|&&l| l > 0).count(), 1);

        // The lone symbol carries code 0, so the body's low bit is 0
        assert_eq!(body_in(&container), &[0x00]);

        assert_eq!(round_trip(&[0x41]), vec![0x41]);
    }

    #[test]
    fn scenario_two_symbol_alternation() {
        let data = [0x00u8, 0x01, 0x00, 0x01];
        let container = encode_bytes(&data);

        let lengths = lengths_in(&container);
        assert_eq!(lengths[0], 1);
        assert_eq!(lengths[1], 1);

        // Canonical codes 0 and 1 emitted LSB-first: bits 0,1,0,1
        assert_eq!(body_in(&container), &[0x0A]);

        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn scenario_skewed_two_symbols() {
        let data = b"aaaaaaaab";
        let container = encode_bytes(data);

        let lengths = lengths_in(&container);
        assert_eq!(lengths[b'a' as usize], 1);
        assert_eq!(lengths[b'b' as usize], 1);

        // 9 one-bit codes: eight 'a' (code 0) then one 'b' (code 1)
        assert_eq!(body_in(&container), &[0x00, 0x01]);

        assert_eq!(round_trip(data), data);
    }

    #[test]
    fn scenario_uniform_alphabet() {
        let data: Vec<u8> = (0..=255u8).collect();
        let container = encode_bytes(&data);

        assert!(lengths_in(&container).iter().all(|&l| l == 8));

        // Canonical code of symbol s is s itself; stored bit-reversed
        // and packed LSB-first, each output byte is reverse_bits(s).
        let body = body_in(&container);
        assert_eq!(body.len(), 256);
        for (i, &b) in body.iter().enumerate() {
            assert_eq!(b, (i as u8).reverse_bits(), "body byte {}", i);
        }

        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn scenario_long_single_symbol_run() {
        let data = vec![0xFFu8; 1_000_000];
        let container = encode_bytes(&data);

        // One bit per symbol: 1_000_000 bits = 125_000 body bytes
        assert_eq!(container.len(), HEADER_LEN + 125_000);

        // The decoder bypasses the bit stream for single-symbol input
        assert_eq!(round_trip(&data), data);
    }

    // ---------------------------------------------------------------
    // 2. Round-trip correctness on diverse shapes
    // ---------------------------------------------------------------

    fn data_repeating_text() -> Vec<u8> {
        let pattern = b"the quick brown fox jumps over the lazy dog. ";
        let mut v = Vec::new();
        for _ in 0..100 {
            v.extend_from_slice(pattern);
        }
        v
    }

    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    #[test]
    fn round_trip_text() {
        let data = data_repeating_text();
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn round_trip_sawtooth() {
        let data = data_sawtooth(100_000);
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn round_trip_skewed() {
        let data = data_skewed(50_000);
        assert_eq!(round_trip(&data), data);
    }

    #[test]
    fn round_trip_binary_structured() {
        let data: Vec<u8> = (0..5000).map(|i| ((i * 17 + 31) % 256) as u8).collect();
        assert_eq!(round_trip(&data), data);
    }

    // ---------------------------------------------------------------
    // 3. Stats and invariants
    // ---------------------------------------------------------------

    #[test]
    fn stats_report_sizes_and_bounds() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output.huf");
        let data = data_repeating_text();
        fs::write(&input, &data).unwrap();

        let mut stats = Stats::default();
        codec::encode(&input, &output, Some(&mut stats)).unwrap();

        assert_eq!(stats.original_size, data.len() as u64);
        assert_eq!(stats.compressed_size, fs::metadata(&output).unwrap().len());
        // Average code length is bounded below by the entropy
        assert!(stats.avg_code_len >= stats.entropy - 1e-9);
        assert!(stats.entropy > 0.0);
    }

    #[test]
    fn body_length_matches_code_lengths() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output.huf");
        let data = data_sawtooth(12345);
        fs::write(&input, &data).unwrap();

        let mut stats = Stats::default();
        codec::encode(&input, &output, Some(&mut stats)).unwrap();

        let mut bit_total: u64 = 0;
        for &b in &data {
            bit_total += stats.codes[b as usize].bit_count as u64;
        }
        let container = fs::read(&output).unwrap();
        assert_eq!(
            container.len() as u64,
            HEADER_LEN as u64 + bit_total.div_ceil(8)
        );
    }

    #[test]
    fn encode_is_deterministic_across_threads() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        // Over the 1 MiB threshold so worker counts actually vary
        let data = data_sawtooth(3 * 1024 * 1024);
        fs::write(&input, &data).unwrap();

        let mut outputs = Vec::new();
        for threads in [1usize, 2, 4, 8] {
            let output = dir.path().join(format!("out.{threads}.huf"));
            let options = EncodeOptions { threads };
            codec::encode_with_options(&input, &output, None, &options).unwrap();
            outputs.push(fs::read(&output).unwrap());
        }
        for other in &outputs[1..] {
            assert_eq!(&outputs[0], other);
        }
    }

    // ---------------------------------------------------------------
    // 4. Corruption behavior
    // ---------------------------------------------------------------

    #[test]
    fn corrupt_magic_is_bad_format() {
        let mut container = encode_bytes(b"hello world");
        container[0] = b'X';
        assert_eq!(decode_bytes(&container), Err(HufError::BadFormat));
    }

    #[test]
    fn oversubscribed_lengths_are_bad_format() {
        let mut container = encode_bytes(b"hello world");
        // The code is complete (Kraft sum == 1); adding any extra
        // 1-bit symbol pushes it over the bound.
        let absent = (0..MAX_SYMBOLS).find(|&s| container[12 + s] == 0).unwrap();
        container[12 + absent] = 1;
        assert_eq!(decode_bytes(&container), Err(HufError::BadFormat));
    }

    #[test]
    fn truncated_body_is_bad_format() {
        let data = data_repeating_text();
        let container = encode_bytes(&data);
        let cut = &container[..container.len() - 16];
        assert_eq!(decode_bytes(cut), Err(HufError::BadFormat));
    }

    #[test]
    fn truncated_header_is_bad_format() {
        let container = encode_bytes(b"hello world");
        for cut in [0usize, 2, 4, 11, 12, 200, HEADER_LEN - 1] {
            assert_eq!(
                decode_bytes(&container[..cut]),
                Err(HufError::BadFormat),
                "cut at {}",
                cut
            );
        }
    }

    #[test]
    fn body_tampering_never_crashes() {
        let data = data_repeating_text();
        let container = encode_bytes(&data);

        for pos in (HEADER_LEN..container.len()).step_by(7) {
            let mut tampered = container.clone();
            tampered[pos] ^= 0x55;
            match decode_bytes(&tampered) {
                // Still parseable: the decoder must have produced
                // exactly the declared number of symbols.
                Ok(out) => assert_eq!(out.len(), data.len()),
                Err(e) => assert_eq!(e, HufError::BadFormat),
            }
        }
    }

    #[test]
    fn missing_input_is_file_open() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("no-such-file");
        let output = dir.path().join("out.huf");
        assert_eq!(
            codec::encode(&missing, &output, None),
            Err(HufError::FileOpen)
        );
        assert_eq!(
            codec::decode(&missing, &output, None),
            Err(HufError::FileOpen)
        );
    }

    #[test]
    fn decode_rejects_sizes_with_no_symbols() {
        // original_size > 0 but an all-zero lengths table
        let mut container = vec![0u8; HEADER_LEN];
        container[..4].copy_from_slice(b"HUF2");
        container[4..12].copy_from_slice(&10u64.to_le_bytes());
        assert_eq!(decode_bytes(&container), Err(HufError::BadFormat));
    }

    #[test]
    fn outputs_are_byte_identical_across_runs() {
        let data = data_repeating_text();
        let first = encode_bytes(&data);
        for _ in 0..3 {
            assert_eq!(encode_bytes(&data), first);
        }
    }

    #[test]
    fn decode_ignores_trailing_garbage_bytes() {
        // Appending bytes past the body must not change the output:
        // the decoder stops at original_size symbols.
        let data = data_repeating_text();
        let mut container = encode_bytes(&data);
        container.extend_from_slice(&[0xAA, 0x55, 0xFF]);
        assert_eq!(decode_bytes(&container).unwrap(), data);
    }

    #[test]
    fn output_file_is_truncated_on_reuse() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input");
        let output = dir.path().join("output.huf");
        let restored = dir.path().join("restored");

        fs::write(&input, b"fresh content").unwrap();
        fs::write(&restored, vec![0u8; 4096]).unwrap(); // stale payload
        codec::encode(&input, &output, None).unwrap();
        codec::decode(&output, &restored, None).unwrap();
        assert_eq!(fs::read(&restored).unwrap(), b"fresh content");
    }
}
