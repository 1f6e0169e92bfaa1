//! Conversion between raw little-endian PCM bytes and integer samples.
//!
//! Samples of every width are signed. Arithmetic happens on `i32` (or wider)
//! values which are saturated back into `[-max, max]` on the way out, so no
//! operation produces the most negative code and negation always round-trips.

/// Decodes interleaved little-endian samples of `width` bytes.
pub fn decode(data: &[u8], width: u16) -> Vec<i32> {
    match width {
        1 => data.iter().map(|&b| b as i8 as i32).collect(),
        2 => data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]) as i32)
            .collect(),
        _ => data
            .chunks_exact(4)
            .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
    }
}

/// Encodes samples as little-endian bytes of `width` bytes, saturating
/// values outside the width's range.
pub fn encode(samples: &[i32], width: u16) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * width as usize);
    match width {
        1 => {
            for &s in samples {
                data.push(s.clamp(i8::MIN as i32, i8::MAX as i32) as i8 as u8);
            }
        }
        2 => {
            for &s in samples {
                let s = s.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
                data.extend_from_slice(&s.to_le_bytes());
            }
        }
        _ => {
            for &s in samples {
                data.extend_from_slice(&s.to_le_bytes());
            }
        }
    }
    data
}

/// Saturates a wide integer into `[-max, max]` of `width`-byte samples.
pub fn saturate(value: i64, width: u16) -> i32 {
    let max = range(width).1 as i64;
    value.clamp(-max, max) as i32
}

/// Rounds a floating-point amplitude to the nearest sample value,
/// saturating at `[-max, max]`. NaN maps to zero.
pub fn quantize(value: f64, width: u16) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let max = range(width).1 as f64;
    value.round().clamp(-max, max) as i32
}

/// Returns the representable range of `width`-byte samples.
pub fn range(width: u16) -> (i32, i32) {
    match width {
        1 => (i8::MIN as i32, i8::MAX as i32),
        2 => (i16::MIN as i32, i16::MAX as i32),
        _ => (i32::MIN, i32::MAX),
    }
}

/// Applies `f` to every sample of a buffer and re-encodes the result.
pub fn map(data: &[u8], width: u16, mut f: impl FnMut(i32) -> i32) -> Vec<u8> {
    let samples: Vec<i32> = decode(data, width).into_iter().map(&mut f).collect();
    encode(&samples, width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_widths() {
        assert_eq!(decode(&[0x7f, 0x80, 0xff], 1), vec![127, -128, -1]);
        // 1000 = 0x03e8, -1000 = 0xfc18
        assert_eq!(decode(&[0xe8, 0x03, 0x18, 0xfc], 2), vec![1000, -1000]);
        assert_eq!(decode(&[0x00, 0x00, 0x00, 0x80], 4), vec![i32::MIN]);
    }

    #[test]
    fn test_encode_saturates() {
        assert_eq!(encode(&[200, -200], 1), vec![0x7f, 0x80]);
        assert_eq!(encode(&[40000], 2), i16::MAX.to_le_bytes().to_vec());
        assert_eq!(encode(&[-40000], 2), i16::MIN.to_le_bytes().to_vec());
    }

    #[test]
    fn test_decode_encode_identity() {
        let data: Vec<u8> = (0..=255u8).collect();
        for width in [1, 2, 4] {
            assert_eq!(encode(&decode(&data, width), width), data);
        }
    }

    #[test]
    fn test_quantize() {
        assert_eq!(quantize(1.4, 2), 1);
        assert_eq!(quantize(-1.6, 2), -2);
        assert_eq!(quantize(1e9, 2), i16::MAX as i32);
        assert_eq!(quantize(f64::NAN, 4), 0);
    }

    #[test]
    fn test_saturation_is_symmetric() {
        assert_eq!(quantize(f64::NEG_INFINITY, 1), -127);
        assert_eq!(quantize(-32768.0, 2), -32767);
        assert_eq!(quantize(-1e12, 4), -i32::MAX);
        assert_eq!(saturate(i64::MAX, 4), i32::MAX);
        assert_eq!(saturate(i64::MIN, 4), -i32::MAX);
        assert_eq!(saturate(-200, 1), -127);
        // the most negative code still decodes and encodes untouched
        assert_eq!(encode(&[i16::MIN as i32], 2), i16::MIN.to_le_bytes().to_vec());
    }

    #[test]
    fn test_map() {
        let data = encode(&[1, -2, 3], 2);
        let doubled = map(&data, 2, |s| s * 2);
        assert_eq!(decode(&doubled, 2), vec![2, -4, 6]);
    }
}
