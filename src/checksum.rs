/// EDID byte-sum checksum: the last byte of a block is chosen so that the
/// sum of all 128 bytes is zero modulo 256.
///
/// Returns the sum of all bytes modulo 256. Zero for a well-formed block.
pub fn byte_sum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Compute the trailing checksum byte for the first 127 bytes of a block:
/// `(256 - (sum % 256)) % 256`, i.e. the additive inverse of the byte sum.
pub fn block_checksum(data: &[u8]) -> u8 {
    byte_sum(data).wrapping_neg()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_zeroes_the_block_sum() {
        let mut data = vec![0x12u8, 0x34, 0xFF, 0x80, 0x7E];
        data.push(block_checksum(&data));
        assert_eq!(byte_sum(&data), 0);
    }

    #[test]
    fn checksum_of_already_aligned_data_is_zero() {
        // 0x80 + 0x80 = 0x100, already zero mod 256
        assert_eq!(block_checksum(&[0x80, 0x80]), 0);
        assert_eq!(block_checksum(&[]), 0);
    }

    #[test]
    fn checksum_matches_manual_formula() {
        let data = [0x00u8, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];
        let sum: u32 = data.iter().map(|&b| b as u32).sum();
        let expected = ((256 - (sum % 256)) % 256) as u8;
        assert_eq!(block_checksum(&data), expected);
    }
}
