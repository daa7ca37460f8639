//! Byte-shuffling filter for arrays of fixed-width items.
//!
//! For item width `w` the transform moves byte `i` of item `k` (position
//! `k*w + i`) to position `i*m + k`, where `m` is the number of complete
//! items. Grouping equal byte positions together clusters the low-entropy
//! planes of homogeneous numeric data, which LZ-family codecs reward.
//! Trailing bytes that do not form a complete item are carried over
//! unchanged at the end of the buffer.

/// Shuffle `data` into a new buffer of the same length.
///
/// `item_size <= 1` degenerates to a plain copy.
pub fn shuffle(data: &[u8], item_size: usize) -> Vec<u8> {
    if item_size <= 1 {
        return data.to_vec();
    }

    let items = data.len() / item_size;
    let whole = items * item_size;
    let mut out = vec![0u8; data.len()];

    for i in 0..item_size {
        for k in 0..items {
            out[i * items + k] = data[k * item_size + i];
        }
    }
    out[whole..].copy_from_slice(&data[whole..]);

    out
}

/// Invert [`shuffle`] in place on `data`.
///
/// The caller's buffer is rewritten directly; only a transient scratch copy
/// of the complete-item region is allocated, never a second output buffer.
/// Trailing partial-item bytes are already in their final position.
pub fn unshuffle(data: &mut [u8], item_size: usize) {
    if item_size <= 1 || data.len() < item_size {
        return;
    }

    let items = data.len() / item_size;
    let whole = items * item_size;
    let scratch = data[..whole].to_vec();

    for i in 0..item_size {
        for k in 0..items {
            data[k * item_size + i] = scratch[i * items + k];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_groups_byte_planes() {
        // Three u16 items 0x0102, 0x0304, 0x0506 in little-endian order.
        let data = vec![0x02, 0x01, 0x04, 0x03, 0x06, 0x05];
        let shuffled = shuffle(&data, 2);
        assert_eq!(shuffled, vec![0x02, 0x04, 0x06, 0x01, 0x03, 0x05]);
    }

    #[test]
    fn trailing_partial_item_is_copied_verbatim() {
        let data = vec![1, 2, 3, 4, 5, 6, 7];
        let shuffled = shuffle(&data, 4);
        // One complete item [1,2,3,4] plus tail [5,6,7].
        assert_eq!(shuffled, vec![1, 2, 3, 4, 5, 6, 7]);

        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
        let shuffled = shuffle(&data, 4);
        assert_eq!(&shuffled[8..], &[9]);
    }

    #[test]
    fn width_one_is_identity() {
        let data = vec![9, 8, 7, 6];
        assert_eq!(shuffle(&data, 1), data);

        let mut buf = data.clone();
        unshuffle(&mut buf, 1);
        assert_eq!(buf, data);
    }

    #[test]
    fn unshuffle_inverts_shuffle_for_all_widths() {
        let data: Vec<u8> = (0..257u16).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect();
        for width in 1..=9 {
            let mut buf = shuffle(&data, width);
            unshuffle(&mut buf, width);
            assert_eq!(buf, data, "width {width}");
        }
    }

    #[test]
    fn unshuffle_inverts_shuffle_on_ragged_lengths() {
        for len in [0usize, 1, 2, 3, 5, 7, 63, 64, 65] {
            let data: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            for width in [2usize, 4, 8] {
                let mut buf = shuffle(&data, width);
                unshuffle(&mut buf, width);
                assert_eq!(buf, data, "len {len} width {width}");
            }
        }
    }
}
