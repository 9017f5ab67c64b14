//! Little-endian encoding helpers shared by every fixed-size structure.

use bytes::BufMut;

use crate::limits::NAME_LEN;

/// A structure with a fixed little-endian wire layout.
pub trait WireFormat {
    /// Exact number of bytes written by [`WireFormat::encode_into`].
    const WIRE_SIZE: usize;

    /// Append the encoded structure to `buf`.
    fn encode_into(&self, buf: &mut Vec<u8>);

    /// Encode into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(Self::WIRE_SIZE);
        self.encode_into(&mut buf);
        buf
    }
}

/// Write `name` as a NUL-terminated, zero-padded `NAME_LEN` byte field.
///
/// Names longer than `NAME_LEN - 1` bytes are truncated.
pub fn put_name(buf: &mut Vec<u8>, name: &str) {
    let raw = name.as_bytes();
    let n = raw.len().min(NAME_LEN - 1);
    buf.put_slice(&raw[..n]);
    buf.put_bytes(0, NAME_LEN - n);
}

/// Write `values` followed by zeroed `u32` words up to `slots` entries.
pub fn put_u32_array(buf: &mut Vec<u8>, values: &[u32], slots: usize) {
    for v in values.iter().take(slots) {
        buf.put_u32_le(*v);
    }
    buf.put_bytes(0, slots.saturating_sub(values.len()) * 4);
}

/// Encode `items` and pad with `filler` encodings up to `slots` entries.
pub fn put_padded<T: WireFormat>(buf: &mut Vec<u8>, items: &[T], slots: usize, filler: &T) {
    for item in items.iter().take(slots) {
        item.encode_into(buf);
    }
    for _ in items.len()..slots {
        filler.encode_into(buf);
    }
}

/// Push `item` unless `items` already holds `max` entries.
pub fn push_bounded<T>(
    items: &mut Vec<T>,
    item: T,
    max: usize,
    what: &'static str,
) -> crate::TypeResult<()> {
    if items.len() >= max {
        return Err(crate::TypeError::Capacity { what, max });
    }
    items.push(item);
    Ok(())
}

/// Convert a length to the `u32` used in wire counters.
pub fn wire_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_padded_and_terminated() {
        let mut buf = Vec::new();
        put_name(&mut buf, "Master");
        assert_eq!(buf.len(), NAME_LEN);
        assert_eq!(&buf[..6], b"Master");
        assert!(buf[6..].iter().all(|b| *b == 0));
    }

    #[test]
    fn long_name_is_truncated_with_nul() {
        let mut buf = Vec::new();
        put_name(&mut buf, &"x".repeat(100));
        assert_eq!(buf.len(), NAME_LEN);
        assert_eq!(buf[NAME_LEN - 1], 0);
        assert_eq!(buf[NAME_LEN - 2], b'x');
    }

    #[test]
    fn u32_array_pads_to_slots() {
        let mut buf = Vec::new();
        put_u32_array(&mut buf, &[1, 2], 4);
        assert_eq!(buf, vec![1, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
