//! UTF-8 decoding across byte-fragment boundaries

/// Decodes raw byte fragments, carrying incomplete multi-byte sequences over
/// to the next call
#[derive(Debug, Default, Clone)]
pub struct Utf8Carry {
    incomplete: Vec<u8>,
}

impl Utf8Carry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes held back from the previous fragment
    pub fn pending(&self) -> &[u8] {
        &self.incomplete
    }

    /// Decode as much of `chunk` as forms complete characters
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let bytes = if self.incomplete.is_empty() {
            chunk.to_vec()
        } else {
            let mut combined = std::mem::take(&mut self.incomplete);
            combined.extend_from_slice(chunk);
            combined
        };

        let (text, remainder) = decode_with_remainder(&bytes);
        self.incomplete = remainder;
        text
    }

    /// Release whatever is still held, lossily
    pub fn finish(&mut self) -> String {
        if self.incomplete.is_empty() {
            return String::new();
        }
        let leftover = std::mem::take(&mut self.incomplete);
        tracing::warn!(
            bytes = leftover.len(),
            "stream ended inside a UTF-8 sequence"
        );
        String::from_utf8_lossy(&leftover).into_owned()
    }
}

/// Split `bytes` into decoded text and a trailing incomplete sequence.
///
/// Invalid bytes before the tail are replaced with U+FFFD.
fn decode_with_remainder(bytes: &[u8]) -> (String, Vec<u8>) {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return (s.to_string(), Vec::new());
    }

    let tail_start = incomplete_tail_start(bytes);
    let head = &bytes[..tail_start];
    let remainder = bytes[tail_start..].to_vec();

    let text = match std::str::from_utf8(head) {
        Ok(s) => s.to_string(),
        Err(e) => {
            tracing::warn!(
                position = e.valid_up_to(),
                "invalid UTF-8 in stream fragment, replacing"
            );
            String::from_utf8_lossy(head).into_owned()
        }
    };
    (text, remainder)
}

/// Start of a trailing sequence that is a valid but unfinished character
fn incomplete_tail_start(bytes: &[u8]) -> usize {
    for back in 1..=3.min(bytes.len()) {
        let pos = bytes.len() - back;
        let byte = bytes[pos];
        if is_continuation_byte(byte) {
            continue;
        }
        return match utf8_char_len(byte) {
            Some(len) if len > back => pos,
            _ => bytes.len(),
        };
    }
    bytes.len()
}

#[inline]
fn is_continuation_byte(byte: u8) -> bool {
    (byte & 0b1100_0000) == 0b1000_0000
}

/// Expected sequence length for a lead byte, `None` for bytes that cannot
/// start a character
#[inline]
fn utf8_char_len(lead: u8) -> Option<usize> {
    if lead & 0b1000_0000 == 0 {
        Some(1)
    } else if lead & 0b1110_0000 == 0b1100_0000 {
        Some(2)
    } else if lead & 0b1111_0000 == 0b1110_0000 {
        Some(3)
    } else if lead & 0b1111_1000 == 0b1111_0000 {
        Some(4)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_input_passes_through() {
        let mut carry = Utf8Carry::new();
        assert_eq!(carry.decode("héllo".as_bytes()), "héllo");
        assert!(carry.pending().is_empty());
    }

    #[test]
    fn test_split_multibyte_char() {
        // "日" is E6 97 A5
        let bytes = "a日b".as_bytes();
        let mut carry = Utf8Carry::new();

        assert_eq!(carry.decode(&bytes[..2]), "a");
        assert_eq!(carry.pending(), &[0xE6]);
        assert_eq!(carry.decode(&bytes[2..3]), "");
        assert_eq!(carry.decode(&bytes[3..]), "日b");
        assert!(carry.pending().is_empty());
    }

    #[test]
    fn test_every_split_of_emoji() {
        let text = "ok 🦀 done";
        let bytes = text.as_bytes();
        for split in 0..=bytes.len() {
            let mut carry = Utf8Carry::new();
            let mut out = carry.decode(&bytes[..split]);
            out.push_str(&carry.decode(&bytes[split..]));
            out.push_str(&carry.finish());
            assert_eq!(out, text, "split at {}", split);
        }
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let mut carry = Utf8Carry::new();
        let out = carry.decode(&[b'a', 0xFF, b'b']);
        assert_eq!(out, "a\u{FFFD}b");
        assert!(carry.pending().is_empty());
    }

    #[test]
    fn test_finish_releases_leftover_lossily() {
        let mut carry = Utf8Carry::new();
        assert_eq!(carry.decode(&[b'x', 0xE6, 0x97]), "x");
        assert_eq!(carry.finish(), "\u{FFFD}");
        assert_eq!(carry.finish(), "");
    }
}
