//! Streaming UTF-8 decoding for byte-oriented transports.

/// Decodes UTF-8 incrementally, carrying incomplete sequences across calls.
///
/// Invalid bytes decode to U+FFFD.
#[derive(Debug, Clone, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Create a decoder with no pending bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `bytes`, prefixed by any bytes held back from the last call.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = std::mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut output = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    output.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    output.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            output.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        output
    }

    /// Whether bytes of an incomplete sequence are being held back.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drop held-back bytes.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}
