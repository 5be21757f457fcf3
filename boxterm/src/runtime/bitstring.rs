// Bitstrings of arbitrary bit length, most significant bit first

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitstring {
    bits: Vec<bool>,
}

impl Bitstring {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Bitstring { bits }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let bits = bytes
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
            .collect();
        Bitstring { bits }
    }

    pub fn from_text(text: &str) -> Self {
        Bitstring::from_bytes(text.as_bytes())
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// A binary is a bitstring whose length is a whole number of bytes.
    pub fn is_binary(&self) -> bool {
        self.bits.len() % 8 == 0
    }

    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        if !self.is_binary() {
            return None;
        }
        Some(
            self.bits
                .chunks(8)
                .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit)))
                .collect(),
        )
    }

    /// The bytes as UTF-8 text, if byte aligned and valid.
    pub fn to_text(&self) -> Option<String> {
        self.to_bytes().and_then(|bytes| String::from_utf8(bytes).ok())
    }

    /// Full bytes followed by the trailing partial segment as `(value, size)`.
    pub fn segments(&self) -> (Vec<u8>, Option<(u8, usize)>) {
        let full = self.bits.len() / 8 * 8;
        let bytes = Bitstring::from_bits(self.bits[..full].to_vec())
            .to_bytes()
            .unwrap_or_default();
        let rest = &self.bits[full..];
        let partial = if rest.is_empty() {
            None
        } else {
            let value = rest.iter().fold(0u8, |acc, bit| (acc << 1) | u8::from(*bit));
            Some((value, rest.len()))
        };
        (bytes, partial)
    }

    pub fn concat(&self, other: &Bitstring) -> Bitstring {
        let mut bits = self.bits.clone();
        bits.extend_from_slice(&other.bits);
        Bitstring { bits }
    }
}
