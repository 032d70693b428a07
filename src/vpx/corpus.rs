//! Searchable text built from the table script and game item streams.

/// Lower-cased concatenation of every reference stream, newline separated.
#[derive(Debug, Default, Clone)]
pub struct ReferenceCorpus {
    text: String,
}

impl ReferenceCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a corpus from already decoded text, e.g. in tests.
    pub fn from_text(text: &str) -> Self {
        Self {
            text: text.to_lowercase(),
        }
    }

    /// Appends one stream. Bytes that are not valid UTF-8 are dropped, so a
    /// stray cp1252 byte inside a name does not split it.
    pub fn push(&mut self, bytes: &[u8]) {
        for chunk in bytes.utf8_chunks() {
            self.text.push_str(&chunk.valid().to_lowercase());
        }
        self.text.push('\n');
    }

    /// Case-insensitive substring test.
    pub fn mentions(&self, name: &str) -> bool {
        self.text.contains(&name.to_lowercase())
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_lowercases_and_separates() {
        let mut corpus = ReferenceCorpus::new();
        corpus.push(b"PlaySound \"Knocker\"");
        corpus.push(b"Ramp1.Image = \"RampTex\"");
        assert!(corpus.mentions("knocker"));
        assert!(corpus.mentions("RAMPTEX"));
        // Streams are separated, so a name cannot be formed across the boundary.
        assert!(!corpus.mentions("\"knocker\"ramp1"));
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        let mut corpus = ReferenceCorpus::new();
        corpus.push(b"\xff\xfeFlasher\x80Red");
        assert!(corpus.mentions("flasherred"));
        assert_eq!(corpus.char_len(), "flasherred\n".len());
    }

    #[test]
    fn test_stray_byte_inside_name_still_matches() {
        let mut corpus = ReferenceCorpus::new();
        corpus.push(b"Ramp1.Image = \"Ramp\x80Tex\"");
        corpus.push(b"Wall.Image = \"D\xe9cor\"");
        assert!(corpus.mentions("RampTex"));
        assert!(corpus.mentions("Dcor"));
        // Valid multi-byte text is kept as is.
        corpus.push("Überdach".as_bytes());
        assert!(corpus.mentions("überdach"));
    }

    #[test]
    fn test_empty_corpus_mentions_nothing() {
        let corpus = ReferenceCorpus::new();
        assert!(corpus.is_empty());
        assert!(!corpus.mentions("anything"));
        assert_eq!(corpus.char_len(), 0);
    }
}
