//! Fixed-size, overlapping windows over event text

use meetsheet_domain::Chunk;

/// Splits text into windows of `size` characters sharing `overlap` characters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chunker {
    size: usize,
    overlap_fraction: f64,
}

impl Chunker {
    /// Create a chunker. `size` is clamped to at least 1 and the fraction to `[0, 1)`.
    pub fn new(size: usize, overlap_fraction: f64) -> Self {
        Self {
            size: size.max(1),
            overlap_fraction: overlap_fraction.clamp(0.0, 0.99),
        }
    }

    /// Window size in characters
    pub fn size(&self) -> usize {
        self.size
    }

    /// Characters shared by adjacent windows: `floor(size × fraction)`
    pub fn overlap(&self) -> usize {
        overlap_chars(self.size, self.overlap_fraction)
    }

    /// Distance between window starts, never 0
    pub fn step(&self) -> usize {
        (self.size - self.overlap()).max(1)
    }

    /// Split `text` into chunks.
    ///
    /// Offsets and sizes count characters, not bytes. Windows that are only
    /// whitespace are skipped; the rest cover the input end to end.
    ///
    /// # Examples
    ///
    /// ```
    /// use meetsheet_extractor::Chunker;
    ///
    /// let chunks = Chunker::new(4, 0.5).chunk("abcdefgh");
    /// let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    /// assert_eq!(texts, vec!["abcd", "cdef", "efgh"]);
    /// ```
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        // Byte position of every char start, plus the end of the string
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = bounds.len() - 1;

        let mut chunks = Vec::new();
        let mut position = 0;

        while position < char_len {
            let end = (position + self.size).min(char_len);
            let window = &text[bounds[position]..bounds[end]];

            if !window.trim().is_empty() {
                chunks.push(Chunk {
                    index: chunks.len(),
                    total: 0,
                    text: window.to_string(),
                    offset: position,
                });
            }

            if end >= char_len {
                break;
            }
            position += self.step();
        }

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.total = total;
        }
        chunks
    }

    /// The whole text as one chunk, or nothing when it is blank
    pub fn whole(text: &str) -> Vec<Chunk> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        vec![Chunk {
            index: 0,
            total: 1,
            text: text.to_string(),
            offset: 0,
        }]
    }
}

fn overlap_chars(size: usize, fraction: f64) -> usize {
    // The epsilon keeps 0.1 × 2000 from landing on 199.999…
    ((size as f64 * fraction) + 1e-9).floor() as usize
}

/// Number of windows [`Chunker::chunk`] would produce for `char_len`
/// characters, assuming no window is blank.
pub fn estimate_chunk_count(char_len: usize, size: usize, overlap_fraction: f64) -> usize {
    if char_len == 0 {
        return 0;
    }
    let chunker = Chunker::new(size, overlap_fraction);
    if char_len <= chunker.size() {
        return 1;
    }
    let remaining = char_len - chunker.size();
    1 + remaining.div_ceil(chunker.step())
}
