use crate::{GenerateError, Generator, Rng};

/// Cumulative frequencies of English word lengths 1 to 15, scaled to 16 bits. A word is one
/// letter longer than the index of the first threshold its draw falls below, or 16 letters
/// long if it is above all of them.
const WORD_LEN_THRESHOLDS: [u16; 15] = [
    0x07AF, 0x34E0, 0x6963, 0x8F3E, 0xAAA4, 0xC01E, 0xD472, 0xE3AA, 0xEF06, 0xF6E7, 0xFB6A,
    0xFDDF, 0xFF34, 0xFFC6, 0xFFF9,
];

const LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Sentence lengths in words, indexed by the top six bits of a random byte.
const SENTENCE_LENS: [usize; 64] = sentence_lens();

const fn sentence_lens() -> [usize; 64] {
    let mut table = [0; 64];
    let mut i = 0;
    while i < 64 {
        table[i] = match i {
            0..=26 => i + 4,
            27..=44 => i - 17,
            45..=56 => i - 30,
            _ => i - 38,
        };
        i += 1;
    }
    table
}

/// Emits paragraphs of English-looking text, one paragraph per call.
///
/// Words are runs of lowercase letters with a realistic length distribution. Each sentence
/// starts with a capital letter and its last word ends with a period. Paragraphs are wrapped
/// into lines of at most `width` columns, and every paragraph but the first is preceded by an
/// empty line.
#[derive(Debug, Clone, Copy)]
pub struct TextGenerator {
    width: usize,
}

impl Default for TextGenerator {
    fn default() -> Self {
        Self { width: 80 }
    }
}

impl TextGenerator {
    fn word_len(rng: &Rng) -> usize {
        let draw: u16 = rng.random();
        WORD_LEN_THRESHOLDS
            .iter()
            .position(|&threshold| draw < threshold)
            .map_or(16, |index| index + 1)
    }

    fn word(rng: &Rng) -> Vec<u8> {
        (0..Self::word_len(rng))
            .map(|_| LETTERS[rng.bounded::<usize, _>(0..LETTERS.len())])
            .collect()
    }

    fn sentence(rng: &Rng) -> Vec<Vec<u8>> {
        let len = SENTENCE_LENS[usize::from(rng.random::<u8>() >> 2)];
        let mut words: Vec<Vec<u8>> = (0..len).map(|_| Self::word(rng)).collect();
        if let Some(first) = words.first_mut() {
            first[0] = first[0].to_ascii_uppercase();
        }
        if let Some(last) = words.last_mut() {
            last.push(b'.');
        }
        words
    }

    fn paragraph(&self, rng: &Rng) -> Vec<u8> {
        let sentences = usize::from(rng.random::<u8>() >> 5) + 5;
        let mut text = Vec::new();
        let mut column = 0;
        for word in (0..sentences).flat_map(|_| Self::sentence(rng)) {
            if column > 0 && column + 1 + word.len() > self.width {
                text.push(b'\n');
                column = 0;
            }
            if column > 0 {
                text.push(b' ');
                column += 1;
            }
            text.extend_from_slice(&word);
            column += word.len();
        }
        if column > 0 {
            text.push(b'\n');
        }
        text
    }
}

impl Generator for TextGenerator {
    fn generate(&self, rng: &Rng, pos: u64, _rem: u64) -> Result<Vec<u8>, GenerateError> {
        let paragraph = self.paragraph(rng);
        if pos == 0 {
            return Ok(paragraph);
        }
        let mut chunk = Vec::with_capacity(paragraph.len() + 1);
        chunk.push(b'\n');
        chunk.extend_from_slice(&paragraph);
        Ok(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(seed: i64, count: usize) -> Vec<Vec<u8>> {
        let rng = Rng::with_seed(seed);
        let generator = TextGenerator::default();
        let mut pos = 0;
        (0..count)
            .map(|_| {
                let chunk = generator.generate(&rng, pos, 0).unwrap();
                pos += chunk.len() as u64;
                chunk
            })
            .collect()
    }

    #[test]
    fn sentence_length_table() {
        assert_eq!(SENTENCE_LENS[0], 4);
        assert_eq!(SENTENCE_LENS[26], 30);
        assert_eq!(SENTENCE_LENS[27], 10);
        assert_eq!(SENTENCE_LENS[44], 27);
        assert_eq!(SENTENCE_LENS[45], 15);
        assert_eq!(SENTENCE_LENS[57], 19);
        assert_eq!(SENTENCE_LENS[63], 25);
        assert!(SENTENCE_LENS.iter().all(|len| (4..=30).contains(len)));
    }

    #[test]
    fn only_expected_characters() {
        for chunk in paragraphs(42, 50) {
            assert!(chunk
                .iter()
                .all(|&c| c.is_ascii_alphabetic() || matches!(c, b' ' | b'\n' | b'.')));
        }
    }

    #[test]
    fn lines_fit_width() {
        for chunk in paragraphs(7, 50) {
            assert_eq!(chunk.last(), Some(&b'\n'));
            for line in chunk.split(|&c| c == b'\n') {
                assert!(line.len() <= 80, "line of {} columns", line.len());
                assert!(!line.starts_with(b" ") && !line.ends_with(b" "));
            }
        }
    }

    #[test]
    fn sentences_are_capitalized_and_terminated() {
        for chunk in paragraphs(1234, 50) {
            let words: Vec<&[u8]> = chunk
                .split(|c| c.is_ascii_whitespace())
                .filter(|word| !word.is_empty())
                .collect();
            assert!(words.len() >= 5 * 4);
            assert!(words[0][0].is_ascii_uppercase());
            assert_eq!(words.last().and_then(|word| word.last()), Some(&b'.'));
            for pair in words.windows(2) {
                let sentence_ended = pair[0].ends_with(b".");
                assert_eq!(pair[1][0].is_ascii_uppercase(), sentence_ended);
            }
            for &word in &words {
                let body = word.strip_suffix(b".").unwrap_or(word);
                assert!((1..=16).contains(&body.len()));
                assert!(body[1..].iter().all(u8::is_ascii_lowercase));
            }
        }
    }

    #[test]
    fn later_paragraphs_start_with_blank_line() {
        let chunks = paragraphs(5, 3);
        assert!(chunks[0][0].is_ascii_uppercase());
        assert_eq!(chunks[1][0], b'\n');
        assert!(chunks[1][1].is_ascii_uppercase());
        assert_eq!(chunks[2][0], b'\n');
    }

    #[test]
    fn ignores_remaining() {
        let generator = TextGenerator::default();
        let a = generator.generate(&Rng::with_seed(3), 0, 1).unwrap();
        let b = generator.generate(&Rng::with_seed(3), 0, u64::MAX).unwrap();
        assert_eq!(a, b);
        assert!(a.len() > 1);
    }
}
