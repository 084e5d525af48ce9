//! Standard Type 1 fonts used by the quote document.
//!
//! The document relies on the two Helvetica faces every PDF reader ships, so
//! no font program is embedded. Text is encoded in WinAnsi (Windows-1252) and
//! measured with the Adobe font metrics to align and wrap it.

use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use tracing::warn;

/// Font face used for a text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    /// Resource name inside each page's font dictionary.
    pub fn resource_name(self) -> &'static [u8] {
        match self {
            Self::Regular => b"F1",
            Self::Bold => b"F2",
        }
    }

    /// PostScript name of the standard font.
    pub fn base_font(self) -> &'static [u8] {
        match self {
            Self::Regular => b"Helvetica",
            Self::Bold => b"Helvetica-Bold",
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(
        self,
        text: &str,
        size: f32,
    ) -> f32 {
        let units: u32 = text.chars().map(|c| self.char_width(c)).sum();
        units as f32 * size / 1000.0
    }

    /// Advance width of one character in thousandths of an em.
    fn char_width(
        self,
        c: char,
    ) -> u32 {
        let widths = match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        };

        if (' '..='~').contains(&c) {
            return u32::from(widths[c as usize - 32]);
        }

        if let Some(base) = unaccented(c) {
            return self.char_width(base);
        }

        match c {
            '€' | '«' | '»' | '–' => 556,
            '\u{a0}' => 278,
            '×' | '÷' => 584,
            '•' => 350,
            '°' => 400,
            '—' | '…' => 1000,
            '’' => match self {
                Self::Regular => 222,
                Self::Bold => 278,
            },
            _ => 556,
        }
    }
}

/// Helvetica advance widths for ASCII 32 through 126.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold advance widths for ASCII 32 through 126.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Accented Latin letters share the width of their base letter.
fn unaccented(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// Encodes text in WinAnsi for a standard-font text run.
///
/// Characters the encoding cannot represent become `?`.
///
/// ```
/// use devis_pdf::fonts::encode_win_ansi;
///
/// assert_eq!(encode_win_ansi("1\u{a0}452\u{a0}€"), vec![b'1', 0xA0, b'4', b'5', b'2', 0xA0, 0x80]);
/// assert_eq!(encode_win_ansi("Délai"), vec![b'D', 0xE9, b'l', b'a', b'i']);
/// ```
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match win_ansi_byte(c) {
            Some(byte) => byte,
            None => {
                warn!(character = %c, codepoint = c as u32, "character not encodable in WinAnsi");
                b'?'
            }
        })
        .collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E | 0xA0..=0xFF => u8::try_from(code).ok(),
        _ => match c {
            '€' => Some(0x80),
            '…' => Some(0x85),
            'Œ' => Some(0x8C),
            '’' => Some(0x92),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            'œ' => Some(0x9C),
            _ => None,
        },
    }
}

/// A word with its measured advance, as seen by the line fitter.
#[derive(Debug)]
struct MeasuredWord<'a> {
    word: &'a str,
    width: f64,
    space: f64,
}

impl Fragment for MeasuredWord<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.space
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// First-fit word wrap within `max_width` points.
///
/// A single word wider than the line is kept whole on its own line.
pub fn wrap_text(
    text: &str,
    font: Font,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    let space = f64::from(font.text_width(" ", size));
    let words: Vec<MeasuredWord<'_>> = text
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| MeasuredWord {
            word,
            width: f64::from(font.text_width(word, size)),
            space,
        })
        .collect();

    if words.is_empty() {
        return Vec::new();
    }

    wrap_first_fit(&words, &[f64::from(max_width)])
        .into_iter()
        .map(|line| {
            line.iter()
                .map(|measured| measured.word)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // encoding tests
    // =========================================================================

    #[test]
    fn ascii_passes_through() {
        assert_eq!(encode_win_ansi("TOTAL HT"), b"TOTAL HT".to_vec());
    }

    #[test]
    fn french_letters_use_latin1_codes() {
        assert_eq!(encode_win_ansi("éàç÷"), vec![0xE9, 0xE0, 0xE7, 0xF7]);
    }

    #[test]
    fn windows_specific_characters_are_mapped() {
        assert_eq!(encode_win_ansi("€–’"), vec![0x80, 0x96, 0x92]);
    }

    #[test]
    fn unencodable_characters_become_question_marks() {
        assert_eq!(encode_win_ansi("a→b"), b"a?b".to_vec());
    }

    // =========================================================================
    // metrics tests
    // =========================================================================

    #[test]
    fn widths_follow_font_metrics() {
        assert_eq!(Font::Regular.text_width("0", 10.0), 5.56);
        assert_eq!(Font::Regular.text_width("i", 1000.0), 222.0);
        assert_eq!(Font::Bold.text_width("i", 1000.0), 278.0);
    }

    #[test]
    fn accented_letters_measure_like_their_base() {
        assert_eq!(
            Font::Regular.text_width("Délai", 12.0),
            Font::Regular.text_width("Delai", 12.0)
        );
    }

    #[test]
    fn bold_is_never_narrower_than_regular() {
        let text = "Paiement échelonné sur 10 mois";

        assert!(Font::Bold.text_width(text, 11.0) >= Font::Regular.text_width(text, 11.0));
    }

    // =========================================================================
    // wrapping tests
    // =========================================================================

    #[test]
    fn short_text_stays_on_one_line() {
        let lines = wrap_text("Ce devis est une estimation.", Font::Regular, 10.0, 400.0);

        assert_eq!(lines, vec!["Ce devis est une estimation.".to_string()]);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let text = "En cas de règlement en une seule fois à la signature, une remise de 15% est appliquée sur le montant HT global.";

        let lines = wrap_text(text, Font::Regular, 10.0, 200.0);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(Font::Regular.text_width(line, 10.0) <= 200.01, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn overlong_word_gets_its_own_line() {
        let lines = wrap_text("TVA intracommunautaire", Font::Bold, 12.0, 40.0);

        assert_eq!(lines, vec!["TVA".to_string(), "intracommunautaire".to_string()]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("", Font::Regular, 10.0, 100.0).is_empty());
    }
}
