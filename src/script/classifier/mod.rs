use crate::core::types::ScriptKind;

const PROLONGED_SOUND_MARK: char = 'ー';

/// Onsets that may precede a vowel in a romaji syllable, longest first.
const ROMAJI_ONSETS: &[&str] = &[
    "sh", "ch", "ts", "ky", "gy", "ny", "hy", "by", "py", "my", "ry", "j", "f", "k", "g", "s",
    "z", "t", "d", "n", "h", "b", "p", "m", "y", "r", "w", "v",
];

/// Classifies the whole string. A single character outside the winning
/// script demotes the result, so partially converted model output is never
/// mistaken for clean kana.
pub fn classify(text: &str) -> ScriptKind {
    if text.is_empty() {
        return ScriptKind::Unknown;
    }
    if text.chars().all(is_hiragana) {
        return ScriptKind::Hiragana;
    }
    if text.chars().all(is_katakana) {
        return ScriptKind::Katakana;
    }

    let has_japanese = text
        .chars()
        .any(|ch| is_kanji(ch) || is_hiragana(ch) || is_katakana(ch));
    if has_japanese {
        return ScriptKind::KanjiMixed;
    }

    if is_romaji(text) {
        ScriptKind::Romaji
    } else {
        ScriptKind::Unknown
    }
}

/// Hiragana block plus the prolonged sound mark, which survives
/// katakana-to-hiragana conversion unchanged.
pub fn is_hiragana(ch: char) -> bool {
    matches!(ch, '\u{3041}'..='\u{3096}' | '\u{3099}'..='\u{309F}') || ch == PROLONGED_SOUND_MARK
}

/// Katakana letters, iteration marks, the prolonged sound mark and the
/// phonetic extensions. The middle dot and double hyphen are punctuation and
/// do not count.
pub fn is_katakana(ch: char) -> bool {
    matches!(
        ch,
        '\u{30A1}'..='\u{30FA}' | '\u{30FC}'..='\u{30FE}' | '\u{31F0}'..='\u{31FF}'
    )
}

pub fn is_kanji(ch: char) -> bool {
    matches!(
        ch,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}' | '々' | '〆'
    )
}

/// True when every word is a sequence of Japanese syllables written in ASCII
/// letters. Words may be separated by whitespace, hyphens or apostrophes.
pub fn is_romaji(text: &str) -> bool {
    let mut words = text
        .split(|ch: char| ch.is_whitespace() || ch == '-' || ch == '\'')
        .filter(|word| !word.is_empty())
        .peekable();

    if words.peek().is_none() {
        return false;
    }

    words.all(|word| is_romaji_word(&word.to_ascii_lowercase()))
}

fn is_romaji_word(word: &str) -> bool {
    if !word.bytes().all(|byte| byte.is_ascii_lowercase()) {
        return false;
    }

    let bytes = word.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        let current = bytes[index];
        let next = bytes.get(index + 1).copied();

        if is_vowel(current) {
            index += 1;
            continue;
        }

        // syllabic n
        if current == b'n' && !next.is_some_and(|byte| is_vowel(byte) || byte == b'y') {
            index += 1;
            continue;
        }

        // sokuon: doubled consonant, or t before ch
        if next == Some(current) || (current == b't' && word[index + 1..].starts_with("ch")) {
            index += 1;
            continue;
        }

        let rest = &word[index..];
        let Some(onset) = ROMAJI_ONSETS.iter().find(|onset| {
            rest.starts_with(**onset)
                && rest
                    .as_bytes()
                    .get(onset.len())
                    .copied()
                    .is_some_and(is_vowel)
        }) else {
            return false;
        };
        index += onset.len() + 1;
    }

    true
}

fn is_vowel(byte: u8) -> bool {
    matches!(byte, b'a' | b'i' | b'u' | b'e' | b'o')
}
