use crate::core::traits::Segmenter;
use crate::core::types::Token;

const KANA_OFFSET: u32 = 0x60;

pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{3041}'..='\u{3096}' | 'ゝ' | 'ゞ' => shift(ch, KANA_OFFSET as i64),
            _ => ch,
        })
        .collect()
}

/// Folds katakana into hiragana. Letters without a hiragana counterpart are
/// rewritten to an equivalent hiragana sequence so the output never keeps a
/// stray katakana character.
pub fn katakana_to_hiragana(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{30A1}'..='\u{30F6}' | 'ヽ' | 'ヾ' => output.push(shift(ch, -(KANA_OFFSET as i64))),
            'ヷ' => output.push_str("わ\u{3099}"),
            'ヸ' => output.push_str("ゐ\u{3099}"),
            'ヹ' => output.push_str("ゑ\u{3099}"),
            'ヺ' => output.push_str("を\u{3099}"),
            '\u{31F0}'..='\u{31FF}' => output.push(small_extension_to_hiragana(ch)),
            _ => output.push(ch),
        }
    }
    output
}

/// Modified Hepburn romanization. Katakana is folded to hiragana first;
/// characters outside the kana tables pass through unchanged.
///
/// Voicing marks are merged into the kana before them and iteration marks
/// repeat the previous kana. A small tsu with no consonant to double is
/// written as an apostrophe.
pub fn to_romaji(text: &str) -> String {
    let chars = compose_marks(katakana_to_hiragana(text).chars());
    let mut output = String::with_capacity(chars.len() * 2);
    let mut pending_sokuon = false;
    let mut index = 0;

    while index < chars.len() {
        let ch = chars[index];

        if ch == 'っ' {
            flush_sokuon(&mut output, &mut pending_sokuon);
            pending_sokuon = true;
            index += 1;
            continue;
        }

        if ch == 'ー' {
            flush_sokuon(&mut output, &mut pending_sokuon);
            if let Some(vowel) = output.chars().last().filter(|last| "aiueo".contains(*last)) {
                output.push(vowel);
            }
            index += 1;
            continue;
        }

        match syllable_at(&chars, index) {
            Some((syllable, consumed)) => {
                if pending_sokuon {
                    push_geminate(&mut output, syllable);
                    pending_sokuon = false;
                }
                output.push_str(syllable);
                if ch == 'ん'
                    && syllable_at(&chars, index + 1).is_some_and(|(next, _)| {
                        next.starts_with(|first: char| "aiueoy".contains(first))
                    })
                {
                    output.push('\'');
                }
                index += consumed;
            }
            None => {
                flush_sokuon(&mut output, &mut pending_sokuon);
                output.push(ch);
                index += 1;
            }
        }
    }

    flush_sokuon(&mut output, &mut pending_sokuon);
    output
}

/// Reduces text to a hiragana reading with the segmenter: each token
/// contributes its reading when known, its surface otherwise.
///
/// Unread tokens pass through untouched, so the result may still contain
/// kanji or latin text and must be classified again.
pub fn kanji_to_hiragana_reading(segmenter: &dyn Segmenter, text: &str) -> String {
    reading_of_tokens(segmenter.segment(text))
}

/// Concatenates token readings (folded to hiragana), falling back to the
/// surface of unread tokens.
pub fn reading_of_tokens(tokens: Vec<Token>) -> String {
    tokens
        .into_iter()
        .map(|token| match token.reading {
            Some(reading) => katakana_to_hiragana(&reading),
            None => token.surface,
        })
        .collect()
}

fn shift(ch: char, offset: i64) -> char {
    u32::try_from(i64::from(u32::from(ch)) + offset)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(ch)
}

fn small_extension_to_hiragana(ch: char) -> char {
    match ch {
        'ㇰ' => 'く',
        'ㇱ' => 'し',
        'ㇲ' => 'す',
        'ㇳ' => 'と',
        'ㇴ' => 'ぬ',
        'ㇵ' => 'は',
        'ㇶ' => 'ひ',
        'ㇷ' => 'ふ',
        'ㇸ' => 'へ',
        'ㇹ' => 'ほ',
        'ㇺ' => 'む',
        'ㇻ' => 'ら',
        'ㇼ' => 'り',
        'ㇽ' => 'る',
        'ㇾ' => 'れ',
        'ㇿ' => 'ろ',
        _ => ch,
    }
}

fn push_geminate(output: &mut String, syllable: &str) {
    match syllable.chars().next() {
        _ if syllable.starts_with("ch") => output.push('t'),
        Some(first) if !"aiueo".contains(first) => output.push(first),
        _ => output.push('\''),
    }
}

fn flush_sokuon(output: &mut String, pending: &mut bool) {
    if std::mem::take(pending) {
        output.push('\'');
    }
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Voiced,
    SemiVoiced,
}

/// Rewrites combining and spacing voicing marks, iteration marks and the
/// yori ligature into plain kana.
fn compose_marks(chars: impl Iterator<Item = char>) -> Vec<char> {
    let mut output: Vec<char> = Vec::new();
    for ch in chars {
        match ch {
            '\u{3099}' | '\u{309B}' => mark_previous(&mut output, Mark::Voiced),
            '\u{309A}' | '\u{309C}' => mark_previous(&mut output, Mark::SemiVoiced),
            'ゝ' | 'ゞ' => {
                let Some(previous) = output.last().copied() else {
                    continue;
                };
                let plain = unvoiced(previous);
                match (ch, apply_mark(plain, Mark::Voiced)) {
                    ('ゞ', Some((voiced, extra))) => {
                        output.push(voiced);
                        output.extend(extra);
                    }
                    _ => output.push(plain),
                }
            }
            'ゟ' => output.extend(['よ', 'り']),
            _ => output.push(ch),
        }
    }
    output
}

/// Marks that fit no kana are dropped.
fn mark_previous(output: &mut Vec<char>, mark: Mark) {
    let Some(previous) = output.pop() else {
        return;
    };
    match apply_mark(previous, mark) {
        Some((marked, extra)) => {
            output.push(marked);
            output.extend(extra);
        }
        None => output.push(previous),
    }
}

fn apply_mark(base: char, mark: Mark) -> Option<(char, Option<char>)> {
    match mark {
        Mark::Voiced if "かきくけこさしすせそたちつてとはひふへほ".contains(base) => {
            Some((shift(base, 1), None))
        }
        Mark::Voiced => match base {
            'う' => Some(('ゔ', None)),
            'わ' => Some(('ゔ', Some('ぁ'))),
            'ゐ' => Some(('ゔ', Some('ぃ'))),
            'ゑ' => Some(('ゔ', Some('ぇ'))),
            'を' => Some(('ゔ', Some('ぉ'))),
            _ => None,
        },
        Mark::SemiVoiced if "はひふへほ".contains(base) => Some((shift(base, 2), None)),
        Mark::SemiVoiced => None,
    }
}

fn unvoiced(ch: char) -> char {
    if "がぎぐげござじずぜぞだぢづでどばびぶべぼ".contains(ch) {
        shift(ch, -1)
    } else if "ぱぴぷぺぽ".contains(ch) {
        shift(ch, -2)
    } else if ch == 'ゔ' {
        'う'
    } else {
        ch
    }
}

fn syllable_at(chars: &[char], index: usize) -> Option<(&'static str, usize)> {
    let current = *chars.get(index)?;
    if let Some(syllable) = chars
        .get(index + 1)
        .and_then(|next| digraph(current, *next))
    {
        return Some((syllable, 2));
    }
    monograph(current).map(|syllable| (syllable, 1))
}

fn digraph(base: char, small: char) -> Option<&'static str> {
    let syllable = match (base, small) {
        ('き', 'ゃ') => "kya",
        ('き', 'ゅ') => "kyu",
        ('き', 'ょ') => "kyo",
        ('ぎ', 'ゃ') => "gya",
        ('ぎ', 'ゅ') => "gyu",
        ('ぎ', 'ょ') => "gyo",
        ('し', 'ゃ') => "sha",
        ('し', 'ゅ') => "shu",
        ('し', 'ょ') => "sho",
        ('し', 'ぇ') => "she",
        ('じ', 'ゃ') | ('ぢ', 'ゃ') => "ja",
        ('じ', 'ゅ') | ('ぢ', 'ゅ') => "ju",
        ('じ', 'ょ') | ('ぢ', 'ょ') => "jo",
        ('じ', 'ぇ') => "je",
        ('ち', 'ゃ') => "cha",
        ('ち', 'ゅ') => "chu",
        ('ち', 'ょ') => "cho",
        ('ち', 'ぇ') => "che",
        ('に', 'ゃ') => "nya",
        ('に', 'ゅ') => "nyu",
        ('に', 'ょ') => "nyo",
        ('ひ', 'ゃ') => "hya",
        ('ひ', 'ゅ') => "hyu",
        ('ひ', 'ょ') => "hyo",
        ('び', 'ゃ') => "bya",
        ('び', 'ゅ') => "byu",
        ('び', 'ょ') => "byo",
        ('ぴ', 'ゃ') => "pya",
        ('ぴ', 'ゅ') => "pyu",
        ('ぴ', 'ょ') => "pyo",
        ('み', 'ゃ') => "mya",
        ('み', 'ゅ') => "myu",
        ('み', 'ょ') => "myo",
        ('り', 'ゃ') => "rya",
        ('り', 'ゅ') => "ryu",
        ('り', 'ょ') => "ryo",
        ('ふ', 'ぁ') => "fa",
        ('ふ', 'ぃ') => "fi",
        ('ふ', 'ぇ') => "fe",
        ('ふ', 'ぉ') => "fo",
        ('ふ', 'ゅ') => "fyu",
        ('て', 'ぃ') => "ti",
        ('で', 'ぃ') => "di",
        ('と', 'ぅ') => "tu",
        ('ど', 'ぅ') => "du",
        ('う', 'ぃ') => "wi",
        ('う', 'ぇ') => "we",
        ('う', 'ぉ') => "wo",
        ('ゔ', 'ぁ') => "va",
        ('ゔ', 'ぃ') => "vi",
        ('ゔ', 'ぇ') => "ve",
        ('ゔ', 'ぉ') => "vo",
        ('つ', 'ぁ') => "tsa",
        ('つ', 'ぃ') => "tsi",
        ('つ', 'ぇ') => "tse",
        ('つ', 'ぉ') => "tso",
        ('い', 'ぇ') => "ye",
        ('く', 'ぁ') => "kwa",
        ('ぐ', 'ぁ') => "gwa",
        _ => return None,
    };
    Some(syllable)
}

fn monograph(ch: char) -> Option<&'static str> {
    let syllable = match ch {
        'あ' | 'ぁ' => "a",
        'い' | 'ぃ' | 'ゐ' => "i",
        'う' | 'ぅ' => "u",
        'え' | 'ぇ' | 'ゑ' => "e",
        'お' | 'ぉ' | 'を' => "o",
        'か' | 'ゕ' => "ka",
        'き' => "ki",
        'く' => "ku",
        'け' | 'ゖ' => "ke",
        'こ' => "ko",
        'が' => "ga",
        'ぎ' => "gi",
        'ぐ' => "gu",
        'げ' => "ge",
        'ご' => "go",
        'さ' => "sa",
        'し' => "shi",
        'す' => "su",
        'せ' => "se",
        'そ' => "so",
        'ざ' => "za",
        'じ' | 'ぢ' => "ji",
        'ず' | 'づ' => "zu",
        'ぜ' => "ze",
        'ぞ' => "zo",
        'た' => "ta",
        'ち' => "chi",
        'つ' => "tsu",
        'て' => "te",
        'と' => "to",
        'だ' => "da",
        'で' => "de",
        'ど' => "do",
        'な' => "na",
        'に' => "ni",
        'ぬ' => "nu",
        'ね' => "ne",
        'の' => "no",
        'は' => "ha",
        'ひ' => "hi",
        'ふ' => "fu",
        'へ' => "he",
        'ほ' => "ho",
        'ば' => "ba",
        'び' => "bi",
        'ぶ' => "bu",
        'べ' => "be",
        'ぼ' => "bo",
        'ぱ' => "pa",
        'ぴ' => "pi",
        'ぷ' => "pu",
        'ぺ' => "pe",
        'ぽ' => "po",
        'ま' => "ma",
        'み' => "mi",
        'む' => "mu",
        'め' => "me",
        'も' => "mo",
        'や' | 'ゃ' => "ya",
        'ゆ' | 'ゅ' => "yu",
        'よ' | 'ょ' => "yo",
        'ら' => "ra",
        'り' => "ri",
        'る' => "ru",
        'れ' => "re",
        'ろ' => "ro",
        'わ' | 'ゎ' => "wa",
        'ん' => "n",
        'ゔ' => "vu",
        _ => return None,
    };
    Some(syllable)
}
