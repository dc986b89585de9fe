use rand::Rng;

const INVISIBLE_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];
const MIN_LEN: usize = 4;
const MAX_LEN: usize = 8;

/// Random run of zero-width characters. Prepended to generation prompts so
/// providers cannot serve a cached completion for a repeated prompt.
pub fn invisible_token() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(MIN_LEN..=MAX_LEN);
    (0..len)
        .map(|_| INVISIBLE_CHARS[rng.random_range(..INVISIBLE_CHARS.len())])
        .collect()
}

#[cfg(test)]
pub(crate) fn is_invisible(ch: char) -> bool {
    INVISIBLE_CHARS.contains(&ch)
}

pub(crate) fn with_cache_bust(prompt: &str) -> String {
    let mut busted = invisible_token();
    busted.push_str(prompt);
    busted
}
