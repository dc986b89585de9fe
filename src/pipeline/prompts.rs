use crate::extract::answer_block_instructions;

pub const EXPLANATION_PLACEHOLDER: &str = "[your explanation]";
pub const EMOJI_PLACEHOLDER: &str = "[your emoji]";

/// Asks for an English explanation of a translated term.
pub fn explanation_prompt(term: &str) -> String {
    format!(
        "You will receive a text and must explain the definition of the word.\n\
         You must reply in the English language.\n\
         You must explain whether this is a traditional translation or a more current one.\n\
         You must explain whether the word is borrowed from another language.\n\
         If there are more popular variants of the word, mention them too.\n\
         \n\
         Format the response in the following way:\n\
         \n\
         {block}\n\
         \n\
         Now explain this text in detail and give the definition of the word or words:\n\
         \"{term}\"\n",
        block = answer_block_instructions(EXPLANATION_PLACEHOLDER),
    )
}

/// Asks for exactly one emoji matching a translated term.
pub fn emoji_prompt(term: &str) -> String {
    format!(
        "You will receive a text and must return exactly one corresponding emoji.\n\
         Format the response in the following way:\n\
         \n\
         {block}\n\
         \n\
         Now return the emoji relating to this text:\n\
         \"{term}\"\n",
        block = answer_block_instructions(EMOJI_PLACEHOLDER),
    )
}

pub const READING_PLACEHOLDER: &str = "[input converted to hiragana]";

/// Asks for the hiragana reading of a Japanese term.
pub fn reading_prompt(term: &str) -> String {
    format!(
        "You will receive a Japanese text and must convert any katakana and kanji characters into hiragana.\n\
         Reply with the reading only, using hiragana characters.\n\
         Format the response in the following way:\n\
         \n\
         {block}\n\
         \n\
         Now convert this text into hiragana-only characters:\n\
         \"{term}\"\n",
        block = answer_block_instructions(READING_PLACEHOLDER),
    )
}
