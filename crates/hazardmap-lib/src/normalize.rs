//! Text canonicalisation for Japanese search input.
//!
//! Shelter names and addresses show up in several encodings of the same
//! text: half-width or full-width katakana, hiragana, full-width digits and
//! Latin letters, ideographic spaces. [`normalize`] collapses all of them to
//! one form so fuzzy matching does not depend on how the user typed.
//!
//! Steps, in order:
//! 1. half-width katakana → full-width katakana (voiced marks are combined)
//! 2. full-width space → ASCII space
//! 3. full-width ASCII (`！`..`～`) → ASCII
//! 4. hiragana → katakana
//! 5. all whitespace removed
//! 6. ASCII letters lower-cased
//!
//! The function is total and idempotent.

/// Full-width equivalents of U+FF61..=U+FF9F, in code point order.
const HALF_WIDTH_KATAKANA: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const HALF_WIDTH_START: u32 = 0xFF61;
const HALF_WIDTH_END: u32 = 0xFF9F;
const HALF_WIDTH_VOICED_MARK: char = '\u{FF9E}';
const HALF_WIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

const FULL_WIDTH_SPACE: char = '\u{3000}';
const FULL_WIDTH_ASCII_START: u32 = 0xFF01;
const FULL_WIDTH_ASCII_END: u32 = 0xFF5E;
const FULL_WIDTH_ASCII_OFFSET: u32 = 0xFEE0;

const HIRAGANA_START: u32 = 0x3041;
const HIRAGANA_END: u32 = 0x3096;
const HIRAGANA_TO_KATAKANA: u32 = 0x60;

/// Canonicalise `text` for locale-tolerant comparison.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let c = match half_width_katakana(c) {
            Some(full) => match chars.peek().copied() {
                Some(HALF_WIDTH_VOICED_MARK) => match voiced(full) {
                    Some(combined) => {
                        chars.next();
                        combined
                    }
                    None => full,
                },
                Some(HALF_WIDTH_SEMI_VOICED_MARK) => match semi_voiced(full) {
                    Some(combined) => {
                        chars.next();
                        combined
                    }
                    None => full,
                },
                _ => full,
            },
            None => c,
        };

        let c = full_width_to_ascii(c);
        let c = hiragana_to_katakana(c);

        if c.is_whitespace() {
            continue;
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}

fn half_width_katakana(c: char) -> Option<char> {
    let code = c as u32;
    if !(HALF_WIDTH_START..=HALF_WIDTH_END).contains(&code) {
        return None;
    }
    HALF_WIDTH_KATAKANA
        .chars()
        .nth((code - HALF_WIDTH_START) as usize)
}

fn voiced(c: char) -> Option<char> {
    match c {
        'カ' | 'キ' | 'ク' | 'ケ' | 'コ' | 'サ' | 'シ' | 'ス' | 'セ' | 'ソ' | 'タ' | 'チ' | 'ツ'
        | 'テ' | 'ト' | 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(c as u32 + 1),
        'ウ' => Some('ヴ'),
        'ワ' => Some('ヷ'),
        'ヲ' => Some('ヺ'),
        _ => None,
    }
}

fn semi_voiced(c: char) -> Option<char> {
    match c {
        'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(c as u32 + 2),
        _ => None,
    }
}

fn full_width_to_ascii(c: char) -> char {
    if c == FULL_WIDTH_SPACE {
        return ' ';
    }
    let code = c as u32;
    if (FULL_WIDTH_ASCII_START..=FULL_WIDTH_ASCII_END).contains(&code) {
        char::from_u32(code - FULL_WIDTH_ASCII_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

fn hiragana_to_katakana(c: char) -> char {
    let code = c as u32;
    if (HIRAGANA_START..=HIRAGANA_END).contains(&code) {
        char::from_u32(code + HIRAGANA_TO_KATAKANA).unwrap_or(c)
    } else {
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_width_katakana_matches_full_width() {
        assert_eq!(normalize("ｱｲｳ"), normalize("アイウ"));
        assert_eq!(normalize("ｱｲｳ"), "アイウ");
    }

    #[test]
    fn voiced_marks_are_combined() {
        assert_eq!(normalize("ｶﾞｯｺｳ"), "ガッコウ");
        assert_eq!(normalize("ﾊﾟﾝ"), "パン");
        assert_eq!(normalize("ｳﾞ"), "ヴ");
    }

    #[test]
    fn stray_voiced_mark_is_kept_as_full_width() {
        assert_eq!(normalize("ｱﾞ"), "ア゛");
        assert_eq!(normalize(&normalize("ｱﾞ")), "ア゛");
    }

    #[test]
    fn hiragana_and_katakana_are_interchangeable() {
        assert_eq!(normalize("あいう"), normalize("アイウ"));
        assert_eq!(normalize("しんじゅく"), "シンジュク");
    }

    #[test]
    fn full_width_alphanumerics_become_ascii_lowercase() {
        assert_eq!(normalize("ＡＢＣ１２３"), "abc123");
        assert_eq!(normalize("ABC"), normalize("abc"));
    }

    #[test]
    fn whitespace_is_removed() {
        assert_eq!(normalize("新宿　区 立\t小学校\n"), "新宿区立小学校");
        assert_eq!(normalize(" 　 "), "");
    }

    #[test]
    fn kanji_pass_through() {
        assert_eq!(normalize("東京都千代田区"), "東京都千代田区");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "ｶﾞｯｺｳ　ABC",
            "ひなんじょ１２",
            "ﾊﾟﾋﾟﾌﾟﾍﾟﾎﾟ",
            "Ｔｏｋｙｏ　Ｓｔａｔｉｏｎ",
            "",
            "ｰ｡｢｣",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }
}
