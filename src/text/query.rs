//! 查询构建模块
//!
//! 把词面文本规范化为服务查询串，查询串同时也是缓存键。
//! 拉丁语只做小写化；希腊语还要剥掉全部变音符号——带符号的
//! 希腊语查询会让服务返回空结果集。规范化是有损的（不同注音
//! 形态会折叠成同一个查询，它们因此共享缓存条目），但必须
//! 幂等，且只由（词面文本, 语言）决定。
//!
//! 服务返回的希腊语形态是 Unicode 希腊文，而提交的查询是
//! Beta Code；形态回核对之前要先音译。音译表沿用 Perseus
//! 的小写方言。

use crate::text::language::Language;
use crate::text::tokenizer::Word;

/// 从词构建提交给服务的查询串
pub fn for_word(word: &Word) -> String {
    normalize(&word.text, word.language)
}

/// 按语言规范化文本；幂等
pub fn normalize(text: &str, language: Language) -> String {
    match language {
        Language::Latin => text.to_lowercase(),
        Language::Greek => normalize_greek(text),
    }
}

/// 希腊语规范化：先音译成 Beta Code，再剔除所有非字母字符
///（呼吸符、重音、下加 iota、分音符、大写标记、省音号）
pub fn normalize_greek(text: &str) -> String {
    transliterate(text)
        .chars()
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Unicode 希腊文 → Beta Code（Perseus 小写方言）。
/// ASCII 输入原样通过，所以已是 Beta Code 的文本音译幂等。
/// 预组合的带符号元音折叠到基字母；已分解文本里的组合变音符
/// 映射为对应的 Beta Code 符号。
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        if let Some(mark) = beta_mark(c) {
            out.push(mark);
            continue;
        }
        let folded = fold_greek(c);
        match beta_letter(folded) {
            Some(b) => out.push(b),
            // 非希腊字符按小写原样通过
            None => out.extend(c.to_lowercase()),
        }
    }
    out
}

/// 组合变音符 → Beta Code 符号
fn beta_mark(c: char) -> Option<char> {
    Some(match c {
        '\u{0301}' => '/',  // 锐音
        '\u{0300}' => '\\', // 钝音
        '\u{0314}' => '(',  // 粗气符
        '\u{0313}' => ')',  // 柔气符
        '\u{0342}' => '=',  // 扬抑符
        '\u{0308}' => '+',  // 分音符
        '\u{0345}' => '|',  // 下加 iota
        '\u{1FBD}' => '\'',
        _ => return None,
    })
}

/// 小写希腊字母 → Beta Code 字母。两个 sigma 都映射到 `s`。
fn beta_letter(c: char) -> Option<char> {
    Some(match c {
        'α' => 'a',
        'β' => 'b',
        'γ' => 'g',
        'δ' => 'd',
        'ε' => 'e',
        'ζ' => 'z',
        'η' => 'h',
        'θ' => 'q',
        'ι' => 'i',
        'κ' => 'k',
        'λ' => 'l',
        'μ' => 'm',
        'ν' => 'n',
        'ξ' => 'c',
        'ο' => 'o',
        'π' => 'p',
        'ρ' => 'r',
        'σ' | 'ς' => 's',
        'τ' => 't',
        'υ' => 'u',
        'φ' => 'f',
        'χ' => 'x',
        'ψ' => 'y',
        'ω' => 'w',
        'ϝ' => 'v',
        _ => return None,
    })
}

/// 把带变音符号的希腊字符折叠到无符号小写基字母，覆盖单调块
/// 和多调扩展块。多调扩展块按行折叠，条目来自 Unicode 区块表。
fn fold_greek(c: char) -> char {
    // 大写先统一小写（标准库的大小写表覆盖两个希腊语块）
    let c = c.to_lowercase().next().unwrap_or(c);
    match c as u32 {
        0x1F00..=0x1F07 | 0x1F70..=0x1F71 | 0x1F80..=0x1F87 | 0x1FB0..=0x1FB4 | 0x1FB6..=0x1FB7 => 'α',
        0x1F10..=0x1F15 | 0x1F72..=0x1F73 => 'ε',
        0x1F20..=0x1F27 | 0x1F74..=0x1F75 | 0x1F90..=0x1F97 | 0x1FC2..=0x1FC4 | 0x1FC6..=0x1FC7 => 'η',
        0x1F30..=0x1F37 | 0x1F76..=0x1F77 | 0x1FD0..=0x1FD3 | 0x1FD6..=0x1FD7 => 'ι',
        0x1F40..=0x1F45 | 0x1F78..=0x1F79 => 'ο',
        0x1F50..=0x1F57 | 0x1F7A..=0x1F7B | 0x1FE0..=0x1FE3 | 0x1FE6..=0x1FE7 => 'υ',
        0x1F60..=0x1F67 | 0x1F7C..=0x1F7D | 0x1FA0..=0x1FA7 | 0x1FF2..=0x1FF4 | 0x1FF6..=0x1FF7 => 'ω',
        0x1FE4..=0x1FE5 => 'ρ',
        _ => match c {
            'ά' => 'α',
            'έ' => 'ε',
            'ή' => 'η',
            'ί' | 'ΐ' | 'ϊ' => 'ι',
            'ό' => 'ο',
            'ύ' | 'ΰ' | 'ϋ' => 'υ',
            'ώ' => 'ω',
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenizer::{Location, Word};

    fn greek_word(text: &str) -> Word {
        Word {
            text: text.to_string(),
            language: Language::Greek,
            label: "test".to_string(),
            location: Location::new(),
        }
    }

    #[test]
    fn latin_is_lowercased_only() {
        assert_eq!(normalize("Gallia", Language::Latin), "gallia");
        assert_eq!(normalize("AMARE", Language::Latin), "amare");
    }

    #[test]
    fn beta_code_diacritics_are_stripped() {
        assert_eq!(normalize("mh/nin", Language::Greek), "mhnin");
        assert_eq!(normalize("a)/eide", Language::Greek), "aeide");
        assert_eq!(normalize("*(ome/rou", Language::Greek), "omerou");
        assert_eq!(normalize("qew=|", Language::Greek), "qew");
    }

    #[test]
    fn unicode_greek_transliterates_to_stripped_beta_code() {
        assert_eq!(normalize("μηρύσαντο", Language::Greek), "mhrusanto");
        assert_eq!(normalize("μηρύομαι", Language::Greek), "mhruomai");
        assert_eq!(normalize("θεά", Language::Greek), "qea");
    }

    #[test]
    fn final_and_medial_sigma_collapse() {
        assert_eq!(normalize("λόγος", Language::Greek), "logos");
    }

    #[test]
    fn uppercase_and_polytonic_greek_fold() {
        assert_eq!(normalize("Μῆνιν", Language::Greek), "mhnin");
        assert_eq!(normalize("ἄειδε", Language::Greek), "aeide");
        assert_eq!(normalize("ᾠδή", Language::Greek), "wdh");
    }

    #[test]
    fn decomposed_combining_marks_are_stripped() {
        // υ + 组合锐音
        assert_eq!(normalize("μηρυ\u{0301}σαντο", Language::Greek), "mhrusanto");
    }

    #[test]
    fn normalization_is_idempotent() {
        for (text, language) in [
            ("mh/nin", Language::Greek),
            ("μηρύσαντο", Language::Greek),
            ("Gallia", Language::Latin),
        ] {
            let once = normalize(text, language);
            let twice = normalize(&once, language);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn distinct_accented_forms_collapse_to_one_query() {
        // 钝音/锐音变体共享同一个查询，因此共享缓存条目
        assert_eq!(
            normalize("qea/", Language::Greek),
            normalize("qea\\", Language::Greek)
        );
    }

    #[test]
    fn query_for_word_uses_word_language() {
        let word = greek_word("mh=nin");
        assert_eq!(for_word(&word), "mhnin");
    }

    #[test]
    fn transliterate_maps_marks_for_decomposed_input() {
        assert_eq!(transliterate("μηρυ\u{0301}σαντο"), "mhru/santo");
    }
}
