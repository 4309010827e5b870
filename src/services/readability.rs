//! 可读性估算 - 业务能力层
//!
//! (文本, 语言) 的确定性纯函数，Flesch Reading Ease 风格公式，
//! 西语和英语使用不同系数。文体分析依赖这里的得分。

use crate::models::Language;
use crate::utils::text;

/// 计算可读性得分，结果限定在 [0, 100]
///
/// 公式：
/// - 西语: 206.835 - 1.02 * 平均每句词数 - 60 * 平均每词音节数
/// - 英语: 206.835 - 1.015 * 平均每句词数 - 84.6 * 平均每词音节数
///
/// 空文本（无词或无句）定义为 0。
pub fn readability_score(input: &str, language: Language) -> f64 {
    let words = text::tokenize_words(input);
    let sentences = text::split_sentences(input);

    if words.is_empty() || sentences.is_empty() {
        return 0.0;
    }

    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let avg_words_per_sentence = words.len() as f64 / sentences.len() as f64;
    let avg_syllables_per_word = syllables as f64 / words.len() as f64;

    let score = match language {
        Language::Es => 206.835 - 1.02 * avg_words_per_sentence - 60.0 * avg_syllables_per_word,
        Language::En => 206.835 - 1.015 * avg_words_per_sentence - 84.6 * avg_syllables_per_word,
    };

    score.clamp(0.0, 100.0)
}

/// 估算单词的音节数（元音簇启发式）
///
/// - 3 个字符以内算 1 个音节
/// - 去掉常见的不发音结尾（辅音+es、ed、辅音+e）和开头的 y
/// - 剩余部分按元音簇计数，每簇最多吞并 2 个连续元音
/// - 一个簇都没有时算 1 个音节
pub fn count_syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let n = chars.len();

    if n <= 3 {
        return 1;
    }

    let keeps_ending = |c: char| "laeiouy".contains(c);

    let stripped: &[char] = if n >= 3 && !keeps_ending(chars[n - 3]) && chars[n - 2] == 'e' && chars[n - 1] == 's' {
        &chars[..n - 3]
    } else if chars[n - 2] == 'e' && chars[n - 1] == 'd' {
        &chars[..n - 2]
    } else if !keeps_ending(chars[n - 2]) && chars[n - 1] == 'e' {
        &chars[..n - 2]
    } else {
        &chars[..]
    };

    let stripped = if stripped.first() == Some(&'y') {
        &stripped[1..]
    } else {
        stripped
    };

    let is_vowel = |c: char| "aeiouy".contains(c);

    let mut clusters = 0usize;
    let mut run = 0usize;
    for &c in stripped {
        if is_vowel(c) {
            run += 1;
            if run == 2 {
                clusters += 1;
                run = 0;
            }
        } else if run == 1 {
            clusters += 1;
            run = 0;
        } else {
            run = 0;
        }
    }
    if run == 1 {
        clusters += 1;
    }

    clusters.max(1)
}
