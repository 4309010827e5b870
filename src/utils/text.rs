//! 文本处理辅助函数
//!
//! 分词、分句、分段和清洗，供各分析能力复用。
//! 字符偏移一律按 Unicode 字符计，不按字节。

use regex::Regex;

/// 清洗并规范化提取出的纯文本
///
/// - 统一换行符为 `\n`
/// - 去除控制字符（保留换行）
/// - 压缩连续的空格 / 制表符
/// - 三个以上连续换行压缩为一个空行
/// - 去除首尾空白
pub fn clean_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let without_control: String = normalized
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .collect();

    // 压缩行内空白，但保留换行结构
    let mut cleaned = without_control;
    if let Ok(re) = Regex::new(r"[ \t]+") {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    if let Ok(re) = Regex::new(r"\n{3,}") {
        cleaned = re.replace_all(&cleaned, "\n\n").into_owned();
    }

    cleaned.trim().to_string()
}

/// 把文本切分为单词列表
///
/// 按空白切分后去掉两端的标点，空串被过滤。
pub fn tokenize_words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect()
}

/// 统计单词数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().filter(|w| !w.is_empty()).count()
}

/// 按 `.!?` 切分句子，过滤空句
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 按空行切分段落
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split("\n\n").collect()
}

/// 文本的字符长度（用于 position 偏移）
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
