use regex::Regex;
use std::sync::LazyLock;

static REASONING_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?(</think>|$)").expect("valid regex"));

/// 按字符（而非字节）截断，保证不会切断UTF-8字符
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// 去掉推理模型输出中的`<think>...</think>`块，未闭合的块截断到结尾
pub fn strip_reasoning(text: &str) -> String {
    REASONING_BLOCK.replace_all(text, "").trim().to_string()
}
