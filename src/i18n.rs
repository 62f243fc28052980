// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持俄文（默认）和英文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

/// 默认语言
pub const DEFAULT_LOCALE: &str = "ru";

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"ru" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 规范化请求中的语言代码，未知语言回落到默认语言
pub fn normalize_locale(locale: Option<&str>) -> String {
    match locale.map(|l| l.trim().to_lowercase()) {
        Some(l) if l.starts_with("en") => "en".to_string(),
        Some(l) if l.starts_with("ru") => "ru".to_string(),
        _ => DEFAULT_LOCALE.to_string(),
    }
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use b2b_marketplace::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use b2b_marketplace::i18n::t_with_args;
/// let msg = t_with_args("import.row_error", &[("row", "2"), ("message", "...")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key).to_string(), args)
}

/// 以指定语言翻译（不修改全局语言）
///
/// 导入报告按请求语言生成，不依赖全局状态
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    replace_args(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn replace_args(mut result: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}
