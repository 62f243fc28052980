// ==========================================
// B2B 交易平台 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 俄文布尔值 / 数值与 JSON 单元格解析
// 约定: 解析失败返回 None，由调用方决定记行级错误还是回落默认值
// ==========================================

use serde_json::Value as JsonValue;

/// 视为“未填写”的单元格文本
const NULL_TOKENS: [&str; 5] = ["", "null", "none", "nan", "n/a"];

pub struct DataCleaner;

impl DataCleaner {
    /// 空串 / NULL 类值标准化为 None
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 俄文布尔值: 仅接受 да / нет 的三种写法
    ///
    /// # 返回
    /// - Some(true): да / Да / ДА
    /// - Some(false): нет / Нет / НЕТ
    /// - None: 其他任何值（字段保持不变）
    pub fn parse_bool_ru(&self, value: &str) -> Option<bool> {
        match value.trim() {
            "да" | "Да" | "ДА" => Some(true),
            "нет" | "Нет" | "НЕТ" => Some(false),
            _ => None,
        }
    }

    /// 小数解析（接受逗号小数点与空格千分位）
    pub fn parse_decimal(&self, value: &str) -> Option<f64> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// 整数解析（Excel 数值单元格可能带 ".0"）
    pub fn parse_integer(&self, value: &str) -> Option<i64> {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Some(v);
        }
        self.parse_decimal(trimmed)
            .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
            .map(|v| v as i64)
    }

    /// 库存列: 数量 > 0 视为有货；也接受 да / нет 与导出时的文字
    pub fn parse_stock(&self, value: &str) -> Option<bool> {
        if let Some(flag) = self.parse_bool_ru(value) {
            return Some(flag);
        }
        match value.trim().to_lowercase().as_str() {
            "в наличии" => return Some(true),
            "нет в наличии" => return Some(false),
            _ => {}
        }
        self.parse_decimal(value).map(|qty| qty > 0.0)
    }

    /// JSON 单元格解析
    pub fn parse_json(&self, value: &str) -> Option<JsonValue> {
        serde_json::from_str(value.trim()).ok()
    }

    /// 按分隔符拆分列表单元格（去空白、去空项）
    pub fn split_list(&self, value: &str, separator: char) -> Vec<String> {
        value
            .split(separator)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null("  Acme "), Some("Acme".to_string()));
        assert_eq!(cleaner.normalize_null("   "), None);
        assert_eq!(cleaner.normalize_null("NULL"), None);
        assert_eq!(cleaner.normalize_null("nan"), None);
    }

    #[test]
    fn test_parse_bool_ru_exact_tokens() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_bool_ru("да"), Some(true));
        assert_eq!(cleaner.parse_bool_ru("ДА"), Some(true));
        assert_eq!(cleaner.parse_bool_ru(" Нет "), Some(false));
        assert_eq!(cleaner.parse_bool_ru("yes"), None);
        assert_eq!(cleaner.parse_bool_ru("1"), None);
    }

    #[test]
    fn test_parse_numbers() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_decimal("1 500,50"), Some(1500.5));
        assert_eq!(cleaner.parse_decimal("abc"), None);
        assert_eq!(cleaner.parse_integer("12"), Some(12));
        assert_eq!(cleaner.parse_integer("12.0"), Some(12));
        assert_eq!(cleaner.parse_integer("12.5"), None);
    }

    #[test]
    fn test_parse_stock_threshold() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_stock("5"), Some(true));
        assert_eq!(cleaner.parse_stock("0"), Some(false));
        assert_eq!(cleaner.parse_stock("-3"), Some(false));
        assert_eq!(cleaner.parse_stock("нет"), Some(false));
        assert_eq!(cleaner.parse_stock("в наличии"), Some(true));
        assert_eq!(cleaner.parse_stock("много"), None);
    }

    #[test]
    fn test_split_list() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.split_list("Металл | Трубы||", '|'),
            vec!["Металл".to_string(), "Трубы".to_string()]
        );
    }
}
