// ==========================================
// B2B 交易平台 - 联系方式模型
// ==========================================
// 内部统一为“联系方式列表”一种表示
// 对外兼容两种历史结构:
//   - 单数: phone / email (字符串)
//   - 复数: phones / emails (列表)
// 写出时两种结构同时生成并保持同步
// ==========================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// 联系方式类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Phone,
    Email,
    Website,
    Social,
}

/// 单条联系方式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactItem {
    pub kind: ContactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>, // 社交网络名称等
    pub value: String,
}

/// 联系方式集合（规范表示）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contacts {
    pub items: Vec<ContactItem>,
}

impl Contacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 追加一条联系方式（空值与重复项忽略）
    pub fn push(&mut self, kind: ContactKind, label: Option<&str>, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        let label = label.map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
        let exists = self
            .items
            .iter()
            .any(|item| item.kind == kind && item.value == value && item.label == label);
        if !exists {
            self.items.push(ContactItem {
                kind,
                label,
                value: value.to_string(),
            });
        }
    }

    fn values_of(&self, kind: ContactKind) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.kind == kind)
            .map(|item| item.value.as_str())
            .collect()
    }

    pub fn phones(&self) -> Vec<&str> {
        self.values_of(ContactKind::Phone)
    }

    pub fn emails(&self) -> Vec<&str> {
        self.values_of(ContactKind::Email)
    }

    pub fn website(&self) -> Option<&str> {
        self.values_of(ContactKind::Website).into_iter().next()
    }

    /// 以自由文本电话列（逗号 / 分号 / 换行分隔）替换全部电话
    ///
    /// 电话排在列表最前，导出再导入时顺序不变
    pub fn replace_phones_text(&mut self, text: &str) {
        let others: Vec<ContactItem> = self
            .items
            .drain(..)
            .filter(|item| item.kind != ContactKind::Phone)
            .collect();
        for phone in text.split([',', ';', '\n']) {
            self.push(ContactKind::Phone, None, phone);
        }
        self.items.extend(others);
    }

    /// 电话列表渲染为单元格文本
    pub fn phones_text(&self) -> String {
        self.phones().join(", ")
    }

    // ==========================================
    // 历史结构适配
    // ==========================================

    /// 从历史 JSON 结构读取（单数与复数字段均可）
    ///
    /// 非对象值返回空集合
    pub fn from_legacy_json(value: &JsonValue) -> Self {
        let mut contacts = Contacts::new();
        let obj = match value.as_object() {
            Some(obj) => obj,
            None => return contacts,
        };

        for key in ["phone", "phones"] {
            for phone in collect_strings(obj.get(key)) {
                contacts.push(ContactKind::Phone, None, &phone);
            }
        }
        for key in ["email", "emails"] {
            for email in collect_strings(obj.get(key)) {
                contacts.push(ContactKind::Email, None, &email);
            }
        }
        for website in collect_strings(obj.get("website")) {
            contacts.push(ContactKind::Website, None, &website);
        }
        for key in ["social_links", "social"] {
            if let Some(JsonValue::Object(links)) = obj.get(key) {
                for (network, url) in links {
                    if let Some(url) = url.as_str() {
                        contacts.push(ContactKind::Social, Some(network), url);
                    }
                }
            }
        }

        contacts
    }

    /// 生成历史 JSON 结构（单数/复数同步写出，空字段省略）
    pub fn to_legacy_json(&self) -> JsonValue {
        let mut obj = Map::new();

        let phones = self.phones();
        if let Some(first) = phones.first() {
            obj.insert("phone".to_string(), JsonValue::from(*first));
            obj.insert("phones".to_string(), JsonValue::from(phones.clone()));
        }

        let emails = self.emails();
        if let Some(first) = emails.first() {
            obj.insert("email".to_string(), JsonValue::from(*first));
            obj.insert("emails".to_string(), JsonValue::from(emails.clone()));
        }

        if let Some(website) = self.website() {
            obj.insert("website".to_string(), JsonValue::from(website));
        }

        let socials: Map<String, JsonValue> = self
            .items
            .iter()
            .filter(|item| item.kind == ContactKind::Social)
            .map(|item| {
                (
                    item.label.clone().unwrap_or_default(),
                    JsonValue::from(item.value.as_str()),
                )
            })
            .collect();
        if !socials.is_empty() {
            obj.insert("social_links".to_string(), JsonValue::Object(socials));
        }

        JsonValue::Object(obj)
    }
}

/// 字符串或字符串列表 → Vec<String>
fn collect_strings(value: Option<&JsonValue>) -> Vec<String> {
    match value {
        Some(JsonValue::String(s)) => vec![s.clone()],
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}
