// ==========================================
// B2B 交易平台 - 导入模板
// ==========================================
// 结构: 第一个工作表 = 表头 + 示例行；第二个工作表 "Instructions" = 每行一条说明
// ==========================================

use crate::exporter::exports::{headers_of, yes_no};
use crate::exporter::xlsx_writer::{write_workbook, CellValue, ExportResult, SheetData};
use crate::importer::company_resource::COMPANY_EXPORT_ONLY_HEADER;
use crate::importer::{CATEGORY_COLUMNS, COMPANY_COLUMNS, PRODUCT_COLUMNS};
use serde_json::json;

/// 说明工作表名称
pub const INSTRUCTIONS_SHEET: &str = "Instructions";

fn instructions_sheet(lines: &[&str]) -> SheetData {
    let mut sheet = SheetData::new(INSTRUCTIONS_SHEET, vec!["Инструкция".to_string()]);
    for line in lines {
        sheet.rows.push(vec![CellValue::text(*line)]);
    }
    sheet
}

fn json_cell(value: serde_json::Value) -> ExportResult<CellValue> {
    Ok(CellValue::text(serde_json::to_string(&value)?))
}

/// 公司导入模板
pub fn company_template() -> ExportResult<Vec<u8>> {
    let mut headers = headers_of(COMPANY_COLUMNS);
    headers.push(COMPANY_EXPORT_ONLY_HEADER.to_string());
    let mut sheet = SheetData::new("Companies", headers);

    sheet.rows.push(vec![
        CellValue::Empty,
        CellValue::text("ТОО \"Строй Альянс\""),
        CellValue::text("+7-777-100-20-30; +7-705-200-40-50"),
        CellValue::text("Поставка строительных материалов, цемент, арматура, кирпич. Оптовые и розничные продажи."),
        CellValue::text("Алматы"),
        CellValue::text("ул. Сейфуллина, 458, офис 12А"),
        CellValue::text("Дилер"),
        json_cell(json!({
            "phone": "+7-777-100-20-30",
            "email": "sales@stroyalliance.kz",
            "website": "www.stroyalliance.kz"
        }))?,
        json_cell(json!({
            "inn": "123456789012",
            "legal_name": "ТОО Строй Альянс",
            "legal_address": "г.Алматы, ул.Сейфуллина, 458"
        }))?,
        json_cell(json!(["CASH", "CARD", "TRANSFER"]))?,
        json_cell(json!({"description": "Пн-Пт: 8:00-18:00, Сб: 9:00-15:00"}))?,
        CellValue::text("Одобрено"),
        CellValue::text("manager@stroyalliance.kz"),
        CellValue::text("Строительные материалы"),
        CellValue::Empty,
    ]);
    sheet.rows.push(vec![
        CellValue::Empty,
        CellValue::text("ТОО \"МеталлПром\""),
        CellValue::text("+7-727-350-60-70"),
        CellValue::text("Производство металлических конструкций и изделий."),
        CellValue::text("Караганда"),
        CellValue::text("промзона Восток, участок 15Б"),
        CellValue::text("Производитель"),
        json_cell(json!({
            "phone": "+7-727-350-60-70",
            "email": "orders@metallprom.kz",
            "website": "www.metallprom.kz"
        }))?,
        json_cell(json!({
            "inn": "987654321098",
            "legal_name": "ТОО МеталлПром",
            "legal_address": "г.Караганда, промзона Восток, участок 15Б"
        }))?,
        json_cell(json!(["TRANSFER", "CASH"]))?,
        json_cell(json!({"description": "Пн-Сб: 7:00-19:00"}))?,
        CellValue::text("Одобрено"),
        CellValue::text("admin@metallprom.kz"),
        CellValue::text("Металлопрокат | Металлоконструкции"),
        CellValue::Empty,
    ]);

    let instructions = instructions_sheet(&[
        "Первая строка содержит заголовки колонок, порядок колонок не важен.",
        "Обязательная колонка: Название.",
        "ID оставьте пустым для новой компании; заполненный ID обновляет существующую запись.",
        "Компания с уже существующим названием будет обновлена, а не создана повторно.",
        "Номера телефонов: через запятую или точку с запятой.",
        "Тип поставщика: Дилер, Производитель, Торговый представитель.",
        "Статус: Черновик, На модерации, Одобрено, Отклонено, Заблокировано.",
        "Контакты, Юр. информация, График работы: JSON-объект; Способы оплаты: JSON-список (CASH, CARD, TRANSFER, CRYPTO).",
        "Некорректный JSON заменяется пустым значением без ошибки.",
        "Владелец: email или имя пользователя; пусто — системный пользователь.",
        "Категории: названия через символ |.",
        "Пустые ячейки не изменяют существующие значения.",
        "Колонка «Дата создания» при импорте игнорируется.",
    ]);

    write_workbook(&[sheet, instructions])
}

/// 商品导入模板
pub fn product_template() -> ExportResult<Vec<u8>> {
    let mut sheet = SheetData::new("Products", headers_of(PRODUCT_COLUMNS));

    let examples: [(&str, &str, &str, &str, f64, &str, f64, bool); 3] = [
        ("ТОО \"Строй Альянс\"", "Цемент М500", "Строительные материалы", "Мешок 50 кг", 2800.0, "KZT", 120.0, true),
        ("ТОО \"Строй Альянс\"", "Арматура А500С 12 мм", "Металлопрокат", "Цена за тонну", 385000.0, "KZT", 0.0, true),
        ("ТОО \"МеталлПром\"", "Ферма стропильная", "Металлоконструкции", "Изготовление по чертежам заказчика", 1500.0, "USD", 4.0, false),
    ];
    for (company, title, category, description, price, currency, stock, active) in examples {
        sheet.rows.push(vec![
            CellValue::Empty,
            CellValue::text(company),
            CellValue::text(title),
            CellValue::text(category),
            CellValue::text(description),
            CellValue::Number(price),
            CellValue::text(currency),
            CellValue::Number(stock),
            yes_no(active),
        ]);
    }

    let instructions = instructions_sheet(&[
        "Обязательные колонки: Компания, Название.",
        "Компания и Категория указываются по точному названию.",
        "Товар с тем же названием у той же компании будет обновлён.",
        "Цена: число, допускается запятая в качестве разделителя.",
        "Валюта: KZT, RUB или USD (по умолчанию KZT).",
        "Остаток: количество; больше 0 — в наличии, 0 — нет в наличии. Также допускается да/нет.",
        "Активен: да или нет.",
        "Пустые ячейки не изменяют существующие значения.",
    ]);

    write_workbook(&[sheet, instructions])
}

/// 分类导入模板
pub fn category_template() -> ExportResult<Vec<u8>> {
    let mut sheet = SheetData::new("Categories", headers_of(CATEGORY_COLUMNS));

    let examples = [
        ("Строительные материалы", "stroitelnye-materialy", "", true),
        ("Цемент", "", "Строительные материалы", true),
        ("Металлопрокат", "metalloprokat", "", true),
        ("Трубы", "", "Металлопрокат", false),
    ];
    for (name, slug, parent, active) in examples {
        sheet.rows.push(vec![
            CellValue::Empty,
            CellValue::text(name),
            CellValue::text(slug),
            CellValue::text(parent),
            yes_no(active),
        ]);
    }

    let instructions = instructions_sheet(&[
        "Обязательная колонка: Название (допускается заголовок name).",
        "Slug можно не заполнять: он будет создан из названия.",
        "При совпадении slug с другой категорией добавляется числовой суффикс (-1, -2, ...).",
        "Родитель: название или slug родительской категории.",
        "Активна: да или нет.",
    ]);

    write_workbook(&[sheet, instructions])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::ExcelParser;
    use calamine::{open_workbook_auto_from_rs, Reader};
    use std::io::Cursor;

    #[test]
    fn test_company_template_has_examples_and_instructions() {
        let bytes = company_template().unwrap();

        let parsed = ExcelParser.parse_bytes("template.xlsx", &bytes).unwrap();
        assert_eq!(parsed.headers[1], "Название");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].cells[4], "Алматы");
        assert_eq!(parsed.rows[1].cells[4], "Караганда");

        let workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Companies", INSTRUCTIONS_SHEET]);
    }

    #[test]
    fn test_templates_have_one_to_four_examples() {
        for bytes in [product_template().unwrap(), category_template().unwrap()] {
            let parsed = ExcelParser.parse_bytes("template.xlsx", &bytes).unwrap();
            assert!((1..=4).contains(&parsed.rows.len()));
        }
    }
}
