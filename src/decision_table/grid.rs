// ==========================================
// 俱乐部运营平台 - 决策表单元格视图
// ==========================================
// 读取走 calamine，改写走 umya-spreadsheet；
// 两条路径共用同一套块定位与数据区间计算。
// 行列号一律从 1 开始。
// ==========================================

use regex::Regex;
use std::sync::OnceLock;

/// 规则块数据区起点相对表头的偏移
pub const DATA_ROW_OFFSET: u32 = 5;
/// 元数据行相对表头的偏移
pub const METADATA_ROW_OFFSET: u32 = 4;

pub trait CellGrid {
    /// 单元格文本（去首尾空白，空单元格为 ""）
    fn cell_text(&self, row: u32, col: u32) -> String;

    fn max_row(&self) -> u32;

    fn max_col(&self) -> u32;

    fn is_blank_row(&self, row: u32) -> bool {
        (1..=self.max_col()).all(|col| self.cell_text(row, col).is_empty())
    }
}

// ==========================================
// calamine 读取视图
// ==========================================
impl CellGrid for calamine::Range<calamine::Data> {
    fn cell_text(&self, row: u32, col: u32) -> String {
        if row == 0 || col == 0 {
            return String::new();
        }
        self.get_value((row - 1, col - 1))
            .map(|cell| cell.to_string().trim().to_string())
            .unwrap_or_default()
    }

    fn max_row(&self) -> u32 {
        self.end().map(|(r, _)| r + 1).unwrap_or(0)
    }

    fn max_col(&self) -> u32 {
        self.end().map(|(_, c)| c + 1).unwrap_or(0)
    }
}

// ==========================================
// umya-spreadsheet 改写视图
// ==========================================
impl CellGrid for umya_spreadsheet::Worksheet {
    fn cell_text(&self, row: u32, col: u32) -> String {
        if row == 0 || col == 0 {
            return String::new();
        }
        match self.get_cell((col, row)) {
            // 布尔单元格与 calamine 读取结果保持一致（小写）
            Some(cell) if cell.get_data_type() == "b" => cell.get_value().trim().to_lowercase(),
            Some(cell) => cell.get_value().trim().to_string(),
            None => String::new(),
        }
    }

    fn max_row(&self) -> u32 {
        self.get_highest_row()
    }

    fn max_col(&self) -> u32 {
        self.get_highest_column()
    }
}

// ==========================================
// 规则块定位
// ==========================================

/// 规则块表头
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub row: u32,
    pub col: u32,
    pub name: String,
}

fn header_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)RuleTable\s+(\w+)").ok())
        .as_ref()
}

/// 从单元格文本中识别规则块名称；Sort 开头的排序块不算规则块
pub fn parse_block_header(text: &str) -> Option<String> {
    let caps = header_pattern()?.captures(text)?;
    let name = caps.get(1)?.as_str();
    if name.to_lowercase().starts_with("sort") {
        return None;
    }
    Some(name.to_string())
}

/// 扫描整张表，按行号升序返回所有规则块表头
pub fn find_block_headers<G: CellGrid + ?Sized>(grid: &G) -> Vec<BlockHeader> {
    let mut headers = Vec::new();
    for row in 1..=grid.max_row() {
        for col in 1..=grid.max_col() {
            let text = grid.cell_text(row, col);
            if text.is_empty() {
                continue;
            }
            if let Some(name) = parse_block_header(&text) {
                headers.push(BlockHeader { row, col, name });
            }
        }
    }
    headers
}

/// 规则块的数据区 [start, end)
///
/// 从表头 +5 行开始，到第一个全空行（或表尾）为止。
/// 读取与删除使用同一个区间。
pub fn data_range<G: CellGrid + ?Sized>(grid: &G, header_row: u32) -> (u32, u32) {
    let start = header_row + DATA_ROW_OFFSET;
    let mut end = start;
    while end <= grid.max_row() && !grid.is_blank_row(end) {
        end += 1;
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with(cells: &[((u32, u32), &str)]) -> umya_spreadsheet::Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        for ((col, row), value) in cells {
            sheet.get_cell_mut((*col, *row)).set_value(*value);
        }
        book
    }

    #[test]
    fn test_parse_block_header() {
        assert_eq!(parse_block_header("RuleTable AssignableShifts"), Some("AssignableShifts".to_string()));
        assert_eq!(parse_block_header("ruletable EligibleEmployees"), Some("EligibleEmployees".to_string()));
        assert_eq!(parse_block_header("RuleTable SortEmployees"), None);
        assert_eq!(parse_block_header("RuleSet"), None);
    }

    #[test]
    fn test_find_headers_and_data_range() {
        let book = sheet_with(&[
            ((2, 1), "RuleTable AssignableShifts"),
            ((2, 6), "desc"),
            ((2, 7), "desc"),
            ((2, 10), "RuleTable SortShifts"),
            ((2, 12), "RuleTable EligibleEmployees"),
            ((1, 17), "desc"),
        ]);
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();

        let headers = find_block_headers(sheet);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].row, 1);
        assert_eq!(headers[0].name, "AssignableShifts");
        assert_eq!(headers[1].row, 12);

        // 第 8 行为空，数据区为 6..8
        assert_eq!(data_range(sheet, 1), (6, 8));
        // 数据一直延伸到表尾
        assert_eq!(data_range(sheet, 12), (17, 18));
    }
}
