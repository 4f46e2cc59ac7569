// ==========================================
// 俱乐部运营平台 - 规则块列结构
// ==========================================
// 列布局（从 1 开始）:
//   1            description
//   2            ruleName
//   3..=subEnd   sub:*        (subEnd  = 2 + |sub|)
//   ..=condEnd   condition:*  (condEnd = subEnd + |condition|)
//   ..=actEnd    action:*     (actEnd  = condEnd + |action|)
// 列名来自表头下方第 4 行的元数据行，每次加载解析一次，读写共用。
// ==========================================

use crate::decision_table::grid::{BlockHeader, CellGrid, DATA_ROW_OFFSET, METADATA_ROW_OFFSET};
use crate::domain::rule::{Rule, RuleAction, RuleCondition, RuleType, SubObject};

/// 列号对应的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Description,
    RuleName,
    Sub(usize),
    Condition(usize),
    Action(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlockSchema {
    pub header_row: u32,
    pub block_name: String,
    pub rule_type: Option<RuleType>,
    pub sub_names: Vec<String>,
    pub condition_names: Vec<String>,
    pub action_names: Vec<String>,
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(text[prefix.len()..].trim())
    } else {
        None
    }
}

impl RuleBlockSchema {
    /// 读取元数据行，按声明顺序收集 sub/condition/action 列名
    pub fn resolve<G: CellGrid + ?Sized>(grid: &G, header: &BlockHeader) -> Self {
        let metadata_row = header.row + METADATA_ROW_OFFSET;
        let mut sub_names = Vec::new();
        let mut condition_names = Vec::new();
        let mut action_names = Vec::new();

        for col in 1..=grid.max_col() {
            let text = grid.cell_text(metadata_row, col);
            if let Some(name) = strip_prefix_ci(&text, "sub:") {
                sub_names.push(name.to_string());
            } else if let Some(name) = strip_prefix_ci(&text, "condition:") {
                condition_names.push(name.to_string());
            } else if let Some(name) = strip_prefix_ci(&text, "action:") {
                action_names.push(name.to_string());
            }
        }

        Self {
            header_row: header.row,
            block_name: header.name.clone(),
            rule_type: RuleType::from_block_name(&header.name),
            sub_names,
            condition_names,
            action_names,
        }
    }

    pub fn data_start(&self) -> u32 {
        self.header_row + DATA_ROW_OFFSET
    }

    pub fn sub_end(&self) -> u32 {
        2 + self.sub_names.len() as u32
    }

    pub fn condition_end(&self) -> u32 {
        self.sub_end() + self.condition_names.len() as u32
    }

    pub fn action_end(&self) -> u32 {
        self.condition_end() + self.action_names.len() as u32
    }

    pub fn column_field(&self, col: u32) -> Option<ColumnField> {
        match col {
            0 => None,
            1 => Some(ColumnField::Description),
            2 => Some(ColumnField::RuleName),
            c if c <= self.sub_end() => Some(ColumnField::Sub((c - 3) as usize)),
            c if c <= self.condition_end() => {
                Some(ColumnField::Condition((c - self.sub_end() - 1) as usize))
            }
            c if c <= self.action_end() => {
                Some(ColumnField::Action((c - self.condition_end() - 1) as usize))
            }
            _ => None,
        }
    }

    /// 把一行数据映射为规则对象（超出 actEnd 的列忽略）
    pub fn row_to_rule<G: CellGrid + ?Sized>(&self, grid: &G, row: u32, rule_type: RuleType) -> Rule {
        let mut rule = Rule::new("", rule_type);
        for col in 1..=self.action_end() {
            let value = grid.cell_text(row, col);
            match self.column_field(col) {
                Some(ColumnField::Description) => rule.description = value,
                Some(ColumnField::RuleName) => rule.rule_name = value,
                Some(ColumnField::Sub(i)) => rule.sub_objects.push(SubObject {
                    name: self.sub_names.get(i).cloned().unwrap_or_default(),
                    value,
                }),
                Some(ColumnField::Condition(i)) => rule.conditions.push(RuleCondition {
                    name: self.condition_names.get(i).cloned().unwrap_or_default(),
                    value,
                }),
                Some(ColumnField::Action(i)) => rule.actions.push(RuleAction {
                    name: self.action_names.get(i).cloned().unwrap_or_default(),
                    value,
                }),
                None => {}
            }
        }
        rule
    }

    /// 把规则对象转换为按列排列的写入值
    ///
    /// 不含预留的子对象占位列与末尾的规则族标记，二者由写入器补齐。
    pub fn positional_cols(&self, rule: &Rule) -> Vec<String> {
        let reserved = rule.rule_type.reserved_sub_columns();
        let mut cols = vec![rule.description.clone(), rule.rule_name.clone()];

        for name in self.sub_names.iter().skip(reserved) {
            let value = rule
                .sub_objects
                .iter()
                .find(|s| &s.name == name)
                .map(|s| s.value.clone())
                .unwrap_or_default();
            cols.push(value);
        }
        for name in &self.condition_names {
            cols.push(rule.condition_value(name).unwrap_or("").to_string());
        }
        for name in &self.action_names {
            cols.push(rule.action_value(name).unwrap_or("").to_string());
        }
        cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee_block() -> umya_spreadsheet::Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((2, 2)).set_value("RuleTable EligibleEmployees");
        sheet.get_cell_mut((1, 6)).set_value("说明");
        sheet.get_cell_mut((3, 6)).set_value("sub:employee");
        sheet.get_cell_mut((4, 6)).set_value("sub:shift");
        sheet.get_cell_mut((5, 6)).set_value("condition:assignedShiftInDay");
        sheet.get_cell_mut((6, 6)).set_value("condition:isAssigned");
        sheet.get_cell_mut((7, 6)).set_value("action:setEligible");
        // 数据行
        sheet.get_cell_mut((1, 7)).set_value("first");
        sheet.get_cell_mut((2, 7)).set_value("E1");
        sheet.get_cell_mut((3, 7)).set_value("-");
        sheet.get_cell_mut((4, 7)).set_value("-");
        sheet.get_cell_mut((5, 7)).set_value("< 2");
        sheet.get_cell_mut((7, 7)).set_value("true");
        sheet.get_cell_mut((9, 7)).set_value("EmployeeRule");
        book
    }

    #[test]
    fn test_resolve_boundaries() {
        let book = employee_block();
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        let header = BlockHeader {
            row: 2,
            col: 2,
            name: "EligibleEmployees".to_string(),
        };
        let schema = RuleBlockSchema::resolve(sheet, &header);

        assert_eq!(schema.rule_type, Some(RuleType::Employee));
        assert_eq!(schema.sub_names, vec!["employee", "shift"]);
        assert_eq!(schema.condition_names, vec!["assignedShiftInDay", "isAssigned"]);
        assert_eq!(schema.action_names, vec!["setEligible"]);
        assert_eq!((schema.sub_end(), schema.condition_end(), schema.action_end()), (4, 6, 7));
        assert_eq!(schema.data_start(), 7);
        assert_eq!(schema.column_field(4), Some(ColumnField::Sub(1)));
        assert_eq!(schema.column_field(5), Some(ColumnField::Condition(0)));
        assert_eq!(schema.column_field(7), Some(ColumnField::Action(0)));
        assert_eq!(schema.column_field(9), None);
    }

    #[test]
    fn test_row_to_rule_and_back() {
        let book = employee_block();
        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        let header = BlockHeader {
            row: 2,
            col: 2,
            name: "EligibleEmployees".to_string(),
        };
        let schema = RuleBlockSchema::resolve(sheet, &header);

        let rule = schema.row_to_rule(sheet, 7, RuleType::Employee);
        assert_eq!(rule.rule_name, "E1");
        assert_eq!(rule.description, "first");
        assert_eq!(rule.sub_objects.len(), 2);
        assert_eq!(rule.condition_value("assignedShiftInDay"), Some("< 2"));
        assert_eq!(rule.condition_value("isAssigned"), Some(""));
        assert_eq!(rule.action_value("setEligible"), Some("true"));

        // 预留的两列子对象不出现在写入值中
        assert_eq!(schema.positional_cols(&rule), vec!["first", "E1", "< 2", "", "true"]);
    }
}
