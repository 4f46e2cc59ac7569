// ==========================================
// 俱乐部运营平台 - 分配规则领域模型
// ==========================================
// 职责: 规则对象、主体类型与条件/动作词汇表
// 消费方: 规则编辑 API、决策表存储
// ==========================================
// 约定:
// - 每条规则的条件列表对其主体类型的词汇表"一项一槽"
// - 空值表示"未配置/已删除"，不是"不存在"
// - 数值条件存储为 "<比较符> <数字>"，布尔条件存储为 "true"/"false"
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// RuleType - 规则主体类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleType {
    Employee,
    EnrollmentEmployee,
    Shift,
    EnrollmentShift,
}

impl RuleType {
    pub const ALL: [RuleType; 4] = [
        RuleType::Employee,
        RuleType::EnrollmentEmployee,
        RuleType::Shift,
        RuleType::EnrollmentShift,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleType::Employee => "employee",
            RuleType::EnrollmentEmployee => "enrollmentEmployee",
            RuleType::Shift => "shift",
            RuleType::EnrollmentShift => "enrollmentShift",
        }
    }

    /// 决策表中对应的 RuleTable 名称
    pub fn block_name(&self) -> &'static str {
        match self {
            RuleType::Employee => "EligibleEmployees",
            RuleType::EnrollmentEmployee => "EligibleEnrollmentEmployees",
            RuleType::Shift => "AssignableShifts",
            RuleType::EnrollmentShift => "AssignableEnrollmentShifts",
        }
    }

    /// 从 RuleTable 名称反查主体类型（大小写不敏感）
    pub fn from_block_name(name: &str) -> Option<Self> {
        let name = name.trim();
        RuleType::ALL
            .into_iter()
            .find(|t| t.block_name().eq_ignore_ascii_case(name))
    }

    /// 写入行末尾的规则族标记
    pub fn family_marker(&self) -> &'static str {
        match self {
            RuleType::Employee => "EmployeeRule",
            RuleType::EnrollmentEmployee => "EnrollmentEmployeeRule",
            RuleType::Shift => "ShiftRule",
            RuleType::EnrollmentShift => "EnrollmentShiftRule",
        }
    }

    /// 员工类规则块预留的子对象列数
    pub fn reserved_sub_columns(&self) -> usize {
        if self.is_employee_like() {
            2
        } else {
            0
        }
    }

    pub fn is_employee_like(&self) -> bool {
        matches!(self, RuleType::Employee | RuleType::EnrollmentEmployee)
    }

    /// 条件词汇表（顺序即槽位顺序）
    pub fn condition_vocabulary(&self) -> &'static [ConditionSpec] {
        match self {
            RuleType::Employee => EMPLOYEE_CONDITIONS,
            RuleType::EnrollmentEmployee => ENROLLMENT_EMPLOYEE_CONDITIONS,
            RuleType::Shift => SHIFT_CONDITIONS,
            RuleType::EnrollmentShift => ENROLLMENT_SHIFT_CONDITIONS,
        }
    }

    /// 动作词汇表（每种主体只有一个布尔动作）
    pub fn action_vocabulary(&self) -> &'static [&'static str] {
        if self.is_employee_like() {
            &["setEligible"]
        } else {
            &["setAssignable"]
        }
    }

    pub fn condition_spec(&self, name: &str) -> Option<&'static ConditionSpec> {
        self.condition_vocabulary().iter().find(|c| c.name == name)
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RuleType {
    type Err = RuleValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "employee" => Ok(RuleType::Employee),
            "enrollmentemployee" => Ok(RuleType::EnrollmentEmployee),
            "shift" => Ok(RuleType::Shift),
            "enrollmentshift" => Ok(RuleType::EnrollmentShift),
            _ => Err(RuleValidationError::UnknownRuleType(s.to_string())),
        }
    }
}

// ==========================================
// 条件词汇表
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionKind {
    Numeric, // 比较符 + 数字
    Boolean, // true / false
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionSpec {
    pub name: &'static str,
    pub kind: ConditionKind,
}

const fn numeric(name: &'static str) -> ConditionSpec {
    ConditionSpec {
        name,
        kind: ConditionKind::Numeric,
    }
}

const fn boolean(name: &'static str) -> ConditionSpec {
    ConditionSpec {
        name,
        kind: ConditionKind::Boolean,
    }
}

const EMPLOYEE_CONDITIONS: &[ConditionSpec] = &[
    numeric("assignedShiftInDay"),
    numeric("assignedShiftInWeek"),
    boolean("isEligible"),
    boolean("isAssigned"),
];

const ENROLLMENT_EMPLOYEE_CONDITIONS: &[ConditionSpec] = &[
    numeric("assignedShiftInDay"),
    numeric("assignedShiftInWeek"),
    boolean("isEligible"),
    boolean("isAssigned"),
    boolean("isEnrolled"),
];

const SHIFT_CONDITIONS: &[ConditionSpec] = &[numeric("assignedEmployees"), boolean("isAssignable")];

const ENROLLMENT_SHIFT_CONDITIONS: &[ConditionSpec] = &[
    numeric("assignedEmployees"),
    boolean("isAssignable"),
    boolean("isEnrolled"),
];

/// 条件的展示名称（编辑界面使用）
pub fn condition_label(name: &str) -> &str {
    match name {
        "assignedEmployees" => "已分配员工数",
        "assignedShiftInDay" => "当日已分配班次数",
        "assignedShiftInWeek" => "本周已分配班次数",
        "isAssigned" => "已被分配",
        "isAssignable" | "isEligible" => "可分配",
        "isEnrolled" => "已有员工报名",
        other => other,
    }
}

/// 动作的展示名称
pub fn action_label(name: &str) -> &str {
    match name {
        "setEligible" | "setAssignable" => "可分配",
        other => other,
    }
}

// ==========================================
// Comparator / ConditionValue - 条件取值
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Gt,
    Eq,
    Ne,
    Le,
    Ge,
}

impl Comparator {
    /// 双字符比较符必须排在单字符之前匹配
    const TOKENS: [(&'static str, Comparator); 6] = [
        ("<=", Comparator::Le),
        (">=", Comparator::Ge),
        ("==", Comparator::Eq),
        ("!=", Comparator::Ne),
        ("<", Comparator::Lt),
        (">", Comparator::Gt),
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Comparator::Lt => "<",
            Comparator::Gt => ">",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionValue {
    Unset,
    Numeric { comparator: Comparator, value: f64 },
    Boolean(bool),
}

impl ConditionValue {
    /// 按条件类型解析原始字符串
    pub fn parse(raw: &str, kind: ConditionKind) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(ConditionValue::Unset);
        }

        match kind {
            ConditionKind::Boolean => parse_bool(raw)
                .map(ConditionValue::Boolean)
                .ok_or_else(|| format!("期望 true/false，实际 {}", raw)),
            ConditionKind::Numeric => {
                let (comparator, rest) = Comparator::TOKENS
                    .iter()
                    .find_map(|(token, cmp)| raw.strip_prefix(token).map(|rest| (*cmp, rest)))
                    .ok_or_else(|| format!("缺少比较符: {}", raw))?;
                let value = rest
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| format!("比较值不是数字: {}", raw))?;
                Ok(ConditionValue::Numeric { comparator, value })
            }
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, ConditionValue::Unset)
    }
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Unset => Ok(()),
            ConditionValue::Boolean(b) => write!(f, "{}", b),
            ConditionValue::Numeric { comparator, value } => {
                if value.fract() == 0.0 && value.abs() < 1e15 {
                    write!(f, "{} {}", comparator.token(), *value as i64)
                } else {
                    write!(f, "{} {}", comparator.token(), value)
                }
            }
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// ==========================================
// Rule - 规则对象
// ==========================================
// 序列化字段名与规则编辑界面保持一致

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubObject {
    #[serde(rename = "subObjName")]
    pub name: String,
    #[serde(rename = "subObjValue")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCondition {
    #[serde(rename = "conditionName")]
    pub name: String,
    #[serde(rename = "conditionValue")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleAction {
    #[serde(rename = "actionName")]
    pub name: String,
    #[serde(rename = "actionValue")]
    pub value: String,
}

impl RuleCondition {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

impl RuleAction {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub rule_name: String,
    pub rule_type: RuleType,
    #[serde(rename = "ruleDescription", default)]
    pub description: String,
    #[serde(rename = "subObj", default)]
    pub sub_objects: Vec<SubObject>,
    #[serde(default)]
    pub conditions: Vec<RuleCondition>,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
}

impl Rule {
    pub fn new(rule_name: &str, rule_type: RuleType) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            rule_type,
            description: String::new(),
            sub_objects: Vec::new(),
            conditions: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_condition(mut self, name: &str, value: &str) -> Self {
        self.conditions.push(RuleCondition::new(name, value));
        self
    }

    pub fn with_action(mut self, name: &str, value: &str) -> Self {
        self.actions.push(RuleAction::new(name, value));
        self
    }

    pub fn condition_value(&self, name: &str) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    pub fn action_value(&self, name: &str) -> Option<&str> {
        self.actions
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// 补齐词汇表槽位，按词汇表顺序排列，保留已有取值
    pub fn normalized(mut self) -> Self {
        let conditions = self
            .rule_type
            .condition_vocabulary()
            .iter()
            .map(|spec| RuleCondition::new(spec.name, self.condition_value(spec.name).unwrap_or("")))
            .collect();
        let actions = self
            .rule_type
            .action_vocabulary()
            .iter()
            .map(|name| RuleAction::new(name, self.action_value(name).unwrap_or("")))
            .collect();
        self.conditions = conditions;
        self.actions = actions;
        self
    }

    /// 清空某个条件（保留槽位）
    pub fn clear_condition(&mut self, name: &str) -> Result<(), RuleValidationError> {
        if self.rule_type.condition_spec(name).is_none() {
            return Err(RuleValidationError::UnknownCondition {
                rule_type: self.rule_type,
                name: name.to_string(),
            });
        }
        match self.conditions.iter_mut().find(|c| c.name == name) {
            Some(slot) => slot.value.clear(),
            None => self.conditions.push(RuleCondition::new(name, "")),
        }
        Ok(())
    }

    /// 校验规则名称、条件与动作
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if self.rule_name.trim().is_empty() {
            return Err(RuleValidationError::MissingField("ruleName".to_string()));
        }

        for condition in &self.conditions {
            let spec = self.rule_type.condition_spec(&condition.name).ok_or_else(|| {
                RuleValidationError::UnknownCondition {
                    rule_type: self.rule_type,
                    name: condition.name.clone(),
                }
            })?;
            ConditionValue::parse(&condition.value, spec.kind).map_err(|reason| {
                RuleValidationError::InvalidValue {
                    field: condition.name.clone(),
                    reason,
                }
            })?;
        }

        for action in &self.actions {
            if !self.rule_type.action_vocabulary().contains(&action.name.as_str()) {
                return Err(RuleValidationError::UnknownAction {
                    rule_type: self.rule_type,
                    name: action.name.clone(),
                });
            }
            if !action.value.trim().is_empty() && parse_bool(action.value.trim()).is_none() {
                return Err(RuleValidationError::InvalidValue {
                    field: action.name.clone(),
                    reason: format!("期望 true/false，实际 {}", action.value),
                });
            }
        }

        Ok(())
    }
}

// ==========================================
// RuleSet - 规则集合（编辑约束）
// ==========================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn into_rules(self) -> Vec<Rule> {
        self.rules
    }

    pub fn find(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.rule_name == name)
    }

    /// 新建规则，名称必须全局唯一
    pub fn create(&mut self, rule: Rule) -> Result<(), RuleValidationError> {
        rule.validate()?;
        if self.find(&rule.rule_name).is_some() {
            return Err(RuleValidationError::DuplicateName(rule.rule_name));
        }
        self.rules.push(rule.normalized());
        Ok(())
    }

    /// 编辑规则：同名替换允许，改名到另一条已有规则的名称则拒绝
    pub fn update(&mut self, original_name: &str, rule: Rule) -> Result<(), RuleValidationError> {
        rule.validate()?;
        let index = self
            .rules
            .iter()
            .position(|r| r.rule_name == original_name)
            .ok_or_else(|| RuleValidationError::NotFound(original_name.to_string()))?;

        if rule.rule_name != original_name && self.find(&rule.rule_name).is_some() {
            return Err(RuleValidationError::DuplicateName(rule.rule_name));
        }

        self.rules[index] = rule.normalized();
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<Rule, RuleValidationError> {
        let index = self
            .rules
            .iter()
            .position(|r| r.rule_name == name)
            .ok_or_else(|| RuleValidationError::NotFound(name.to_string()))?;
        Ok(self.rules.remove(index))
    }
}

// ==========================================
// RuleValidationError - 规则校验错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleValidationError {
    #[error("规则名称已存在: {0}")]
    DuplicateName(String),

    #[error("规则不存在: {0}")]
    NotFound(String),

    #[error("未知规则类型: {0}")]
    UnknownRuleType(String),

    #[error("规则类型 {rule_type} 不支持条件 {name}")]
    UnknownCondition { rule_type: RuleType, name: String },

    #[error("规则类型 {rule_type} 不支持动作 {name}")]
    UnknownAction { rule_type: RuleType, name: String },

    #[error("字段 {field} 取值非法: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("缺少必填字段: {0}")]
    MissingField(String),
}
