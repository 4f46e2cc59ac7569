// ==========================================
// 俱乐部运营平台 - 领域类型定义
// ==========================================
// 职责: 排班子系统共用的枚举与状态标签
// 存储: 与数据库中的字符串口径保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 雇佣类型 (Employment Type)
// ==========================================
// 员工与班次模板共用同一口径: Full-time / Part-time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentType {
    #[serde(rename = "Full-time")]
    FullTime, // 全职
    #[serde(rename = "Part-time")]
    PartTime, // 兼职
}

impl EmploymentType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
        }
    }

    /// 从数据库字符串解析，未知值按兼职处理
    pub fn from_db_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "full-time" | "fulltime" | "full_time" => EmploymentType::FullTime,
            _ => EmploymentType::PartTime,
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_db_str())
    }
}

// ==========================================
// 班次类别 (Shift Category)
// ==========================================
// 仅 rotate 策略使用
// Morning 只排早班, Evening 只排晚班, Mix 两者皆可
// 轮换顺序: Morning -> Evening -> Mix -> Morning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftCategory {
    Morning,
    Evening,
    Mix,
}

impl ShiftCategory {
    /// 固定轮换顺序
    pub const ROTATION: [ShiftCategory; 3] =
        [ShiftCategory::Morning, ShiftCategory::Evening, ShiftCategory::Mix];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftCategory::Morning => "Morning",
            ShiftCategory::Evening => "Evening",
            ShiftCategory::Mix => "Mix",
        }
    }

    /// 在轮换顺序中的下标
    pub fn rotation_index(&self) -> usize {
        match self {
            ShiftCategory::Morning => 0,
            ShiftCategory::Evening => 1,
            ShiftCategory::Mix => 2,
        }
    }
}

impl fmt::Display for ShiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ShiftCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Ok(ShiftCategory::Morning),
            "evening" => Ok(ShiftCategory::Evening),
            "mix" => Ok(ShiftCategory::Mix),
            other => Err(format!("未知班次类别: {}", other)),
        }
    }
}

// ==========================================
// 排班状态标签 (Assignment Status)
// ==========================================
// 自动排班写入的记录一律为 approved
pub const ASSIGNMENT_STATUS_APPROVED: &str = "approved";

// ==========================================
// 报名状态 (Enrollment Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    #[serde(rename = "assigned")]
    Assigned, // 已分配
    #[serde(rename = "not assigned")]
    NotAssigned, // 未分配
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Assigned => "assigned",
            EnrollmentStatus::NotAssigned => "not assigned",
        }
    }

    /// 判断数据库中的原始标签是否已经是该状态
    pub fn matches(&self, raw: Option<&str>) -> bool {
        raw.map(|s| s.trim().eq_ignore_ascii_case(self.as_str()))
            .unwrap_or(false)
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
