// ==========================================
// 俱乐部运营平台 - 全职排班策略定义
// ==========================================
// same   : 复制本周排班到下周
// rotate : 按班次类别轮换 (Morning -> Evening -> Mix)
// random : 随机顺序 + 最少负载优先
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FullTimeStrategy {
    Same,
    Rotate,
    Random,
}

impl FullTimeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FullTimeStrategy::Same => "same",
            FullTimeStrategy::Rotate => "rotate",
            FullTimeStrategy::Random => "random",
        }
    }
}

impl std::fmt::Display for FullTimeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for FullTimeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "same" => Ok(FullTimeStrategy::Same),
            "rotate" => Ok(FullTimeStrategy::Rotate),
            "random" => Ok(FullTimeStrategy::Random),
            other => Err(format!("未知排班策略: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names_dispatch_to_themselves() {
        for strategy in [FullTimeStrategy::Same, FullTimeStrategy::Rotate, FullTimeStrategy::Random] {
            assert_eq!(strategy.as_str().parse::<FullTimeStrategy>(), Ok(strategy));
        }
        assert_eq!(" ROTATE ".parse::<FullTimeStrategy>(), Ok(FullTimeStrategy::Rotate));
        assert!("balanced".parse::<FullTimeStrategy>().is_err());
    }
}
