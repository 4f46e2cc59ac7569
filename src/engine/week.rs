// ==========================================
// 俱乐部运营平台 - 周窗口计算
// ==========================================
// 下周 = 从下一个周一开始的周一~周日
// 今天是周日: 距周一 1 天；否则 8 - 周几（周一=1）
// ==========================================

use crate::domain::assignment::WeekWindow;
use chrono::{Datelike, Duration, NaiveDate};

/// 相对 today 的下一周
pub fn next_week(today: NaiveDate) -> WeekWindow {
    let weekday = today.weekday().number_from_monday() as i64; // 1..=7
    let days_to_monday = if weekday == 7 { 1 } else { 8 - weekday };
    WeekWindow::starting(today + Duration::days(days_to_monday))
}

/// 本周（下周整体前移 7 天）
pub fn current_week(today: NaiveDate) -> WeekWindow {
    next_week(today).shifted(-7)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_week_from_every_weekday() {
        // 2026-10-12 是周一
        for offset in 0..7 {
            let today = date(2026, 10, 12) + Duration::days(offset);
            let week = next_week(today);
            assert_eq!(week.start, date(2026, 10, 19), "today={}", today);
            assert_eq!(week.start.weekday(), Weekday::Mon);
            assert_eq!(week.end, date(2026, 10, 25));
        }
    }

    #[test]
    fn test_sunday_rolls_to_tomorrow() {
        let sunday = date(2026, 10, 18);
        assert_eq!(next_week(sunday).start, date(2026, 10, 19));
    }

    #[test]
    fn test_current_week_contains_today() {
        let today = date(2026, 10, 14);
        let week = current_week(today);
        assert!(week.contains(today));
        assert_eq!(week.start, date(2026, 10, 12));
    }
}
