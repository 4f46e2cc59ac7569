// ==========================================
// 俱乐部运营平台 - rotate 策略的类别轮换与选人
// ==========================================
// 纯函数，不访问持久层
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::types::ShiftCategory;
use std::collections::HashMap;

/// 固定轮换: Morning -> Evening -> Mix -> Morning
pub fn next_category(current: ShiftCategory) -> ShiftCategory {
    let rotation = ShiftCategory::ROTATION;
    rotation[(current.rotation_index() + 1) % rotation.len()]
}

/// 计算每个员工本轮的新类别
///
/// 已有类别的员工取其后继；没有类别的员工按列表顺序轮流分配三个类别。
pub fn plan_categories(employees: &[Employee]) -> Vec<(i64, ShiftCategory)> {
    let mut unassigned = 0usize;
    employees
        .iter()
        .map(|e| {
            let category = match e.preferred_shift_type {
                Some(current) => next_category(current),
                None => {
                    let c = ShiftCategory::ROTATION[unassigned % ShiftCategory::ROTATION.len()];
                    unassigned += 1;
                    c
                }
            };
            (e.employee_id, category)
        })
        .collect()
}

// ==========================================
// RotateSlot - rotate 只处理早班/晚班两种模板
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateSlot {
    Morning,
    Evening,
}

impl RotateSlot {
    /// 只服务于该时段的专属类别
    pub fn exclusive_category(&self) -> ShiftCategory {
        match self {
            RotateSlot::Morning => ShiftCategory::Morning,
            RotateSlot::Evening => ShiftCategory::Evening,
        }
    }

    pub fn accepts(&self, category: ShiftCategory) -> bool {
        category == ShiftCategory::Mix || category == self.exclusive_category()
    }
}

// ==========================================
// RotationPools - 按新类别分组的员工
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct RotationPools {
    by_category: HashMap<ShiftCategory, Vec<i64>>,
}

impl RotationPools {
    /// 组内保持员工列表顺序
    pub fn from_plan(plan: &[(i64, ShiftCategory)]) -> Self {
        let mut by_category: HashMap<ShiftCategory, Vec<i64>> = HashMap::new();
        for (employee_id, category) in plan {
            by_category.entry(*category).or_default().push(*employee_id);
        }
        Self { by_category }
    }

    pub fn pool(&self, category: ShiftCategory) -> &[i64] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 为一个班次实例选人
    ///
    /// # 参数
    /// - slot: 早班/晚班
    /// - instance_index: 该时段已处理的实例数（从 0 开始）
    /// - cutoff: 前 cutoff 个实例优先专属类别，之后优先 Mix
    /// - counts: 每个员工当前已分配次数
    /// - limit: 最多选取人数
    /// - taken: 判断 (员工) 是否已占用该实例
    ///
    /// 组内按负载升序（同负载保持列表顺序），首选组不足时由另一组补齐。
    pub fn pick(
        &self,
        slot: RotateSlot,
        instance_index: usize,
        cutoff: usize,
        counts: &HashMap<i64, usize>,
        limit: usize,
        taken: impl Fn(i64) -> bool,
    ) -> Vec<i64> {
        let exclusive = self.pool(slot.exclusive_category());
        let mix = self.pool(ShiftCategory::Mix);
        let (preferred, fallback) = if instance_index < cutoff {
            (exclusive, mix)
        } else {
            (mix, exclusive)
        };

        let mut picked = Vec::with_capacity(limit);
        for pool in [preferred, fallback] {
            let mut ordered = pool.to_vec();
            ordered.sort_by_key(|id| counts.get(id).copied().unwrap_or(0));
            for id in ordered {
                if picked.len() >= limit {
                    return picked;
                }
                if !taken(id) && !picked.contains(&id) {
                    picked.push(id);
                }
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::EmploymentType;

    #[test]
    fn test_next_category_cycles_in_three_steps() {
        let mut c = ShiftCategory::Morning;
        c = next_category(c);
        assert_eq!(c, ShiftCategory::Evening);
        c = next_category(c);
        assert_eq!(c, ShiftCategory::Mix);
        c = next_category(c);
        assert_eq!(c, ShiftCategory::Morning);
    }

    #[test]
    fn test_plan_categories_round_robin_for_unset() {
        let employees = vec![
            Employee::new(2, "A", EmploymentType::FullTime),
            Employee::new(3, "B", EmploymentType::FullTime).with_preferred(ShiftCategory::Mix),
            Employee::new(4, "C", EmploymentType::FullTime),
            Employee::new(5, "D", EmploymentType::FullTime),
            Employee::new(6, "E", EmploymentType::FullTime),
        ];

        let plan = plan_categories(&employees);
        assert_eq!(
            plan,
            vec![
                (2, ShiftCategory::Morning),
                (3, ShiftCategory::Morning),
                (4, ShiftCategory::Evening),
                (5, ShiftCategory::Mix),
                (6, ShiftCategory::Morning),
            ]
        );
    }

    #[test]
    fn test_slot_acceptance() {
        assert!(RotateSlot::Morning.accepts(ShiftCategory::Mix));
        assert!(RotateSlot::Morning.accepts(ShiftCategory::Morning));
        assert!(!RotateSlot::Morning.accepts(ShiftCategory::Evening));
        assert!(RotateSlot::Evening.accepts(ShiftCategory::Evening));
    }

    #[test]
    fn test_pick_prefers_exclusive_before_cutoff_then_mix() {
        let plan = vec![
            (10, ShiftCategory::Morning),
            (11, ShiftCategory::Mix),
            (12, ShiftCategory::Evening),
        ];
        let pools = RotationPools::from_plan(&plan);
        let counts = HashMap::new();

        assert_eq!(pools.pick(RotateSlot::Morning, 0, 5, &counts, 1, |_| false), vec![10]);
        assert_eq!(pools.pick(RotateSlot::Morning, 5, 5, &counts, 1, |_| false), vec![11]);
        assert_eq!(pools.pick(RotateSlot::Evening, 0, 5, &counts, 1, |_| false), vec![12]);
    }

    #[test]
    fn test_pick_least_loaded_and_top_up() {
        let plan = vec![
            (10, ShiftCategory::Morning),
            (11, ShiftCategory::Morning),
            (20, ShiftCategory::Mix),
        ];
        let pools = RotationPools::from_plan(&plan);
        let counts: HashMap<i64, usize> = [(10, 2), (11, 0)].into_iter().collect();

        // 负载低者优先
        assert_eq!(pools.pick(RotateSlot::Morning, 0, 5, &counts, 1, |_| false), vec![11]);
        // 专属组不足时由 Mix 补齐
        assert_eq!(
            pools.pick(RotateSlot::Morning, 0, 5, &counts, 3, |_| false),
            vec![11, 10, 20]
        );
        // 已占用的员工跳过
        assert_eq!(pools.pick(RotateSlot::Morning, 0, 5, &counts, 1, |id| id == 11), vec![10]);
        // 晚班没有专属员工，只能由 Mix 承担
        assert_eq!(pools.pick(RotateSlot::Evening, 0, 5, &counts, 2, |_| false), vec![20]);
    }
}
