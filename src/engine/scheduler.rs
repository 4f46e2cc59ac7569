// ==========================================
// 俱乐部运营平台 - 全职排班引擎
// ==========================================
// 流程:
// 1. 计算下周窗口
// 2. 读取全职员工（排除系统账号）与下周全职班次实例
// 3. 删除下周已有的全职排班（整体覆盖，不做增量）
// 4. 按策略计算新排班并写入
// 5. rotate 成功后回写员工的新类别
// ==========================================

use crate::config::{AssignmentConfigReader, ConfigResult};
use crate::config::defaults;
use crate::domain::assignment::{ShiftAssignment, SlotKey, WeekWindow};
use crate::domain::employee::{Employee, ShiftDateInstance};
use crate::domain::types::{EmploymentType, ShiftCategory, ASSIGNMENT_STATUS_APPROVED};
use crate::engine::error::{SchedulingError, SchedulingResult};
use crate::engine::rotation::{plan_categories, RotateSlot, RotationPools};
use crate::engine::strategy::FullTimeStrategy;
use crate::engine::week::{current_week, next_week};
use crate::repository::gateway::ShiftDataGateway;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, warn};

// ==========================================
// SchedulerSettings - 部署相关常量
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    pub system_employee_id: i64,
    pub morning_shift_id: i64,
    pub evening_shift_id: i64,
    pub exclusive_cutoff: usize,
    pub seed: Option<u64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            system_employee_id: defaults::SYSTEM_EMPLOYEE_ID,
            morning_shift_id: defaults::ROTATE_MORNING_SHIFT_ID,
            evening_shift_id: defaults::ROTATE_EVENING_SHIFT_ID,
            exclusive_cutoff: defaults::ROTATE_EXCLUSIVE_CUTOFF,
            seed: None,
        }
    }
}

impl SchedulerSettings {
    pub async fn from_config(config: &dyn AssignmentConfigReader) -> ConfigResult<Self> {
        let (morning_shift_id, evening_shift_id) = config.get_rotate_shift_ids().await?;
        Ok(Self {
            system_employee_id: config.get_system_employee_id().await?,
            morning_shift_id,
            evening_shift_id,
            exclusive_cutoff: config.get_rotate_exclusive_cutoff().await?,
            seed: config.get_random_seed().await?,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rotate_slot(&self, shift_id: i64) -> Option<RotateSlot> {
        if shift_id == self.morning_shift_id {
            Some(RotateSlot::Morning)
        } else if shift_id == self.evening_shift_id {
            Some(RotateSlot::Evening)
        } else {
            None
        }
    }
}

// ==========================================
// FullTimeAssignmentReport - 排班结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullTimeAssignmentReport {
    pub strategy: FullTimeStrategy,
    pub week: WeekWindow,
    pub deleted: usize,
    pub created: usize,
    pub categories_updated: usize,
    pub seed: Option<u64>,
    pub assignments: Vec<ShiftAssignment>,
}

// ==========================================
// FullTimeScheduler - 全职排班引擎
// ==========================================
pub struct FullTimeScheduler {
    gateway: Arc<dyn ShiftDataGateway>,
    settings: SchedulerSettings,
}

/// 策略计算结果（写库前）
struct StrategyOutput {
    assignments: Vec<ShiftAssignment>,
    categories: Vec<(i64, ShiftCategory)>,
    seed: Option<u64>,
}

impl FullTimeScheduler {
    pub fn new(gateway: Arc<dyn ShiftDataGateway>, settings: SchedulerSettings) -> Self {
        Self { gateway, settings }
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// 为下周计算并写入全职排班
    ///
    /// # 参数
    /// - strategy: same / rotate / random
    /// - max_employees_per_shift: 每个班次实例最多人数，必须 > 0
    /// - today: 当前日期（决定“下周”）
    pub fn assign_full_time(
        &self,
        strategy: FullTimeStrategy,
        max_employees_per_shift: usize,
        today: NaiveDate,
    ) -> SchedulingResult<FullTimeAssignmentReport> {
        if max_employees_per_shift == 0 {
            return Err(SchedulingError::InvalidArgument(
                "maxEmployeesPerShift 必须大于 0".to_string(),
            ));
        }

        let week = next_week(today);
        info!(
            strategy = %strategy,
            week_start = %week.start,
            week_end = %week.end,
            max_employees_per_shift,
            "开始全职排班"
        );

        let employees = self
            .gateway
            .list_full_time_employees(self.settings.system_employee_id)?;
        if employees.is_empty() {
            return Err(SchedulingError::NotFound("没有可排班的全职员工".to_string()));
        }

        let instances = self
            .gateway
            .list_shift_instances(&week, EmploymentType::FullTime)?;
        if instances.is_empty() {
            return Err(SchedulingError::NotFound(format!(
                "下周 ({} ~ {}) 没有全职班次实例",
                week.start, week.end
            )));
        }

        let deleted = self.gateway.delete_assignments(&week, EmploymentType::FullTime)?;
        debug!(deleted, "已清除下周全职排班");

        let output = match strategy {
            FullTimeStrategy::Same => self.assign_same(today)?,
            FullTimeStrategy::Random => {
                self.assign_random(&employees, &instances, max_employees_per_shift)?
            }
            FullTimeStrategy::Rotate => {
                self.assign_rotate(&employees, &instances, max_employees_per_shift)?
            }
        };

        let created = self.gateway.insert_assignments(&output.assignments)?;
        let categories_updated = if output.categories.is_empty() {
            0
        } else {
            self.gateway.update_preferred_categories(&output.categories)?
        };

        info!(
            strategy = %strategy,
            deleted,
            created,
            categories_updated,
            seed = ?output.seed,
            "全职排班完成"
        );

        Ok(FullTimeAssignmentReport {
            strategy,
            week,
            deleted,
            created,
            categories_updated,
            seed: output.seed,
            assignments: output.assignments,
        })
    }

    // ==========================================
    // same: 本周排班平移 7 天
    // ==========================================
    fn assign_same(&self, today: NaiveDate) -> SchedulingResult<StrategyOutput> {
        let week = current_week(today);
        let previous = self
            .gateway
            .list_assignments(&week, Some(EmploymentType::FullTime))?;
        if previous.is_empty() {
            return Err(SchedulingError::Precondition(format!(
                "本周 ({} ~ {}) 没有排班记录可复制",
                week.start, week.end
            )));
        }

        let assignments = previous
            .iter()
            .map(|a| {
                ShiftAssignment::new(
                    a.employee_id,
                    a.shift_id,
                    a.shift_date + Duration::days(7),
                    ASSIGNMENT_STATUS_APPROVED,
                )
            })
            .collect();

        Ok(StrategyOutput {
            assignments,
            categories: Vec::new(),
            seed: None,
        })
    }

    // ==========================================
    // random: 打乱实例顺序，逐个实例按负载升序选人
    // ==========================================
    fn assign_random(
        &self,
        employees: &[Employee],
        instances: &[ShiftDateInstance],
        max_per_shift: usize,
    ) -> SchedulingResult<StrategyOutput> {
        let (seed, mut rng) = self.seeded_rng();

        let mut shuffled = instances.to_vec();
        shuffled.shuffle(&mut rng);

        let mut counts: HashMap<i64, usize> = employees.iter().map(|e| (e.employee_id, 0)).collect();
        let mut taken: HashSet<SlotKey> = HashSet::new();
        let mut assignments = Vec::new();

        for instance in &shuffled {
            // 每个实例都从原始顺序重新排序，保证同负载按列表顺序
            let mut ordered: Vec<i64> = employees.iter().map(|e| e.employee_id).collect();
            ordered.sort_by_key(|id| counts.get(id).copied().unwrap_or(0));

            let mut filled = 0;
            for employee_id in ordered {
                if filled >= max_per_shift {
                    break;
                }
                let key = (employee_id, instance.shift_id, instance.shift_date);
                if !taken.insert(key) {
                    continue;
                }
                assignments.push(ShiftAssignment::new(
                    employee_id,
                    instance.shift_id,
                    instance.shift_date,
                    ASSIGNMENT_STATUS_APPROVED,
                ));
                *counts.entry(employee_id).or_insert(0) += 1;
                filled += 1;
            }
        }

        if assignments.is_empty() {
            return Err(SchedulingError::Precondition("random 策略没有产生任何排班".to_string()));
        }

        Ok(StrategyOutput {
            assignments,
            categories: Vec::new(),
            seed: Some(seed),
        })
    }

    // ==========================================
    // rotate: 类别轮换 + 早/晚班分池选人
    // ==========================================
    fn assign_rotate(
        &self,
        employees: &[Employee],
        instances: &[ShiftDateInstance],
        max_per_shift: usize,
    ) -> SchedulingResult<StrategyOutput> {
        let (seed, mut rng) = self.seeded_rng();

        let plan = plan_categories(employees);
        let pools = RotationPools::from_plan(&plan);

        let mut shuffled = instances.to_vec();
        shuffled.shuffle(&mut rng);

        let mut counts: HashMap<i64, usize> = employees.iter().map(|e| (e.employee_id, 0)).collect();
        let mut taken: HashSet<SlotKey> = HashSet::new();
        let mut processed: HashMap<RotateSlot, usize> = HashMap::new();
        let mut assignments = Vec::new();
        let mut skipped = 0usize;

        for instance in &shuffled {
            let slot = match self.settings.rotate_slot(instance.shift_id) {
                Some(slot) => slot,
                None => {
                    skipped += 1;
                    continue;
                }
            };

            let index = processed.entry(slot).or_insert(0);
            let picked = pools.pick(
                slot,
                *index,
                self.settings.exclusive_cutoff,
                &counts,
                max_per_shift,
                |id| taken.contains(&(id, instance.shift_id, instance.shift_date)),
            );
            *index += 1;

            for employee_id in picked {
                taken.insert((employee_id, instance.shift_id, instance.shift_date));
                assignments.push(ShiftAssignment::new(
                    employee_id,
                    instance.shift_id,
                    instance.shift_date,
                    ASSIGNMENT_STATUS_APPROVED,
                ));
                *counts.entry(employee_id).or_insert(0) += 1;
            }
        }

        if skipped > 0 {
            warn!(
                skipped,
                morning_shift_id = self.settings.morning_shift_id,
                evening_shift_id = self.settings.evening_shift_id,
                "rotate 策略跳过非早/晚班模板的实例"
            );
        }

        if assignments.is_empty() {
            return Err(SchedulingError::Precondition("rotate 策略没有产生任何排班".to_string()));
        }

        Ok(StrategyOutput {
            assignments,
            categories: plan,
            seed: Some(seed),
        })
    }

    /// 每次运行一个种子，写入日志以便复现
    fn seeded_rng(&self) -> (u64, StdRng) {
        let seed = self.settings.seed.unwrap_or_else(rand::random::<u64>);
        debug!(seed, "排班随机种子");
        (seed, StdRng::seed_from_u64(seed))
    }
}
