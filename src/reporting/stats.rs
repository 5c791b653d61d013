//! 活动统计计算
//!
//! 从参与者和志愿者数量推导比例、效率等指标。所有除法都有零除数保护，
//! 结果用 `Option` 表示，渲染时输出 "N/A"，不会出现 NaN 或 Infinity。

use std::fmt;

/// 零除数时的显示文本
pub const NOT_AVAILABLE: &str = "N/A";

/// 整数百分比，除数为 0 时为空
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Percent(pub Option<u64>);

impl Percent {
    /// round(100 * numerator / denominator)
    pub fn of(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Percent(None);
        }
        Percent(Some(
            (numerator as f64 * 100.0 / denominator as f64).round() as u64,
        ))
    }

    pub fn value(&self) -> Option<u64> {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}%"),
            None => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// 详情页展示的派生指标
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedEventMetrics {
    /// round(100 * volunteers / participants)
    pub participant_ratio: Percent,
    /// round(100 * volunteers / (participants + volunteers))
    pub volunteer_ratio: Percent,
    /// round(100 * participants / volunteers / 5)
    pub efficiency: Percent,
    /// 原始评分值，不做百分比换算
    pub satisfaction: f64,
}

impl DerivedEventMetrics {
    pub fn compute(participants: u64, volunteers: u64, rating: f64) -> Self {
        let efficiency = if volunteers == 0 {
            Percent(None)
        } else {
            Percent(Some(
                (participants as f64 * 100.0 / volunteers as f64 / 5.0).round() as u64,
            ))
        };

        Self {
            participant_ratio: Percent::of(volunteers, participants),
            volunteer_ratio: Percent::of(volunteers, participants + volunteers),
            efficiency,
            satisfaction: if rating.is_finite() { rating } else { 0.0 },
        }
    }

    pub fn satisfaction_label(&self) -> String {
        format!("{:.1} / 5", self.satisfaction)
    }
}

/// 参与者与志愿者之比，保留一位小数，例如 "2.5:1"；没有志愿者时为 "N/A"
pub fn ratio_label(participants: u64, volunteers: u64) -> String {
    if volunteers == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let ratio = (participants as f64 / volunteers as f64 * 10.0).round() / 10.0;
    format!("{ratio}:1")
}

/// 志愿者占总人数的比例，范围 [0, 1]；两者都为 0 时为 0
pub fn volunteer_fill(participants: u64, volunteers: u64) -> f64 {
    let total = participants + volunteers;
    if total == 0 {
        return 0.0;
    }
    volunteers as f64 / total as f64
}

/// 填充条的内联样式
pub fn fill_style(fraction: f64) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    format!("width: {:.1}%", fraction * 100.0)
}
