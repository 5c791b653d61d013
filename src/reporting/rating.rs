//! 评分分布聚合
//!
//! 把接口返回的稀疏评分映射补齐为完整的 1-5 星分布，并计算每一档的百分比

use serde_json::{Map, Value};

/// 星级的渲染顺序，固定从 5 星到 1 星
pub const RENDER_ORDER: [u8; 5] = [5, 4, 3, 2, 1];

/// 完整的 1-5 星评分分布
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingDistribution {
    // counts[0] 对应 1 星
    counts: [u64; 5],
}

/// 单条评分柱
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBar {
    pub stars: u8,
    pub count: u64,
    /// 一位小数的百分比文本，总数为 0 时为 "0"
    pub percentage: String,
    /// 宽度百分比，限制在 [0, 100]
    pub width: f64,
}

impl RatingDistribution {
    pub fn from_counts(counts: [u64; 5]) -> Self {
        Self { counts }
    }

    /// 从稀疏映射构建分布
    ///
    /// 每个星级先按字符串键 "n" 查找，再按数值相等的键（如 "5.0"）查找，都没有时为 0
    pub fn normalize(raw: &Map<String, Value>) -> Self {
        let mut counts = [0u64; 5];
        for star in 1..=5u8 {
            let value = raw.get(&star.to_string()).or_else(|| {
                raw.iter()
                    .find(|(key, _)| {
                        key.trim()
                            .parse::<f64>()
                            .map(|k| k == f64::from(star))
                            .unwrap_or(false)
                    })
                    .map(|(_, value)| value)
            });
            counts[usize::from(star - 1)] = value.map(coerce_count).unwrap_or(0);
        }
        Self { counts }
    }

    /// 某一星级的数量，星级超出 1-5 时为 0
    pub fn count(&self, star: u8) -> u64 {
        match star {
            1..=5 => self.counts[usize::from(star - 1)],
            _ => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn percentage(&self, star: u8) -> String {
        percentage(self.count(star), self.total())
    }

    /// 按 5..1 的固定顺序生成评分柱
    pub fn bars(&self) -> Vec<RatingBar> {
        let total = self.total();
        RENDER_ORDER
            .iter()
            .map(|&stars| {
                let count = self.count(stars);
                RatingBar {
                    stars,
                    count,
                    percentage: percentage(count, total),
                    width: width(count, total),
                }
            })
            .collect()
    }

    /// "Based on N reviews" 说明文字
    pub fn caption(&self) -> String {
        review_caption(self.total())
    }
}

impl RatingBar {
    pub fn width_style(&self) -> String {
        format!("width: {:.1}%", self.width)
    }
}

/// 把接口中的计数值转换为非负整数
fn coerce_count(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f > 0.0)
            .map(|f| f.trunc() as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

/// 计算百分比文本，保留一位小数；总数为 0 时返回 "0"
pub fn percentage(count: u64, total: u64) -> String {
    if total == 0 {
        return "0".to_string();
    }
    format!("{:.1}", count as f64 * 100.0 / total as f64)
}

fn width(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 100.0 / total as f64).clamp(0.0, 100.0)
}

pub fn review_caption(total: u64) -> String {
    if total == 1 {
        "Based on 1 review".to_string()
    } else {
        format!("Based on {total} reviews")
    }
}
