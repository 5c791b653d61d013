//! 活动详情的展示数据
//!
//! 日期格式化、星级图标以及把一条 `EventSummary` 转换为详情页需要的全部派生值

use chrono::{DateTime, NaiveDate, Utc};

use super::rating::{RatingBar, RatingDistribution};
use super::stats::{fill_style, ratio_label, volunteer_fill, DerivedEventMetrics};
use crate::api::models::EventSummary;

/// 日期无法解析时显示的文字
pub const DATE_FALLBACK: &str = "Date to be announced";

/// 把 ISO-8601 日期格式化为 "March 5, 2025"，失败时返回占位文字
pub fn format_event_date(raw: &str) -> String {
    parse_event_date(raw)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| DATE_FALLBACK.to_string())
}

/// 接受 RFC 3339 时间戳或 YYYY-MM-DD
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// 活动开始时间，仅有日期时取当天 00:00 UTC
pub fn event_start(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarGlyph {
    Full,
    Half,
    Empty,
}

impl StarGlyph {
    pub fn symbol(&self) -> &'static str {
        match self {
            StarGlyph::Full => "\u{2605}",
            StarGlyph::Half => "\u{2bea}",
            StarGlyph::Empty => "\u{2606}",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            StarGlyph::Full => "star star-full",
            StarGlyph::Half => "star star-half",
            StarGlyph::Empty => "star star-empty",
        }
    }
}

/// 固定 5 个图标：floor(rating) 个实心，有小数部分时一个半星，其余空心
pub fn star_row(rating: f64) -> [StarGlyph; 5] {
    let rating = if rating.is_finite() {
        rating.clamp(0.0, 5.0)
    } else {
        0.0
    };
    let full = rating.floor() as usize;
    let has_half = rating.fract() > 0.0;

    let mut glyphs = [StarGlyph::Empty; 5];
    for (i, glyph) in glyphs.iter_mut().enumerate() {
        if i < full {
            *glyph = StarGlyph::Full;
        } else if i == full && has_half {
            *glyph = StarGlyph::Half;
        }
    }
    glyphs
}

/// 详情页视图模型
#[derive(Debug, Clone)]
pub struct EventDetailView {
    pub id: String,
    pub name: String,
    pub images: Vec<String>,
    pub date_label: String,
    pub volunteer_count: u64,
    pub participant_count: u64,
    pub rating_label: String,
    pub stars: Vec<StarGlyph>,
    pub metrics: DerivedEventMetrics,
    pub ratio_label: String,
    pub fill_style: String,
    pub bars: Vec<RatingBar>,
    pub review_caption: String,
}

impl EventDetailView {
    pub fn from_summary(summary: &EventSummary) -> Self {
        // 缺少分布时退化为全 0 分布
        let distribution = summary
            .rating_distribution
            .as_ref()
            .map(RatingDistribution::normalize)
            .unwrap_or_default();

        let participants = summary.participant_count;
        let volunteers = summary.volunteer_count;
        let rating = if summary.rating.is_finite() {
            summary.rating
        } else {
            0.0
        };

        Self {
            id: summary.id.clone(),
            name: summary.name.clone(),
            images: summary.images.clone(),
            date_label: format_event_date(&summary.date),
            volunteer_count: volunteers,
            participant_count: participants,
            rating_label: format!("{rating:.1}"),
            stars: star_row(rating).to_vec(),
            metrics: DerivedEventMetrics::compute(participants, volunteers, rating),
            ratio_label: ratio_label(participants, volunteers),
            fill_style: fill_style(volunteer_fill(participants, volunteers)),
            bars: distribution.bars(),
            review_caption: distribution.caption(),
        }
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
