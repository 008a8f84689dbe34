//! 时间工具函数 — 业务时区转换
//!
//! 所有统计计算统一使用业务时区的本地时间 (`NaiveDateTime`)，
//! repository 层只接收 `i64` Unix millis。

use chrono::NaiveDateTime;
use chrono_tz::Tz;

/// 当前业务时区的本地时间
pub fn business_now(tz: Tz) -> NaiveDateTime {
    chrono::Utc::now().with_timezone(&tz).naive_local()
}

/// 本地时间 → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn local_datetime_to_millis(naive: NaiveDateTime, tz: Tz) -> i64 {
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}
