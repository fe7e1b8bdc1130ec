use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// 部署地区固定 UTC+8，不跟随机器时区
const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

/// 今天日期的两种写法：补零 (2026/08/07) 与不补零 (2026/8/7)。
/// 订单纪录表的时间戳两种格式都出现过，过滤时要同时比对。
pub fn today_date_strings() -> (String, String) {
    date_strings_at(Utc::now())
}

fn date_strings_at(now: DateTime<Utc>) -> (String, String) {
    let offset = FixedOffset::east_opt(TAIPEI_OFFSET_SECS).expect("UTC+8 is a valid offset");
    let local = now.with_timezone(&offset);
    let padded = local.format("%Y/%m/%d").to_string();
    let unpadded = format!("{}/{}/{}", local.year(), local.month(), local.day());
    (padded, unpadded)
}

/// 时间戳是字串比对（contains），不是解析日期后比较，
/// 维持与既有纪录表相同的过滤行为。
pub fn timestamp_is_on(timestamp: &str, padded: &str, unpadded: &str) -> bool {
    timestamp.contains(padded) || timestamp.contains(unpadded)
}
