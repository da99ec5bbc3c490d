use chrono::{FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// 현재 UTC 시각 (DB 저장용, 타임존 없음)
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// 업무 기준 타임존에서의 오늘 날짜
///
/// 일일 사용량은 UTC가 아니라 이 날짜를 기준으로 집계됩니다.
pub fn business_today(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}

/// 한국 표준시 (UTC+9)
pub fn kst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("UTC+9 is a valid offset")
}

/// 시간 단위 오프셋을 `FixedOffset`으로 변환합니다. (-23 ~ +23)
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}
