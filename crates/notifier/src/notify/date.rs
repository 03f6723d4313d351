//! ジョブ実行時刻から「今日」の日付を解決する。
//!
//! 元のシステムではジョブごとに別々の方法で日付を計算していたため、
//! ここで単一の純粋関数に統合している。JST は夏時間のない固定オフセット。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;

/// 指定タイムゾーンでの暦日を返す。サーバー自身のタイムゾーンには依存しない。
pub fn local_date<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

/// 現在の JST 日付を取得する。
pub fn today_jst() -> NaiveDate {
    local_date(Utc::now(), &Tokyo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn instant(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn same_instant_resolves_to_same_date() {
        let now = instant("2024-01-15T03:00:00Z");
        assert_eq!(local_date(now, &Tokyo), local_date(now, &Tokyo));
    }

    #[test]
    fn offset_applies_before_date_extraction() {
        // 23:00 UTC は JST では翌日 08:00
        let late = instant("2024-01-14T23:00:00Z");
        assert_eq!(
            local_date(late, &Tokyo),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        // 14:59 UTC は JST では同日 23:59
        let earlier = instant("2024-01-14T14:59:00Z");
        assert_eq!(
            local_date(earlier, &Tokyo),
            NaiveDate::from_ymd_opt(2024, 1, 14).unwrap()
        );
    }

    #[test]
    fn midnight_boundary_rolls_over() {
        let just_before = instant("2024-01-14T14:59:59Z");
        let just_after = instant("2024-01-14T15:00:00Z");
        assert_ne!(local_date(just_before, &Tokyo), local_date(just_after, &Tokyo));
    }

    #[test]
    fn tokyo_agrees_with_fixed_utc_plus_9() {
        // JST には夏時間がないため、固定オフセット計算と常に一致する
        let jst = FixedOffset::east_opt(9 * 3600).unwrap();
        for s in [
            "2024-01-14T14:59:59Z",
            "2024-01-14T15:00:00Z",
            "2024-02-29T10:00:00Z",
            "2024-12-31T15:00:00Z",
            "2025-01-01T00:00:00Z",
        ] {
            let now = instant(s);
            assert_eq!(local_date(now, &Tokyo), local_date(now, &jst), "at {s}");
        }
    }

    #[test]
    fn year_boundary() {
        let now = instant("2024-12-31T16:00:00Z");
        assert_eq!(
            local_date(now, &Tokyo),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }
}
