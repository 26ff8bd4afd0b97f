//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// セルの値を表す列挙型
///
/// 各バリアントは`Display`で固定の文字列表現を持ちます。
/// `Absent`（値なし）と`Text("")`（空文字列）は区別されます。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 整数
    Int(i64),

    /// 論理値
    Bool(bool),

    /// 日時
    DateTime(NaiveDateTime),

    /// 時刻のみ（日付部分が0のシリアル値）
    Time(NaiveTime),

    /// 経過時間（`[h]:mm:ss`などの書式）
    Duration(Duration),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 値なし
    Absent,
}

impl CellValue {
    /// 値が存在しないかどうかを判定
    pub fn is_absent(&self) -> bool {
        matches!(self, CellValue::Absent)
    }
}

/// 2^53。これ未満の整数値のf64は小数部なしで表示する
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => {
                if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::DateTime(dt) => {
                if dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%.6f"))
                }
            }
            CellValue::Time(t) => {
                if t.nanosecond() == 0 {
                    write!(f, "{}", t.format("%H:%M:%S"))
                } else {
                    write!(f, "{}", t.format("%H:%M:%S%.6f"))
                }
            }
            CellValue::Duration(d) => write_duration(f, d),
            CellValue::Error(e) => f.write_str(e),
            CellValue::Absent => f.write_str("None"),
        }
    }
}

const MICROS_PER_SECOND: i128 = 1_000_000;
const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SECOND;

/// `[-]D day(s), H:MM:SS[.ffffff]`形式で出力
///
/// 日数は切り捨て（負方向）で、残りの時刻部分は常に正になります。
fn write_duration(f: &mut fmt::Formatter<'_>, d: &Duration) -> fmt::Result {
    let micros = i128::from(d.num_seconds()) * MICROS_PER_SECOND
        + i128::from(d.subsec_nanos() / 1_000);
    let days = micros.div_euclid(MICROS_PER_DAY);
    let rest = micros.rem_euclid(MICROS_PER_DAY);

    let seconds = rest / MICROS_PER_SECOND;
    let fraction = rest % MICROS_PER_SECOND;

    match days {
        0 => {}
        1 | -1 => write!(f, "{} day, ", days)?,
        _ => write!(f, "{} days, ", days)?,
    }
    write!(
        f,
        "{}:{:02}:{:02}",
        seconds / 3_600,
        seconds % 3_600 / 60,
        seconds % 60
    )?;
    if fraction != 0 {
        write!(f, ".{:06}", fraction)?;
    }
    Ok(())
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Absent)
    }
}

/// セル範囲（1始まり、両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start_row: u32,
    pub start_column: u32,
    pub end_row: u32,
    pub end_column: u32,
}

impl CellRange {
    /// 新しい範囲を生成
    pub fn new(start_row: u32, start_column: u32, end_row: u32, end_column: u32) -> Self {
        Self {
            start_row,
            start_column,
            end_row,
            end_column,
        }
    }

    /// 範囲のサイズ（行数 × 列数）を計算。開始が終了を超える軸は0
    pub fn size(&self) -> (u32, u32) {
        let rows = (self.end_row + 1).saturating_sub(self.start_row);
        let cols = (self.end_column + 1).saturating_sub(self.start_column);
        (rows, cols)
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            crate::range::column_letter_from_index(self.start_column),
            self.start_row,
            crate::range::column_letter_from_index(self.end_column),
            self.end_row
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_text_renders_verbatim() {
        assert_eq!(CellValue::from("Alice").to_string(), "Alice");
        assert_eq!(CellValue::from("").to_string(), "");
    }

    #[test]
    fn test_integral_number_has_no_fraction() {
        assert_eq!(CellValue::Number(30.0).to_string(), "30");
        assert_eq!(CellValue::Number(-4.0).to_string(), "-4");
        assert_eq!(CellValue::Number(0.0).to_string(), "0");
    }

    #[test]
    fn test_fractional_number() {
        assert_eq!(CellValue::Number(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Number(0.1).to_string(), "0.1");
    }

    #[test]
    fn test_non_finite_number() {
        assert_eq!(CellValue::Number(f64::INFINITY).to_string(), "inf");
        assert_eq!(CellValue::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_int_and_bool() {
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Bool(false).to_string(), "False");
    }

    #[test]
    fn test_datetime() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(dt).to_string(), "2024-03-09 14:05:00");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_micro_opt(14, 5, 0, 250_000)
            .unwrap();
        assert_eq!(
            CellValue::DateTime(dt).to_string(),
            "2024-03-09 14:05:00.250000"
        );
    }

    #[test]
    fn test_time_of_day() {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert_eq!(CellValue::Time(noon).to_string(), "12:00:00");

        let early = NaiveTime::from_hms_micro_opt(6, 30, 5, 500_000).unwrap();
        assert_eq!(CellValue::Time(early).to_string(), "06:30:05.500000");
    }

    #[test]
    fn test_duration() {
        let cases = [
            (Duration::hours(12), "12:00:00"),
            (Duration::hours(36), "1 day, 12:00:00"),
            (Duration::days(2), "2 days, 0:00:00"),
            (Duration::hours(-12), "-1 day, 12:00:00"),
            (Duration::days(-3), "-3 days, 0:00:00"),
            (Duration::milliseconds(1_500), "0:00:01.500000"),
            (Duration::zero(), "0:00:00"),
        ];
        for (duration, expected) in cases {
            assert_eq!(CellValue::Duration(duration).to_string(), expected);
        }
    }

    #[test]
    fn test_error_and_absent() {
        assert_eq!(CellValue::Error("#DIV/0!".to_string()).to_string(), "#DIV/0!");
        assert_eq!(CellValue::Absent.to_string(), "None");
        assert!(CellValue::Absent.is_absent());
        assert!(!CellValue::from("").is_absent());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CellValue::from(None::<&str>), CellValue::Absent);
        assert_eq!(CellValue::from(Some(3.0)), CellValue::Number(3.0));
    }

    #[test]
    fn test_range_size_and_display() {
        let range = CellRange::new(1, 1, 16, 7);
        assert_eq!(range.size(), (16, 7));
        assert_eq!(range.to_string(), "A1:G16");

        let empty = CellRange::new(3, 1, 2, 1);
        assert_eq!(empty.size(), (0, 1));
    }
}
