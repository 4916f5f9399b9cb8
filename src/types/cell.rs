use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A single value returned by a data provider.
///
/// Deserializes from plain JS values: `null`/`undefined` become `Empty`,
/// numeric arrays become `Series` (rendered as sparklines).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Series(Vec<f64>),
    #[default]
    Empty,
}

impl CellValue {
    /// Text shown in a cell or written to the clipboard.
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
            Self::Bool(b) => b.to_string(),
            Self::Series(values) => values
                .iter()
                .map(|v| format_number(*v))
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Checkbox state: non-zero numbers, non-empty text and series are on.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Series(_) => true,
            Self::Empty => false,
        }
    }

    /// `Empty` or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Loose equality used by `eq`/`neq` filters: numbers compare against
    /// numeric strings and booleans as 0/1.
    pub fn loose_eq(&self, other: &CellValue) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Empty, _) | (_, Self::Empty) => false,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => match (self.loose_number(), other.loose_number()) {
                (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
                _ => self.display_text() == other.display_text(),
            },
        }
    }

    fn loose_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Bool(true) => Some(1.0),
            Self::Bool(false) => Some(0.0),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Ordering used by sorting and range filters. This is a total order.
    ///
    /// Empty values sort lowest, then numbers (numeric text included)
    /// compared numerically, then NaN. Everything else follows, ordered by
    /// a case-insensitive natural comparison of the display text.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        let (a, b) = (self.sort_key(), other.sort_key());
        a.rank().cmp(&b.rank()).then_with(|| match (&a, &b) {
            // NaN has its own rank, so this never falls back
            (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
            (SortKey::Text(x), SortKey::Text(y)) => natural_cmp(x, y),
            _ => Ordering::Equal,
        })
    }

    /// True for `NaN` numbers and text that parses as `NaN`.
    pub fn is_nan(&self) -> bool {
        matches!(self.sort_key(), SortKey::NaN)
    }

    fn sort_key(&self) -> SortKey {
        if self.is_empty() {
            return SortKey::Empty;
        }
        let number = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match number {
            Some(n) if n.is_nan() => SortKey::NaN,
            Some(n) => SortKey::Number(n),
            None => SortKey::Text(self.display_text()),
        }
    }
}

/// Comparison key behind [`CellValue::compare`]. Keys of different variants
/// order by `rank` alone.
enum SortKey {
    Empty,
    Number(f64),
    NaN,
    Text(String),
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Number(_) => 1,
            Self::NaN => 2,
            Self::Text(_) => 3,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Format a number the way JS `String(n)` would for common magnitudes.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        n.to_string()
    }
}

/// Case-insensitive comparison treating digit runs as numbers ("item2" < "item10").
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.chars().peekable();
    let mut bi = b.chars().peekable();
    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) if ca.is_ascii_digit() && cb.is_ascii_digit() => {
                let da = take_digits(&mut ai);
                let db = take_digits(&mut bi);
                let ta = da.trim_start_matches('0');
                let tb = db.trim_start_matches('0');
                let ord = ta.len().cmp(&tb.len()).then_with(|| ta.cmp(tb));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(ca), Some(cb)) => {
                let la = ca.to_lowercase().next().unwrap_or(ca);
                let lb = cb.to_lowercase().next().unwrap_or(cb);
                match la.cmp(&lb) {
                    Ordering::Equal => {
                        ai.next();
                        bi.next();
                    }
                    ord => return ord,
                }
            }
        }
    }
}

fn take_digits(it: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut out = String::new();
    while let Some(c) = it.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        out.push(c);
        it.next();
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text() {
        assert_eq!(CellValue::Number(100.0).display_text(), "100");
        assert_eq!(CellValue::Number(1.5).display_text(), "1.5");
        assert_eq!(CellValue::Bool(true).display_text(), "true");
        assert_eq!(CellValue::Empty.display_text(), "");
        assert_eq!(CellValue::Series(vec![1.0, 2.5]).display_text(), "1,2.5");
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("item2", "item10"), Ordering::Less);
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("b", "A"), Ordering::Greater);
    }

    #[test]
    fn test_compare_empty_lowest() {
        assert_eq!(
            CellValue::Empty.compare(&CellValue::Number(-1e9)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Number(2.0).compare(&CellValue::Number(10.0)),
            Ordering::Less
        );
    }

    use test_case::test_case;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test_case(CellValue::Number(f64::NAN), CellValue::Number(1e300), Ordering::Greater ; "nan after numbers")]
    #[test_case(CellValue::Number(f64::NAN), CellValue::Number(f64::INFINITY), Ordering::Greater ; "nan after inf")]
    #[test_case(CellValue::Number(f64::NAN), CellValue::Number(f64::NAN), Ordering::Equal ; "nan equals nan")]
    #[test_case(CellValue::Number(f64::NAN), text("abc"), Ordering::Less ; "nan before text")]
    #[test_case(CellValue::Number(f64::NEG_INFINITY), CellValue::Number(-1e300), Ordering::Less ; "neg inf lowest number")]
    #[test_case(CellValue::Number(f64::INFINITY), CellValue::Number(1e300), Ordering::Greater ; "inf highest number")]
    #[test_case(CellValue::Empty, CellValue::Number(f64::NEG_INFINITY), Ordering::Less ; "empty before neg inf")]
    #[test_case(text(""), CellValue::Number(f64::NAN), Ordering::Less ; "empty text before nan")]
    #[test_case(text("1.20"), CellValue::Number(1.25), Ordering::Less ; "numeric text compares numerically")]
    #[test_case(text("1.20"), CellValue::Number(1.2), Ordering::Equal ; "numeric text equals number")]
    #[test_case(CellValue::Number(1e9), text("a1"), Ordering::Less ; "numbers before text")]
    #[test_case(CellValue::Number(-0.0), CellValue::Number(0.0), Ordering::Equal ; "signed zeros equal")]
    #[test_case(CellValue::Bool(false), CellValue::Bool(true), Ordering::Less ; "bools by text")]
    fn test_compare_cases(a: CellValue, b: CellValue, expected: Ordering) {
        assert_eq!(a.compare(&b), expected);
        assert_eq!(b.compare(&a), expected.reverse());
    }

    #[test]
    fn test_compare_is_a_total_order_on_mixed_values() {
        let values = vec![
            CellValue::Empty,
            text(""),
            CellValue::Number(f64::NAN),
            CellValue::Number(-f64::NAN),
            CellValue::Number(f64::INFINITY),
            CellValue::Number(f64::NEG_INFINITY),
            CellValue::Number(1.5),
            CellValue::Number(1.25),
            CellValue::Number(0.0),
            text("1.20"),
            text("nan"),
            text("item2"),
            text("item10"),
            text("Alpha"),
            text("alpha"),
            CellValue::Bool(true),
            CellValue::Series(vec![1.0, 2.0]),
        ];
        for a in &values {
            assert_eq!(a.compare(a), Ordering::Equal);
            for b in &values {
                assert_eq!(a.compare(b), b.compare(a).reverse());
                for c in &values {
                    if a.compare(b) != Ordering::Greater && b.compare(c) != Ordering::Greater {
                        assert_ne!(a.compare(c), Ordering::Greater, "{a:?} {b:?} {c:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_loose_eq() {
        assert!(CellValue::Number(5.0).loose_eq(&CellValue::from("5")));
        assert!(CellValue::Bool(true).loose_eq(&CellValue::Number(1.0)));
        assert!(!CellValue::Empty.loose_eq(&CellValue::from("")));
    }
}
