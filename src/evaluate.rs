//! Pass/fail evaluation of table rows against spec columns
//!
//! A row passes when its measured cell lies inside the bounds described by
//! either (nominal ± tolerance) or (lower, upper), inclusive at both ends.
//! Anything that prevents a clean comparison (missing column, a cell that is
//! not a number) leaves the row unevaluated instead of failing it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column name to position lookup, computed once per table
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
    len: usize,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (i, h) in headers.iter().enumerate() {
            // Duplicate header names resolve to the first occurrence
            positions.entry(h.as_ref().to_string()).or_insert(i);
        }
        Self {
            positions,
            len: headers.len(),
        }
    }

    /// Position of a column by exact header name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Number of header cells
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Column-name references used for pass/fail evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecColumns {
    pub measured: Option<String>,
    pub nominal: Option<String>,
    pub tolerance: Option<String>,
    pub lower: Option<String>,
    pub upper: Option<String>,
}

impl SpecColumns {
    /// Start a spec from the column holding measured values
    pub fn measured(column: impl Into<String>) -> Self {
        Self {
            measured: Some(column.into()),
            ..Self::default()
        }
    }

    /// Check against nominal ± tolerance
    pub fn nominal_tolerance(
        mut self,
        nominal: impl Into<String>,
        tolerance: impl Into<String>,
    ) -> Self {
        self.nominal = Some(nominal.into());
        self.tolerance = Some(tolerance.into());
        self
    }

    /// Check against inclusive lower/upper limits
    pub fn limits(mut self, lower: impl Into<String>, upper: impl Into<String>) -> Self {
        self.lower = Some(lower.into());
        self.upper = Some(upper.into());
        self
    }

    fn has_nominal_tolerance(&self) -> bool {
        self.nominal.is_some() && self.tolerance.is_some()
    }

    fn has_limits(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }
}

/// Outcome of evaluating one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// Whether a comparison actually took place
    pub evaluated: bool,
    /// Meaningful only when `evaluated` is true
    pub pass: bool,
    /// Cell that carries the pass/fail marker, set only when evaluated
    pub measured_index: Option<usize>,
}

impl Evaluation {
    pub const NOT_EVALUATED: Evaluation = Evaluation {
        evaluated: false,
        pass: false,
        measured_index: None,
    };

    fn checked(pass: bool, measured_index: usize) -> Self {
        Self {
            evaluated: true,
            pass,
            measured_index: Some(measured_index),
        }
    }

    /// Marker for cell `index`: `Some(true)` pass, `Some(false)` fail, `None` plain
    pub fn marker_for(&self, index: usize) -> Option<bool> {
        match self.measured_index {
            Some(i) if self.evaluated && i == index => Some(self.pass),
            _ => None,
        }
    }
}

/// Inclusive numeric interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn from_nominal(nominal: f64, tolerance: f64) -> Self {
        Self {
            lower: nominal - tolerance,
            upper: nominal + tolerance,
        }
    }

    /// Inclusive at both ends. Limits are widened by a few ulps so a reading
    /// written with the same decimals as its limit lands on it, e.g.
    /// 0.80 against 0.70 + 0.10.
    pub fn contains(&self, value: f64) -> bool {
        let eps = 4.0 * f64::EPSILON * self.lower.abs().max(self.upper.abs()).max(1.0);
        self.lower - eps <= value && value <= self.upper + eps
    }
}

/// Evaluate a row against the configured spec columns.
///
/// When both bound methods are configured, nominal+tolerance wins.
pub fn evaluate<S: AsRef<str>>(
    row: &[S],
    headers: &HeaderIndex,
    columns: &SpecColumns,
) -> Evaluation {
    let Some(measured_col) = columns.measured.as_deref() else {
        return Evaluation::NOT_EVALUATED;
    };
    let Some(measured_idx) = headers.position(measured_col) else {
        log::debug!("measured column {measured_col:?} not in table headers");
        return Evaluation::NOT_EVALUATED;
    };
    let Some(measured) = numeric_cell(row, measured_idx) else {
        return Evaluation::NOT_EVALUATED;
    };

    let bounds = if columns.has_nominal_tolerance() {
        column_pair(row, headers, &columns.nominal, &columns.tolerance)
            .map(|(nominal, tolerance)| Bounds::from_nominal(nominal, tolerance))
    } else if columns.has_limits() {
        column_pair(row, headers, &columns.lower, &columns.upper)
            .map(|(lower, upper)| Bounds { lower, upper })
    } else {
        None
    };

    match bounds {
        Some(b) => Evaluation::checked(b.contains(measured), measured_idx),
        None => Evaluation::NOT_EVALUATED,
    }
}

fn column_pair<S: AsRef<str>>(
    row: &[S],
    headers: &HeaderIndex,
    first: &Option<String>,
    second: &Option<String>,
) -> Option<(f64, f64)> {
    let a = headers.position(first.as_deref()?)?;
    let b = headers.position(second.as_deref()?)?;
    Some((numeric_cell(row, a)?, numeric_cell(row, b)?))
}

/// Parse a cell as a real number; missing or non-numeric cells yield `None`
pub fn numeric_cell<S: AsRef<str>>(row: &[S], index: usize) -> Option<f64> {
    let raw = row.get(index)?.as_ref();
    match raw.trim().parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::debug!("cell {index} ({raw:?}) is not numeric, skipping evaluation");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_headers() -> HeaderIndex {
        HeaderIndex::new(&["Rail", "Nominal (V)", "Tolerance (V)", "Measured (V)"])
    }

    fn nominal_spec() -> SpecColumns {
        SpecColumns::measured("Measured (V)").nominal_tolerance("Nominal (V)", "Tolerance (V)")
    }

    fn limit_headers() -> HeaderIndex {
        HeaderIndex::new(&["Test Point", "Lower Spec (A)", "Upper Spec (A)", "Measured (A)"])
    }

    fn limit_spec() -> SpecColumns {
        SpecColumns::measured("Measured (A)").limits("Lower Spec (A)", "Upper Spec (A)")
    }

    #[test]
    fn test_nominal_tolerance_upper_edge() {
        let e = evaluate(&["5.0V", "5.00", "0.25", "5.25"], &nominal_headers(), &nominal_spec());
        assert!(e.evaluated);
        assert!(e.pass);
        assert_eq!(e.measured_index, Some(3));

        let e = evaluate(&["5.0V", "5.00", "0.25", "5.26"], &nominal_headers(), &nominal_spec());
        assert!(e.evaluated);
        assert!(!e.pass);
    }

    #[test]
    fn test_decimal_readings_on_the_limit_pass() {
        let headers = HeaderIndex::new(&["N", "T", "M"]);
        let spec = SpecColumns::measured("M").nominal_tolerance("N", "T");
        for (nominal, tolerance, measured) in [
            ("0.70", "0.10", "0.80"),
            ("0.80", "0.10", "0.70"),
            ("3.30", "0.10", "3.40"),
            ("3.30", "0.10", "3.20"),
            ("-5.00", "0.25", "-5.25"),
        ] {
            let e = evaluate(&[nominal, tolerance, measured], &headers, &spec);
            assert!(e.evaluated && e.pass, "{measured} vs {nominal}±{tolerance}");
        }

        let e = evaluate(&["0.70", "0.10", "0.81"], &headers, &spec);
        assert!(e.evaluated && !e.pass);
        let e = evaluate(&["0.70", "0.10", "0.59"], &headers, &spec);
        assert!(e.evaluated && !e.pass);
    }

    #[test]
    fn test_decimal_limits_on_the_edge_pass() {
        let headers = HeaderIndex::new(&["L", "U", "M"]);
        let spec = SpecColumns::measured("M").limits("L", "U");
        let e = evaluate(&["0.1", "0.3", "0.30"], &headers, &spec);
        assert!(e.pass);
        let e = evaluate(&["0.1", "0.3", "0.3000001"], &headers, &spec);
        assert!(!e.pass);
    }

    #[test]
    fn test_negative_rail() {
        let e = evaluate(&["-5.0V", "-5.00", "0.25", "-5.01"], &nominal_headers(), &nominal_spec());
        assert!(e.pass);
    }

    #[test]
    fn test_limits_lower_edge() {
        let e = evaluate(&["Load 1", "0.90", "1.10", "0.90"], &limit_headers(), &limit_spec());
        assert!(e.evaluated && e.pass);

        let e = evaluate(&["Load 1", "0.90", "1.10", "0.89"], &limit_headers(), &limit_spec());
        assert!(e.evaluated && !e.pass);
    }

    #[test]
    fn test_non_numeric_measured_is_not_evaluated() {
        let e = evaluate(&["5.0V", "5.00", "0.25", "N/A"], &nominal_headers(), &nominal_spec());
        assert_eq!(e, Evaluation::NOT_EVALUATED);
    }

    #[test]
    fn test_non_numeric_bound_is_not_evaluated() {
        let e = evaluate(&["5.0V", "five", "0.25", "5.01"], &nominal_headers(), &nominal_spec());
        assert!(!e.evaluated);
        let e = evaluate(&["Load", "0.9", "", "1.0"], &limit_headers(), &limit_spec());
        assert!(!e.evaluated);
    }

    #[test]
    fn test_no_measured_column() {
        let spec = SpecColumns::default().limits("Lower Spec (A)", "Upper Spec (A)");
        let e = evaluate(&["Load", "0.9", "1.1", "1.0"], &limit_headers(), &spec);
        assert!(!e.evaluated);
    }

    #[test]
    fn test_measured_column_not_in_headers() {
        let spec = SpecColumns::measured("Reading").limits("Lower Spec (A)", "Upper Spec (A)");
        let e = evaluate(&["Load", "0.9", "1.1", "1.0"], &limit_headers(), &spec);
        assert!(!e.evaluated);
    }

    #[test]
    fn test_measured_without_bounds() {
        let spec = SpecColumns::measured("Measured (A)");
        let e = evaluate(&["Load", "0.9", "1.1", "1.0"], &limit_headers(), &spec);
        assert!(!e.evaluated);

        // Half a bound method is not enough either
        let mut spec = SpecColumns::measured("Measured (A)");
        spec.lower = Some("Lower Spec (A)".into());
        let e = evaluate(&["Load", "0.9", "1.1", "1.0"], &limit_headers(), &spec);
        assert!(!e.evaluated);
    }

    #[test]
    fn test_short_row_is_not_evaluated() {
        let e = evaluate(&["5.0V", "5.00"], &nominal_headers(), &nominal_spec());
        assert!(!e.evaluated);
    }

    #[test]
    fn test_nominal_wins_when_both_configured() {
        let headers = HeaderIndex::new(&["Nom", "Tol", "Lo", "Hi", "Meas"]);
        let spec = SpecColumns::measured("Meas")
            .nominal_tolerance("Nom", "Tol")
            .limits("Lo", "Hi");
        // Inside nominal±tol, outside lo/hi
        let e = evaluate(&["10", "1", "0", "2", "10.5"], &headers, &spec);
        assert!(e.evaluated && e.pass);
    }

    #[test]
    fn test_whitespace_around_numbers() {
        let e = evaluate(&["x", " 0.90 ", "1.10", " 1.0"], &limit_headers(), &limit_spec());
        assert!(e.pass);
    }

    #[test]
    fn test_marker_for() {
        let e = evaluate(&["Load", "0.9", "1.1", "1.5"], &limit_headers(), &limit_spec());
        assert_eq!(e.marker_for(3), Some(false));
        assert_eq!(e.marker_for(0), None);
        assert_eq!(Evaluation::NOT_EVALUATED.marker_for(3), None);
    }

    #[test]
    fn test_header_index_duplicates_resolve_first() {
        let idx = HeaderIndex::new(&["A", "B", "A"]);
        assert_eq!(idx.position("A"), Some(0));
        assert_eq!(idx.position("B"), Some(1));
        assert_eq!(idx.position("C"), None);
        assert_eq!(idx.len(), 3);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    fn centi(v: i64) -> String {
        format!("{:.2}", v as f64 / 100.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn nominal_tolerance_matches_interval(
            nominal in -100_000i64..100_000,
            tolerance in 0i64..5_000,
            measured in -110_000i64..110_000,
        ) {
            // Centi-unit integers rendered as two-decimal cells, the way
            // instruments report them
            let headers = HeaderIndex::new(&["N", "T", "M"]);
            let spec = SpecColumns::measured("M").nominal_tolerance("N", "T");
            let row = [centi(nominal), centi(tolerance), centi(measured)];
            let e = evaluate(&row, &headers, &spec);
            prop_assert!(e.evaluated);
            let expected = nominal - tolerance <= measured && measured <= nominal + tolerance;
            prop_assert_eq!(e.pass, expected);
        }

        #[test]
        fn limits_match_interval(
            lower in -100_000i64..100_000,
            width in 0i64..10_000,
            measured in -120_000i64..120_000,
        ) {
            let upper = lower + width;
            let headers = HeaderIndex::new(&["L", "U", "M"]);
            let spec = SpecColumns::measured("M").limits("L", "U");
            let row = [centi(lower), centi(upper), centi(measured)];
            let e = evaluate(&row, &headers, &spec);
            prop_assert!(e.evaluated);
            prop_assert_eq!(e.pass, lower <= measured && measured <= upper);
        }

        #[test]
        fn endpoints_always_pass(lower in -100.0f64..100.0, width in 0.0f64..10.0) {
            let upper = lower + width;
            let headers = HeaderIndex::new(&["L", "U", "M"]);
            let spec = SpecColumns::measured("M").limits("L", "U");
            for m in [lower, upper] {
                let row = [lower.to_string(), upper.to_string(), m.to_string()];
                prop_assert!(evaluate(&row, &headers, &spec).pass);
            }
        }

        #[test]
        fn non_numeric_measured_never_panics(ref measured in "[a-zA-Z/ ]{0,12}") {
            let headers = HeaderIndex::new(&["L", "U", "M"]);
            let spec = SpecColumns::measured("M").limits("L", "U");
            let row = ["0".to_string(), "1".to_string(), measured.clone()];
            let e = evaluate(&row, &headers, &spec);
            // Words like "inf" or "NaN" do parse as floats
            if measured.trim().parse::<f64>().is_err() {
                prop_assert!(!e.evaluated);
            }
        }
    }
}
