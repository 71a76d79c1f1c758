//! Tables whose rows are checked against spec columns as they arrive

use super::block::BlockId;
use crate::error::{ReportError, Result};
use crate::evaluate::{evaluate, Evaluation, HeaderIndex, SpecColumns};

/// Handle to a table opened on a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableHandle(pub(crate) BlockId);

impl TableHandle {
    pub fn block_id(self) -> BlockId {
        self.0
    }
}

/// Everything needed to open a table: headers, optional title/category,
/// spec columns for pass/fail and any rows known up front.
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    pub headers: Vec<String>,
    pub title: Option<String>,
    /// Header color marker (`category-*` class)
    pub category: Option<String>,
    pub columns: SpecColumns,
    pub rows: Vec<Vec<String>>,
}

impl TableSpec {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Columns used to decide pass/fail for each row
    pub fn check(mut self, columns: SpecColumns) -> Self {
        self.columns = columns;
        self
    }

    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    /// Reject spec columns that cannot describe a single bound method
    pub fn validate(&self) -> Result<()> {
        let c = &self.columns;
        let nominal_tol = match (&c.nominal, &c.tolerance) {
            (Some(_), Some(_)) => true,
            (Some(_), None) => return Err(ReportError::IncompleteBounds { missing: "tolerance" }),
            (None, Some(_)) => return Err(ReportError::IncompleteBounds { missing: "nominal" }),
            (None, None) => false,
        };
        let limits = match (&c.lower, &c.upper) {
            (Some(_), Some(_)) => true,
            (Some(_), None) => return Err(ReportError::IncompleteBounds { missing: "upper" }),
            (None, Some(_)) => return Err(ReportError::IncompleteBounds { missing: "lower" }),
            (None, None) => false,
        };
        if nominal_tol && limits {
            return Err(ReportError::ConflictingBounds);
        }
        if (nominal_tol || limits) && c.measured.is_none() {
            return Err(ReportError::IncompleteBounds { missing: "measured" });
        }
        Ok(())
    }
}

/// A body row and the verdict computed when it was added
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub cells: Vec<String>,
    pub evaluation: Evaluation,
}

/// Structured table kept until serialization; rows are appended, never
/// spliced into rendered markup.
#[derive(Debug, Clone)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub columns: SpecColumns,
    header_index: HeaderIndex,
    rows: Vec<TableRow>,
}

impl TableBlock {
    pub(crate) fn open(spec: TableSpec) -> Result<Self> {
        spec.validate()?;
        let header_index = HeaderIndex::new(spec.headers.as_slice());
        for name in referenced_columns(&spec.columns) {
            if header_index.position(name).is_none() {
                log::warn!("spec column {name:?} is not a table header; rows stay unevaluated");
            }
        }
        let mut table = Self {
            headers: spec.headers,
            title: spec.title,
            category: spec.category,
            columns: spec.columns,
            header_index,
            rows: Vec::with_capacity(spec.rows.len()),
        };
        for row in spec.rows {
            table.push_row(row);
        }
        Ok(table)
    }

    /// Evaluate and append one row
    pub(crate) fn push_row(&mut self, cells: Vec<String>) -> Evaluation {
        if cells.len() != self.headers.len() {
            log::warn!(
                "row has {} cells but table has {} headers; rendering positionally",
                cells.len(),
                self.headers.len()
            );
        }
        let evaluation = evaluate(cells.as_slice(), &self.header_index, &self.columns);
        self.rows.push(TableRow { cells, evaluation });
        evaluation
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn passed(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.evaluation.evaluated && r.evaluation.pass)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| r.evaluation.evaluated && !r.evaluation.pass)
            .count()
    }

    pub fn evaluated(&self) -> usize {
        self.rows.iter().filter(|r| r.evaluation.evaluated).count()
    }
}

fn referenced_columns(columns: &SpecColumns) -> impl Iterator<Item = &str> {
    [
        &columns.measured,
        &columns.nominal,
        &columns.tolerance,
        &columns.lower,
        &columns.upper,
    ]
    .into_iter()
    .filter_map(|c| c.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rail_spec() -> TableSpec {
        TableSpec::new(["Rail", "Nominal (V)", "Tolerance (V)", "Measured (V)"]).check(
            SpecColumns::measured("Measured (V)").nominal_tolerance("Nominal (V)", "Tolerance (V)"),
        )
    }

    #[test]
    fn test_initial_rows_are_evaluated() {
        let spec = rail_spec()
            .row(["3.3V", "3.30", "0.10", "3.31"])
            .row(["12.0V", "12.00", "0.50", "11.20"]);
        let table = TableBlock::open(spec).unwrap();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.passed(), 1);
        assert_eq!(table.failed(), 1);
    }

    #[test]
    fn test_both_methods_rejected() {
        let spec = rail_spec().check(
            SpecColumns::measured("Measured (V)")
                .nominal_tolerance("Nominal (V)", "Tolerance (V)")
                .limits("Lo", "Hi"),
        );
        assert!(matches!(spec.validate(), Err(ReportError::ConflictingBounds)));
        assert!(TableBlock::open(spec).is_err());
    }

    #[test]
    fn test_half_method_rejected() {
        let mut columns = SpecColumns::measured("Measured (V)");
        columns.nominal = Some("Nominal (V)".into());
        let spec = rail_spec().check(columns);
        assert!(matches!(
            spec.validate(),
            Err(ReportError::IncompleteBounds { missing: "tolerance" })
        ));

        let spec = rail_spec().check(SpecColumns::default().limits("Lo", "Hi"));
        assert!(matches!(
            spec.validate(),
            Err(ReportError::IncompleteBounds { missing: "measured" })
        ));
    }

    #[test]
    fn test_plain_table_validates() {
        assert!(TableSpec::new(["A", "B"]).validate().is_ok());
        assert!(TableSpec::new(["A"])
            .check(SpecColumns::measured("A"))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_misaligned_row_is_kept() {
        let mut table = TableBlock::open(TableSpec::new(["A", "B"])).unwrap();
        table.push_row(vec!["1".into(), "2".into(), "3".into()]);
        assert_eq!(table.rows()[0].cells.len(), 3);
        assert!(!table.rows()[0].evaluation.evaluated);
    }
}
