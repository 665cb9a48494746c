use std::collections::BTreeSet;

use experiment::names::FactorName;
use tracing::{debug, warn};

use crate::error::DesignFileFormatError;
use crate::factor_builder::DeclaredFactors;
use crate::parser::Row;

/// Name a second leading column is expected to carry.
pub const EXTERNAL_ID_COLUMN: &str = "ExternalID";

/// Where the sample identifier, the optional external id and each factor live in the table.
///
/// With `N` declared factors the table is `N + 1` columns wide (sample, factors...) or `N + 2` columns wide
/// (sample, external id, factors...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    width: usize,
    external_id_column: Option<usize>,
    factor_columns: Vec<(usize, FactorName)>,
}

impl ColumnLayout {
    pub const SAMPLE_COLUMN: usize = 0;

    pub fn from_header(header: &Row, declared: &DeclaredFactors) -> Result<Self, DesignFileFormatError> {
        let width = header.width();
        check_column_count(header, declared.len())?;

        let leading = width - declared.len();
        if leading == 0 {
            return Err(DesignFileFormatError::MissingSampleColumn {
                line: header.line,
            });
        }

        let external_id_column = match leading {
            2 => {
                let name = header.cell(1);
                if !name.eq_ignore_ascii_case(EXTERNAL_ID_COLUMN) {
                    warn!(
                        "Treating second column as external id. line: {}, column: '{}'",
                        header.line, name
                    );
                }
                Some(1)
            }
            _ => None,
        };

        let mut seen: BTreeSet<FactorName> = BTreeSet::new();
        let mut factor_columns = vec![];
        for column in leading..width {
            let text = header.cell(column);
            let factor = declared
                .get(text)
                .map(|declaration| declaration.name.clone())
                .ok_or_else(|| DesignFileFormatError::UnknownFactorColumn {
                    line: header.line,
                    column: column + 1,
                    text: text.to_string(),
                })?;

            if !seen.insert(factor.clone()) {
                return Err(DesignFileFormatError::DuplicateFactorColumn {
                    line: header.line,
                    factor,
                });
            }
            factor_columns.push((column, factor));
        }

        debug!(
            "Column layout. width: {}, external_id_column: {:?}, factors: {}",
            width,
            external_id_column,
            factor_columns.len()
        );

        Ok(Self {
            width,
            external_id_column,
            factor_columns,
        })
    }

    /// Every row must have exactly the header's width.
    pub fn check_row(&self, row: &Row) -> Result<(), DesignFileFormatError> {
        check_column_count(row, self.factor_columns.len())?;

        if row.width() != self.width {
            return Err(DesignFileFormatError::RowWidthMismatch {
                line: row.line,
                columns: row.width(),
                expected: self.width,
            });
        }

        if row
            .cell(Self::SAMPLE_COLUMN)
            .is_empty()
        {
            return Err(DesignFileFormatError::BlankSampleIdentifier {
                line: row.line,
            });
        }

        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn external_id_column(&self) -> Option<usize> {
        self.external_id_column
    }

    pub fn factor_columns(&self) -> &[(usize, FactorName)] {
        &self.factor_columns
    }

    pub fn factor_names(&self) -> impl Iterator<Item = &FactorName> {
        self.factor_columns
            .iter()
            .map(|(_, name)| name)
    }
}

fn check_column_count(row: &Row, declared: usize) -> Result<(), DesignFileFormatError> {
    if row.width() < declared || row.width() > declared + 2 {
        return Err(DesignFileFormatError::ColumnCountMismatch {
            line: row.line,
            columns: row.width(),
            declared,
        });
    }

    Ok(())
}

#[cfg(test)]
mod column_layout_tests {
    use rstest::rstest;

    use crate::error::DesignFileFormatError;
    use crate::factor_builder::DeclaredFactors;
    use crate::layout::ColumnLayout;
    use crate::parser::{FactorLine, Row};

    fn declared() -> DeclaredFactors {
        DeclaredFactors::from_lines(&[
            FactorLine {
                line: 1,
                text: "Age : Category=age Type=Continuous".to_string(),
            },
            FactorLine {
                line: 2,
                text: "Treatment : Category=treatment Type=Categorical".to_string(),
            },
        ])
        .unwrap()
    }

    fn row(line: usize, cells: &[&str]) -> Row {
        Row {
            line,
            cells: cells
                .iter()
                .map(|cell| cell.to_string())
                .collect(),
        }
    }

    #[test]
    fn sample_column_only() {
        // when
        let layout = ColumnLayout::from_header(&row(3, &["Bioassay", "Treatment", "Age"]), &declared()).unwrap();

        // then
        assert_eq!(layout.width(), 3);
        assert_eq!(layout.external_id_column(), None);
        assert_eq!(
            layout
                .factor_columns()
                .iter()
                .map(|(column, name)| (*column, name.as_str()))
                .collect::<Vec<_>>(),
            vec![(1, "Treatment"), (2, "Age")]
        );
    }

    #[test]
    fn sample_and_external_id_columns() {
        // when
        let layout =
            ColumnLayout::from_header(&row(3, &["Bioassay", "ExternalID", "Age", "Treatment"]), &declared()).unwrap();

        // then
        assert_eq!(layout.external_id_column(), Some(1));
        assert_eq!(layout.factor_columns()[0].0, 2);
    }

    #[rstest]
    #[case(&["Age"])]
    #[case(&["Bioassay", "ExternalID", "Other", "Age", "Treatment"])]
    fn column_count_out_of_range(#[case] cells: &[&str]) {
        assert!(matches!(
            ColumnLayout::from_header(&row(3, cells), &declared()),
            Err(DesignFileFormatError::ColumnCountMismatch {
                line: 3,
                declared: 2,
                ..
            })
        ));
    }

    #[test]
    fn factor_columns_only() {
        assert_eq!(
            ColumnLayout::from_header(&row(3, &["Age", "Treatment"]), &declared()),
            Err(DesignFileFormatError::MissingSampleColumn {
                line: 3
            })
        );
    }

    #[test]
    fn unknown_factor_column() {
        assert_eq!(
            ColumnLayout::from_header(&row(3, &["Bioassay", "Age", "Diet"]), &declared()),
            Err(DesignFileFormatError::UnknownFactorColumn {
                line: 3,
                column: 3,
                text: "Diet".to_string(),
            })
        );
    }

    #[test]
    fn duplicate_factor_column() {
        assert_eq!(
            ColumnLayout::from_header(&row(3, &["Bioassay", "Age", "Age"]), &declared()),
            Err(DesignFileFormatError::DuplicateFactorColumn {
                line: 3,
                factor: "Age".parse().unwrap(),
            })
        );
    }

    #[rstest]
    #[case(row(4, &["f-aa", "50", "control"]), Ok(()))]
    #[case(row(4, &["f-aa", "50"]), Err(DesignFileFormatError::RowWidthMismatch { line: 4, columns: 2, expected: 3 }))]
    #[case(row(4, &["f-aa", "x", "50", "control", "y"]), Err(DesignFileFormatError::ColumnCountMismatch { line: 4, columns: 5, declared: 2 }))]
    #[case(row(4, &[" ", "50", "control"]), Err(DesignFileFormatError::BlankSampleIdentifier { line: 4 }))]
    fn check_row(#[case] data_row: Row, #[case] expected_result: Result<(), DesignFileFormatError>) {
        // given
        let layout = ColumnLayout::from_header(&row(3, &["Bioassay", "Age", "Treatment"]), &declared()).unwrap();

        // expect
        assert_eq!(layout.check_row(&data_row), expected_result);
    }
}
