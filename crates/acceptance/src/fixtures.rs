//! Fixture tables: the products every scenario starts from.
//!
//! Tables use the Gherkin data-table layout, a header row naming the columns
//! followed by one row per product:
//!
//! ```text
//! | name     | category | count |
//! | Asus2500 | Laptop   | 234   |
//! ```

use serde::Serialize;

use crate::error::{HarnessError, HarnessResult};

/// Products loaded before every scenario.
pub const STANDARD_PRODUCTS: &str = "
| name     | category  | color | count | price  | description |
| Asus2500 | Laptop    | wewef | 234   | qerwrw | erwwfwf     |
| GE4509   | Microwave | white | 34324 | wewef  | fwfwsxdws   |
| Sierra   | Bag       | blue  | 12    | 1234   | Cool Bag    |
";

/// One product as submitted to the create endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureRow {
    pub name: String,
    pub category: String,
    pub color: String,
    pub count: String,
    pub price: String,
    pub description: String,
}

impl FixtureRow {
    fn set(&mut self, column: &str, value: &str) -> HarnessResult<()> {
        let slot = match column {
            "name" => &mut self.name,
            "category" => &mut self.category,
            "color" => &mut self.color,
            "count" => &mut self.count,
            "price" => &mut self.price,
            "description" => &mut self.description,
            other => {
                return Err(HarnessError::Config(format!(
                    "unknown fixture column '{other}'"
                )))
            }
        };
        *slot = value.to_string();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureTable {
    rows: Vec<FixtureRow>,
}

fn cells(line: &str) -> Option<Vec<&str>> {
    let inner = line.trim().strip_prefix('|')?.strip_suffix('|')?;
    Some(inner.split('|').map(str::trim).collect())
}

impl FixtureTable {
    pub fn parse(text: &str) -> HarnessResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let header_line = lines
            .next()
            .ok_or_else(|| HarnessError::Config("fixture table is empty".to_string()))?;
        let header = cells(header_line).ok_or_else(|| {
            HarnessError::Config(format!("malformed fixture header: {header_line}"))
        })?;
        if !header.contains(&"name") {
            return Err(HarnessError::Config(
                "fixture table needs a 'name' column".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for (n, line) in lines.enumerate() {
            let values = cells(line)
                .ok_or_else(|| HarnessError::Config(format!("malformed fixture row {}: {line}", n + 1)))?;
            if values.len() != header.len() {
                return Err(HarnessError::Config(format!(
                    "fixture row {} has {} cells, header has {}",
                    n + 1,
                    values.len(),
                    header.len()
                )));
            }

            let mut row = FixtureRow::default();
            for (column, value) in header.iter().zip(values) {
                row.set(column, value)?;
            }
            rows.push(row);
        }

        Ok(Self { rows })
    }

    pub fn standard() -> HarnessResult<Self> {
        Self::parse(STANDARD_PRODUCTS)
    }

    pub fn rows(&self) -> &[FixtureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_has_three_products() {
        let table = FixtureTable::standard().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Asus2500", "GE4509", "Sierra"]);

        let asus = &table.rows()[0];
        assert_eq!(asus.category, "Laptop");
        assert_eq!(asus.count, "234");
        assert_eq!(asus.price, "qerwrw");
        assert_eq!(asus.description, "erwwfwf");
        assert_eq!(asus.color, "wewef");
    }

    #[test]
    fn missing_columns_become_empty_text() {
        let table = FixtureTable::parse("| name | category |\n| Sierra | Bag |").unwrap();
        assert_eq!(table.rows()[0].price, "");
        assert_eq!(table.rows()[0].category, "Bag");
    }

    #[test]
    fn cells_may_contain_spaces() {
        let table = FixtureTable::parse("| name | description |\n| Sierra | Cool Bag |").unwrap();
        assert_eq!(table.rows()[0].description, "Cool Bag");
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = FixtureTable::parse("| name | category |\n| Sierra |").unwrap_err();
        assert!(err.to_string().contains("has 1 cells"));
    }

    #[test]
    fn rejects_unknown_columns() {
        let err = FixtureTable::parse("| name | weight |\n| Sierra | 2kg |").unwrap_err();
        assert!(err.to_string().contains("unknown fixture column 'weight'"));
    }

    #[test]
    fn rejects_tables_without_names() {
        let err = FixtureTable::parse("| category |\n| Bag |").unwrap_err();
        assert!(matches!(err, HarnessError::Config(_)));
    }

    #[test]
    fn rows_serialize_with_text_numbers() {
        let json = serde_json::to_value(&FixtureTable::standard().unwrap().rows()[1]).unwrap();
        assert_eq!(json["name"], "GE4509");
        assert_eq!(json["count"], "34324");
    }
}
