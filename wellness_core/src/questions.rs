//! Training questions: CSV import and lookup helpers.
//!
//! Questions are authored in a spreadsheet and exported as CSV with the
//! columns `Relationship Type`, `Question` and `Final out put`. Import assigns
//! sequential ids (`Q1`, `Q2`, ...) in file order.

use crate::{Record, RecordSink, Result};
use serde::Deserialize;
use std::path::Path;

/// Partition attribute of the questions table
pub const PARTITION_ATTRIBUTE: &str = "RelationshipType";
/// Attribute filtered on when a category is requested
pub const CATEGORY_ATTRIBUTE: &str = "Category";
/// Category given to imported questions
pub const DEFAULT_CATEGORY: &str = "General";
/// Fixed answer scale
pub const ANSWER_OPTIONS: [u8; 5] = [1, 2, 3, 4, 5];

/// CSV row format of the question export
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Relationship Type")]
    relationship_type: String,
    #[serde(rename = "Question")]
    question: String,
    #[serde(rename = "Final out put")]
    final_output: String,
}

fn to_record(row: CsvRow, number: usize) -> Record {
    Record::new()
        .with(PARTITION_ATTRIBUTE, row.relationship_type.trim())
        .with("QuestionID", format!("Q{}", number))
        .with("QuestionText", row.question)
        .with("AnswerOptions", ANSWER_OPTIONS.to_vec())
        .with(CATEGORY_ATTRIBUTE, DEFAULT_CATEGORY)
        .with("FinalOutput", row.final_output)
}

/// Parse the question export into records without writing them anywhere
pub fn read_questions(csv_path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_path(csv_path)?;

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let row = row?;
        records.push(to_record(row, records.len() + 1));
    }

    tracing::debug!("Parsed {} questions from {:?}", records.len(), csv_path);
    Ok(records)
}

/// Import the question export into a sink, returning the number written
pub async fn import_questions(csv_path: &Path, sink: &dyn RecordSink) -> Result<usize> {
    let records = read_questions(csv_path)?;
    let count = records.len();

    for record in records {
        sink.put(record).await?;
    }

    tracing::info!("Imported {} questions from {:?}", count, csv_path);
    Ok(count)
}

/// Keep only records whose category matches, when a category is given
pub fn filter_by_category(records: Vec<Record>, category: Option<&str>) -> Vec<Record> {
    match category {
        Some(category) => records
            .into_iter()
            .filter(|r| r.text(CATEGORY_ATTRIBUTE) == Some(category))
            .collect(),
        None => records,
    }
}
