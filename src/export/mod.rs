use crate::domain::ports::Storage;
use crate::utils::error::{CheckError, Result};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::str::FromStr;

const EXPORTED_EXTENSIONS: [&str; 4] = [".json", ".csv", ".jsonl", ".txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    /// JSONL records shaped for LLM training sets.
    LlmJsonl,
    /// Human-readable text blocks.
    LlmText,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "llm_jsonl" | "jsonl" => Ok(ExportFormat::LlmJsonl),
            "llm_text" | "text" => Ok(ExportFormat::LlmText),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Writes scrape results and reports to timestamped files behind the
/// `Storage` port.
pub struct DataExporter<S: Storage> {
    storage: S,
    output_dir: String,
}

impl<S: Storage> DataExporter<S> {
    pub fn new(storage: S, output_dir: String) -> Self {
        Self {
            storage,
            output_dir,
        }
    }

    pub async fn export(&self, records: &[Value], format: ExportFormat) -> Result<String> {
        match format {
            ExportFormat::Json => self.export_json(records, None).await,
            ExportFormat::Csv => self.export_csv(records, None).await,
            ExportFormat::LlmJsonl => self.export_jsonl(records).await,
            ExportFormat::LlmText => self.export_text(records).await,
        }
    }

    pub async fn export_json(&self, records: &[Value], filename: Option<&str>) -> Result<String> {
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("scraped_data_{}.json", timestamp()));

        let wrapped = json!({
            "metadata": {
                "exported_at": Utc::now().to_rfc3339(),
                "total_records": records.len(),
                "format": "json",
            },
            "data": records,
        });

        let body = serde_json::to_vec_pretty(&wrapped)?;
        self.storage.write_file(&filename, &body).await?;
        Ok(self.full_path(&filename))
    }

    /// Header is the sorted union of keys across all records, with empty
    /// cells where a record lacks a key.
    pub async fn export_csv(&self, records: &[Value], filename: Option<&str>) -> Result<String> {
        if records.is_empty() {
            return Err(CheckError::ProcessingError {
                message: "No data to export".to_string(),
            });
        }

        let mut fields = BTreeSet::new();
        for record in records {
            let Some(object) = record.as_object() else {
                return Err(CheckError::ProcessingError {
                    message: "CSV export requires object-shaped records".to_string(),
                });
            };
            fields.extend(object.keys().cloned());
        }
        let fields: Vec<String> = fields.into_iter().collect();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&fields)?;
        for record in records {
            let row: Vec<String> = fields
                .iter()
                .map(|field| match record.get(field) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect();
            writer.write_record(&row)?;
        }
        let body = writer.into_inner().map_err(|e| CheckError::ProcessingError {
            message: format!("CSV buffer error: {}", e),
        })?;

        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("scraped_data_{}.csv", timestamp()));
        self.storage.write_file(&filename, &body).await?;
        Ok(self.full_path(&filename))
    }

    /// One training record per line: a prompt-ish `input`, the raw record
    /// as `output`, plus source and timestamp.
    pub async fn export_jsonl(&self, records: &[Value]) -> Result<String> {
        let mut lines = String::new();
        for record in records {
            let input = format!(
                "Business information from {}",
                record
                    .get("search_query")
                    .and_then(Value::as_str)
                    .unwrap_or("web scraping")
            );
            let training_record = json!({
                "input": input,
                "output": serde_json::to_string(record)?,
                "source": "web_scraper",
                "timestamp": record
                    .get("scraped_at")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| Utc::now().to_rfc3339()),
            });
            lines.push_str(&serde_json::to_string(&training_record)?);
            lines.push('\n');
        }

        let filename = format!("llm_training_data_{}.jsonl", timestamp());
        self.storage.write_file(&filename, lines.as_bytes()).await?;
        Ok(self.full_path(&filename))
    }

    pub async fn export_text(&self, records: &[Value]) -> Result<String> {
        let mut body = String::new();
        for record in records {
            let field = |key: &str, fallback: &str| {
                record
                    .get(key)
                    .and_then(Value::as_str)
                    .unwrap_or(fallback)
                    .to_string()
            };
            body.push_str(&format!("Business: {}\n", field("name", "Unknown")));
            body.push_str(&format!("Rating: {}\n", field("rating", "No rating")));
            body.push_str(&format!("Address: {}\n", field("address", "No address")));
            body.push_str(&format!("Query: {}\n", field("search_query", "Unknown")));
            body.push_str("---\n");
        }

        let filename = format!("llm_training_data_{}.txt", timestamp());
        self.storage.write_file(&filename, body.as_bytes()).await?;
        Ok(self.full_path(&filename))
    }

    /// Persists an audit report as pretty JSON.
    pub async fn export_report(&self, report: &Value, filename: Option<&str>) -> Result<String> {
        let filename = filename
            .map(str::to_string)
            .unwrap_or_else(|| format!("bug_report_{}.json", timestamp()));
        let body = serde_json::to_vec_pretty(report)?;
        self.storage.write_file(&filename, &body).await?;
        Ok(self.full_path(&filename))
    }

    pub async fn list_exported_files(&self) -> Result<Vec<String>> {
        let names = self.storage.list_files().await?;
        Ok(names
            .into_iter()
            .filter(|name| {
                EXPORTED_EXTENSIONS
                    .iter()
                    .any(|ext| name.ends_with(ext))
            })
            .map(|name| self.full_path(&name))
            .collect())
    }

    fn full_path(&self, filename: &str) -> String {
        format!("{}/{}", self.output_dir.trim_end_matches('/'), filename)
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;
    use serde_json::json;

    fn exporter_in(dir: &tempfile::TempDir) -> DataExporter<LocalStorage> {
        let base = dir.path().to_string_lossy().to_string();
        DataExporter::new(LocalStorage::new(base.clone()), base)
    }

    fn sample_records() -> Vec<Value> {
        vec![
            json!({"name": "Cafe A", "rating": "4.5 stars", "address": "1 Main St",
                   "search_query": "coffee", "scraped_at": "2024-05-01 10:00:00"}),
            json!({"name": "Cafe B", "address": "2 Side St", "search_query": "coffee"}),
        ]
    }

    #[tokio::test]
    async fn test_export_json_wraps_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);

        let path = exporter
            .export_json(&sample_records(), Some("out.json"))
            .await
            .unwrap();
        assert!(path.ends_with("/out.json"));

        let raw = std::fs::read_to_string(dir.path().join("out.json")).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["metadata"]["total_records"], 2);
        assert_eq!(parsed["metadata"]["format"], "json");
        assert_eq!(parsed["data"][0]["name"], "Cafe A");
    }

    #[tokio::test]
    async fn test_export_csv_unions_keys_with_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);

        exporter
            .export_csv(&sample_records(), Some("out.csv"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        let mut lines = raw.lines();
        assert_eq!(
            lines.next().unwrap(),
            "address,name,rating,scraped_at,search_query"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1 Main St,Cafe A,4.5 stars,2024-05-01 10:00:00,coffee"
        );
        // Cafe B lacks rating and scraped_at
        assert_eq!(lines.next().unwrap(), "2 Side St,Cafe B,,,coffee");
    }

    #[tokio::test]
    async fn test_export_csv_rejects_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);
        assert!(exporter.export_csv(&[], None).await.is_err());
    }

    #[tokio::test]
    async fn test_export_jsonl_training_layout() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);

        let path = exporter.export_jsonl(&sample_records()).await.unwrap();
        let filename = path.rsplit('/').next().unwrap();
        let raw = std::fs::read_to_string(dir.path().join(filename)).unwrap();

        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["input"], "Business information from coffee");
        assert_eq!(first["source"], "web_scraper");
        assert_eq!(first["timestamp"], "2024-05-01 10:00:00");
        let embedded: Value =
            serde_json::from_str(first["output"].as_str().unwrap()).unwrap();
        assert_eq!(embedded["name"], "Cafe A");
    }

    #[tokio::test]
    async fn test_export_text_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);

        let path = exporter.export_text(&sample_records()).await.unwrap();
        let filename = path.rsplit('/').next().unwrap();
        let raw = std::fs::read_to_string(dir.path().join(filename)).unwrap();

        assert!(raw.contains("Business: Cafe A\n"));
        assert!(raw.contains("Rating: No rating\n")); // Cafe B fallback
        assert_eq!(raw.matches("---\n").count(), 2);
    }

    #[tokio::test]
    async fn test_list_exported_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter_in(&dir);

        exporter
            .export_json(&sample_records(), Some("a.json"))
            .await
            .unwrap();
        std::fs::write(dir.path().join("notes.md"), "skip me").unwrap();

        let files = exporter.list_exported_files().await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("/a.json"));
    }

    #[test]
    fn test_format_parsing_accepts_aliases() {
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("llm_jsonl".parse(), Ok(ExportFormat::LlmJsonl));
        assert_eq!("jsonl".parse(), Ok(ExportFormat::LlmJsonl));
        assert_eq!("llm_text".parse(), Ok(ExportFormat::LlmText));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
