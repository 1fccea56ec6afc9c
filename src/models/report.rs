use serde::Deserialize;
use serde_json::Value;
use super::{de, Task};

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ReportClient {
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "de::nullable_string")]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportCategory {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// Per-client report with tasks grouped by category, in the order the API sent them.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawReport")]
pub struct ClientReport {
    pub client: ReportClient,
    pub generated_at: String,
    pub categories: Vec<ReportCategory>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    client: ReportClient,
    #[serde(default, deserialize_with = "de::nullable_string")]
    generated_at: String,
    #[serde(default)]
    tasks: Value,
}

impl TryFrom<RawReport> for ClientReport {
    type Error = serde_json::Error;

    fn try_from(raw: RawReport) -> Result<Self, Self::Error> {
        // An empty grouping is encoded as [] rather than {}
        let categories = match raw.tasks {
            Value::Object(groups) => groups
                .into_iter()
                .map(|(name, tasks)| {
                    Ok(ReportCategory {
                        name,
                        tasks: serde_json::from_value(tasks)?,
                    })
                })
                .collect::<Result<Vec<_>, serde_json::Error>>()?,
            _ => Vec::new(),
        };

        Ok(ClientReport {
            client: raw.client,
            generated_at: raw.generated_at,
            categories,
        })
    }
}

impl ClientReport {
    pub fn task_count(&self) -> usize {
        self.categories.iter().map(|c| c.tasks.len()).sum()
    }

    /// Name of the downloadable text file.
    pub fn file_name(&self) -> String {
        // each run of whitespace becomes one '_', including leading and trailing runs
        let mut name = String::with_capacity(self.client.name.len());
        let mut in_run = false;
        for c in self.client.name.chars() {
            if c.is_whitespace() {
                if !in_run {
                    name.push('_');
                }
                in_run = true;
            } else {
                name.push(c);
                in_run = false;
            }
        }
        format!("{}_Report.txt", name)
    }

    /// Plain-text rendition offered as a download.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("CLIENT REPORT\n");
        out.push_str(&"=".repeat(37));
        out.push_str("\n\n");
        out.push_str(&format!("Client: {}\n", self.client.name));
        out.push_str(&format!("Client Code: {}\n", self.client.code));
        out.push_str(&format!("Generated At: {}\n\n", super::format_timestamp(&self.generated_at)));
        out.push_str(&"=".repeat(37));
        out.push_str("\n\n");

        for category in &self.categories {
            out.push_str(&category.name);
            out.push('\n');
            out.push_str(&"-".repeat(50));
            out.push('\n');
            for task in &category.tasks {
                out.push_str(&format!("  • {}\n", task.task_name));
                out.push_str(&format!("    Status: {}\n", task.status.label()));
                out.push_str(&format!(
                    "    Updated Till: {}\n",
                    task.updated_till.as_deref().unwrap_or("Not updated")
                ));
                out.push_str(&format!("    Assigned To: {}\n", task.employee_name));
                out.push_str(&format!("    Approval: {}\n\n", task.approval_status.as_str()));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> ClientReport {
        serde_json::from_value(json!({
            "client": {"name": "Shree  Ganesh Traders", "code": "SGT01"},
            "generatedAt": "2025-02-10 09:15:00",
            "tasks": {
                "Income Tax": [
                    {"id": 1, "taskName": "ITR filing", "status": "in_progress",
                     "approvalStatus": "pending", "employeeName": "Ravi", "updatedTill": "2025-01"}
                ],
                "Audit": [
                    {"id": 2, "taskName": "Stock audit", "status": "completed",
                     "approvalStatus": "approved", "employeeName": "Asha"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn categories_keep_api_order() {
        let report = report();
        let names: Vec<_> = report.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Income Tax", "Audit"]);
        assert_eq!(report.task_count(), 2);
    }

    #[test]
    fn empty_grouping_sent_as_array() {
        let report: ClientReport = serde_json::from_value(json!({
            "client": {"name": "Idle Co", "code": "IDLE"},
            "generatedAt": "2025-02-10T09:15:00Z",
            "tasks": []
        }))
        .unwrap();
        assert!(report.categories.is_empty());
    }

    #[test]
    fn text_export_layout() {
        let text = report().to_text();
        assert!(text.starts_with("CLIENT REPORT\n=====================================\n\n"));
        assert!(text.contains("Client Code: SGT01\n"));
        assert!(text.contains("Generated At: 2025-02-10 09:15\n"));
        assert!(text.contains("Income Tax\n--------------------------------------------------\n"));
        assert!(text.contains("  • ITR filing\n    Status: in progress\n    Updated Till: 2025-01\n"));
        assert!(text.contains("    Updated Till: Not updated\n    Assigned To: Asha\n    Approval: approved\n"));
    }

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(report().file_name(), "Shree_Ganesh_Traders_Report.txt");

        let mut padded = report();
        padded.client.name = " Acme \t Co_ Ltd ".into();
        assert_eq!(padded.file_name(), "_Acme_Co__Ltd__Report.txt");
    }
}
