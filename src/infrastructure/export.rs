use super::InfraError;
use crate::domain::Application;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// One CSV line per application. Nested records are flattened and optional
/// values become empty cells.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u64,
    created_at: String,
    phone: &'a str,
    amount: u64,
    term_months: u32,
    purpose: &'a str,
    income: u64,
    workplace: &'a str,
    experience_years: Option<u32>,
    status: String,
    monthly_payment: u64,
    premium_service_cost: u64,
    payout_card: Option<u64>,
}

impl<'a> From<&'a Application> for ExportRow<'a> {
    fn from(app: &'a Application) -> Self {
        Self {
            id: app.id,
            created_at: app.created_at.to_rfc3339(),
            phone: &app.user_id,
            amount: app.amount,
            term_months: app.term_months,
            purpose: app.purpose.map(|purpose| purpose.key()).unwrap_or(""),
            income: app.income,
            workplace: &app.employment.workplace,
            experience_years: app.employment.experience_years,
            status: app.status.to_string(),
            monthly_payment: app.monthly_payment,
            premium_service_cost: app.premium_service_cost,
            payout_card: app.payout_card,
        }
    }
}

pub struct ApplicationExporter;

impl ApplicationExporter {
    /// Writes `applications` to `filename`: pretty JSON for `.json`, CSV
    /// with a header row otherwise. Returns the filename written.
    pub fn export(applications: &[Application], filename: &str) -> Result<String, InfraError> {
        let path = Path::new(filename);
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::export_json(applications, path)?;
        } else {
            Self::export_csv(applications, path)?;
        }

        info!(count = applications.len(), file = filename, "applications exported");
        Ok(filename.to_string())
    }

    pub fn export_csv(applications: &[Application], path: &Path) -> Result<(), InfraError> {
        let mut writer = csv::Writer::from_path(path)?;
        if applications.is_empty() {
            // serialize() writes the header with the first row only
            writer.write_record([
                "id",
                "created_at",
                "phone",
                "amount",
                "term_months",
                "purpose",
                "income",
                "workplace",
                "experience_years",
                "status",
                "monthly_payment",
                "premium_service_cost",
                "payout_card",
            ])?;
        }
        for app in applications {
            writer.serialize(ExportRow::from(app))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn export_json(applications: &[Application], path: &Path) -> Result<(), InfraError> {
        let json = serde_json::to_string_pretty(applications)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationStatus, Employment, LoanPurpose, Passport};
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn application(id: u64, premium: bool) -> Application {
        Application {
            id,
            user_id: "+7 999 123-45-67".to_string(),
            amount: 50_000,
            term_months: 12,
            purpose: Some(LoanPurpose::Education),
            income: 80_000,
            employment: Employment {
                workplace: "Acme, LLC".to_string(),
                experience_years: Some(2),
            },
            passport: Passport {
                series: "1234".to_string(),
                ..Passport::default()
            },
            payout_card: None,
            status: ApplicationStatus::Pending,
            monthly_payment: 994,
            premium_service: premium,
            premium_service_cost: if premium { 499 } else { 0 },
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_export_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("applications.csv");
        let filename = path.to_string_lossy().into_owned();

        let written =
            ApplicationExporter::export(&[application(1, false), application(2, true)], &filename).unwrap();
        assert_eq!(written, filename);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,created_at,phone,amount"));
        assert!(lines[1].starts_with("1,2024-05-01T10:00:00+00:00,+7 999 123-45-67,50000,12,education"));
        assert!(lines[1].contains("\"Acme, LLC\""));
        assert!(lines[2].contains(",pending,994,499,"));
    }

    #[test]
    fn test_export_empty_csv_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        ApplicationExporter::export(&[], &path.to_string_lossy()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("id,"));
    }

    #[test]
    fn test_export_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("applications.JSON");
        ApplicationExporter::export(&[application(7, true)], &path.to_string_lossy()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["id"], 7);
        assert_eq!(value[0]["status"], "pending");
        assert_eq!(value[0]["purpose"], "education");
        assert_eq!(value[0]["premium_service_cost"], 499);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let result = ApplicationExporter::export(&[application(1, false)], &path.to_string_lossy());
        assert!(result.is_err());
    }
}
