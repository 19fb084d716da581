//! Relational store provider.
//!
//! One row per submission in `contact_submissions`, `violation_submissions`
//! or `board_nominations`. Rows are never updated or deleted here. Absent
//! optional values are stored as NULL.

use async_trait::async_trait;
use intake_forms::model::{BoardNomination, ContactSubmission, Submission, ViolationReport};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{Delivery, Provider, ProviderError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS contact_submissions (
        id UUID PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT,
        company TEXT,
        inquiry_type TEXT NOT NULL,
        property_address TEXT,
        number_of_units BIGINT,
        board_position TEXT,
        years_at_property DOUBLE PRECISION,
        previous_experience TEXT,
        message TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS violation_submissions (
        id UUID PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        reporter_name TEXT NOT NULL,
        reporter_unit_address TEXT NOT NULL,
        reporter_contact TEXT NOT NULL,
        report_date DATE NOT NULL,
        violator_name TEXT,
        violator_unit TEXT,
        violation_types TEXT[] NOT NULL,
        violation_details TEXT NOT NULL,
        reported_before TEXT NOT NULL,
        requested_action TEXT NOT NULL,
        signature TEXT NOT NULL,
        acknowledged_sharing BOOLEAN NOT NULL,
        certified_accurate BOOLEAN NOT NULL,
        acknowledged_contact BOOLEAN NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS board_nominations (
        id UUID PRIMARY KEY,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        nominee_name TEXT NOT NULL,
        nominee_email TEXT NOT NULL,
        nominee_phone TEXT NOT NULL,
        nominee_unit_address TEXT NOT NULL,
        years_at_property DOUBLE PRECISION,
        ownership_type TEXT NOT NULL,
        current_employment TEXT,
        previous_board_experience TEXT,
        relevant_skills TEXT NOT NULL,
        motivation TEXT NOT NULL,
        time_commitment TEXT NOT NULL,
        "references" TEXT,
        signature TEXT NOT NULL,
        acknowledged_terms BOOLEAN NOT NULL,
        acknowledged_commitment BOOLEAN NOT NULL,
        acknowledged_attendance BOOLEAN NOT NULL
    )
    "#,
];

const NAME: &str = "store";

pub struct StoreProvider {
    pool: PgPool,
}

impl StoreProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the submission tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&self.pool).await?;
        }
        info!("submission tables ready");
        Ok(())
    }

    async fn insert_contact(&self, c: &ContactSubmission) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO contact_submissions
                (id, name, email, phone, company, inquiry_type, property_address,
                 number_of_units, board_position, years_at_property,
                 previous_experience, message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(id)
        .bind(&c.name)
        .bind(&c.email)
        .bind(c.phone.as_deref())
        .bind(c.company.as_deref())
        .bind(c.inquiry_type.as_str())
        .bind(c.property_address.as_deref())
        .bind(c.number_of_units.map(i64::from))
        .bind(c.board_position.map(|p| p.as_str()))
        .bind(c.years_at_property.map(|y| y.as_years()))
        .bind(c.previous_experience.map(|e| e.as_str()))
        .bind(&c.message)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_violation(&self, v: &ViolationReport) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        let violation_types: Vec<String> = v
            .violation_types
            .iter()
            .map(|t| t.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO violation_submissions
                (id, reporter_name, reporter_unit_address, reporter_contact,
                 report_date, violator_name, violator_unit, violation_types,
                 violation_details, reported_before, requested_action, signature,
                 acknowledged_sharing, certified_accurate, acknowledged_contact)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(id)
        .bind(&v.reporter_name)
        .bind(&v.reporter_unit_address)
        .bind(&v.reporter_contact)
        .bind(v.report_date)
        .bind(v.violator_name.as_deref())
        .bind(v.violator_unit.as_deref())
        .bind(violation_types)
        .bind(&v.violation_details)
        .bind(v.reported_before.as_str())
        .bind(v.requested_action.as_str())
        .bind(&v.signature)
        .bind(v.acknowledged_sharing)
        .bind(v.certified_accurate)
        .bind(v.acknowledged_contact)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_nomination(&self, n: &BoardNomination) -> Result<Uuid, sqlx::Error> {
        let id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO board_nominations
                (id, nominee_name, nominee_email, nominee_phone, nominee_unit_address,
                 years_at_property, ownership_type, current_employment,
                 previous_board_experience, relevant_skills, motivation,
                 time_commitment, "references", signature, acknowledged_terms,
                 acknowledged_commitment, acknowledged_attendance)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(id)
        .bind(&n.nominee_name)
        .bind(&n.nominee_email)
        .bind(&n.nominee_phone)
        .bind(&n.nominee_unit_address)
        .bind(n.years_at_property.map(|y| y.as_years()))
        .bind(n.ownership_type.as_str())
        .bind(non_blank(&n.current_employment))
        .bind(non_blank(&n.previous_board_experience))
        .bind(&n.relevant_skills)
        .bind(&n.motivation)
        .bind(n.time_commitment.as_str())
        .bind(non_blank(&n.references))
        .bind(&n.signature)
        .bind(n.acknowledged_terms)
        .bind(n.acknowledged_commitment)
        .bind(n.acknowledged_attendance)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

fn non_blank(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

#[async_trait]
impl Provider for StoreProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn deliver(&self, submission: &Submission) -> Result<Delivery, ProviderError> {
        let id = match submission {
            Submission::Contact(c) => self.insert_contact(c).await?,
            Submission::Violation(v) => self.insert_violation(v).await?,
            Submission::BoardNomination(n) => self.insert_nomination(n).await?,
        };
        debug!(%id, form_type = %submission.form_type(), "submission stored");
        Ok(Delivery {
            id: Some(id.to_string()),
        })
    }
}
