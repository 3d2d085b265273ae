use anyhow::Context;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::input;
use crate::models::CheckInRecord;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_user(pool: &PgPool, email: &str, display_name: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO wellness.users (id, email, display_name)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET display_name = EXCLUDED.display_name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(display_name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to upsert user {email}"))?
    .get("id");

    Ok(id)
}

/// Inserts one check-in, returning false when `source_key` was already imported.
async fn insert_check_in(
    pool: &PgPool,
    user_id: Uuid,
    entry_type: &str,
    value: f64,
    note: Option<&str>,
    created_at: DateTime<Utc>,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO wellness.check_ins
        (id, user_id, entry_type, value, note, created_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(entry_type)
    .bind(value)
    .bind(note)
    .bind(created_at)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Demo series: one user trending well, one under sustained strain.
pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let users = [
        ("avery.lee@example.com", "Avery Lee", [6.0, 4.0, 6.5, 7.0]),
        ("jules.moreno@example.com", "Jules Moreno", [2.5, 8.5, 2.5, 2.0]),
    ];
    let entry_types = ["mood", "stress", "energy", "sleep_quality"];
    let today = Utc::now()
        .date_naive()
        .and_hms_opt(8, 0, 0)
        .context("invalid seed time")?
        .and_utc();

    let mut inserted = 0usize;
    for (email, name, baselines) in users {
        let user_id = upsert_user(pool, email, name).await?;
        for days_ago in 0..21i64 {
            let created_at = today - Duration::days(days_ago);
            for (entry_type, baseline) in entry_types.iter().zip(baselines) {
                let wobble = ((days_ago % 4) as f64 - 1.5) * 0.5;
                let value = (baseline + wobble).clamp(1.0, 10.0);
                let source_key = format!("seed-{email}-{entry_type}-{}", created_at.date_naive());
                if insert_check_in(
                    pool,
                    user_id,
                    entry_type,
                    value,
                    None,
                    created_at,
                    &source_key,
                )
                .await?
                {
                    inserted += 1;
                }
            }
        }
    }

    tracing::info!(inserted, "seeded demo check-ins");
    Ok(inserted)
}

pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let rows = input::read_csv(csv_path)?;
    let mut inserted = 0usize;

    for row in rows {
        let user_id = upsert_user(pool, &row.email, &row.display_name).await?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        if insert_check_in(
            pool,
            user_id,
            &row.entry_type,
            row.value,
            row.note.as_deref(),
            row.created_at,
            &source_key,
        )
        .await?
        {
            inserted += 1;
        }
    }

    tracing::info!(inserted, path = %csv_path.display(), "imported check-ins");
    Ok(inserted)
}

pub async fn fetch_check_ins(
    pool: &PgPool,
    email: &str,
    since: DateTime<Utc>,
) -> anyhow::Result<Vec<CheckInRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.entry_type, c.value, c.created_at
        FROM wellness.check_ins c
        JOIN wellness.users u ON u.id = c.user_id
        WHERE u.email = $1 AND c.created_at >= $2
        ORDER BY c.created_at ASC
        "#,
    )
    .bind(email)
    .bind(since)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to fetch check-ins for {email}"))?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let id: Uuid = row.try_get("id")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        records.push(CheckInRecord {
            id: Some(id.to_string()),
            entry_type: row.try_get("entry_type")?,
            value: row.try_get("value")?,
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        });
    }

    tracing::debug!(email, count = records.len(), %since, "fetched check-ins");
    Ok(records)
}
