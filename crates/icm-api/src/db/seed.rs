//! Writes the seed catalog and its cross-reference graph to Postgres.
//!
//! Idempotent: standards and clauses are upserted by id, edges are inserted
//! once per (source, target) pair. Runs in a single transaction.

use sqlx::PgPool;

use icm_catalog::SeedCatalog;

/// Rows written by [`write_catalog`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub standards: u64,
    pub clauses: u64,
    /// Edges newly inserted; existing pairs are left as they are.
    pub cross_references: u64,
}

pub async fn write_catalog(pool: &PgPool, catalog: &SeedCatalog) -> Result<SeedReport, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut report = SeedReport::default();

    for entry in &catalog.standards {
        let standard = &entry.standard;
        report.standards += sqlx::query(
            "INSERT INTO standards (id, code, name, is_active)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET code = EXCLUDED.code, name = EXCLUDED.name",
        )
        .bind(standard.id.0)
        .bind(standard.code.as_str())
        .bind(&standard.name)
        .bind(standard.is_active)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        // Parents before children so the self-reference resolves.
        let (top_level, nested): (Vec<_>, Vec<_>) =
            entry.clauses.iter().partition(|c| c.parent_id.is_none());
        for clause in top_level.into_iter().chain(nested) {
            report.clauses += sqlx::query(
                "INSERT INTO standard_clauses
                    (id, standard_id, clause_number, title, description, parent_id)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (id) DO UPDATE SET
                    title = EXCLUDED.title,
                    description = EXCLUDED.description,
                    parent_id = EXCLUDED.parent_id",
            )
            .bind(clause.id.0)
            .bind(clause.standard_id.0)
            .bind(clause.clause_number.as_str())
            .bind(&clause.title)
            .bind(clause.description.as_deref())
            .bind(clause.parent_id.map(|p| p.0))
            .execute(&mut *tx)
            .await?
            .rows_affected();
        }
    }

    for edge in &catalog.cross_references {
        report.cross_references += sqlx::query(
            "INSERT INTO clause_cross_references
                (source_clause_id, target_clause_id, mapping_type, notes)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (source_clause_id, target_clause_id) DO NOTHING",
        )
        .bind(edge.source_clause_id.0)
        .bind(edge.target_clause_id.0)
        .bind(edge.mapping_type.as_str())
        .bind(edge.notes.as_deref())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    tracing::info!(
        standards = report.standards,
        clauses = report.clauses,
        cross_references = report.cross_references,
        "seed catalog written"
    );
    Ok(report)
}
