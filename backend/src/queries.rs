use sqlx::PgPool;
use uuid::Uuid;
use shared::{
    Direction, Identity, NewVoteRecord, SubjectCount, SubjectKind, SubjectSummary, VoteRecord, VoteTable,
};
use crate::error::ApiError;

const LIST_LIMIT: i64 = 200;

// Table and column names interpolated below only ever come from the static
// `VoteTable` descriptors, never from request input.

fn summary_columns(t: &VoteTable) -> String {
    format!(
        "id, {title} AS title, {count} AS aggregate_count, {parent} AS parent_id",
        title = t.title_column,
        count = t.count_column,
        parent = t.parent_column.unwrap_or("NULL::uuid"),
    )
}

pub fn list_subjects_sql(t: &VoteTable, by_parent: bool) -> String {
    let filter = match (by_parent, t.parent_column) {
        (true, Some(column)) => format!("WHERE {column} = $2 "),
        _ => String::new(),
    };
    format!(
        "SELECT {columns} FROM {table} {filter}ORDER BY {count} DESC, created_at DESC LIMIT $1",
        columns = summary_columns(t),
        count = t.count_column,
        table = t.subject_table,
    )
}

pub fn subject_summary_sql(t: &VoteTable) -> String {
    format!("SELECT {} FROM {} WHERE id = $1", summary_columns(t), t.subject_table)
}

pub fn subject_count_sql(t: &VoteTable) -> String {
    format!(
        "SELECT id, {count} AS aggregate_count FROM {table} WHERE id = $1",
        count = t.count_column,
        table = t.subject_table,
    )
}

pub fn adjust_count_sql(t: &VoteTable) -> String {
    format!(
        "UPDATE {table} SET {count} = {count} + $1 WHERE id = $2 RETURNING id, {count} AS aggregate_count",
        count = t.count_column,
        table = t.subject_table,
    )
}

fn record_columns(t: &VoteTable) -> String {
    format!("id, {} AS subject_id, voter_id, direction, created_at", t.subject_column)
}

pub fn fetch_vote_sql(t: &VoteTable) -> String {
    format!(
        "SELECT {columns} FROM {table} WHERE {subject} = $1 AND voter_id = $2",
        columns = record_columns(t),
        table = t.record_table,
        subject = t.subject_column,
    )
}

pub fn insert_vote_sql(t: &VoteTable) -> String {
    format!(
        "INSERT INTO {table} ({subject}, voter_id, direction) VALUES ($1, $2, $3) RETURNING {columns}",
        table = t.record_table,
        subject = t.subject_column,
        columns = record_columns(t),
    )
}

pub fn update_vote_sql(t: &VoteTable) -> String {
    format!("UPDATE {} SET direction = $1 WHERE id = $2 AND voter_id = $3", t.record_table)
}

pub fn delete_vote_sql(t: &VoteTable) -> String {
    format!("DELETE FROM {} WHERE id = $1 AND voter_id = $2", t.record_table)
}

pub struct Queries;

impl Queries {
    pub async fn identity_for_token(pool: &PgPool, token: &str) -> Result<Option<Identity>, ApiError> {
        let row = sqlx::query_as::<_, (Uuid, Option<String>)>(
            "SELECT user_id, display_name FROM auth_sessions WHERE token = $1 AND expires_at > NOW()"
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|(user_id, display_name)| Identity { user_id, display_name }))
    }

    pub async fn purge_expired_sessions(pool: &PgPool) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn list_subjects(
        pool: &PgPool,
        kind: SubjectKind,
        parent: Option<Uuid>,
    ) -> Result<Vec<SubjectSummary>, ApiError> {
        let table = kind.table();
        let by_parent = parent.is_some() && table.parent_column.is_some();
        let sql = list_subjects_sql(table, by_parent);

        let mut query = sqlx::query_as::<_, SubjectSummary>(&sql).bind(LIST_LIMIT);
        if by_parent {
            query = query.bind(parent);
        }
        Ok(query.fetch_all(pool).await?)
    }

    pub async fn subject_summary(pool: &PgPool, kind: SubjectKind, id: Uuid) -> Result<Option<SubjectSummary>, ApiError> {
        let sql = subject_summary_sql(kind.table());
        Ok(sqlx::query_as::<_, SubjectSummary>(&sql).bind(id).fetch_optional(pool).await?)
    }

    pub async fn subject_count(pool: &PgPool, kind: SubjectKind, id: Uuid) -> Result<Option<SubjectCount>, ApiError> {
        let sql = subject_count_sql(kind.table());
        Ok(sqlx::query_as::<_, SubjectCount>(&sql).bind(id).fetch_optional(pool).await?)
    }

    /// Single-statement increment; concurrent adjustments never overwrite each other.
    pub async fn adjust_count(
        pool: &PgPool,
        kind: SubjectKind,
        id: Uuid,
        delta: i64,
    ) -> Result<Option<SubjectCount>, ApiError> {
        let sql = adjust_count_sql(kind.table());
        Ok(sqlx::query_as::<_, SubjectCount>(&sql)
            .bind(delta)
            .bind(id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn fetch_vote(
        pool: &PgPool,
        kind: SubjectKind,
        subject_id: Uuid,
        voter_id: Uuid,
    ) -> Result<Option<VoteRecord>, ApiError> {
        let sql = fetch_vote_sql(kind.table());
        Ok(sqlx::query_as::<_, VoteRecord>(&sql)
            .bind(subject_id)
            .bind(voter_id)
            .fetch_optional(pool)
            .await?)
    }

    pub async fn insert_vote(pool: &PgPool, kind: SubjectKind, record: &NewVoteRecord) -> Result<VoteRecord, ApiError> {
        let sql = insert_vote_sql(kind.table());
        Ok(sqlx::query_as::<_, VoteRecord>(&sql)
            .bind(record.subject_id)
            .bind(record.voter_id)
            .bind(record.direction)
            .fetch_one(pool)
            .await?)
    }

    pub async fn update_vote(
        pool: &PgPool,
        kind: SubjectKind,
        record_id: Uuid,
        voter_id: Uuid,
        direction: Direction,
    ) -> Result<bool, ApiError> {
        let sql = update_vote_sql(kind.table());
        let result = sqlx::query(&sql)
            .bind(direction)
            .bind(record_id)
            .bind(voter_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn delete_vote(pool: &PgPool, kind: SubjectKind, record_id: Uuid, voter_id: Uuid) -> Result<bool, ApiError> {
        let sql = delete_vote_sql(kind.table());
        let result = sqlx::query(&sql)
            .bind(record_id)
            .bind(voter_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
