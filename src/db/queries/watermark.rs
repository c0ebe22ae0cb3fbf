use sqlx::PgPool;

pub async fn get(pool: &PgPool, name: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM watermarks WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.0))
}

pub async fn set(pool: &PgPool, name: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO watermarks (name, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (name)
        DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()
        "#
    )
    .bind(name)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
