use anyhow::{Context, Result};

use super::connection::DbConn;

/// Creates the cache tables if they do not exist yet.
pub fn ensure_schema(conn: &mut DbConn) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        conn.execute(statement, [])
            .with_context(|| format!("Failed to execute schema statement {}", idx + 1))?;
    }

    log::debug!("Cache schema ready ({} statements)", statements.len());
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_has_both_tables() {
        let statements = split_sql_statements(include_str!("schema.sql"));
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("cache_entries"));
        assert!(statements[1].contains("cache_metadata"));
    }
}
