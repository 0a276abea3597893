//! Bulk loading through the COPY protocol.
//!
//! Each call streams one batch into a table inside its own transaction
//! using `COPY … FROM STDIN` in text format. The payload is built in
//! memory; batches are already bounded by `BatchSize`, so the buffer stays
//! modest. The first failure aborts the transaction and propagates.

use sqlx::PgPool;

use crate::error::Result;

/// A value rendered into a COPY text-format field.
#[derive(Debug, Clone)]
pub(crate) enum CopyValue {
    Text(String),
    OptText(Option<String>),
    Int(i64),
    OptInt(Option<i64>),
    Bool(bool),
}

impl CopyValue {
    fn render(&self, out: &mut String) {
        match self {
            CopyValue::Text(s) => escape_copy_text(s, out),
            CopyValue::OptText(Some(s)) => escape_copy_text(s, out),
            CopyValue::OptText(None) | CopyValue::OptInt(None) => out.push_str("\\N"),
            CopyValue::Int(i) => out.push_str(&i.to_string()),
            CopyValue::OptInt(Some(i)) => out.push_str(&i.to_string()),
            CopyValue::Bool(b) => out.push(if *b { 't' } else { 'f' }),
        }
    }
}

/// Escapes one field for COPY text format: backslash, tab, newline.
fn escape_copy_text(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}

/// Bulk-inserts `rows` into `table` within a single transaction. Returns
/// the number of rows copied.
pub(crate) async fn copy_rows(
    pool: &PgPool,
    table: &str,
    columns: &[&str],
    rows: &[Vec<CopyValue>],
) -> Result<u64> {
    if rows.is_empty() {
        return Ok(0);
    }

    let mut payload = String::with_capacity(rows.len() * 64);
    for row in rows {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                payload.push('\t');
            }
            value.render(&mut payload);
        }
        payload.push('\n');
    }

    let statement = format!("COPY {} ({}) FROM STDIN", table, columns.join(", "));

    let mut tx = pool.begin().await?;
    let mut copy = tx.copy_in_raw(&statement).await?;
    copy.send(payload.as_bytes()).await?;
    let copied = copy.finish().await?;
    tx.commit().await?;

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(v: CopyValue) -> String {
        let mut s = String::new();
        v.render(&mut s);
        s
    }

    #[test]
    fn test_escaping() {
        assert_eq!(render(CopyValue::Text("a\tb".into())), "a\\tb");
        assert_eq!(render(CopyValue::Text("a\\b".into())), "a\\\\b");
        assert_eq!(render(CopyValue::Text("a\nb".into())), "a\\nb");
    }

    #[test]
    fn test_nulls_and_scalars() {
        assert_eq!(render(CopyValue::OptText(None)), "\\N");
        assert_eq!(render(CopyValue::OptInt(None)), "\\N");
        assert_eq!(render(CopyValue::OptInt(Some(1758))), "1758");
        assert_eq!(render(CopyValue::Bool(true)), "t");
        assert_eq!(render(CopyValue::Bool(false)), "f");
    }
}
