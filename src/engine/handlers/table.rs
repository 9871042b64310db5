use crate::core::report::Report;
use crate::core::workspace::Entity;
use crate::engine::error::CommandError;
use crate::engine::handlers::{Context, Outcome};
use crate::ops::table::{filter_equals, join_on, pick_columns as project, summarize};

pub(super) fn filter_table(
    ctx: &Context<'_>,
    table: &str,
    column: &str,
    value: &str,
    new: &str,
) -> Result<Outcome, CommandError> {
    let filtered = filter_equals(ctx.table(table)?, column, value, new)?;
    let message = format!(
        "Filtered {table} to {} row(s) where {column} equals {value}, stored as {new}.",
        filtered.rows.len()
    );
    Ok(Outcome::message(message).insert(Entity::Table(filtered)))
}

pub(super) fn pick_columns(
    ctx: &Context<'_>,
    columns: &[String],
    table: &str,
    new: &str,
) -> Result<Outcome, CommandError> {
    let picked = project(ctx.table(table)?, columns, new)?;
    let message = format!(
        "Picked {} column(s) from {table} as {new}: {}",
        picked.columns.len(),
        picked.columns.join(", ")
    );
    Ok(Outcome::message(message).insert(Entity::Table(picked)))
}

pub(super) fn join_tables(
    ctx: &Context<'_>,
    first: &str,
    second: &str,
    column: &str,
    new: &str,
) -> Result<Outcome, CommandError> {
    let left = ctx.table(first)?;
    let right = ctx.table(second)?;
    let joined = join_on(left, right, column, new)?;
    let message = format!(
        "Joined {first} with {second} on {column} as {new} ({} rows, {} columns).",
        joined.rows.len(),
        joined.columns.len()
    );
    Ok(Outcome::message(message).insert(Entity::Table(joined)))
}

pub(super) fn analyze_table(ctx: &Context<'_>, table: &str) -> Result<Outcome, CommandError> {
    let lines = summarize(ctx.table(table)?);
    let report = Report::new(format!("{table}_summary"), lines.clone())
        .with_description(format!("summary of table {table}"));
    Ok(Outcome::lines(&lines).insert(Entity::Report(report)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::engine::result::Status;
    use crate::engine::Engine;

    fn csv(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn engine(samples: &NamedTempFile, counts: &NamedTempFile) -> Engine {
        let mut engine = Engine::default();
        for (file, name) in [(samples, "samples"), (counts, "counts")] {
            let result = engine.execute_command(&format!(
                "load table file {} as {name}",
                file.path().display()
            ));
            assert!(result.is_ok(), "{}", result.message);
        }
        engine
    }

    fn fixtures() -> (NamedTempFile, NamedTempFile) {
        (
            csv("id,tissue\na,liver\nb,brain\nc,liver\n"),
            csv("id,reads\na,10\nc,30\nc,31\n"),
        )
    }

    #[test]
    fn test_filter_table() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        let result =
            engine.execute_command("filter table samples keep column tissue equals liver as liver");
        assert_eq!(result.status, Status::Ok, "{}", result.message);

        let snapshot = engine.snapshot();
        let liver = snapshot.table("liver").unwrap();
        assert_eq!(liver.rows.len(), 2);
        assert_eq!(liver.rows[1]["id"], "c");
    }

    #[test]
    fn test_filter_unknown_column() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        let result = engine.execute_command("filter table samples keep column organ equals x as y");
        assert_eq!(result.status, Status::Error);
        assert!(result.message.contains("organ"));
    }

    #[test]
    fn test_pick_columns() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        engine.execute_command("pick columns tissue, id from samples as slim");
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.table("slim").unwrap().columns, vec!["tissue", "id"]);
    }

    #[test]
    fn test_join_tables_all_pairs() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        let result = engine.execute_command("join table samples with counts on column id as merged");
        assert!(result.message.contains("3 rows"), "{}", result.message);

        let snapshot = engine.snapshot();
        let merged = snapshot.table("merged").unwrap();
        assert_eq!(merged.columns, vec!["id", "tissue", "reads"]);
    }

    #[test]
    fn test_analyze_table_creates_summary() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        let result = engine.execute_command("analyze table counts");
        assert_eq!(result.created, vec!["counts_summary"]);
        assert!(result.message.contains("reads: numeric, min 10, max 31"));
    }

    #[test]
    fn test_table_name_is_not_a_sequence() {
        let (samples, counts) = fixtures();
        let mut engine = engine(&samples, &counts);
        let result = engine.execute_command("count gc of samples");
        assert_eq!(result.message, "No sequence named 'samples'");
    }
}
