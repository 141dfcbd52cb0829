use std::sync::Arc;

use sql_slowlog::prelude::*;
use sql_slowlog::rusqlite::Connection;

fn handle_with_sink(opts: InstrumentOptions) -> (Handle, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let conn = Connection::open_in_memory().expect("in-memory db");
    let handle = Handle::wrap(conn, opts.with_sink(Arc::clone(&sink) as Arc<dyn QuerySink>));
    (handle, sink)
}

#[test]
fn prepared_statement_logs_its_original_sql() -> Result<(), Box<dyn std::error::Error>> {
    let (db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY, val TEXT)", &[])?;
    db.exec(
        "INSERT INTO t (id, val) VALUES (1, 'a'), (2, 'b')",
        &[],
    )?;

    let original = "SELECT val FROM t WHERE id = ?1";
    let mut stmt = db.prepare(original)?;
    assert_eq!(stmt.sql(), original);

    // Unrelated traffic in between must not change what the statement logs.
    db.query("SELECT COUNT(*) FROM t", &[])?;
    sink.clear();

    let row = stmt.query_row(&[RowValues::Int(2)])?;
    assert_eq!(row.get("val"), Some(&RowValues::Text("b".into())));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].op, "stmt query row");
    assert_eq!(records[0].sql.as_deref(), Some(original));
    assert_eq!(records[0].params.as_deref(), Some(&[RowValues::Int(2)][..]));
    Ok(())
}

#[test]
fn prepare_failure_builds_nothing_and_logs_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let (db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    let err = db.prepare("SELECT FROM WHERE").unwrap_err();
    assert!(matches!(err, SlowLogError::Sqlite(_)));
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn prepared_exec_reports_rows_affected() -> Result<(), Box<dyn std::error::Error>> {
    let (db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY, val TEXT)", &[])?;
    sink.clear();

    let mut stmt = db.prepare("INSERT INTO t (id, val) VALUES (?1, ?2)")?;
    // Preparing alone emits no record.
    assert!(sink.is_empty());

    for id in 1..=3 {
        let n = stmt.exec(&[RowValues::Int(id), RowValues::Text(format!("v{id}"))])?;
        assert_eq!(n, 1);
    }
    stmt.finalize()?;

    let records = sink.records();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.op == "stmt exec"));

    let rs = db.query("SELECT id FROM t ORDER BY id", &[])?;
    assert_eq!(rs.results.len(), 3);
    Ok(())
}

#[test]
fn prepared_inside_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])?;
    sink.clear();

    let tx = db.begin()?;
    {
        let mut stmt = tx.prepare("INSERT INTO t (id) VALUES (?1)")?;
        stmt.exec(&[RowValues::Int(1)])?;
        stmt.exec(&[RowValues::Int(2)])?;
    }
    tx.commit()?;

    let ops: Vec<_> = sink.records().iter().map(|r| r.op).collect();
    assert_eq!(ops, vec!["stmt exec", "stmt exec", "tx commit"]);

    let row = db.query_row("SELECT COUNT(*) AS cnt FROM t", &[])?;
    assert_eq!(row.get("cnt"), Some(&RowValues::Int(2)));
    Ok(())
}
