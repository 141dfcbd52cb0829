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
fn commit_persists_and_logs_duration_only() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY, val TEXT)", &[])?;
    sink.clear();

    let tx = db.begin()?;
    tx.exec(
        "INSERT INTO t (id, val) VALUES (?1, ?2)",
        &[RowValues::Int(1), RowValues::Text("a".into())],
    )?;
    tx.commit()?;

    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].op, "tx exec");
    assert!(records[0].sql.is_some());
    assert_eq!(records[1].op, "tx commit");
    // Boundary records never carry SQL text or arguments.
    assert!(records[1].sql.is_none());
    assert!(records[1].params.is_none());

    let row = db.query_row("SELECT COUNT(*) AS cnt FROM t", &[])?;
    assert_eq!(row.get("cnt"), Some(&RowValues::Int(1)));
    Ok(())
}

#[test]
fn rollback_discards_and_logs_duration_only() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER)", &[])?;
    sink.clear();

    let tx = db.begin()?;
    tx.exec("INSERT INTO t (id) VALUES (1)", &[])?;
    tx.rollback()?;

    let records = sink.records();
    assert_eq!(records.last().map(|r| r.op), Some("tx rollback"));
    assert!(records.last().unwrap().sql.is_none());
    assert!(records.last().unwrap().params.is_none());

    let row = db.query_row("SELECT COUNT(*) AS cnt FROM t", &[])?;
    assert_eq!(row.get("cnt"), Some(&RowValues::Int(0)));
    Ok(())
}

#[test]
fn tx_queries_run_inside_the_transaction() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, _sink) = handle_with_sink(InstrumentOptions::new());

    db.exec("CREATE TABLE t (id INTEGER PRIMARY KEY)", &[])?;
    let tx = db.begin()?;
    tx.exec("INSERT INTO t (id) VALUES (1)", &[])?;

    // Uncommitted write is visible from within the same transaction.
    let rs = tx.query("SELECT id FROM t", &[])?;
    assert_eq!(rs.results.len(), 1);
    let row = tx.query_row("SELECT id FROM t WHERE id = ?1", &[RowValues::Int(1)])?;
    assert_eq!(row.get("id"), Some(&RowValues::Int(1)));

    tx.rollback()?;
    Ok(())
}

#[test]
fn options_are_snapshotted_at_begin() -> Result<(), Box<dyn std::error::Error>> {
    let (mut db, sink) = handle_with_sink(InstrumentOptions::new().with_debug(true));

    db.exec("CREATE TABLE t (id INTEGER)", &[])?;
    sink.clear();

    // debug=true at begin time: the transaction logs.
    let tx = db.begin()?;
    tx.exec("INSERT INTO t (id) VALUES (1)", &[])?;
    tx.commit()?;
    assert_eq!(sink.len(), 2);

    // Turning debug off on the handle only affects transactions created
    // afterwards.
    db.options_mut().debug = false;
    sink.clear();
    let tx = db.begin()?;
    tx.exec("INSERT INTO t (id) VALUES (2)", &[])?;
    tx.commit()?;
    assert!(sink.is_empty());
    Ok(())
}
