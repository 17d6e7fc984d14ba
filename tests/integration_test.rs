use std::time::{SystemTime, UNIX_EPOCH};

use cellbase::{
    ColumnFamilyDataAccess, ColumnFamilyDescriptor, ColumnFamilyOptions, Connection, Delete,
    FamilyMutations, Get, Put, Scan, Slice, StoreOptions, TableDescriptor, config::AccessOptions,
};

fn dao() -> ColumnFamilyDataAccess {
    ColumnFamilyDataAccess::new(
        Connection::open_local(StoreOptions::default()),
        AccessOptions::default(),
    )
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

fn article(title: &str, author: &str) -> FamilyMutations {
    let mut m = FamilyMutations::new();
    m.entry("article".to_string())
        .or_default()
        .insert("title".to_string(), title.as_bytes().to_vec());
    m.entry("author".to_string())
        .or_default()
        .insert("name".to_string(), author.as_bytes().to_vec());
    m
}

#[test]
fn test_create_twice_signals_already_exists() {
    let dao = dao();
    dao.create_table("blog", &["article", "author"]).unwrap();
    dao.put("blog", "row1", &article("t", "a")).unwrap();

    let err = dao.create_table("blog", &["article"]).unwrap_err();
    assert!(err.is_already_exists());

    let desc = dao.connection().admin().describe_table("blog").unwrap();
    assert_eq!(desc.family_names(), vec!["article", "author"]);
    assert_eq!(
        dao.get("blog", "row1", None, None).unwrap().cells.len(),
        2
    );
}

#[test]
fn test_put_then_get_returns_last_value() {
    let dao = dao();
    dao.create_table("blog", &["article", "author"]).unwrap();

    let before = now_ms();
    dao.put("blog", "row1", &article("first", "ann")).unwrap();
    dao.put("blog", "row1", &article("second", "bob")).unwrap();

    let row = dao
        .get("blog", "row1", Some("article"), Some("title"))
        .unwrap();
    assert_eq!(row.cells.len(), 1);
    assert_eq!(row.cells[0].value, Slice::from("second"));
    assert!(row.cells[0].timestamp >= before);
}

#[test]
fn test_update_preserves_versions() {
    let dao = dao();
    dao.create_table("blog", &["article"]).unwrap();

    for i in 0..8 {
        dao.update("blog", "row1", "article", "title", format!("v{i}"))
            .unwrap();
    }

    let versions = dao
        .get_with_versions("blog", "row1", "article", "title", Some(5))
        .unwrap();
    let values: Vec<String> = versions.iter().map(|c| c.value.to_string()).collect();
    assert_eq!(values, vec!["v7", "v6", "v5", "v4", "v3"]);

    let all = dao
        .get_with_versions("blog", "row1", "article", "title", Some(100))
        .unwrap();
    assert_eq!(all.len(), 8);
}

#[test]
fn test_scan_half_open_range() {
    let dao = dao();
    dao.create_table("t", &["f"]).unwrap();
    for row in ["0", "a", "aa", "b", "l", "lz", "m", "ma", "z"] {
        dao.update("t", row, "f", "q", row).unwrap();
    }

    let rows: Vec<String> = dao
        .scan("t", Some("a"), Some("m"))
        .unwrap()
        .map(|r| r.unwrap().row.to_string())
        .collect();
    assert_eq!(rows, vec!["a", "aa", "b", "l", "lz"]);

    let tail: Vec<String> = dao
        .scan("t", Some("m"), None)
        .unwrap()
        .map(|r| r.unwrap().row.to_string())
        .collect();
    assert_eq!(tail, vec!["m", "ma", "z"]);

    let head: Vec<String> = dao
        .scan("t", None, Some("a"))
        .unwrap()
        .map(|r| r.unwrap().row.to_string())
        .collect();
    assert_eq!(head, vec!["0"]);
}

#[test]
fn test_delete_column_leaves_siblings() {
    let dao = dao();
    dao.create_table("blog", &["article", "author"]).unwrap();
    dao.put("blog", "row1", &article("t", "ann")).unwrap();
    dao.update("blog", "row1", "article", "tag", "rust").unwrap();

    dao.delete_column("blog", "row1", "article", "title").unwrap();

    let row = dao.get("blog", "row1", None, None).unwrap();
    assert_eq!(row.value("article", "title"), None);
    assert_eq!(row.value("article", "tag"), Some(&Slice::from("rust")));
    assert_eq!(row.value("author", "name"), Some(&Slice::from("ann")));

    // A later write to the deleted column is visible again.
    dao.update("blog", "row1", "article", "title", "back").unwrap();
    let row = dao.get("blog", "row1", Some("article"), Some("title")).unwrap();
    assert_eq!(row.cells[0].value, Slice::from("back"));
}

#[test]
fn test_delete_table_lifecycle() {
    let conn = Connection::open_local(StoreOptions::default());
    let admin = conn.admin();
    admin
        .create_table(&TableDescriptor::with_family_names("blog", &["article"]))
        .unwrap();

    assert!(admin.delete_table("blog").unwrap_err().is_table_not_disabled());
    assert!(admin.enable_table("blog").unwrap_err().is_table_not_disabled());

    admin.disable_table("blog").unwrap();
    assert!(admin.disable_table("blog").unwrap_err().is_table_not_enabled());
    admin.delete_table("blog").unwrap();

    let err = conn.table("blog").get(&Get::new("row1")).unwrap_err();
    assert!(err.is_not_found());
    assert!(!admin.table_exists("blog"));
}

#[test]
fn test_unknown_family_writes_nothing() {
    let dao = dao();
    dao.create_table("blog", &["article"]).unwrap();

    let err = dao.put("blog", "row1", &article("t", "ann")).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(dao.get("blog", "row1", None, None).unwrap().is_empty());
    assert_eq!(dao.scan("blog", None, None).unwrap().count(), 0);
}

#[test]
fn test_family_retention_cap() {
    let conn = Connection::open_local(StoreOptions::default());
    conn.admin()
        .create_table(
            &TableDescriptor::new("t")
                .add_family(ColumnFamilyDescriptor::new(
                    "capped",
                    ColumnFamilyOptions::with_max_versions(3),
                ))
                .add_family(ColumnFamilyDescriptor::named("open")),
        )
        .unwrap();

    let table = conn.table("t");
    for i in 0..10 {
        table
            .put(
                &Put::new("r")
                    .add_column("capped", "q", format!("{i}"))
                    .add_column("open", "q", format!("{i}")),
            )
            .unwrap();
    }

    let result = table.get(&Get::new("r").max_versions(100)).unwrap();
    assert_eq!(result.column_cells("capped", "q").len(), 3);
    assert_eq!(result.column_cells("open", "q").len(), 10);
}

#[test]
fn test_delete_marker_masks_older_explicit_timestamps() {
    let conn = Connection::open_local(StoreOptions::default());
    conn.admin()
        .create_table(&TableDescriptor::with_family_names("t", &["f"]))
        .unwrap();
    let table = conn.table("t");

    table
        .delete(&Delete::new("r").add_column("f", "q").with_timestamp(100))
        .unwrap();

    table
        .put(&Put::new("r").add_column_with_timestamp("f", "q", 50, "old"))
        .unwrap();
    assert!(table.get(&Get::new("r")).unwrap().is_empty());

    table
        .put(&Put::new("r").add_column_with_timestamp("f", "q", 150, "new"))
        .unwrap();
    let result = table.get(&Get::new("r")).unwrap();
    assert_eq!(result.value("f", "q"), Some(&Slice::from("new")));
    assert_eq!(conn.statistics().cells_masked, 1);
}

#[test]
fn test_delete_row_masks_every_family() {
    let dao = dao();
    dao.create_table("blog", &["article", "author"]).unwrap();
    dao.put("blog", "row1", &article("t", "a")).unwrap();
    dao.put("blog", "row2", &article("t2", "b")).unwrap();

    dao.delete_row("blog", "row1").unwrap();
    assert!(dao.get("blog", "row1", None, None).unwrap().is_empty());

    let rows: Vec<String> = dao
        .scan("blog", None, None)
        .unwrap()
        .map(|r| r.unwrap().row.to_string())
        .collect();
    assert_eq!(rows, vec!["row2"]);

    // Rows can be written again after deletion.
    dao.put("blog", "row1", &article("t3", "c")).unwrap();
    let row = dao.get("blog", "row1", None, None).unwrap();
    assert_eq!(row.value("article", "title"), Some(&Slice::from("t3")));
}

#[test]
fn test_time_range_read() {
    let conn = Connection::open_local(StoreOptions::default());
    conn.admin()
        .create_table(&TableDescriptor::with_family_names("t", &["f"]))
        .unwrap();
    let table = conn.table("t");
    for ts in [10u64, 20, 30, 40] {
        table
            .put(&Put::new("r").add_column_with_timestamp("f", "q", ts, format!("at{ts}")))
            .unwrap();
    }

    let result = table
        .get(&Get::new("r").time_range(15, 40).max_versions(10))
        .unwrap();
    let stamps: Vec<u64> = result.cells().iter().map(|c| c.timestamp).collect();
    assert_eq!(stamps, vec![30, 20]);
}

#[test]
fn test_scan_column_selection_and_limit() {
    let conn = Connection::open_local(StoreOptions::default());
    conn.admin()
        .create_table(&TableDescriptor::with_family_names("t", &["a", "b"]))
        .unwrap();
    let table = conn.table("t");
    for i in 0..5 {
        table
            .put(
                &Put::new(format!("r{i}"))
                    .add_column("a", "x", "1")
                    .add_column("a", "y", "2")
                    .add_column("b", "z", "3"),
            )
            .unwrap();
    }

    let rows = table
        .scan(&Scan::new().add_column("a", "y").limit(3))
        .unwrap()
        .collect_rows()
        .unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.len(), 1);
        assert_eq!(row.cells()[0].qualifier, Slice::from("y"));
    }
}

#[test]
fn test_statistics_snapshot() {
    let dao = dao();
    dao.create_table("blog", &["article", "author"]).unwrap();
    dao.put("blog", "row1", &article("t", "a")).unwrap();
    dao.get("blog", "row1", None, None).unwrap();
    dao.scan("blog", None, None).unwrap().for_each(drop);
    let _ = dao.get("missing", "row1", None, None);

    let stats = dao.connection().statistics();
    assert_eq!(stats.tables_created, 1);
    assert_eq!(stats.puts, 1);
    assert_eq!(stats.cells_written, 2);
    assert_eq!(stats.gets, 1);
    assert_eq!(stats.cells_read, 4);
    assert_eq!(stats.scans, 1);
    assert_eq!(stats.rows_scanned, 1);
    assert_eq!(stats.errors, 1);
    assert!(stats.to_string().contains("Store Statistics"));
}
