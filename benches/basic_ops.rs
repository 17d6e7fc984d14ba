use cellbase::{
    ColumnFamilyDataAccess, Connection, Get, Put, Scan, StoreOptions, TableDescriptor,
    config::AccessOptions,
};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn setup_table(options: StoreOptions) -> Connection {
    let conn = Connection::open_local(options);
    conn.admin()
        .create_table(&TableDescriptor::with_family_names(
            "bench",
            &["article", "author"],
        ))
        .unwrap();
    conn
}

fn fill(conn: &Connection, rows: usize, value: &[u8]) {
    let table = conn.table("bench");
    for i in 0..rows {
        table
            .put(&Put::new(format!("row{i:010}")).add_column("article", "body", value))
            .unwrap();
    }
}

fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");
    group.throughput(Throughput::Elements(1));

    for (name, size) in [("put_100b", 100), ("put_1kb", 1024), ("put_10kb", 10240)] {
        group.bench_function(name, |b| {
            let conn = setup_table(StoreOptions::default());
            let table = conn.table("bench");
            let value = vec![b'x'; size];
            let mut i = 0u64;
            b.iter(|| {
                table
                    .put(&Put::new(format!("row{i:010}")).add_column(
                        "article",
                        "body",
                        value.as_slice(),
                    ))
                    .unwrap();
                i += 1;
            });
        });
    }

    // Two families in one row mutation
    group.bench_function("put_two_families", |b| {
        let conn = setup_table(StoreOptions::default());
        let table = conn.table("bench");
        let mut i = 0u64;
        b.iter(|| {
            table
                .put(
                    &Put::new(format!("row{i:010}"))
                        .add_column("article", "title", "title")
                        .add_column("author", "name", "name"),
                )
                .unwrap();
            i += 1;
        });
    });

    // Same cell over and over with a retention cap
    group.bench_function("update_capped", |b| {
        let conn = setup_table(StoreOptions {
            default_max_versions: Some(5),
            ..Default::default()
        });
        let table = conn.table("bench");
        b.iter(|| {
            table
                .put(&Put::new("hot").add_column("article", "title", "value"))
                .unwrap();
        });
    });

    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_newest", |b| {
        let conn = setup_table(StoreOptions::default());
        fill(&conn, 1000, &[b'x'; 1024]);
        let table = conn.table("bench");

        let mut i = 0;
        b.iter(|| {
            let row = format!("row{:010}", i % 1000);
            black_box(table.get(&Get::new(row)).unwrap());
            i += 1;
        });
    });

    group.bench_function("get_five_versions", |b| {
        let conn = setup_table(StoreOptions::default());
        let table = conn.table("bench");
        for i in 0..20 {
            table
                .put(&Put::new("row").add_column("article", "title", format!("v{i}")))
                .unwrap();
        }

        b.iter(|| {
            black_box(
                table
                    .get(&Get::new("row").add_column("article", "title").max_versions(5))
                    .unwrap(),
            );
        });
    });

    group.bench_function("get_missing", |b| {
        let conn = setup_table(StoreOptions::default());
        fill(&conn, 1000, b"value");
        let table = conn.table("bench");

        b.iter(|| {
            black_box(table.get(&Get::new("absent")).unwrap());
        });
    });

    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");

    group.throughput(Throughput::Elements(100));
    group.bench_function("scan_100_rows", |b| {
        let conn = setup_table(StoreOptions::default());
        fill(&conn, 10_000, b"value");
        let table = conn.table("bench");

        b.iter(|| {
            let rows = table
                .scan(
                    &Scan::new()
                        .with_start_row("row0000005000")
                        .with_stop_row("row0000005100"),
                )
                .unwrap()
                .count();
            black_box(rows);
        });
    });

    group.bench_function("dao_scan_100_rows", |b| {
        let conn = setup_table(StoreOptions::default());
        fill(&conn, 10_000, b"value");
        let dao = ColumnFamilyDataAccess::new(conn, AccessOptions::default());

        b.iter(|| {
            let rows = dao
                .scan("bench", Some("row0000005000"), Some("row0000005100"))
                .unwrap()
                .count();
            black_box(rows);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_scan);
criterion_main!(benches);
