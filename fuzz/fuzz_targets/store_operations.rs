#![no_main]

use std::collections::BTreeMap;

use cellbase::{Connection, Delete, Get, Put, Scan, Slice, StoreOptions, TableDescriptor};
use libfuzzer_sys::fuzz_target;

// Fuzz target for row mutations against an in-memory model.
// Byte 0 picks the operation, byte 1 the row length, then the row key and,
// for puts, one value byte.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let conn = Connection::open_local(StoreOptions::default());
    conn.admin()
        .create_table(&TableDescriptor::with_family_names("t", &["a", "b"]))
        .unwrap();
    let table = conn.table("t");

    // row -> (family -> newest value)
    let mut model: BTreeMap<Vec<u8>, BTreeMap<&str, Vec<u8>>> = BTreeMap::new();

    let mut i = 0;
    while i + 2 < data.len() {
        let op = data[i] % 4;
        let row_len = (data[i + 1] as usize % 16 + 1).min(data.len() - i - 2);
        i += 2;
        let row = data[i..i + row_len].to_vec();
        i += row_len;
        let family = if op % 2 == 0 { "a" } else { "b" };

        match op {
            0 | 1 => {
                let value = vec![data.get(i).copied().unwrap_or(0)];
                i += 1;
                table
                    .put(&Put::new(row.as_slice()).add_column(family, "q", value.as_slice()))
                    .unwrap();
                model.entry(row).or_default().insert(family, value);
            },
            2 => {
                table.delete(&Delete::new(row.as_slice())).unwrap();
                model.remove(&row);
            },
            _ => {
                table
                    .delete(&Delete::new(row.as_slice()).add_column(family, "q"))
                    .unwrap();
                if let Some(families) = model.get_mut(&row) {
                    families.remove(family);
                    if families.is_empty() {
                        model.remove(&row);
                    }
                }
            },
        }
    }

    for (row, families) in &model {
        let result = table.get(&Get::new(row.as_slice())).unwrap();
        assert_eq!(result.len(), families.len());
        for (family, value) in families {
            assert_eq!(result.value(family, "q"), Some(&Slice::from(value.as_slice())));
        }
    }

    let scanned: Vec<Vec<u8>> = table
        .scan(&Scan::new())
        .unwrap()
        .map(|r| r.unwrap().row().data().to_vec())
        .collect();
    let expected: Vec<Vec<u8>> = model.keys().cloned().collect();
    assert_eq!(scanned, expected, "scan disagrees with model");
});
