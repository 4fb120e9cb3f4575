use histdb_core::db::OUTPUT_FORMAT_VERSION;
use histdb_core::{run_extraction, ExtractConfig, ExtractError, JsonSourceReader};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const CAT_SIG_BKG: &str = r#"{"entries":[
    {"kind":"hist","name":"N","edges":[0,1],"contents":[0,42,0]},
    {"kind":"dir","name":"cat","entries":[
        {"kind":"hist","name":"sig_bkg","edges":[0.0,1.0,2.0],"contents":[0,1.5,2.25,0]}
    ]}
]}"#;

fn write_source(dir: &Path, file_name: &str, body: &str) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, body).unwrap();
    path
}

fn hist_rows(conn: &Connection) -> Vec<Vec<String>> {
    let columns = column_names(conn, "hist");
    let mut stmt = conn.prepare("SELECT * FROM hist ORDER BY rowid;").unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut out = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        let mut values = Vec::new();
        for (index, column) in columns.iter().enumerate() {
            if column == "axis" {
                values.push(row.get::<_, i64>(index).unwrap().to_string());
            } else {
                values.push(row.get::<_, String>(index).unwrap());
            }
        }
        out.push(values);
    }
    out
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table});"))
        .unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        columns.push(row.get::<_, String>(1).unwrap());
    }
    columns
}

#[test]
fn two_runs_share_one_axis() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_source(dir.path(), "run1.json", CAT_SIG_BKG),
        write_source(dir.path(), "run2.json", CAT_SIG_BKG),
    ];
    let output = dir.path().join("hists.db");

    let summary = run_extraction(
        ExtractConfig::default(),
        &inputs,
        &output,
        &JsonSourceReader,
    )
    .unwrap();
    assert_eq!(summary.hist_rows, 2);
    assert_eq!(summary.axis_rows, 1);
    assert_eq!(summary.label_columns, 3);

    let conn = Connection::open(&output).unwrap();
    let axes: Vec<(i64, String)> = {
        let mut stmt = conn.prepare("SELECT id, edges FROM axes ORDER BY id;").unwrap();
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap();
        rows.map(Result::unwrap).collect()
    };
    assert_eq!(axes, vec![(0, "0,1,2".to_string())]);

    assert_eq!(
        column_names(&conn, "hist"),
        vec!["label0", "label1", "label2", "axis", "bins"]
    );
    assert_eq!(
        hist_rows(&conn),
        vec![
            vec!["run1", "cat", "sig_bkg", "0", "0,1.5,2.25,0"],
            vec!["run2", "cat", "sig_bkg", "0", "0,1.5,2.25,0"],
        ]
    );

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, OUTPUT_FORMAT_VERSION);
}

#[test]
fn rerun_with_same_inputs_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_source(
            dir.path(),
            "alpha.json",
            r#"{"entries":[
                {"kind":"hist","name":"x_1","edges":[0,5,10],"contents":[0,1,2,3]},
                {"kind":"hist","name":"y_2","edges":[0,1],"contents":[0,1,2]}
            ]}"#,
        ),
        write_source(
            dir.path(),
            "beta.json",
            r#"{"entries":[
                {"kind":"hist","name":"y_2","edges":[0,1],"contents":[4,5,6]},
                {"kind":"hist","name":"z_3","edges":[0,5,10],"contents":[7,8,9,10]}
            ]}"#,
        ),
    ];

    let first = dir.path().join("first.db");
    let second = dir.path().join("second.db");
    run_extraction(ExtractConfig::default(), &inputs, &first, &JsonSourceReader).unwrap();
    run_extraction(ExtractConfig::default(), &inputs, &second, &JsonSourceReader).unwrap();

    let first_rows = hist_rows(&Connection::open(&first).unwrap());
    let second_rows = hist_rows(&Connection::open(&second).unwrap());
    assert_eq!(first_rows, second_rows);
    assert_eq!(
        first_rows.iter().map(|row| row[2].as_str()).collect::<Vec<_>>(),
        vec!["0", "1", "1", "0"]
    );
}

#[test]
fn caller_label_names_and_padding_reach_output() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![write_source(
        dir.path(),
        "mc16a.json",
        r#"{"entries":[
            {"kind":"hist","name":"var_pT","edges":[0,1],"contents":[0,1,0]},
            {"kind":"dir","name":"photons","entries":[
                {"kind":"dir","name":"tight","entries":[
                    {"kind":"hist","name":"var_pT_jets_2","edges":[0,1],"contents":[0,3,0]}
                ]}
            ]}
        ]}"#,
    )];
    let output = dir.path().join("hists.db");
    let config = ExtractConfig {
        label_names: vec!["sample".to_string(), "selection".to_string()],
        ..ExtractConfig::default()
    };

    run_extraction(config, &inputs, &output, &JsonSourceReader).unwrap();

    let conn = Connection::open(&output).unwrap();
    assert_eq!(
        column_names(&conn, "hist"),
        vec!["sample", "selection", "label2", "label3", "label4", "axis", "bins"]
    );
    assert_eq!(
        hist_rows(&conn),
        vec![
            vec!["mc16a", "var_pT", "", "", "", "0", "0,1,0"],
            vec!["mc16a", "photons", "tight", "var_pT", "jets_2", "0", "0,3,0"],
        ]
    );
}

#[test]
fn existing_output_is_replaced_not_appended() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![write_source(dir.path(), "run1.json", CAT_SIG_BKG)];
    let output = dir.path().join("hists.db");
    std::fs::write(&output, b"not a database").unwrap();

    run_extraction(ExtractConfig::default(), &inputs, &output, &JsonSourceReader).unwrap();
    run_extraction(ExtractConfig::default(), &inputs, &output, &JsonSourceReader).unwrap();

    let conn = Connection::open(&output).unwrap();
    assert_eq!(hist_rows(&conn).len(), 1);
}

#[test]
fn bad_input_name_aborts_before_output_is_touched() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        write_source(dir.path(), "run1.json", CAT_SIG_BKG),
        write_source(dir.path(), "run2.txt", CAT_SIG_BKG),
    ];
    let output = dir.path().join("hists.db");
    std::fs::write(&output, b"previous").unwrap();

    let err = run_extraction(ExtractConfig::default(), &inputs, &output, &JsonSourceReader)
        .unwrap_err();

    assert!(matches!(err, ExtractError::InputFormat { ref path } if path.ends_with("run2.txt")));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}

#[test]
fn corrupt_or_missing_source_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("hists.db");

    let corrupt = vec![write_source(dir.path(), "run1.json", "{\"entries\": 7}")];
    let err = run_extraction(ExtractConfig::default(), &corrupt, &output, &JsonSourceReader)
        .unwrap_err();
    assert!(matches!(err, ExtractError::SourceUnavailable { .. }));

    let missing = vec![dir.path().join("absent.json")];
    let err = run_extraction(ExtractConfig::default(), &missing, &output, &JsonSourceReader)
        .unwrap_err();
    assert!(err.to_string().contains("absent.json"), "{err}");
    assert!(!output.exists());
}
