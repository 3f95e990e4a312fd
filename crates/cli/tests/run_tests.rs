// Integration tests: run the `ventas` binary against workbooks written to a
// temp directory.
//
// Run with: cargo test -p ventas-cli --test run_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use rust_xlsxwriter::{Format, Workbook};
use tempfile::{tempdir, TempDir};
use ventas_pipeline::load::source_headers;
use ventas_pipeline::schema::{self, OUTPUT_COLUMNS, SOURCE_SHEET};
use ventas_pipeline::RawValue;

// ===========================================================================
// Fixtures
// ===========================================================================

#[derive(Clone, Copy)]
enum Cell {
    Text(&'static str),
    Num(f64),
    Date(f64),
    Blank,
}

fn sale(company: &'static str, sku: &'static str, date: Cell, qty: Cell, warehouse: Cell) -> Vec<Cell> {
    use Cell::*;
    vec![
        Text(company),
        Num(9001.0),
        date,
        Text("PROVEEDOR"),
        Text("NORTE"),
        Text("ZONA 1"),
        Text("AGRO"),
        Text("PRODUCTO"),
        Text(sku),
        Text("DESCRIPCION"),
        Text("FAM"),
        Text("sin homologar"),
        qty,
        Num(1500.0),
        Num(2024.0),
        Num(1.0),
        warehouse,
    ]
}

fn write_sales(path: &Path, rows: &[Vec<Cell>]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet().set_name(SOURCE_SHEET).unwrap();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    for (col, name) in source_headers().iter().enumerate() {
        ws.write_string(0, col as u16, name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Text(s) => {
                    ws.write_string(r, c, *s).unwrap();
                }
                Cell::Num(n) => {
                    ws.write_number(r, c, *n).unwrap();
                }
                Cell::Date(n) => {
                    ws.write_number_with_format(r, c, *n, &date_format).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    wb.save(path).unwrap();
}

fn write_reference(path: &Path, rows: &[[&str; 4]]) {
    let headers = [
        schema::REF_COMPANY,
        schema::REF_INITIAL_SKU,
        schema::REF_FINAL_SKU,
        schema::REF_BRAND,
        schema::REF_ACTIVE_INGREDIENT_1,
        schema::REF_ACTIVE_INGREDIENT_2,
        schema::REF_UNIT,
        schema::REF_SUPPLIER_LINE,
        schema::REF_MACRO_FAMILY,
        schema::REF_SUPPLIER,
        schema::REF_FAMILY_DESCRIPTION,
    ];
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (col, name) in headers.iter().enumerate() {
        ws.write_string(0, col as u16, *name).unwrap();
    }
    for (r, [tag, initial, final_sku, family]) in rows.iter().enumerate() {
        let r = (r + 1) as u32;
        ws.write_string(r, 0, *tag).unwrap();
        ws.write_string(r, 1, *initial).unwrap();
        ws.write_string(r, 2, *final_sku).unwrap();
        ws.write_string(r, 3, format!("MARCA {final_sku}")).unwrap();
        ws.write_string(r, 6, "LT").unwrap();
        ws.write_string(r, 10, *family).unwrap();
    }
    wb.save(path).unwrap();
}

/// Two input folders, a reference workbook, and an excluded Servigral folder.
struct Scenario {
    dir: TempDir,
}

impl Scenario {
    fn new() -> Self {
        use Cell::*;
        let dir = tempdir().unwrap();
        let root = dir.path();

        write_sales(
            &root.join("agrac").join("ventas_a.xlsx"),
            &[
                sale("IFRS Servigral", "F1", Date(45306.0), Num(5.0), Text("5510")),
                sale("IFRS Agrac", "OLD1", Date(45306.0), Num(5.0), Text("5515")),
                sale("IFRS Otra", "F2", Text("not-a-date"), Num(5.0), Text("5510")),
                sale("IFRS Otra", "F2", Date(45307.0), Text("abc"), Num(5512.0)),
                sale("IFRS Otra", "F2", Date(45308.0), Blank, Text("5510")),
            ],
        );
        write_sales(
            &root.join("agse").join("sub").join("ventas_b.xlsx"),
            &[
                sale("IFRS Otra", "F3", Date(45309.0), Num(1.0), Text("5510")),
                sale("IFRS AGSE SAS", "OLD1", Date(45310.0), Num(2.0), Text("9999")),
            ],
        );
        write_sales(
            &root.join("agse").join("Servigral").join("ventas_sg.xlsx"),
            &[sale("IFRS Otra", "F1", Date(45306.0), Num(7.0), Text("5510"))],
        );
        write_reference(
            &root.join("mapeo_sku.xlsx"),
            &[
                ["AGRAC", "OLD1", "F1", "Herbicidas"],
                ["OTRA", "F2", "F2", "Fungicidas"],
                ["OTRA", "F3", "F3", "Otros"],
            ],
        );

        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn run_args(&self) -> Vec<String> {
        vec![
            "run".into(),
            "--input".into(),
            self.path("agrac").display().to_string(),
            "--input".into(),
            self.path("agse").display().to_string(),
            "--mapping".into(),
            self.path("mapeo_sku.xlsx").display().to_string(),
            "--output-dir".into(),
            self.path("salida").display().to_string(),
        ]
    }
}

/// The binary with no ambient settings file, env config or log filter.
fn ventas(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ventas"));
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("VENTAS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn run(scenario: &Scenario, extra: &[&str]) -> Output {
    let mut args = scenario.run_args();
    args.extend(extra.iter().map(|s| s.to_string()));
    ventas(scenario.dir.path()).args(&args).output().expect("run ventas")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ===========================================================================
// ventas run
// ===========================================================================

#[test]
fn run_writes_consolidated_workbook() {
    let scenario = Scenario::new();
    let output = run(&scenario, &[]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let out = scenario.path("salida").join("datos_ventas_filtrados.xlsx");
    let sheet = ventas_io::xlsx::read_sheet(&out, None).unwrap();
    assert_eq!(sheet.headers, OUTPUT_COLUMNS.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert_eq!(sheet.rows.len(), 2);

    // Sorted by date: the remapped Agrac row (Jan 15) before the F2 row (Jan 16).
    let first = &sheet.rows[0];
    assert_eq!(first[0], RawValue::from("IFRS Agrac"));
    assert!(matches!(first[2], RawValue::DateTime(_)));
    assert_eq!(first[8], RawValue::from("F1"));
    assert_eq!(first[11], RawValue::from("HERBICIDAS"));
    assert_eq!(first[16], RawValue::from("5510"));
    assert_eq!(first[17], RawValue::from("MARCA F1"));

    let second = &sheet.rows[1];
    assert_eq!(second[8], RawValue::from("F2"));
    assert_eq!(second[11], RawValue::from("FUNGICIDAS"));
    assert_eq!(second[12], RawValue::Number(0.0));
    assert_eq!(second[16], RawValue::from("5512"));

    for row in &sheet.rows {
        assert_ne!(row[0], RawValue::from("IFRS Servigral"));
    }
}

#[test]
fn run_json_report() {
    let scenario = Scenario::new();
    let output = run(&scenario, &["--json"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(stdout.trim())
        .unwrap_or_else(|e| panic!("stdout must be JSON: {e}\n{stdout}"));

    assert_eq!(report["status"], "completed");
    assert_eq!(report["rows_written"], 2);

    let files = report["files"]["loaded"].as_array().unwrap();
    assert_eq!(files.len(), 2, "the Servigral folder must not be loaded");
    assert_eq!(files[0]["rows"], 4);
    assert_eq!(files[0]["excluded"], 1);

    let summary = &report["summary"];
    assert_eq!(summary["loaded"], 6);
    assert_eq!(summary["after_key_null_drop"], 4);
    assert_eq!(summary["skus_remapped"], 2);
    assert_eq!(summary["warehouses_unified"], 1);
    assert_eq!(summary["after_warehouse_filter"], 3);
    assert_eq!(summary["after_family_filter"], 2);
    assert_eq!(summary["distinct_skus_after_family_filter"], 2);
}

#[test]
fn run_csv_output_by_name() {
    let scenario = Scenario::new();
    let output = run(&scenario, &["--output-name", "ventas.csv"]);
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let content = std::fs::read_to_string(scenario.path("salida").join("ventas.csv")).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Empresa,Factura,Fecha,"));
    assert!(lines[1].contains("2024-01-15 00:00:00"));
}

#[test]
fn run_from_settings_file() {
    let scenario = Scenario::new();
    let config = scenario.path("settings.toml");
    std::fs::write(
        &config,
        "input_roots = [\"agrac\", \"agse\"]\n\
         mapping_file = \"mapeo_sku.xlsx\"\n\
         output_dir = \"desde_config\"\n",
    )
    .unwrap();

    let output = ventas(scenario.dir.path())
        .args(["run", "--config", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(scenario.path("desde_config").join("datos_ventas_filtrados.xlsx").exists());
}

#[test]
fn no_data_stops_with_exit_4_before_reading_reference() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("vacio")).unwrap();

    let output = ventas(dir.path())
        .args([
            "run",
            "--input",
            dir.path().join("vacio").to_str().unwrap(),
            "--mapping",
            dir.path().join("no_existe.xlsx").to_str().unwrap(),
            "--output-dir",
            dir.path().join("salida").to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("no data loaded"));
    assert!(!dir.path().join("salida").exists());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "stopped");
    assert_eq!(report["stop_reason"], "no_data_loaded");
}

#[test]
fn unreadable_reference_is_exit_3() {
    let scenario = Scenario::new();
    let mut args = scenario.run_args();
    args[6] = scenario.path("no_existe.xlsx").display().to_string();

    let output = ventas(scenario.dir.path()).args(&args).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("reference mapping error"));
    assert!(!scenario.path("salida").exists());
}

#[test]
fn no_allowed_family_is_exit_5() {
    let scenario = Scenario::new();
    write_reference(&scenario.path("mapeo_sku.xlsx"), &[["OTRA", "F2", "F2", "Otros"]]);

    let output = run(&scenario, &[]);
    assert_eq!(output.status.code(), Some(5), "stderr: {}", stderr(&output));
    assert!(!scenario.path("salida").exists());
}

#[test]
fn unwritable_output_is_exit_6() {
    let scenario = Scenario::new();
    std::fs::write(scenario.path("salida"), b"a file, not a folder").unwrap();

    let output = run(&scenario, &[]);
    assert_eq!(output.status.code(), Some(6), "stderr: {}", stderr(&output));
}

#[test]
fn missing_inputs_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = ventas(dir.path())
        .args(["run", "--mapping", "mapeo.xlsx"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("no input folders configured"), "stderr: {err}");
    assert!(err.contains("hint:"), "stderr: {err}");
}

#[test]
fn missing_mapping_is_usage_error() {
    let dir = tempdir().unwrap();
    let output = ventas(dir.path())
        .args(["run", "--input", dir.path().to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
}

#[test]
fn bad_settings_file_is_usage_error() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("settings.toml");
    std::fs::write(&config, "input_roots = ").unwrap();
    let output = ventas(dir.path())
        .args(["run", "--config", config.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
}

// ===========================================================================
// ventas discover / check-mapping
// ===========================================================================

#[test]
fn discover_lists_files_without_servigral() {
    let scenario = Scenario::new();
    let output = ventas(scenario.dir.path())
        .args([
            "discover",
            "--input",
            scenario.path("agrac").to_str().unwrap(),
            "--input",
            scenario.path("agse").to_str().unwrap(),
            "--json",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["count"], 2);
    let files: Vec<String> = report["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_str().unwrap().to_string())
        .collect();
    assert!(files[0].ends_with("ventas_a.xlsx"));
    assert!(files[1].ends_with("ventas_b.xlsx"));
}

#[test]
fn check_mapping_reports_counts() {
    let scenario = Scenario::new();
    let output = ventas(scenario.dir.path())
        .args(["check-mapping", "--mapping", scenario.path("mapeo_sku.xlsx").to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("reference rows:  3"), "stdout: {stdout}");
    assert!(stdout.contains("AGRAC mappings:  1"), "stdout: {stdout}");
    assert!(stdout.contains("distinct SKUs:   3"), "stdout: {stdout}");
}

#[test]
fn version_flag() {
    let dir = tempdir().unwrap();
    let output = ventas(dir.path()).arg("--version").output().unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("ventas "));
}
