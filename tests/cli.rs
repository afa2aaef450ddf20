mod common;

use std::fs;

use predicates::{prelude::PredicateBooleanExt, str::contains};
use serde_json::Value;

use common::{INVENTORY, TestWorkspace, fixture_path, stock_lens};

fn inventory_arg() -> String {
    fixture_path(INVENTORY).to_str().unwrap().to_string()
}

#[test]
fn roles_lists_each_column_with_its_roles() {
    stock_lens()
        .args(["roles", "-i", &inventory_arg()])
        .assert()
        .success()
        .stdout(contains("Estoque"))
        .stdout(contains("numeric, stock"))
        .stdout(contains("categorical, variant"))
        .stdout(contains("categorical, image"));
}

#[test]
fn roles_json_matches_classification() {
    let output = stock_lens()
        .args(["roles", "-i", &inventory_arg(), "--json"])
        .output()
        .expect("run roles");
    assert!(output.status.success());
    let roles: Value = serde_json::from_slice(&output.stdout).expect("roles json");
    assert_eq!(roles["numeric"], serde_json::json!(["Estoque"]));
    assert_eq!(roles["stock_column"], "Estoque");
    assert_eq!(roles["variant_column"], "Variante");
    assert_eq!(roles["image_column"], "Foto");
    assert_eq!(roles["categorical"].as_array().unwrap().len(), 5);
}

#[test]
fn summary_json_reports_totals_over_visible_rows() {
    let output = stock_lens()
        .args(["summary", "-i", &inventory_arg(), "--json"])
        .output()
        .expect("run summary");
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).expect("summary json");
    assert_eq!(summary["total"].as_f64(), Some(51.0));
    assert_eq!(summary["mean"].as_f64(), Some(8.5));
    assert_eq!(summary["record_count"].as_u64(), Some(6));
    assert_eq!(summary["goal_progress"].as_u64(), Some(1));
    let monetary = summary["monetary_total"].as_f64().unwrap();
    assert!((monetary - 7027.43).abs() < 1e-6, "got {monetary}");
}

#[test]
fn summary_table_formats_brl_total() {
    stock_lens()
        .args(["summary", "-i", &inventory_arg(), "--stock", ">= 5"])
        .assert()
        .success()
        .stdout(contains("R$ 7.027,43"))
        .stdout(contains("record_count"))
        .stdout(contains("44"));
}

#[test]
fn rows_applies_search_and_marks_images() {
    stock_lens()
        .args(["rows", "-i", &inventory_arg(), "--search", "anel"])
        .assert()
        .success()
        .stdout(contains("Ouro 18k"))
        .stdout(contains("[img] fotos/anel-prata.jpg"))
        .stdout(contains("Colar").not());
}

#[test]
fn rows_sorts_and_limits() {
    let output = stock_lens()
        .args([
            "rows",
            "-i",
            &inventory_arg(),
            "--sort",
            "Estoque:desc",
            "--limit",
            "2",
        ])
        .output()
        .expect("run rows");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 4);
    assert!(lines[2].starts_with("Brinco Argola"));
    assert!(lines[3].starts_with("Anel Solitário"));
}

#[test]
fn chart_json_uses_variant_labels() {
    let output = stock_lens()
        .args(["chart", "-i", &inventory_arg(), "--json", "--stock", "> 10"])
        .output()
        .expect("run chart");
    assert!(output.status.success());
    let points: Value = serde_json::from_slice(&output.stdout).expect("chart json");
    assert_eq!(
        points,
        serde_json::json!([
            { "label": "Ouro 18k", "value": 12.0 },
            { "label": "Sem Variante", "value": 25.0 }
        ])
    );
}

#[test]
fn export_writes_visible_rows_in_header_order() {
    let workspace = TestWorkspace::new();
    let output = workspace.path().join("estoque_zerado.csv");
    stock_lens()
        .args([
            "export",
            "-i",
            &inventory_arg(),
            "--stock",
            "= 0",
            "-o",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();
    let written = fs::read_to_string(&output).expect("read export");
    assert_eq!(
        written,
        "Produto,Variante,Estoque,Preço Unitário,Valor Total,Foto\n\
         Colar Riviera,Dourado,0,\"R$ 210,50\",\"R$ 0,00\",fotos/colar.PNG\n"
    );
}

#[test]
fn export_to_stdout_honours_output_delimiter() {
    stock_lens()
        .args([
            "export",
            "-i",
            &inventory_arg(),
            "--search",
            "pulseira",
            "--output-delimiter",
            ";",
        ])
        .assert()
        .success()
        .stdout(contains("Pulseira Elos;Ródio;7;R$ 99,99;R$ 699,93;fotos/pulseira.gif"));
}

#[test]
fn header_only_input_fails_with_empty_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("vazio.csv", "Produto,Estoque\n");
    stock_lens()
        .args(["summary", "-i", path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("empty"));
}

#[test]
fn unknown_column_is_rejected() {
    stock_lens()
        .args(["summary", "-i", &inventory_arg(), "--column", "Peso"])
        .assert()
        .failure()
        .stderr(contains("Column 'Peso' not found"));
}

#[test]
fn categorical_column_cannot_be_charted() {
    stock_lens()
        .args(["chart", "-i", &inventory_arg(), "--column", "Produto"])
        .assert()
        .failure()
        .stderr(contains("not numeric"));
}

#[test]
fn invalid_stock_expression_keeps_every_row() {
    let output = stock_lens()
        .args(["summary", "-i", &inventory_arg(), "--stock", "> muito", "--json"])
        .output()
        .expect("run summary");
    assert!(output.status.success());
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["record_count"].as_u64(), Some(6));
}

#[test]
fn stdin_semicolon_latin1_input_is_supported() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_bytes("latin1.csv", b"Produto;Estoque\nCora\xe7\xe3o;2\nAnel;3\n");
    let input = fs::read(&path).unwrap();
    stock_lens()
        .args([
            "rows",
            "-i",
            "-",
            "--delimiter",
            ";",
            "--input-encoding",
            "latin1",
            "--search",
            "cora",
        ])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Coração"))
        .stdout(contains("Anel").not());
}

#[test]
fn config_file_overrides_heuristics() {
    let workspace = TestWorkspace::new();
    let data = workspace.write(
        "dados.csv",
        "nome,variante,quantidade,preco\nAnel,azul,3,10\nColar,,8,20\n",
    );
    let config = workspace.write(
        "heuristics.yml",
        "stock_keywords: [quantidade]\nmissing_label: sem cor\n",
    );
    let output = stock_lens()
        .args([
            "chart",
            "-i",
            data.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--column",
            "preco",
            "--stock",
            "> 5",
            "--json",
        ])
        .output()
        .expect("run chart");
    assert!(output.status.success());
    let points: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        points,
        serde_json::json!([{ "label": "sem cor", "value": 20.0 }])
    );
}
