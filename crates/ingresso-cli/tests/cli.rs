use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VALID_CPF: &str = "529.982.247-25";

fn run_raw(home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("ingresso")
        .env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(home: &Path, args: &[&str]) -> String {
    let output = run_raw(home, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(home: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_raw(home, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("ingresso.toml");
    fs::write(&path, contents).expect("write config");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).expect("chmod");
    }
    path
}

fn buyer_args<'a>(cpf: &'a str, tipo: &'a str) -> Vec<&'a str> {
    vec![
        "submit",
        "--nome",
        "Maria Silva",
        "--cpf",
        cpf,
        "--ddd",
        "11",
        "--telefone",
        "91234-5678",
        "--email",
        "maria@example.com",
        "--tipo",
        tipo,
    ]
}

#[test]
fn format_applies_field_masks() {
    let temp = TempDir::new().expect("temp dir");
    assert_eq!(run_cmd(temp.path(), &["format", "cpf", "12345678901"]).trim(), "123.456.789-01");
    assert_eq!(run_cmd(temp.path(), &["format", "area-code", "(11)"]).trim(), "11");
    assert_eq!(
        run_cmd(temp.path(), &["format", "phone", "91234-56789"]).trim(),
        "912345678"
    );
}

#[test]
fn check_cpf_reports_validity_through_exit_code() {
    let temp = TempDir::new().expect("temp dir");

    let out = run_cmd(temp.path(), &["check-cpf", "52998224725"]);
    assert_eq!(out.trim(), "529.982.247-25 valid");

    let invalid = run_raw(temp.path(), &["check-cpf", "111.111.111-11"]);
    assert_eq!(invalid.status.code(), Some(3));

    let report = run_raw(temp.path(), &["--json", "check-cpf", "52998224724"]);
    assert_eq!(report.status.code(), Some(3));
    let value: Value = serde_json::from_slice(&report.stdout).expect("parse json");
    assert_eq!(value["valid"], false);
    assert_eq!(value["formatted"], "529.982.247-24");
}

#[test]
fn tickets_lists_default_catalog() {
    let temp = TempDir::new().expect("temp dir");
    let catalog = run_cmd_json(temp.path(), &["tickets"]);
    let tickets = catalog["tickets"].as_array().expect("array");
    assert_eq!(tickets.len(), 6);
    assert!(tickets
        .iter()
        .all(|ticket| ticket["price"].as_f64() == Some(0.1)));

    let single = run_cmd_json(temp.path(), &["tickets", "--type", "backstage-casadinha"]);
    assert_eq!(single["tipo"], "backstage-casadinha");

    let unknown = run_raw(temp.path(), &["tickets", "--type", "camarote"]);
    assert_eq!(unknown.status.code(), Some(3));
}

#[test]
fn tickets_reads_offers_from_config() {
    let temp = TempDir::new().expect("temp dir");
    let config = write_config(
        temp.path(),
        "[tickets]\nfallback_link = \"https://pay.example.com/geral\"\n\n\
         [tickets.offers.pista-individual]\nlink = \"https://pay.example.com/pista\"\n",
    );
    let config = config.to_str().expect("config path");

    let single = run_cmd_json(
        temp.path(),
        &["--config", config, "tickets", "--type", "pista-individual"],
    );
    assert_eq!(single["link"], "https://pay.example.com/pista");

    let missing = run_raw(
        temp.path(),
        &["--config", config, "tickets", "--type", "pista-casadinha"],
    );
    assert_eq!(missing.status.code(), Some(2));
}

#[test]
fn submit_dry_run_prints_payload() {
    let temp = TempDir::new().expect("temp dir");
    let mut args = buyer_args(VALID_CPF, "pista-individual");
    args.push("--dry-run");

    let payload = run_cmd_json(temp.path(), &args);
    assert_eq!(payload["nome"], "Maria Silva");
    assert_eq!(payload["cpf"], "52998224725");
    assert_eq!(payload["ddd"], "11");
    assert_eq!(payload["telefone"], "912345678");
    assert_eq!(payload["tipo"], "pista-individual");
    assert_eq!(payload["price"].as_f64(), Some(0.1));
    assert!(payload["timestamp"].as_str().expect("timestamp").ends_with('Z'));
}

#[test]
fn submit_rejects_invalid_cpf_before_sending() {
    let temp = TempDir::new().expect("temp dir");
    let mut args = buyer_args("123.456.789-00", "pista-individual");
    args.extend_from_slice(&["--endpoint", "http://127.0.0.1:9/hook"]);

    let output = run_raw(temp.path(), &args);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert_eq!(stderr.matches("Por favor informe um CPF válido.").count(), 1);
    assert!(stderr.contains("error: invalid input: field cpf failed validation"));
}

#[test]
fn submit_without_endpoint_is_invalid_input() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_raw(temp.path(), &buyer_args(VALID_CPF, "pista-individual"));
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn countdown_reports_expired_deadline() {
    let temp = TempDir::new().expect("temp dir");
    let out = run_cmd(temp.path(), &["countdown", "--deadline", "2020-01-01T00:00:00-03:00"]);
    assert_eq!(out.trim(), "O tempo acabou!");

    let value = run_cmd_json(temp.path(), &["countdown", "--deadline", "2999-01-01T00:00:00Z"]);
    assert_eq!(value["expired"], false);
    assert!(value["remaining"]["days"].as_i64().expect("days") > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_webhook_delivers_and_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Accepted"))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/hook", server.uri());
    let report = tokio::task::spawn_blocking(move || {
        let temp = TempDir::new().expect("temp dir");
        let mut args = buyer_args(VALID_CPF, "pista-casadinha");
        args.extend_from_slice(&["--mode", "webhook", "--endpoint", endpoint.as_str()]);
        run_cmd_json(temp.path(), &args)
    })
    .await
    .expect("join");

    assert_eq!(report["outcome"]["outcome"], "delivered");
    assert_eq!(report["redirected_to"], "obrigado.html");

    let received = server.received_requests().await.unwrap_or_default();
    let body: Value = serde_json::from_slice(&received[0].body).expect("body json");
    assert_eq!(body["tipo"], "pista-casadinha");
    assert_eq!(body["cpf"], "52998224725");
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_payment_link_halts_on_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let endpoint = format!("{}/hook", server.uri());
    let output = tokio::task::spawn_blocking(move || {
        let temp = TempDir::new().expect("temp dir");
        let mut args = buyer_args(VALID_CPF, "pista-individual");
        args.extend_from_slice(&["--endpoint", endpoint.as_str()]);
        run_raw(temp.path(), &args)
    })
    .await
    .expect("join");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8(output.stderr).expect("utf8");
    assert!(stderr.contains("Erro na criação do pagamento. Tente novamente."));
}
