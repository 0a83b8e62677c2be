use fxconv::cli::ui::flag_glyph;
use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const API_KEY: &str = "integration-key";

    pub async fn create_mock_server(base: &str, response: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/v6/{API_KEY}/latest/{base}");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .respond_with(response)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        provider:
          base_url: {base_url}
          api_key: {API_KEY}
        defaults:
          from: "USD"
          to: "INR"
          amount: 10
    "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

const USD_RATES: &str = r#"{
    "result": "success",
    "base_code": "USD",
    "time_last_update_unix": 1700006401,
    "conversion_rates": {"USD": 1, "INR": 83.0, "EUR": 0.92}
}"#;

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(USD_RATES),
    )
    .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let mut out = Vec::new();
    let result = fxconv::run_command_to(
        fxconv::AppCommand::Convert {
            amount: None,
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
        &mut out,
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let output = String::from_utf8(out).expect("View should be valid UTF-8");
    info!("Rendered view:\n{output}");
    assert!(output.contains("830.00"));
    assert!(output.contains("Last updated: "));
    assert!(output.contains(&format!("{} USD", flag_glyph(Some("US")))));
    assert!(output.contains(&format!("{} INR", flag_glyph(Some("IN")))));
    assert!(output.contains("EUR INR USD"));
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_with_overrides() {
    let mock_server = test_utils::create_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(USD_RATES),
    )
    .await;
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(
        config_file.path(),
        format!(
            "provider:\n  base_url: {}\n  api_key: {}\ndefaults:\n  from: GBP\n",
            mock_server.uri(),
            test_utils::API_KEY
        ),
    )
    .expect("Failed to write config file");

    let mut out = Vec::new();
    let result = fxconv::run_command_to(
        fxconv::AppCommand::Convert {
            amount: Some("2.5".to_string()),
            from: Some("usd".to_string()),
            to: Some("eur".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
        &mut out,
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());

    let output = String::from_utf8(out).expect("View should be valid UTF-8");
    assert!(output.contains("2.30"));
    assert!(output.contains(&format!("{} EUR", flag_glyph(Some("EU")))));
    assert!(!output.contains("GBP"));
}

#[test_log::test(tokio::test)]
async fn test_convert_flow_reports_fetch_failure() {
    let mock_server =
        test_utils::create_mock_server("USD", wiremock::ResponseTemplate::new(500)).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let mut out = Vec::new();
    let result = fxconv::run_command_to(
        fxconv::AppCommand::Convert {
            amount: None,
            from: None,
            to: None,
        },
        Some(config_file.path().to_str().unwrap()),
        &mut out,
    )
    .await;

    let expected =
        "Error fetching data: HTTP error: 500 Internal Server Error for base currency: USD";
    let output = String::from_utf8(out).expect("View should be valid UTF-8");
    assert_eq!(output.trim_end(), expected);
    assert!(!output.contains("I have"));

    let err = result.expect_err("Convert should fail when the provider errors");
    info!(%err, "Convert failed as expected");
    assert_eq!(err.to_string(), expected);
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_mock_server(
        "USD",
        wiremock::ResponseTemplate::new(200).set_body_string(USD_RATES),
    )
    .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let mut out = Vec::new();
    let result = fxconv::run_command_to(
        fxconv::AppCommand::Rates { base: None },
        Some(config_file.path().to_str().unwrap()),
        &mut out,
    )
    .await;
    assert!(result.is_ok(), "Rates failed with: {:?}", result.err());

    let output = String::from_utf8(out).expect("Table should be valid UTF-8");
    assert!(output.contains("Rate (1 USD)"));
    assert!(output.contains("Last updated: "));
    assert!(output.contains("83.0000"));
    assert!(output.contains("0.9200"));
    for region in ["US", "IN", "EU"] {
        assert!(output.contains(&flag_glyph(Some(region))));
    }
}

#[test_log::test(tokio::test)]
async fn test_missing_explicit_config_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("absent.yaml");

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates { base: None },
        Some(missing.to_str().unwrap()),
    )
    .await;
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file")
    );
}
