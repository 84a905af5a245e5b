use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn jsonp_body(code: &str, name: &str, gsz: &str, gszzl: &str) -> String {
        format!(
            r#"jsonpgz({{"fundcode":"{code}","name":"{name}","jzrq":"2023-12-29","dwjz":"1.2000","gsz":"{gsz}","gszzl":"{gszzl}","gztime":"2024-01-02 14:30"}});"#
        )
    }

    /// Mock fundgz server answering each `(code, body)` pair. Other codes get
    /// the upstream's empty callback.
    pub async fn create_fundgz_mock_server(funds: &[(&str, String)]) -> MockServer {
        let mock_server = MockServer::start().await;
        for (code, body) in funds {
            Mock::given(method("GET"))
                .and(path(format!("/js/{code}.js")))
                .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
                .mount(&mock_server)
                .await;
        }
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("jsonpgz();"))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
holdings:
  - code: "161725"
    shares: 1000
  - code: "999999"
    shares: 10
watchlist: ["003096", "001594"]
market:
  indices:
    - code: "161725"
      name: "白酒指数(招商)"
  hot: ["003096", "005918"]
providers:
  fundgz:
    base_url: {base_url}
    timeout_ms: 1000
"#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

async fn standard_server() -> wiremock::MockServer {
    test_utils::create_fundgz_mock_server(&[
        (
            "161725",
            test_utils::jsonp_body("161725", "招商中证白酒指数", "1.2345", "0.56"),
        ),
        (
            "003096",
            test_utils::jsonp_body("003096", "中欧医疗健康混合C", "2.1000", "-1.20"),
        ),
    ])
    .await
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_for_each_view() {
    let mock_server = standard_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    for command in [
        fundwatch::AppCommand::Portfolio,
        fundwatch::AppCommand::Watchlist,
        fundwatch::AppCommand::Market,
        fundwatch::AppCommand::Quote("161725".to_string()),
        fundwatch::AppCommand::Quote("999999".to_string()),
    ] {
        let result = fundwatch::run_command(command, Some(config_path)).await;
        assert!(result.is_ok(), "Command failed with: {:?}", result.err());
    }
}

#[test_log::test(tokio::test)]
async fn test_app_survives_broken_upstream() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .respond_with(
            wiremock::ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
        )
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fundwatch::run_command(
        fundwatch::AppCommand::Portfolio,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    assert!(result.is_ok(), "Command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_is_an_error() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("absent.yaml");

    let result = fundwatch::run_command(
        fundwatch::AppCommand::Portfolio,
        Some(missing.to_str().unwrap()),
    )
    .await;

    let error = result.expect_err("missing config should fail");
    assert!(error.to_string().contains("Failed to read config file"));
}

#[test_log::test(tokio::test)]
async fn test_session_against_mock_upstream() {
    use fundwatch::core::SyntheticData;
    use fundwatch::core::config::AppConfig;
    use fundwatch::core::session::{SearchOutcome, Session};
    use fundwatch::core::synthetic::CostBasis;
    use fundwatch::providers::{CachingQuoteProvider, FundgzProvider};

    let mock_server = standard_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let provider = CachingQuoteProvider::new(
        FundgzProvider::new(&config.providers.fundgz).unwrap(),
        config.cache_ttl(),
    );
    let synthetic = SyntheticData::seeded(11);

    let mut session = Session::new(config.watchlist.clone());
    session
        .load_holdings(&provider, &config.holdings, &synthetic, &|| ())
        .await;

    // 999999 is unknown upstream and is skipped
    assert_eq!(session.holdings().len(), 1);
    let holding = &session.holdings()[0];
    assert_eq!(holding.quote.name, "招商中证白酒指数");
    assert_eq!(holding.quote.current_valuation, 1.2345);
    assert_eq!(holding.quote.previous_nav, Some(1.2));
    assert!(matches!(holding.cost, CostBasis::Synthetic(_)));

    match session.search(&provider, "003096").await {
        SearchOutcome::Found(quote) => {
            info!(?quote, "Found fund");
            assert_eq!(quote.change_percent, -1.2);
            session.buy(&quote, config.buy_lot);
        }
        other => panic!("Expected fund to be found, got {other:?}"),
    }
    assert_eq!(session.held().count(), 2);
    assert!(session.add_to_watchlist("161725"));

    let report = session.refresh(&provider, &|| ()).await;
    assert_eq!(report.updated, 2);
    assert!(report.stale.is_empty());
}

#[test_log::test(tokio::test)]
#[ignore = "requires network access to the live fundgz endpoint"]
async fn test_real_fundgz_api() {
    use fundwatch::core::config::FundgzProviderConfig;
    use fundwatch::core::{QuoteOutcome, QuoteProvider};
    use fundwatch::providers::FundgzProvider;

    let provider = FundgzProvider::new(&FundgzProviderConfig::default()).unwrap();
    let code = "161725";
    info!(?code, "Fetching valuation from fundgz");

    match provider.fetch_quote(code).await {
        QuoteOutcome::Available(quote) => {
            info!(?quote, "Received valuation");
            assert_eq!(quote.code, code);
            assert!(quote.current_valuation > 0.0);
            assert!(!quote.name.is_empty());
        }
        QuoteOutcome::Unavailable => panic!("Valuation for {code} was unavailable"),
    }
}
