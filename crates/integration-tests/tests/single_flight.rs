mod harness;

use harness::config::ConfigBuilder;
use harness::repo::MockModelRepo;
use harness::server::TestServer;

/// Two concurrent submissions for the same previously-uncached voice
/// must trigger exactly one model fetch.
#[tokio::test]
async fn concurrent_submissions_share_one_model_fetch() {
    let repo = MockModelRepo::start().await.unwrap();
    let (config, _storage) = ConfigBuilder::new(&repo.base_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let submit = |markdown: &str| {
        let body = serde_json::json!({
            "markdown_text": markdown,
            "voice_id": "en_GB-alan-medium",
        });
        let client = server.client().clone();
        let url = server.url("/convert");
        async move {
            client
                .post(url)
                .json(&body)
                .send()
                .await
                .unwrap()
                .json::<serde_json::Value>()
                .await
                .unwrap()
        }
    };

    let (first, second) = tokio::join!(
        submit("# One\n\nFirst concurrent request."),
        submit("# Two\n\nSecond concurrent request."),
    );

    assert_eq!(first["status"], "completed");
    assert_eq!(second["status"], "completed");
    assert_ne!(first["conversion_id"], second["conversion_id"]);

    assert_eq!(
        repo.model_fetches("en_GB-alan-medium"),
        1,
        "the uncached voice must be fetched exactly once"
    );
}

/// Once cached, later conversions reuse the local model.
#[tokio::test]
async fn cached_voice_is_not_refetched() {
    let repo = MockModelRepo::start().await.unwrap();
    let (config, _storage) = ConfigBuilder::new(&repo.base_url()).build();
    let server = TestServer::start(config).await.unwrap();

    for text in ["First run.", "Second run.", "Third run."] {
        let body: serde_json::Value = server
            .client()
            .post(server.url("/convert"))
            .json(&serde_json::json!({"markdown_text": text, "voice_id": "fr_FR-siwis-medium"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "completed");
    }

    assert_eq!(repo.model_fetches("fr_FR-siwis-medium"), 1);
}
