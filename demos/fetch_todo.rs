use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use webfetch::config::FetchConfig;
use webfetch::{FetchError, Fetcher};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct Todo {
    user_id: u32,
    id: u32,
    title: String,
    completed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Plain GET through the shared default transport
    let resp = webfetch::fetch(
        "https://jsonplaceholder.typicode.com/todos/1",
        None,
        CancellationToken::new(),
    )
    .await?;
    println!("{} {} ok={}", resp.status(), resp.status_text(), resp.ok());
    println!("{}", resp.text());

    // Typed result through a configured fetcher
    let cfg = FetchConfig::builder().user_agent("webfetch-demo/0.1").build()?;
    let fetcher = Fetcher::with_config(&cfg)?;
    let todo: Todo = fetcher
        .fetch_as("https://jsonplaceholder.typicode.com/todos/2", None, CancellationToken::new())
        .await?;
    println!("{todo:?}");

    // POST with a JSON body
    let opts = json!({
        "method": "post",
        "headers": { "Content-Type": "application/json" },
        "body": { "title": "foo", "body": "bar", "userId": 1 },
    });
    let resp = fetcher
        .fetch("https://jsonplaceholder.typicode.com/posts", Some(&opts), CancellationToken::new())
        .await?;
    println!("{} body_used={}", resp.status(), resp.body_used());

    // Options are validated before anything is sent
    let bad = json!({ "method": "invalid" });
    match fetcher.fetch("https://jsonplaceholder.typicode.com/todos/1", Some(&bad), CancellationToken::new()).await {
        Err(FetchError::InvalidMethod(m)) => println!("rejected method {m:?}"),
        other => println!("unexpected: {other:?}"),
    }

    Ok(())
}
