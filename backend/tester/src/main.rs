use anyhow::{Result, bail};
use clap::Parser;
use reqwest::{Client, StatusCode, header::LOCATION, redirect::Policy};
use serde_json::Value;
use status::{TrackableType, evaluate};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "http://localhost:1111")]
    base_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let base_url = args.base_url.trim_end_matches('/');

    let client = Client::builder().redirect(Policy::none()).build()?;

    check_signout(&client, base_url).await?;
    check_status(&client, base_url).await?;
    check_debug_env(&client, base_url).await?;

    println!("All checks passed");

    Ok(())
}

async fn check_signout(client: &Client, base_url: &str) -> Result<()> {
    let response = client
        .post(format!("{base_url}/auth/signout"))
        .header("cookie", "sb-access-token=not-a-real-token")
        .send()
        .await?;

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    println!("Sign out: {} -> {location}", response.status());

    if response.status() != StatusCode::FOUND || !location.ends_with("/login") {
        bail!("Sign out did not redirect to /login");
    }

    Ok(())
}

async fn check_status(client: &Client, base_url: &str) -> Result<()> {
    for kind in [TrackableType::Good, TrackableType::Bad] {
        for count in [0, 3] {
            let body: Value = client
                .get(format!("{base_url}/api/trackables/status"))
                .query(&[("type", kind.to_string()), ("count", count.to_string())])
                .send()
                .await?
                .json()
                .await?;

            let expected = evaluate(kind, count);
            println!("Status {kind} x{count}: {body}");

            if body["success"] != expected.success || body["label"] != expected.label.as_str() {
                bail!("Unexpected verdict for {kind} with count {count}");
            }
        }
    }

    Ok(())
}

async fn check_debug_env(client: &Client, base_url: &str) -> Result<()> {
    let body: Value = client
        .get(format!("{base_url}/api/debug/env"))
        .send()
        .await?
        .json()
        .await?;

    println!("Debug env: {body}");

    match body.as_object() {
        Some(report) if report.values().all(Value::is_boolean) => Ok(()),
        _ => bail!("Debug env did not report booleans"),
    }
}
