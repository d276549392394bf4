//! fcm-cli — 批量响应解码与消息发送的命令行工具
//!
//! Usage:
//!   fcm-cli decode-batch <file> --content-type <value>   Decode a captured batch response
//!   fcm-cli send --project <id> --token <device> [--title <t>] [--body <b>] [--dry-run]
//!   fcm-cli version
//!   fcm-cli help

use anyhow::{anyhow, bail, Context};
use async_fcm::{
    FcmClientBuilder, Message, Notification, RawResponse, ResponseDecoder, StaticTokenProvider,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "decode-batch" => cmd_decode_batch(&args[2..]),
        "send" => cmd_send(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"fcm-cli — async-fcm 命令行工具

USAGE:
    fcm-cli <COMMAND> [OPTIONS]

COMMANDS:
    decode-batch <file> --content-type <value>
                                Decode a captured multipart batch response body
    send --project <id> --token <device> [--title <t>] [--body <b>] [--dry-run]
                                Send one notification
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    FCM_ACCESS_TOKEN            OAuth2 bearer token used by `send`
    FCM_BASE_URL                FCM endpoint override
    RUST_LOG                    Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("fcm-cli {} (async-fcm {})", env!("CARGO_PKG_VERSION"), env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn cmd_decode_batch(args: &[String]) -> anyhow::Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| anyhow!("decode-batch needs a file argument"))?;
    let content_type = flag_value(args, "--content-type")
        .ok_or_else(|| anyhow!("decode-batch needs --content-type"))?;

    let body = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
    let resp = RawResponse::new(200, headers, body);

    let batch = ResponseDecoder::new().decode_batch(&resp)?;
    for (i, outcome) in batch.responses().iter().enumerate() {
        let id = outcome.content_id().unwrap_or("-");
        match (outcome.message_id(), outcome.error()) {
            (Some(message_id), None) => println!("[{i}] {id} OK {message_id}"),
            (_, Some(err)) => println!("[{i}] {id} FAILED {} {}", err.kind(), err.message()),
            (None, None) => println!("[{i}] {id} EMPTY"),
        }
    }
    println!(
        "{} succeeded, {} failed",
        batch.success_count(),
        batch.failure_count()
    );
    Ok(())
}

async fn cmd_send(args: &[String]) -> anyhow::Result<()> {
    let project = flag_value(args, "--project").ok_or_else(|| anyhow!("send needs --project"))?;
    let token = flag_value(args, "--token").ok_or_else(|| anyhow!("send needs --token"))?;
    let title = flag_value(args, "--title").unwrap_or("Test notification");
    let body = flag_value(args, "--body").unwrap_or("");
    let dry_run = has_flag(args, "--dry-run");

    let provider = StaticTokenProvider::from_env("FCM_ACCESS_TOKEN")?;
    let client = FcmClientBuilder::new()
        .with_project_id(project)
        .with_token_provider(Arc::new(provider))
        .build()?;

    let message = Message::to_token(token).with_notification(Notification::new(title, body));
    let outcome = client.send(&message, dry_run).await?;
    match outcome.into_result() {
        Ok(message_id) => {
            println!("sent {message_id}");
            Ok(())
        }
        Err(err) => bail!("{} (retryable: {})", err, err.is_retryable()),
    }
}
