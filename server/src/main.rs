use anyhow::Result;
use axum::Router;
use clap::Parser;
use server::build_app;
use sift_core::{EmptyDocumentPolicy, IdfMode, IndexConfig, StopwordMatch};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Corpus path (JSON/JSONL file or directory), reloaded on POST /index/rebuild
    #[arg(long, default_value = "./corpus")]
    input: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value_t = StopwordMatch::Exact)]
    stopwords: StopwordMatch,
    #[arg(long, default_value_t = IdfMode::RawOccurrence)]
    idf: IdfMode,
    #[arg(long, default_value_t = EmptyDocumentPolicy::Reject)]
    empty_docs: EmptyDocumentPolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = IndexConfig { stopwords: args.stopwords, idf: args.idf, empty_documents: args.empty_docs };
    let app: Router = build_app(&args.input, config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
