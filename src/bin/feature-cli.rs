use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "feature-cli")]
#[command(about = "Query a running feature service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:2999")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the feature document of a gene
    Feature {
        gene: String,
        #[arg(short, long)]
        transcript: Option<String>,
    },
    /// Print protein name, sequence lengths, and feature counts
    Summary {
        gene: String,
        #[arg(short, long)]
        transcript: Option<String>,
    },
    /// Print service health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Feature { gene, transcript } => {
            if let Some(doc) = fetch_feature(&client, base, &gene, transcript.as_deref()).await? {
                println!("{}", serde_json::to_string_pretty(&doc)?);
            }
        }
        Commands::Summary { gene, transcript } => {
            if let Some(doc) = fetch_feature(&client, base, &gene, transcript.as_deref()).await? {
                print_summary(&doc);
            }
        }
        Commands::Health => {
            let res = client.get(format!("{base}/health")).send().await?;
            if let Some(json) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
    }

    Ok(())
}

async fn fetch_feature(
    client: &reqwest::Client,
    base: &str,
    gene: &str,
    transcript: Option<&str>,
) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut query = vec![("ensemblGeneId", gene)];
    if let Some(transcript) = transcript {
        query.push(("ensemblTranscriptId", transcript));
    }
    let res = client.get(format!("{base}/")).query(&query).send().await?;
    read_json(res).await
}

async fn read_json(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}

fn print_summary(doc: &Value) {
    let text_len = |pointer: &str| doc.pointer(pointer).and_then(Value::as_str).map_or(0, str::len);
    let count = |key: &str| doc.get(key).and_then(Value::as_array).map_or(0, Vec::len);

    println!(
        "Protein:        {}",
        doc.pointer("/protein/name").and_then(Value::as_str).unwrap_or("-")
    );
    println!("Amino acids:    {}", text_len("/protein/sequences/aminoAcid"));
    println!("Coding bases:   {}", text_len("/protein/sequences/translatedDna"));
    println!("Domains:        {}", count("domains"));
    println!("Variants:       {}", count("variants"));
}
