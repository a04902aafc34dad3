//! semchunk — command-line front end for the chunking pipeline.
//!
//! Pipeline flow: text → sentences → windows → embeddings → chunks → stdout

mod cli;
mod output;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use semchunk_core::config::{load_dotenv, AnchorCoverage};
use semchunk_core::{Chunk, Config, ConfigError};
use semchunk_ingest::document::segment;
use semchunk_ingest::embedding::build_embedder;
use semchunk_ingest::{AnchorParams, ChunkPipeline, SequentialParams};

use crate::cli::{ChunkArgs, CliArgs, Command, Strategy};
use crate::output::{read_input, JsonLines};

#[tokio::main]
async fn main() -> Result<()> {
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let mut sink = JsonLines::stdout();
    run(args.command, load_config, &mut sink).await?;
    sink.finish()?;
    Ok(())
}

fn load_config() -> Result<Config, ConfigError> {
    let config = Config::from_env()?;
    config.log_summary();
    Ok(config)
}

/// Execute one subcommand. Configuration is loaded only by the subcommands
/// that read it.
async fn run<W: Write>(
    command: Command,
    load_config: impl FnOnce() -> Result<Config, ConfigError>,
    sink: &mut JsonLines<W>,
) -> Result<()> {
    match command {
        Command::Segment { input } => {
            let text = read_input(&input)?;
            let sentences = segment(&text);
            sink.write_all(&sentences)?;
            info!(sentences = sentences.len(), "segmentation complete");
        }
        Command::Windows { input, buffer_size } => {
            let buffer_size = match buffer_size {
                Some(size) => size,
                None => {
                    let config = load_config().context("failed to load configuration")?;
                    configured_buffer_size(&config)?
                }
            };
            let text = read_input(&input)?;
            let windows = ChunkPipeline::windows(&text, buffer_size);
            sink.write_all(&windows)?;
            info!(windows = windows.len(), buffer_size, "windows written");
        }
        Command::Chunk(args) => {
            let config = load_config().context("failed to load configuration")?;
            run_chunk(args, &config, sink).await?;
        }
    }
    Ok(())
}

async fn run_chunk<W: Write>(
    args: ChunkArgs,
    config: &Config,
    sink: &mut JsonLines<W>,
) -> Result<()> {
    let buffer_size = match args.buffer_size {
        Some(size) => size,
        None => configured_buffer_size(config)?,
    };
    let text = read_input(&args.input)?;

    let mut sequential = SequentialParams::from(&config.chunking);
    if let Some(threshold) = args.threshold {
        sequential.threshold = threshold;
    }
    let mut anchor = AnchorParams::from(&config.chunking);
    if let Some(stride) = args.anchor_stride {
        anchor.anchor_stride = stride;
    }
    if args.full_coverage {
        anchor.coverage = AnchorCoverage::Full;
    }
    if let Some(limit) = args.word_limit {
        sequential.word_limit = limit;
        anchor.word_limit = limit;
    }

    let embedder = build_embedder(config).context("failed to create embedding provider")?;
    let pipeline = ChunkPipeline::from_config(embedder, config);
    let windows = ChunkPipeline::windows(&text, buffer_size);

    let mut written = 0;
    match args.strategy {
        Strategy::Sequential => {
            let chunks = pipeline.chunk_sequential(&windows, &sequential).await?;
            written += emit(&pipeline, sink, chunks, args.index, None).await?;
        }
        Strategy::Anchor => {
            let chunks = pipeline.chunk_by_anchors(&windows, &anchor).await?;
            written += emit(&pipeline, sink, chunks, args.index, None).await?;
        }
        Strategy::Both => {
            let (by_sequence, by_anchor) =
                pipeline.chunk_both(&windows, &sequential, &anchor).await?;
            written += emit(&pipeline, sink, by_sequence, args.index, Some("sequential")).await?;
            written += emit(&pipeline, sink, by_anchor, args.index, Some("anchor")).await?;
        }
    }
    info!(records = written, indexed = args.index, "chunks written");
    Ok(())
}

/// Write chunks, embedding them first when `index` is set. Returns the number
/// of records written.
async fn emit<W: Write>(
    pipeline: &ChunkPipeline,
    sink: &mut JsonLines<W>,
    chunks: Vec<Chunk>,
    index: bool,
    tag: Option<&'static str>,
) -> Result<usize> {
    let count = chunks.len();
    if index {
        let indexed = pipeline.index_chunks(chunks).await?;
        match tag {
            Some(strategy) => sink.write_tagged(strategy, &indexed)?,
            None => sink.write_all(&indexed)?,
        }
    } else {
        match tag {
            Some(strategy) => sink.write_tagged(strategy, &chunks)?,
            None => sink.write_all(&chunks)?,
        }
    }
    Ok(count)
}

fn configured_buffer_size(config: &Config) -> Result<usize, ConfigError> {
    config
        .chunking
        .buffer_size
        .ok_or_else(|| ConfigError::Missing("--buffer-size or CHUNK_BUFFER_SIZE".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn write_input(name: &str, text: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("semchunk-{}-{name}.txt", std::process::id()));
        std::fs::write(&path, text).unwrap();
        path
    }

    fn broken_config() -> Result<Config, ConfigError> {
        Err(ConfigError::Invalid {
            key: "CHUNK_WORD_LIMIT".to_string(),
            value: "lots".to_string(),
        })
    }

    fn config_with(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup("", &move |key: &str| vars.get(key).cloned())
    }

    fn lines(buf: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(buf)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn segment_ignores_broken_config() {
        let path = write_input("segment", "One. Two!");
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf);
        let command = Command::Segment {
            input: path.display().to_string(),
        };
        run(command, broken_config, &mut sink).await.unwrap();
        assert_eq!(sink.finish().unwrap(), 2);

        let values = lines(&buf);
        assert_eq!(values[1]["text"], "Two!");
        assert_eq!(values[1]["index"], 1);
    }

    #[tokio::test]
    async fn windows_with_flag_ignores_broken_config() {
        let path = write_input("windows-flag", "A. B. C.");
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf);
        let command = Command::Windows {
            input: path.display().to_string(),
            buffer_size: Some(1),
        };
        run(command, broken_config, &mut sink).await.unwrap();
        sink.finish().unwrap();

        let texts: Vec<String> = lines(&buf)
            .iter()
            .map(|v| v["text"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(texts, vec!["A.B.", "A.B.C.", "B.C."]);
    }

    #[tokio::test]
    async fn windows_falls_back_to_configured_buffer() {
        let path = write_input("windows-config", "A. B.");
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf);
        let command = Command::Windows {
            input: path.display().to_string(),
            buffer_size: None,
        };
        run(command, || config_with(&[("CHUNK_BUFFER_SIZE", "0")]), &mut sink)
            .await
            .unwrap();
        assert_eq!(sink.finish().unwrap(), 2);
    }

    #[tokio::test]
    async fn windows_without_buffer_reports_config_error() {
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf);

        let command = Command::Windows {
            input: "unused.txt".to_string(),
            buffer_size: None,
        };
        let err = run(command, broken_config, &mut sink).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Invalid { .. })
        ));

        let command = Command::Windows {
            input: "unused.txt".to_string(),
            buffer_size: None,
        };
        let err = run(command, || config_with(&[]), &mut sink).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Missing(_))
        ));
    }
}
