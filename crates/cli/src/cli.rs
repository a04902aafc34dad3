use clap::{Args, Parser, Subcommand, ValueEnum};

/// Semantic chunking for retrieval pipelines.
///
/// Splits cleaned text into sentences, widens each sentence into a context
/// window, and groups windows into chunks using embedding similarity. Output
/// is written to stdout as JSON lines; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "semchunk", version, about = "Windowed semantic chunking")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split text into sentence records
    Segment {
        /// Input file, or `-` for stdin
        input: String,
    },

    /// Build one context window per sentence
    Windows {
        /// Input file, or `-` for stdin
        input: String,

        /// Neighbouring sentences on each side (falls back to CHUNK_BUFFER_SIZE)
        #[arg(long)]
        buffer_size: Option<usize>,
    },

    /// Embed windows and group them into chunks
    Chunk(ChunkArgs),
}

#[derive(Args, Debug)]
pub struct ChunkArgs {
    /// Input file, or `-` for stdin
    pub input: String,

    /// Neighbouring sentences on each side (falls back to CHUNK_BUFFER_SIZE)
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Chunking strategy
    #[arg(long, value_enum, default_value_t = Strategy::Sequential)]
    pub strategy: Strategy,

    /// Sequential similarity threshold in [0, 1] (overrides CHUNK_THRESHOLD)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Word budget per chunk (overrides CHUNK_WORD_LIMIT)
    #[arg(long)]
    pub word_limit: Option<usize>,

    /// Seed an anchor every N windows (overrides CHUNK_ANCHOR_STRIDE)
    #[arg(long)]
    pub anchor_stride: Option<usize>,

    /// Keep anchoring until every window belongs to a chunk
    #[arg(long)]
    pub full_coverage: bool,

    /// Embed the resulting chunks and emit indexing records
    #[arg(long)]
    pub index: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    Anchor,
    Both,
}
