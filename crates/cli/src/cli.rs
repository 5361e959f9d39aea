use clap::Parser;

/// Threat scoring for decoded QR payloads.
///
/// Follows redirect chains and applies the suspicion heuristics,
/// printing one verdict per payload. A thin wrapper over the engine —
/// decoding symbols out of images is someone else's job.
#[derive(Parser, Debug)]
#[command(name = "qrshield", about = "Threat scoring for decoded QR payloads")]
pub struct CliArgs {
    /// Payload strings to evaluate
    pub payloads: Vec<String>,

    /// Read newline-delimited payloads from stdin, debounced like a
    /// frame stream
    #[arg(long)]
    pub stdin: bool,

    /// Emit one JSON verdict per line instead of text
    #[arg(long)]
    pub json: bool,

    /// Per-hop HTTP timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum redirect hops to follow
    #[arg(long)]
    pub max_hops: Option<u32>,

    /// Debounce cooldown in milliseconds (stdin mode)
    #[arg(long)]
    pub cooldown_ms: Option<u64>,

    /// Evaluate every stdin line, bypassing the debounce window
    #[arg(long)]
    pub no_debounce: bool,
}
