use std::path::PathBuf;

use clap::ValueHint;
use nalgebra::Vector3;

use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,tilemesh=info,inspect=info",
        env = "INSPECT_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    /// Translation from model space to world space
    #[arg(short, long, default_value = "0,0,0", value_parser = parse_vec3::<f64>, value_name = "X,Y,Z")]
    pub offset: Vector3<f64>,
    /// Generate tangents even for primitives without a normal map
    #[arg(short = 't', long)]
    pub always_include_tangents: bool,
    /// Number of raster overlay texture coordinate sets to map to UV channels
    #[arg(long, default_value_t = 3)]
    pub overlay_count: usize,
    /// Cook a collision mesh for each primitive
    #[arg(short, long)]
    pub collision: bool,
    /// Files to convert
    #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
#[error("expected 3 comma-separated components, found {0}")]
struct ComponentCount(usize);

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let split: Vec<&str> = s.trim().split(',').collect();
    let [x, y, z] = split.as_slice() else {
        return Err(ComponentCount(split.len()).into());
    };
    Ok(nalgebra::vector![
        R::from_str(x.trim())?,
        R::from_str(y.trim())?,
        R::from_str(z.trim())?
    ])
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
