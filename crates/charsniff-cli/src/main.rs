use anyhow::{Context, Result};
use charsniff_core::{load_config, scan_and_write, Detector, ScanOptions};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "charsniff", version, about = "多后端字符编码检测")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 检测文件或目录中各文件的编码，输出 JSON 数组
    Detect {
        /// 输入文件或目录
        input: PathBuf,

        /// 输出文件（JSON 数组）；"-" 表示标准输出
        #[arg(long, default_value = "-")]
        output: PathBuf,

        /// 最低置信度（0-1）
        #[arg(long)]
        confidence: Option<f32>,

        /// 只尝试指定方法（见 `charsniff methods`）
        #[arg(long)]
        method: Option<String>,

        /// 线程数（"auto"=CPU 核心数）
        #[arg(long)]
        threads: Option<String>,

        /// 最大扫描文件大小（单位字节，例如 5242880 代表 5MB）
        #[arg(long)]
        max_file_size: Option<u64>,

        /// 递归扫描子目录
        #[arg(long)]
        recursive: bool,

        /// 配置文件路径（TOML），命令行参数优先
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// 列出可用的检测方法
    Methods {
        /// 列出全部方法（包括未编译进来的）
        #[arg(long)]
        all: bool,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();
    let detector = Detector::global();

    match cli.command {
        Commands::Detect { input, output, confidence, method, threads, max_file_size, recursive, config } => {
            info!(?input, ?output, "starting detection");

            // 配置文件 < 命令行参数
            let mut opts = match &config {
                Some(path) => load_config(path)
                    .with_context(|| format!("load config {}", path.display()))?
                    .into_scan_options(),
                None => ScanOptions::default(),
            };
            if let Some(c) = confidence { opts.detect.confidence = c; }
            if method.is_some() { opts.detect.method = method; }
            if let Some(t) = threads.as_deref() { opts.threads = parse_threads(t); }
            if max_file_size.is_some() { opts.max_file_size = max_file_size; }
            opts.recursive |= recursive;

            let mut out: Box<dyn Write> = if output.as_os_str() == "-" {
                Box::new(BufWriter::new(io::stdout().lock()))
            } else {
                Box::new(BufWriter::new(File::create(&output).context("create output file")?))
            };
            let stats = scan_and_write(&input, &mut *out, &opts, detector).context("detect and write failed")?;
            writeln!(out)?;
            out.flush().context("flush output")?;

            info!(
                files_scanned = stats.files_scanned,
                files_detected = stats.files_detected,
                files_skipped = stats.files_skipped,
                "detection finished"
            );
        }
        Commands::Methods { all } => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            if all {
                let available = detector.available_methods();
                for m in detector.all_methods() {
                    let mark = if available.contains(&m) { "available" } else { "unavailable" };
                    writeln!(out, "{m}\t{mark}")?;
                }
            } else {
                for m in detector.available_methods() {
                    writeln!(out, "{m}")?;
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，避免污染 stdout 上的 JSON
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析线程参数："auto" 或非法值表示自动（非法值打印警告）
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => {
            warn!(threads = s, "invalid --threads value, falling back to auto");
            None
        }
    }
}
