//! 批量扫描主流程与并行调度
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::detect::Detector;
use crate::error::{Error, Result};
use crate::options::{DetectOptions, ScanOptions, ScanStats};
use crate::types::{Detection, OutputItem};

/// 单个文件的扫描结果
enum FileOutcome {
    /// 超过大小上限或无法读取，跳过
    Skipped,
    /// 已检测（可能未确定编码）
    Scanned(Option<Detection>),
}

/// 扫描文件或目录，并将结果以 JSON 数组流式写入 `out`
/// 稳定性保证：先收集文件并按路径排序，输出顺序与线程数无关
pub fn scan_and_write(input: &Path, out: &mut dyn Write, opts: &ScanOptions, detector: &Detector) -> Result<ScanStats> {
    let files = collect_files(input, opts.recursive)?;
    let mut stats = ScanStats::default();

    // 决策：线程数>1 走并行调度；否则串行
    let threads = opts.threads.unwrap_or_else(num_cpus::get);
    if threads > 1 && files.len() > 1 {
        scan_and_write_parallel(&files, out, opts, detector, &mut stats, threads)?;
        return Ok(stats);
    }

    write!(out, "[")?;
    let mut first = true;
    for path in &files {
        let outcome = scan_file(path, opts.max_file_size, &opts.detect, detector);
        write_outcome(out, &mut first, &mut stats, path, outcome)?;
    }
    write!(out, "]")?;
    Ok(stats)
}

/// 收集待扫描文件：输入为文件时直接返回；目录默认只扫一层
fn collect_files(input: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut walker = WalkDir::new(input).min_depth(1);
    if !recursive {
        walker = walker.max_depth(1);
    }
    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            // 根目录本身不可读是硬错误；子项出错跳过
            Err(e) if e.depth() == 0 => return Err(Error::Walk { path: input.to_path_buf(), source: e }),
            Err(e) => {
                warn!(error = %e, "skip unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    // 按路径排序，确保输出顺序稳定
    files.sort();
    Ok(files)
}

/// 检测单个文件（只读预读窗口）
fn scan_file(path: &Path, max_file_size: Option<u64>, options: &DetectOptions, detector: &Detector) -> FileOutcome {
    if let Some(max) = max_file_size {
        if let Ok(md) = std::fs::metadata(path) {
            if md.len() > max {
                debug!(path = %path.display(), size = md.len(), "file too large, skipped");
                return FileOutcome::Skipped;
            }
        }
    }
    let detected = File::open(path)
        .map_err(Error::from)
        .and_then(|mut f| detector.detect_reader_with_method(&mut f, options));
    match detected {
        Ok(d) => FileOutcome::Scanned(d),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "read failed, skipped");
            FileOutcome::Skipped
        }
    }
}

/// 写出一个 JSON 元素并更新统计
fn write_outcome(
    out: &mut dyn Write,
    first: &mut bool,
    stats: &mut ScanStats,
    path: &Path,
    outcome: FileOutcome,
) -> Result<()> {
    let detection = match outcome {
        FileOutcome::Skipped => {
            stats.files_skipped += 1;
            return Ok(());
        }
        FileOutcome::Scanned(d) => d,
    };
    stats.files_scanned += 1;
    if detection.is_some() {
        stats.files_detected += 1;
    }
    if !*first { write!(out, ",")?; } else { *first = false; }
    let path = path.to_string_lossy();
    let item = OutputItem::new(&path, detection.as_ref());
    serde_json::to_writer(&mut *out, &item)?;
    Ok(())
}

/// 并行调度：
/// - Rayon 线程池并行检测
/// - 当前线程作为 Writer 按 idx 重排并流式写 JSON，保证稳定顺序
fn scan_and_write_parallel(
    files: &[PathBuf],
    out: &mut dyn Write,
    opts: &ScanOptions,
    detector: &Detector,
    stats: &mut ScanStats,
    threads: usize,
) -> Result<()> {
    use crossbeam_channel as channel;
    use rayon::prelude::*;
    use std::collections::BTreeMap;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    write!(out, "[")?;
    let mut first = true;

    let (tx, rx) = channel::bounded::<(usize, FileOutcome)>(256);

    // out 不跨线程：扫描放在作用域线程里，Writer 留在当前线程
    std::thread::scope(|s| -> Result<()> {
        s.spawn(move || {
            pool.install(|| {
                files.par_iter().enumerate().for_each_with(tx, |tx, (idx, path)| {
                    let outcome = scan_file(path, opts.max_file_size, &opts.detect, detector);
                    let _ = tx.send((idx, outcome));
                });
            });
            // tx 全部被丢弃后 Receiver 收到关闭信号
        });

        // Writer：维护 next_idx 与缓存，按序输出
        // rx 移入闭包：Writer 出错提前返回时随之丢弃，发送端不会阻塞
        let rx = rx;
        let mut next_idx = 0usize;
        let mut buffer: BTreeMap<usize, FileOutcome> = BTreeMap::new();
        while let Ok((idx, outcome)) = rx.recv() {
            buffer.insert(idx, outcome);
            while let Some(outcome) = buffer.remove(&next_idx) {
                write_outcome(out, &mut first, stats, &files[next_idx], outcome)?;
                next_idx += 1;
            }
        }
        Ok(())
    })?;

    write!(out, "]")?;
    Ok(())
}
