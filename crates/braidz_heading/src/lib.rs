//! braidz Heading Extractor Library
//!
//! braidz → stim.csv / opto.csv → 보간된 heading CSV
//! 아카이브 하나당 출력 파일 하나, 아카이브는 순차 처리

pub mod archive;
pub mod discover;
pub mod source;
pub mod writer;

use anyhow::{Context, Result};
use heading_core::{CalibrationTable, HeadingError, HeadingFunction};
use serde::Serialize;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub use archive::read_stimulus_table;
pub use discover::discover_archives;
pub use source::ArchiveSource;
pub use writer::{output_file_name, write_output};

pub const BUILTIN_CALIBRATION: &str = "built-in";

/// 캘리브레이션 테이블과 그 출처
#[derive(Debug, Clone)]
pub struct Calibration {
    pub table: CalibrationTable,
    /// 파일 경로, URL 또는 "built-in"
    pub origin: String,
}

/// 캘리브레이션 테이블 로드
///
/// # Arguments
///
/// * `source` - `screen,heading` CSV 경로 또는 URL (None이면 내장 테이블)
///
/// # Returns
///
/// 검증된 캘리브레이션 테이블과 출처
pub fn load_calibration(source: Option<&str>) -> heading_core::Result<Calibration> {
    let Some(source) = source else {
        return Ok(Calibration {
            table: CalibrationTable::builtin(),
            origin: BUILTIN_CALIBRATION.to_string(),
        });
    };

    let table = match ArchiveSource::parse(source) {
        ArchiveSource::Local(path) => CalibrationTable::from_path(&path)?,
        remote => {
            let bytes = remote.read_bytes()?;
            CalibrationTable::from_reader(Cursor::new(bytes), source)?
        }
    };
    log::info!("Loaded {} calibration entries from {}", table.len(), source);

    Ok(Calibration {
        table,
        origin: source.to_string(),
    })
}

/// 처리 완료된 아카이브
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedArchive {
    pub source: String,
    /// 행을 읽은 멤버 (`stim.csv` 또는 `opto.csv`)
    pub table: String,
    /// 샘플 값을 가져온 컬럼
    pub column: &'static str,
    pub rows: usize,
    pub output: PathBuf,
}

/// 건너뛴 아카이브
#[derive(Debug, Clone, Serialize)]
pub struct SkippedArchive {
    pub source: String,
    /// 에러 종류 (예: "missing_data")
    pub kind: &'static str,
    pub reason: String,
}

/// 배치 실행 결과
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// 생성 시각 (RFC3339 형식)
    pub created_at: String,
    /// 캘리브레이션 출처
    pub calibration: String,
    pub processed: Vec<ProcessedArchive>,
    pub skipped: Vec<SkippedArchive>,
}

impl BatchReport {
    /// 빈 리포트 생성
    pub fn new(calibration: &str) -> Self {
        Self {
            created_at: chrono::Utc::now().to_rfc3339(),
            calibration: calibration.to_string(),
            processed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// 전체 아카이브 수 (처리 + 건너뜀)
    pub fn total(&self) -> usize {
        self.processed.len() + self.skipped.len()
    }

    /// 기록된 전체 행 수
    pub fn rows_written(&self) -> usize {
        self.processed.iter().map(|p| p.rows).sum()
    }
}

/// 아카이브 하나를 보간하여 `<stem>.csv` 생성
///
/// 모든 행을 읽고 변환한 뒤에만 출력 파일을 만든다.
///
/// # Arguments
///
/// * `source` - 입력 braidz 경로 또는 URL
/// * `output_dir` - 출력 디렉토리
/// * `heading` - screen position → heading 보간 함수
///
/// # Returns
///
/// 처리 결과 (읽은 테이블, 행 수, 출력 경로)
pub fn process_archive(
    source: &ArchiveSource,
    output_dir: &Path,
    heading: &HeadingFunction,
) -> heading_core::Result<ProcessedArchive> {
    // 1. 아카이브 읽기
    let origin = source.to_string();
    let bytes = source.read_bytes()?;

    // 2. stim.csv / opto.csv 추출
    let table = read_stimulus_table(bytes, &origin)?;

    // 3. 행별 heading 계산
    let rows = table.to_output_rows(heading);

    // 4. 출력 파일 쓰기
    let output = output_dir.join(output_file_name(source));
    write_output(&output, &rows)?;
    log::info!("Interpolated {} to {}", origin, output.display());

    Ok(ProcessedArchive {
        source: origin,
        table: table.name,
        column: table.column.name(),
        rows: rows.len(),
        output,
    })
}

/// 아카이브 목록을 순차 처리
///
/// 실패한 아카이브는 로그에 남기고 건너뛴다. 같은 출력 파일명을 가진
/// 아카이브는 처음 것만 기록하고 나머지는 `duplicate_output`으로 건너뛴다.
///
/// # Arguments
///
/// * `sources` - 처리할 아카이브 목록
/// * `output_dir` - 출력 디렉토리
/// * `calibration` - 캘리브레이션 테이블
///
/// # Returns
///
/// 처리/건너뜀 목록이 담긴 배치 리포트
pub fn run_batch(
    sources: &[ArchiveSource],
    output_dir: &Path,
    calibration: &Calibration,
) -> heading_core::Result<BatchReport> {
    let heading = HeadingFunction::new(&calibration.table)?;
    let mut report = BatchReport::new(&calibration.origin);
    let mut written: HashSet<PathBuf> = HashSet::new();

    for source in sources {
        let output = output_dir.join(output_file_name(source));
        let result = if written.contains(&output) {
            Err(HeadingError::DuplicateOutput(output.display().to_string()))
        } else {
            process_archive(source, output_dir, &heading)
        };

        match result {
            Ok(processed) => {
                written.insert(processed.output.clone());
                report.processed.push(processed);
            }
            Err(err) => {
                log::warn!("Skipping {}: {}", source, err);
                report.skipped.push(SkippedArchive {
                    source: source.to_string(),
                    kind: err.kind(),
                    reason: err.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// 배치 리포트를 JSON 파일로 저장
///
/// # Arguments
///
/// * `path` - 출력 JSON 경로
/// * `report` - 저장할 리포트
pub fn save_report(path: &Path, report: &BatchReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    Ok(())
}
