use crate::config_loader::ConfigError;
use thiserror::Error;

/// 분석 경계(입력 검증, 설정, 입출력)에서 발생하는 오류
///
/// 지표/패턴 계산 자체는 오류를 반환하지 않습니다. 데이터가 부족하면
/// `None`, 빈 목록 또는 중립 결과를 돌려줍니다.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 해석할 수 없는 캔들 간격 문자열
    #[error("잘못된 캔들 간격: {0}")]
    InvalidInterval(String),

    /// 0 크기 버킷, 0 윈도우 등 계산이 성립하지 않는 구간
    #[error("유효하지 않은 윈도우: {0}")]
    DegenerateWindow(String),

    /// OHLCV 필드가 손상된 캔들
    #[error("잘못된 캔들 (index {index}): {reason}")]
    MalformedCandle { index: usize, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 오류: {0}")]
    Json(#[from] serde_json::Error),
}

/// 분석 경계 연산 결과
pub type AnalysisResult<T> = Result<T, AnalysisError>;
