use crate::domain::model::{ArtworkData, ArtworkField, ValuationResult};
use crate::domain::ports::ValuationService;
use crate::utils::error::{Result, ValuationError};

pub const MISSING_ARTIST_MESSAGE: &str = "Please provide at least the artist's name.";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    Success(ValuationResult),
    Error(String),
}

/// 每次 `begin` 發出的序號；只有最新的序號能寫回結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SubmitTicket(u64);

/// 單一使用者的表單與估價狀態
pub struct Session<S: ValuationService> {
    service: S,
    data: ArtworkData,
    state: SessionState,
    latest_ticket: u64,
}

impl<S: ValuationService> Session<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            data: ArtworkData::default(),
            state: SessionState::Idle,
            latest_ticket: 0,
        }
    }

    pub fn data(&self) -> &ArtworkData {
        &self.data
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub fn valuation(&self) -> Option<&ValuationResult> {
        match &self.state {
            SessionState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn set_field(&mut self, field: ArtworkField, value: impl Into<String>) {
        self.data.set(field, value);
    }

    /// 依欄位名稱更新，名稱未知時回傳驗證錯誤
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field: ArtworkField = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// 驗證後進入 Loading，清掉前一次的結果與錯誤
    ///
    /// 驗證失敗也算一次新的送出：序號照樣遞增，讓仍在途中的舊請求失效，
    /// 並以錯誤狀態取代前一次的估價結果（不與錯誤訊息並存）。
    pub fn begin(&mut self) -> Result<SubmitTicket> {
        self.latest_ticket += 1;

        if !self.data.has_artist() {
            tracing::debug!("Submit rejected: artist name missing");
            self.state = SessionState::Error(MISSING_ARTIST_MESSAGE.to_string());
            return Err(ValuationError::validation(MISSING_ARTIST_MESSAGE));
        }

        self.state = SessionState::Loading;
        tracing::debug!("Session -> Loading (ticket {})", self.latest_ticket);
        Ok(SubmitTicket(self.latest_ticket))
    }

    /// 套用請求結果；被後續 `begin` 取代的舊請求會被忽略，回傳 false
    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        outcome: &Result<ValuationResult>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                "Ignoring superseded result for ticket {} (latest is {})",
                ticket.0,
                self.latest_ticket
            );
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    "Valuation ready with {} source(s)",
                    result.sources.len()
                );
                SessionState::Success(result.clone())
            }
            Err(e) => {
                tracing::warn!("Valuation failed: {}", e);
                SessionState::Error(e.user_friendly_message())
            }
        };
        true
    }

    /// 送出目前的表單：一次外部呼叫，不重試、不快取
    pub async fn submit(&mut self) -> Result<ValuationResult> {
        let ticket = self.begin()?;
        let outcome = self.service.valuate(&self.data).await;
        self.complete(ticket, &outcome);
        outcome
    }
}
