use contracts::usecases::u501_import_sales::preview::PreviewResult;
use contracts::usecases::u501_import_sales::request::SessionAssociations;
use contracts::usecases::u501_import_sales::response::{BatchOutcome, SessionView};
use contracts::usecases::u501_import_sales::row::{RawRow, ResolvedRow};
use contracts::usecases::u501_import_sales::session::{EntityKind, SessionState};

use super::entity_cache::EntityCache;
use super::error::ImportError;

/// Сессия импорта: курсор по строкам, накопленные подтверждения, кеш
/// созданных сущностей.
///
/// Инварианты:
/// - курсор двигается только вперёд (confirm или skip), отката нет;
/// - `confirmed.len() + skipped == cursor` в любой момент;
/// - строго одна строка "в полёте": превью и решения оператора идут
///   последовательно, поздние строки могут зависеть от сущностей,
///   созданных ранними.
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub id: String,
    pub rows: Vec<RawRow>,
    pub cursor: usize,
    pub confirmed: Vec<ResolvedRow>,
    pub skipped: usize,
    pub state: SessionState,
    pub cache: EntityCache,
    pub associations: SessionAssociations,
    /// Превью текущей строки; живёт только пока строка на ревью
    pub current_preview: Option<PreviewResult>,
    pub last_error: Option<String>,
    pub outcome: Option<BatchOutcome>,
    /// Batch commit в полёте; повторный запуск отсекается, пока флаг стоит
    pub committing: bool,
    /// Сущности, созданные за сессию (отката при неудачном commit нет,
    /// но след остаётся в логах и здесь)
    pub created_entities: Vec<(EntityKind, i64)>,
}

impl ImportSession {
    pub fn new(id: String, rows: Vec<RawRow>, associations: SessionAssociations) -> Self {
        Self {
            id,
            rows,
            cursor: 0,
            confirmed: Vec::new(),
            skipped: 0,
            state: SessionState::Processing,
            cache: EntityCache::new(),
            associations,
            current_preview: None,
            last_error: None,
            outcome: None,
            committing: false,
            created_entities: Vec::new(),
        }
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Все строки пройдены, остался только batch commit
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.rows.len()
    }

    pub fn current_row(&self) -> Option<&RawRow> {
        self.rows.get(self.cursor)
    }

    /// Строка отрезолвлена, оператор принимает решение
    pub fn enter_preview(&mut self, preview: PreviewResult) {
        self.current_preview = Some(preview);
        self.last_error = None;
        self.state = SessionState::Preview;
    }

    /// Превью строки не прошло, но оператор должен увидеть ошибку
    /// (политика prompt): подтверждение недоступно, только пропуск
    pub fn enter_preview_failed(&mut self, message: String) {
        self.current_preview = None;
        self.last_error = Some(message);
        self.state = SessionState::Preview;
    }

    /// Подтвердить текущую строку.
    ///
    /// Требует превью без незакрытых ссылок; `resolved_override`
    /// позволяет оператору поправить значения перед подтверждением.
    pub fn confirm(&mut self, resolved_override: Option<ResolvedRow>) -> Result<(), ImportError> {
        if self.state != SessionState::Preview {
            return Err(ImportError::InvalidState(self.state));
        }
        let preview = self
            .current_preview
            .as_ref()
            .ok_or(ImportError::RowNotReady(self.cursor))?;
        if !preview.is_ready() {
            return Err(ImportError::RowNotReady(self.cursor));
        }

        let resolved = resolved_override.unwrap_or_else(|| preview.resolved_data.clone());
        self.confirmed.push(resolved);
        self.step_forward();
        Ok(())
    }

    /// Пропустить текущую строку — в payload она не попадёт
    pub fn skip(&mut self) -> Result<(), ImportError> {
        if self.state != SessionState::Preview {
            return Err(ImportError::InvalidState(self.state));
        }
        self.skipped += 1;
        self.step_forward();
        Ok(())
    }

    /// Тихий пропуск строки при ошибке превью (политика skip)
    pub fn auto_skip(&mut self) {
        self.skipped += 1;
        self.current_preview = None;
        self.cursor += 1;
        debug_assert_eq!(self.confirmed.len() + self.skipped, self.cursor);
    }

    /// Принять все оставшиеся строки без порезолвного превью.
    ///
    /// Строки `[cursor, N)` аннотируются ассоциациями сессии и уходят в
    /// batch как есть — осознанный обход повалидации для доверенных
    /// выгрузок.
    pub fn accept_all_remaining(
        &mut self,
        associations_override: Option<SessionAssociations>,
    ) -> Result<usize, ImportError> {
        if self.state != SessionState::Preview {
            return Err(ImportError::InvalidState(self.state));
        }
        if let Some(assoc) = associations_override {
            self.associations = assoc;
        }

        let accepted = self.rows.len() - self.cursor;
        for raw in &self.rows[self.cursor..] {
            self.confirmed
                .push(ResolvedRow::from_raw_with_associations(raw, &self.associations));
        }
        self.cursor = self.rows.len();
        self.current_preview = None;
        self.state = SessionState::Processing;
        debug_assert_eq!(self.confirmed.len() + self.skipped, self.cursor);
        Ok(accepted)
    }

    /// Batch commit прошёл — сессия завершена
    pub fn complete(&mut self, outcome: BatchOutcome) {
        self.outcome = Some(outcome);
        self.last_error = None;
        self.state = SessionState::Complete;
    }

    fn step_forward(&mut self) {
        self.cursor += 1;
        self.current_preview = None;
        self.state = SessionState::Processing;
        debug_assert_eq!(self.confirmed.len() + self.skipped, self.cursor);
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            state: self.state,
            cursor: self.cursor,
            total_rows: self.rows.len(),
            confirmed_count: self.confirmed.len(),
            skipped_count: self.skipped,
            current_preview: self.current_preview.clone(),
            last_error: self.last_error.clone(),
            outcome: self.outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<RawRow> {
        (0..n)
            .map(|i| RawRow {
                customer_name: Some(format!("Customer {}", i)),
                weight: Some(1.0),
                ..Default::default()
            })
            .collect()
    }

    fn ready_preview() -> PreviewResult {
        PreviewResult {
            resolved_data: ResolvedRow {
                customer: Some(1),
                product: Some(2),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn confirm_requires_ready_preview() {
        let mut session = ImportSession::new("s1".into(), rows(2), Default::default());
        let preview = PreviewResult {
            needs_customer_creation: true,
            customer_display_name: Some("Acme".into()),
            ..Default::default()
        };
        session.enter_preview(preview);

        // Незакрытая ссылка блокирует подтверждение
        assert!(matches!(
            session.confirm(None),
            Err(ImportError::RowNotReady(0))
        ));
        assert_eq!(session.cursor, 0);
    }

    #[test]
    fn confirm_and_skip_keep_cursor_invariant() {
        let mut session = ImportSession::new("s1".into(), rows(3), Default::default());

        session.enter_preview(ready_preview());
        session.confirm(None).unwrap();
        assert_eq!(session.cursor, 1);

        session.enter_preview(ready_preview());
        session.skip().unwrap();
        assert_eq!(session.cursor, 2);

        assert_eq!(session.confirmed.len() + session.skipped, session.cursor);
    }

    #[test]
    fn confirm_override_replaces_resolved_data() {
        let mut session = ImportSession::new("s1".into(), rows(1), Default::default());
        session.enter_preview(ready_preview());

        let override_row = ResolvedRow {
            customer: Some(99),
            product: Some(2),
            weight: Some(42.0),
            ..Default::default()
        };
        session.confirm(Some(override_row.clone())).unwrap();
        assert_eq!(session.confirmed[0], override_row);
    }

    #[test]
    fn accept_all_takes_rows_from_cursor_to_end() {
        let mut session = ImportSession::new("s1".into(), rows(4), Default::default());

        session.enter_preview(ready_preview());
        session.confirm(None).unwrap();

        session.enter_preview(ready_preview());
        let accepted = session.accept_all_remaining(None).unwrap();

        assert_eq!(accepted, 3);
        assert_eq!(session.cursor, 4);
        assert_eq!(session.confirmed.len(), 4);
        assert!(session.is_exhausted());
        // Принятые скопом строки несут имена, а не id
        assert_eq!(session.confirmed[1].customer, None);
        assert_eq!(
            session.confirmed[1].customer_name.as_deref(),
            Some("Customer 1")
        );
    }

    #[test]
    fn skip_is_rejected_outside_preview() {
        let mut session = ImportSession::new("s1".into(), rows(1), Default::default());
        assert!(matches!(
            session.skip(),
            Err(ImportError::InvalidState(SessionState::Processing))
        ));
    }

    #[test]
    fn prompt_failure_blocks_confirm_but_allows_skip() {
        let mut session = ImportSession::new("s1".into(), rows(2), Default::default());
        session.enter_preview_failed("preview failed: timeout".into());

        assert!(matches!(
            session.confirm(None),
            Err(ImportError::RowNotReady(0))
        ));
        session.skip().unwrap();
        assert_eq!(session.skipped, 1);
        assert_eq!(session.cursor, 1);
    }
}
