use std::sync::Arc;

use contracts::usecases::u501_import_sales::preview::PreviewResult;
use contracts::usecases::u501_import_sales::request::{CreateEntityRequest, SessionAssociations};
use contracts::usecases::u501_import_sales::response::{
    CreateEntityResponse, ImportStartStatus, SessionView, UploadResponse,
};
use contracts::usecases::u501_import_sales::row::{RawRow, ResolvedRow};
use contracts::usecases::u501_import_sales::session::{
    EntityKind, PreviewErrorPolicy, SessionState,
};

use super::committer::{BatchCommitter, SaleBatchCommitter};
use super::entities::{DomainEntityFactory, EntityFactory};
use super::entity_cache::EntityCache;
use super::error::ImportError;
use super::resolver::{DomainPreviewService, PreviewService, RowResolver};
use super::session::ImportSession;
use super::session_store::SessionStore;
use super::uploader::{CsvUploader, RowUploader};

/// Следующий шаг конвейера, вычисленный по снимку сессии.
///
/// Снимок берётся под блокировкой, сам шаг выполняется без неё.
enum Step {
    Resolve(usize, RawRow, EntityCache, SessionAssociations),
    Commit(Vec<ResolvedRow>, SessionAssociations),
    Done,
}

/// Исполнитель конвейера импорта: владеет хранилищем сессий и
/// коллабораторами (парсер, превью, batch commit, создание сущностей).
pub struct ImportExecutor {
    store: SessionStore,
    uploader: Arc<dyn RowUploader>,
    preview: Arc<dyn PreviewService>,
    committer: Arc<dyn BatchCommitter>,
    factory: Arc<dyn EntityFactory>,
    on_preview_error: PreviewErrorPolicy,
}

impl ImportExecutor {
    pub fn new(
        uploader: Arc<dyn RowUploader>,
        preview: Arc<dyn PreviewService>,
        committer: Arc<dyn BatchCommitter>,
        factory: Arc<dyn EntityFactory>,
        on_preview_error: PreviewErrorPolicy,
    ) -> Self {
        Self {
            store: SessionStore::new(),
            uploader,
            preview,
            committer,
            factory,
            on_preview_error,
        }
    }

    /// Боевая сборка: CSV-парсер, доменные превью/commit/фабрика
    pub fn production(on_preview_error: PreviewErrorPolicy) -> Self {
        Self::new(
            Arc::new(CsvUploader),
            Arc::new(DomainPreviewService),
            Arc::new(SaleBatchCommitter),
            Arc::new(DomainEntityFactory),
            on_preview_error,
        )
    }

    /// Загрузить файл и открыть сессию импорта.
    ///
    /// Ошибка разбора или пустой файл фатальны: сессия не создаётся.
    pub async fn start_session(
        &self,
        file_name: &str,
        bytes: &[u8],
        associations: SessionAssociations,
    ) -> Result<UploadResponse, ImportError> {
        let rows = self
            .uploader
            .parse(file_name, bytes, &associations)
            .await
            .map_err(|e| ImportError::Upload(e.to_string()))?;
        if rows.is_empty() {
            return Err(ImportError::Upload(format!(
                "no rows recognized in {}",
                file_name
            )));
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let row_count = rows.len();
        tracing::info!(
            "Import session {} started: {} rows from {}",
            session_id,
            row_count,
            file_name
        );

        self.store
            .insert(ImportSession::new(session_id.clone(), rows, associations));

        // Довести сессию до первого превью; ошибка commit'а (все строки
        // пропущены политикой) остаётся в last_error сессии
        if let Err(err) = self.drive(&session_id).await {
            tracing::warn!("Session {}: initial drive failed: {}", session_id, err);
        }

        Ok(UploadResponse {
            session_id,
            status: ImportStartStatus::Started,
            message: format!("Parsed {} rows", row_count),
            row_count,
        })
    }

    /// Прокрутить сессию вперёд до следующей точки ожидания: превью для
    /// оператора, завершение или ошибка commit'а.
    pub async fn drive(&self, session_id: &str) -> Result<SessionView, ImportError> {
        loop {
            // Шаг выбирается и помечается под одной write-блокировкой:
            // флаг committing ставится до того, как блокировка отпущена,
            // иначе параллельный drive отправил бы batch второй раз
            let step = self.store.with_session_mut(session_id, |s| match s.state {
                SessionState::Processing => match s.current_row() {
                    Some(row) => Step::Resolve(
                        s.cursor,
                        row.clone(),
                        s.cache.clone(),
                        s.associations.clone(),
                    ),
                    None if s.committing => Step::Done,
                    None => {
                        s.committing = true;
                        Step::Commit(s.confirmed.clone(), s.associations.clone())
                    }
                },
                _ => Step::Done,
            })?;

            match step {
                Step::Resolve(cursor, row, cache, associations) => {
                    match self.preview_with_policy(&row, &cache, &associations).await {
                        Ok(preview) => {
                            self.store
                                .with_session_mut(session_id, |s| s.enter_preview(preview))?;
                        }
                        Err(message) => match self.on_preview_error {
                            PreviewErrorPolicy::Prompt => {
                                let err = ImportError::Preview {
                                    row: cursor,
                                    message,
                                };
                                self.store.with_session_mut(session_id, |s| {
                                    s.enter_preview_failed(err.to_string())
                                })?;
                            }
                            PreviewErrorPolicy::Skip | PreviewErrorPolicy::Retry => {
                                tracing::warn!(
                                    "Session {}: preview failed, row {} skipped: {}",
                                    session_id,
                                    cursor,
                                    message
                                );
                                self.store.with_session_mut(session_id, |s| s.auto_skip())?;
                            }
                        },
                    }
                }
                Step::Commit(rows, associations) => {
                    match self.committer.submit(&rows, &associations).await {
                        Ok(outcome) => {
                            self.store.with_session_mut(session_id, |s| {
                                s.committing = false;
                                s.complete(outcome);
                            })?;
                        }
                        Err(err) => {
                            let message = err.to_string();
                            tracing::error!(
                                "Session {}: batch commit failed, {} confirmed rows kept: {}",
                                session_id,
                                rows.len(),
                                message
                            );
                            // Строки остаются в памяти, state — Processing:
                            // клиент может повторить commit
                            self.store.with_session_mut(session_id, |s| {
                                s.committing = false;
                                s.last_error = Some(message.clone());
                            })?;
                            return Err(ImportError::BatchCommit(message));
                        }
                    }
                }
                Step::Done => return self.store.with_session(session_id, |s| s.view()),
            }
        }
    }

    async fn preview_with_policy(
        &self,
        row: &RawRow,
        cache: &EntityCache,
        associations: &SessionAssociations,
    ) -> Result<PreviewResult, String> {
        let attempts = match self.on_preview_error {
            PreviewErrorPolicy::Retry => 2,
            _ => 1,
        };
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match RowResolver::preview_row(self.preview.as_ref(), row, cache, associations).await
            {
                Ok(preview) => return Ok(preview),
                Err(err) => {
                    last_error = err.to_string();
                    if attempt < attempts {
                        tracing::warn!("Preview attempt {} failed, retrying: {}", attempt, err);
                    }
                }
            }
        }
        Err(last_error)
    }

    pub async fn confirm_current_row(
        &self,
        session_id: &str,
        resolved_override: Option<ResolvedRow>,
    ) -> Result<SessionView, ImportError> {
        self.store
            .with_session_mut(session_id, |s| s.confirm(resolved_override))??;
        self.drive(session_id).await
    }

    pub async fn skip_current_row(&self, session_id: &str) -> Result<SessionView, ImportError> {
        self.store.with_session_mut(session_id, |s| s.skip())??;
        self.drive(session_id).await
    }

    /// Принять все оставшиеся строки скопом и сразу выполнить commit
    pub async fn accept_all_remaining(
        &self,
        session_id: &str,
        associations_override: Option<SessionAssociations>,
    ) -> Result<SessionView, ImportError> {
        let accepted = self
            .store
            .with_session_mut(session_id, |s| s.accept_all_remaining(associations_override))??;
        tracing::info!("Session {}: accepted {} remaining rows", session_id, accepted);
        self.drive(session_id).await
    }

    /// Создать недостающую сущность и повторно отрезолвить текущую строку.
    ///
    /// Созданная запись кешируется под именем из превью — последующие
    /// строки с тем же именем резолвятся без обращения к справочнику.
    pub async fn create_missing_entity(
        &self,
        session_id: &str,
        request: CreateEntityRequest,
    ) -> Result<CreateEntityResponse, ImportError> {
        let cache_name = self.store.with_session(session_id, |s| {
            if s.state != SessionState::Preview {
                return Err(ImportError::InvalidState(s.state));
            }
            let preview = s.current_preview.as_ref();
            let name = match request.kind {
                EntityKind::Customer => preview
                    .and_then(|p| p.customer_display_name.clone())
                    .or_else(|| s.current_row().and_then(|r| r.customer_name.clone())),
                EntityKind::Product => preview
                    .and_then(|p| p.product_display_name.clone())
                    .or_else(|| s.current_row().and_then(|r| r.product_name.clone())),
                EntityKind::Offer => s.current_row().and_then(|r| r.offer_name.clone()),
            };
            Ok(name)
        })??;

        let created_id = self.factory.create(request.kind, request.payload).await?;
        tracing::info!(
            "Session {}: created {} #{} ({:?})",
            session_id,
            request.kind.as_str(),
            created_id,
            cache_name
        );

        self.store.with_session_mut(session_id, |s| {
            if let Some(name) = &cache_name {
                s.cache.put(request.kind, name, created_id);
            }
            s.created_entities.push((request.kind, created_id));
            // Текущая строка уходит на повторный резолв уже с кешем
            s.current_preview = None;
            s.last_error = None;
            s.state = SessionState::Processing;
        })?;

        self.drive(session_id).await?;

        Ok(CreateEntityResponse {
            id: created_id,
            cached_name: cache_name,
        })
    }

    /// Повторить batch commit после неудачи (строки остались в памяти).
    ///
    /// Пока предыдущий commit в полёте, повтор отклоняется — иначе
    /// медленный commit плюс нетерпеливый оператор давали бы два batch'а.
    pub async fn retry_commit(&self, session_id: &str) -> Result<SessionView, ImportError> {
        self.store.with_session(session_id, |s| {
            if !s.committing && s.state == SessionState::Processing && s.is_exhausted() {
                Ok(())
            } else {
                Err(ImportError::InvalidState(s.state))
            }
        })??;
        self.drive(session_id).await
    }

    pub fn get_session(&self, session_id: &str) -> Result<SessionView, ImportError> {
        self.store.with_session(session_id, |s| s.view())
    }

    /// Снять сессию. Созданные по ходу сущности остаются в справочниках —
    /// отката нет, факт фиксируется в логе.
    pub fn cancel_session(&self, session_id: &str) -> Result<(), ImportError> {
        let removed = self.store.remove(session_id)?;
        if !removed.created_entities.is_empty() {
            tracing::warn!(
                "Session {} cancelled; {} entities created during the session are kept",
                session_id,
                removed.created_entities.len()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use contracts::usecases::u501_import_sales::response::BatchOutcome;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::usecases::u501_import_sales::resolver::PreviewRequest;

    struct FakeUploader {
        rows: Vec<RawRow>,
    }

    #[async_trait]
    impl RowUploader for FakeUploader {
        async fn parse(
            &self,
            _file_name: &str,
            _bytes: &[u8],
            _params: &SessionAssociations,
        ) -> Result<Vec<RawRow>> {
            Ok(self.rows.clone())
        }
    }

    #[derive(Default)]
    struct FakePreview {
        customers: HashMap<String, i64>,
        products: HashMap<String, i64>,
        calls: AtomicUsize,
        failures_remaining: AtomicUsize,
    }

    #[async_trait]
    impl PreviewService for FakePreview {
        async fn preview(&self, request: &PreviewRequest) -> Result<PreviewResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_remaining.load(Ordering::SeqCst) > 0 {
                self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
                anyhow::bail!("preview backend unavailable");
            }

            let row = &request.row;
            let mut result = PreviewResult {
                unmapped_fields: row.unmapped.clone(),
                ..Default::default()
            };
            let mut resolved = ResolvedRow {
                weight: row.weight,
                price: row.price,
                date: row.date,
                extra: row.unmapped.clone(),
                ..Default::default()
            };

            if let Some(id) = request.cached_customer {
                resolved.customer = Some(id);
            } else if let Some(name) = row.customer_name.as_deref() {
                match self.customers.get(&name.to_lowercase()) {
                    Some(id) => resolved.customer = Some(*id),
                    None => {
                        result.needs_customer_creation = true;
                        result.customer_display_name = Some(name.to_string());
                    }
                }
            }

            if let Some(id) = request.cached_product {
                resolved.product = Some(id);
            } else if let Some(name) = row.product_name.as_deref() {
                match self.products.get(&name.to_lowercase()) {
                    Some(id) => resolved.product = Some(*id),
                    None => {
                        result.needs_product_creation = true;
                        result.product_display_name = Some(name.to_string());
                    }
                }
            }

            resolved.b2b_offer = request.cached_offer.or(request.associations.b2b_offer);
            result.resolved_data = resolved;
            Ok(result)
        }
    }

    #[derive(Default)]
    struct FakeCommitter {
        submitted: Mutex<Vec<ResolvedRow>>,
        calls: AtomicUsize,
        failures_remaining: AtomicUsize,
        delay_ms: AtomicUsize,
    }

    #[async_trait]
    impl BatchCommitter for FakeCommitter {
        async fn submit(
            &self,
            rows: &[ResolvedRow],
            _associations: &SessionAssociations,
        ) -> Result<BatchOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delay_ms.load(Ordering::SeqCst);
            if delay > 0 {
                tokio::time::sleep(std::time::Duration::from_millis(delay as u64)).await;
            }
            if self.failures_remaining.load(Ordering::SeqCst) > 0 {
                self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
                anyhow::bail!("backend rejected batch");
            }
            let mut submitted = self.submitted.lock().unwrap();
            *submitted = rows.to_vec();
            Ok(BatchOutcome {
                created_count: rows.len(),
            })
        }
    }

    struct FakeFactory {
        next_id: AtomicI64,
    }

    impl Default for FakeFactory {
        fn default() -> Self {
            Self {
                next_id: AtomicI64::new(501),
            }
        }
    }

    #[async_trait]
    impl EntityFactory for FakeFactory {
        async fn create(&self, _kind: EntityKind, _payload: serde_json::Value) -> Result<i64> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn raw(customer: &str) -> RawRow {
        RawRow {
            customer_name: Some(customer.to_string()),
            product_name: Some("Wheat".to_string()),
            weight: Some(10.0),
            ..Default::default()
        }
    }

    struct Harness {
        executor: ImportExecutor,
        preview: Arc<FakePreview>,
        committer: Arc<FakeCommitter>,
    }

    fn harness(rows: Vec<RawRow>, preview: FakePreview, policy: PreviewErrorPolicy) -> Harness {
        let preview = Arc::new(preview);
        let committer = Arc::new(FakeCommitter::default());
        let executor = ImportExecutor::new(
            Arc::new(FakeUploader { rows }),
            preview.clone(),
            committer.clone(),
            Arc::new(FakeFactory::default()),
            policy,
        );
        Harness {
            executor,
            preview,
            committer,
        }
    }

    fn known_products() -> FakePreview {
        FakePreview {
            products: HashMap::from([("wheat".to_string(), 42)]),
            ..Default::default()
        }
    }

    fn known_everything() -> FakePreview {
        FakePreview {
            customers: HashMap::from([("acme".to_string(), 1)]),
            products: HashMap::from([("wheat".to_string(), 42)]),
            ..Default::default()
        }
    }

    async fn start(h: &Harness) -> String {
        h.executor
            .start_session("sales.csv", b"", SessionAssociations::default())
            .await
            .unwrap()
            .session_id
    }

    #[tokio::test]
    async fn empty_upload_is_rejected_without_a_session() {
        let h = harness(Vec::new(), FakePreview::default(), PreviewErrorPolicy::Skip);
        let result = h
            .executor
            .start_session("empty.csv", b"", SessionAssociations::default())
            .await;
        assert!(matches!(result, Err(ImportError::Upload(_))));
    }

    #[tokio::test]
    async fn created_entities_are_reused_within_the_session() {
        // Acme, Acme, Beta: первое создание закрывает и вторую строку
        let h = harness(
            vec![raw("Acme"), raw("Acme"), raw("Beta")],
            known_products(),
            PreviewErrorPolicy::Skip,
        );
        let id = start(&h).await;

        let view = h.executor.get_session(&id).unwrap();
        assert_eq!(view.state, SessionState::Preview);
        assert!(view.current_preview.as_ref().unwrap().needs_customer_creation);

        let created = h
            .executor
            .create_missing_entity(
                &id,
                CreateEntityRequest {
                    kind: EntityKind::Customer,
                    payload: serde_json::json!({"description": "Acme"}),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, 501);
        assert_eq!(created.cached_name.as_deref(), Some("Acme"));

        // Строка перерезолвлена с кешем и готова
        let view = h.executor.get_session(&id).unwrap();
        let preview = view.current_preview.unwrap();
        assert!(preview.is_ready());
        assert_eq!(preview.resolved_data.customer, Some(501));

        let view = h.executor.confirm_current_row(&id, None).await.unwrap();
        // Вторая Acme закрыта кешем, справочник не спрашивается
        let preview = view.current_preview.unwrap();
        assert!(!preview.needs_customer_creation);
        assert_eq!(preview.resolved_data.customer, Some(501));

        h.executor.confirm_current_row(&id, None).await.unwrap();

        // Beta в кеше нет — снова создание
        let view = h.executor.get_session(&id).unwrap();
        assert!(view.current_preview.as_ref().unwrap().needs_customer_creation);
        let created = h
            .executor
            .create_missing_entity(
                &id,
                CreateEntityRequest {
                    kind: EntityKind::Product,
                    payload: serde_json::json!({"description": "Beta"}),
                },
            )
            .await
            .err();
        // Создание товара не закрывает ссылку на покупателя
        assert!(created.is_none());
        let created = h
            .executor
            .create_missing_entity(
                &id,
                CreateEntityRequest {
                    kind: EntityKind::Customer,
                    payload: serde_json::json!({"description": "Beta"}),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, 503);

        let view = h.executor.confirm_current_row(&id, None).await.unwrap();
        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.outcome.unwrap().created_count, 3);

        let submitted = h.committer.submitted.lock().unwrap();
        let customers: Vec<_> = submitted.iter().map(|r| r.customer).collect();
        assert_eq!(customers, vec![Some(501), Some(501), Some(503)]);
    }

    #[tokio::test]
    async fn accept_all_commits_without_further_previews() {
        let h = harness(
            vec![raw("Acme"), raw("Beta"), raw("Gamma")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        let id = start(&h).await;
        assert_eq!(h.preview.calls.load(Ordering::SeqCst), 1);

        let view = h.executor.accept_all_remaining(&id, None).await.unwrap();
        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.outcome.unwrap().created_count, 3);
        // Превью больше не вызывалось
        assert_eq!(h.preview.calls.load(Ordering::SeqCst), 1);

        let submitted = h.committer.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 3);
        // Принятые скопом строки несут имена насквозь, без id
        assert_eq!(submitted[0].customer, None);
        assert_eq!(submitted[0].customer_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn skipped_rows_are_excluded_from_the_batch() {
        let h = harness(
            vec![raw("Acme"), raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        let id = start(&h).await;

        h.executor.skip_current_row(&id).await.unwrap();
        let view = h.executor.confirm_current_row(&id, None).await.unwrap();

        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.skipped_count, 1);
        assert_eq!(view.confirmed_count, 1);
        assert_eq!(view.outcome.unwrap().created_count, 1);
        assert_eq!(h.committer.submitted.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn commit_failure_keeps_rows_for_retry() {
        let h = harness(
            vec![raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        h.committer.failures_remaining.store(1, Ordering::SeqCst);
        let id = start(&h).await;

        let result = h.executor.confirm_current_row(&id, None).await;
        assert!(matches!(result, Err(ImportError::BatchCommit(_))));

        // Подтверждённые строки не потеряны, сессия ждёт повтора
        let view = h.executor.get_session(&id).unwrap();
        assert_eq!(view.state, SessionState::Processing);
        assert_eq!(view.confirmed_count, 1);
        assert!(view.last_error.is_some());

        let view = h.executor.retry_commit(&id).await.unwrap();
        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.outcome.unwrap().created_count, 1);
    }

    #[tokio::test]
    async fn retry_during_inflight_commit_does_not_double_submit() {
        let committer = Arc::new(FakeCommitter::default());
        committer.delay_ms.store(200, Ordering::SeqCst);
        let executor = Arc::new(ImportExecutor::new(
            Arc::new(FakeUploader {
                rows: vec![raw("Acme")],
            }),
            Arc::new(known_everything()),
            committer.clone(),
            Arc::new(FakeFactory::default()),
            PreviewErrorPolicy::Skip,
        ));
        let id = executor
            .start_session("sales.csv", b"", SessionAssociations::default())
            .await
            .unwrap()
            .session_id;

        let confirm = {
            let executor = executor.clone();
            let id = id.clone();
            tokio::spawn(async move { executor.confirm_current_row(&id, None).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        // Commit ещё в полёте — повтор отклоняется, второго batch'а нет
        let retry = executor.retry_commit(&id).await;
        assert!(matches!(
            retry,
            Err(ImportError::InvalidState(SessionState::Processing))
        ));

        let view = confirm.await.unwrap().unwrap();
        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.outcome.unwrap().created_count, 1);
        assert_eq!(committer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn skip_policy_swallows_preview_errors() {
        let h = harness(
            vec![raw("Acme"), raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        h.preview.failures_remaining.store(1, Ordering::SeqCst);
        let id = start(&h).await;

        // Первая строка молча пропущена, вторая на превью
        let view = h.executor.get_session(&id).unwrap();
        assert_eq!(view.state, SessionState::Preview);
        assert_eq!(view.cursor, 1);
        assert_eq!(view.skipped_count, 1);

        let view = h.executor.confirm_current_row(&id, None).await.unwrap();
        assert_eq!(view.outcome.unwrap().created_count, 1);
    }

    #[tokio::test]
    async fn retry_policy_retries_the_preview_once() {
        let h = harness(
            vec![raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Retry,
        );
        h.preview.failures_remaining.store(1, Ordering::SeqCst);
        let id = start(&h).await;

        let view = h.executor.get_session(&id).unwrap();
        assert_eq!(view.state, SessionState::Preview);
        assert_eq!(view.skipped_count, 0);
        assert!(view.current_preview.is_some());
        assert_eq!(h.preview.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn prompt_policy_parks_the_error_for_the_operator() {
        let h = harness(
            vec![raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Prompt,
        );
        h.preview.failures_remaining.store(1, Ordering::SeqCst);
        let id = start(&h).await;

        let view = h.executor.get_session(&id).unwrap();
        assert_eq!(view.state, SessionState::Preview);
        assert!(view.current_preview.is_none());
        // Ошибка адресная: оператор видит, какая строка не прошла
        let message = view.last_error.unwrap();
        assert!(message.contains("row 0"), "unexpected error: {}", message);

        // Подтверждение заблокировано, доступен только пропуск
        let result = h.executor.confirm_current_row(&id, None).await;
        assert!(matches!(result, Err(ImportError::RowNotReady(0))));

        let view = h.executor.skip_current_row(&id).await.unwrap();
        assert_eq!(view.state, SessionState::Complete);
        assert_eq!(view.outcome.unwrap().created_count, 0);
    }

    #[tokio::test]
    async fn sessions_do_not_share_state() {
        let h = harness(
            vec![raw("Acme"), raw("Beta")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        let first = start(&h).await;
        let second = start(&h).await;
        assert_ne!(first, second);

        h.executor.confirm_current_row(&first, None).await.unwrap();

        assert_eq!(h.executor.get_session(&first).unwrap().cursor, 1);
        assert_eq!(h.executor.get_session(&second).unwrap().cursor, 0);
    }

    #[tokio::test]
    async fn cancel_removes_the_session() {
        let h = harness(
            vec![raw("Acme")],
            known_everything(),
            PreviewErrorPolicy::Skip,
        );
        let id = start(&h).await;

        h.executor.cancel_session(&id).unwrap();
        assert!(matches!(
            h.executor.get_session(&id),
            Err(ImportError::SessionNotFound(_))
        ));
    }
}
