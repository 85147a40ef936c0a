//! Record catalog service

use validator::Validate;

use crate::{
    error::AppResult,
    models::record::{CreateRecord, ImportRecordRow, Record, RecordQuery, UpdateRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct RecordsService {
    repository: Repository,
}

impl RecordsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, id: i32) -> AppResult<Record> {
        self.repository.records.get_by_id(id).await
    }

    pub async fn list(&self, query: &RecordQuery) -> AppResult<Vec<Record>> {
        self.repository.records.list(query).await
    }

    pub async fn create(&self, record: &CreateRecord) -> AppResult<Record> {
        record.validate()?;
        self.repository.records.create(record).await
    }

    pub async fn update(&self, id: i32, update: &UpdateRecord) -> AppResult<Record> {
        update.validate()?;
        self.repository.records.update(id, update).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.records.delete(id).await
    }

    /// Consume importer rows, replacing the whole collection
    pub async fn import_replace(&self, rows: &[ImportRecordRow]) -> AppResult<usize> {
        for row in rows {
            row.validate()?;
        }
        let count = self.repository.records.replace_all(rows).await?;
        tracing::info!(count, "record collection replaced by import");
        Ok(count)
    }

    /// Records currently held by a user
    pub async fn list_held_by(&self, user_id: i32) -> AppResult<Vec<Record>> {
        self.repository.records.list_held_by(user_id).await
    }
}
