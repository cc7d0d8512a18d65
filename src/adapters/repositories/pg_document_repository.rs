use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};
use tracing::{debug, info};

use crate::{
    application::{
        dto::document_dto::DocumentDTO, error::ApplicationError,
        repositories::document_repository::DocumentRepository,
    },
    domain::models::document::DocumentRecord,
};

pub struct PgDocumentRepository {
    pool: sqlx::PgPool,
}

impl PgDocumentRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), ApplicationError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;
        info!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, record: DocumentRecord) -> Result<DocumentRecord, ApplicationError> {
        let size_bytes = i64::try_from(record.size_bytes)
            .map_err(|_| ApplicationError::DatabaseError("size_bytes out of range".to_string()))?;

        // A plain INSERT: the UNIQUE constraint on storage_path rejects a second row.
        let query = r#"
            INSERT INTO pdf_documents (
                id, interview_id, coder_id, storage_path, sha256,
                size_bytes, content_type, uploaded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        "#;

        let dto = DocumentDTO::from(record);

        let created: DocumentDTO = query_as::<_, DocumentDTO>(query)
            .bind(dto.id)
            .bind(&dto.interview_id)
            .bind(&dto.coder_id)
            .bind(&dto.storage_path)
            .bind(&dto.sha256)
            .bind(size_bytes)
            .bind(&dto.content_type)
            .bind(dto.uploaded_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        debug!("Inserted metadata row for {}", created.storage_path);
        Ok(created.into())
    }

    async fn find_by_interview(
        &self,
        interview_id: &str,
        coder_id: Option<&str>,
    ) -> Result<Option<DocumentRecord>, ApplicationError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT * FROM pdf_documents WHERE interview_id = ");
        builder.push_bind(interview_id);

        if let Some(coder_id) = coder_id {
            builder.push(" AND coder_id = ");
            builder.push_bind(coder_id);
        }

        builder.push(" ORDER BY uploaded_at ASC LIMIT 1");

        let found: Option<DocumentDTO> = builder
            .build_query_as::<DocumentDTO>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(found.map(DocumentRecord::from))
    }
}
