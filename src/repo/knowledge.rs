use crate::client::{Direction, SupabaseClient, SupabaseResult};
use crate::model::{
    DefinitionFields, DefinitionRow, FinancialKnowledgeDefinition, KnowledgeRow, NewDefinition,
    UserKnowledgeLevel, UserKnowledgeRecord,
};

const DEFINITIONS: &str = "financial_knowledge_definitions";
const USER_KNOWLEDGE: &str = "user_financial_knowledge";

/// Repository for `financial_knowledge_definitions`
pub struct DefinitionsRepo;

impl DefinitionsRepo {
    #[tracing::instrument(name = "Fetch all knowledge definitions", skip(db))]
    pub async fn fetch_all(db: &SupabaseClient) -> SupabaseResult<Vec<FinancialKnowledgeDefinition>> {
        db.table(DEFINITIONS)
            .order("category", Direction::Asc)
            .order("level", Direction::Asc)
            .fetch()
            .await
    }

    /// Loose rows for building the catalog
    #[tracing::instrument(name = "Fetch knowledge catalog rows", skip(db))]
    pub async fn fetch_rows(db: &SupabaseClient) -> SupabaseResult<Vec<DefinitionRow>> {
        db.table(DEFINITIONS)
            .select("id,category,level,description")
            .fetch()
            .await
    }

    #[tracing::instrument(name = "Fetch knowledge definition", skip(db))]
    pub async fn fetch(
        db: &SupabaseClient,
        id: i64,
    ) -> SupabaseResult<Option<FinancialKnowledgeDefinition>> {
        db.table(DEFINITIONS).eq("id", id).fetch_optional().await
    }

    #[tracing::instrument(name = "Insert knowledge definition", skip(db))]
    pub async fn insert(
        db: &SupabaseClient,
        definition: &NewDefinition,
    ) -> SupabaseResult<Option<FinancialKnowledgeDefinition>> {
        let rows: Vec<FinancialKnowledgeDefinition> = db.table(DEFINITIONS).insert(definition).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Update knowledge definition", skip(db))]
    pub async fn update(
        db: &SupabaseClient,
        id: i64,
        changes: &DefinitionFields,
    ) -> SupabaseResult<Option<FinancialKnowledgeDefinition>> {
        let rows: Vec<FinancialKnowledgeDefinition> =
            db.table(DEFINITIONS).eq("id", id).update(changes).await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Delete knowledge definition", skip(db))]
    pub async fn delete(db: &SupabaseClient, id: i64) -> SupabaseResult<()> {
        let _: Vec<FinancialKnowledgeDefinition> = db.table(DEFINITIONS).eq("id", id).delete().await?;
        Ok(())
    }
}

/// Repository for `user_financial_knowledge`
pub struct UserKnowledgeRepo;

impl UserKnowledgeRepo {
    #[tracing::instrument(name = "Fetch user knowledge", skip(db))]
    pub async fn fetch_for_user(db: &SupabaseClient, user_id: i64) -> SupabaseResult<Vec<KnowledgeRow>> {
        db.table(USER_KNOWLEDGE)
            .select("user_id,category,level")
            .eq("user_id", user_id)
            .fetch()
            .await
    }

    #[tracing::instrument(name = "Fetch user knowledge category", skip(db))]
    pub async fn fetch(
        db: &SupabaseClient,
        user_id: i64,
        category: &str,
    ) -> SupabaseResult<Option<KnowledgeRow>> {
        db.table(USER_KNOWLEDGE)
            .select("user_id,category,level")
            .eq("user_id", user_id)
            .eq("category", category)
            .fetch_optional()
            .await
    }

    /// Insert, or replace the level for an existing (user, category)
    #[tracing::instrument(name = "Upsert user knowledge", skip(db))]
    pub async fn upsert(
        db: &SupabaseClient,
        record: &UserKnowledgeRecord<'_>,
    ) -> SupabaseResult<Option<KnowledgeRow>> {
        let rows: Vec<KnowledgeRow> = db
            .table(USER_KNOWLEDGE)
            .on_conflict("user_id,category")
            .upsert(record)
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Update user knowledge level", skip(db))]
    pub async fn update_level(
        db: &SupabaseClient,
        user_id: i64,
        category: &str,
        level: i32,
    ) -> SupabaseResult<Option<KnowledgeRow>> {
        let rows: Vec<KnowledgeRow> = db
            .table(USER_KNOWLEDGE)
            .eq("user_id", user_id)
            .eq("category", category)
            .update(&UserKnowledgeLevel { level })
            .await?;
        Ok(rows.into_iter().next())
    }

    #[tracing::instrument(name = "Delete user knowledge", skip(db))]
    pub async fn delete(db: &SupabaseClient, user_id: i64, category: &str) -> SupabaseResult<()> {
        let _: Vec<KnowledgeRow> = db
            .table(USER_KNOWLEDGE)
            .eq("user_id", user_id)
            .eq("category", category)
            .delete()
            .await?;
        Ok(())
    }
}
