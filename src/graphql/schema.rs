use async_graphql::{Context, EmptySubscription, Object, Result, ResultExt, Schema as GraphQLSchema};

use crate::{
    app_state::AppState,
    models::dto::{
        request::{GenerateQuestionsRequest, ScoreDuplicateRequest, SubmitRatingRequest},
        response::{
            AuditSummary, DuplicateScoreResponse, GeneratedBatchResponse, QuestionDto,
            RatingSummary, SubmitRatingResponse,
        },
    },
};

pub type Schema = GraphQLSchema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn questions(&self, ctx: &Context<'_>) -> Result<Vec<QuestionDto>> {
        let state = ctx.data::<AppState>()?;
        Ok(state
            .question_service
            .list_questions()
            .await
            .into_iter()
            .map(QuestionDto::from)
            .collect())
    }

    async fn audit_summary(&self, ctx: &Context<'_>) -> Result<AuditSummary> {
        let state = ctx.data::<AppState>()?;
        Ok(state.question_service.audit_summary().await)
    }

    async fn rating_summary(&self, ctx: &Context<'_>) -> Result<RatingSummary> {
        let state = ctx.data::<AppState>()?;
        state.rating_service.summary().await.extend()
    }

    /// Scores `candidate` against `corpus`, or against the stored bank when omitted.
    async fn duplicate_score(
        &self,
        ctx: &Context<'_>,
        candidate: String,
        corpus: Option<Vec<String>>,
    ) -> Result<DuplicateScoreResponse> {
        let state = ctx.data::<AppState>()?;
        state
            .question_service
            .score_duplicate(ScoreDuplicateRequest { candidate, corpus })
            .await
            .extend()
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn generate_questions(
        &self,
        ctx: &Context<'_>,
        input: GenerateQuestionsRequest,
    ) -> Result<GeneratedBatchResponse> {
        let state = ctx.data::<AppState>()?;
        let batch = state.question_service.generate_batch(input).await.extend()?;
        Ok(GeneratedBatchResponse {
            plan: batch.plan,
            questions: batch.questions.into_iter().map(QuestionDto::from).collect(),
        })
    }

    async fn submit_rating(
        &self,
        ctx: &Context<'_>,
        input: SubmitRatingRequest,
    ) -> Result<SubmitRatingResponse> {
        let state = ctx.data::<AppState>()?;
        state.rating_service.submit(input).await.extend()
    }
}

pub fn create_schema(app_state: AppState) -> Schema {
    GraphQLSchema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(app_state)
        .finish()
}
