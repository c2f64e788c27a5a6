//! Submission handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    handlers::submissions::{SubmitRequest, SubmitResponse, SubmissionView},
    models::Challenge,
    services::JudgeService,
    state::AppState,
};

fn public_flags(challenge: Option<&Challenge>) -> Vec<bool> {
    challenge
        .map(|c| c.test_cases.iter().map(|tc| tc.is_public).collect())
        .unwrap_or_default()
}

/// Submit code for judging. Blocks until a terminal verdict is reached.
pub async fn submit(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    request.validate()?;

    info!(
        %challenge_id,
        user_id = %request.user_id,
        language = %request.language,
        "Submission received"
    );

    let (submission, message) = JudgeService::submit(
        state.challenges(),
        state.pool(),
        challenge_id,
        request.user_id,
        request.code,
        request.language,
    )
    .await?;

    info!(
        submission_id = %submission.id,
        status = %submission.status,
        "Submission judged"
    );

    let challenge = state.challenges().get(&challenge_id).await?;
    let view = SubmissionView::from_submission(&submission, &public_flags(challenge.as_ref()));
    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            submission: view,
            message,
        }),
    ))
}

/// Poll a submission by id
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionView>> {
    let submission = JudgeService::get_submission(state.submissions(), &id).await?;
    // The challenge may have been deleted since; every case is then private
    let challenge = state.challenges().get(&submission.challenge_id).await?;
    Ok(Json(SubmissionView::from_submission(
        &submission,
        &public_flags(challenge.as_ref()),
    )))
}
