//! Purchase session handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};
use validator::Validate;

use core_kernel::{DependentId, SessionId, Sequenced};
use domain_pricing::AddOnSelection;
use domain_purchase::{
    add_dependent, complete_purchase, remove_dependent, update_dependent, DependentEdit,
    FormDataPatch, OtpOutcome, PurchaseAction, PurchaseConfirmation, PurchaseFlow,
};

use crate::dto::session::*;
use crate::session::PurchaseSession;
use crate::{error::ApiError, AppState};

async fn load_session(state: &AppState, id: &str) -> Result<Arc<PurchaseSession>, ApiError> {
    let session_id: SessionId = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid session id: {}", id)))?;
    state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session not found: {}", id)))
}

fn snapshot(session: &PurchaseSession, flow: &PurchaseFlow) -> SessionResponse {
    SessionResponse {
        id: session.id,
        created_at: session.created_at,
        transitions: flow.transitions(),
        state: flow.state().clone(),
    }
}

/// Dependents can only be edited once a policy type covering them is chosen
fn ensure_covers_dependents(state: &AppState, flow: &PurchaseFlow) -> Result<(), ApiError> {
    let code = flow
        .state()
        .policy_type()
        .ok_or_else(|| ApiError::Conflict("No policy type selected".to_string()))?;
    if state.catalog.require_policy_type(code.as_str())?.covers_dependents {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Policy type {} does not cover dependents",
            code
        )))
    }
}

/// Starts a purchase session, optionally with a policy type preselected
pub async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let mut session = PurchaseSession::new(&state.config);

    if let Some(code) = request.policy_type {
        state.catalog.require_policy_type(code.as_str())?;
        session.flow.get_mut().dispatch(PurchaseAction::SetPolicyType(code));
    }

    let response = {
        let flow = session.flow.read().await;
        snapshot(&session, &flow)
    };
    info!(session = %session.id, "Purchase session created");
    state.sessions.insert(Arc::new(session)).await;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let flow = session.flow.read().await;
    Ok(Json(snapshot(&session, &flow)))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session = load_session(&state, &id).await?;
    state.sessions.remove(&session.id).await;
    info!(session = %session.id, "Purchase session closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Dispatches a raw `{"type", "payload"}` action
///
/// Unknown or malformed actions leave the state untouched and answer 422
/// with the rejection outcome. A reset or policy-type change discards quotes
/// still being priced.
pub async fn dispatch_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(action): Json<Value>,
) -> Result<(StatusCode, Json<DispatchResponse>), ApiError> {
    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;

    let outcome = flow.dispatch_value(action);
    if outcome.invalidates_quotes() {
        session.quotes.invalidate();
    }
    if outcome.is_reset() {
        session.otp.cancel();
    }
    let status = if outcome.is_applied() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((
        status,
        Json(DispatchResponse {
            outcome,
            state: flow.state().clone(),
        }),
    ))
}

pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;
    flow.dispatch(PurchaseAction::ResetPurchase);
    session.quotes.invalidate();
    session.otp.cancel();
    Ok(Json(snapshot(&session, &flow)))
}

/// Prices a provider with the given add-ons
///
/// The pricing delay runs without the session lock. A fresh result is
/// published into the flow (current provider and premium breakdown) only if
/// no newer quote, reset or policy-type change happened in the meantime.
pub async fn request_quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let provider = state
        .catalog
        .require_provider(request.provider_id.as_str())?
        .clone();

    if let Some(code) = session.flow.read().await.state().policy_type() {
        if code != &provider.policy_type {
            return Err(ApiError::BadRequest(format!(
                "Provider {} does not offer {} policies",
                provider.id, code
            )));
        }
    }

    let selection: AddOnSelection = request.add_on_ids.into_iter().collect();
    let outcome = session.quotes.quote(&provider, &selection).await?;

    let (request_id, calculation) = match outcome {
        Sequenced::Fresh { request_id, value } => (request_id, value),
        Sequenced::Superseded { request_id, latest } => {
            return Ok(Json(QuoteResponse::Superseded { request_id, latest }))
        }
    };

    let mut flow = session.flow.write().await;
    let policy_type_matches = flow
        .state()
        .policy_type()
        .map_or(true, |code| code == &provider.policy_type);
    if !session.quotes.is_latest(request_id) || !policy_type_matches {
        debug!(request_id, "Quote superseded before publishing");
        return Ok(Json(QuoteResponse::Superseded {
            request_id,
            latest: session.quotes.latest(),
        }));
    }

    if flow.state().current_provider().map(|p| &p.id) != Some(&provider.id) {
        flow.dispatch(PurchaseAction::SetCurrentProvider(Box::new(provider)));
    }
    flow.dispatch(PurchaseAction::UpdatePremiumBreakdown(
        calculation.breakdown.clone(),
    ));

    Ok(Json(QuoteResponse::Fresh {
        request_id,
        calculation,
    }))
}

/// Appends a blank dependent
pub async fn add_dependent_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DependentsResponse>), ApiError> {
    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;
    ensure_covers_dependents(&state, &flow)?;

    let dependents = add_dependent(flow.state().form_data().dependents(), Utc::now());
    flow.dispatch(PurchaseAction::UpdateFormData(
        FormDataPatch::new().dependents(dependents.clone()),
    ));

    Ok((StatusCode::CREATED, Json(DependentsResponse { dependents })))
}

/// Edits one field of the dependent at a list position
pub async fn update_dependent_entry(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
    Json(edit): Json<DependentEdit>,
) -> Result<Json<DependentsResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;
    ensure_covers_dependents(&state, &flow)?;

    let dependents = update_dependent(flow.state().form_data().dependents(), index, edit)?;
    flow.dispatch(PurchaseAction::UpdateFormData(
        FormDataPatch::new().dependents(dependents.clone()),
    ));

    Ok(Json(DependentsResponse { dependents }))
}

pub async fn remove_dependent_entry(
    State(state): State<AppState>,
    Path((id, dependent_id)): Path<(String, String)>,
) -> Result<Json<DependentsResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;
    ensure_covers_dependents(&state, &flow)?;

    let dependents = remove_dependent(
        flow.state().form_data().dependents(),
        &DependentId::new(dependent_id),
    )?;
    flow.dispatch(PurchaseAction::UpdateFormData(
        FormDataPatch::new().dependents(dependents.clone()),
    ));

    Ok(Json(DependentsResponse { dependents }))
}

/// Issues an OTP for the given number, or the one already on the form
///
/// Changing the number clears any earlier verification.
pub async fn send_otp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Option<Json<SendOtpRequest>>,
) -> Result<(StatusCode, Json<OtpSentResponse>), ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;

    let session = load_session(&state, &id).await?;
    let mut flow = session.flow.write().await;

    let mobile = request
        .mobile
        .or_else(|| flow.state().form_data().mobile().map(str::to_string))
        .ok_or_else(|| ApiError::Validation("No mobile number to verify".to_string()))?;

    session.otp.send(&mobile)?;
    flow.dispatch(PurchaseAction::UpdateFormData(
        FormDataPatch::new()
            .field("mobile", mobile.clone())
            .mobile_verified(false),
    ));

    Ok((
        StatusCode::ACCEPTED,
        Json(OtpSentResponse {
            status: "sent",
            mobile,
        }),
    ))
}

/// Checks an entered OTP after the verification delay
///
/// A verification for a number that was replaced or reset in the meantime
/// is reported as superseded and never marks the form.
pub async fn verify_otp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<OtpResponse>, ApiError> {
    request.validate()?;
    let session = load_session(&state, &id).await?;

    let outcome = session.otp.verify(&request.code).await;

    let mut flow = session.flow.write().await;
    let outcome = match outcome {
        OtpOutcome::Verified { mobile } if !session.otp.is_pending(&mobile) => {
            debug!(session = %session.id, "OTP verified for a replaced number");
            OtpOutcome::Superseded
        }
        other => other,
    };
    if let OtpOutcome::Verified { mobile } = &outcome {
        flow.dispatch(PurchaseAction::UpdateFormData(
            FormDataPatch::new()
                .field("mobile", mobile.clone())
                .mobile_verified(true),
        ));
        info!(session = %session.id, "Mobile number verified");
    }

    Ok(Json(OtpResponse {
        outcome,
        mobile_verified: flow.state().form_data().mobile_verified,
    }))
}

/// Completes the purchase or reports every outstanding issue
pub async fn submit_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<PurchaseConfirmation>), ApiError> {
    let session = load_session(&state, &id).await?;
    let flow = session.flow.read().await;

    let code = flow
        .state()
        .policy_type()
        .ok_or_else(|| ApiError::Conflict("No policy type selected".to_string()))?;
    let validator = state.validator(code.as_str())?;

    let confirmation = complete_purchase(flow.state(), validator, Utc::now())?;
    info!(
        session = %session.id,
        policy_number = %confirmation.policy_number,
        "Policy issued"
    );

    Ok((StatusCode::CREATED, Json(confirmation)))
}
