use crate::auth::{AuthToken, Session};
use crate::cache::CacheManager;
use crate::error::TallyResult;
use crate::models::{LoginRequest, SignupRequest, TokenResponse};
use crate::transport::ApiClient;
use tracing::{info, warn};

/// Sign in and start a session.
///
/// Every cache namespace is invalidated since the previous data may belong
/// to another user.
pub async fn login(
    api: &ApiClient,
    cache: &CacheManager,
    request: &LoginRequest,
) -> TallyResult<()> {
    request.validate()?;
    let response: TokenResponse = api.post_json("/auth/login", request).await?;
    start_session(api.session(), cache, response)?;
    info!(email = %request.email, "logged in");
    Ok(())
}

/// Create an account and start a session
pub async fn signup(
    api: &ApiClient,
    cache: &CacheManager,
    request: &SignupRequest,
) -> TallyResult<()> {
    request.validate()?;
    let response: TokenResponse = api.post_json("/auth/signup", request).await?;
    start_session(api.session(), cache, response)?;
    info!(email = %request.email, "signed up");
    Ok(())
}

/// End the session. Requests already sent keep the header they were sent with.
pub fn logout(session: &Session, cache: &CacheManager) -> TallyResult<()> {
    let cleared = session.clear();
    cache.invalidate_all();
    cleared.inspect_err(|e| warn!(error = %e, "session file not removed on logout"))?;
    info!("logged out");
    Ok(())
}

fn start_session(
    session: &Session,
    cache: &CacheManager,
    response: TokenResponse,
) -> TallyResult<()> {
    let token = AuthToken::new(response.access_token)?;
    session.set_with_type(token, &response.token_type)?;
    cache.invalidate_all();
    Ok(())
}
