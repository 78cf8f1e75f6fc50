//! # Tenant administration
//!
//! Both operations require an ADMIN session. The role check runs locally so
//! that a member never sends an admin request; the backend still enforces its
//! own checks and answers 401 when it disagrees.
//!
//! `add_member` sends the acting admin's email in the body because the
//! endpoint expects it there. Whether the backend also verifies the session
//! cookie is not something the client can tell, so the email is not a
//! credential.

use serde_json::json;
use store::Session;
use tracing::info;

use crate::error::{ApiError, Endpoint};
use crate::models::{NewMember, PlanChange};
use crate::transport::{dispatch, ApiRequest, Transport};
use crate::wire::{AddMemberRequest, StatusBody, UpgradeBody};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug)]
pub struct MemberAdminClient<T> {
    transport: T,
}

fn require_admin(session: &Session, action: &str) -> Result<(), ApiError> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Authorization(format!("Only admins can {action}.")))
    }
}

impl<T: Transport> MemberAdminClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register a new member in the admin's tenant.
    pub async fn add_member(&self, session: &Session, member: &NewMember) -> Result<(), ApiError> {
        require_admin(session, "add members")?;

        let email = member.email.trim();
        let name = member.name.trim();
        if email.is_empty() || name.is_empty() || member.password.is_empty() {
            return Err(ApiError::Validation("All fields are required".to_string()));
        }
        if member.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }
        let Some(admin_email) = session.email.as_deref().filter(|e| !e.is_empty()) else {
            return Err(ApiError::Auth(
                "Admin email not found. Please log in again.".to_string(),
            ));
        };

        let endpoint = Endpoint::AddMember;
        let request = AddMemberRequest {
            email: admin_email,
            useremail: email,
            user_password: &member.password,
            user_name: name,
            userrole: member.role.as_str(),
        };
        let response =
            dispatch(&self.transport, endpoint, ApiRequest::post("adduser", json!(request)))
                .await?;

        let body: StatusBody = response
            .json()
            .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;
        if !body.success {
            return Err(ApiError::Unexpected {
                status: response.status,
                message: body
                    .message
                    .unwrap_or_else(|| "Failed to add member. Please try again.".to_string()),
            });
        }
        info!("Added {} member {}", member.role, email);
        Ok(())
    }

    /// Move the tenant identified by `slug` to the PRO plan.
    pub async fn upgrade_tenant_plan(
        &self,
        session: &Session,
        slug: &str,
    ) -> Result<PlanChange, ApiError> {
        require_admin(session, "upgrade the plan")?;
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ApiError::Validation(
                "No tenant to upgrade. Please log in again.".to_string(),
            ));
        }

        let endpoint = Endpoint::UpgradePlan;
        let path = format!("api/tenants/{slug}/upgrade");
        let response = dispatch(&self.transport, endpoint, ApiRequest::post(path, json!({}))).await?;

        let body: UpgradeBody = response
            .json()
            .map_err(|e| ApiError::unreadable(response.status, endpoint, e))?;
        match body.data {
            Some(data) if body.success => {
                info!(
                    "Upgraded tenant {} from {} to {}",
                    slug, data.previous_plan, data.new_plan
                );
                Ok(PlanChange {
                    tenant_name: data.name,
                    previous_plan: data.previous_plan,
                    new_plan: data.new_plan,
                })
            }
            _ => Err(ApiError::Unexpected {
                status: response.status,
                message: body
                    .message
                    .unwrap_or_else(|| "Upgrade failed".to_string()),
            }),
        }
    }

    /// Upgrade the tenant the session belongs to.
    pub async fn upgrade_own_tenant(&self, session: &Session) -> Result<PlanChange, ApiError> {
        let slug = session.tenant_slug.clone().unwrap_or_default();
        self.upgrade_tenant_plan(session, &slug).await
    }
}
