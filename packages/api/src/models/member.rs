use store::Role;

/// A member an admin wants to add to their tenant.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

/// Result of a successful plan upgrade.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanChange {
    /// Tenant display name, when the backend sends one.
    pub tenant_name: Option<String>,
    pub previous_plan: String,
    pub new_plan: String,
}
