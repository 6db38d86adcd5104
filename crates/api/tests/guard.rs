use saas_api::{AuthzError, MembershipContext, TenantContext, bootstrap, ensure_can};
use saas_auth::{AbilityError, Action, Membership, Organization, Project, Role, SubjectKind};
use saas_core::{MembershipId, OrganizationId, ProjectId, UserId};
use serde_json::json;

fn membership(organization_id: OrganizationId, role: Role) -> Membership {
    Membership {
        id: MembershipId::new(),
        user_id: UserId::new(),
        organization_id,
        role,
    }
}

#[test]
fn member_may_edit_own_project_only() {
    let table = bootstrap::load_policies().unwrap();
    let org = OrganizationId::new();
    let tenant = TenantContext::new(org);
    let ctx = MembershipContext::resolve(&tenant, membership(org, Role::Member), &table).unwrap();

    let own = Project::new(ProjectId::new(), ctx.actor().id, org);
    let foreign = Project::new(ProjectId::new(), UserId::new(), org);

    assert_eq!(ensure_can(ctx.ability(), Action::Update, &own), Ok(()));
    assert_eq!(
        ensure_can(ctx.ability(), Action::Update, &foreign),
        Err(AuthzError::Forbidden {
            action: Action::Update,
            subject: SubjectKind::Project,
        })
    );
}

#[test]
fn forbidden_message_does_not_reveal_the_rule() {
    let table = bootstrap::load_policies().unwrap();
    let org = OrganizationId::new();
    let ctx = MembershipContext::resolve(&TenantContext::new(org), membership(org, Role::Admin), &table)
        .unwrap();

    let foreign = Organization::new(org, UserId::new(), "acme");
    let err = ensure_can(ctx.ability(), Action::TransferOwnership, &foreign).unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(err.to_string(), "forbidden: cannot transfer_ownership Organization");
}

#[test]
fn membership_from_another_tenant_is_rejected() {
    let table = bootstrap::load_policies().unwrap();
    let tenant = TenantContext::new(OrganizationId::new());
    let err = MembershipContext::resolve(&tenant, membership(OrganizationId::new(), Role::Admin), &table)
        .unwrap_err();
    assert_eq!(err, AuthzError::TenantMismatch);
}

#[test]
fn engine_failures_are_not_forbidden() {
    let table = bootstrap::load_policies().unwrap();
    let org = OrganizationId::new();
    let ctx = MembershipContext::resolve(&TenantContext::new(org), membership(org, Role::Billing), &table)
        .unwrap();

    let untagged = json!({ "id": "invoice-1" });
    let err = ensure_can(ctx.ability(), Action::Get, &untagged).unwrap_err();
    assert!(!err.is_forbidden());
    assert_eq!(err, AuthzError::Engine(AbilityError::Unclassifiable { typename: None }));
}
