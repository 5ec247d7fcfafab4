use helpdesk_backend::types::db::Role;
use helpdesk_backend::types::internal::context::{RequestContext, RequestSource};
use helpdesk_backend::types::internal::{ActorContext, LoginEntry};

fn admin() -> ActorContext {
    ActorContext {
        user_id: 3,
        username: "yuvaraj".to_string(),
        display_name: "Yuvaraj Admin".to_string(),
        role: Role::Admin,
    }
}

#[test]
fn test_request_context_new_is_anonymous_api_request() {
    let ctx = RequestContext::new();

    assert_eq!(ctx.source, RequestSource::API);
    assert!(ctx.actor.is_none());
    assert!(ctx.session_id.is_none());
    assert_eq!(ctx.actor_label(), "anonymous");
}

#[test]
fn test_request_context_for_cli() {
    let ctx = RequestContext::for_cli("init");

    assert_eq!(ctx.source, RequestSource::CLI);
    assert_eq!(ctx.actor_label(), "cli");
    assert!(ctx.ip_address.is_none());
}

#[test]
fn test_require_actor_reports_entry_point() {
    let ctx = RequestContext::new();

    let err = ctx.require_actor(LoginEntry::Admin).unwrap_err();
    assert!(err.to_string().contains("log in"));

    let ctx = ctx.with_actor(admin());
    assert_eq!(ctx.require_actor(LoginEntry::Admin).unwrap().user_id, 3);
    assert_eq!(ctx.actor_label(), "yuvaraj#3");
}

#[test]
fn test_request_context_with_ip_address() {
    let ctx = RequestContext::new().with_ip_address("192.168.1.1".parse().unwrap());

    assert_eq!(ctx.ip_string().as_deref(), Some("192.168.1.1"));
    assert_eq!(ctx.source, RequestSource::API);
}

#[test]
fn test_require_actor_reports_failed_session_lookup() {
    let mut ctx = RequestContext::new();
    ctx.session_failure = Some("no such table: sessions".to_string());

    let err = ctx.require_actor(LoginEntry::User).unwrap_err();

    assert!(err.is_infrastructure());
    assert!(err.to_string().contains("Session lookup failed"));
}
