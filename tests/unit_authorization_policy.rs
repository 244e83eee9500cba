use std::collections::HashMap;

use ridegate::ridegate_auth::{Access, AuthorizationPolicy, AuthorizationRule, PolicyError, Role};
use ridegate::ridegate_config::GatewayConfig;

fn config_from(pairs: &[(&str, &str)]) -> GatewayConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    GatewayConfig::from_lookup(&|key| vars.get(key).cloned()).unwrap()
}

#[test]
fn test_specific_rule_first_classifies_as_driver() {
    let policy = AuthorizationPolicy::new(vec![
        AuthorizationRule::new("/api/driver", Access::Role(Role::Driver)),
        AuthorizationRule::new("/api", Access::Public),
    ]);

    assert_eq!(policy.classify("/api/driver/123"), Access::Role(Role::Driver));
}

#[test]
fn test_general_rule_first_classifies_as_public() {
    let policy = AuthorizationPolicy::new(vec![
        AuthorizationRule::new("/api", Access::Public),
        AuthorizationRule::new("/api/driver", Access::Role(Role::Driver)),
    ]);

    assert_eq!(policy.classify("/api/driver/123"), Access::Public);
}

#[test]
fn test_no_match_is_any_authenticated() {
    let policy = AuthorizationPolicy::from_config(&GatewayConfig::default().access).unwrap();

    assert_eq!(policy.classify("/api/rides/42"), Access::Any);
    for role in Role::ALL {
        assert!(policy.is_authorized("/api/rides/42", role));
    }
}

#[test]
fn test_role_rules_follow_configured_order() {
    let config = config_from(&[(
        "GATEWAY_ROLE_RULES",
        "/api/driver/admin=ADMIN,/api/driver=DRIVER",
    )]);
    let policy = AuthorizationPolicy::from_config(&config.access).unwrap();

    assert_eq!(policy.classify("/api/driver/admin/users"), Access::Role(Role::Admin));
    assert_eq!(policy.classify("/api/driver/trips"), Access::Role(Role::Driver));
    assert!(!policy.is_authorized("/api/driver/admin/users", Role::Driver));
}

#[test]
fn test_configured_public_paths_replace_defaults() {
    let config = config_from(&[("GATEWAY_PUBLIC_PATHS", "/auth/login,/status")]);
    let policy = AuthorizationPolicy::from_config(&config.access).unwrap();

    assert!(policy.is_public("/status"));
    assert!(policy.is_public("/auth/login"));
    assert!(!policy.is_public("/auth/register"));
}

#[test]
fn test_unknown_role_fails_policy_construction() {
    let config = config_from(&[("GATEWAY_ROLE_RULES", "/api/pilot=PILOT")]);

    assert_eq!(
        AuthorizationPolicy::from_config(&config.access).unwrap_err(),
        PolicyError::UnknownAccess("PILOT".to_string())
    );
}
