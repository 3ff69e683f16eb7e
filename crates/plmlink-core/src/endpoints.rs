//! Backend endpoint URLs.
//!
//! The backend rejects requests with raw spaces (400) and misroutes urns
//! containing raw colons, so every built URL is post-processed with
//! [`escape_spaces`] and urn path segments additionally go through
//! [`escape_urn`].

use crate::config::ConnectorConfig;

/// Replace every space with `%20`.
pub fn escape_spaces(s: &str) -> String {
    s.replace(' ', "%20")
}

/// Replace every colon in a urn segment with `%3A`.
pub fn escape_urn(urn: &str) -> String {
    urn.replace(':', "%3A")
}

fn base(config: &ConnectorConfig) -> &str {
    config.base_url.trim_end_matches('/')
}

/// Token endpoint: `POST {base}/admin/token?group=&pass=&user=`.
pub fn token_url(config: &ConnectorConfig) -> String {
    escape_spaces(&format!(
        "{}/admin/token?group={}&pass={}&user={}",
        base(config),
        config.group,
        config.password,
        config.username
    ))
}

/// Catalog search endpoint, scoped to property-domain nodes with a
/// wildcard pattern.
pub fn search_url(config: &ConnectorConfig, token: &str) -> String {
    escape_spaces(&format!(
        "{}/bkd/q_search/{}/{}/{}?case_sens=false&domains=PROPERTY&pattern=*&folder_only=false",
        base(config),
        config.repository,
        config.model,
        token
    ))
}

/// Windowed aggregate export endpoint with epoch-millisecond bounds.
pub fn windowed_fetch_url(
    config: &ConnectorConfig,
    instance_id: &str,
    urn: &str,
    token: &str,
    from_millis: i64,
    to_millis: i64,
) -> String {
    escape_spaces(&format!(
        "{}/bkd/aggr_exp_dt/{}/{}/{}/{}/{}/?format=json&from={}&to={}",
        base(config),
        config.repository,
        config.model,
        instance_id,
        escape_urn(urn),
        token,
        from_millis,
        to_millis
    ))
}

/// Whole-series aggregate endpoint for snapshot mode.
pub fn snapshot_fetch_url(
    config: &ConnectorConfig,
    instance_id: &str,
    urn: &str,
    token: &str,
) -> String {
    escape_spaces(&format!(
        "{}/bkd/aggr/{}/{}/{}/{}/{}",
        base(config),
        config.repository,
        config.model,
        instance_id,
        escape_urn(urn),
        token
    ))
}
