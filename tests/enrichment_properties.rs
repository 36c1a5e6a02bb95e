use std::sync::Arc;
use std::thread;

use mailarchiver_core::security::hash::compute_hash;
use mailarchiver_core::{ClientContext, EnrichmentConfig, IpSources, LogRecord, RecordEnricher};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

const ENRICHED_KEYS: &[&str] = &["siteid", "sitename", "userid", "username", "ip"];

fn enricher(anonymize: bool, key: &str) -> RecordEnricher {
    RecordEnricher::new(EnrichmentConfig::new(anonymize, key)).unwrap()
}

fn payload_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(
        "[a-z_]{1,12}".prop_filter("extra is reserved", |k| k != "extra"),
        prop_oneof![
            any::<i64>().prop_map(Value::from),
            any::<bool>().prop_map(Value::from),
            "[ -~]{0,24}".prop_map(Value::from),
        ],
        0..8,
    )
    .prop_map(|entries| entries.into_iter().collect())
}

fn ip_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(
        (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
            .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d)),
    )
}

fn context_strategy() -> impl Strategy<Value = ClientContext> {
    (
        prop::option::of(0i64..1000),
        prop::option::of("[A-Za-z ]{1,16}"),
        prop::option::of(0i64..100_000),
        prop::option::of("[a-z0-9_]{1,12}"),
        ip_strategy(),
        ip_strategy(),
        ip_strategy(),
    )
        .prop_map(
            |(site_id, site_name, user_id, user_name, real_ip, forwarded_for, remote_addr)| {
                ClientContext {
                    site_id,
                    site_name,
                    user_id,
                    user_name,
                    ip: IpSources {
                        real_ip,
                        forwarded_for,
                        remote_addr,
                    },
                }
            },
        )
}

proptest! {
    #[test]
    fn payload_is_never_altered(
        payload in payload_strategy(),
        ctx in context_strategy(),
        anonymize in any::<bool>(),
    ) {
        let record = LogRecord::new(payload.clone()).unwrap();
        let enriched = enricher(anonymize, "").enrich(record, &ctx);

        prop_assert_eq!(enriched.payload(), &payload);
        for key in enriched.extra().keys() {
            prop_assert!(ENRICHED_KEYS.contains(&key.as_str()));
        }
    }

    #[test]
    fn context_writes_are_idempotent(payload in payload_strategy(), ctx in context_strategy()) {
        let enricher = enricher(false, "");
        let once = enricher.enrich(LogRecord::new(payload).unwrap(), &ctx);
        let twice = enricher.enrich(once.clone(), &ctx);

        for key in ["siteid", "sitename", "userid", "username"] {
            prop_assert_eq!(once.extra_value(key), twice.extra_value(key));
        }
    }

    #[test]
    fn disabled_anonymization_keeps_raw_values(ctx in context_strategy()) {
        let enriched = enricher(false, "key").enrich(LogRecord::default(), &ctx);

        let ip = json!(ctx.client_ip());
        let user_id = ctx.user_id.map(Value::from);
        let user_name = ctx.user_name.clone().map(Value::from);

        prop_assert_eq!(enriched.extra_value("ip"), Some(&ip));
        prop_assert_eq!(enriched.extra_value("userid"), user_id.as_ref());
        prop_assert_eq!(enriched.extra_value("username"), user_name.as_ref());
    }

    #[test]
    fn ip_hash_is_deterministic_and_distinct(a in ip_strategy(), b in ip_strategy(), key in "[a-z]{0,8}") {
        let enricher = enricher(true, &key);
        let ctx_a = ClientContext::new().with_ip_sources(IpSources { remote_addr: a, ..IpSources::default() });
        let ctx_b = ClientContext::new().with_ip_sources(IpSources { remote_addr: b, ..IpSources::default() });

        let first = enricher.enrich(LogRecord::default(), &ctx_a);
        let second = enricher.enrich(LogRecord::default(), &ctx_a);
        prop_assert_eq!(first.extra_value("ip"), second.extra_value("ip"));

        let other = enricher.enrich(LogRecord::default(), &ctx_b);
        if ctx_a.client_ip() == ctx_b.client_ip() {
            prop_assert_eq!(first.extra_value("ip"), other.extra_value("ip"));
        } else {
            prop_assert_ne!(first.extra_value("ip"), other.extra_value("ip"));
        }
    }
}

#[test]
fn ip_resolution_precedence() {
    let enricher = enricher(false, "");
    let real = Some("203.0.113.7".to_string());
    let forwarded = Some("198.51.100.2".to_string());
    let direct = Some("10.0.0.1".to_string());

    let cases = [
        (real, forwarded.clone(), direct.clone(), "203.0.113.7"),
        (None, forwarded, direct.clone(), "198.51.100.2"),
        (None, None, direct, "10.0.0.1"),
        (None, None, None, "127.0.0.1"),
    ];

    for (real_ip, forwarded_for, remote_addr, want) in cases {
        let ctx = ClientContext::new().with_ip_sources(IpSources {
            real_ip,
            forwarded_for,
            remote_addr,
        });
        let enriched = enricher.enrich(LogRecord::default(), &ctx);
        assert_eq!(enriched.extra_value("ip"), Some(&json!(want)));
    }
}

#[test]
fn zero_userid_is_exempt() {
    let ctx = ClientContext::new().with_user(0, "system");
    let enriched = enricher(true, "").enrich(LogRecord::default(), &ctx);

    assert_eq!(enriched.extra_value("userid"), Some(&json!(0)));
    assert_eq!(enriched.extra_value("username"), Some(&json!("system")));
}

#[test]
fn positive_userid_is_hashed() {
    let ctx = ClientContext::new().with_user(42, "alice");
    let enriched = enricher(true, "").enrich(LogRecord::default(), &ctx);

    assert_eq!(enriched.extra_value("userid"), Some(&json!(compute_hash("42"))));
    assert_eq!(enriched.extra_value("username"), Some(&json!(compute_hash("alice"))));
}

#[test]
fn monolog_json_record_round_trip() {
    let json = r#"{
        "message": "Mail sent",
        "context": {"to": ["a@example.com"]},
        "level": 200,
        "level_name": "INFO",
        "channel": "wpmail",
        "datetime": "2026-01-29T00:00:00+00:00",
        "extra": []
    }"#;
    let record = LogRecord::from_json(json).unwrap();
    let ctx = ClientContext::from_request(vec![("X-Forwarded-For", "198.51.100.2")], Some("10.0.0.1"))
        .with_site(1, "Blog");

    let enriched = enricher(true, "site-key").enrich(record.clone(), &ctx);
    let value: Value = serde_json::from_str(&enriched.to_json().unwrap()).unwrap();

    assert_eq!(value["context"], json!({"to": ["a@example.com"]}));
    assert_eq!(value["extra"]["sitename"], json!("Blog"));
    assert_ne!(value["extra"]["ip"], json!("198.51.100.2"));
    assert_eq!(value["extra"]["ip"].as_str().map(str::len), Some(64));
    assert_eq!(LogRecord::from_value(value).unwrap().payload(), record.payload());
}

#[test]
fn concurrent_calls_do_not_interfere() {
    let enricher = Arc::new(enricher(true, "shared"));
    let expected: Vec<LogRecord> = (1..=8)
        .map(|id| enricher.enrich(LogRecord::default(), &ClientContext::new().with_user(id, format!("user{}", id))))
        .collect();

    let handles: Vec<_> = (1..=8)
        .map(|id| {
            let enricher = Arc::clone(&enricher);
            thread::spawn(move || {
                let ctx = ClientContext::new().with_user(id, format!("user{}", id));
                (0..100)
                    .map(|_| enricher.enrich(LogRecord::default(), &ctx))
                    .last()
            })
        })
        .collect();

    for (handle, want) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), Some(want));
    }
}
