mod common;

use capbridge_app::{connect_in_process, PersistedStore};
use capbridge_common::Platform;
use capbridge_ipc::CapabilityApi;
use futures_util::future::join_all;
use serde_json::{json, Value};

use common::{bounded, host};

#[tokio::test]
async fn set_then_get_returns_the_same_value() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());
    let value = json!({"sidebar": {"width": 280, "collapsed": false}, "recent": ["a", "b"]});

    bounded(api.storage().set("layout", value.clone())).await.unwrap();
    let got = bounded(api.storage().get("layout")).await.unwrap();

    assert_eq!(got, Some(value));
}

#[tokio::test]
async fn delete_then_has_is_false() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    api.storage().set("token", json!("abc")).await.unwrap();
    assert!(api.storage().has("token").await.unwrap());

    api.storage().delete("token").await.unwrap();
    assert!(!api.storage().has("token").await.unwrap());
    assert_eq!(api.storage().get("token").await.unwrap(), None);
}

#[tokio::test]
async fn missing_key_is_absent() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());
    assert_eq!(api.storage().get("nothing").await.unwrap(), None);
    assert!(!api.storage().has("nothing").await.unwrap());
}

#[tokio::test]
async fn stored_null_is_not_absent() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    bounded(api.storage().set("cleared", Value::Null)).await.unwrap();

    assert_eq!(api.storage().get("cleared").await.unwrap(), Some(Value::Null));
    assert!(api.storage().has("cleared").await.unwrap());
    assert_eq!(api.storage().get("never").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sets_to_one_key_apply_in_call_order() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    for round in 0..20 {
        let storage = api.storage();
        let writes = (1..=8).map(|n| storage.set("k", json!(round * 8 + n)));
        for result in bounded(join_all(writes)).await {
            result.unwrap();
        }
        let last = json!(round * 8 + 8);
        assert_eq!(api.storage().get("k").await.unwrap(), Some(last.clone()), "round {round}");
        assert_eq!(h.ctx.storage().get("k"), Some(last));
    }
}

#[tokio::test]
async fn values_survive_a_restart() {
    let h = host(Platform::Linux);
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());
    api.storage().set("count", json!(3)).await.unwrap();

    let reopened = PersistedStore::open(h.ctx.storage().path());
    assert_eq!(reopened.get("count"), Some(json!(3)));
}

#[tokio::test]
async fn write_failure_still_acks_and_keeps_memory() {
    let h = host(Platform::Linux);
    // Block the store file with a directory so every write fails.
    std::fs::create_dir(h.ctx.storage().path()).unwrap();
    let api = CapabilityApi::new(connect_in_process(&h.ctx).unwrap());

    bounded(api.storage().set("k", json!("v"))).await.unwrap();

    assert_eq!(api.storage().get("k").await.unwrap(), Some(json!("v")));
    assert!(h.ctx.storage().is_diverged());
}
