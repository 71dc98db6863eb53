use opalkv::core::OpalKVError;
use opalkv::core::cluster::{ClusterConfig, MasterConfig, MasterSelector};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn masters(n: usize) -> Vec<MasterConfig> {
    (0..n)
        .map(|i| MasterConfig {
            addr: format!("10.0.0.{i}:9100"),
            ..MasterConfig::default()
        })
        .collect()
}

/// Asserts `result` is a contiguous cyclic rotation of `all`.
fn assert_rotation(result: &[MasterConfig], all: &[MasterConfig]) {
    let start = all
        .iter()
        .position(|m| m.addr == result[0].addr)
        .expect("first selected master must come from the list");
    for (i, m) in result.iter().enumerate() {
        assert_eq!(m.addr, all[(start + i) % all.len()].addr);
    }
}

#[test]
fn test_master_lookup_hit() {
    let cluster = ClusterConfig {
        masters: masters(3),
    };
    let found = cluster.master("10.0.0.1:9100").unwrap();
    assert_eq!(found.addr, "10.0.0.1:9100");
}

#[test]
fn test_master_lookup_miss() {
    let cluster = ClusterConfig {
        masters: masters(3),
    };
    assert!(cluster.master("10.9.9.9:9100").is_none());
}

#[test]
fn test_master_lookup_first_match_wins() {
    let mut ls = masters(2);
    ls.push(MasterConfig {
        addr: "10.0.0.1:9100".to_string(),
        auth_secret_key: "shadowed".to_string(),
        ..MasterConfig::default()
    });

    let cluster = ClusterConfig { masters: ls };
    let found = cluster.master("10.0.0.1:9100").unwrap();
    assert_eq!(found.auth_secret_key, "");
}

#[test]
fn test_select_empty_masters_fails() {
    let mut selector = MasterSelector::new();
    let err = selector.select(&[], 2).unwrap_err();
    assert_eq!(err, OpalKVError::NoClusterMasters);
}

#[test]
fn test_select_returns_rotation_with_one_extra_entry() {
    let all = masters(4);
    let mut selector = MasterSelector::with_rng(SmallRng::seed_from_u64(7));

    let selected = selector.select(&all, 2).unwrap();
    // The stopping condition admits one entry past the cap.
    assert_eq!(selected.len(), 3);
    assert_rotation(&selected, &all);
}

#[test]
fn test_select_cap_zero_returns_single_master() {
    let all = masters(4);
    let mut selector = MasterSelector::with_rng(SmallRng::seed_from_u64(7));

    let selected = selector.select(&all, 0).unwrap();
    assert_eq!(selected.len(), 1);
    assert_rotation(&selected, &all);
}

#[test]
fn test_select_cap_beyond_list_returns_all_masters() {
    let all = masters(3);
    let mut selector = MasterSelector::with_rng(SmallRng::seed_from_u64(42));

    let selected = selector.select(&all, 10).unwrap();
    assert_eq!(selected.len(), 3);
    assert_rotation(&selected, &all);
}

#[test]
fn test_select_single_master() {
    let all = masters(1);
    let mut selector = MasterSelector::new();

    let selected = selector.select(&all, 3).unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].addr, "10.0.0.0:9100");
}

#[test]
fn test_select_is_deterministic_under_a_seeded_rng() {
    let all = masters(5);

    let mut a = MasterSelector::with_rng(SmallRng::seed_from_u64(99));
    let mut b = MasterSelector::with_rng(SmallRng::seed_from_u64(99));

    assert_eq!(a.select(&all, 2).unwrap(), b.select(&all, 2).unwrap());
}

#[test]
fn test_select_preserves_relative_order() {
    let all = masters(6);
    let mut selector = MasterSelector::new();

    for _ in 0..32 {
        let selected = selector.select(&all, 3).unwrap();
        assert_eq!(selected.len(), 4);
        assert_rotation(&selected, &all);
    }
}
