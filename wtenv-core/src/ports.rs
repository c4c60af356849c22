//! Deterministic first-fit port allocation.
//!
//! Pure: no I/O, no randomness. Identical inputs always produce identical output.

use std::collections::BTreeSet;

use crate::error::RegistryError;
use crate::types::{PortMap, PortRange, RoleName};

/// Assign each of `roles`, in order, the lowest port in `range` that is not in
/// `used` and not already handed to an earlier role in this call.
///
/// Returns [`RegistryError::PortsExhausted`] as soon as one role cannot be
/// served; no partial result is returned.
pub fn allocate(
    roles: &[RoleName],
    used: &BTreeSet<u16>,
    range: PortRange,
) -> Result<PortMap, RegistryError> {
    let mut taken = used.clone();
    let mut assigned = PortMap::new();

    for role in roles {
        let port = next_available(range, &taken).ok_or(RegistryError::PortsExhausted { range })?;
        taken.insert(port);
        assigned.insert(role.clone(), port);
    }

    Ok(assigned)
}

fn next_available(range: PortRange, taken: &BTreeSet<u16>) -> Option<u16> {
    (range.low..=range.high).find(|port| !taken.contains(port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roles(names: &[&str]) -> Vec<RoleName> {
        names.iter().copied().map(RoleName::from).collect()
    }

    fn range(low: u16, high: u16) -> PortRange {
        PortRange::new(low, high).unwrap()
    }

    fn port(map: &PortMap, role: &str) -> u16 {
        map[&RoleName::from(role)]
    }

    #[test]
    fn allocates_from_start() {
        let result = allocate(&roles(&["PORT"]), &BTreeSet::new(), range(4000, 4999)).unwrap();
        assert_eq!(port(&result, "PORT"), 4000);
    }

    #[test]
    fn skips_already_allocated() {
        let used = BTreeSet::from([4000, 4001]);
        let result = allocate(&roles(&["PORT"]), &used, range(4000, 4999)).unwrap();
        assert_eq!(port(&result, "PORT"), 4002);
    }

    #[test]
    fn multiple_roles_skip_used_and_each_other() {
        let used = BTreeSet::from([4000, 4002]);
        let result = allocate(&roles(&["A", "B", "C"]), &used, range(4000, 4999)).unwrap();
        assert_eq!(port(&result, "A"), 4001);
        assert_eq!(port(&result, "B"), 4003);
        assert_eq!(port(&result, "C"), 4004);
    }

    #[test]
    fn role_order_decides_who_gets_the_lower_port() {
        let result =
            allocate(&roles(&["PORT", "LIVE_PORT"]), &BTreeSet::new(), range(4000, 4999)).unwrap();
        assert_eq!(port(&result, "PORT"), 4000);
        assert_eq!(port(&result, "LIVE_PORT"), 4001);
    }

    #[test]
    fn raises_when_exhausted() {
        let err = allocate(&roles(&["PORT"]), &BTreeSet::from([4000]), range(4000, 4000)).unwrap_err();
        assert!(matches!(err, RegistryError::PortsExhausted { range } if range.low == 4000));
    }

    #[test]
    fn exhaustion_mid_request_fails_whole_call() {
        let err = allocate(&roles(&["A", "B"]), &BTreeSet::new(), range(4000, 4000)).unwrap_err();
        assert!(matches!(err, RegistryError::PortsExhausted { .. }));
    }

    #[test]
    fn empty_request_is_empty_map() {
        let result = allocate(&[], &BTreeSet::new(), range(4000, 4999)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn top_of_u16_range_does_not_overflow() {
        let result = allocate(&roles(&["A"]), &BTreeSet::new(), range(65535, 65535)).unwrap();
        assert_eq!(port(&result, "A"), 65535);
        assert!(allocate(&roles(&["A", "B"]), &BTreeSet::new(), range(65535, 65535)).is_err());
    }

    proptest! {
        #[test]
        fn assigned_ports_are_distinct_in_range_and_unused(
            count in 0usize..20,
            used in proptest::collection::btree_set(4000u16..4100, 0..60),
        ) {
            let names: Vec<RoleName> = (0..count).map(|i| RoleName::from(format!("R{i}"))).collect();
            let r = range(4000, 4099);
            match allocate(&names, &used, r) {
                Ok(map) => {
                    prop_assert_eq!(map.len(), count);
                    let values: BTreeSet<u16> = map.values().copied().collect();
                    prop_assert_eq!(values.len(), count);
                    for p in &values {
                        prop_assert!(r.contains(*p));
                        prop_assert!(!used.contains(p));
                    }
                    prop_assert_eq!(allocate(&names, &used, r).unwrap(), map);
                }
                Err(_) => prop_assert!(used.len() + count > 100),
            }
        }
    }
}
