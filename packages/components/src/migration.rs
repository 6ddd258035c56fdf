//! Schema migrations for stored property bags.
//!
//! A bag's version lives under `_v`. Missing or unparseable versions read as
//! `0`. Steps are applied in sequence until the target is reached or no step
//! starts at the current version; the result is always stamped with the
//! target version.

use crate::{PropertyBag, VERSION_KEY};
use tracing::{debug, warn};

/// Upper bound on applied steps, so a bad step table can never loop.
pub const MAX_MIGRATION_STEPS: usize = 50;

#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: i64,
    pub to: i64,
    pub apply: fn(PropertyBag) -> PropertyBag,
}

fn callout_v0_to_v1(mut props: PropertyBag) -> PropertyBag {
    let variant = props.get("variant").filter(|v| !v.is_empty()).cloned();
    props.insert("variant".into(), variant.unwrap_or_else(|| "info".into()));
    props
}

fn callout_v1_to_v2(mut props: PropertyBag) -> PropertyBag {
    let kind = props
        .get("kind")
        .filter(|v| !v.is_empty())
        .or_else(|| props.get("variant").filter(|v| !v.is_empty()))
        .cloned()
        .unwrap_or_else(|| "info".into());
    props.insert("kind".into(), kind);
    props.remove("variant");
    props
}

const CALLOUT_INFO: &[Migration] = &[
    Migration {
        from: 0,
        to: 1,
        apply: callout_v0_to_v1,
    },
    Migration {
        from: 1,
        to: 2,
        apply: callout_v1_to_v2,
    },
];

const MIGRATIONS: &[(&str, &[Migration])] = &[("calloutInfo", CALLOUT_INFO)];

/// Registered steps for a component, in order.
pub fn migrations_for(component_id: &str) -> &'static [Migration] {
    MIGRATIONS
        .iter()
        .find(|(id, _)| *id == component_id)
        .map(|(_, steps)| *steps)
        .unwrap_or(&[])
}

/// Version stored in `_v`, truncated toward zero. Missing or invalid is `0`.
pub fn read_version(props: &PropertyBag) -> i64 {
    props
        .get(VERSION_KEY)
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .unwrap_or(0)
}

/// Upgrade `props` to `target` through the component's registered steps.
pub fn migrate(component_id: &str, props: &PropertyBag, target: u32) -> PropertyBag {
    let steps = migrations_for(component_id);
    let target_version = i64::from(target);
    let mut current = props.clone();

    if !steps.is_empty() {
        let mut version = read_version(&current);
        let mut applied = 0;
        while version < target_version && applied < MAX_MIGRATION_STEPS {
            let Some(step) = steps.iter().find(|m| m.from == version) else {
                warn!(
                    component = component_id,
                    version,
                    target = target_version,
                    "no migration step found; stamping target version"
                );
                break;
            };
            current = (step.apply)(current);
            debug!(component = component_id, from = step.from, to = step.to, "applied migration");
            version = step.to;
            applied += 1;
        }
    }

    current.insert(VERSION_KEY.to_string(), target.to_string());
    current
}

/// Drop internal `_`-prefixed keys such as `_v`.
pub fn strip_internal(props: &PropertyBag) -> PropertyBag {
    props
        .iter()
        .filter(|(k, _)| !k.starts_with('_'))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_callout_v1_to_v2_renames_variant() {
        let migrated = migrate("calloutInfo", &bag(&[("variant", "info"), ("_v", "1")]), 2);
        assert_eq!(migrated, bag(&[("kind", "info"), ("_v", "2")]));
    }

    #[test]
    fn test_callout_from_unversioned_legacy() {
        let migrated = migrate("calloutInfo", &bag(&[("variant", "warn"), ("title", "T")]), 2);
        assert_eq!(migrated, bag(&[("kind", "warn"), ("title", "T"), ("_v", "2")]));

        let empty = migrate("calloutInfo", &PropertyBag::new(), 2);
        assert_eq!(empty, bag(&[("kind", "info"), ("_v", "2")]));
    }

    #[test]
    fn test_existing_kind_wins_over_variant() {
        let migrated = migrate(
            "calloutInfo",
            &bag(&[("kind", "ok"), ("variant", "warn"), ("_v", "1")]),
            2,
        );
        assert_eq!(migrated.get("kind").map(String::as_str), Some("ok"));
        assert!(!migrated.contains_key("variant"));
    }

    #[test]
    fn test_components_without_steps_are_stamped() {
        let migrated = migrate("card", &bag(&[("title", "x"), ("legacy", "kept")]), 1);
        assert_eq!(migrated, bag(&[("title", "x"), ("legacy", "kept"), ("_v", "1")]));
    }

    #[test]
    fn test_gap_stops_early_and_stamps_target() {
        let migrated = migrate("calloutInfo", &bag(&[("variant", "ok"), ("_v", "2")]), 5);
        assert_eq!(migrated, bag(&[("variant", "ok"), ("_v", "5")]));
    }

    #[test]
    fn test_migration_is_idempotent() {
        let inputs = [
            bag(&[]),
            bag(&[("variant", "warn")]),
            bag(&[("_v", "garbage"), ("kind", "ok")]),
            bag(&[("_v", "1.9"), ("variant", "ok")]),
        ];
        for target in 0..4 {
            for input in &inputs {
                let once = migrate("calloutInfo", input, target);
                assert_eq!(migrate("calloutInfo", &once, target), once);
            }
        }
    }

    #[test]
    fn test_read_version_forms() {
        assert_eq!(read_version(&bag(&[])), 0);
        assert_eq!(read_version(&bag(&[("_v", "")])), 0);
        assert_eq!(read_version(&bag(&[("_v", "x")])), 0);
        assert_eq!(read_version(&bag(&[("_v", " 2 ")])), 2);
        assert_eq!(read_version(&bag(&[("_v", "1.9")])), 1);
    }

    #[test]
    fn test_strip_internal() {
        assert_eq!(
            strip_internal(&bag(&[("_v", "2"), ("_tmp", "x"), ("kind", "ok")])),
            bag(&[("kind", "ok")])
        );
    }
}
