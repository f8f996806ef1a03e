//! Integration tests for schema closure resolution.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use yang_fetch::{resolve, CatalogEntry, ResolveError, SchemaSession, SessionError};

/// Scripted device: advertised catalog plus schema bodies, with call logs.
#[derive(Default)]
struct FakeDevice {
    catalog: Vec<String>,
    bodies: HashMap<String, String>,
    fail_listing: Option<fn() -> SessionError>,
    fail_fetch: HashMap<String, fn() -> SessionError>,
    list_calls: usize,
    fetches: Vec<String>,
}

impl FakeDevice {
    fn new() -> Self {
        Self::default()
    }

    /// Advertise `id` and serve a body importing `imports`.
    fn module(mut self, id: &str, imports: &[&str]) -> Self {
        let mut body = format!("module {} {{\n", id);
        for import in imports {
            body.push_str(&format!("  import {} {{\n    prefix p;\n  }}\n", import));
        }
        body.push_str("}\n");
        self.catalog.push(id.to_string());
        self.bodies.insert(id.to_string(), body);
        self
    }

    /// Serve a body for `id` without advertising it.
    fn unadvertised(mut self, id: &str) -> Self {
        self.bodies
            .insert(id.to_string(), format!("module {} {{\n}}\n", id));
        self
    }

    fn fetch_count(&self, id: &str) -> usize {
        self.fetches.iter().filter(|f| *f == id).count()
    }
}

impl SchemaSession for FakeDevice {
    fn list_schemas(&mut self) -> Result<Vec<CatalogEntry>, SessionError> {
        self.list_calls += 1;
        if let Some(fail) = self.fail_listing {
            return Err(fail());
        }
        Ok(self.catalog.iter().map(CatalogEntry::new).collect())
    }

    fn fetch_schema(&mut self, identifier: &str) -> Result<String, SessionError> {
        self.fetches.push(identifier.to_string());
        if let Some(fail) = self.fail_fetch.get(identifier) {
            return Err(fail());
        }
        self.bodies
            .get(identifier)
            .cloned()
            .ok_or_else(|| SessionError::Rpc {
                tag: "invalid-value".into(),
                message: identifier.to_string(),
            })
    }
}

fn keys(resolution: &yang_fetch::Resolution) -> BTreeSet<&str> {
    resolution.identifiers().collect()
}

// === Scenarios ===

mod scenarios {
    use super::*;

    #[test]
    fn diamond_graph() {
        let mut device = FakeDevice::new()
            .module("root", &["A", "B"])
            .module("A", &["C"])
            .module("B", &["C"])
            .module("C", &[]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(keys(&result), BTreeSet::from(["root", "A", "B", "C"]));
        assert!(result.resolved_beyond_root);
        assert_eq!(result.total_attempts, 4);
    }

    #[test]
    fn lone_root() {
        let mut device = FakeDevice::new().module("root", &[]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(keys(&result), BTreeSet::from(["root"]));
        assert!(!result.resolved_beyond_root);
        assert_eq!(result.total_attempts, 1);
    }

    #[test]
    fn fetched_bodies_are_returned_verbatim() {
        let mut device = FakeDevice::new().module("root", &["leaf"]).module("leaf", &[]);
        let expected = device.bodies.clone();

        let result = resolve(&mut device, "root").unwrap();

        for (id, body) in &result.fetched {
            assert_eq!(Some(body), expected.get(id));
        }
    }

    #[test]
    fn breadth_first_order() {
        let mut device = FakeDevice::new()
            .module("root", &["a", "b"])
            .module("a", &["a1"])
            .module("b", &["b1"])
            .module("a1", &[])
            .module("b1", &[]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(
            result.identifiers().collect::<Vec<_>>(),
            vec!["root", "a", "b", "a1", "b1"]
        );
    }
}

// === Counting and de-duplication ===

mod counting {
    use super::*;

    #[test]
    fn in_flight_duplicate_is_compensated() {
        // root imports A and B; both import C, so C is queued twice before
        // its first fetch.
        let mut device = FakeDevice::new()
            .module("root", &["A", "B"])
            .module("A", &["C"])
            .module("B", &["C"])
            .module("C", &[]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(result.total_attempts, result.fetched.len());
        assert_eq!(device.fetch_count("C"), 1);
    }

    #[test]
    fn mid_level_diamond_counts_three() {
        // A imports B and C, B imports C: C is queued twice.
        let mut device = FakeDevice::new()
            .module("A", &["B", "C"])
            .module("B", &["C"])
            .module("C", &[]);

        let result = resolve(&mut device, "A").unwrap();

        assert_eq!(result.total_attempts, 3);
        assert_eq!(result.fetched.len(), 3);
    }

    #[test]
    fn no_duplicate_fetch_on_wide_fan_in() {
        let mut device = FakeDevice::new()
            .module("root", &["a", "b", "c", "d"])
            .module("a", &["common"])
            .module("b", &["common"])
            .module("c", &["common", "a"])
            .module("d", &["common", "b"])
            .module("common", &[]);

        let result = resolve(&mut device, "root").unwrap();

        for id in ["root", "a", "b", "c", "d", "common"] {
            assert_eq!(device.fetch_count(id), 1, "{} fetched more than once", id);
        }
        assert_eq!(result.total_attempts, 6);
        assert_eq!(result.total_attempts, result.fetched.len());
    }

    #[test]
    fn repeated_import_in_one_body() {
        let mut device = FakeDevice::new()
            .module("root", &["x", "x"])
            .module("x", &[]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(result.total_attempts, 2);
        assert_eq!(device.fetch_count("x"), 1);
    }

    #[test]
    fn catalog_listed_once_per_run() {
        let mut device = FakeDevice::new()
            .module("root", &["a", "b"])
            .module("a", &[])
            .module("b", &[]);

        resolve(&mut device, "root").unwrap();
        assert_eq!(device.list_calls, 1);

        // No caching across runs.
        resolve(&mut device, "root").unwrap();
        assert_eq!(device.list_calls, 2);
        assert_eq!(device.fetch_count("root"), 2);
    }
}

// === Closure completeness ===

mod closure {
    use super::*;

    #[test]
    fn only_reachable_schemas_are_fetched() {
        let mut device = FakeDevice::new()
            .module("root", &["a"])
            .module("a", &["b"])
            .module("b", &[])
            .module("unrelated", &["b"]);

        let result = resolve(&mut device, "root").unwrap();

        assert_eq!(keys(&result), BTreeSet::from(["root", "a", "b"]));
        assert_eq!(device.fetch_count("unrelated"), 0);
    }

    #[test]
    fn deep_chain() {
        let names: Vec<String> = (0..20).map(|i| format!("m{}", i)).collect();
        let mut device = FakeDevice::new();
        for (i, name) in names.iter().enumerate() {
            let next: Vec<&str> = names.get(i + 1).map(String::as_str).into_iter().collect();
            device = device.module(name, &next);
        }

        let result = resolve(&mut device, "m0").unwrap();

        assert_eq!(result.total_attempts, 20);
        assert_eq!(
            result.identifiers().collect::<Vec<_>>(),
            names.iter().map(String::as_str).collect::<Vec<_>>()
        );
    }

    #[test]
    fn cyclic_imports_terminate() {
        let mut device = FakeDevice::new()
            .module("a", &["b"])
            .module("b", &["c"])
            .module("c", &["a"]);

        let result = resolve(&mut device, "a").unwrap();

        assert_eq!(keys(&result), BTreeSet::from(["a", "b", "c"]));
        assert_eq!(result.total_attempts, 3);
    }
}

// === Failures ===

mod failures {
    use super::*;

    #[test]
    fn root_not_in_catalog() {
        let mut device = FakeDevice::new().module("other", &[]);

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::SchemaNotSupported { ref identifier } if identifier == "root"
        ));
        assert_eq!(err.to_string(), "schema not supported: root");
        assert!(device.fetches.is_empty());
    }

    #[test]
    fn missing_dependency_aborts() {
        let mut device = FakeDevice::new()
            .module("root", &["a", "ghost"])
            .module("a", &[])
            .unadvertised("ghost");

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::SchemaNotSupported { ref identifier } if identifier == "ghost"
        ));
        assert_eq!(device.fetch_count("ghost"), 0);
    }

    #[test]
    fn identifiers_are_case_sensitive() {
        let mut device = FakeDevice::new()
            .module("root", &["Ietf-Types"])
            .module("ietf-types", &[]);

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(matches!(err, ResolveError::SchemaNotSupported { .. }));
    }

    #[test]
    fn listing_failure() {
        let mut device = FakeDevice::new().module("root", &[]);
        device.fail_listing = Some(|| SessionError::Transport("ssh channel closed".into()));

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(matches!(err, ResolveError::CatalogUnavailable { .. }));
        assert!(err.to_string().contains("ssh channel closed"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn fetch_failure_mid_run() {
        let mut device = FakeDevice::new()
            .module("root", &["a", "b"])
            .module("a", &[])
            .module("b", &[]);
        device.fail_fetch.insert("a".into(), || SessionError::Rpc {
            tag: "operation-failed".into(),
            message: "schema locked".into(),
        });

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(matches!(
            err,
            ResolveError::FetchFailed { ref identifier, .. } if identifier == "a"
        ));
        assert!(err.to_string().contains("schema locked"));
        // The worklist is abandoned at the first failure.
        assert_eq!(device.fetch_count("b"), 0);
    }

    #[test]
    fn timeout_abandons_worklist() {
        let mut device = FakeDevice::new()
            .module("root", &["slow", "b"])
            .module("slow", &[])
            .module("b", &[]);
        device
            .fail_fetch
            .insert("slow".into(), || SessionError::Timeout(Duration::from_secs(10)));

        let err = resolve(&mut device, "root").unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(device.fetches, vec!["root", "slow"]);
    }
}
