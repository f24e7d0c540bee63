//! End-to-end bucket and adapter behaviour on every backend.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use stow::{
    temporal, Adapter, Bucket, Container, CredentialContainer, DocumentConfig, DocumentContainer, Field,
    FileConfig, FileContainer, PreferencesConfig, PreferencesContainer, SharedContainer, Store,
    StoreConfig,
};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Name {
    first: String,
    last: String,
}
stow::storable_codable!(Name);

#[derive(Debug, Clone, Copy, PartialEq)]
enum NameType {
    Given,
    Middle,
    Family,
}
stow::storable_raw!(NameType: String {
    Given => "given",
    Middle => "middle",
    Family => "family",
});

fn shared<C: Container + 'static>(container: C) -> SharedContainer {
    Arc::new(container)
}

/// One container per backend, all under one temporary directory.
fn backends(dir: &TempDir) -> Vec<SharedContainer> {
    let preferences = PreferencesConfig {
        suite: "scenarios".into(),
        path: Some(dir.path().join("prefs.json")),
    };
    vec![
        shared(PreferencesContainer::open(&preferences).unwrap()),
        shared(CredentialContainer::in_memory()),
        shared(FileContainer::open(FileConfig::new(dir.path().join("files"))).unwrap()),
        shared(DocumentContainer::open(&DocumentConfig::new(dir.path().join("doc.json"))).unwrap()),
    ]
}

// ---------------------------------------------------------------------------
// Bucket lifecycle
// ---------------------------------------------------------------------------

#[test]
fn age_round_trip_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let name = container.name().to_string();
        let age: Bucket<i64> = Bucket::builder("age", container).build();

        age.set(&28);
        assert_eq!(age.read(), Some(28), "{name}");
        assert!(age.exists(), "{name}");

        age.remove();
        assert_eq!(age.read(), None, "{name}");
        assert!(!age.exists(), "{name}");
        assert!(age.updated_at().is_none(), "{name}");
    }
}

#[test]
fn expired_session_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let name = container.name().to_string();
        let session: Bucket<String> = Bucket::builder("session", container.clone())
            .expire_at(temporal::now() - Duration::seconds(1))
            .value("token123".to_string())
            .build();

        assert_eq!(session.read(), None, "{name}");
        for key in ["session", "session-update", "session-expire"] {
            assert!(!container.exists(key), "{name}: {key} left behind");
        }
    }
}

#[test]
fn unexpired_session_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let session: Bucket<String> = Bucket::builder("session", container)
            .expire_after(Duration::hours(1))
            .build();
        session.set(&"token123".to_string());
        assert_eq!(session.read().as_deref(), Some("token123"));
        assert!(session.expires_at().is_some());
    }
}

#[test]
fn empty_write_is_remove() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let name = container.name().to_string();
        let phones: Bucket<Option<Vec<String>>> = Bucket::builder("phones", container.clone())
            .expire_after(Duration::days(1))
            .build();
        phones.set(&Some(vec!["555-0100".into()]));
        assert!(phones.exists(), "{name}");

        phones.set(&None);
        assert_eq!(phones.read(), None, "{name}");
        assert!(!phones.exists(), "{name}");
        assert!(!container.exists("phones-update"), "{name}");
        assert!(!container.exists("phones-expire"), "{name}");
    }
}

#[test]
fn remove_twice_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let flag: Bucket<bool> = Bucket::builder("isValid", container).build();
        flag.set(&true);
        flag.remove();
        flag.remove();
        assert!(!flag.exists());
    }
}

#[test]
fn typed_forms_on_every_backend() {
    let dir = tempfile::tempdir().unwrap();
    for container in backends(&dir) {
        let name = container.name().to_string();
        let full: Bucket<Name> = Bucket::builder("fullName", container.clone()).build();
        let others: Bucket<Vec<Name>> = Bucket::builder("otherNames", container.clone()).build();
        let kinds: Bucket<Vec<NameType>> = Bucket::builder("nameType", container.clone()).build();
        let kind: Bucket<NameType> = Bucket::builder("kind", container).build();

        let jhon = Name {
            first: "Jhon".into(),
            last: "Doe".into(),
        };
        full.set(&jhon);
        others.set(&vec![jhon.clone()]);
        kinds.set(&vec![NameType::Family, NameType::Given]);
        kind.set(&NameType::Middle);

        assert_eq!(full.read(), Some(jhon.clone()), "{name}");
        assert_eq!(others.read(), Some(vec![jhon]), "{name}");
        assert_eq!(
            kinds.read(),
            Some(vec![NameType::Family, NameType::Given]),
            "{name}"
        );
        assert_eq!(kind.read(), Some(NameType::Middle), "{name}");
    }
}

#[test]
#[should_panic(expected = "multi-dimensional")]
fn nested_collection_bucket_is_rejected() {
    let _grid: Bucket<Vec<Vec<String>>> =
        Bucket::builder("grid", shared(CredentialContainer::in_memory())).build();
}

// ---------------------------------------------------------------------------
// Schema and adapter
// ---------------------------------------------------------------------------

/// A profile spread over all four backends.
struct Profile {
    config: StoreConfig,
    username: Bucket<Option<String>>,
    phones: Bucket<Option<Vec<String>>>,
    age: Bucket<Option<i64>>,
    is_valid: Bucket<Option<bool>>,
    full_name: Bucket<Option<Name>>,
    name_type: Bucket<Option<Vec<NameType>>>,
    country: Bucket<String>,
}

impl Profile {
    const USERNAME: Field<Self, Option<String>> = Field::new("username", |s: &Self| &s.username);
    const PHONES: Field<Self, Option<Vec<String>>> = Field::new("phones", |s: &Self| &s.phones);
    const AGE: Field<Self, Option<i64>> = Field::new("age", |s: &Self| &s.age);
    const IS_VALID: Field<Self, Option<bool>> = Field::new("isValid", |s: &Self| &s.is_valid);
    const FULL_NAME: Field<Self, Option<Name>> = Field::new("fullName", |s: &Self| &s.full_name);
    const NAME_TYPE: Field<Self, Option<Vec<NameType>>> =
        Field::new("nameType", |s: &Self| &s.name_type);
    const COUNTRY: Field<Self, String> = Field::new("country", |s: &Self| &s.country);

    fn new(containers: &[SharedContainer]) -> Self {
        let config = StoreConfig::with_container(containers[0].clone());
        Self {
            username: config
                .bucket("username")
                .expire_after(Duration::days(1))
                .value(Some("Jhon Doe".to_string()))
                .build(),
            phones: config.bucket("phones").container(containers[1].clone()).build(),
            age: config.bucket("age").container(containers[2].clone()).build(),
            is_valid: config.bucket("isValid").container(containers[3].clone()).build(),
            full_name: config.bucket("fullName").build(),
            name_type: config.bucket("nameType").build(),
            country: config.bucket("country").value("BD".to_string()).build(),
            config,
        }
    }
}

impl Store for Profile {
    fn config(&self) -> &StoreConfig {
        &self.config
    }
}

#[test]
fn profile_across_backends() {
    let dir = tempfile::tempdir().unwrap();
    let containers = backends(&dir);
    let profile = Adapter::new(Profile::new(&containers));

    assert_eq!(profile.get(Profile::USERNAME).as_deref(), Some("Jhon Doe"));
    assert_eq!(profile.get(Profile::COUNTRY), "BD");
    assert_eq!(profile.get(Profile::PHONES), None);
    assert_eq!(profile.get(Profile::AGE), None);

    profile.set(Profile::PHONES, Some(vec!["555-0100".into()]));
    profile.set(Profile::AGE, Some(28));
    profile.set(Profile::IS_VALID, Some(true));
    profile.set(
        Profile::FULL_NAME,
        Some(Name {
            first: "Jhon".into(),
            last: "Doe".into(),
        }),
    );
    profile.set(Profile::NAME_TYPE, Some(vec![NameType::Given, NameType::Family]));

    assert!(containers[1].exists("phones"));
    assert!(containers[2].exists("age"));
    assert!(containers[3].exists("isValid"));
    assert_eq!(profile.get(Profile::AGE), Some(28));
    assert_eq!(profile.get(Profile::IS_VALID), Some(true));
    assert_eq!(
        profile.get(Profile::NAME_TYPE),
        Some(vec![NameType::Given, NameType::Family])
    );

    profile.remove(Profile::AGE);
    assert!(!profile.has(Profile::AGE));
    assert_eq!(profile.get(Profile::AGE), None);
}

#[test]
fn two_adapters_see_the_same_data() {
    let dir = tempfile::tempdir().unwrap();
    let containers = backends(&dir);
    let first = Adapter::new(Profile::new(&containers));
    let second = Adapter::new(Profile::new(&containers));

    first.set(Profile::USERNAME, Some("alice".to_string()));
    assert_eq!(second.get(Profile::USERNAME).as_deref(), Some("alice"));

    second.set(Profile::USERNAME, None);
    assert!(!first.has(Profile::USERNAME));
}

#[test]
fn values_survive_reopening_the_backends() {
    let dir = tempfile::tempdir().unwrap();
    {
        let profile = Adapter::new(Profile::new(&backends(&dir)));
        profile.set(Profile::AGE, Some(41));
        profile.set(Profile::IS_VALID, Some(false));
        profile.set(Profile::USERNAME, Some("bob".to_string()));
    }
    let profile = Adapter::new(Profile::new(&backends(&dir)));
    assert_eq!(profile.get(Profile::AGE), Some(41));
    assert_eq!(profile.get(Profile::IS_VALID), Some(false));
    // Seeding never overwrites a stored value.
    assert_eq!(profile.get(Profile::USERNAME).as_deref(), Some("bob"));
}

#[test]
#[should_panic(expected = "mandatory field `country`")]
fn missing_mandatory_field_panics() {
    let dir = tempfile::tempdir().unwrap();
    let profile = Adapter::new(Profile::new(&backends(&dir)));
    profile.remove(Profile::COUNTRY);
    profile.get(Profile::COUNTRY);
}

#[test]
fn debug_report_names_each_write() {
    let dir = tempfile::tempdir().unwrap();
    let containers = backends(&dir);
    let profile = Profile::new(&containers);
    profile.config().debug.enable();
    let profile = Adapter::new(profile);

    profile.set(Profile::AGE, Some(28));
    profile.set(Profile::IS_VALID, Some(true));
    let report = profile.debug_report();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("age : 28 @ "));
    assert!(lines[1].starts_with("isValid : true @ "));
}
