//! Sample profile schema spread over every backend.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Duration;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use stow::{
    Adapter, Bucket, CredentialContainer, DocumentConfig, DocumentContainer, Field, FileConfig,
    FileContainer, PreferencesConfig, PreferencesContainer, SharedContainer, Store, StoreConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    pub last: String,
}
stow::storable_codable!(Name);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameType {
    Given,
    Middle,
    Family,
}
stow::storable_raw!(NameType: String {
    Given => "given",
    Middle => "middle",
    Family => "family",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
}
stow::storable_archived!(serde Address);

pub struct Profile {
    config: StoreConfig,
    username: Bucket<Option<String>>,
    phones: Bucket<Option<Vec<String>>>,
    age: Bucket<Option<i64>>,
    is_valid: Bucket<Option<bool>>,
    full_name: Bucket<Option<Name>>,
    other_names: Bucket<Option<Vec<Name>>>,
    name_type: Bucket<Option<Vec<NameType>>>,
    address: Bucket<Option<Address>>,
}

impl Profile {
    pub const USERNAME: Field<Self, Option<String>> = Field::new("username", |s: &Self| &s.username);
    pub const PHONES: Field<Self, Option<Vec<String>>> = Field::new("phones", |s: &Self| &s.phones);
    pub const AGE: Field<Self, Option<i64>> = Field::new("age", |s: &Self| &s.age);
    pub const IS_VALID: Field<Self, Option<bool>> = Field::new("isValid", |s: &Self| &s.is_valid);
    pub const FULL_NAME: Field<Self, Option<Name>> =
        Field::new("fullName", |s: &Self| &s.full_name);
    pub const OTHER_NAMES: Field<Self, Option<Vec<Name>>> =
        Field::new("otherNames", |s: &Self| &s.other_names);
    pub const NAME_TYPE: Field<Self, Option<Vec<NameType>>> =
        Field::new("nameType", |s: &Self| &s.name_type);
    pub const ADDRESS: Field<Self, Option<Address>> = Field::new("address", |s: &Self| &s.address);

    /// Open the four backends under `root` and declare the schema.
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        let preferences = PreferencesConfig {
            suite: "demo".to_string(),
            path: Some(root.join("preferences.json")),
        };
        let prefs: SharedContainer = Arc::new(
            PreferencesContainer::open(&preferences).context("opening preferences")?,
        );
        let vault: SharedContainer = Arc::new(CredentialContainer::in_memory());
        let files: SharedContainer = Arc::new(
            FileContainer::open(FileConfig::new(root.join("files"))).context("opening files")?,
        );
        let document: SharedContainer = Arc::new(
            DocumentContainer::open(&DocumentConfig::new(root.join("storage.json")))
                .context("opening document")?,
        );

        let config = StoreConfig::with_container(prefs);
        config.debug.enable();
        Ok(Self {
            username: config
                .bucket("username")
                .expire_after(Duration::days(1))
                .value(Some("Jhon Doe".to_string()))
                .build(),
            phones: config.bucket("phones").container(vault).build(),
            age: config.bucket("age").container(files).build(),
            is_valid: config.bucket("isValid").container(document).build(),
            full_name: config.bucket("fullName").build(),
            other_names: config.bucket("otherNames").build(),
            name_type: config.bucket("nameType").build(),
            address: config.bucket("address").build(),
            config,
        })
    }
}

impl Store for Profile {
    fn config(&self) -> &StoreConfig {
        &self.config
    }
}

/// Write a sample profile and return the adapter used.
pub fn populate(root: &Path) -> anyhow::Result<Adapter<Profile>> {
    let profile = Adapter::new(Profile::open(root)?);
    let jhon = Name {
        first: "Jhon".to_string(),
        last: "Doe".to_string(),
    };

    profile.set(Profile::PHONES, Some(vec!["555-0100".to_string(), "555-0199".to_string()]));
    profile.set(Profile::AGE, Some(28));
    profile.set(Profile::IS_VALID, Some(true));
    profile.set(Profile::FULL_NAME, Some(jhon.clone()));
    profile.set(
        Profile::OTHER_NAMES,
        Some(vec![
            jhon,
            Name {
                first: "J.".to_string(),
                last: "Doe".to_string(),
            },
        ]),
    );
    profile.set(Profile::NAME_TYPE, Some(vec![NameType::Given, NameType::Family]));
    profile.set(
        Profile::ADDRESS,
        Some(Address {
            street: "1 Main St".to_string(),
            city: "Dhaka".to_string(),
        }),
    );
    Ok(profile)
}

pub fn run(root: &Path) -> anyhow::Result<()> {
    println!("{} {}", "Demo profile under".bold(), root.display());
    let profile = populate(root)?;

    println!();
    println!("  {:<12} {}", "username".cyan(), describe(profile.get(Profile::USERNAME)));
    println!("  {:<12} {}", "phones".cyan(), describe(profile.get(Profile::PHONES)));
    println!("  {:<12} {}", "age".cyan(), describe(profile.get(Profile::AGE)));
    println!("  {:<12} {}", "isValid".cyan(), describe(profile.get(Profile::IS_VALID)));
    println!("  {:<12} {}", "fullName".cyan(), describe(profile.get(Profile::FULL_NAME)));
    println!("  {:<12} {}", "nameType".cyan(), describe(profile.get(Profile::NAME_TYPE)));
    println!("  {:<12} {}", "address".cyan(), describe(profile.get(Profile::ADDRESS)));

    println!();
    println!("{}", "Debug log".bold());
    for line in profile.debug_report().lines() {
        println!("  {}", line.dimmed());
    }
    Ok(())
}

fn describe<T: std::fmt::Debug>(value: Option<T>) -> String {
    match value {
        Some(value) => format!("{value:?}"),
        None => "NA".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let profile = populate(dir.path()).unwrap();

        assert_eq!(profile.get(Profile::USERNAME).as_deref(), Some("Jhon Doe"));
        assert_eq!(profile.get(Profile::AGE), Some(28));
        assert_eq!(profile.get(Profile::IS_VALID), Some(true));
        assert_eq!(
            profile.get(Profile::NAME_TYPE),
            Some(vec![NameType::Given, NameType::Family])
        );
        assert_eq!(profile.get(Profile::OTHER_NAMES).map(|n| n.len()), Some(2));
        assert_eq!(
            profile.get(Profile::ADDRESS).map(|a| a.city),
            Some("Dhaka".to_string())
        );
    }

    #[test]
    fn files_land_under_root() {
        let dir = tempfile::tempdir().unwrap();
        populate(dir.path()).unwrap();
        assert!(dir.path().join("preferences.json").is_file());
        assert!(dir.path().join("storage.json").is_file());
        assert!(dir.path().join("files").join("age.file").is_file());
    }

    #[test]
    fn debug_log_records_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let profile = populate(dir.path()).unwrap();
        let report = profile.debug_report();
        // Seeded username plus the seven writes above.
        assert_eq!(report.lines().count(), 8);
        assert!(report.lines().any(|l| l.starts_with("age : 28 @ ")));
    }
}
