//! The user's profile, kept as a single JSON blob next to the menu cache.
//!
//! Only the avatar is derived from it here; editing the profile belongs to the
//! presentation layer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use crate::error::MenuError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub order_statuses: bool,
    pub password_changes: bool,
    pub special_offers: bool,
    pub newsletter: bool,
    /// Avatar image URI; empty when the user has not picked one.
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Avatar {
    Image(String),
    Initials(String),
}

impl Profile {
    pub fn avatar(&self) -> Avatar {
        if !self.image.is_empty() {
            return Avatar::Image(self.image.clone());
        }
        let initials = [&self.first_name, &self.last_name]
            .into_iter()
            .filter_map(|name| name.chars().next())
            .collect();
        Avatar::Initials(initials)
    }
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the stored profile. A missing blob (or a JSON `null`) yields the
    /// default profile; a blob that does not parse is a format error.
    pub async fn load(&self) -> Result<Profile, MenuError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "no stored profile");
                return Ok(Profile::default());
            }
            Err(e) => return Err(e.into()),
        };
        let profile: Option<Profile> = serde_json::from_slice(&raw)?;
        Ok(profile.unwrap_or_default())
    }

    /// Replace the stored blob. Written to a sibling file first, then renamed over.
    pub async fn save(&self, profile: &Profile) -> Result<(), MenuError> {
        let json = serde_json::to_vec_pretty(profile)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_avatar_initials() {
        let profile = Profile {
            first_name: "Tilly".to_string(),
            last_name: "Doe".to_string(),
            ..Profile::default()
        };
        assert_eq!(profile.avatar(), Avatar::Initials("TD".to_string()));

        let profile = Profile {
            last_name: "Doe".to_string(),
            ..Profile::default()
        };
        assert_eq!(profile.avatar(), Avatar::Initials("D".to_string()));

        assert_eq!(Profile::default().avatar(), Avatar::Initials(String::new()));
    }

    #[test]
    fn test_avatar_prefers_image() {
        let profile = Profile {
            first_name: "Tilly".to_string(),
            image: "file:///avatar.png".to_string(),
            ..Profile::default()
        };
        assert_eq!(profile.avatar(), Avatar::Image("file:///avatar.png".to_string()));
    }

    #[test]
    fn test_profile_json_shape() {
        let profile: Profile =
            serde_json::from_str(r#"{"firstName": "Tilly", "newsletter": true}"#).unwrap();
        assert_eq!(profile.first_name, "Tilly");
        assert!(profile.newsletter);
        assert_eq!(profile.phone_number, "");

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Tilly");
        assert_eq!(json["orderStatuses"], false);
    }

    #[tokio::test]
    async fn test_profile_store_round_trip() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let store = ProfileStore::new(dir.path().join("profile.json"));

        assert_eq!(store.load().await?, Profile::default());

        let profile = Profile {
            first_name: "Tilly".to_string(),
            email: "tilly@example.com".to_string(),
            special_offers: true,
            ..Profile::default()
        };
        store.save(&profile).await?;
        assert_eq!(store.load().await?, profile);

        Ok(())
    }

    #[tokio::test]
    async fn test_profile_store_malformed_blob() -> anyhow::Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("profile.json");

        tokio::fs::write(&path, "{not json").await?;
        let err = ProfileStore::new(&path).load().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);

        tokio::fs::write(&path, "null").await?;
        assert_eq!(ProfileStore::new(&path).load().await?, Profile::default());

        Ok(())
    }
}
